//! Field paths for nested form values (e.g. "name" or "secrets[0].key")

use serde_json::{Map, Value};
use std::fmt;

/// Segment of a field path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object property access: .fieldName
    Property(String),
    /// Array index access: [0], [1], etc.
    Index(usize),
    /// Bracket contents that are not an index, e.g. [x]. Never resolves.
    Invalid(String),
}

/// Path to a value inside the form values object
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Create a root path (empty)
    pub fn root() -> Self {
        Self { segments: vec![] }
    }

    /// Check if this is the root path
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Push a property segment
    pub fn push_property(&self, name: &str) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Property(name.to_string()));
        new
    }

    /// Push an array index segment
    pub fn push_index(&self, idx: usize) -> Self {
        let mut new = self.clone();
        new.segments.push(PathSegment::Index(idx));
        new
    }

    /// Name of the top-level field this path lives under
    pub fn root_name(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Property(name)) => Some(name),
            _ => None,
        }
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// False when any bracket segment failed to parse as an index
    pub fn is_valid(&self) -> bool {
        !self
            .segments
            .iter()
            .any(|seg| matches!(seg, PathSegment::Invalid(_)))
    }

    /// Parse a path string such as "secrets[1].key"
    pub fn parse(s: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = s.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '.' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                }
                '[' => {
                    if !current.is_empty() {
                        segments.push(PathSegment::Property(std::mem::take(&mut current)));
                    }
                    let mut index_str = String::new();
                    while let Some(c) = chars.next() {
                        if c == ']' {
                            break;
                        }
                        index_str.push(c);
                    }
                    match index_str.parse::<usize>() {
                        Ok(idx) => segments.push(PathSegment::Index(idx)),
                        Err(_) => segments.push(PathSegment::Invalid(index_str)),
                    }
                }
                _ => current.push(ch),
            }
        }

        if !current.is_empty() {
            segments.push(PathSegment::Property(current));
        }

        Self { segments }
    }

    /// Look up the value this path points at
    pub fn get<'a>(&self, map: &'a Map<String, Value>) -> Option<&'a Value> {
        let mut segments = self.segments.iter();
        let mut current = match segments.next()? {
            PathSegment::Property(name) => map.get(name)?,
            PathSegment::Index(_) | PathSegment::Invalid(_) => return None,
        };
        for seg in segments {
            current = match seg {
                PathSegment::Property(name) => current.as_object()?.get(name)?,
                PathSegment::Index(idx) => current.as_array()?.get(*idx)?,
                PathSegment::Invalid(_) => return None,
            };
        }
        Some(current)
    }

    /// Write `value` at this path, creating intermediate objects and arrays.
    ///
    /// An index may address an existing item or append one right after the
    /// last. Returns false, leaving `map` untouched, when the path is empty,
    /// does not start with a property, holds an invalid segment or skips
    /// past the end of an array.
    pub fn set(&self, map: &mut Map<String, Value>, value: Value) -> bool {
        let Some((PathSegment::Property(name), rest)) = self.segments.split_first() else {
            return false;
        };
        if !self.is_valid() {
            return false;
        }
        if rest.is_empty() {
            map.insert(name.clone(), value);
            return true;
        }
        let mut slot = map.get(name).cloned().unwrap_or(Value::Null);
        if !write_at(&mut slot, rest, value) {
            return false;
        }
        map.insert(name.clone(), slot);
        true
    }
}

fn write_at(slot: &mut Value, segments: &[PathSegment], value: Value) -> bool {
    let Some((seg, rest)) = segments.split_first() else {
        *slot = value;
        return true;
    };
    match seg {
        PathSegment::Property(name) => {
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(obj) = slot else {
                return false;
            };
            let next = obj.entry(name.clone()).or_insert(Value::Null);
            write_at(next, rest, value)
        }
        PathSegment::Index(idx) => {
            if !slot.is_array() {
                *slot = Value::Array(Vec::new());
            }
            let Value::Array(items) = slot else {
                return false;
            };
            if *idx > items.len() {
                return false;
            }
            if *idx == items.len() {
                items.push(Value::Null);
            }
            write_at(&mut items[*idx], rest, value)
        }
        PathSegment::Invalid(_) => false,
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.segments.iter().enumerate() {
            match seg {
                PathSegment::Property(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Property(name) => write!(f, ".{}", name)?,
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
                PathSegment::Invalid(raw) => write!(f, "[{}]", raw)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for FieldPath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_and_display() {
        let path = FieldPath::parse("secrets[1].key");
        assert_eq!(
            path.segments().cloned().collect::<Vec<_>>(),
            vec![
                PathSegment::Property("secrets".to_string()),
                PathSegment::Index(1),
                PathSegment::Property("key".to_string()),
            ]
        );
        assert_eq!(path.to_string(), "secrets[1].key");
        assert_eq!(path.root_name(), Some("secrets"));
        assert!(FieldPath::parse("").is_root());
    }

    #[test]
    fn test_set_then_get() {
        let mut map = Map::new();
        assert!(FieldPath::parse("secrets[0].key").set(&mut map, json!("A")));
        let path = FieldPath::parse("secrets[1].key");
        assert!(path.set(&mut map, json!("API_KEY")));

        assert_eq!(path.get(&map), Some(&json!("API_KEY")));
        assert_eq!(map["secrets"], json!([{ "key": "A" }, { "key": "API_KEY" }]));
    }

    #[test]
    fn test_set_rejects_index_past_end() {
        let mut map = Map::new();
        map.insert("secrets".to_string(), json!([{ "key": "A", "value": "1" }]));

        assert!(!FieldPath::parse("secrets[2].key").set(&mut map, json!("X")));
        assert!(!FieldPath::parse("secrets[18446744073709551615].key").set(&mut map, json!("X")));
        assert!(!FieldPath::parse("fresh[3]").set(&mut map, json!("X")));

        assert_eq!(map["secrets"], json!([{ "key": "A", "value": "1" }]));
        assert!(!map.contains_key("fresh"));
    }

    #[test]
    fn test_unparsable_index_never_resolves() {
        let path = FieldPath::parse("secrets[x]");
        assert!(!path.is_valid());
        assert_eq!(path.to_string(), "secrets[x]");
        assert_eq!(path.root_name(), Some("secrets"));

        let mut map = Map::new();
        map.insert("secrets".to_string(), json!([{ "key": "A", "value": "1" }]));
        assert!(!path.set(&mut map, json!("oops")));
        assert_eq!(path.get(&map), None);
        assert_eq!(map["secrets"], json!([{ "key": "A", "value": "1" }]));

        // too large for usize
        assert!(!FieldPath::parse("secrets[99999999999999999999999]").is_valid());
    }

    #[test]
    fn test_set_overwrites_scalar_with_container() {
        let mut map = Map::new();
        map.insert("endpoint".to_string(), json!("old"));
        FieldPath::parse("endpoint.host").set(&mut map, json!("localhost"));
        assert_eq!(map["endpoint"], json!({ "host": "localhost" }));
    }

    #[test]
    fn test_set_rejects_index_root() {
        let mut map = Map::new();
        assert!(!FieldPath::parse("[0]").set(&mut map, json!(1)));
        assert!(map.is_empty());
    }
}
