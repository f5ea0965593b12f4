use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;
use crate::forms::{FormOptions, RevalidateMode, ValidationMode};
use crate::wizards::{self, WizardDefinition};

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiSettings,
    pub forms: FormSettings,
    /// Directory holding wizard definition files, relative to the config root
    pub wizards_dir: PathBuf,
    /// Wizards declared inline in the settings file, followed by those loaded from `wizards_dir`
    #[serde(default)]
    pub wizards: Vec<WizardDefinition>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FormSettings {
    pub mode: ValidationMode,
    pub revalidate_mode: RevalidateMode,
    /// Gate "next" on the current step's fields being valid
    pub validate_on_next: bool,
}

impl FormSettings {
    pub fn options(&self) -> FormOptions {
        FormOptions::default()
            .with_mode(self.mode)
            .with_revalidate_mode(self.revalidate_mode)
    }
}

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
const DEFAULT_WIZARDS_DIR: &str = "config/wizards";

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut settings = Self::build(File::from(cli.config.clone()).required(false))?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);
        settings.load_external_configs(root)?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let mut settings = Self::build(File::from(root.join("spark")).required(false))?;

        settings.load_external_configs(root)?;
        settings.validate()?;

        Ok(settings)
    }

    fn build<S>(source: S) -> Result<Self, anyhow::Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(source)
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("forms.mode", "on_submit")?
            .set_default("forms.revalidate_mode", "on_change")?
            .set_default("forms.validate_on_next", true)?
            .set_default("wizards_dir", DEFAULT_WIZARDS_DIR)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(dir) = &cli.wizards_dir {
            self.wizards_dir = dir.clone();
        }
        if let Some(base_url) = &cli.api_base_url {
            self.api.base_url = base_url.clone();
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    fn load_external_configs(&mut self, root: &Path) -> Result<(), anyhow::Error> {
        let dir = if self.wizards_dir.is_absolute() {
            self.wizards_dir.clone()
        } else {
            root.join(&self.wizards_dir)
        };
        let loaded = load_wizards_from_dir(&dir)?;
        tracing::debug!(dir = %dir.display(), count = loaded.len(), "Loaded wizard definitions");
        self.wizards.extend(loaded);
        Ok(())
    }

    /// Built-in wizards followed by configured ones
    pub fn all_wizards(&self) -> Vec<WizardDefinition> {
        let mut all = wizards::builtin();
        all.extend(self.wizards.iter().cloned());
        all
    }

    pub fn wizard(&self, name: &str) -> Option<WizardDefinition> {
        self.all_wizards().into_iter().find(|w| w.name == name)
    }
}

/// Parse every `.json`, `.yaml`/`.yml` and `.toml` file in `dir` as one wizard.
/// A missing directory yields no wizards.
pub fn load_wizards_from_dir(dir: &Path) -> Result<Vec<WizardDefinition>, anyhow::Error> {
    let pattern = format!("{}/*", dir.display());
    let mut wizards = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) => {
                if let Some(wizard) = load_wizard_file(&path)? {
                    wizards.push(wizard);
                }
            }
            Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
        }
    }
    Ok(wizards)
}

fn load_wizard_file(path: &Path) -> Result<Option<WizardDefinition>, anyhow::Error> {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return Ok(None);
    };
    if !matches!(ext, "json" | "yaml" | "yml" | "toml") {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let parsed = match ext {
        "json" => serde_json::from_str(&content).map_err(anyhow::Error::from),
        "toml" => toml::from_str(&content).map_err(anyhow::Error::from),
        _ => serde_yaml::from_str(&content).map_err(anyhow::Error::from),
    };
    let wizard = parsed.map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
    Ok(Some(wizard))
}
