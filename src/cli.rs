use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spark - schema-driven forms and multi-step wizards
#[derive(Parser, Debug, Clone)]
#[command(name = "spark", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "SPARK_CONFIG", default_value = "spark.toml", global = true)]
    pub config: PathBuf,

    /// Directory holding wizard definition files
    #[arg(long, env = "SPARK_WIZARDS_DIR", global = true)]
    pub wizards_dir: Option<PathBuf>,

    /// Base URL of the backend API
    #[arg(long, env = "SPARK_API_BASE_URL", global = true)]
    pub api_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Load settings and every wizard definition, reporting problems
    Check,
    /// List the available wizards
    List,
    /// Walk a wizard with values from a JSON file and print the submit payload
    Run {
        /// Wizard name
        wizard: String,
        /// JSON file with the form values
        #[arg(long)]
        values: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["spark", "list"]);
        assert_eq!(cli.config, PathBuf::from("spark.toml"));
        assert!(cli.wizards_dir.is_none());
        assert!(cli.api_base_url.is_none());
        assert_eq!(cli.command, Command::List);
    }

    #[test]
    fn test_cli_run_with_args() {
        let cli = Cli::parse_from([
            "spark",
            "run",
            "worker_agent",
            "--values",
            "agent.json",
            "--config",
            "custom.toml",
            "--wizards-dir",
            "wizards",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.wizards_dir, Some(PathBuf::from("wizards")));
        assert_eq!(
            cli.command,
            Command::Run {
                wizard: "worker_agent".to_string(),
                values: PathBuf::from("agent.json"),
            }
        );
    }

    #[test]
    fn test_run_requires_values() {
        assert!(Cli::try_parse_from(["spark", "run", "worker_agent"]).is_err());
    }
}
