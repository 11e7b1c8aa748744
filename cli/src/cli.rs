use clap::Parser;
use dorkcraft_core::{DorkConfig, ManualField};
use std::path::PathBuf;

/// Craft search-engine dorks from a plain-language objective with Gemini
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// What you are looking for, in plain language
    #[arg(index = 1)] // Positional argument
    pub objective: Option<String>,

    /// Enter interactive mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Rewrite the objective in precise security terminology before generating
    #[arg(short, long, default_value_t = false)]
    pub enhance: bool,

    /// Number of automatic refinement rounds after the first generation
    #[arg(short, long, default_value_t = 0)]
    pub refine: u32,

    /// Path to a TOML config file (defaults to ~/.config/dorkcraft/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print the session (result, issues, history) as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Manual mode: restrict to a site or domain
    #[arg(long)]
    pub site: Option<String>,

    /// Manual mode: path fragment
    #[arg(long)]
    pub inurl: Option<String>,

    /// Manual mode: title fragment
    #[arg(long)]
    pub intitle: Option<String>,

    /// Manual mode: file type
    #[arg(long)]
    pub filetype: Option<String>,

    /// Manual mode: free text appended to the query
    #[arg(long)]
    pub text: Option<String>,
}

impl Args {
    /// Manual fields given on the command line
    pub fn manual_fields(&self) -> Vec<(ManualField, &str)> {
        [
            (ManualField::Site, &self.site),
            (ManualField::Path, &self.inurl),
            (ManualField::Title, &self.intitle),
            (ManualField::FileType, &self.filetype),
            (ManualField::FreeText, &self.text),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }

    /// Command-line values that override the config file and environment
    pub fn config_overrides(&self) -> DorkConfig {
        DorkConfig {
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
            log_level: self.verbose.then(|| "debug".to_string()),
            ..DorkConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_fields_in_order() {
        let args = Args::parse_from([
            "dorkcraft",
            "--filetype",
            "env",
            "--site",
            ".edu",
        ]);
        assert_eq!(
            args.manual_fields(),
            vec![(ManualField::Site, ".edu"), (ManualField::FileType, "env")]
        );
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from(["dorkcraft", "-v", "-m", "gemini-2.5-pro", "objective"]);
        let overrides = args.config_overrides();
        assert_eq!(overrides.model_name.as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(args.objective.as_deref(), Some("objective"));
    }
}
