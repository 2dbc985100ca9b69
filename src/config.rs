//! Command-line and environment configuration.
//!
use clap::Parser;
use std::path::PathBuf;

use crate::api::DEFAULT_API_URL;
use crate::app::keymap::Keymap;
use crate::app::{AppOptions, REGISTER_TAB, Theme};

#[derive(Debug, Clone, Parser)]
#[command(name = "regdesk", version, about)]
pub struct Cli {
    /// Base URL of the registration backend.
    #[arg(long, env = "REGDESK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Tab shown at startup ("register" or "users").
    #[arg(long)]
    pub tab: Option<String>,

    /// Theme file; created with the default palette when missing.
    #[arg(long, default_value = "theme.conf")]
    pub theme: String,

    /// Key binding file; created with the default bindings when missing.
    #[arg(long, default_value = "keybinds.conf")]
    pub keybinds: String,

    /// Write logs to this file. Logging is discarded otherwise.
    #[arg(long, env = "REGDESK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn app_options(&self) -> AppOptions {
        AppOptions {
            default_tab: Some(self.tab.clone().unwrap_or_else(|| REGISTER_TAB.to_string())),
            theme: Theme::load_or_init(&self.theme),
            keymap: Keymap::load_or_init(&self.keybinds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "regdesk",
            "--api-url",
            "http://api.test:8080",
            "--tab",
            "users",
            "--log-file",
            "/tmp/regdesk.log",
        ])
        .unwrap();
        assert_eq!(cli.api_url, "http://api.test:8080");
        assert_eq!(cli.tab.as_deref(), Some("users"));
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/regdesk.log")));
        assert_eq!(cli.theme, "theme.conf");
        assert_eq!(cli.keybinds, "keybinds.conf");
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["regdesk", "--bogus"]).is_err());
    }
}
