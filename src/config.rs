//! Configuration loading for the command runner.

use anyhow::{Context, bail};
use serde::Deserialize;
use std::path::Path;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "antenna-graph.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Placeholder for cells without an antenna.
    pub blank_cell: char,
    /// Character written after every text grid cell.
    pub cell_separator: char,
    /// Log level for this crate's own messages.
    pub log_level: String,
    /// Upper bound on printed simple paths; `None` prints all of them.
    pub max_paths: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blank_cell: '.',
            cell_separator: ' ',
            log_level: "info".to_string(),
            max_paths: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    ///
    /// * `config_path` - Path to the TOML file
    ///
    /// # Returns
    ///
    /// The validated configuration, or an error naming the file if it cannot
    /// be read or parsed.
    pub fn load(config_path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Load `config_path` if given, otherwise the default file if it exists,
    /// otherwise built-in defaults.
    pub fn resolve(config_path: Option<&Path>) -> anyhow::Result<Self> {
        match config_path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(Path::new(DEFAULT_CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.blank_cell == ' ' {
            bail!("blank-cell must not be a space");
        }
        if self.blank_cell == self.cell_separator {
            bail!("blank-cell and cell-separator must differ (both are {:?})", self.blank_cell);
        }
        if !matches!(self.log_level.as_str(), "trace" | "debug" | "info" | "warn" | "error" | "off") {
            bail!("unknown log-level {:?}", self.log_level);
        }
        Ok(())
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.blank_cell, '.');
        assert_eq!(config.cell_separator, ' ');
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
        assert_eq!(config.max_paths, None);
    }

    #[test]
    fn kebab_case_keys() {
        let config = Config::parse("blank-cell = '#'\ncell-separator = '|'\nlog-level = 'debug'\nmax-paths = 10\n").unwrap();
        assert_eq!(config.blank_cell, '#');
        assert_eq!(config.cell_separator, '|');
        assert_eq!(config.level_filter(), log::LevelFilter::Debug);
        assert_eq!(config.max_paths, Some(10));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Config::parse("blank-cell = ' '").is_err());
        assert!(Config::parse("blank-cell = '.'\ncell-separator = '.'").is_err());
        assert!(Config::parse("log-level = 'loud'").is_err());
        assert!(Config::parse("colour = true").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max-paths = 3").unwrap();
        assert_eq!(Config::load(file.path()).unwrap().max_paths, Some(3));
        assert_eq!(Config::resolve(Some(file.path())).unwrap().max_paths, Some(3));
    }

    #[test]
    fn missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::resolve(Some(dir.path().join("nope.toml").as_path())).is_err());
    }
}
