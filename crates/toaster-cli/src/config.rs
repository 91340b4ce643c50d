use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use toaster_tables::DEFAULT_PAGE_SIZE;

pub const CONFIG_FILE: &str = "toaster.toml";
pub const DATABASE_FILE: &str = "toaster.db";

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. TOASTER_PATH environment variable (with tilde expansion)
/// 3. XDG data directory
/// 4. ~/.toaster
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("TOASTER_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("toaster"));
    }

    if let Some(home) = dirs::home_dir() {
        return Ok(home.join(".toaster"));
    }

    bail!("Could not determine data directory: no HOME directory or XDG data directory found")
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TablesConfig {
    /// Rows per page when a request names no limit.
    pub page_size: usize,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tables: TablesConfig,
}

impl Config {
    /// Load `path`, falling back to defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;

        if config.tables.page_size == 0 {
            bail!("tables.page_size must be at least 1 in {}", path.display());
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server.listen, "127.0.0.1:8000");
        assert_eq!(config.tables.page_size, 10);
    }

    #[test]
    fn test_missing_file_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join(CONFIG_FILE))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[tables]\npage_size = 25\n")?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.tables.page_size, 25);
        assert_eq!(config.server, ServerConfig::default());
        Ok(())
    }

    #[test]
    fn test_full_file_overrides_every_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "[server]\nlisten = \"0.0.0.0:9000\"\n\n[tables]\npage_size = 50\n",
        )?;

        let config = Config::load_from(&path)?;
        assert_eq!(config.server.listen, "0.0.0.0:9000");
        assert_eq!(config.tables.page_size, 50);
        Ok(())
    }

    #[test]
    fn test_zero_page_size_rejected() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[tables]\npage_size = 0\n")?;

        assert!(Config::load_from(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_explicit_data_dir_wins() -> Result<()> {
        let dir = resolve_data_dir(Some("/tmp/toaster-data"))?;
        assert_eq!(dir, PathBuf::from("/tmp/toaster-data"));
        Ok(())
    }
}
