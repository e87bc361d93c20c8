use std::{env, fmt, fs, io, path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::monitoring::checker::DEFAULT_TIMEOUT;
use crate::monitoring::executor::DEFAULT_MAX_IN_FLIGHT;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read config file: {0}")]
    ReadFailed(#[source] io::Error),
    #[error("failed to write config file: {0}")]
    WriteFailed(#[source] io::Error),
    #[error("failed to parse config file: {0}")]
    ParseFailed(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),
    #[error("no config path available: neither XDG_CONFIG_HOME nor a home directory is set")]
    ConfigPathUnavailable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub probe: ProbeConfig,
    pub server: ServerConfig,
    pub schedule: ScheduleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_connections: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_seconds: u64,
    pub max_in_flight: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub interval_seconds: u64,
    pub urls: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "url_inspector.db".into(), max_connections: 16 }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { timeout_seconds: DEFAULT_TIMEOUT.as_secs(), max_in_flight: DEFAULT_MAX_IN_FLIGHT }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: "0.0.0.0".into(), port: 8000 }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_seconds: 60, urls: Vec::new() }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.max(1))
    }
}

/// Used to ensure we are actually reading a toml file
fn normalize_toml_path(path: &path::Path) -> path::PathBuf {
    let mut path = path.to_path_buf();
    if path.extension().map(|ext| ext != "toml").unwrap_or(true) {
        path.set_extension("toml");
    }
    path
}

/// Get default config path ($XDG_CONFIG_HOME/url-inspector/config.toml or
/// $HOME/.config/...)
fn default_config_path() -> Result<path::PathBuf, Error> {
    let path = if let Ok(config_home) = env::var("XDG_CONFIG_HOME") {
        path::PathBuf::from(config_home)
    } else if let Some(home_dir) = env::home_dir() {
        home_dir.join(".config")
    } else {
        return Err(Error::ConfigPathUnavailable);
    };

    Ok(path.join("url-inspector/config.toml"))
}

/// Parse an environment variable, keeping `current` when unset or malformed
fn env_override<T: std::str::FromStr>(name: &str, current: T) -> T {
    match env::var(name) {
        Ok(val) => val.parse().unwrap_or_else(|_| {
            tracing::warn!("Ignoring unparseable {}={:?}", name, val);
            current
        }),
        Err(_) => current,
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_1 = write_indented(1);

        writeln!(f, "Current Internal Configuration State:")?;
        write_title_1(f, "Database")?;
        write_1(f, "Path", &self.database.path)?;
        write_1(f, "Max Connections", &self.database.max_connections)?;
        write_title_1(f, "Probe")?;
        write_1(f, "Timeout (s)", &self.probe.timeout_seconds)?;
        write_1(f, "Max In Flight", &self.probe.max_in_flight)?;
        write_title_1(f, "Server")?;
        write_1(f, "Bind Address", &self.server.bind)?;
        write_1(f, "Port", &self.server.port)?;
        write_title_1(f, "Schedule")?;
        write_1(f, "Interval (s)", &self.schedule.interval_seconds)?;
        write_1(f, "URLs", &self.schedule.urls.join(", "))?;

        Ok(())
    }
}

impl Config {
    /// Generate Config structure from file
    ///
    /// Creates a default config in ~/.config/url-inspector/config.toml
    ///  or the specified path, with the name config.toml if one does not exist.
    /// Environment overrides are applied on top.
    ///
    /// ```rust,no_run
    /// use inspector_service::config::Config;
    ///
    /// let cfg = Config::from_config(None::<&std::path::Path>)?;
    /// println!("{}", cfg);
    /// # Ok::<(), inspector_service::config::Error>(())
    /// ```
    pub fn from_config(optional_path: Option<impl AsRef<path::Path>>) -> Result<Self, Error> {
        let config_path: path::PathBuf = if let Some(path) = optional_path {
            normalize_toml_path(path.as_ref())
        } else {
            default_config_path()?
        };

        let config = if config_path.exists() {
            let raw_string = fs::read_to_string(&config_path).map_err(Error::ReadFailed)?;
            toml::from_str(raw_string.as_str())?
        } else {
            let config = Self::default();
            config.write_config(&config_path)?;
            tracing::info!("Wrote default configuration to {}", config_path.display());
            config
        };

        Ok(config.with_env_overrides())
    }

    /// Serialize and write a config to a file
    pub fn write_config(&self, path: &std::path::Path) -> Result<(), Error> {
        let config_str: String = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::WriteFailed)?;
        }

        fs::write(path, config_str).map_err(Error::WriteFailed)
    }

    /// Apply `INSPECTOR_*` environment variables over the loaded values
    pub fn with_env_overrides(mut self) -> Self {
        self.database.path = env_override("INSPECTOR_DATABASE_PATH", self.database.path);
        self.server.bind = env_override("INSPECTOR_BIND", self.server.bind);
        self.server.port = env_override("INSPECTOR_PORT", self.server.port);
        self.probe.timeout_seconds = env_override("INSPECTOR_PROBE_TIMEOUT", self.probe.timeout_seconds);
        self
    }
}
