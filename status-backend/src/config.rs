use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default location of the service configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Environment variable that points at a different configuration file.
pub const CONFIG_PATH_ENV: &str = "STREMIO_STATUS_CONFIG";

/// Prefix for per-field environment overrides, e.g. `ADDON_PORT`.
const ENV_PREFIX: &str = "ADDON_";

/// Dotenv files read before the process environment; later entries win.
pub const ENV_FILES: [&str; 2] = ["../.env", ".env"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,

    /// Base URL of the upstream health monitor (Gatus).
    #[serde(default = "default_health_base_url")]
    pub health_base_url: String,

    /// Public URL this addon is reachable at; used for posters and stream links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    #[serde(default = "default_cache_ttl_seconds")]
    pub cache_ttl_seconds: u64,

    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,

    /// Directory holding posters, the logo and the configurator page.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_retention_days() -> u64 {
    3
}

fn default_health_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_public_base_url() -> String {
    "http://localhost:7000".to_string()
}

fn default_cache_ttl_seconds() -> u64 {
    45
}

fn default_upstream_timeout_secs() -> u64 {
    3
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            log_retention_days: default_log_retention_days(),
            health_base_url: default_health_base_url(),
            public_base_url: default_public_base_url(),
            cache_ttl_seconds: default_cache_ttl_seconds(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
            static_dir: default_static_dir(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl ServiceConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        let config: ServiceConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))?;
        Ok(config)
    }

    /// Load the file (if it exists), then apply `ADDON_*` overrides from the
    /// dotenv files and the process environment.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let process_vars = std::env::vars_os().filter_map(|(name, value)| {
            Some((name.into_string().ok()?, value.into_string().ok()?))
        });
        Self::load_from(path, &ENV_FILES, process_vars)
    }

    /// Like [`ServiceConfig::load`], with explicit dotenv files and variables.
    ///
    /// Variable names match case-insensitively. Process variables beat dotenv
    /// entries, and later dotenv files beat earlier ones.
    pub fn load_from<P, I>(
        path: impl AsRef<Path>,
        env_files: &[P],
        process_vars: I,
    ) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = (String, String)>,
    {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };

        let mut vars = Vec::new();
        for file in env_files {
            vars.extend(read_env_file(file.as_ref())?);
        }
        vars.extend(process_vars);

        config.apply_overrides(|name| {
            vars.iter()
                .rev()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.clone())
        })?;
        config.normalize();
        Ok(config)
    }

    /// Apply overrides looked up by full variable name (e.g. `ADDON_PORT`).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_field(&lookup, "HOST", &mut self.host)?;
        override_field(&lookup, "PORT", &mut self.port)?;
        override_field(&lookup, "LOG_LEVEL", &mut self.log_level)?;
        override_field(&lookup, "LOG_DIR", &mut self.log_dir)?;
        override_field(&lookup, "LOG_RETENTION_DAYS", &mut self.log_retention_days)?;
        override_field(&lookup, "HEALTH_BASE_URL", &mut self.health_base_url)?;
        override_field(&lookup, "PUBLIC_BASE_URL", &mut self.public_base_url)?;
        override_field(&lookup, "CACHE_TTL_SECONDS", &mut self.cache_ttl_seconds)?;
        override_field(&lookup, "UPSTREAM_TIMEOUT_SECS", &mut self.upstream_timeout_secs)?;
        override_field(&lookup, "STATIC_DIR", &mut self.static_dir)?;
        override_field(&lookup, "ENABLE_CORS", &mut self.enable_cors)?;
        Ok(())
    }

    fn normalize(&mut self) {
        self.health_base_url = self.health_base_url.trim_end_matches('/').to_string();
        self.public_base_url = self.public_base_url.trim_end_matches('/').to_string();
        self.log_level = self.log_level.to_lowercase();
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

/// `KEY=value` pairs from a dotenv file; a missing file yields nothing.
fn read_env_file(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read env file '{}'", path.display()))?;

    let mut vars = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
            .unwrap_or(value);
        vars.push((key.trim().to_string(), value.to_string()));
    }
    Ok(vars)
}

fn override_field<F, T>(lookup: &F, field: &str, target: &mut T) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let name = format!("{}{}", ENV_PREFIX, field);
    if let Some(raw) = lookup(&name) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", name, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.server_address(), "0.0.0.0:7000");
        assert_eq!(config.cache_ttl(), Duration::from_secs(45));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(3));
        assert!(config.enable_cors);
    }

    #[test]
    fn test_from_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8123").unwrap();
        writeln!(file, "public_base_url = \"https://status.example.com/\"").unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 8123);
        assert_eq!(config.public_base_url, "https://status.example.com");
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.cache_ttl_seconds, 45);
    }

    #[test]
    fn test_missing_file_means_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ServiceConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.port, 7000);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();
        assert!(ServiceConfig::from_file(file.path()).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("ADDON_PORT", "9000"),
            ("ADDON_CACHE_TTL_SECONDS", "5"),
            ("ADDON_ENABLE_CORS", "false"),
            ("ADDON_HEALTH_BASE_URL", "http://gatus:8080"),
        ]);
        let mut config = ServiceConfig::default();
        config
            .apply_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.cache_ttl_seconds, 5);
        assert!(!config.enable_cors);
        assert_eq!(config.health_base_url, "http://gatus:8080");
    }

    #[test]
    fn test_load_matches_variable_names_ignoring_case() {
        let dir = tempfile::TempDir::new().unwrap();
        let no_files: [&Path; 0] = [];
        let vars = vec![
            ("addon_port".to_string(), "9100".to_string()),
            ("Addon_Public_Base_Url".to_string(), "https://status.example.com/".to_string()),
        ];

        let config = ServiceConfig::load_from(dir.path().join("absent.toml"), &no_files, vars).unwrap();
        assert_eq!(config.port, 9100);
        assert_eq!(config.public_base_url, "https://status.example.com");
    }

    #[test]
    fn test_env_files_and_precedence() {
        let dir = tempfile::TempDir::new().unwrap();
        let parent_env = dir.path().join("parent.env");
        let local_env = dir.path().join("local.env");
        std::fs::write(
            &parent_env,
            "# shared\nADDON_PORT=7100\nADDON_LOG_LEVEL=warn\nADDON_STATIC_DIR=/srv/parent\n",
        )
        .unwrap();
        std::fs::write(
            &local_env,
            "addon_log_level = \"debug\"\nexport ADDON_STATIC_DIR='/srv/local'\nnot a pair\n",
        )
        .unwrap();

        let config = ServiceConfig::load_from(
            dir.path().join("absent.toml"),
            &[&parent_env, &dir.path().join("missing.env"), &local_env],
            vec![("ADDON_PORT".to_string(), "7200".to_string())],
        )
        .unwrap();

        assert_eq!(config.port, 7200);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.static_dir, "/srv/local");
    }

    #[test]
    fn test_bad_env_override_names_the_variable() {
        let mut config = ServiceConfig::default();
        let err = config
            .apply_overrides(|name| (name == "ADDON_PORT").then(|| "seventy".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("ADDON_PORT"));
    }
}
