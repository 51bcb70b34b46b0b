//! Configuration module for YAML config file parsing.
//!
//! The whole configuration is resolved once at startup and is immutable for
//! the life of the process. Load failure is fatal; the server never starts
//! with a partial or invalid config.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Environment variable that overrides `secret_token` when set and non-empty.
pub const SECRET_ENV_VAR: &str = "HOOKRUN_SECRET";

/// Application configuration loaded from a YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to, e.g. "0.0.0.0:8080"
    pub listen_addr: String,

    /// Shared secret used for HMAC verification of every route
    pub secret_token: String,

    /// Logging options
    #[serde(default)]
    pub log: LogConfig,

    /// Webhook routes, in file order (a later duplicate path wins)
    pub routes: Vec<RouteConfig>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// Log level filter: debug, info, warn or error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON-formatted log lines instead of human-readable ones
    #[serde(default)]
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// One webhook endpoint: an exact-match URL path and the script it triggers.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteConfig {
    /// URL path to match exactly against the inbound request's path
    pub path: String,

    /// Filesystem path of the update script, run via the shell interpreter
    pub command: String,
}

impl Config {
    /// Load and validate configuration from a YAML file.
    ///
    /// The shared secret may be overridden by the `HOOKRUN_SECRET`
    /// environment variable, so the file itself does not have to hold it.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let mut config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        if let Ok(secret) = env::var(SECRET_ENV_VAR) {
            if !secret.is_empty() {
                config.secret_token = secret;
            }
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.listen_addr.is_empty() {
            bail!("listen_addr must not be empty");
        }
        if self.secret_token.is_empty() {
            bail!("secret_token must not be empty (set it in the config file or via {SECRET_ENV_VAR})");
        }
        if self.routes.is_empty() {
            bail!("at least one route must be configured");
        }
        for route in &self.routes {
            if !route.path.starts_with('/') {
                bail!("route path {:?} must start with '/'", route.path);
            }
            if route.command.is_empty() {
                bail!("route {:?} has an empty command", route.path);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
listen_addr: "127.0.0.1:8080"
secret_token: "s3cr3t"
log:
  level: debug
  json: true
routes:
  - path: /deploy
    command: /opt/deploy.sh
  - path: /restart
    command: /opt/restart.sh
"#;

    #[test]
    fn test_parse_sample() {
        let config: Config = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8080");
        assert_eq!(config.secret_token, "s3cr3t");
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].path, "/deploy");
        assert_eq!(config.routes[0].command, "/opt/deploy.sh");
    }

    #[test]
    fn test_log_defaults() {
        let yaml = r#"
listen_addr: "127.0.0.1:8080"
secret_token: "s3cr3t"
routes:
  - path: /deploy
    command: /opt/deploy.sh
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.log.level, "info");
        assert!(!config.log.json);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.routes.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/config.yaml")).is_err());
    }

    #[test]
    fn test_load_malformed_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"listen_addr: [unclosed").unwrap();

        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_validate_empty_secret() {
        let yaml = r#"
listen_addr: "127.0.0.1:8080"
secret_token: ""
routes:
  - path: /deploy
    command: /opt/deploy.sh
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_no_routes() {
        let yaml = r#"
listen_addr: "127.0.0.1:8080"
secret_token: "s3cr3t"
routes: []
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_relative_path() {
        let yaml = r#"
listen_addr: "127.0.0.1:8080"
secret_token: "s3cr3t"
routes:
  - path: deploy
    command: /opt/deploy.sh
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        env::set_var(SECRET_ENV_VAR, "from-env");
        let config = Config::load(file.path()).unwrap();
        env::remove_var(SECRET_ENV_VAR);

        assert_eq!(config.secret_token, "from-env");
    }
}
