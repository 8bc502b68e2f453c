use crate::destination::RotationPolicy;
use crate::error::{LogRouteError, Result};
use crate::level::Level;
use crate::router::{LogRouter, RouteTable, DEFAULT_ROUTE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Router configuration: route table, rotation policy and default level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRouteConfig {
    /// Dotted logger-name prefix to absolute log file path; must contain "default"
    pub routes: HashMap<String, PathBuf>,

    /// Rotation settings applied to every routed file
    #[serde(default)]
    pub rotation: RotationConfig,

    /// Level given to loggers when the caller does not pick one
    #[serde(default = "default_level")]
    pub level: Level,
}

/// Rotation section of the configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Days between rotations
    #[serde(default = "default_interval_days")]
    pub interval_days: u64,

    /// Rotated files to keep (0 keeps all)
    #[serde(default)]
    pub backup_count: usize,

    /// Use UTC for rotated file suffixes
    #[serde(default)]
    pub utc: bool,
}

// Default value functions for serde
fn default_level() -> Level {
    Level::Debug
}

fn default_interval_days() -> u64 {
    7
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            interval_days: default_interval_days(),
            backup_count: 0,
            utc: false,
        }
    }
}

impl Default for LogRouteConfig {
    /// Built-in table: everything to /var/log/default.log, `test.other` to /var/log/other.log
    fn default() -> Self {
        let mut routes = HashMap::new();
        routes.insert(DEFAULT_ROUTE.to_string(), PathBuf::from("/var/log/default.log"));
        routes.insert("test.other".to_string(), PathBuf::from("/var/log/other.log"));
        Self {
            routes,
            rotation: RotationConfig::default(),
            level: default_level(),
        }
    }
}

impl LogRouteConfig {
    /// Load configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LogRouteError::ConfigError(format!("Failed to read config file: {}", e)))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(LogRouteError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.expand_env_vars();
        config.validate()?;

        tracing::debug!(
            "Loaded {} routes from {}",
            config.routes.len(),
            path.display()
        );

        Ok(config)
    }

    fn parse_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| LogRouteError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    fn parse_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents)
            .map_err(|e| LogRouteError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.routes.contains_key(DEFAULT_ROUTE) {
            return Err(LogRouteError::MissingDefaultRoute);
        }

        for (key, path) in &self.routes {
            if !path.is_absolute() {
                return Err(LogRouteError::ConfigValidationError(format!(
                    "Route {} must use an absolute path, got {}",
                    key,
                    path.display()
                )));
            }
        }

        if self.rotation.interval_days == 0 {
            return Err(LogRouteError::ConfigValidationError(
                "rotation.interval_days must be at least 1".to_string(),
            ));
        }

        if RotationPolicy::checked_every_days(self.rotation.interval_days).is_none() {
            return Err(LogRouteError::ConfigValidationError(format!(
                "rotation.interval_days is out of range: {}",
                self.rotation.interval_days
            )));
        }

        Ok(())
    }

    /// Expand `$VAR` and `${VAR}` in route paths
    fn expand_env_vars(&mut self) {
        self.routes = self
            .routes
            .iter()
            .map(|(key, path)| (key.clone(), Self::expand_env_in_path(path)))
            .collect();
    }

    /// Expand environment variables in a string
    ///
    /// A name is the longest run of `[A-Za-z0-9_]` after `$`, or the text
    /// between `${` and `}`. Unset variables are left as written.
    fn expand_env_in_string(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;

        while let Some(dollar) = rest.find('$') {
            result.push_str(&rest[..dollar]);
            let after = &rest[dollar + 1..];

            // (variable name, bytes of `after` it occupies)
            let (name, consumed) = match after.strip_prefix('{') {
                Some(braced) => match braced.find('}') {
                    Some(end) if is_env_name(&braced[..end]) => (&braced[..end], end + 2),
                    _ => ("", 0),
                },
                None => {
                    let end = after
                        .find(|c: char| !is_env_name_char(c))
                        .unwrap_or(after.len());
                    (&after[..end], end)
                }
            };

            match std::env::var(name).ok().filter(|_| !name.is_empty()) {
                Some(value) => result.push_str(&value),
                None => {
                    result.push('$');
                    result.push_str(&after[..consumed]);
                }
            }
            rest = &after[consumed..];
        }

        result.push_str(rest);
        result
    }

    fn expand_env_in_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        PathBuf::from(Self::expand_env_in_string(&path_str))
    }

    pub fn route_table(&self) -> Result<RouteTable> {
        RouteTable::new(self.routes.clone())
    }

    pub fn rotation_policy(&self) -> RotationPolicy {
        RotationPolicy::every_days(self.rotation.interval_days)
            .with_backup_count(self.rotation.backup_count)
            .with_utc(self.rotation.utc)
    }

    /// Validate and build a router from this configuration
    pub fn build_router(&self) -> Result<LogRouter> {
        self.validate()?;
        Ok(LogRouter::new(self.route_table()?, self.rotation_policy()))
    }
}

fn is_env_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_env_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(is_env_name_char)
}
