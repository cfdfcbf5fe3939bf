use crate::format::Locale;
use crate::notify::ToastTimings;
use crate::validate::{self, PatternTable};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory holding project, local and user config files
pub const CONFIG_DIR: &str = ".housing-guard";

/// A validation error in the configuration
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]: {}", self.field, self.message)
    }
}

/// What to do when the role store holds no descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRolePolicy {
    /// No descriptor, no capabilities
    #[default]
    Deny,
    /// Legacy behaviour: treat the actor as a full admin
    FullAccess,
}

impl MissingRolePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "deny" => Some(Self::Deny),
            "full_access" | "full-access" | "fullaccess" => Some(Self::FullAccess),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deny => "deny",
            Self::FullAccess => "full_access",
        }
    }
}

/// Configuration for the permission gate
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PermissionsConfig {
    /// Unset means [`MissingRolePolicy::Deny`]
    #[serde(default)]
    pub missing_role: Option<MissingRolePolicy>,
    /// JSON file backing the role store
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

impl PermissionsConfig {
    pub fn missing_role(&self) -> MissingRolePolicy {
        self.missing_role.unwrap_or_default()
    }

    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| Path::new(CONFIG_DIR).join("roles.json"))
    }
}

/// Overrides for the validator pattern table; unset fields keep the built-in patterns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct PatternsConfig {
    #[serde(default)]
    pub phone: Option<Vec<String>>,
    #[serde(default)]
    pub email: Option<Vec<String>>,
    #[serde(default)]
    pub national_id: Option<Vec<String>>,
    #[serde(default)]
    pub license_plate: Option<Vec<String>>,
}

impl PatternsConfig {
    pub fn table(&self) -> PatternTable {
        let base = PatternTable::default();
        PatternTable {
            phone: self.phone.clone().unwrap_or(base.phone),
            email: self.email.clone().unwrap_or(base.email),
            national_id: self.national_id.clone().unwrap_or(base.national_id),
            license_plate: self.license_plate.clone().unwrap_or(base.license_plate),
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DisplayConfig {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub currency_symbol: Option<String>,
}

impl DisplayConfig {
    pub fn locale(&self) -> Locale {
        self.locale
            .as_deref()
            .map(Locale::from_tag)
            .unwrap_or_default()
    }

    pub fn currency_symbol(&self) -> &str {
        self.currency_symbol
            .as_deref()
            .unwrap_or(crate::format::CURRENCY_SYMBOL)
    }
}

/// Toast timings in milliseconds
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct NotificationsConfig {
    #[serde(default)]
    pub dismiss_after_ms: Option<u64>,
    #[serde(default)]
    pub fade_ms: Option<u64>,
    #[serde(default)]
    pub success_dismiss_ms: Option<u64>,
}

impl NotificationsConfig {
    pub fn alert_timings(&self) -> ToastTimings {
        let base = ToastTimings::ALERT;
        ToastTimings {
            dismiss_after: self
                .dismiss_after_ms
                .map(Duration::from_millis)
                .unwrap_or(base.dismiss_after),
            fade: self.fade_ms.map(Duration::from_millis).unwrap_or(base.fade),
        }
    }

    pub fn success_timings(&self) -> ToastTimings {
        let base = ToastTimings::SUCCESS;
        ToastTimings {
            dismiss_after: self
                .success_dismiss_ms
                .map(Duration::from_millis)
                .unwrap_or(base.dismiss_after),
            fade: base.fade,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub permissions: PermissionsConfig,
    #[serde(default)]
    pub patterns: PatternsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

impl Config {
    /// Load configuration from default paths
    /// Priority: local (.housing-guard/config.local.toml) > project (.housing-guard/config.toml)
    /// > user (~/.housing-guard/config.toml)
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(CONFIG_DIR).join("config.toml");
            if user_config.exists() {
                config.merge(Self::load_from(&user_config)?);
            }
        }

        let project_config = Path::new(CONFIG_DIR).join("config.toml");
        if project_config.exists() {
            config.merge(Self::load_from(&project_config)?);
        }

        // should be gitignored
        let local_config = Path::new(CONFIG_DIR).join("config.local.toml");
        if local_config.exists() {
            config.merge(Self::load_from(&local_config)?);
        }

        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Merge another config into this one (other takes priority for every field it sets)
    pub fn merge(&mut self, other: Config) {
        if other.permissions.missing_role.is_some() {
            self.permissions.missing_role = other.permissions.missing_role;
        }
        if other.permissions.store_path.is_some() {
            self.permissions.store_path = other.permissions.store_path;
        }

        let patterns = other.patterns;
        if patterns.phone.is_some() {
            self.patterns.phone = patterns.phone;
        }
        if patterns.email.is_some() {
            self.patterns.email = patterns.email;
        }
        if patterns.national_id.is_some() {
            self.patterns.national_id = patterns.national_id;
        }
        if patterns.license_plate.is_some() {
            self.patterns.license_plate = patterns.license_plate;
        }

        if other.display.locale.is_some() {
            self.display.locale = other.display.locale;
        }
        if other.display.currency_symbol.is_some() {
            self.display.currency_symbol = other.display.currency_symbol;
        }

        let notifications = other.notifications;
        if notifications.dismiss_after_ms.is_some() {
            self.notifications.dismiss_after_ms = notifications.dismiss_after_ms;
        }
        if notifications.fade_ms.is_some() {
            self.notifications.fade_ms = notifications.fade_ms;
        }
        if notifications.success_dismiss_ms.is_some() {
            self.notifications.success_dismiss_ms = notifications.success_dismiss_ms;
        }
    }

    /// Validate configuration and return any errors found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let table = self.patterns.table();
        for (field, patterns) in table.fields() {
            if patterns.is_empty() {
                errors.push(ValidationError {
                    field: format!("patterns.{}", field),
                    message: "At least one pattern is required".to_string(),
                });
            }
            for (i, pattern) in patterns.iter().enumerate() {
                if validate::anchored(pattern).is_err() {
                    errors.push(ValidationError {
                        field: format!("patterns.{}[{}]", field, i),
                        message: format!("Invalid regex pattern '{}'", pattern),
                    });
                }
            }
        }

        if let Some(locale) = &self.display.locale {
            if locale.trim().is_empty() {
                errors.push(ValidationError {
                    field: "display.locale".to_string(),
                    message: "Locale must not be empty".to_string(),
                });
            }
        }

        for (field, value) in [
            ("dismiss_after_ms", self.notifications.dismiss_after_ms),
            ("success_dismiss_ms", self.notifications.success_dismiss_ms),
        ] {
            if value == Some(0) {
                errors.push(ValidationError {
                    field: format!("notifications.{}", field),
                    message: "Must be greater than 0".to_string(),
                });
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
