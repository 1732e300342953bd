use serde::{Deserialize, Serialize};

/// Root configuration, maps to `blade.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeConfig {
    pub blade: BladeSection,
    pub schedule: ScheduleConfig,
    pub remote: RemoteConfig,
    pub behaviors: BehaviorsConfig,
    pub logging: LoggingConfig,
}

// ── Blade ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeSection {
    /// Identity of this instance. Messages whose origin equals it belong to us.
    pub name: String,
    /// Run the start phase as soon as the service is constructed.
    pub auto_start: bool,
}

impl Default for BladeSection {
    fn default() -> Self {
        Self {
            name: "blade".into(),
            auto_start: true,
        }
    }
}

// ── Schedule ───────────────────────────────────────────────────

/// Periods of the three independent triggers, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub update_ms: u64,
    pub status_log_ms: u64,
    /// Delay between the end of one poll and the start of the next.
    pub remote_poll_ms: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            update_ms: 100,
            status_log_ms: 90_000,
            remote_poll_ms: 2_000,
        }
    }
}

// ── Remote ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Bulk list of pending requests, all blades.
    pub requests_url: String,
    /// Bulk list of pending responses, all blades. Responses are POSTed here too.
    pub responses_url: String,
    /// Per-request timeout. 0 = client default (none).
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            requests_url: "https://jarvislinker.azurewebsites.net/api/BladeCommands".into(),
            responses_url: "https://jarvislinker.azurewebsites.net/api/BladeResponses".into(),
            timeout_secs: 30,
        }
    }
}

// ── Behaviors ──────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorsConfig {
    /// Behaviors that are registered but start with their switch off.
    pub disabled: Vec<String>,
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

// ── Validation ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
        };
        write!(f, "{label}: {}: {}", self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, " ({h})")?;
        }
        Ok(())
    }
}

/// Update periods below this are legal but will hammer the behaviors.
const MIN_SANE_UPDATE_MS: u64 = 10;
/// Poll periods below this hammer the coordination service.
const MIN_SANE_POLL_MS: u64 = 250;

impl BladeConfig {
    /// Check the config for problems. Returns the non-fatal warnings, or an
    /// `Err` listing every hard error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Identity ───
        if self.blade.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                field: "blade.name".into(),
                message: "name is empty".into(),
                severity: WarningSeverity::Error,
                hint: Some("Messages are matched to this blade by name".into()),
            });
        }

        // ── Intervals ───
        let intervals = [
            ("schedule.update_ms", self.schedule.update_ms, MIN_SANE_UPDATE_MS),
            ("schedule.status_log_ms", self.schedule.status_log_ms, MIN_SANE_UPDATE_MS),
            ("schedule.remote_poll_ms", self.schedule.remote_poll_ms, MIN_SANE_POLL_MS),
        ];
        for (field, value, floor) in intervals {
            if value == 0 {
                warnings.push(ConfigWarning {
                    field: field.into(),
                    message: "interval is 0".into(),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            } else if value < floor {
                warnings.push(ConfigWarning {
                    field: field.into(),
                    message: format!("interval {value}ms is very short"),
                    severity: WarningSeverity::Warning,
                    hint: Some(format!("Consider at least {floor}ms")),
                });
            }
        }

        // ── Remote URLs ───
        for (field, url) in [
            ("remote.requests_url", &self.remote.requests_url),
            ("remote.responses_url", &self.remote.responses_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                warnings.push(ConfigWarning {
                    field: field.into(),
                    message: format!("'{url}' is not an http(s) URL"),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
            }
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
