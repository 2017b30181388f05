//! Plan configuration parsed from environment variables.
//!
//! Every setting can be overridden via environment variables prefixed with
//! `BDD_PLAN_`. Lookups go through [`PlanConfig::from_lookup`] so callers can
//! supply values from any source without touching the process environment.

use std::env;
use std::str::FromStr;

use bdd_plan_gherkin::DEFAULT_LANGUAGE;

use crate::error::PlanError;

/// Default pattern a tag must fully match to be used as a node id.
pub const DEFAULT_ID_TAG_PATTERN: &str = "ID-(.*)";
/// Default tag marking business-readable scenarios.
pub const DEFAULT_DEFINITION_TAG: &str = "definition";
/// Default tag marking technical scenarios.
pub const DEFAULT_IMPLEMENTATION_TAG: &str = "implementation";
/// Default property holding the step map of an implementation scenario.
pub const DEFAULT_STEP_MAP_PROPERTY: &str = "redefinition.stepMap";

const LOG_LEVEL_VAR: &str = "BDD_PLAN_LOG_LEVEL";
const ID_TAG_PATTERN_VAR: &str = "BDD_PLAN_ID_TAG_PATTERN";
const TAG_FILTER_VAR: &str = "BDD_PLAN_TAG_FILTER";
const DEFAULT_LANGUAGE_VAR: &str = "BDD_PLAN_DEFAULT_LANGUAGE";
const REDEFINITION_ENABLED_VAR: &str = "BDD_PLAN_REDEFINITION_ENABLED";
const DEFINITION_TAG_VAR: &str = "BDD_PLAN_DEFINITION_TAG";
const IMPLEMENTATION_TAG_VAR: &str = "BDD_PLAN_IMPLEMENTATION_TAG";
const STEP_MAP_PROPERTY_VAR: &str = "BDD_PLAN_STEP_MAP_PROPERTY";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Info` when not specified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Most verbose logging, includes all trace spans.
    Trace,
    /// Debug-level information for development.
    Debug,
    /// Standard informational messages.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for failures.
    Error,
}

impl FromStr for LogLevel {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(PlanError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Settings of the redefinition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedefinitionConfig {
    /// Whether definition and implementation scenarios are merged at all.
    pub enabled: bool,
    /// Tag (without `@`) marking definition scenarios.
    pub definition_tag: String,
    /// Tag (without `@`) marking implementation scenarios.
    pub implementation_tag: String,
    /// Property key holding the step map of an implementation scenario.
    pub step_map_property: String,
}

impl Default for RedefinitionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            definition_tag: DEFAULT_DEFINITION_TAG.to_string(),
            implementation_tag: DEFAULT_IMPLEMENTATION_TAG.to_string(),
            step_map_property: DEFAULT_STEP_MAP_PROPERTY.to_string(),
        }
    }
}

/// Configuration for plan compilation.
///
/// # Environment Variables
///
/// - `BDD_PLAN_LOG_LEVEL`: log level (trace, debug, info, warn, error)
/// - `BDD_PLAN_ID_TAG_PATTERN`: regular expression a tag must fully match to
///   become a node id; empty disables ids
/// - `BDD_PLAN_TAG_FILTER`: tag expression selecting scenarios
/// - `BDD_PLAN_DEFAULT_LANGUAGE`: dialect for documents without a header
/// - `BDD_PLAN_REDEFINITION_ENABLED`: `true`/`false`, `1`/`0`, `yes`/`no`,
///   `on`/`off`
/// - `BDD_PLAN_DEFINITION_TAG`, `BDD_PLAN_IMPLEMENTATION_TAG`: redefinition
///   tags, with or without a leading `@`
/// - `BDD_PLAN_STEP_MAP_PROPERTY`: property key of step maps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanConfig {
    /// Log level used by [`crate::logging::init_logging`].
    pub log_level: LogLevel,
    /// Pattern a tag must fully match to give its node an id.
    pub id_tag_pattern: Option<String>,
    /// Tag expression selecting scenarios and outlines.
    pub tag_filter: Option<String>,
    /// Dialect for documents without a `# language:` header.
    pub default_language: String,
    /// Redefinition settings.
    pub redefinition: RedefinitionConfig,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            id_tag_pattern: Some(DEFAULT_ID_TAG_PATTERN.to_string()),
            tag_filter: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            redefinition: RedefinitionConfig::default(),
        }
    }
}

impl PlanConfig {
    /// Load configuration from environment variables.
    ///
    /// Falls back to defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, PlanError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvalidConfig` if a value is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PlanError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_LEVEL_VAR) {
            config.log_level = level.parse()?;
        }

        if let Some(pattern) = lookup(ID_TAG_PATTERN_VAR) {
            config.id_tag_pattern = non_empty(pattern);
        }

        if let Some(filter) = lookup(TAG_FILTER_VAR) {
            config.tag_filter = non_empty(filter);
        }

        if let Some(language) = lookup(DEFAULT_LANGUAGE_VAR) {
            config.default_language = language.trim().to_string();
        }

        if let Some(enabled) = lookup(REDEFINITION_ENABLED_VAR) {
            config.redefinition.enabled = parse_env_bool(&enabled).ok_or_else(|| {
                PlanError::InvalidConfig(format!(
                    "invalid {REDEFINITION_ENABLED_VAR} value '{enabled}', expected a boolean"
                ))
            })?;
        }

        if let Some(tag) = lookup(DEFINITION_TAG_VAR) {
            config.redefinition.definition_tag = tag_name(DEFINITION_TAG_VAR, &tag)?;
        }

        if let Some(tag) = lookup(IMPLEMENTATION_TAG_VAR) {
            config.redefinition.implementation_tag = tag_name(IMPLEMENTATION_TAG_VAR, &tag)?;
        }

        if let Some(property) = lookup(STEP_MAP_PROPERTY_VAR) {
            let property = property.trim();
            if property.is_empty() {
                return Err(PlanError::InvalidConfig(format!(
                    "{STEP_MAP_PROPERTY_VAR} must not be empty"
                )));
            }
            config.redefinition.step_map_property = property.to_string();
        }

        Ok(config)
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for caller-supplied values that should take
    /// precedence over environment-based defaults.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        tag_filter: Option<String>,
        redefinition_enabled: Option<bool>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }

        if let Some(filter) = tag_filter {
            self.tag_filter = non_empty(filter);
        }

        if let Some(enabled) = redefinition_enabled {
            self.redefinition.enabled = enabled;
        }

        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Create a new configuration with the specified id tag pattern.
    #[must_use]
    pub fn with_id_tag_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.id_tag_pattern = non_empty(pattern.into());
        self
    }

    /// Create a new configuration with the specified tag filter.
    #[must_use]
    pub fn with_tag_filter(mut self, expression: impl Into<String>) -> Self {
        self.tag_filter = non_empty(expression.into());
        self
    }

    /// Create a new configuration with the specified default language.
    #[must_use]
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    /// Create a new configuration with the specified redefinition settings.
    #[must_use]
    pub fn with_redefinition(mut self, redefinition: RedefinitionConfig) -> Self {
        self.redefinition = redefinition;
        self
    }
}

fn parse_env_bool(value: &str) -> Option<bool> {
    match value.trim() {
        "1" | "true" | "TRUE" | "True" | "yes" | "YES" | "Yes" | "on" | "ON" | "On" => Some(true),
        "0" | "false" | "FALSE" | "False" | "no" | "NO" | "No" | "off" | "OFF" | "Off" => {
            Some(false)
        }
        _ => None,
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn tag_name(variable: &str, value: &str) -> Result<String, PlanError> {
    let name = value.trim().trim_start_matches('@');
    if name.is_empty() || name.contains(char::is_whitespace) {
        return Err(PlanError::InvalidConfig(format!(
            "invalid {variable} value '{value}', expected a single tag"
        )));
    }
    Ok(name.to_string())
}
