//! Connection-scoped compiler configuration.
//!
//! Settings are read once (TOML file or builder) and handed to
//! [`OracleCompiler`](crate::transpiler::OracleCompiler) at construction.
//! Nothing here is mutated while statements are being compiled.

use crate::error::{OracleError, OracleResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory by [`OracleConfig::discover`].
pub const LOCAL_CONFIG_FILE: &str = "qail-oracle.toml";

/// How unquoted identifiers are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentifierCase {
    /// Leave identifiers exactly as written. Oracle folds them to upper case.
    #[default]
    Preserve,
    /// Upper-case every unquoted identifier.
    Upper,
}

/// Oracle compiler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Owner injected ahead of every table reference
    #[serde(default)]
    pub schema_prefix: Option<String>,

    /// Prefix applied to table names and derived object names
    #[serde(default)]
    pub table_prefix: String,

    /// Maximum identifier length (30 before 12.2, 128 after)
    #[serde(default = "default_max_identifier_length")]
    pub max_identifier_length: usize,

    #[serde(default)]
    pub identifier_case: IdentifierCase,

    /// NLS_DATE_FORMAT
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// NLS_TIMESTAMP_FORMAT
    #[serde(default = "default_date_format")]
    pub timestamp_format: String,

    /// NLS_TIMESTAMP_TZ_FORMAT
    #[serde(default = "default_timestamp_tz_format")]
    pub timestamp_tz_format: String,

    /// Extra `ALTER SESSION` options
    #[serde(default)]
    pub session_vars: BTreeMap<String, String>,
}

fn default_max_identifier_length() -> usize {
    30
}

fn default_date_format() -> String {
    "YYYY-MM-DD HH24:MI:SS".to_string()
}

fn default_timestamp_tz_format() -> String {
    "YYYY-MM-DD HH24:MI:SS TZH:TZM".to_string()
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            schema_prefix: None,
            table_prefix: String::new(),
            max_identifier_length: default_max_identifier_length(),
            identifier_case: IdentifierCase::Preserve,
            date_format: default_date_format(),
            timestamp_format: default_date_format(),
            timestamp_tz_format: default_timestamp_tz_format(),
            session_vars: BTreeMap::new(),
        }
    }
}

impl OracleConfig {
    /// Create a new configuration builder
    pub fn builder() -> OracleConfigBuilder {
        OracleConfigBuilder::default()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> OracleResult<Self> {
        let config: OracleConfig =
            toml::from_str(content).map_err(|e| OracleError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> OracleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!("loaded config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Look for `./qail-oracle.toml`, then the user config directory.
    /// Falls back to defaults when neither exists.
    pub fn discover() -> OracleResult<Self> {
        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Self::load(candidate);
            }
        }
        Ok(Self::default())
    }

    /// Candidate config locations in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("qail-oracle").join("config.toml"));
        }
        paths
    }

    /// Reject settings Oracle cannot honour.
    pub fn validate(&self) -> OracleResult<()> {
        if !matches!(self.max_identifier_length, 30 | 128) {
            return Err(OracleError::Config(format!(
                "max_identifier_length must be 30 or 128, got {}",
                self.max_identifier_length
            )));
        }
        if self
            .schema_prefix
            .as_deref()
            .is_some_and(|schema| schema.trim().is_empty())
        {
            return Err(OracleError::Config(
                "schema_prefix cannot be blank".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for OracleConfig
#[derive(Debug, Default)]
pub struct OracleConfigBuilder {
    config: OracleConfig,
}

impl OracleConfigBuilder {
    /// Set the schema prefix
    pub fn schema_prefix(mut self, schema: impl Into<String>) -> Self {
        self.config.schema_prefix = Some(schema.into());
        self
    }

    /// Set the table prefix
    pub fn table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.table_prefix = prefix.into();
        self
    }

    /// Set the maximum identifier length
    pub fn max_identifier_length(mut self, len: usize) -> Self {
        self.config.max_identifier_length = len;
        self
    }

    /// Set the identifier case policy
    pub fn identifier_case(mut self, case: IdentifierCase) -> Self {
        self.config.identifier_case = case;
        self
    }

    /// Add an `ALTER SESSION` option
    pub fn session_var(mut self, option: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.session_vars.insert(option.into(), value.into());
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> OracleResult<OracleConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
