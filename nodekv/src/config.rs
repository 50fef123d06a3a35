//! Query layer configuration.
//!
//! Configuration is loaded from environment variables, falling back to
//! defaults for anything unset. `NodeDb::from_env` loads it at startup;
//! `NodeDb::new` uses the defaults.
//!
//! # Environment Variables
//!
//! - `NODEKV_DEFAULT_PAGE_SIZE`: Page size used when a query leaves it unset (default: `10`)
//! - `NODEKV_STREAM_CAPACITY`: Records buffered between a streaming scan and its
//!   consumer (default: `1`)
//! - `NODEKV_VALUE_FILTER_MODE`: `substring` or `exact` (default: `substring`)
//!
//! # Invariants
//!
//! - `default_page_size` and `stream_capacity` are always at least 1

use std::str::FromStr;

/// How a query's field filter is checked against a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueFilterMode {
    /// Look for the literal `"field":value` bytes in the serialized record.
    ///
    /// Fast, but only approximates equality: another field's value can
    /// contain the same bytes, a number can be a prefix of a longer number,
    /// and string filters match any value starting with the given text.
    #[default]
    Substring,
    /// Parse each candidate record and compare the field for equality.
    Exact,
}

impl FromStr for ValueFilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "substring" => Ok(Self::Substring),
            "exact" => Ok(Self::Exact),
            other => Err(format!("'{other}' is not one of: substring, exact")),
        }
    }
}

/// Query layer configuration.
///
/// # Post-conditions
///
/// When constructed via `from_env()` or `default()`:
/// - `default_page_size >= 1`
/// - `stream_capacity >= 1`
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Page size applied when a query's `per_page` is zero or negative.
    pub default_page_size: usize,
    /// Capacity of the channel between a streaming scan and its consumer.
    pub stream_capacity: usize,
    /// Filter mode used when a query does not pick one itself.
    pub value_filter_mode: ValueFilterMode,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: Self::DEFAULT_PAGE_SIZE,
            stream_capacity: Self::DEFAULT_STREAM_CAPACITY,
            value_filter_mode: ValueFilterMode::default(),
        }
    }
}

impl QueryConfig {
    /// Default page size.
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    /// Default streaming channel capacity.
    pub const DEFAULT_STREAM_CAPACITY: usize = 1;

    const PAGE_SIZE_VAR: &'static str = "NODEKV_DEFAULT_PAGE_SIZE";
    const STREAM_CAPACITY_VAR: &'static str = "NODEKV_STREAM_CAPACITY";
    const FILTER_MODE_VAR: &'static str = "NODEKV_VALUE_FILTER_MODE";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not valid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but not valid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default_page_size =
            Self::load_positive(&lookup, Self::PAGE_SIZE_VAR, Self::DEFAULT_PAGE_SIZE)?;
        let stream_capacity = Self::load_positive(
            &lookup,
            Self::STREAM_CAPACITY_VAR,
            Self::DEFAULT_STREAM_CAPACITY,
        )?;
        let value_filter_mode = match lookup(Self::FILTER_MODE_VAR) {
            Some(value) => value
                .parse::<ValueFilterMode>()
                .map_err(|message| ConfigError::InvalidValue {
                    name: Self::FILTER_MODE_VAR.to_string(),
                    message,
                })?,
            None => ValueFilterMode::default(),
        };

        Ok(Self {
            default_page_size,
            stream_capacity,
            value_filter_mode,
        })
    }

    /// Load a positive integer, returning `default` if unset.
    fn load_positive(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        default: usize,
    ) -> Result<usize, ConfigError> {
        let Some(value) = lookup(name) else {
            return Ok(default);
        };
        match value.parse::<usize>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a positive integer"),
            }),
        }
    }
}
