//! Reader and writer configuration
//!
//! Both structs deserialize from TOML with every field optional, so a host
//! can keep them in a `[binlog.reader]` / `[binlog.writer]` section of its
//! own config file:
//!
//! ```toml
//! [reader]
//! skip_unknown_events = true
//! skip_unknown_event_parts = true
//!
//! [writer]
//! format_version = 20
//! log_all_environment_variables = false
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::version::FormatVersion;

/// Default cap on a single record's declared length (64 MiB).
pub const DEFAULT_MAX_RECORD_LENGTH: u32 = 64 * 1024 * 1024;

/// Compatibility policy of a [`crate::BinaryLogReader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Skip records whose kind this reader has no decoder for
    pub skip_unknown_events: bool,
    /// Discard trailing bytes of known records, and resynchronize past
    /// records whose payload cannot be decoded
    pub skip_unknown_event_parts: bool,
    /// Largest declared record length accepted before the stream is treated
    /// as corrupt
    pub max_record_length: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl ReaderConfig {
    /// Fail on anything not understood. Suitable when reader and writer are
    /// the same version.
    pub fn strict() -> Self {
        Self {
            skip_unknown_events: false,
            skip_unknown_event_parts: false,
            max_record_length: DEFAULT_MAX_RECORD_LENGTH,
        }
    }

    /// Skip unknown kinds and unknown data, reporting each skip.
    pub fn lenient() -> Self {
        Self {
            skip_unknown_events: true,
            skip_unknown_event_parts: true,
            ..Self::strict()
        }
    }

    pub fn with_skip_unknown_events(mut self, skip: bool) -> Self {
        self.skip_unknown_events = skip;
        self
    }

    pub fn with_skip_unknown_event_parts(mut self, skip: bool) -> Self {
        self.skip_unknown_event_parts = skip;
        self
    }

    pub fn with_max_record_length(mut self, limit: u32) -> Self {
        self.max_record_length = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_record_length == 0 {
            return Err(ConfigError::invalid(
                "max_record_length",
                "must be greater than zero",
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

/// Output policy of a [`crate::BinaryLogWriter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Format version to emit; kinds and fields newer than this are never
    /// written
    pub format_version: FormatVersion,
    /// Oldest reader version the stream header advertises
    pub minimum_reader_version: FormatVersion,
    /// Record the full environment block of `BuildStarted`; when off the
    /// environment is written as absent
    pub log_all_environment_variables: bool,
    /// Largest payload the writer emits; keep it at or below the readers'
    /// `max_record_length`
    pub max_record_length: u32,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            format_version: FormatVersion::CURRENT,
            minimum_reader_version: FormatVersion::new(18),
            log_all_environment_variables: false,
            max_record_length: DEFAULT_MAX_RECORD_LENGTH,
        }
    }
}

impl WriterConfig {
    /// Also lowers `minimum_reader_version` when it would exceed the new
    /// version.
    pub fn with_format_version(mut self, version: impl Into<FormatVersion>) -> Self {
        self.format_version = version.into();
        self.minimum_reader_version = self.minimum_reader_version.min(self.format_version);
        self
    }

    pub fn with_minimum_reader_version(mut self, version: impl Into<FormatVersion>) -> Self {
        self.minimum_reader_version = version.into();
        self
    }

    pub fn with_log_all_environment_variables(mut self, enabled: bool) -> Self {
        self.log_all_environment_variables = enabled;
        self
    }

    pub fn with_max_record_length(mut self, limit: u32) -> Self {
        self.max_record_length = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_record_length == 0 {
            return Err(ConfigError::invalid(
                "max_record_length",
                "must be greater than zero",
            ));
        }
        if !self.format_version.is_supported() {
            return Err(ConfigError::invalid(
                "format_version",
                format!(
                    "{} is outside the writable range {}..={}",
                    self.format_version,
                    FormatVersion::MINIMUM_SUPPORTED,
                    FormatVersion::CURRENT
                ),
            ));
        }
        if self.minimum_reader_version > self.format_version {
            return Err(ConfigError::invalid(
                "minimum_reader_version",
                format!(
                    "{} is newer than format_version {}",
                    self.minimum_reader_version, self.format_version
                ),
            ));
        }
        Ok(())
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

/// Combined reader and writer settings, one TOML table each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub reader: ReaderConfig,
    pub writer: WriterConfig,
}

impl CodecConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.reader.validate()?;
        config.writer.validate()?;
        Ok(config)
    }
}
