use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::id::MAX_REPORT_ID_DIGITS;

/// What the school does with a filed report that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvalidReportPolicy {
    /// Refuse the report and return the validation error to the filer.
    #[default]
    Reject,
    /// Drop the report without registering it. The filer is told it was
    /// discarded.
    Discard,
    /// Register the report anyway, marked as invalid.
    Flag,
}

/// Configuration for the reporting workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// The number of digits in generated report ids.
    ///
    /// Digits are padded to this width with leading zeros, e.g. `R001`
    /// (3 digits) or `R0001` (4 digits).
    report_id_digits: usize,

    /// How invalid reports are handled when filed.
    pub invalid_reports: InvalidReportPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_id_digits: default_digits(),
            invalid_reports: InvalidReportPolicy::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Returns the number of digits for padding report ids.
    #[must_use]
    pub const fn report_id_digits(&self) -> usize {
        self.report_id_digits
    }

    /// Sets the number of digits for padding report ids.
    ///
    /// The width is clamped to `1..=9`.
    pub fn set_report_id_digits(&mut self, digits: usize) {
        self.report_id_digits = clamp_digits(digits);
    }

    /// Returns a copy of this configuration with a different invalid-report
    /// policy.
    #[must_use]
    pub const fn with_invalid_reports(mut self, policy: InvalidReportPolicy) -> Self {
        self.invalid_reports = policy;
        self
    }
}

const fn default_digits() -> usize {
    3
}

fn clamp_digits(digits: usize) -> usize {
    digits.clamp(1, MAX_REPORT_ID_DIGITS)
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_digits")]
        report_id_digits: usize,

        #[serde(default)]
        invalid_reports: InvalidReportPolicy,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                report_id_digits,
                invalid_reports,
            } => Self {
                report_id_digits: clamp_digits(report_id_digits),
                invalid_reports,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            report_id_digits: config.report_id_digits,
            invalid_reports: config.invalid_reports,
        }
    }
}
