//! Structural and hygiene checks for sing-box documents and subscriptions.
//!
//! Every rule violation becomes an entry in the returned
//! [`ValidationReport`]; nothing in here fails or panics on bad input, and
//! the input is never modified.

mod outbound;
mod singbox;
mod subscription;

use serde_json::Value;

use crate::models::{AggregateConfig, ValidationReport};
use crate::settings::ValidatorSettings;

pub use outbound::OutboundKind;

/// Stateless validator; one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: ValidatorSettings,
}

impl Validator {
    pub fn new(rules: ValidatorSettings) -> Self {
        Validator { rules }
    }

    pub fn rules(&self) -> &ValidatorSettings {
        &self.rules
    }

    /// Validate a parsed sing-box configuration document.
    pub fn validate(&self, config: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();
        let Some(root) = config.as_object() else {
            report.error("Configuration root must be a JSON object");
            return report;
        };

        self.validate_structure(&mut report, root);
        self.validate_outbounds(&mut report, root.get("outbounds"));
        self.validate_route(&mut report, root);
        self.validate_dns(&mut report, root.get("dns"));
        report
    }

    /// Validate configuration text; unparsable JSON is reported, not returned as `Err`.
    pub fn validate_str(&self, content: &str) -> ValidationReport {
        match serde_json::from_str::<Value>(content) {
            Ok(config) => self.validate(&config),
            Err(e) => {
                let mut report = ValidationReport::new();
                report.error(format!("Failed to load configuration: {}", e));
                report
            }
        }
    }

    /// Validate a typed document, e.g. one produced by the generator.
    pub fn validate_aggregate(&self, config: &AggregateConfig) -> ValidationReport {
        match serde_json::to_value(config) {
            Ok(value) => self.validate(&value),
            Err(e) => {
                let mut report = ValidationReport::new();
                report.error(format!("Failed to serialize configuration: {}", e));
                report
            }
        }
    }
}

/// Validate a document with the default rule set.
pub fn validate(config: &Value) -> ValidationReport {
    Validator::default().validate(config)
}

/// Validate subscription text with the default rule set.
pub fn validate_subscription(content: &str) -> ValidationReport {
    Validator::default().validate_subscription(content)
}
