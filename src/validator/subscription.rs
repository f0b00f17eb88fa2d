use std::collections::BTreeMap;

use super::Validator;
use crate::models::{ProxyType, ValidationReport};
use crate::parser::explodes::explode_sub;

/// Longest prefix of a bad line quoted in the report.
const QUOTE_LIMIT: usize = 50;

impl Validator {
    /// Validate subscription text, plain or whole-document base64.
    ///
    /// Undecodable lines become warnings. The report only fails when no line
    /// decodes at all.
    pub fn validate_subscription(&self, content: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        let batch = explode_sub(content);

        for failure in &batch.failures {
            let quoted: String = failure.content.chars().take(QUOTE_LIMIT).collect();
            let ellipsis = if failure.content.chars().count() > QUOTE_LIMIT {
                "..."
            } else {
                ""
            };
            report.warning(format!(
                "Invalid proxy URL on line {}: {}{} ({})",
                failure.line, quoted, ellipsis, failure.error
            ));
        }

        if batch.records.is_empty() {
            report.error("No valid proxy URLs found in subscription");
            return report;
        }

        report.note(format!(
            "Found {} valid proxy configurations",
            batch.records.len()
        ));
        let mut per_protocol: BTreeMap<ProxyType, usize> = BTreeMap::new();
        for record in &batch.records {
            *per_protocol.entry(record.proxy_type()).or_default() += 1;
        }
        for (proxy_type, count) in per_protocol {
            report.note(format!("{}: {}", proxy_type, count));
        }
        report
    }
}
