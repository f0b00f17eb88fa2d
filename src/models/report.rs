use std::fmt;

use serde::Serialize;

/// Overall outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Passed,
    Warnings,
    Failed,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Passed => "Configuration validation passed!",
            Verdict::Warnings => "Configuration has warnings but is valid",
            Verdict::Failed => "Configuration validation failed!",
        }
    }
}

/// Findings of one validation call, in the order they were made.
///
/// The report is valid when it holds no errors; warnings and info entries do
/// not affect validity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    errors: Vec<String>,
    warnings: Vec<String>,
    info: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn info(&self) -> &[String] {
        &self.info
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        if !self.errors.is_empty() {
            Verdict::Failed
        } else if !self.warnings.is_empty() {
            Verdict::Warnings
        } else {
            Verdict::Passed
        }
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub(crate) fn note(&mut self, message: impl Into<String>) {
        self.info.push(message.into());
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sections = [
            ("ERRORS:", &self.errors),
            ("WARNINGS:", &self.warnings),
            ("INFO:", &self.info),
        ];
        for (title, entries) in sections {
            if entries.is_empty() {
                continue;
            }
            writeln!(f, "{}", title)?;
            for entry in entries {
                writeln!(f, "   - {}", entry)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}", self.verdict().message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_render_in_order() {
        let mut report = ValidationReport::new();
        report.note("Found 2 valid proxy configurations");
        report.warning("DNS server 0: consider using secure DNS (DoH/DoT)");
        report.error("No outbounds configured");

        let rendered = report.to_string();
        let errors = rendered.find("ERRORS:").unwrap();
        let warnings = rendered.find("WARNINGS:").unwrap();
        let info = rendered.find("INFO:").unwrap();
        assert!(errors < warnings && warnings < info);
        assert!(rendered.ends_with("Configuration validation failed!"));
    }

    #[test]
    fn test_verdicts() {
        let mut report = ValidationReport::new();
        assert_eq!(report.verdict(), Verdict::Passed);
        report.note("info does not change the verdict");
        assert_eq!(report.verdict(), Verdict::Passed);
        report.warning("w");
        assert_eq!(report.verdict(), Verdict::Warnings);
        assert!(report.is_valid());
        report.error("e");
        assert_eq!(report.verdict(), Verdict::Failed);
        assert!(!report.is_valid());
    }
}
