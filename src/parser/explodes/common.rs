use log::{debug, warn};

use super::{explode_ss, explode_trojan, explode_vless, explode_vmess};
use crate::error::DecodeError;
use crate::models::{ProxyRecord, ProxyType};
use crate::utils::base64::base64_decode;

/// Explode a proxy link into a [`ProxyRecord`]
///
/// This function detects the scheme of the link and calls the matching parser.
pub fn explode(link: &str) -> Result<ProxyRecord, DecodeError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(DecodeError::MalformedUri("empty link".to_string()));
    }

    match ProxyType::from_link(link) {
        Some(ProxyType::Shadowsocks) => explode_ss(link),
        Some(ProxyType::VMess) => explode_vmess(link),
        Some(ProxyType::Trojan) => explode_trojan(link),
        Some(ProxyType::Vless) => explode_vless(link),
        None => match link.split_once("://") {
            Some((scheme, _)) => Err(DecodeError::UnsupportedScheme(scheme.to_string())),
            None => Err(DecodeError::MalformedUri(link.to_string())),
        },
    }
}

/// One subscription line that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFailure {
    /// 1-based line number within the (decoded) subscription text
    pub line: usize,
    pub content: String,
    pub error: DecodeError,
}

/// Result of decoding a whole subscription: every line is tried independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionBatch {
    pub records: Vec<ProxyRecord>,
    pub failures: Vec<LineFailure>,
}

impl SubscriptionBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.failures.is_empty()
    }

    /// Number of non-blank lines that were examined.
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len()
    }
}

/// Explode a subscription into records
///
/// The content may be plain newline separated links or the whole document
/// base64 encoded. Blank lines are skipped; every other line either yields a
/// record or a [`LineFailure`], and decoding never stops early.
pub fn explode_sub(sub: &str) -> SubscriptionBatch {
    let content = unwrap_subscription(sub);
    let mut batch = SubscriptionBatch::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match explode(line) {
            Ok(record) => batch.records.push(record),
            Err(error) => {
                warn!("Skipping line {}: {}", index + 1, error);
                batch.failures.push(LineFailure {
                    line: index + 1,
                    content: line.to_string(),
                    error,
                });
            }
        }
    }

    debug!(
        "Decoded {} of {} subscription entries",
        batch.records.len(),
        batch.total()
    );
    batch
}

/// Returns the plain-text form of a subscription.
///
/// Text that already contains a scheme separator is taken as plain. Anything
/// else is tried as whole-document base64, and kept as is unless the decoded
/// text contains links.
pub fn unwrap_subscription(sub: &str) -> String {
    let trimmed = sub.trim();
    if trimmed.contains("://") {
        return trimmed.to_string();
    }
    // Line-wrapped base64 is common; drop the breaks before decoding
    let joined: String = trimmed.split_whitespace().collect();
    match base64_decode(&joined) {
        Ok(decoded) if decoded.contains("://") => decoded,
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explode_unsupported_scheme() {
        assert_eq!(
            explode("ssr://abc"),
            Err(DecodeError::UnsupportedScheme("ssr".to_string()))
        );
        assert!(matches!(explode("garbage"), Err(DecodeError::MalformedUri(_))));
    }

    #[test]
    fn test_explode_sub_keeps_going() {
        let sub = "\
ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNToxMjM0NTY3OA==@1.2.3.4:8388#A

not a link
trojan://pw@t.example.com:443#B
";
        let batch = explode_sub(sub);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].line, 3);
        assert_eq!(batch.failures[0].content, "not a link");
    }
}
