use crate::generator::formats::single::proxy_to_uri;
use crate::models::{ProxyRecord, ProxyType};
use crate::utils::base64::base64_encode;

/// Convert records to a plain subscription: one URI per line, input order kept.
pub fn proxy_to_sub_text(records: &[ProxyRecord]) -> String {
    records
        .iter()
        .map(proxy_to_uri)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert records to a whole-document base64 subscription.
pub fn proxy_to_sub_base64(records: &[ProxyRecord]) -> String {
    base64_encode(&proxy_to_sub_text(records))
}

/// Convert records to a universal subscription
///
/// Records are grouped by protocol in [`ProxyType::UNIVERSAL_ORDER`]
/// (shadowsocks, vmess, trojan, then vless). Order within a group is kept.
/// The result is base64 encoded.
pub fn proxy_to_universal(records: &[ProxyRecord]) -> String {
    let grouped: Vec<ProxyRecord> = ProxyType::UNIVERSAL_ORDER
        .iter()
        .flat_map(|proxy_type| {
            records
                .iter()
                .filter(move |r| r.proxy_type() == *proxy_type)
                .cloned()
        })
        .collect();
    proxy_to_sub_base64(&grouped)
}

/// Keep only the records of one protocol, e.g. for a shadowsocks-only feed.
pub fn filter_protocol(records: &[ProxyRecord], proxy_type: ProxyType) -> Vec<ProxyRecord> {
    records
        .iter()
        .filter(|r| r.proxy_type() == proxy_type)
        .cloned()
        .collect()
}
