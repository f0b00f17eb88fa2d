use serde_json::{json, Value};

use crate::models::{
    ProtocolSettings, ProxyRecord, ShadowsocksSettings, TrojanSettings, VMessSettings,
    VlessSettings,
};
use crate::utils::base64::{base64_encode, url_safe_base64_encode};
use crate::utils::url::{format_host, url_encode};

/// Convert a record to its share URI
///
/// The output is deterministic, and decoding it with
/// [`explode`](crate::parser::explodes::explode) gives back an equal record
/// for any record the decoder can produce.
pub fn proxy_to_uri(record: &ProxyRecord) -> String {
    match &record.settings {
        ProtocolSettings::Shadowsocks(ss) => ss_uri(record, ss),
        ProtocolSettings::VMess(vmess) => vmess_uri(record, vmess),
        ProtocolSettings::Trojan(trojan) => trojan_uri(record, trojan),
        ProtocolSettings::Vless(vless) => vless_uri(record, vless),
    }
}

/// Format: ss://BASE64(method:password)@server:port[/?group=..][#remark]
fn ss_uri(record: &ProxyRecord, ss: &ShadowsocksSettings) -> String {
    let user_info = format!(
        "{}:{}",
        ss.method.as_deref().unwrap_or_default(),
        ss.password.as_deref().unwrap_or_default()
    );
    let mut uri = format!(
        "ss://{}@{}:{}",
        base64_encode(&user_info),
        format_host(&record.host),
        record.port
    );
    if let Some(group) = &record.source {
        uri.push_str("/?group=");
        uri.push_str(&url_safe_base64_encode(group));
    }
    push_remark(&mut uri, &record.name);
    uri
}

/// Format: vmess://BASE64(JSON)
fn vmess_uri(record: &ProxyRecord, vmess: &VMessSettings) -> String {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let mut fields = json!({
        "v": "2",
        "ps": record.name,
        "add": record.host,
        "port": record.port.to_string(),
        "id": text(&vmess.uuid),
        "aid": vmess.alter_id.to_string(),
        "scy": text(&vmess.security),
        "net": text(&vmess.network),
        "type": text(&vmess.header_type),
        "host": text(&vmess.host_header),
        "path": text(&vmess.path),
        "tls": if vmess.tls { "tls" } else { "" },
        "sni": text(&vmess.sni),
        "alpn": text(&vmess.alpn),
    });
    if let Some(group) = &record.source {
        fields["group"] = Value::String(group.clone());
    }

    format!("vmess://{}", base64_encode(&fields.to_string()))
}

/// Format: trojan://password@server:port[?sni=..&group=..][#remark]
fn trojan_uri(record: &ProxyRecord, trojan: &TrojanSettings) -> String {
    let mut uri = format!(
        "trojan://{}@{}:{}",
        url_encode(trojan.password.as_deref().unwrap_or_default()),
        format_host(&record.host),
        record.port
    );

    let mut params = Vec::new();
    if let Some(sni) = &trojan.sni {
        params.push(format!("sni={}", url_encode(sni)));
    }
    if let Some(group) = &record.source {
        params.push(format!("group={}", url_encode(group)));
    }
    push_query(&mut uri, &params);
    push_remark(&mut uri, &record.name);
    uri
}

/// Format: vless://uuid@server:port?type=..&security=..[&..][#remark]
fn vless_uri(record: &ProxyRecord, vless: &VlessSettings) -> String {
    let mut uri = format!(
        "vless://{}@{}:{}",
        url_encode(vless.uuid.as_deref().unwrap_or_default()),
        format_host(&record.host),
        record.port
    );

    let optional = [
        ("type", &vless.network),
        ("security", &vless.security),
        ("sni", &vless.sni),
        ("path", &vless.path),
        ("host", &vless.host_header),
        ("flow", &vless.flow),
        ("pbk", &vless.public_key),
        ("sid", &vless.short_id),
        ("fp", &vless.fingerprint),
        ("group", &record.source),
    ];
    let params: Vec<String> = optional
        .iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(|v| format!("{}={}", key, url_encode(v)))
        })
        .collect();
    push_query(&mut uri, &params);
    push_remark(&mut uri, &record.name);
    uri
}

fn push_query(uri: &mut String, params: &[String]) {
    if !params.is_empty() {
        uri.push('?');
        uri.push_str(&params.join("&"));
    }
}

fn push_remark(uri: &mut String, remark: &str) {
    if !remark.is_empty() {
        uri.push('#');
        uri.push_str(&url_encode(remark));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ss_uri_matches_share_format() {
        let record = ProxyRecord::shadowsocks(
            "1.2.3.4",
            8388,
            Some("chacha20-ietf-poly1305"),
            Some("12345678"),
        )
        .with_name("Test");
        assert_eq!(
            proxy_to_uri(&record),
            "ss://Y2hhY2hhMjAtaWV0Zi1wb2x5MTMwNToxMjM0NTY3OA==@1.2.3.4:8388#Test"
        );
    }

    #[test]
    fn test_trojan_uri_encodes_remark_and_password() {
        let record =
            ProxyRecord::trojan("t.example.com", 443, Some("p@ss word"), Some("t.example.com"))
                .with_name("New York");
        assert_eq!(
            proxy_to_uri(&record),
            "trojan://p%40ss%20word@t.example.com:443?sni=t.example.com#New%20York"
        );
    }
}
