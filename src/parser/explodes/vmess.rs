use serde_json::Value;

use crate::error::DecodeError;
use crate::models::{non_empty, ProxyRecord, VMessSettings};
use crate::utils::base64::base64_decode;

/// Parse a VMess link into a [`ProxyRecord`].
///
/// Format: `vmess://base64(JSON)` where the JSON object uses the v2rayN keys
/// `add, port, id, aid, scy, net, type, host, path, tls, sni, ps, alpn`.
/// Only `add`, `port` and `id` are required.
pub fn explode_vmess(vmess: &str) -> Result<ProxyRecord, DecodeError> {
    let encoded = vmess
        .strip_prefix("vmess://")
        .ok_or_else(|| DecodeError::UnsupportedScheme(vmess.to_string()))?;

    let decoded =
        base64_decode(encoded).map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;

    let json: Value =
        serde_json::from_str(&decoded).map_err(|e| DecodeError::InvalidJson(e.to_string()))?;
    if !json.is_object() {
        return Err(DecodeError::InvalidJson(
            "vmess payload is not a JSON object".to_string(),
        ));
    }

    let add = json_string(&json, "add").ok_or(DecodeError::MissingField("add"))?;
    let port = json_string(&json, "port").ok_or(DecodeError::MissingField("port"))?;
    let id = json_string(&json, "id").ok_or(DecodeError::MissingField("id"))?;

    let port = match port.trim().parse::<u16>() {
        Ok(p) if p != 0 => p,
        _ => return Err(DecodeError::InvalidNumericField("port")),
    };
    let alter_id = match json_string(&json, "aid") {
        Some(aid) => aid
            .trim()
            .parse::<u16>()
            .map_err(|_| DecodeError::InvalidNumericField("aid"))?,
        None => 0,
    };

    let settings = VMessSettings {
        uuid: Some(id),
        alter_id,
        security: Some(json_string(&json, "scy").unwrap_or_else(|| "auto".to_string())),
        network: Some(json_string(&json, "net").unwrap_or_else(|| "tcp".to_string())),
        header_type: json_string(&json, "type"),
        host_header: json_string(&json, "host"),
        path: Some(json_string(&json, "path").unwrap_or_else(|| "/".to_string())),
        tls: json_flag(&json, "tls"),
        sni: json_string(&json, "sni"),
        alpn: json_string(&json, "alpn"),
    };

    let mut record = ProxyRecord::vmess(add, port, settings)
        .with_name(json_string(&json, "ps").unwrap_or_default());
    record.source = json_string(&json, "group");
    Ok(record)
}

/// Reads a key as a non-empty string; numbers are accepted and stringified.
fn json_string(json: &Value, key: &str) -> Option<String> {
    match json.get(key)? {
        Value::String(s) => non_empty(s.as_str()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `tls` is `"tls"` in share links, but some producers emit booleans.
fn json_flag(json: &Value, key: &str) -> bool {
    match json.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.to_ascii_lowercase().as_str(), "tls" | "true" | "1"),
        _ => false,
    }
}
