use url::Url;
use uuid::Uuid;

use super::trojan::{query_params, url_server};
use crate::error::DecodeError;
use crate::models::{non_empty, ProxyRecord, VlessSettings};
use crate::utils::url::url_decode;

/// Parse a VLESS link into a [`ProxyRecord`].
///
/// Format: `vless://uuid@host:port?type=ws&security=tls&sni=..&path=..&host=..&flow=..#remark`.
/// REALITY links add `pbk`, `sid` and `fp`.
pub fn explode_vless(vless: &str) -> Result<ProxyRecord, DecodeError> {
    let body = vless
        .strip_prefix("vless://")
        .ok_or_else(|| DecodeError::UnsupportedScheme(vless.to_string()))?;
    let authority = body.split(['?', '#']).next().unwrap_or_default();
    if !authority.contains('@') {
        return Err(DecodeError::MalformedUri(format!(
            "missing '@' in vless link: {}",
            vless
        )));
    }

    let url = Url::parse(vless).map_err(|e| DecodeError::MalformedUri(e.to_string()))?;
    let (host, port) = url_server(&url, 443)?;

    let id = url_decode(url.username());
    if id.is_empty() {
        return Err(DecodeError::MissingField("uuid"));
    }
    Uuid::parse_str(&id).map_err(|_| DecodeError::InvalidUuid(id.clone()))?;

    let params = query_params(&url);
    let param = |key: &str| params.get(key).and_then(|v| non_empty(v.as_str()));

    let settings = VlessSettings {
        uuid: Some(id),
        flow: param("flow"),
        network: Some(param("type").unwrap_or_else(|| "tcp".to_string())),
        host_header: param("host"),
        path: param("path"),
        security: Some(param("security").unwrap_or_else(|| "none".to_string())),
        sni: param("sni"),
        public_key: param("pbk"),
        short_id: param("sid"),
        fingerprint: param("fp"),
    };

    let remark = url.fragment().map(url_decode).unwrap_or_default();
    let mut record = ProxyRecord::vless(host, port, settings).with_name(remark);
    record.source = param("group");
    Ok(record)
}
