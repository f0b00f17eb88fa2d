use std::collections::HashMap;

use url::Url;

use crate::error::DecodeError;
use crate::models::{non_empty, ProxyRecord};
use crate::utils::url::url_decode;

/// Parse a Trojan link into a [`ProxyRecord`].
///
/// Format: `trojan://password@host[:port][?sni=..][#remark]`. The port
/// defaults to 443 and the SNI to the host.
pub fn explode_trojan(trojan: &str) -> Result<ProxyRecord, DecodeError> {
    let body = trojan
        .strip_prefix("trojan://")
        .ok_or_else(|| DecodeError::UnsupportedScheme(trojan.to_string()))?;
    let authority = body.split(['?', '#']).next().unwrap_or_default();
    if !authority.contains('@') {
        return Err(DecodeError::MalformedUri(format!(
            "missing '@' in trojan link: {}",
            trojan
        )));
    }

    let url = Url::parse(trojan).map_err(|e| DecodeError::MalformedUri(e.to_string()))?;
    let (host, port) = url_server(&url, 443)?;

    // A raw ':' in the password ends up split across username and password
    let mut password = url_decode(url.username());
    if let Some(rest) = url.password() {
        password.push(':');
        password.push_str(&url_decode(rest));
    }
    if password.is_empty() {
        return Err(DecodeError::MissingField("password"));
    }

    let params = query_params(&url);
    // "peer" is the older spelling of "sni"
    let sni = params
        .get("sni")
        .or_else(|| params.get("peer"))
        .and_then(|s| non_empty(s.as_str()))
        .unwrap_or_else(|| host.clone());

    let remark = url.fragment().map(url_decode).unwrap_or_default();

    let mut record =
        ProxyRecord::trojan(host, port, Some(&password), Some(&sni)).with_name(remark);
    record.source = params.get("group").and_then(|g| non_empty(g.as_str()));
    Ok(record)
}

/// Extracts host (without IPv6 brackets) and port from a parsed URL.
///
/// Hosts of non-special schemes stay percent-encoded in [`Url`], so they are
/// decoded here to match what `ss://` yields for the same server.
pub(super) fn url_server(url: &Url, default_port: u16) -> Result<(String, u16), DecodeError> {
    let host = url
        .host_str()
        .map(|h| {
            let h = h
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .unwrap_or(h);
            url_decode(h)
        })
        .filter(|h| !h.is_empty())
        .ok_or_else(|| DecodeError::MalformedUri(format!("unparsable host in {}", url)))?;

    let port = url.port().unwrap_or(default_port);
    if port == 0 {
        return Err(DecodeError::InvalidNumericField("port"));
    }
    Ok((host, port))
}

pub(super) fn query_params(url: &Url) -> HashMap<String, String> {
    url.query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::models::{ProtocolSettings, TrojanSettings};

    use super::*;

    fn settings(record: &ProxyRecord) -> &TrojanSettings {
        match &record.settings {
            ProtocolSettings::Trojan(t) => t,
            other => panic!("unexpected settings {:?}", other),
        }
    }

    #[test]
    fn test_explode_trojan_defaults() {
        let record = explode_trojan("trojan://secret@t.example.com").unwrap();
        assert_eq!(record.host, "t.example.com");
        assert_eq!(record.port, 443);
        assert_eq!(settings(&record).password.as_deref(), Some("secret"));
        assert_eq!(settings(&record).sni.as_deref(), Some("t.example.com"));
    }

    #[test]
    fn test_explode_trojan_full() {
        let record = explode_trojan(
            "trojan://p%40ss@1.2.3.4:8443?sni=front.example.com&group=provider#Hong%20Kong",
        )
        .unwrap();
        assert_eq!(record.port, 8443);
        assert_eq!(record.name, "Hong Kong");
        assert_eq!(record.source.as_deref(), Some("provider"));
        assert_eq!(settings(&record).password.as_deref(), Some("p@ss"));
        assert_eq!(settings(&record).sni.as_deref(), Some("front.example.com"));
    }

    #[test]
    fn test_explode_trojan_peer_alias() {
        let record = explode_trojan("trojan://pw@1.2.3.4:443?peer=alt.example.com").unwrap();
        assert_eq!(settings(&record).sni.as_deref(), Some("alt.example.com"));
    }

    #[test]
    fn test_explode_trojan_errors() {
        assert!(matches!(
            explode_trojan("trojan://t.example.com:443"),
            Err(DecodeError::MalformedUri(_))
        ));
        assert!(matches!(
            explode_trojan("trojan://pw@:443"),
            Err(DecodeError::MalformedUri(_))
        ));
    }
}
