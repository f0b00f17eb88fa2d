use crate::error::DecodeError;
use crate::models::{non_empty, ProxyRecord};
use crate::utils::base64::base64_decode;
use crate::utils::url::{split_host_port, url_decode};

/// Parse a Shadowsocks link into a [`ProxyRecord`].
///
/// Two layouts are accepted:
/// * SIP002: `ss://base64(method:password)@server:port[/?group=..][#remark]`
/// * legacy: `ss://base64(method:password@server:port)[#remark]`
pub fn explode_ss(ss: &str) -> Result<ProxyRecord, DecodeError> {
    let content = ss
        .strip_prefix("ss://")
        .ok_or_else(|| DecodeError::UnsupportedScheme(ss.to_string()))?;

    // Extract fragment (remark) if present
    let (content, remark) = match content.split_once('#') {
        Some((body, fragment)) => (body, url_decode(fragment)),
        None => (content, String::new()),
    };

    // Extract query parameters; "/?" and "?" are equivalent
    let (content, query) = match content.split_once('?') {
        Some((body, query)) => (body, Some(query)),
        None => (content, None),
    };
    // A SIP002 "host:port/" has an empty path; legacy base64 may itself end in '/'
    let content = match content.split_once('@') {
        Some(_) => content.strip_suffix('/').unwrap_or(content),
        None => content,
    };

    let mut group = None;
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key == "group" && !value.is_empty() {
                let decoded = base64_decode(&value)
                    .map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
                group = non_empty(decoded);
            }
        }
    }

    let (user_info, server_port) = match content.split_once('@') {
        Some((secret, server_port)) => {
            let user_info =
                base64_decode(secret).map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
            (user_info, server_port.to_string())
        }
        None => {
            let decoded =
                base64_decode(content).map_err(|e| DecodeError::InvalidBase64(e.to_string()))?;
            match decoded.rsplit_once('@') {
                Some((user_info, server_port)) => {
                    (user_info.to_string(), server_port.to_string())
                }
                None => {
                    return Err(DecodeError::MalformedUri(format!(
                        "missing '@' in shadowsocks link: {}",
                        ss
                    )))
                }
            }
        }
    };

    // Method and password split on the first ':'; the password may contain colons
    let (method, password) = user_info
        .split_once(':')
        .ok_or(DecodeError::MissingField("password"))?;
    if method.is_empty() {
        return Err(DecodeError::MissingField("method"));
    }
    if password.is_empty() {
        return Err(DecodeError::MissingField("password"));
    }

    let (host, port) = parse_server(&server_port)?;

    let mut record = ProxyRecord::shadowsocks(host, port, Some(method), Some(password))
        .with_name(remark);
    record.source = group;
    Ok(record)
}

/// Parses `server:port` into a non-empty host and a non-zero port.
pub(super) fn parse_server(server_port: &str) -> Result<(String, u16), DecodeError> {
    let (host, port) = split_host_port(server_port).ok_or(DecodeError::MissingField("port"))?;
    if host.is_empty() {
        return Err(DecodeError::MissingField("host"));
    }
    let port = match port.parse::<u16>() {
        Ok(p) if p != 0 => p,
        _ => return Err(DecodeError::InvalidNumericField("port")),
    };
    Ok((host, port))
}
