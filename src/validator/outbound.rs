//! Per-outbound protocol rules.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::Validator;
use crate::models::ValidationReport;
use crate::utils::base64::base64_decode_bytes;

static SHORT_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9a-f]{0,16}$").unwrap());

/// Outbound `type` discriminator.
///
/// Unknown strings are kept so the report can name them; they only ever
/// produce a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundKind<'a> {
    Vmess,
    Vless,
    Shadowsocks,
    Trojan,
    Hysteria,
    Tuic,
    Direct,
    Block,
    Dns,
    Unknown(&'a str),
}

impl<'a> OutboundKind<'a> {
    pub fn parse(type_name: &'a str) -> Self {
        match type_name {
            "vmess" => OutboundKind::Vmess,
            "vless" => OutboundKind::Vless,
            "shadowsocks" => OutboundKind::Shadowsocks,
            "trojan" => OutboundKind::Trojan,
            "hysteria" => OutboundKind::Hysteria,
            "tuic" => OutboundKind::Tuic,
            "direct" => OutboundKind::Direct,
            "block" => OutboundKind::Block,
            "dns" => OutboundKind::Dns,
            other => OutboundKind::Unknown(other),
        }
    }

    /// Label used at the start of report entries.
    fn label(self) -> &'static str {
        match self {
            OutboundKind::Vmess => "VMess",
            OutboundKind::Vless => "VLESS",
            OutboundKind::Shadowsocks => "Shadowsocks",
            OutboundKind::Trojan => "Trojan",
            OutboundKind::Hysteria => "Hysteria",
            OutboundKind::Tuic => "TUIC",
            OutboundKind::Direct
            | OutboundKind::Block
            | OutboundKind::Dns
            | OutboundKind::Unknown(_) => "Outbound",
        }
    }
}

/// Findings for one outbound object, tagged with its kind and position.
struct Scope<'r> {
    report: &'r mut ValidationReport,
    label: &'static str,
    index: usize,
}

impl Scope<'_> {
    fn error(&mut self, message: &str) {
        self.report
            .error(format!("{} outbound {}: {}", self.label, self.index, message));
    }

    fn warning(&mut self, message: &str) {
        self.report
            .warning(format!("{} outbound {}: {}", self.label, self.index, message));
    }

    fn require(&mut self, outbound: &Map<String, Value>, fields: &[&str]) {
        for field in fields {
            if !outbound.contains_key(*field) {
                self.error(&format!("missing '{}'", field));
            }
        }
    }

    fn check_uuid(&mut self, outbound: &Map<String, Value>) {
        if let Some(value) = outbound.get("uuid") {
            let valid = value
                .as_str()
                .map(|s| Uuid::parse_str(s).is_ok())
                .unwrap_or(false);
            if !valid {
                self.error("invalid UUID format");
            }
        }
    }

    fn check_server_port(&mut self, outbound: &Map<String, Value>) {
        if let Some(port) = outbound.get("server_port") {
            let valid = port
                .as_u64()
                .map(|p| (1..=65535).contains(&p))
                .unwrap_or(false);
            if !valid {
                self.error("server_port must be an integer between 1 and 65535");
            }
        }
    }
}

impl Validator {
    pub(super) fn validate_outbound(
        &self,
        report: &mut ValidationReport,
        index: usize,
        outbound: &Value,
    ) {
        let Some(outbound) = outbound.as_object() else {
            report.error(format!("Outbound {}: not an object", index));
            return;
        };
        let Some(type_value) = outbound.get("type") else {
            report.error(format!("Outbound {}: missing 'type' field", index));
            return;
        };
        let type_name = type_value.as_str().unwrap_or_default();
        let kind = OutboundKind::parse(type_name);

        let mut scope = Scope {
            report,
            label: kind.label(),
            index,
        };

        match kind {
            OutboundKind::Vmess => self.check_vmess(&mut scope, outbound),
            OutboundKind::Vless => self.check_vless(&mut scope, outbound),
            OutboundKind::Shadowsocks => self.check_shadowsocks(&mut scope, outbound),
            OutboundKind::Trojan => self.check_trojan(&mut scope, outbound),
            OutboundKind::Hysteria => check_hysteria(&mut scope, outbound),
            OutboundKind::Tuic => self.check_tuic(&mut scope, outbound),
            OutboundKind::Direct | OutboundKind::Block | OutboundKind::Dns => {}
            OutboundKind::Unknown(name) => {
                scope
                    .report
                    .warning(format!("Outbound {}: unknown type '{}'", index, name));
            }
        }
    }

    fn check_vmess(&self, scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
        scope.require(outbound, &["server", "server_port", "uuid"]);
        scope.check_server_port(outbound);
        scope.check_uuid(outbound);

        if let Some(security) = outbound.get("security").and_then(Value::as_str) {
            if !self.rules.vmess_security.iter().any(|s| s == security) {
                scope.warning(&format!("unusual security method '{}'", security));
            }
        }
        check_alter_id(scope, outbound);
        check_transport(scope, outbound);
        check_tls(scope, outbound);
    }

    fn check_vless(&self, scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
        scope.require(outbound, &["server", "server_port", "uuid"]);
        scope.check_server_port(outbound);
        scope.check_uuid(outbound);

        if let Some(flow) = outbound.get("flow").and_then(Value::as_str) {
            if !self.rules.vless_flows.iter().any(|f| f == flow) {
                scope.warning(&format!("unusual flow '{}'", flow));
            }
        }
        check_alter_id(scope, outbound);
        check_transport(scope, outbound);
        check_tls(scope, outbound);

        let reality = outbound
            .get("tls")
            .and_then(|tls| tls.get("reality"))
            .filter(|reality| is_enabled(reality));
        if let Some(reality) = reality {
            check_reality(scope, reality);
        }
    }

    fn check_shadowsocks(&self, scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
        scope.require(outbound, &["server", "server_port", "method", "password"]);
        scope.check_server_port(outbound);

        if let Some(method) = outbound.get("method") {
            let method = method.as_str().unwrap_or_default();
            if !self.rules.shadowsocks_methods.iter().any(|m| m == method) {
                scope.warning(&format!(
                    "method '{}' is not an approved AEAD cipher",
                    method
                ));
            }
        }
        if let Some(password) = outbound.get("password") {
            if char_len(password) < self.rules.shadowsocks_min_password {
                scope.warning(&format!(
                    "password too short (minimum {} characters)",
                    self.rules.shadowsocks_min_password
                ));
            }
        }
    }

    fn check_trojan(&self, scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
        scope.require(outbound, &["server", "server_port", "password"]);
        scope.check_server_port(outbound);

        if let Some(password) = outbound.get("password") {
            if char_len(password) < self.rules.trojan_min_password {
                scope.warning(&format!(
                    "password should be at least {} characters",
                    self.rules.trojan_min_password
                ));
            }
        }

        let tls_enabled = outbound.get("tls").map(is_enabled).unwrap_or(false);
        if !tls_enabled {
            scope.error("TLS must be enabled.");
        }
        check_transport(scope, outbound);
        check_tls(scope, outbound);
    }

    fn check_tuic(&self, scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
        scope.require(outbound, &["server", "server_port", "uuid", "password"]);
        scope.check_server_port(outbound);
        scope.check_uuid(outbound);

        if let Some(cc) = outbound.get("congestion_control") {
            let cc = cc.as_str().unwrap_or_default();
            if !self.rules.tuic_congestion_controls.iter().any(|c| c == cc) {
                scope.warning(&format!("unusual congestion control '{}'", cc));
            }
        }
        check_tls(scope, outbound);
    }
}

fn check_hysteria(scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
    scope.require(outbound, &["server", "server_port"]);
    scope.check_server_port(outbound);

    for key in ["up_mbps", "down_mbps"] {
        if let Some(value) = outbound.get(key) {
            let positive = value.as_f64().map(|v| v > 0.0).unwrap_or(false);
            if !positive {
                scope.warning(&format!("invalid {} value", key));
            }
        }
    }
}

fn check_alter_id(scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
    if let Some(alter_id) = outbound.get("alter_id") {
        if alter_id.as_u64() != Some(0) {
            scope.warning("alter_id should be 0 (non-zero alterId is deprecated)");
        }
    }
}

fn check_transport(scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
    let Some(transport) = outbound.get("transport") else {
        return;
    };
    let index = scope.index;
    let Some(transport_type) = transport.get("type").and_then(Value::as_str) else {
        scope
            .report
            .error(format!("Outbound {}: transport missing 'type'", index));
        return;
    };

    match transport_type {
        "ws" => {
            if transport.get("path").is_none() {
                scope
                    .report
                    .warning(format!("Outbound {}: WebSocket missing path", index));
            }
            let has_host = transport
                .get("headers")
                .and_then(|h| h.get("Host"))
                .is_some();
            if !has_host {
                scope
                    .report
                    .warning(format!("Outbound {}: WebSocket missing Host header", index));
            }
        }
        "http" => {
            if transport.get("host").is_none() {
                scope
                    .report
                    .warning(format!("Outbound {}: HTTP transport missing host", index));
            }
            if transport.get("path").is_none() {
                scope
                    .report
                    .warning(format!("Outbound {}: HTTP transport missing path", index));
            }
        }
        _ => {}
    }
}

fn check_tls(scope: &mut Scope<'_>, outbound: &Map<String, Value>) {
    let Some(tls) = outbound.get("tls").filter(|tls| is_enabled(tls)) else {
        return;
    };
    let index = scope.index;

    if tls.get("server_name").is_none() {
        scope
            .report
            .warning(format!("Outbound {}: TLS missing server_name", index));
    }

    if let Some(min_version) = tls.get("min_version").and_then(Value::as_str) {
        let too_old = min_version
            .parse::<f64>()
            .map(|v| v < 1.2)
            .unwrap_or(false);
        if too_old {
            scope
                .report
                .warning(format!("Outbound {}: TLS version too old", index));
        }
    }

    if let Some(alpn) = tls.get("alpn").and_then(Value::as_array) {
        let recommended = alpn
            .iter()
            .filter_map(Value::as_str)
            .any(|p| p == "h2" || p == "http/1.1");
        if !recommended {
            scope
                .report
                .warning(format!("Outbound {}: consider adding h2 to ALPN", index));
        }
    }
}

fn check_reality(scope: &mut Scope<'_>, reality: &Value) {
    let index = scope.index;
    for field in ["public_key", "short_id"] {
        if reality.get(field).is_none() {
            scope
                .report
                .error(format!("Reality outbound {}: missing '{}'", index, field));
        }
    }

    if let Some(key) = reality.get("public_key") {
        let valid = key
            .as_str()
            .map(|k| base64_decode_bytes(k).is_ok())
            .unwrap_or(false);
        if !valid {
            scope
                .report
                .error(format!("Reality outbound {}: invalid public key format", index));
        }
    }

    if let Some(short_id) = reality.get("short_id") {
        let valid = short_id
            .as_str()
            .map(|s| SHORT_ID.is_match(s))
            .unwrap_or(false);
        if !valid {
            scope
                .report
                .error(format!("Reality outbound {}: invalid short_id format", index));
        }
    }
}

fn is_enabled(value: &Value) -> bool {
    value.get("enabled").and_then(Value::as_bool).unwrap_or(false)
}

fn char_len(value: &Value) -> usize {
    value.as_str().map(|s| s.chars().count()).unwrap_or(0)
}
