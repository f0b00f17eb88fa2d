use proxysub::models::Verdict;
use proxysub::settings::ValidatorSettings;
use proxysub::validator::OutboundKind;
use proxysub::{validate, Validator};
use serde_json::{json, Value};

#[cfg(test)]
mod validator_tests {
    use super::*;

    /// Minimal valid document around the given outbounds.
    fn document(outbounds: Value) -> Value {
        json!({
            "inbounds": [{"type": "mixed", "listen_port": 1080}],
            "outbounds": outbounds,
            "route": {"rules": [], "final": "direct"},
            "dns": {"servers": [{"tag": "doh", "address": "https://1.1.1.1/dns-query"}]}
        })
    }

    #[test]
    fn test_trojan_without_tls() {
        let config = json!({
            "inbounds": [{"type": "mixed", "listen_port": 1080}],
            "outbounds": [{
                "type": "trojan",
                "tag": "t",
                "server": "1.2.3.4",
                "server_port": 443,
                "password": "verylongpassword123"
            }]
        });
        let report = validate(&config);
        assert_eq!(report.errors(), ["Trojan outbound 0: TLS must be enabled."]);
        assert!(!report.is_valid());
        assert_eq!(report.verdict(), Verdict::Failed);
    }

    #[test]
    fn test_vmess_bad_uuid() {
        let config = document(json!([
            {"type": "vmess", "tag": "v", "server": "a.com", "server_port": 443, "uuid": "not-a-uuid"},
            {"type": "direct", "tag": "direct"}
        ]));
        let report = validate(&config);
        assert_eq!(report.errors(), ["VMess outbound 0: invalid UUID format"]);
    }

    #[test]
    fn test_clean_document_passes() {
        let config = document(json!([
            {
                "type": "vless",
                "tag": "v",
                "server": "a.com",
                "server_port": 443,
                "uuid": "b831381d-6324-4d53-ad4f-8cda48b30811",
                "flow": "xtls-rprx-vision",
                "tls": {"enabled": true, "server_name": "a.com"}
            },
            {"type": "direct", "tag": "direct"}
        ]));
        let report = validate(&config);
        assert!(report.errors().is_empty(), "{}", report);
        assert!(report.warnings().is_empty(), "{}", report);
        assert_eq!(report.verdict(), Verdict::Passed);
        assert_eq!(report.info(), ["Checked 2 outbound(s)"]);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let config = document(json!([
            {"type": "shadowsocks", "tag": "s", "server": "a.com", "server_port": 70000,
             "method": "rc4-md5", "password": "abc"},
            {"type": "direct", "tag": "direct"},
            {"type": "block", "tag": "s"}
        ]));
        let before = config.clone();
        let first = validate(&config);
        let second = validate(&config);
        assert_eq!(first, second);
        assert_eq!(config, before);

        assert_eq!(
            first.errors(),
            ["Shadowsocks outbound 0: server_port must be an integer between 1 and 65535"]
        );
        assert_eq!(first.warnings().len(), 3);
        assert!(first
            .warnings()
            .iter()
            .any(|w| w == "Outbound 2: duplicate tag 's'"));
    }

    #[test]
    fn test_missing_sections() {
        let report = validate(&json!({}));
        assert_eq!(
            report.errors(),
            [
                "Missing required field: inbounds",
                "Missing required field: outbounds"
            ]
        );
        assert!(report
            .warnings()
            .iter()
            .any(|w| w == "No routing rules configured"));
        assert!(report
            .warnings()
            .iter()
            .any(|w| w == "No DNS configuration found"));
    }

    #[test]
    fn test_non_object_root() {
        let report = validate(&json!([1, 2, 3]));
        assert_eq!(report.errors(), ["Configuration root must be a JSON object"]);
    }

    #[test]
    fn test_empty_outbounds() {
        let report = validate(&document(json!([])));
        assert!(report.errors().iter().any(|e| e == "No outbounds configured"));
    }

    #[test]
    fn test_outbound_without_type() {
        let config = document(json!([{"tag": "x"}, {"type": "direct", "tag": "direct"}]));
        let report = validate(&config);
        assert_eq!(report.errors(), ["Outbound 0: missing 'type' field"]);
    }

    #[test]
    fn test_unknown_type_only_warns() {
        let config = document(json!([
            {"type": "wireguard", "tag": "wg"},
            {"type": "direct", "tag": "direct"}
        ]));
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings(), ["Outbound 0: unknown type 'wireguard'"]);
        assert_eq!(report.verdict(), Verdict::Warnings);
        assert_eq!(OutboundKind::parse("wireguard"), OutboundKind::Unknown("wireguard"));
    }

    #[test]
    fn test_route_targets() {
        let mut config = document(json!([{"type": "direct", "tag": "direct"}]));
        config["route"] = json!({
            "rules": [{"protocol": "dns"}, {"ip_is_private": true, "outbound": "nowhere"}],
            "final": "missing"
        });
        let report = validate(&config);
        assert_eq!(
            report.errors(),
            [
                "Routing rule 0: missing outbound",
                "Route final outbound 'missing' does not exist"
            ]
        );
        assert_eq!(
            report.warnings(),
            ["Routing rule 1: outbound 'nowhere' does not exist"]
        );
    }

    #[test]
    fn test_route_without_final() {
        let mut config = document(json!([{"type": "direct", "tag": "direct"}]));
        config["route"] = json!({"rules": []});
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings(), ["No final outbound specified in routing"]);
    }

    #[test]
    fn test_dns_servers() {
        let mut config = document(json!([{"type": "direct", "tag": "direct"}]));
        config["dns"] = json!({"servers": [
            {"tag": "plain", "address": "8.8.8.8"},
            {"tag": "broken"},
            {"tag": "doh", "address": "https://"},
            {"tag": "local", "address": "local"}
        ]});
        let report = validate(&config);
        assert_eq!(
            report.warnings(),
            ["DNS server 0: consider using secure DNS (DoH/DoT)"]
        );
        assert_eq!(
            report.errors(),
            ["DNS server 1: missing address", "DNS server 2: invalid DoH URL"]
        );

        config["dns"] = json!({"strategy": "ipv4_only"});
        let report = validate(&config);
        assert_eq!(report.warnings(), ["DNS configuration missing servers"]);
    }

    #[test]
    fn test_reality_checks() {
        let config = document(json!([
            {
                "type": "vless",
                "tag": "r",
                "server": "a.com",
                "server_port": 443,
                "uuid": "b831381d-6324-4d53-ad4f-8cda48b30811",
                "tls": {
                    "enabled": true,
                    "server_name": "a.com",
                    "reality": {"enabled": true, "public_key": "!!!", "short_id": "XYZ"}
                }
            },
            {"type": "direct", "tag": "direct"}
        ]));
        let report = validate(&config);
        assert_eq!(
            report.errors(),
            [
                "Reality outbound 0: invalid public key format",
                "Reality outbound 0: invalid short_id format"
            ]
        );
    }

    #[test]
    fn test_transport_and_tls_hygiene() {
        let config = document(json!([
            {
                "type": "vmess",
                "tag": "v",
                "server": "a.com",
                "server_port": 443,
                "uuid": "b831381d-6324-4d53-ad4f-8cda48b30811",
                "security": "auto",
                "alter_id": 64,
                "transport": {"type": "ws"},
                "tls": {"enabled": true, "min_version": "1.0", "alpn": ["h3"]}
            },
            {"type": "direct", "tag": "direct"}
        ]));
        let report = validate(&config);
        assert!(report.is_valid(), "{}", report);
        assert_eq!(
            report.warnings(),
            [
                "VMess outbound 0: alter_id should be 0 (non-zero alterId is deprecated)",
                "Outbound 0: WebSocket missing path",
                "Outbound 0: WebSocket missing Host header",
                "Outbound 0: TLS missing server_name",
                "Outbound 0: TLS version too old",
                "Outbound 0: consider adding h2 to ALPN"
            ]
        );
    }

    const UUID: &str = "b831381d-6324-4d53-ad4f-8cda48b30811";

    /// Findings for a document holding `outbound` plus a `direct` outbound.
    fn check_one(outbound: Value) -> (Vec<String>, Vec<String>) {
        let report = validate(&document(json!([outbound, {"type": "direct", "tag": "direct"}])));
        (report.errors().to_vec(), report.warnings().to_vec())
    }

    #[test]
    fn test_missing_required_fields() {
        let (errors, _) = check_one(json!({"type": "vmess", "tag": "v", "uuid": UUID}));
        assert_eq!(
            errors,
            [
                "VMess outbound 0: missing 'server'",
                "VMess outbound 0: missing 'server_port'"
            ]
        );

        let (errors, _) = check_one(json!({"type": "shadowsocks", "tag": "s", "server": "a.com"}));
        assert_eq!(
            errors,
            [
                "Shadowsocks outbound 0: missing 'server_port'",
                "Shadowsocks outbound 0: missing 'method'",
                "Shadowsocks outbound 0: missing 'password'"
            ]
        );
    }

    #[test]
    fn test_hysteria_bandwidth() {
        let (errors, warnings) = check_one(json!({
            "type": "hysteria",
            "tag": "h",
            "server": "a.com",
            "server_port": 443,
            "up_mbps": 0,
            "down_mbps": -5
        }));
        assert!(errors.is_empty());
        assert_eq!(
            warnings,
            [
                "Hysteria outbound 0: invalid up_mbps value",
                "Hysteria outbound 0: invalid down_mbps value"
            ]
        );

        let (errors, warnings) = check_one(json!({
            "type": "hysteria", "tag": "h", "server": "a.com", "server_port": 443,
            "up_mbps": 100, "down_mbps": 50
        }));
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_tuic_rules() {
        let (errors, warnings) = check_one(json!({
            "type": "tuic",
            "tag": "t",
            "server": "a.com",
            "server_port": 443,
            "uuid": "1234",
            "congestion_control": "vegas"
        }));
        assert_eq!(
            errors,
            [
                "TUIC outbound 0: missing 'password'",
                "TUIC outbound 0: invalid UUID format"
            ]
        );
        assert_eq!(warnings, ["TUIC outbound 0: unusual congestion control 'vegas'"]);

        let (errors, warnings) = check_one(json!({
            "type": "tuic", "tag": "t", "server": "a.com", "server_port": 443,
            "uuid": UUID, "password": "pw", "congestion_control": "bbr"
        }));
        assert!(errors.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_vless_flow_warning() {
        let (errors, warnings) = check_one(json!({
            "type": "vless", "tag": "v", "server": "a.com", "server_port": 443,
            "uuid": UUID, "flow": "xtls-rprx-direct"
        }));
        assert!(errors.is_empty());
        assert_eq!(warnings, ["VLESS outbound 0: unusual flow 'xtls-rprx-direct'"]);
    }

    #[test]
    fn test_vmess_security_warning() {
        let (errors, warnings) = check_one(json!({
            "type": "vmess", "tag": "v", "server": "a.com", "server_port": 443,
            "uuid": UUID, "security": "rc4"
        }));
        assert!(errors.is_empty());
        assert_eq!(warnings, ["VMess outbound 0: unusual security method 'rc4'"]);
    }

    #[test]
    fn test_http_transport_warnings() {
        let (errors, warnings) = check_one(json!({
            "type": "vmess", "tag": "v", "server": "a.com", "server_port": 443,
            "uuid": UUID, "transport": {"type": "http"}
        }));
        assert!(errors.is_empty());
        assert_eq!(
            warnings,
            [
                "Outbound 0: HTTP transport missing host",
                "Outbound 0: HTTP transport missing path"
            ]
        );

        let (errors, _) = check_one(json!({
            "type": "vmess", "tag": "v", "server": "a.com", "server_port": 443,
            "uuid": UUID, "transport": {"path": "/"}
        }));
        assert_eq!(errors, ["Outbound 0: transport missing 'type'"]);
    }

    #[test]
    fn test_trojan_short_password() {
        let (errors, warnings) = check_one(json!({
            "type": "trojan", "tag": "t", "server": "a.com", "server_port": 443,
            "password": "short",
            "tls": {"enabled": true, "server_name": "a.com"}
        }));
        assert!(errors.is_empty());
        assert_eq!(
            warnings,
            ["Trojan outbound 0: password should be at least 16 characters"]
        );
    }

    #[test]
    fn test_custom_rules() {
        let mut rules = ValidatorSettings::default();
        rules.trojan_min_password = 4;
        let validator = Validator::new(rules);
        assert_eq!(validator.rules().trojan_min_password, 4);

        let config = document(json!([
            {"type": "trojan", "tag": "t", "server": "a.com", "server_port": 443,
             "password": "short", "tls": {"enabled": true, "server_name": "a.com"}},
            {"type": "direct", "tag": "direct"}
        ]));
        assert!(validator.validate(&config).warnings().is_empty());
    }

    #[test]
    fn test_unparsable_text() {
        let report = Validator::default().validate_str("{ not json");
        assert_eq!(report.errors().len(), 1);
        assert!(report.errors()[0].starts_with("Failed to load configuration: "));
    }

    #[test]
    fn test_report_rendering() {
        let report = Validator::default().validate_str("[]");
        let rendered = report.to_string();
        assert!(rendered.contains("ERRORS:"));
        assert!(rendered.contains("   - Configuration root must be a JSON object"));
        assert!(rendered.trim_end().ends_with("Configuration validation failed!"));
    }
}
