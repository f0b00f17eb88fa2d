use std::collections::HashSet;

use serde_json::{Map, Value};
use url::Url;

use super::Validator;
use crate::models::ValidationReport;

impl Validator {
    pub(super) fn validate_structure(&self, report: &mut ValidationReport, root: &Map<String, Value>) {
        for field in ["inbounds", "outbounds"] {
            if !root.contains_key(field) {
                report.error(format!("Missing required field: {}", field));
            }
        }

        let Some(inbounds) = root.get("inbounds") else {
            return;
        };
        let Some(inbounds) = inbounds.as_array() else {
            report.error("Field 'inbounds' must be an array");
            return;
        };
        for (i, inbound) in inbounds.iter().enumerate() {
            if inbound.get("type").is_none() {
                report.error(format!("Inbound {}: missing 'type' field", i));
            }
            if inbound.get("listen_port").is_none() {
                report.error(format!("Inbound {}: missing 'listen_port' field", i));
            }
        }
    }

    pub(super) fn validate_outbounds(&self, report: &mut ValidationReport, outbounds: Option<&Value>) {
        // Absence is already reported by the structure check
        let Some(outbounds) = outbounds else {
            return;
        };
        let Some(outbounds) = outbounds.as_array() else {
            report.error("Field 'outbounds' must be an array");
            return;
        };
        if outbounds.is_empty() {
            report.error("No outbounds configured");
            return;
        }

        let mut seen = HashSet::new();
        for (i, outbound) in outbounds.iter().enumerate() {
            self.validate_outbound(report, i, outbound);
            if let Some(tag) = outbound.get("tag").and_then(Value::as_str) {
                if !seen.insert(tag) {
                    report.warning(format!("Outbound {}: duplicate tag '{}'", i, tag));
                }
            }
        }
        report.note(format!("Checked {} outbound(s)", outbounds.len()));
    }

    pub(super) fn validate_route(&self, report: &mut ValidationReport, root: &Map<String, Value>) {
        let route = match root.get("route").and_then(Value::as_object) {
            Some(route) if !route.is_empty() => route,
            _ => {
                report.warning("No routing rules configured");
                return;
            }
        };
        let tags = outbound_tags(root);

        match route.get("rules").and_then(Value::as_array) {
            None => report.warning("Route has no 'rules' list"),
            Some(rules) => {
                for (i, rule) in rules.iter().enumerate() {
                    match rule.get("outbound") {
                        None => report.error(format!("Routing rule {}: missing outbound", i)),
                        Some(target) => {
                            let target = target.as_str().unwrap_or_default();
                            if !tags.contains(target) {
                                report.warning(format!(
                                    "Routing rule {}: outbound '{}' does not exist",
                                    i, target
                                ));
                            }
                        }
                    }
                }
            }
        }

        match route.get("final") {
            None => report.warning("No final outbound specified in routing"),
            Some(target) => {
                let target = target.as_str().unwrap_or_default();
                if !tags.contains(target) {
                    report.error(format!(
                        "Route final outbound '{}' does not exist",
                        target
                    ));
                }
            }
        }
    }

    pub(super) fn validate_dns(&self, report: &mut ValidationReport, dns: Option<&Value>) {
        let dns = match dns.and_then(Value::as_object) {
            Some(dns) if !dns.is_empty() => dns,
            _ => {
                report.warning("No DNS configuration found");
                return;
            }
        };
        let Some(servers) = dns.get("servers").and_then(Value::as_array) else {
            report.warning("DNS configuration missing servers");
            return;
        };

        for (i, server) in servers.iter().enumerate() {
            match server {
                Value::Object(server) => match server.get("address").and_then(Value::as_str) {
                    Some(address) => check_dns_address(report, i, address),
                    None => report.error(format!("DNS server {}: missing address", i)),
                },
                Value::String(address) => check_dns_address(report, i, address),
                _ => report.error(format!("DNS server {}: missing address", i)),
            }
        }
    }
}

fn outbound_tags(root: &Map<String, Value>) -> HashSet<&str> {
    root.get("outbounds")
        .and_then(Value::as_array)
        .map(|outbounds| {
            outbounds
                .iter()
                .filter_map(|o| o.get("tag").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn check_dns_address(report: &mut ValidationReport, index: usize, address: &str) {
    if address == "local" {
        return;
    }
    if !(address.starts_with("https://") || address.starts_with("tls://")) {
        report.warning(format!(
            "DNS server {}: consider using secure DNS (DoH/DoT)",
            index
        ));
    }
    if address.starts_with("https://") {
        let has_host = Url::parse(address)
            .ok()
            .and_then(|u| u.host_str().map(|h| !h.is_empty()))
            .unwrap_or(false);
        if !has_host {
            report.error(format!("DNS server {}: invalid DoH URL", index));
        }
    }
}
