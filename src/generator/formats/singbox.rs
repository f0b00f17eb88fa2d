use std::collections::HashSet;

use log::warn;

use crate::error::ConfigGenerationError;
use crate::generator::{OutboundGenerator, SecretSource};
use crate::models::{
    AggregateConfig, DnsOptions, DnsServer, Inbound, LogOptions, Outbound, ProxyRecord,
    RouteOptions, RouteRule,
};
use crate::settings::AggregateSettings;

pub const DIRECT_TAG: &str = "direct";
pub const BLOCK_TAG: &str = "block";
pub const DNS_TAG: &str = "dns-out";

/// A record the generator refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    /// Position of the record in the input slice
    pub index: usize,
    pub name: String,
    pub error: ConfigGenerationError,
}

/// Output of [`proxy_to_singbox`]: the document plus any skipped records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingboxBuild {
    pub config: AggregateConfig,
    pub failures: Vec<GenerationFailure>,
}

/// Convert records to a sing-box configuration document
///
/// Proxy outbounds come first, in input order, followed by the `direct`,
/// `block` and `dns-out` outbounds. Outbound tags are made unique by suffixing
/// `-2`, `-3`, ... Route rules only reference outbounds that exist, and
/// `route.final` points at the first proxy (or `direct` when there is none).
pub fn proxy_to_singbox<S: SecretSource>(
    records: &[ProxyRecord],
    generator: &mut OutboundGenerator<S>,
    settings: &AggregateSettings,
) -> SingboxBuild {
    let mut used: HashSet<String> = [DIRECT_TAG, BLOCK_TAG, DNS_TAG]
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut outbounds = Vec::with_capacity(records.len() + 3);
    let mut failures = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match generator.generate(record) {
            Ok(mut outbound) => {
                let tag = unique_tag(outbound.tag(), &mut used);
                outbound.set_tag(tag);
                outbounds.push(outbound);
            }
            Err(error) => {
                warn!("Skipping record {} ({}): {}", index, record.display_name(), error);
                failures.push(GenerationFailure {
                    index,
                    name: record.name.clone(),
                    error,
                });
            }
        }
    }

    let final_outbound = outbounds
        .first()
        .map(|o| o.tag().to_string())
        .unwrap_or_else(|| DIRECT_TAG.to_string());

    outbounds.push(Outbound::direct(DIRECT_TAG));
    outbounds.push(Outbound::block(BLOCK_TAG));
    outbounds.push(Outbound::dns(DNS_TAG));

    let config = AggregateConfig {
        log: LogOptions {
            level: settings.log_level.clone(),
            timestamp: true,
        },
        dns: DnsOptions {
            servers: settings
                .dns_servers
                .iter()
                .map(|s| DnsServer {
                    tag: s.tag.clone(),
                    address: s.address.clone(),
                    detour: Some(DIRECT_TAG.to_string()),
                })
                .collect(),
            final_server: settings.dns_servers.first().map(|s| s.tag.clone()),
            strategy: (!settings.dns_strategy.is_empty()).then(|| settings.dns_strategy.clone()),
        },
        inbounds: vec![Inbound {
            inbound_type: "mixed".to_string(),
            tag: Some("mixed-in".to_string()),
            listen: settings.listen.clone(),
            listen_port: settings.listen_port,
            sniff: true,
        }],
        outbounds,
        route: RouteOptions {
            rules: vec![
                RouteRule {
                    protocol: Some("dns".to_string()),
                    outbound: DNS_TAG.to_string(),
                    ..Default::default()
                },
                RouteRule {
                    ip_is_private: Some(true),
                    outbound: DIRECT_TAG.to_string(),
                    ..Default::default()
                },
            ],
            final_outbound: Some(final_outbound),
            auto_detect_interface: true,
        },
    };

    SingboxBuild { config, failures }
}

/// Serialize a document the way it is written to disk.
pub fn to_json_string(config: &AggregateConfig) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(config)
}

fn unique_tag(tag: &str, used: &mut HashSet<String>) -> String {
    if used.insert(tag.to_string()) {
        return tag.to_string();
    }
    let mut n = 2;
    loop {
        let candidate = format!("{}-{}", tag, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}
