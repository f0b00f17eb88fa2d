use std::collections::BTreeMap;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::secret::SecretSource;
use crate::error::ConfigGenerationError;
use crate::models::{
    Outbound, ProtocolSettings, ProxyRecord, RealityOptions, ShadowsocksOutbound,
    ShadowsocksSettings, TlsOptions, Transport, TrojanOutbound, TrojanSettings, UtlsOptions,
    VMessSettings, VlessOutbound, VlessSettings, VmessOutbound,
};
use crate::settings::GeneratorSettings;

/// Maps [`ProxyRecord`]s to sing-box outbounds.
///
/// Gaps in a record are filled from [`GeneratorSettings`]; missing passwords
/// and UUIDs are drawn from the injected [`SecretSource`]. The only record the
/// generator rejects is one without a host.
#[derive(Debug, Clone)]
pub struct OutboundGenerator<S> {
    source: S,
    defaults: GeneratorSettings,
}

impl OutboundGenerator<StdRng> {
    /// Generator whose secrets are reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<S: SecretSource> OutboundGenerator<S> {
    pub fn new(source: S) -> Self {
        Self::with_settings(source, GeneratorSettings::default())
    }

    pub fn with_settings(source: S, defaults: GeneratorSettings) -> Self {
        OutboundGenerator { source, defaults }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.defaults
    }

    /// Build the outbound for one record.
    pub fn generate(&mut self, record: &ProxyRecord) -> Result<Outbound, ConfigGenerationError> {
        let host = record.host.trim();
        if host.is_empty() {
            return Err(ConfigGenerationError::EmptyHost);
        }

        let outbound = match &record.settings {
            ProtocolSettings::Shadowsocks(ss) => self.shadowsocks(record, host, ss),
            ProtocolSettings::VMess(vmess) => self.vmess(record, host, vmess),
            ProtocolSettings::Trojan(trojan) => self.trojan(record, host, trojan),
            ProtocolSettings::Vless(vless) => self.vless(record, host, vless),
        };
        debug!(
            "Generated {} outbound '{}'",
            outbound.type_name(),
            outbound.tag()
        );
        Ok(outbound)
    }

    fn shadowsocks(&mut self, record: &ProxyRecord, host: &str, ss: &ShadowsocksSettings) -> Outbound {
        let port = port_or(record.port, self.defaults.shadowsocks_port);
        let password = match non_blank(&ss.password) {
            Some(p) => p,
            None => self
                .source
                .password(self.defaults.shadowsocks_password_length),
        };
        Outbound::Shadowsocks(ShadowsocksOutbound {
            tag: make_tag(record, host, port),
            server: host.to_string(),
            server_port: port,
            method: non_blank(&ss.method)
                .unwrap_or_else(|| self.defaults.shadowsocks_method.clone()),
            password,
        })
    }

    fn vmess(&mut self, record: &ProxyRecord, host: &str, vmess: &VMessSettings) -> Outbound {
        let port = port_or(record.port, self.defaults.vmess_port);
        let uuid = match non_blank(&vmess.uuid) {
            Some(id) => id,
            None => self.source.uuid().to_string(),
        };
        let network =
            non_blank(&vmess.network).unwrap_or_else(|| self.defaults.vmess_network.clone());
        let path = non_blank(&vmess.path).unwrap_or_else(|| self.defaults.vmess_path.clone());
        let header_host = non_blank(&vmess.host_header).unwrap_or_else(|| host.to_string());

        let tls = vmess.tls.then(|| TlsOptions {
            alpn: vmess
                .alpn
                .as_deref()
                .map(split_alpn)
                .unwrap_or_default(),
            ..TlsOptions::enabled(Some(
                non_blank(&vmess.sni).unwrap_or_else(|| header_host.clone()),
            ))
        });

        Outbound::Vmess(VmessOutbound {
            tag: make_tag(record, host, port),
            server: host.to_string(),
            server_port: port,
            uuid,
            security: non_blank(&vmess.security)
                .unwrap_or_else(|| self.defaults.vmess_security.clone()),
            alter_id: vmess.alter_id,
            transport: build_transport(&network, path, header_host),
            tls,
        })
    }

    fn trojan(&mut self, record: &ProxyRecord, host: &str, trojan: &TrojanSettings) -> Outbound {
        let port = port_or(record.port, self.defaults.trojan_port);
        let password = match non_blank(&trojan.password) {
            Some(p) => p,
            None => self.source.password(self.defaults.trojan_password_length),
        };
        Outbound::Trojan(TrojanOutbound {
            tag: make_tag(record, host, port),
            server: host.to_string(),
            server_port: port,
            password,
            tls: TlsOptions::enabled(Some(
                non_blank(&trojan.sni).unwrap_or_else(|| host.to_string()),
            )),
            transport: None,
        })
    }

    fn vless(&mut self, record: &ProxyRecord, host: &str, vless: &VlessSettings) -> Outbound {
        let port = port_or(record.port, self.defaults.vless_port);
        let uuid = match non_blank(&vless.uuid) {
            Some(id) => id,
            None => self.source.uuid().to_string(),
        };
        let header_host = non_blank(&vless.host_header).unwrap_or_else(|| host.to_string());
        let server_name = || Some(non_blank(&vless.sni).unwrap_or_else(|| header_host.clone()));
        let tls = match vless.security.as_deref() {
            Some("tls") => Some(TlsOptions::enabled(server_name())),
            Some("reality") => Some(reality_tls(vless, server_name())),
            _ => None,
        };
        let network = non_blank(&vless.network).unwrap_or_else(|| "tcp".to_string());
        let path = non_blank(&vless.path).unwrap_or_else(|| "/".to_string());

        Outbound::Vless(VlessOutbound {
            tag: make_tag(record, host, port),
            server: host.to_string(),
            server_port: port,
            uuid,
            flow: non_blank(&vless.flow),
            tls,
            transport: build_transport(&network, path, header_host),
        })
    }
}

/// TLS block for a REALITY server; REALITY requires a uTLS fingerprint.
fn reality_tls(vless: &VlessSettings, server_name: Option<String>) -> TlsOptions {
    let public_key = non_blank(&vless.public_key).unwrap_or_else(|| {
        warn!("REALITY outbound without a public key");
        String::new()
    });
    TlsOptions {
        utls: Some(UtlsOptions {
            enabled: true,
            fingerprint: non_blank(&vless.fingerprint).unwrap_or_else(|| "chrome".to_string()),
        }),
        reality: Some(RealityOptions {
            enabled: true,
            public_key,
            short_id: non_blank(&vless.short_id).unwrap_or_default(),
        }),
        ..TlsOptions::enabled(server_name)
    }
}

fn port_or(port: u16, default: u16) -> u16 {
    if port == 0 {
        default
    } else {
        port
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn make_tag(record: &ProxyRecord, host: &str, port: u16) -> String {
    let name = record.name.trim();
    if name.is_empty() {
        format!("{}-{}:{}", record.proxy_type(), host, port)
    } else {
        name.to_string()
    }
}

fn split_alpn(alpn: &str) -> Vec<String> {
    alpn.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Transport object for a share-link network name; plain TCP has none.
fn build_transport(network: &str, path: String, host: String) -> Option<Transport> {
    match network {
        "tcp" | "" => None,
        "ws" => {
            let mut headers = BTreeMap::new();
            headers.insert("Host".to_string(), host);
            Some(Transport::Ws { path, headers })
        }
        "h2" | "http" => Some(Transport::Http {
            host: vec![host],
            path,
        }),
        "grpc" => Some(Transport::Grpc { service_name: path }),
        other => {
            warn!("Unsupported transport '{}', falling back to tcp", other);
            None
        }
    }
}
