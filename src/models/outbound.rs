//! sing-box outbound objects.
//!
//! Field names mirror the sing-box JSON schema, so these types serialize
//! straight into an aggregate configuration document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// TLS sub-object of an outbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsOptions {
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utls: Option<UtlsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality: Option<RealityOptions>,
}

impl TlsOptions {
    pub fn enabled(server_name: Option<String>) -> Self {
        TlsOptions {
            enabled: true,
            server_name,
            ..Default::default()
        }
    }
}

/// uTLS client fingerprint imitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtlsOptions {
    pub enabled: bool,
    pub fingerprint: String,
}

/// REALITY client parameters; `short_id` may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealityOptions {
    pub enabled: bool,
    pub public_key: String,
    #[serde(default)]
    pub short_id: String,
}

/// Transport sub-object of an outbound, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transport {
    Ws {
        path: String,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
    Http {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        host: Vec<String>,
        path: String,
    },
    Grpc {
        service_name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowsocksOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,
    pub method: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmessOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,
    pub uuid: String,
    pub security: String,
    pub alter_id: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrojanOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,
    pub password: String,
    pub tls: TlsOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlessOutbound {
    pub tag: String,
    pub server: String,
    pub server_port: u16,
    pub uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<Transport>,
}

/// Outbounds that carry nothing but a tag (`direct`, `block`, `dns`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicOutbound {
    pub tag: String,
}

/// One entry of the `outbounds` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outbound {
    Shadowsocks(ShadowsocksOutbound),
    Vmess(VmessOutbound),
    Trojan(TrojanOutbound),
    Vless(VlessOutbound),
    Direct(BasicOutbound),
    Block(BasicOutbound),
    Dns(BasicOutbound),
}

impl Outbound {
    pub fn direct(tag: impl Into<String>) -> Self {
        Outbound::Direct(BasicOutbound { tag: tag.into() })
    }

    pub fn block(tag: impl Into<String>) -> Self {
        Outbound::Block(BasicOutbound { tag: tag.into() })
    }

    pub fn dns(tag: impl Into<String>) -> Self {
        Outbound::Dns(BasicOutbound { tag: tag.into() })
    }

    pub fn tag(&self) -> &str {
        match self {
            Outbound::Shadowsocks(o) => &o.tag,
            Outbound::Vmess(o) => &o.tag,
            Outbound::Trojan(o) => &o.tag,
            Outbound::Vless(o) => &o.tag,
            Outbound::Direct(o) | Outbound::Block(o) | Outbound::Dns(o) => &o.tag,
        }
    }

    pub fn set_tag(&mut self, tag: String) {
        match self {
            Outbound::Shadowsocks(o) => o.tag = tag,
            Outbound::Vmess(o) => o.tag = tag,
            Outbound::Trojan(o) => o.tag = tag,
            Outbound::Vless(o) => o.tag = tag,
            Outbound::Direct(o) | Outbound::Block(o) | Outbound::Dns(o) => o.tag = tag,
        }
    }

    /// Value of the `type` discriminator.
    pub fn type_name(&self) -> &'static str {
        match self {
            Outbound::Shadowsocks(_) => "shadowsocks",
            Outbound::Vmess(_) => "vmess",
            Outbound::Trojan(_) => "trojan",
            Outbound::Vless(_) => "vless",
            Outbound::Direct(_) => "direct",
            Outbound::Block(_) => "block",
            Outbound::Dns(_) => "dns",
        }
    }

    /// Whether this outbound reaches an upstream proxy server.
    pub fn is_proxy(&self) -> bool {
        !matches!(
            self,
            Outbound::Direct(_) | Outbound::Block(_) | Outbound::Dns(_)
        )
    }
}
