//! Proxy model definitions
//!
//! Contains the canonical, protocol-tagged record every URI decodes into.

/// Represents the type of a proxy.
/// This is the canonical enum used for proxy type identification across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProxyType {
    Shadowsocks,
    VMess,
    Trojan,
    Vless,
}

impl ProxyType {
    /// Order in which protocol groups appear in a universal subscription.
    pub const UNIVERSAL_ORDER: [ProxyType; 4] = [
        ProxyType::Shadowsocks,
        ProxyType::VMess,
        ProxyType::Trojan,
        ProxyType::Vless,
    ];

    /// Lower-case protocol name, as used for sing-box `type` fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "shadowsocks",
            ProxyType::VMess => "vmess",
            ProxyType::Trojan => "trojan",
            ProxyType::Vless => "vless",
        }
    }

    /// URI scheme prefix including `://`.
    pub fn scheme(self) -> &'static str {
        match self {
            ProxyType::Shadowsocks => "ss://",
            ProxyType::VMess => "vmess://",
            ProxyType::Trojan => "trojan://",
            ProxyType::Vless => "vless://",
        }
    }

    /// Detects the proxy type from the scheme of a link.
    pub fn from_link(link: &str) -> Option<ProxyType> {
        Self::UNIVERSAL_ORDER
            .into_iter()
            .find(|t| link.starts_with(t.scheme()))
    }
}

impl std::fmt::Display for ProxyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shadowsocks credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowsocksSettings {
    pub method: Option<String>,
    pub password: Option<String>,
}

/// VMess user and transport parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VMessSettings {
    pub uuid: Option<String>,
    pub alter_id: u16,
    pub security: Option<String>,
    /// Transport network: `tcp`, `ws`, `h2`/`http` or `grpc`
    pub network: Option<String>,
    /// Header obfuscation type (`type` key of the share link)
    pub header_type: Option<String>,
    /// Host header / HTTP host for ws and h2 transports
    pub host_header: Option<String>,
    pub path: Option<String>,
    pub tls: bool,
    pub sni: Option<String>,
    /// Comma separated ALPN list
    pub alpn: Option<String>,
}

/// Trojan credentials. TLS is always on for trojan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrojanSettings {
    pub password: Option<String>,
    pub sni: Option<String>,
}

/// VLESS user and transport parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VlessSettings {
    pub uuid: Option<String>,
    pub flow: Option<String>,
    pub network: Option<String>,
    pub host_header: Option<String>,
    pub path: Option<String>,
    /// `tls`, `reality` or `none`
    pub security: Option<String>,
    pub sni: Option<String>,
    /// REALITY public key (`pbk`)
    pub public_key: Option<String>,
    /// REALITY short id (`sid`)
    pub short_id: Option<String>,
    /// uTLS fingerprint (`fp`)
    pub fingerprint: Option<String>,
}

/// Protocol specific part of a [`ProxyRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolSettings {
    Shadowsocks(ShadowsocksSettings),
    VMess(VMessSettings),
    Trojan(TrojanSettings),
    Vless(VlessSettings),
}

/// Canonical descriptor of one proxy server.
///
/// A port of `0` means "not set"; the generator substitutes the protocol
/// default. Records produced by the URI decoder always carry a non-zero port
/// and every credential their protocol requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRecord {
    /// Display remark
    pub name: String,
    /// Provenance tag, e.g. the subscription or provider this came from
    pub source: Option<String>,
    pub host: String,
    pub port: u16,
    pub settings: ProtocolSettings,
}

impl ProxyRecord {
    pub fn new(host: impl Into<String>, port: u16, settings: ProtocolSettings) -> Self {
        ProxyRecord {
            name: String::new(),
            source: None,
            host: host.into(),
            port,
            settings,
        }
    }

    pub fn shadowsocks(
        host: impl Into<String>,
        port: u16,
        method: Option<&str>,
        password: Option<&str>,
    ) -> Self {
        Self::new(
            host,
            port,
            ProtocolSettings::Shadowsocks(ShadowsocksSettings {
                method: method.map(str::to_string),
                password: password.map(str::to_string),
            }),
        )
    }

    pub fn vmess(host: impl Into<String>, port: u16, settings: VMessSettings) -> Self {
        Self::new(host, port, ProtocolSettings::VMess(settings))
    }

    pub fn trojan(
        host: impl Into<String>,
        port: u16,
        password: Option<&str>,
        sni: Option<&str>,
    ) -> Self {
        Self::new(
            host,
            port,
            ProtocolSettings::Trojan(TrojanSettings {
                password: password.map(str::to_string),
                sni: sni.map(str::to_string),
            }),
        )
    }

    pub fn vless(host: impl Into<String>, port: u16, settings: VlessSettings) -> Self {
        Self::new(host, port, ProtocolSettings::Vless(settings))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn proxy_type(&self) -> ProxyType {
        match self.settings {
            ProtocolSettings::Shadowsocks(_) => ProxyType::Shadowsocks,
            ProtocolSettings::VMess(_) => ProxyType::VMess,
            ProtocolSettings::Trojan(_) => ProxyType::Trojan,
            ProtocolSettings::Vless(_) => ProxyType::Vless,
        }
    }

    /// Name to show for this record: the remark, or `host:port` without one.
    pub fn display_name(&self) -> String {
        if self.name.is_empty() {
            format!("{}:{}", self.host, self.port)
        } else {
            self.name.clone()
        }
    }
}

/// Returns `Some(value)` when the value is non-empty.
pub(crate) fn non_empty(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.is_empty()).then_some(value)
}
