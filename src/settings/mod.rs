//! Runtime settings for generation, validation and document assembly.
//!
//! Settings load from TOML or YAML. Every field has a default, so a settings
//! file only needs the keys it changes:
//!
//! ```toml
//! [generator]
//! shadowsocks_port = 8389
//!
//! [validator]
//! trojan_min_password = 20
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::SettingsError;

/// Defaults the generator fills in when a record leaves a value out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub shadowsocks_port: u16,
    pub vmess_port: u16,
    pub trojan_port: u16,
    pub vless_port: u16,
    pub shadowsocks_method: String,
    pub vmess_security: String,
    pub vmess_network: String,
    pub vmess_path: String,
    pub shadowsocks_password_length: usize,
    pub trojan_password_length: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        GeneratorSettings {
            shadowsocks_port: 8388,
            vmess_port: 10086,
            trojan_port: 443,
            vless_port: 443,
            shadowsocks_method: "chacha20-ietf-poly1305".to_string(),
            vmess_security: "auto".to_string(),
            vmess_network: "ws".to_string(),
            vmess_path: "/".to_string(),
            shadowsocks_password_length: 16,
            trojan_password_length: 32,
        }
    }
}

/// Rule tables used by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorSettings {
    /// AEAD ciphers accepted for shadowsocks without a warning
    pub shadowsocks_methods: Vec<String>,
    pub vmess_security: Vec<String>,
    pub vless_flows: Vec<String>,
    pub tuic_congestion_controls: Vec<String>,
    pub shadowsocks_min_password: usize,
    pub trojan_min_password: usize,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        ValidatorSettings {
            shadowsocks_methods: strings(&[
                "chacha20-ietf-poly1305",
                "aes-256-gcm",
                "aes-128-gcm",
                "2022-blake3-aes-256-gcm",
                "2022-blake3-chacha20-poly1305",
            ]),
            vmess_security: strings(&["auto", "aes-128-gcm", "chacha20-poly1305", "none"]),
            vless_flows: strings(&["", "xtls-rprx-vision", "xtls-rprx-vision-udp443"]),
            tuic_congestion_controls: strings(&["cubic", "new_reno", "bbr"]),
            shadowsocks_min_password: 8,
            trojan_min_password: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DnsServerSettings {
    pub tag: String,
    pub address: String,
}

/// Non-proxy parts of an assembled configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AggregateSettings {
    pub log_level: String,
    pub listen: String,
    pub listen_port: u16,
    pub dns_servers: Vec<DnsServerSettings>,
    pub dns_strategy: String,
}

impl Default for AggregateSettings {
    fn default() -> Self {
        AggregateSettings {
            log_level: "info".to_string(),
            listen: "127.0.0.1".to_string(),
            listen_port: 1080,
            dns_servers: vec![
                DnsServerSettings {
                    tag: "cloudflare".to_string(),
                    address: "https://1.1.1.1/dns-query".to_string(),
                },
                DnsServerSettings {
                    tag: "local".to_string(),
                    address: "local".to_string(),
                },
            ],
            dns_strategy: "ipv4_only".to_string(),
        }
    }
}

impl Default for DnsServerSettings {
    fn default() -> Self {
        DnsServerSettings {
            tag: String::new(),
            address: "local".to_string(),
        }
    }
}

/// All settings sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorSettings,
    pub validator: ValidatorSettings,
    pub aggregate: AggregateSettings,
}

impl Settings {
    /// Load settings from a `.toml`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let settings = match extension.as_str() {
            "toml" => Self::from_toml_str(&content)?,
            "yaml" | "yml" => Self::from_yaml_str(&content)?,
            other => return Err(SettingsError::UnknownFormat(other.to_string())),
        };
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SettingsError> {
        // An empty YAML document deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
