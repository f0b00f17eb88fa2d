use std::io::Write;

use proxysub::settings::{GeneratorSettings, Settings};
use proxysub::SettingsError;
use tempfile::Builder;

#[cfg(test)]
mod settings_tests {
    use super::*;

    fn write_settings(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.generator.shadowsocks_port, 8388);
        assert_eq!(settings.generator.vmess_port, 10086);
        assert_eq!(settings.generator.trojan_port, 443);
        assert_eq!(settings.validator.trojan_min_password, 16);
        assert_eq!(settings.aggregate.listen_port, 1080);
        assert_eq!(settings.aggregate.dns_servers.len(), 2);
    }

    #[test]
    fn test_load_toml() {
        let file = write_settings(
            ".toml",
            r#"
[generator]
shadowsocks_port = 8389

[validator]
trojan_min_password = 20

[[aggregate.dns_servers]]
tag = "google"
address = "tls://8.8.8.8"
"#,
        );
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.generator.shadowsocks_port, 8389);
        assert_eq!(settings.generator.vmess_port, 10086);
        assert_eq!(settings.validator.trojan_min_password, 20);
        assert_eq!(settings.validator.shadowsocks_min_password, 8);
        assert_eq!(settings.aggregate.dns_servers.len(), 1);
        assert_eq!(settings.aggregate.dns_servers[0].address, "tls://8.8.8.8");
        assert_eq!(settings.aggregate.listen, "127.0.0.1");
    }

    #[test]
    fn test_load_yaml() {
        let file = write_settings(
            ".yml",
            "generator:\n  trojan_password_length: 40\naggregate:\n  listen_port: 7890\n",
        );
        let settings = Settings::load(file.path()).unwrap();
        assert_eq!(settings.generator.trojan_password_length, 40);
        assert_eq!(settings.aggregate.listen_port, 7890);
        assert_eq!(settings.generator.shadowsocks_port, 8388);
    }

    #[test]
    fn test_empty_files_give_defaults() {
        assert_eq!(Settings::from_yaml_str("").unwrap(), Settings::default());
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_extension() {
        let file = write_settings(".ini", "[generator]\n");
        match Settings::load(file.path()) {
            Err(SettingsError::UnknownFormat(ext)) => assert_eq!(ext, "ini"),
            other => panic!("expected UnknownFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_values_are_errors() {
        let result = Settings::from_toml_str("[generator]\nshadowsocks_port = \"high\"\n");
        assert!(matches!(result, Err(SettingsError::Toml(_))));

        let partial: GeneratorSettings = toml::from_str("vmess_path = \"/ws\"").unwrap();
        assert_eq!(partial.vmess_path, "/ws");
        assert_eq!(partial.vmess_network, "ws");
    }
}
