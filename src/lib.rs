pub mod error;
pub mod generator;
pub mod models;
pub mod parser;
pub mod settings;
pub mod utils;
pub mod validator;

// Re-export the main types for easier access
pub use error::{ConfigGenerationError, DecodeError, SettingsError};
pub use models::{AggregateConfig, Outbound, ProxyRecord, ProxyType, ValidationReport};
pub use settings::Settings;

// Codec and assembler entry points
pub use generator::formats::single::proxy_to_uri as encode;
pub use generator::formats::subscription::{
    proxy_to_sub_base64 as build_base64, proxy_to_sub_text as build_text,
    proxy_to_universal as build_universal,
};
pub use generator::{OutboundGenerator, SecretSource};
pub use parser::explodes::{explode as decode, explode_sub as decode_all, SubscriptionBatch};
pub use validator::{validate, validate_subscription, Validator};
