//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use proxysub::models::{ProxyRecord, ProxyType};
//!
//! let record = ProxyRecord::trojan("example.com", 443, Some("correct-horse-battery"), None)
//!     .with_name("Tokyo");
//! assert_eq!(record.proxy_type(), ProxyType::Trojan);
//! ```

mod aggregate;
mod outbound;
mod proxy;
mod report;

pub use aggregate::*;
pub use outbound::*;
pub use proxy::*;
pub use report::*;
