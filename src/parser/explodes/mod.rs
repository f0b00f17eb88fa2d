mod common;
mod ss;
mod trojan;
mod vless;
mod vmess;

pub use common::{explode, explode_sub, unwrap_subscription, LineFailure, SubscriptionBatch};
pub use ss::explode_ss;
pub use trojan::explode_trojan;
pub use vless::explode_vless;
pub use vmess::explode_vmess;
