pub mod singbox;
pub mod single;
pub mod subscription;

pub use singbox::{proxy_to_singbox, SingboxBuild};
pub use single::proxy_to_uri;
pub use subscription::{proxy_to_sub_base64, proxy_to_sub_text, proxy_to_universal};
