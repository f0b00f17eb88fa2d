pub mod base64;
pub mod url;

pub use self::base64::{base64_decode, base64_encode};
pub use self::url::{url_decode, url_encode};
