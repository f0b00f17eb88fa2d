pub mod formats;
mod outbound;
mod secret;

pub use outbound::OutboundGenerator;
pub use secret::{SecretSource, MIN_PASSWORD_LENGTH};
