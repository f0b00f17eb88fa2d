//! Randomness used to fill in missing credentials.

use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use uuid::{Builder, Uuid};

/// Shortest password the generator will ever produce.
pub const MIN_PASSWORD_LENGTH: usize = 16;

/// Source of generated secrets.
///
/// Every [`RngCore`] is a `SecretSource`, so callers pick the trade-off:
/// a seeded `StdRng` for reproducible output, `OsRng`/`thread_rng()` for
/// production use.
pub trait SecretSource {
    /// Alphanumeric password containing at least one letter and one digit.
    /// Lengths below [`MIN_PASSWORD_LENGTH`] are raised to it.
    fn password(&mut self, length: usize) -> String;

    /// Random (version 4) UUID.
    fn uuid(&mut self) -> Uuid;
}

impl<R: RngCore> SecretSource for R {
    fn password(&mut self, length: usize) -> String {
        let length = length.max(MIN_PASSWORD_LENGTH);
        loop {
            let candidate: String = (0..length)
                .map(|_| char::from(self.sample(Alphanumeric)))
                .collect();
            let has_letter = candidate.chars().any(|c| c.is_ascii_alphabetic());
            let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
            if has_letter && has_digit {
                return candidate;
            }
        }
    }

    fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        self.fill_bytes(&mut bytes);
        Builder::from_random_bytes(bytes).into_uuid()
    }
}
