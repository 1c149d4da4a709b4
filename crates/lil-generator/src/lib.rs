pub mod random;

pub use random::RandomGenerator;

use lil_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage and
/// give no uniqueness guarantee: the link store rejects a taken code at
/// creation time and the shortener retries with a fresh one.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCode>;

    /// Generates a candidate short code.
    fn generate(&self) -> Self::Output;
}
