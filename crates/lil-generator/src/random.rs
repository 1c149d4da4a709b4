use crate::Generator;
use lil_core::{CodeFormat, ShortCode, ALPHABET, RESERVED_SEGMENTS};
use rand::Rng;

/// Draws fixed-length codes uniformly from [`ALPHABET`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGenerator {
    format: CodeFormat,
}

impl RandomGenerator {
    pub fn new(format: CodeFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> CodeFormat {
        self.format
    }
}

impl Generator for RandomGenerator {
    type Output = ShortCode;

    fn generate(&self) -> ShortCode {
        let alphabet = ALPHABET.as_bytes();
        let mut rng = rand::rng();

        loop {
            let code: String = (0..self.format.length)
                .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
                .collect();

            // Only reachable with very short formats.
            if !RESERVED_SEGMENTS.contains(&code.as_str()) {
                return ShortCode::new_unchecked(code);
            }
        }
    }
}
