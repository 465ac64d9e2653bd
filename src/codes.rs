//! Room code generation and normalization.
//!
//! Codes are six symbols drawn uniformly from a 32-symbol alphabet that
//! excludes the visually ambiguous `I`, `O`, `0`, and `1`, giving a ≈2^30
//! space. Generation sits behind the [`CodeSource`] seam so tests can script
//! deterministic sequences to exercise the collision and retry paths.

use rand::Rng;

/// Code alphabet: uppercase letters and digits minus `I`, `O`, `0`, `1`.
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a room code in symbols.
pub const ROOM_CODE_LEN: usize = 6;

/// Normalize user input into canonical code form: trim, uppercase, and strip
/// everything that is not an ASCII letter or digit.
///
/// Normalization is deliberately looser than the alphabet — a pasted
/// `"abc-234 "` resolves, while a code that never existed simply fails the
/// index lookup.
pub fn normalize_room_code(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Source of candidate room codes.
///
/// The default [`RandomCodes`] draws uniformly; tests supply scripted
/// sequences to force collisions deterministically.
pub trait CodeSource: Send + Sync + 'static {
    /// Produce the next candidate code.
    fn next_code(&self) -> String;
}

/// Uniform random code source backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodes;

impl CodeSource for RandomCodes {
    fn next_code(&self) -> String {
        let mut rng = rand::rng();
        (0..ROOM_CODE_LEN)
            .map(|_| {
                let idx = rng.random_range(0..ROOM_CODE_ALPHABET.len());
                ROOM_CODE_ALPHABET.get(idx).copied().unwrap_or(b'A') as char
            })
            .collect()
    }
}
