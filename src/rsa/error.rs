// Crypto Error Types
// Typed failures surfaced by key generation and the block transform

use thiserror::Error;

use super::block::BLOCK_BYTES;
use super::keygen::{MAX_PRIME_BITS, MIN_PRIME_BITS};

/// Errors that can occur while building key parameters or moving blocks
/// through the transform. Empty blocks are a no-op, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Requested prime width cannot be represented by the fixed block layout.
    #[error(
        "prime width of {0} bits is outside the supported {min}..={max} bit range",
        min = MIN_PRIME_BITS,
        max = MAX_PRIME_BITS
    )]
    InvalidBitWidth(u64),

    /// The public exponent shares a factor with the totient, so no private
    /// exponent exists for this prime pair.
    #[error("public exponent is not invertible modulo the totient")]
    NonInvertibleExponent,

    /// A single-block request carried more bytes than one block holds.
    #[error(
        "block of {len} bytes exceeds the {limit}-byte single-block limit",
        limit = BLOCK_BYTES
    )]
    BlockTooLarge { len: usize },

    /// The block encodes an integer at or above the modulus and would not
    /// survive the round trip; use wider primes or a shorter block.
    #[error("block value does not fit below the modulus")]
    BlockExceedsModulus,

    /// Encryption was asked to run on an already-transformed block.
    #[error("block is already transformed")]
    AlreadyTransformed,

    /// Decryption was asked to run on a plaintext block.
    #[error("block is not transformed")]
    NotTransformed,

    /// The recovered value is wider than the recorded plaintext length,
    /// which happens when the ciphertext was tampered with or decrypted
    /// under the wrong key.
    #[error("recovered value does not fit the recorded block length")]
    CorruptBlock,
}

/// Result type for crypto operations
pub type CryptoResult<T> = Result<T, CryptoError>;
