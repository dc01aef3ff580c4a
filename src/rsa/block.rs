// RSA Block Transform
// Single-block encryption and decryption through modular exponentiation

use num_bigint::BigUint;

use super::bigint::mod_pow;
use super::error::{CryptoError, CryptoResult};
use super::keygen::{RsaPrivateKey, RsaPublicKey};

/// Number of bytes one block carries. Longer inputs are rejected rather than
/// partially transformed.
pub const BLOCK_BYTES: usize = 8;

/// A block moving through the transform, tagged by direction.
///
/// The tag replaces a caller-managed "processing state" flag: encryption only
/// accepts `Plaintext` and decryption only accepts `Transformed`, so running
/// a block the wrong way is an error instead of silent corruption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Raw bytes, at most [`BLOCK_BYTES`] of them.
    Plaintext(Vec<u8>),
    /// Big-endian encoding of the transformed integer, always a full block
    /// wide, plus the plaintext length it must decode back to.
    Transformed { bytes: [u8; BLOCK_BYTES], len: usize },
}

impl Block {
    /// Wrap raw bytes as an untransformed block
    pub fn plaintext(data: Vec<u8>) -> Self {
        Block::Plaintext(data)
    }

    pub fn is_transformed(&self) -> bool {
        matches!(self, Block::Transformed { .. })
    }
}

/// Pack bytes into a single big-endian unsigned integer
pub fn encode_block(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Unpack an integer into exactly `len` big-endian bytes, left-padding with
/// zero bytes so leading zeros of the original block survive the round trip.
/// Fails if the value needs more than `len` bytes.
pub fn decode_block(value: &BigUint, len: usize) -> CryptoResult<Vec<u8>> {
    let raw = value.to_bytes_be();
    if raw.len() > len {
        return Err(CryptoError::CorruptBlock);
    }

    let mut out = vec![0u8; len];
    out[len - raw.len()..].copy_from_slice(&raw);
    Ok(out)
}

/// Low BLOCK_BYTES bytes of a value, big-endian. Values produced by the
/// transform always fit because the modulus is below 2^64.
pub(crate) fn to_fixed_bytes(value: &BigUint) -> [u8; BLOCK_BYTES] {
    let raw = value.to_bytes_be();
    let take = raw.len().min(BLOCK_BYTES);

    let mut bytes = [0u8; BLOCK_BYTES];
    bytes[BLOCK_BYTES - take..].copy_from_slice(&raw[raw.len() - take..]);
    bytes
}

/// Encrypt a single plaintext block: encode, raise to the public exponent,
/// re-encode as a full-width block.
///
/// An empty block is returned unchanged. Blocks longer than [`BLOCK_BYTES`]
/// or encoding a value at or above the modulus are rejected.
pub fn encrypt_block(block: Block, key: &RsaPublicKey) -> CryptoResult<Block> {
    match block {
        Block::Plaintext(data) => {
            if data.is_empty() {
                return Ok(Block::Plaintext(data));
            }
            if data.len() > BLOCK_BYTES {
                return Err(CryptoError::BlockTooLarge { len: data.len() });
            }

            let m = encode_block(&data);
            if m >= key.n {
                return Err(CryptoError::BlockExceedsModulus);
            }

            let c = mod_pow(&m, &key.e, &key.n);
            Ok(Block::Transformed {
                bytes: to_fixed_bytes(&c),
                len: data.len(),
            })
        }
        Block::Transformed { .. } => Err(CryptoError::AlreadyTransformed),
    }
}

/// Decrypt a transformed block back to its recorded plaintext length
pub fn decrypt_block(block: Block, key: &RsaPrivateKey) -> CryptoResult<Block> {
    match block {
        Block::Transformed { bytes, len } => {
            let c = encode_block(&bytes);
            let m = decrypt_crt(&c, key);
            let data = decode_block(&m, len)?;
            Ok(Block::Plaintext(data))
        }
        Block::Plaintext(_) => Err(CryptoError::NotTransformed),
    }
}

/// Decrypt using the Chinese Remainder Theorem
/// Faster than a direct d-power because both exponentiations run modulo a
/// single prime factor
fn decrypt_crt(c: &BigUint, key: &RsaPrivateKey) -> BigUint {
    // m1 = c^d_p mod p
    let m1 = mod_pow(c, &key.d_p, &key.p);

    // m2 = c^d_q mod q
    let m2 = mod_pow(c, &key.d_q, &key.q);

    // h = (m1 - m2) * q_inv mod p
    let mut h = if m1 >= m2 {
        m1 - &m2
    } else {
        m1 + &key.p - &m2
    };
    h = (h * &key.q_inv) % &key.p;

    // m = m2 + q * h
    let m = m2 + &key.q * h;

    // Ensure m < n
    if m >= key.n {
        m - &key.n
    } else {
        m
    }
}

impl RsaPublicKey {
    /// Encrypt a single block with this key
    pub fn encrypt_block(&self, block: Block) -> CryptoResult<Block> {
        encrypt_block(block, self)
    }
}

impl RsaPrivateKey {
    /// Decrypt a single block with this key
    pub fn decrypt_block(&self, block: Block) -> CryptoResult<Block> {
        decrypt_block(block, self)
    }
}
