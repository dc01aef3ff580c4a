// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod block;
pub mod error;
pub mod keygen;
pub mod signature;

pub use block::{decrypt_block, encrypt_block, Block, BLOCK_BYTES};
pub use error::{CryptoError, CryptoResult};
pub use keygen::{
    generate_default_keypair, generate_keypair, KeygenConfig, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey, DEFAULT_ROUNDS, MAX_PRIME_BITS, MIN_PRIME_BITS, PUBLIC_EXPONENT,
};
pub use signature::{djb2_digest, sign, verify, Signature, SIGNATURE_BYTES};
