//! Textbook RSA over a single 8-byte block.
//!
//! The crate walks the whole classical pipeline: Miller-Rabin prime
//! generation, modulus and exponent-pair derivation, square-and-multiply
//! block transforms, and a DJB2 hash-and-sign integrity check reusing the
//! same exponent pair.
//!
//! This is demonstration code. There is no padding, the digest is not
//! collision-resistant, and moduli are capped at 64 bits so blocks and
//! signatures keep a fixed 8-byte encoding. Do not protect real secrets
//! with it.
//!
//! ```
//! use minirsa::{generate_default_keypair, Block};
//!
//! let keypair = generate_default_keypair().unwrap();
//!
//! let block = Block::plaintext(b"secret!".to_vec());
//! let encrypted = keypair.public_key.encrypt_block(block).unwrap();
//! let decrypted = keypair.private_key.decrypt_block(encrypted).unwrap();
//! assert_eq!(decrypted, Block::Plaintext(b"secret!".to_vec()));
//!
//! let signature = keypair.private_key.sign(b"release notes");
//! assert!(keypair.public_key.verify(b"release notes", &signature));
//! ```

pub mod rsa;

pub use rsa::{
    decrypt_block, djb2_digest, encrypt_block, generate_default_keypair, generate_keypair, sign,
    verify, Block, CryptoError, CryptoResult, KeygenConfig, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey, Signature, BLOCK_BYTES, PUBLIC_EXPONENT, SIGNATURE_BYTES,
};
