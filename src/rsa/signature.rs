// Integrity Signatures
// DJB2 digest pushed backward through the RSA transform
//
// This is the textbook construction: the private exponent applied directly
// to a truncated, non-cryptographic hash, with no randomized padding. It
// demonstrates the mechanism and nothing more; it is not a secure signature
// scheme.

use std::fmt;

use num_bigint::BigUint;

use super::bigint::mod_pow;
use super::block::to_fixed_bytes;
use super::keygen::{RsaPrivateKey, RsaPublicKey};

/// Width of the fixed signature encoding
pub const SIGNATURE_BYTES: usize = 8;

/// DJB2 running hash: h = h * 33 + byte, seeded at 5381, wrapping at 64 bits.
/// Fast and simple, not collision-resistant.
pub fn djb2_digest(data: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for &byte in data {
        hash = hash.wrapping_mul(33).wrapping_add(u64::from(byte));
    }
    hash
}

/// Big-endian encoding of one transformed digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(pub [u8; SIGNATURE_BYTES]);

impl Signature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Signature(bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Sign arbitrary-length data: digest it, reduce modulo n, raise to the
/// private exponent, and encode the result as a full-width block.
pub fn sign(data: &[u8], key: &RsaPrivateKey) -> Signature {
    let digest = BigUint::from(djb2_digest(data)) % &key.n;
    let transformed = mod_pow(&digest, &key.d, &key.n);
    Signature(to_fixed_bytes(&transformed))
}

/// Open a signature with the public exponent and compare it against a fresh
/// digest of the data. Returns true iff they match modulo n.
pub fn verify(data: &[u8], signature: &Signature, key: &RsaPublicKey) -> bool {
    let opened = mod_pow(&BigUint::from_bytes_be(&signature.0), &key.e, &key.n);
    let expected = BigUint::from(djb2_digest(data)) % &key.n;
    opened == expected
}

impl RsaPrivateKey {
    /// Sign data with this key
    pub fn sign(&self, data: &[u8]) -> Signature {
        sign(data, self)
    }
}

impl RsaPublicKey {
    /// Check a signature over data against this key
    pub fn verify(&self, data: &[u8], signature: &Signature) -> bool {
        verify(data, signature, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::keygen::{generate_keypair, KeygenConfig, RsaKeyPair};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn textbook_keys() -> (RsaPublicKey, RsaPrivateKey) {
        let n = BigUint::from(3233u32);
        let public = RsaPublicKey {
            n: n.clone(),
            e: BigUint::from(17u32),
        };
        let private = RsaPrivateKey {
            n,
            d: BigUint::from(2753u32),
            p: BigUint::from(61u32),
            q: BigUint::from(53u32),
            d_p: BigUint::from(53u32),
            d_q: BigUint::from(49u32),
            q_inv: BigUint::from(38u32),
        };
        (public, private)
    }

    fn seeded_keypair() -> RsaKeyPair {
        let mut rng = StdRng::seed_from_u64(23);
        generate_keypair(&KeygenConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn test_djb2_known_values() {
        assert_eq!(djb2_digest(b""), 5381);
        assert_eq!(djb2_digest(b"hello"), 210714636441);
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let keypair = seeded_keypair();
        let data = b"Confidential research data requiring secure processing";

        let signature = keypair.private_key.sign(data);
        assert!(keypair.public_key.verify(data, &signature));
    }

    #[test]
    fn test_sign_verify_textbook_key() {
        let (public, private) = textbook_keys();
        let data = b"short";

        let signature = sign(data, &private);
        assert!(verify(data, &signature, &public));
    }

    #[test]
    fn test_tampered_data_fails() {
        let keypair = seeded_keypair();
        let data = b"original payload";
        let tampered = b"original payload!";

        let signature = keypair.private_key.sign(data);

        // the scheme only separates inputs whose digests differ mod n
        let n = &keypair.public_key.n;
        let original_digest = BigUint::from(djb2_digest(data)) % n;
        let tampered_digest = BigUint::from(djb2_digest(tampered)) % n;
        assert_ne!(original_digest, tampered_digest);

        assert!(!keypair.public_key.verify(tampered, &signature));
    }

    #[test]
    fn test_zeroed_signature_rejected() {
        let (public, _) = textbook_keys();
        let forged = Signature([0u8; SIGNATURE_BYTES]);
        // opens to 0, while the empty digest reduces to 5381 mod 3233 = 2148
        assert!(!verify(b"", &forged, &public));
    }

    #[test]
    fn test_empty_data_signs() {
        let keypair = seeded_keypair();
        let signature = keypair.private_key.sign(b"");
        assert!(keypair.public_key.verify(b"", &signature));
    }

    #[test]
    fn test_signature_displays_as_hex() {
        let signature = Signature([0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77]);
        assert_eq!(signature.to_string(), "0011223344556677");
    }
}
