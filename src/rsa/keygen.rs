// RSA Key Generation
// Derives the modulus and exponent pair from two random probable primes

use num_bigint::BigUint;
use num_traits::One;
use rand::Rng;
use tracing::debug;

use super::bigint::{gcd, mod_inverse, random_prime};
use super::error::{CryptoError, CryptoResult};

/// Fixed public exponent. 65537 is prime, so it is coprime to every totient
/// it does not divide.
pub const PUBLIC_EXPONENT: u64 = 65537;

/// Narrowest supported prime width. A 2-bit window holds exactly one odd
/// value with the top bit set, which would stall the distinctness redraw.
pub const MIN_PRIME_BITS: u64 = 3;

/// Widest supported prime width. Two 32-bit primes keep the modulus below
/// 2^64, so the fixed 8-byte block and signature encodings stay exact.
pub const MAX_PRIME_BITS: u64 = 32;

/// Miller-Rabin rounds used when the caller does not override them.
pub const DEFAULT_ROUNDS: u32 = 5;

/// Parameters for key generation
#[derive(Clone, Debug)]
pub struct KeygenConfig {
    /// Bit width of each generated prime
    pub prime_bits: u64,
    /// Miller-Rabin iterations per candidate
    pub rounds: u32,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            prime_bits: MAX_PRIME_BITS,
            rounds: DEFAULT_ROUNDS,
        }
    }
}

impl KeygenConfig {
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }
}

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub n: BigUint, // Modulus
    pub e: BigUint, // Public exponent
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub n: BigUint, // Modulus (same as public)
    pub d: BigUint, // Private exponent
    pub p: BigUint, // First prime factor
    pub q: BigUint, // Second prime factor
    // Pre-computed values for faster decryption
    pub d_p: BigUint,   // d mod (p-1)
    pub d_q: BigUint,   // d mod (q-1)
    pub q_inv: BigUint, // q^(-1) mod p
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub prime_bits: u64,
}

impl RsaPublicKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl RsaPrivateKey {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl RsaKeyPair {
    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

/// Generate an RSA key pair from the given config and random source.
///
/// The caller owns the generator, so a seeded `StdRng` makes the whole key
/// derivation deterministic. Prime search is the only retried step; a
/// non-invertible exponent is reported, not retried.
pub fn generate_keypair<R: Rng>(config: &KeygenConfig, rng: &mut R) -> CryptoResult<RsaKeyPair> {
    if !(MIN_PRIME_BITS..=MAX_PRIME_BITS).contains(&config.prime_bits) {
        return Err(CryptoError::InvalidBitWidth(config.prime_bits));
    }

    // Step 1: Generate two distinct random primes p and q
    let p = random_prime(config.prime_bits, config.rounds, rng);
    let mut q = random_prime(config.prime_bits, config.rounds, rng);
    while q == p {
        q = random_prime(config.prime_bits, config.rounds, rng);
    }

    // Ensure p > q (for q_inv calculation)
    let (p, q) = if p < q { (q, p) } else { (p, q) };

    // Step 2: Compute n = p * q
    let n = &p * &q;

    // Step 3: Compute phi(n) = (p-1)(q-1)
    let phi_n = (&p - 1u8) * (&q - 1u8);

    // Step 4: Verify e and phi(n) are coprime
    let e = BigUint::from(PUBLIC_EXPONENT);
    if !gcd(&e, &phi_n).is_one() {
        return Err(CryptoError::NonInvertibleExponent);
    }

    // Step 5: Compute d = e^(-1) mod phi(n)
    let d = mod_inverse(&e, &phi_n).ok_or(CryptoError::NonInvertibleExponent)?;

    // Step 6: Compute CRT parameters for faster decryption
    let p_minus_1 = &p - 1u8;
    let q_minus_1 = &q - 1u8;
    let d_p = &d % &p_minus_1;
    let d_q = &d % &q_minus_1;
    let q_inv = mod_inverse(&q, &p).ok_or(CryptoError::NonInvertibleExponent)?;

    debug!(
        prime_bits = config.prime_bits,
        modulus_bits = n.bits(),
        "derived RSA key pair"
    );

    let public_key = RsaPublicKey {
        n: n.clone(),
        e,
    };

    let private_key = RsaPrivateKey {
        n,
        d,
        p,
        q,
        d_p,
        d_q,
        q_inv,
    };

    Ok(RsaKeyPair {
        public_key,
        private_key,
        prime_bits: config.prime_bits,
    })
}

/// Generate an RSA key pair with default settings and the thread RNG
pub fn generate_default_keypair() -> CryptoResult<RsaKeyPair> {
    generate_keypair(&KeygenConfig::default(), &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn trial_division_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut factor = 2u64;
        while factor * factor <= n {
            if n % factor == 0 {
                return false;
            }
            factor += 1;
        }
        true
    }

    fn keypair_16_bits(seed: u64) -> RsaKeyPair {
        let config = KeygenConfig::default().with_prime_bits(16);
        let mut rng = StdRng::seed_from_u64(seed);
        generate_keypair(&config, &mut rng).unwrap()
    }

    #[test]
    fn test_key_generation_16_bit_primes() {
        let keypair = keypair_16_bits(42);
        let p = keypair.private_key.p.to_u64().unwrap();
        let q = keypair.private_key.q.to_u64().unwrap();

        assert_ne!(p, q);
        for prime in [p, q] {
            assert!(prime >= 1 << 15 && prime < 1 << 16);
            assert!(trial_division_prime(prime));
        }
    }

    #[test]
    fn test_key_properties() {
        let keypair = keypair_16_bits(42);

        // Verify n = p * q
        assert_eq!(
            keypair.private_key.n,
            &keypair.private_key.p * &keypair.private_key.q
        );

        // Verify e * d = 1 (mod phi(n))
        let phi_n = (&keypair.private_key.p - 1u8) * (&keypair.private_key.q - 1u8);
        let product = &keypair.public_key.e * &keypair.private_key.d;
        assert_eq!(product % &phi_n, BigUint::one());

        assert_eq!(keypair.public_key.e, BigUint::from(PUBLIC_EXPONENT));
        assert!(keypair.private_key.p > keypair.private_key.q);
    }

    #[test]
    fn test_crt_parameters() {
        let keypair = keypair_16_bits(7);
        let key = &keypair.private_key;

        assert_eq!(key.d_p, &key.d % (&key.p - 1u8));
        assert_eq!(key.d_q, &key.d % (&key.q - 1u8));
        assert_eq!((&key.q * &key.q_inv) % &key.p, BigUint::one());
    }

    #[test]
    fn test_invalid_bit_width() {
        let mut rng = StdRng::seed_from_u64(0);
        for bits in [0, 1, 2, MAX_PRIME_BITS + 1, 1024] {
            let config = KeygenConfig::default().with_prime_bits(bits);
            let result = generate_keypair(&config, &mut rng);
            assert_eq!(result, Err(CryptoError::InvalidBitWidth(bits)));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let first = keypair_16_bits(99);
        let second = keypair_16_bits(99);
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_keypair() {
        let keypair = generate_default_keypair().unwrap();
        assert_eq!(keypair.prime_bits, MAX_PRIME_BITS);
        // two 32-bit primes multiply into a 63- or 64-bit modulus
        assert!((63..=64).contains(&keypair.bit_length()));
    }
}
