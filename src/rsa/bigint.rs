// RSA Big Integer Operations
// Modular arithmetic and primality testing on top of num-bigint

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;
use tracing::debug;

/// Modular exponentiation: base^exp mod modulus
/// Uses square-and-multiply, O(log exp) modular multiplications
pub fn mod_pow(base: &BigUint, exp: &BigUint, modulus: &BigUint) -> BigUint {
    if modulus.is_one() {
        return BigUint::zero();
    }

    let mut result = BigUint::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        base = (&base * &base) % modulus;
        exp >>= 1;
    }

    result
}

/// Extended Euclidean Algorithm
/// Returns (gcd, x, y) such that a*x + b*y = gcd = gcd(a, b)
///
/// Runs over `BigInt` because the Bezout coefficients go negative along the
/// way even when both inputs are positive.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }

    let (gcd, x1, y1) = extended_gcd(b, &(a % b));
    let x = y1.clone();
    let y = x1 - (a / b) * y1;

    (gcd, x, y)
}

/// Compute modular inverse: a^(-1) mod m, normalized into [0, m)
/// Returns None if gcd(a, m) != 1 and no inverse exists
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a = BigInt::from(a.clone());
    let m = BigInt::from(m.clone());

    let (gcd, x, _) = extended_gcd(&a, &m);
    if !gcd.is_one() {
        return None;
    }

    let inverse = ((x % &m) + &m) % &m;
    inverse.to_biguint()
}

/// Greatest common divisor
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Draw a random odd integer occupying exactly `bits` bits: the top bit and
/// the low bit are forced after the random fill.
///
/// `bits` must be at least 1; key generation validates the width before
/// calling in here.
pub fn random_candidate<R: Rng>(bits: u64, rng: &mut R) -> BigUint {
    let mut candidate = rng.gen_biguint(bits);
    candidate |= BigUint::one() << (bits - 1);
    candidate |= BigUint::one();
    candidate
}

/// Miller-Rabin primality test
/// Returns true if n is probably prime; `rounds` witnesses drive the
/// false-positive probability down by ~4^-rounds
pub fn is_probable_prime<R: Rng>(n: &BigUint, rounds: u32, rng: &mut R) -> bool {
    let two = BigUint::from(2u8);

    if n < &two {
        return false;
    }
    if *n == two || *n == BigUint::from(3u8) {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    // Witness loop
    for _ in 0..rounds {
        // Pick random witness in [2, n-2]
        let witness = rng.gen_biguint_range(&two, &n_minus_one);

        let mut x = mod_pow(&witness, &d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }

        let mut found_minus_one = false;
        for _ in 1..s {
            x = mod_pow(&x, &two, n);
            if x == n_minus_one {
                found_minus_one = true;
                break;
            }
        }

        if !found_minus_one {
            // Composite
            return false;
        }
    }

    // Probably prime
    true
}

/// Sample odd candidates of the requested width until one passes the
/// Miller-Rabin test. Unbounded loop, bounded in expectation: roughly one
/// candidate in `bits * ln 2 / 2` is prime.
pub fn random_prime<R: Rng>(bits: u64, rounds: u32, rng: &mut R) -> BigUint {
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let candidate = random_candidate(bits, rng);
        if is_probable_prime(&candidate, rounds, rng) {
            debug!(bits, attempts, "accepted probable prime");
            return candidate;
        }
    }
}
