//! Arbitrary precision helpers on top of [`num_bigint::BigUint`].
//!
//! These cover what the parameter generator and the type-A backend need from a
//! big integer library beyond plain arithmetic: primality testing, inversion
//! modulo a prime and fixed-width encodings.

use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Small primes used for trial division and as Miller-Rabin witnesses.
const SMALL_PRIMES: [u32; 64] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
    307, 311,
];

/// Probabilistic primality test.
///
/// Trial division by small primes, then Miller-Rabin using the first `rounds`
/// small primes as witnesses. The result is exact below 3.3 * 10^24 once
/// `rounds >= 13`.
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    if n < &BigUint::from(2u32) {
        return false;
    }

    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // n - 1 = d * 2^s with d odd
    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    SMALL_PRIMES
        .iter()
        .take(rounds.max(1))
        .map(|&a| BigUint::from(a))
        .filter(|a| a < &n_minus_one)
        .all(|a| {
            let mut x = a.modpow(&d, n);
            if x == one || x == n_minus_one {
                return true;
            }
            for _ in 1..s {
                x = (&x * &x) % n;
                if x == n_minus_one {
                    return true;
                }
            }
            false
        })
}

/// Inverse of `a` modulo the prime `p`, via Fermat's little theorem.
///
/// Returns zero when `a` is divisible by `p`.
pub fn inv_mod(a: &BigUint, p: &BigUint) -> BigUint {
    a.modpow(&(p - BigUint::from(2u32)), p)
}

/// `(a - b) mod p` for `a, b` already reduced modulo `p`.
pub fn sub_mod(a: &BigUint, b: &BigUint, p: &BigUint) -> BigUint {
    if a >= b {
        a - b
    } else {
        p - (b - a)
    }
}

/// `-a mod p` for `a` already reduced modulo `p`.
pub fn neg_mod(a: &BigUint, p: &BigUint) -> BigUint {
    if a.is_zero() {
        BigUint::zero()
    } else {
        p - a
    }
}

/// Number of bytes needed to hold any residue modulo `p`.
pub fn byte_len(p: &BigUint) -> usize {
    ((p.bits() + 7) / 8) as usize
}

/// Big-endian encoding of `x`, left padded with zeros to exactly `len` bytes.
///
/// The caller guarantees `x` fits.
pub fn to_fixed_be(x: &BigUint, len: usize) -> Vec<u8> {
    let bytes = x.to_bytes_be();
    let mut buf = vec![0u8; len];
    let skip = bytes.len().saturating_sub(len);
    buf[len - (bytes.len() - skip)..].copy_from_slice(&bytes[skip..]);

    buf
}

/// Binary digits of `k`, most significant first. Zero yields `[0]`.
pub fn bits_msb_first(k: &BigUint) -> Vec<u8> {
    k.to_radix_be(2)
}
