use byteorder::{BigEndian, ByteOrder};
use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};
use tiny_keccak::Hasher;

/// Draws a scalar in `[1, order - 1]`.
///
/// Candidates come from `[0, 2^(bits(order) + margin))` and are reduced modulo
/// `order`, which keeps the bias below `2^-margin`. Zero is resampled.
pub fn rand_nonzero_scalar<R: RngCore + CryptoRng>(
    order: &BigUint,
    margin: u64,
    rng: &mut R,
) -> BigUint {
    loop {
        let candidate = rng.gen_biguint(order.bits() + margin);
        let scalar = candidate % order;
        if !scalar.is_zero() {
            return scalar;
        }
    }
}

/// SHAKE256 over the concatenation of `parts`, each prefixed by its length as
/// a big-endian `u32`.
pub fn shake256_framed<const N: usize>(domain: &[u8], parts: &[&[u8]]) -> [u8; N] {
    let mut digest = tiny_keccak::Shake::v256();
    let mut len = [0u8; 4];

    for part in core::iter::once(&domain).chain(parts.iter()) {
        BigEndian::write_u32(&mut len, part.len() as u32);
        digest.update(&len);
        digest.update(part);
    }

    let mut buf = [0u8; N];
    digest.finalize(&mut buf);

    buf
}

/// Renders every byte as its binary digits in ASCII '0'/'1', most significant
/// bit first and without leading zeros. A zero byte contributes nothing.
pub fn bit_string(message: &[u8]) -> Vec<u8> {
    message
        .iter()
        .flat_map(|&b| {
            let width = u8::BITS - b.leading_zeros();
            (0..width).rev().map(move |i| b'0' + ((b >> i) & 1))
        })
        .collect()
}
