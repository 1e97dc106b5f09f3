//! The scheme's hash functions `h1: G1 -> Z_r` and `h2: {0,1}* -> Z_r`.
//!
//! Both squeeze [`HASH_BYTES`] bytes of SHAKE256 over a domain tag and the
//! framed input, and reduce the result modulo the group order. Zero is a
//! possible, if negligible, output.

use num_bigint::BigUint;
use tracing::trace;

use crate::config::MessageEncoding;
use crate::pairing::{BilinearGroup, GroupElement, Scalar};
use crate::setup::PublicParams;
use crate::util::{bit_string, shake256_framed};

/// Output length of the hash-to-scalar derivation.
pub const HASH_BYTES: usize = 20;

const H1_DOMAIN: &[u8] = b"spe-h1-group-element";
const H2_DOMAIN: &[u8] = b"spe-h2-message";

fn to_scalar(digest: &[u8], order: &BigUint) -> Scalar {
    BigUint::from_bytes_be(digest) % order
}

/// Hashes a group element via its canonical encoding.
pub fn h1<B: BilinearGroup>(params: &PublicParams<B>, element: &GroupElement<B>) -> Scalar {
    let bytes = element.to_bytes(params.group());
    let digest = shake256_framed::<HASH_BYTES>(H1_DOMAIN, &[&bytes]);
    let scalar = to_scalar(&digest, params.order());
    trace!(group = ?element.group(), %scalar, "h1");

    scalar
}

/// Hashes a message after the configured pre-encoding.
pub fn h2<B: BilinearGroup>(params: &PublicParams<B>, message: &[u8]) -> Scalar {
    let digest = match params.message_encoding() {
        MessageEncoding::Raw => shake256_framed::<HASH_BYTES>(H2_DOMAIN, &[message]),
        MessageEncoding::BitString => {
            shake256_framed::<HASH_BYTES>(H2_DOMAIN, &[&bit_string(message)])
        }
    };
    let scalar = to_scalar(&digest, params.order());
    trace!(len = message.len(), %scalar, "h2");

    scalar
}
