//! Setup and KeyGen of a searchable public-key encryption scheme on symmetric type-A pairings.
//!
//! Setup generates a type-A parameter set for a security parameter λ (a Solinas prime group
//! order `r` of λ + 1 bits and a field prime `q = h r - 1`), binds a pairing `e: G1 x G1 -> GT`
//! on the supersingular curve `y^2 = x^3 + x` to it and selects a generator `P`. The public
//! parameters also fix two hash functions `h1: G1 -> Z_r` and `h2: {0,1}* -> Z_r`.
//!
//! KeyGen derives key pairs for the data user and the data sender.
//!
//! # Examples
//!
//! ```
//! use spe::{PublicParams, SetupConfig, GroupElement};
//!
//! let mut rng = rand::thread_rng();
//!
//! // Generate public parameters for security parameter 10.
//! let pp: PublicParams = PublicParams::setup(&SetupConfig::with_security_bits(10), &mut rng)?;
//!
//! // Hash the generator and a message.
//! let hp = pp.h1(&GroupElement::G1(pp.generator().clone()));
//! let hm = pp.h2(b"HelloWorld");
//!
//! // Derive key pairs for the data user and the data sender.
//! let keys = pp.keygen(&mut rng);
//! assert!(keys.data_user.verify(&pp));
//! # Ok::<(), spe::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

#[cfg(test)]
#[macro_use]
mod test_macros;

mod bigint;
mod util;

pub mod config;
pub mod dump;
pub mod error;
pub mod hash;
pub mod keygen;
pub mod pairing;
pub mod params;
pub mod setup;

pub use config::{MessageEncoding, SetupConfig};
pub use error::{Error, Result};
pub use keygen::{KeyGenOutput, KeyPair, PublicKey, Role};
pub use pairing::{BilinearGroup, GroupElement, Scalar, TypeA};
pub use params::DomainParameters;
pub use setup::{PublicParams, Setup, SetupState};
