//! Symmetric bilinear groups `e: G1 x G1 -> GT` of prime order.
//!
//! The rest of the crate only talks to a pairing through [`BilinearGroup`], so a
//! different backing library can be plugged in. The [`type_a`] backend realises
//! it on the supersingular curve `y^2 = x^3 + x` for parameters produced by
//! [`crate::params::generate`].

pub mod type_a;

mod fq2;

use core::fmt::Debug;

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};

use crate::error::Result;
use crate::params::DomainParameters;

pub use type_a::TypeA;

/// Scalars are integers modulo the group order.
pub type Scalar = BigUint;

/// A pairing-friendly group pair with a symmetric pairing.
///
/// Implementations are immutable once initialized; every operation takes `&self`.
pub trait BilinearGroup: Clone + Debug + Sized {
    /// Element of the source group G1.
    type G1: Clone + Debug + Eq;

    /// Element of the target group GT.
    type Gt: Clone + Debug + Eq;

    /// Binds a pairing instance to a parameter set.
    fn init(params: &DomainParameters) -> Result<Self>;

    /// Prime order of G1 and GT.
    fn order(&self) -> &BigUint;

    fn g1_identity(&self) -> Self::G1;

    fn is_g1_identity(&self, p: &Self::G1) -> bool;

    /// Uniformly random element of G1, possibly the identity.
    fn random_g1<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Self::G1;

    fn g1_add(&self, a: &Self::G1, b: &Self::G1) -> Self::G1;

    fn g1_neg(&self, a: &Self::G1) -> Self::G1;

    /// Scalar multiplication `k * p`.
    fn g1_mul(&self, p: &Self::G1, k: &Scalar) -> Self::G1;

    /// The pairing `e(p, q)`.
    fn pair(&self, p: &Self::G1, q: &Self::G1) -> Self::Gt;

    fn gt_identity(&self) -> Self::Gt;

    fn gt_mul(&self, a: &Self::Gt, b: &Self::Gt) -> Self::Gt;

    /// Exponentiation `a^k` in GT.
    fn gt_pow(&self, a: &Self::Gt, k: &Scalar) -> Self::Gt;

    /// Canonical fixed-width encoding of a G1 element.
    fn g1_to_bytes(&self, p: &Self::G1) -> Vec<u8>;

    /// Decodes a G1 element, rejecting anything outside the order `r` subgroup.
    fn g1_from_bytes(&self, bytes: &[u8]) -> Option<Self::G1>;

    /// Canonical fixed-width encoding of a GT element.
    fn gt_to_bytes(&self, a: &Self::Gt) -> Vec<u8>;
}

/// The group an element belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupKind {
    G1,
    Gt,
}

impl GroupKind {
    fn tag(self) -> u8 {
        match self {
            GroupKind::G1 => 0x01,
            GroupKind::Gt => 0x02,
        }
    }
}

/// An element of either pairing group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GroupElement<B: BilinearGroup> {
    G1(B::G1),
    Gt(B::Gt),
}

impl<B: BilinearGroup> GroupElement<B> {
    pub fn group(&self) -> GroupKind {
        match self {
            GroupElement::G1(_) => GroupKind::G1,
            GroupElement::Gt(_) => GroupKind::Gt,
        }
    }

    /// Group tag byte followed by the backend's canonical encoding.
    pub fn to_bytes(&self, group: &B) -> Vec<u8> {
        let body = match self {
            GroupElement::G1(p) => group.g1_to_bytes(p),
            GroupElement::Gt(a) => group.gt_to_bytes(a),
        };

        let mut buf = Vec::with_capacity(body.len() + 1);
        buf.push(self.group().tag());
        buf.extend_from_slice(&body);

        buf
    }
}
