//! The KeyGen algorithm.
//!
//! The data user (DU) and the data sender (DS) each pick a secret `a`, `b` in
//! `Z_r^*` and publish `PKu = aP` and `PKs = bP`. The two derivations are
//! independent; the role is only a label.

use subtle::{Choice, ConstantTimeEq};
use tracing::{debug, instrument};

use crate::pairing::{BilinearGroup, Scalar};
use crate::setup::PublicParams;
use crate::util::rand_nonzero_scalar;
use rand::{CryptoRng, RngCore};

/// Extra bits drawn on top of the group order size before reduction.
pub const SAMPLE_MARGIN_BITS: u64 = 64;

/// The principals taking part in KeyGen.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Role {
    DataUser,
    DataSender,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::DataUser => "DU",
            Role::DataSender => "DS",
        }
    }
}

/// A published public key.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PublicKey<B: BilinearGroup> {
    pub role: Role,
    pub element: B::G1,
}

impl<B: BilinearGroup> PublicKey<B> {
    pub fn to_bytes(&self, params: &PublicParams<B>) -> Vec<u8> {
        params.group().g1_to_bytes(&self.element)
    }

    /// Imports a public key, e.g. on the CA side.
    ///
    /// Rejects encodings outside G1 and the identity.
    pub fn from_bytes(params: &PublicParams<B>, role: Role, bytes: &[u8]) -> Option<Self> {
        let group = params.group();

        group
            .g1_from_bytes(bytes)
            .filter(|p| !group.is_g1_identity(p))
            .map(|element| PublicKey { role, element })
    }
}

/// Secret scalar and public element of one principal.
#[derive(Clone, Debug)]
pub struct KeyPair<B: BilinearGroup> {
    role: Role,
    secret: Scalar,
    public: B::G1,
}

impl<B: BilinearGroup> KeyPair<B> {
    pub fn role(&self) -> Role {
        self.role
    }

    /// The secret scalar, in `[1, r - 1]`.
    pub fn secret(&self) -> &Scalar {
        &self.secret
    }

    /// `secret * P`.
    pub fn public(&self) -> &B::G1 {
        &self.public
    }

    pub fn public_key(&self) -> PublicKey<B> {
        PublicKey {
            role: self.role,
            element: self.public.clone(),
        }
    }

    /// Canonical encoding of the public element, as sent to the CA.
    pub fn public_bytes(&self, params: &PublicParams<B>) -> Vec<u8> {
        params.group().g1_to_bytes(&self.public)
    }

    /// Recomputes `secret * P` and compares it with the stored public element.
    pub fn verify(&self, params: &PublicParams<B>) -> bool {
        let expected = params.group().g1_mul(params.generator(), &self.secret);
        let group = params.group();

        group
            .g1_to_bytes(&expected)
            .ct_eq(&group.g1_to_bytes(&self.public))
            .into()
    }
}

impl<B: BilinearGroup> ConstantTimeEq for KeyPair<B> {
    fn ct_eq(&self, other: &Self) -> Choice {
        let public = Choice::from((self.role == other.role && self.public == other.public) as u8);

        self.secret
            .to_bytes_be()
            .ct_eq(&other.secret.to_bytes_be())
            & public
    }
}

/// Key pairs of both principals.
#[derive(Clone, Debug)]
pub struct KeyGenOutput<B: BilinearGroup> {
    pub data_user: KeyPair<B>,
    pub data_sender: KeyPair<B>,
}

/// Samples a secret and computes its public element for `role`.
#[instrument(level = "debug", skip(params, rng), fields(role = role.label()))]
pub fn derive_key_pair<B, R>(params: &PublicParams<B>, role: Role, rng: &mut R) -> KeyPair<B>
where
    B: BilinearGroup,
    R: RngCore + CryptoRng,
{
    let secret = rand_nonzero_scalar(params.order(), SAMPLE_MARGIN_BITS, rng);
    let public = params.group().g1_mul(params.generator(), &secret);
    debug!(public = ?public, "derived key pair");

    KeyPair {
        role,
        secret,
        public,
    }
}

/// Runs KeyGen for the data user and the data sender.
pub fn keygen<B, R>(params: &PublicParams<B>, rng: &mut R) -> KeyGenOutput<B>
where
    B: BilinearGroup,
    R: RngCore + CryptoRng,
{
    KeyGenOutput {
        data_user: derive_key_pair(params, Role::DataUser, rng),
        data_sender: derive_key_pair(params, Role::DataSender, rng),
    }
}
