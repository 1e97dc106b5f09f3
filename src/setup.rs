//! The Setup algorithm.
//!
//! Given a security parameter, Setup generates a type-A parameter set, binds a
//! pairing instance to it, chooses a generator `P` of G1 and publishes
//!
//! `Para = (G1, GT, r, P, e, h1, h2)`
//!
//! as a [`PublicParams`]. Once built it is never mutated, so it can be shared by
//! reference between any number of key derivations.
//!
//! [`Setup`] exposes the same algorithm stage by stage, for callers that want
//! to inspect intermediate results. It walks the states
//!
//! `Uninitialized -> ParametersGenerated -> ContextInitialized -> GeneratorSelected -> Ready`
//!
//! and refuses hashing and key derivation before `Ready`.

use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;
use tracing::{debug, info, instrument};

use crate::config::{MessageEncoding, SetupConfig};
use crate::error::{Error, Result};
use crate::hash;
use crate::keygen::{self, KeyGenOutput, KeyPair, Role};
use crate::pairing::{BilinearGroup, GroupElement, Scalar, TypeA};
use crate::params::{self, DomainParameters};

/// Public parameters of the scheme, the `Ready` state of [`Setup`].
#[derive(Clone, Debug)]
pub struct PublicParams<B: BilinearGroup = TypeA> {
    domain: DomainParameters,
    group: B,
    generator: B::G1,
    message_encoding: MessageEncoding,
}

impl<B: BilinearGroup> PublicParams<B> {
    /// Runs the whole Setup algorithm.
    pub fn setup<R: RngCore + CryptoRng>(config: &SetupConfig, rng: &mut R) -> Result<Self> {
        Setup::run(config.clone(), rng)
    }

    /// Assembles public parameters from previously published parts.
    ///
    /// Fails when the generator is the identity.
    pub fn from_parts(
        domain: DomainParameters,
        group: B,
        generator: B::G1,
        message_encoding: MessageEncoding,
    ) -> Result<Self> {
        check_generator(&group, &generator)?;

        Ok(PublicParams {
            domain,
            group,
            generator,
            message_encoding,
        })
    }

    pub fn domain(&self) -> &DomainParameters {
        &self.domain
    }

    pub fn group(&self) -> &B {
        &self.group
    }

    /// Prime order `r` of G1 and GT.
    pub fn order(&self) -> &BigUint {
        self.group.order()
    }

    /// The generator `P` of G1.
    pub fn generator(&self) -> &B::G1 {
        &self.generator
    }

    pub fn message_encoding(&self) -> MessageEncoding {
        self.message_encoding
    }

    /// `e(P, P)`, which generates GT.
    pub fn pairing_of_generator(&self) -> B::Gt {
        self.group.pair(&self.generator, &self.generator)
    }

    /// `h1: G1 -> Z_r`.
    pub fn h1(&self, element: &GroupElement<B>) -> Scalar {
        hash::h1(self, element)
    }

    /// `h2: {0,1}* -> Z_r`.
    pub fn h2(&self, message: &[u8]) -> Scalar {
        hash::h2(self, message)
    }

    /// KeyGen for both principals.
    pub fn keygen<R: RngCore + CryptoRng>(&self, rng: &mut R) -> KeyGenOutput<B> {
        keygen::keygen(self, rng)
    }

    /// KeyGen for a single principal.
    pub fn derive_key_pair<R: RngCore + CryptoRng>(&self, role: Role, rng: &mut R) -> KeyPair<B> {
        keygen::derive_key_pair(self, role, rng)
    }

    /// Checks `e(2 g1, 3 g2) = e(g1, g2)^6` for fresh random `g1, g2`.
    pub fn verify_bilinearity<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<BilinearityCheck<B>> {
        check_bilinearity(
            &self.group,
            &BigUint::from(2u32),
            &BigUint::from(3u32),
            MAX_GENERATOR_DRAWS,
            rng,
        )
    }
}

fn check_generator<B: BilinearGroup>(group: &B, generator: &B::G1) -> Result<()> {
    if group.is_g1_identity(generator) {
        return Err(Error::InvalidConfig("generator is the identity".into()));
    }

    Ok(())
}

/// Bound on draws when sampling non-identity elements outside of [`Setup`].
const MAX_GENERATOR_DRAWS: usize = 1_000;

/// Draws a uniformly random non-identity element of G1.
///
/// The group order is prime, so any such element generates G1.
pub fn select_generator<B, R>(group: &B, max_attempts: usize, rng: &mut R) -> Result<B::G1>
where
    B: BilinearGroup,
    R: RngCore + CryptoRng,
{
    for attempt in 1..=max_attempts {
        let p = group.random_g1(rng);
        if !group.is_g1_identity(&p) {
            return Ok(p);
        }
        debug!(attempt, "drew the identity, resampling");
    }

    Err(Error::ParameterGenerationExhausted {
        attempts: max_attempts,
    })
}

/// Outcome of a bilinearity self-check.
#[derive(Clone, Debug)]
pub struct BilinearityCheck<B: BilinearGroup> {
    pub a: Scalar,
    pub b: Scalar,
    pub g1: B::G1,
    pub g2: B::G1,
    /// `e(a g1, b g2)`.
    pub lhs: B::Gt,
    /// `e(g1, g2)^(ab)`.
    pub rhs: B::Gt,
    holds: bool,
}

impl<B: BilinearGroup> BilinearityCheck<B> {
    /// Whether both sides have the same canonical encoding.
    pub fn holds(&self) -> bool {
        self.holds
    }
}

/// Evaluates `e(a g1, b g2)` and `e(g1, g2)^(ab)` for independent random `g1, g2`.
pub fn check_bilinearity<B, R>(
    group: &B,
    a: &Scalar,
    b: &Scalar,
    max_attempts: usize,
    rng: &mut R,
) -> Result<BilinearityCheck<B>>
where
    B: BilinearGroup,
    R: RngCore + CryptoRng,
{
    let g1 = select_generator(group, max_attempts, rng)?;
    let g2 = select_generator(group, max_attempts, rng)?;

    let lhs = group.pair(&group.g1_mul(&g1, a), &group.g1_mul(&g2, b));
    let rhs = group.gt_pow(&group.pair(&g1, &g2), &(a * b));

    let holds = group
        .gt_to_bytes(&lhs)
        .ct_eq(&group.gt_to_bytes(&rhs))
        .into();

    Ok(BilinearityCheck {
        a: a.clone(),
        b: b.clone(),
        g1,
        g2,
        lhs,
        rhs,
        holds,
    })
}

/// Progress of a [`Setup`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum SetupState {
    Uninitialized,
    ParametersGenerated,
    ContextInitialized,
    GeneratorSelected,
    Ready,
}

impl SetupState {
    fn next(self) -> Option<SetupState> {
        match self {
            SetupState::Uninitialized => Some(SetupState::ParametersGenerated),
            SetupState::ParametersGenerated => Some(SetupState::ContextInitialized),
            SetupState::ContextInitialized => Some(SetupState::GeneratorSelected),
            SetupState::GeneratorSelected => Some(SetupState::Ready),
            SetupState::Ready => None,
        }
    }
}

/// Stage-by-stage driver of the Setup algorithm.
///
/// ```ignore
/// let mut rng = rand::thread_rng();
/// let mut setup: Setup = Setup::new(SetupConfig::default());
///
/// setup.generate_parameters(&mut rng)?;
/// setup.initialize_context()?;
/// setup.select_generator(&mut rng)?;
/// let pp = setup.finalize()?;
/// ```
#[derive(Debug)]
pub struct Setup<B: BilinearGroup = TypeA> {
    config: SetupConfig,
    state: SetupState,
    domain: Option<DomainParameters>,
    group: Option<B>,
    generator: Option<B::G1>,
    params: Option<PublicParams<B>>,
}

impl<B: BilinearGroup> Setup<B> {
    pub fn new(config: SetupConfig) -> Self {
        Setup {
            config,
            state: SetupState::Uninitialized,
            domain: None,
            group: None,
            generator: None,
            params: None,
        }
    }

    /// Runs every stage and returns the public parameters.
    #[instrument(level = "info", skip(rng), fields(security_bits = config.security_bits))]
    pub fn run<R: RngCore + CryptoRng>(config: SetupConfig, rng: &mut R) -> Result<PublicParams<B>> {
        let mut setup = Setup::new(config);

        setup.generate_parameters(rng)?;
        setup.initialize_context()?;
        setup.select_generator(rng)?;
        setup.finalize()?;

        setup.into_params()
    }

    pub fn state(&self) -> SetupState {
        self.state
    }

    pub fn config(&self) -> &SetupConfig {
        &self.config
    }

    /// The generated parameter set, once available.
    pub fn domain(&self) -> Option<&DomainParameters> {
        match &self.params {
            Some(pp) => Some(pp.domain()),
            None => self.domain.as_ref(),
        }
    }

    fn enter(&mut self, to: SetupState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(Error::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;

        Ok(())
    }

    fn expect_next(&self, to: SetupState) -> Result<()> {
        if self.state.next() != Some(to) {
            return Err(Error::InvalidTransition {
                from: self.state,
                to,
            });
        }

        Ok(())
    }

    /// `Uninitialized -> ParametersGenerated`.
    pub fn generate_parameters<R: RngCore + CryptoRng>(
        &mut self,
        rng: &mut R,
    ) -> Result<&DomainParameters> {
        self.expect_next(SetupState::ParametersGenerated)?;

        let dp = params::generate(&self.config, rng)?;
        info!(r = %dp.group_order, q = %dp.field_prime, "generated domain parameters");

        self.enter(SetupState::ParametersGenerated)?;
        Ok(self.domain.insert(dp))
    }

    /// `ParametersGenerated -> ContextInitialized`.
    pub fn initialize_context(&mut self) -> Result<&B> {
        self.expect_next(SetupState::ContextInitialized)?;

        let dp = self.domain.as_ref().ok_or(Error::ContextNotReady { state: self.state })?;
        let group = B::init(dp)?;

        self.enter(SetupState::ContextInitialized)?;
        Ok(self.group.insert(group))
    }

    /// `ContextInitialized -> GeneratorSelected`.
    pub fn select_generator<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<&B::G1> {
        self.expect_next(SetupState::GeneratorSelected)?;

        let group = self.group.as_ref().ok_or(Error::ContextNotReady { state: self.state })?;
        let p = select_generator(group, self.config.max_attempts, rng)?;
        debug!(generator = ?p, "selected generator");

        self.enter(SetupState::GeneratorSelected)?;
        Ok(self.generator.insert(p))
    }

    /// `GeneratorSelected -> Ready`.
    pub fn finalize(&mut self) -> Result<&PublicParams<B>> {
        self.expect_next(SetupState::Ready)?;

        // the stage keeps its parts unless every check passes
        match (&self.domain, &self.group, &self.generator) {
            (Some(_), Some(group), Some(generator)) => check_generator(group, generator)?,
            _ => return Err(Error::ContextNotReady { state: self.state }),
        }

        let pp = match (self.domain.take(), self.group.take(), self.generator.take()) {
            (Some(domain), Some(group), Some(generator)) => PublicParams {
                domain,
                group,
                generator,
                message_encoding: self.config.message_encoding,
            },
            _ => return Err(Error::ContextNotReady { state: self.state }),
        };

        self.enter(SetupState::Ready)?;
        Ok(self.params.insert(pp))
    }

    /// The published parameters; fails before `Ready`.
    pub fn params(&self) -> Result<&PublicParams<B>> {
        self.params
            .as_ref()
            .ok_or(Error::ContextNotReady { state: self.state })
    }

    pub fn into_params(self) -> Result<PublicParams<B>> {
        let state = self.state;
        self.params.ok_or(Error::ContextNotReady { state })
    }

    /// Bilinearity self-check, available once the pairing is initialized.
    pub fn check_bilinearity<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<BilinearityCheck<B>> {
        if let Some(pp) = &self.params {
            return pp.verify_bilinearity(rng);
        }

        let group = self
            .group
            .as_ref()
            .ok_or(Error::ContextNotReady { state: self.state })?;

        check_bilinearity(
            group,
            &BigUint::from(2u32),
            &BigUint::from(3u32),
            self.config.max_attempts,
            rng,
        )
    }

    pub fn h1(&self, element: &GroupElement<B>) -> Result<Scalar> {
        Ok(self.params()?.h1(element))
    }

    pub fn h2(&self, message: &[u8]) -> Result<Scalar> {
        Ok(self.params()?.h2(message))
    }

    pub fn keygen<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<KeyGenOutput<B>> {
        Ok(self.params()?.keygen(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_setup_reaches_ready() {
        let mut rng = rand::thread_rng();
        let mut setup: Setup = Setup::new(SetupConfig::default());
        assert_eq!(setup.state(), SetupState::Uninitialized);

        setup.generate_parameters(&mut rng).unwrap();
        assert_eq!(setup.state(), SetupState::ParametersGenerated);
        assert_eq!(setup.domain().unwrap().group_order.bits(), 11);

        setup.initialize_context().unwrap();
        assert_eq!(setup.state(), SetupState::ContextInitialized);
        assert!(setup.check_bilinearity(&mut rng).unwrap().holds());

        let p = setup.select_generator(&mut rng).unwrap().clone();
        assert_eq!(setup.state(), SetupState::GeneratorSelected);

        let pp = setup.finalize().unwrap();
        assert_eq!(pp.generator(), &p);
        assert_eq!(setup.state(), SetupState::Ready);
        assert!(setup.domain().is_some());
    }

    #[test]
    fn hashing_and_keygen_require_ready() {
        let mut rng = rand::thread_rng();
        let mut setup: Setup = Setup::new(SetupConfig::default());

        assert!(matches!(
            setup.h2(b"HelloWorld"),
            Err(Error::ContextNotReady {
                state: SetupState::Uninitialized
            })
        ));

        setup.generate_parameters(&mut rng).unwrap();
        setup.initialize_context().unwrap();
        let p = setup.select_generator(&mut rng).unwrap().clone();

        assert!(matches!(
            setup.h1(&GroupElement::G1(p)),
            Err(Error::ContextNotReady {
                state: SetupState::GeneratorSelected
            })
        ));
        assert!(matches!(
            setup.keygen(&mut rng),
            Err(Error::ContextNotReady { .. })
        ));
        assert!(matches!(
            setup.params(),
            Err(Error::ContextNotReady { .. })
        ));

        setup.finalize().unwrap();
        assert!(setup.h2(b"HelloWorld").is_ok());
        assert!(setup.keygen(&mut rng).is_ok());
    }

    #[test]
    fn out_of_order_stages_are_rejected() {
        let mut rng = rand::thread_rng();
        let mut setup: Setup = Setup::new(SetupConfig::default());

        assert!(matches!(
            setup.select_generator(&mut rng),
            Err(Error::InvalidTransition {
                from: SetupState::Uninitialized,
                to: SetupState::GeneratorSelected
            })
        ));
        assert!(matches!(
            setup.check_bilinearity(&mut rng),
            Err(Error::ContextNotReady { .. })
        ));

        setup.generate_parameters(&mut rng).unwrap();
        assert!(matches!(
            setup.generate_parameters(&mut rng),
            Err(Error::InvalidTransition { .. })
        ));
        assert_eq!(setup.state(), SetupState::ParametersGenerated);
    }

    #[test]
    fn invalid_security_parameter_fails_before_any_context() {
        let mut rng = rand::thread_rng();
        let mut setup: Setup = Setup::new(SetupConfig::with_security_bits(0));

        assert!(matches!(
            setup.generate_parameters(&mut rng),
            Err(Error::InvalidSecurityParameter { bits: 0 })
        ));
        assert_eq!(setup.state(), SetupState::Uninitialized);
        assert!(setup.domain().is_none());
    }

    #[test]
    fn generator_is_never_identity() {
        let mut rng = rand::thread_rng();

        for bits in 2..=6 {
            let pp: PublicParams =
                PublicParams::setup(&SetupConfig::with_security_bits(bits), &mut rng).unwrap();
            assert!(!pp.group().is_g1_identity(pp.generator()));
            assert_ne!(pp.pairing_of_generator(), pp.group().gt_identity());
        }
    }

    #[test]
    fn bilinearity_self_check() {
        let mut rng = rand::thread_rng();
        let pp: PublicParams = PublicParams::setup(&SetupConfig::default(), &mut rng).unwrap();
        let check = pp.verify_bilinearity(&mut rng).unwrap();

        assert!(check.holds());
        assert_eq!(check.a, BigUint::from(2u32));
        assert_eq!(check.b, BigUint::from(3u32));
        assert_eq!(check.lhs, check.rhs);
    }

    #[test]
    fn small_orders_never_give_a_degenerate_pairing() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha20Rng;

        for seed in 0..64 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let pp: PublicParams =
                PublicParams::setup(&SetupConfig::with_security_bits(2), &mut rng).unwrap();

            assert_ne!(pp.pairing_of_generator(), pp.group().gt_identity());
        }

        // r = 3 divides every cofactor, so no usable context exists
        let mut rng = rand::thread_rng();
        let config = SetupConfig {
            security_bits: 1,
            max_attempts: 100,
            ..SetupConfig::default()
        };
        match PublicParams::<TypeA>::setup(&config, &mut rng) {
            Ok(pp) => assert_ne!(pp.pairing_of_generator(), pp.group().gt_identity()),
            Err(e) => assert!(matches!(
                e,
                Error::ParameterGenerationExhausted { attempts: 100 }
            )),
        }
    }

    #[test]
    fn failed_finalize_keeps_the_stage() {
        let mut rng = rand::thread_rng();
        let mut setup: Setup = Setup::new(SetupConfig::default());

        setup.generate_parameters(&mut rng).unwrap();
        setup.initialize_context().unwrap();
        let p = setup.select_generator(&mut rng).unwrap().clone();

        let identity = setup.group.as_ref().unwrap().g1_identity();
        setup.generator = Some(identity);

        assert!(matches!(setup.finalize(), Err(Error::InvalidConfig(_))));
        assert_eq!(setup.state(), SetupState::GeneratorSelected);
        assert!(setup.domain().is_some());
        assert!(setup.group.is_some());
        assert!(setup.generator.is_some());

        setup.generator = Some(p.clone());
        assert_eq!(setup.finalize().unwrap().generator(), &p);
        assert_eq!(setup.state(), SetupState::Ready);
    }

    #[test]
    fn from_parts_rejects_identity_generator() {
        let mut rng = rand::thread_rng();
        let pp: PublicParams = PublicParams::setup(&SetupConfig::default(), &mut rng).unwrap();

        assert!(PublicParams::from_parts(
            pp.domain().clone(),
            pp.group().clone(),
            pp.group().g1_identity(),
            MessageEncoding::Raw,
        )
        .is_err());
    }
}
