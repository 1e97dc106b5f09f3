//! Type-A domain parameter generation.
//!
//! A type-A parameter set describes the supersingular curve `y^2 = x^3 + x` over
//! `F_q` together with a subgroup of prime order `r`, where
//!
//! * `r = 2^exp2 + sign1 * 2^exp1 + sign0` is a Solinas prime,
//! * `q = h * r - 1` is prime and the cofactor `h` is a multiple of 12,
//!   hence `q = -1 (mod 12)`.
//!
//! The curve has `q + 1` points over `F_q` and embedding degree 2, so `r` is
//! the order of both pairing groups.

use core::fmt;

use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, Rng, RngCore};
use tracing::{debug, instrument, trace};

use crate::bigint::is_probable_prime;
use crate::config::SetupConfig;
use crate::error::{Error, Result};

/// Sign of a term in the Solinas form of the group order.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    pub fn as_i8(self) -> i8 {
        match self {
            Sign::Plus => 1,
            Sign::Minus => -1,
        }
    }

    pub fn from_i8(v: i8) -> Option<Self> {
        match v {
            1 => Some(Sign::Plus),
            -1 => Some(Sign::Minus),
            _ => None,
        }
    }

    fn random<R: RngCore>(rng: &mut R) -> Self {
        if rng.gen::<bool>() {
            Sign::Plus
        } else {
            Sign::Minus
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i8())
    }
}

/// `r = 2^exp2 + sign1 * 2^exp1 + sign0`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SolinasForm {
    pub exp2: u32,
    pub exp1: u32,
    pub sign1: Sign,
    pub sign0: Sign,
}

impl SolinasForm {
    /// The integer described by this form, if it is positive.
    pub fn value(&self) -> Option<BigUint> {
        let high = BigUint::one() << self.exp2 as usize;
        let mid = BigUint::one() << self.exp1 as usize;

        let r = match self.sign1 {
            Sign::Plus => high + mid,
            Sign::Minus if high > mid => high - mid,
            Sign::Minus => return None,
        };

        match self.sign0 {
            Sign::Plus => Some(r + 1u32),
            Sign::Minus if r > BigUint::one() => Some(r - 1u32),
            Sign::Minus => None,
        }
    }
}

/// Supported curve constructions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CurveKind {
    /// `y^2 = x^3 + x` with a Solinas prime group order.
    TypeA,
}

impl CurveKind {
    pub fn name(&self) -> &'static str {
        match self {
            CurveKind::TypeA => "a",
        }
    }
}

/// Output of the parameter generator. Immutable once created.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DomainParameters {
    pub security_bits: u32,
    /// Prime order `r` of G1 and GT.
    pub group_order: BigUint,
    /// Characteristic `q` of the base field.
    pub field_prime: BigUint,
    /// `h` with `h * r = q + 1`.
    pub cofactor: BigUint,
    pub solinas: SolinasForm,
    pub curve: CurveKind,
}

impl DomainParameters {
    /// Re-checks every structural invariant of a type-A parameter set.
    ///
    /// Used on parameter sets that come from outside the generator.
    pub fn validate(&self, rounds: usize) -> Result<()> {
        let corrupt = |what: &str| Err(Error::ParameterFileCorrupt(what.into()));
        let r = &self.group_order;
        let q = &self.field_prime;

        // bound the exponents before materializing 2^exp2
        let (exp1, exp2) = (u64::from(self.solinas.exp1), u64::from(self.solinas.exp2));
        if exp2 > r.bits() || exp1 == 0 || exp1 >= exp2 {
            return corrupt("Solinas exponents out of range for the group order");
        }
        if self.solinas.value().as_ref() != Some(r) {
            return corrupt("group order does not match its Solinas form");
        }
        if !is_probable_prime(r, rounds) {
            return corrupt("group order is not prime");
        }
        if !is_probable_prime(q, rounds) {
            return corrupt("field prime is not prime");
        }
        if &self.cofactor * r != q + 1u32 {
            return corrupt("cofactor times group order differs from field prime plus one");
        }
        if !(&self.cofactor % 12u32).is_zero() {
            return corrupt("cofactor is not a multiple of 12");
        }
        // r | h means r^2 | q + 1, where the pairing is trivial on G1
        if (&self.cofactor % r).is_zero() {
            return corrupt("group order divides the cofactor");
        }
        // r | q - 1 as well would make the pairing degenerate
        if (&(q - 1u32) % r).is_zero() {
            return corrupt("embedding degree is not 2");
        }

        Ok(())
    }
}

/// Generates a type-A parameter set for `config.security_bits`.
///
/// The group order gets exactly `security_bits + 1` bits. The search is bounded
/// by `config.max_attempts` group order candidates.
///
/// Cofactors divisible by `r` are skipped. For `security_bits = 1` the only
/// candidate is `r = 3`, which divides every `h = 12k`, so that size always
/// ends in [`Error::ParameterGenerationExhausted`].
#[instrument(level = "debug", skip(rng), fields(security_bits = config.security_bits))]
pub fn generate<R: RngCore + CryptoRng>(
    config: &SetupConfig,
    rng: &mut R,
) -> Result<DomainParameters> {
    config.validate()?;

    let rbits = config
        .security_bits
        .checked_add(1)
        .ok_or(Error::InvalidSecurityParameter {
            bits: config.security_bits,
        })?;
    let rounds = config.primality_rounds;

    let hbits = config
        .field_bits
        .saturating_sub(rbits)
        .saturating_sub(3)
        .max(3);
    let hbound = BigUint::one() << hbits as usize;

    for attempt in 1..=config.max_attempts {
        let (exp2, sign1) = if rng.gen::<bool>() {
            (rbits - 1, Sign::Plus)
        } else {
            (rbits, Sign::Minus)
        };
        if exp2 < 2 {
            continue;
        }

        let solinas = SolinasForm {
            exp2,
            exp1: rng.gen_range(1..exp2),
            sign1,
            sign0: Sign::random(rng),
        };

        let r = match solinas.value() {
            Some(r) if r.bits() == u64::from(rbits) && is_probable_prime(&r, rounds) => r,
            _ => continue,
        };
        trace!(attempt, %r, "prime group order candidate");

        for _ in 0..config.cofactor_attempts {
            let k = rng.gen_biguint_below(&hbound);
            if k.is_zero() {
                continue;
            }

            let h = k * 12u32;
            if (&h % &r).is_zero() {
                continue;
            }
            let q = &h * &r - 1u32;

            if is_probable_prime(&q, rounds) {
                debug!(attempt, %r, %q, "found type-A parameters");

                return Ok(DomainParameters {
                    security_bits: config.security_bits,
                    group_order: r,
                    field_prime: q,
                    cofactor: h,
                    solinas,
                    curve: CurveKind::TypeA,
                });
            }
        }
    }

    Err(Error::ParameterGenerationExhausted {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn assert_invariants(dp: &DomainParameters) {
        let r = &dp.group_order;
        let q = &dp.field_prime;

        assert!(is_probable_prime(r, 20));
        assert!(is_probable_prime(q, 20));
        assert!(((q + 1u32) % r).is_zero());
        assert_eq!(q % 12u32, BigUint::from(11u32));
        assert!(dp.validate(20).is_ok());
    }

    #[test]
    fn lambda_ten_gives_eleven_bit_order() {
        let mut rng = rand::thread_rng();
        let dp = generate(&SetupConfig::default(), &mut rng).unwrap();

        assert_eq!(dp.group_order.bits(), 11);
        assert_eq!(dp.curve, CurveKind::TypeA);
        assert_invariants(&dp);
    }

    #[test]
    fn invariants_hold_across_sizes() {
        let mut rng = rand::thread_rng();

        for &bits in [2u32, 3, 7, 16, 40, 80].iter() {
            let config = SetupConfig::with_security_bits(bits);
            let dp = generate(&config, &mut rng).unwrap();

            assert_eq!(dp.group_order.bits(), u64::from(bits) + 1);
            assert_invariants(&dp);
        }
    }

    #[test]
    fn larger_field_bits_widen_the_cofactor() {
        let mut rng = rand::thread_rng();
        let config = SetupConfig {
            security_bits: 20,
            field_bits: 96,
            ..SetupConfig::default()
        };
        let dp = generate(&config, &mut rng).unwrap();

        assert!(dp.field_prime.bits() > 80);
        assert_invariants(&dp);
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let config = SetupConfig::with_security_bits(24);
        let a = generate(&config, &mut ChaCha20Rng::seed_from_u64(7)).unwrap();
        let b = generate(&config, &mut ChaCha20Rng::seed_from_u64(7)).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn zero_security_bits_is_rejected() {
        let mut rng = rand::thread_rng();

        assert!(matches!(
            generate(&SetupConfig::with_security_bits(0), &mut rng),
            Err(Error::InvalidSecurityParameter { bits: 0 })
        ));
    }

    #[test]
    fn maximal_security_bits_is_rejected() {
        let mut rng = rand::thread_rng();

        assert!(matches!(
            generate(&SetupConfig::with_security_bits(u32::MAX), &mut rng),
            Err(Error::InvalidSecurityParameter { bits: u32::MAX })
        ));
    }

    #[test]
    fn search_is_bounded() {
        let mut rng = rand::thread_rng();
        let config = SetupConfig {
            security_bits: 256,
            max_attempts: 1,
            cofactor_attempts: 1,
            ..SetupConfig::default()
        };

        // a single candidate pair essentially never works at this size
        let results: Vec<_> = (0..4).map(|_| generate(&config, &mut rng)).collect();
        assert!(results
            .iter()
            .any(|r| matches!(r, Err(Error::ParameterGenerationExhausted { attempts: 1 }))));
    }

    #[test]
    fn solinas_form_value() {
        let form = SolinasForm {
            exp2: 10,
            exp1: 3,
            sign1: Sign::Plus,
            sign0: Sign::Minus,
        };
        assert_eq!(form.value(), Some(BigUint::from(1024u32 + 8 - 1)));

        let degenerate = SolinasForm {
            exp2: 1,
            exp1: 1,
            sign1: Sign::Minus,
            sign0: Sign::Plus,
        };
        assert_eq!(degenerate.value(), None);
    }

    #[test]
    fn cofactor_is_never_a_multiple_of_the_order() {
        for seed in 0..64 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let dp = generate(&SetupConfig::with_security_bits(2), &mut rng).unwrap();

            assert!(!(&dp.cofactor % &dp.group_order).is_zero());
            assert_invariants(&dp);
        }
    }

    #[test]
    fn lambda_one_is_exhausted() {
        let mut rng = rand::thread_rng();
        let config = SetupConfig {
            security_bits: 1,
            max_attempts: 200,
            ..SetupConfig::default()
        };

        assert!(matches!(
            generate(&config, &mut rng),
            Err(Error::ParameterGenerationExhausted { attempts: 200 })
        ));
    }

    #[test]
    fn validate_rejects_order_dividing_cofactor() {
        // r = 3, h = 36, q = 107 satisfies every other check
        let dp = DomainParameters {
            security_bits: 1,
            group_order: BigUint::from(3u32),
            field_prime: BigUint::from(107u32),
            cofactor: BigUint::from(36u32),
            solinas: SolinasForm {
                exp2: 2,
                exp1: 1,
                sign1: Sign::Minus,
                sign0: Sign::Plus,
            },
            curve: CurveKind::TypeA,
        };

        assert!(matches!(
            dp.validate(20),
            Err(Error::ParameterFileCorrupt(_))
        ));
    }

    #[test]
    fn validate_rejects_oversized_exponents() {
        let mut rng = rand::thread_rng();
        let dp = generate(&SetupConfig::default(), &mut rng).unwrap();

        let mut huge_exp2 = dp.clone();
        huge_exp2.solinas.exp2 = 4_000_000_000;
        assert!(matches!(
            huge_exp2.validate(20),
            Err(Error::ParameterFileCorrupt(_))
        ));

        let mut huge_exp1 = dp.clone();
        huge_exp1.solinas.exp1 = u32::MAX;
        assert!(matches!(
            huge_exp1.validate(20),
            Err(Error::ParameterFileCorrupt(_))
        ));

        let mut zero_exp1 = dp;
        zero_exp1.solinas.exp1 = 0;
        assert!(matches!(
            zero_exp1.validate(20),
            Err(Error::ParameterFileCorrupt(_))
        ));
    }

    #[test]
    fn validate_rejects_tampered_parameters() {
        let mut rng = rand::thread_rng();
        let mut dp = generate(&SetupConfig::default(), &mut rng).unwrap();
        dp.field_prime += 12u32;

        assert!(matches!(
            dp.validate(20),
            Err(Error::ParameterFileCorrupt(_))
        ));
    }
}
