//! Quadratic extension `F_q[i] / (i^2 + 1)` for `q = 3 (mod 4)`.

use num_bigint::BigUint;
use num_traits::{One, Zero};

use crate::bigint::{bits_msb_first, inv_mod, neg_mod, sub_mod};

/// `re + im * i`, both coordinates reduced modulo `q`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Fq2 {
    pub re: BigUint,
    pub im: BigUint,
}

impl Fq2 {
    pub fn one() -> Self {
        Fq2 {
            re: BigUint::one(),
            im: BigUint::zero(),
        }
    }

    pub fn new(re: BigUint, im: BigUint) -> Self {
        Fq2 { re, im }
    }

    pub fn mul(&self, other: &Fq2, q: &BigUint) -> Fq2 {
        let ac = &self.re * &other.re;
        let bd = &self.im * &other.im;
        let ad = &self.im * &other.re;
        let bc = &self.re * &other.im;

        Fq2 {
            re: sub_mod(&(ac % q), &(bd % q), q),
            im: (ad + bc) % q,
        }
    }

    pub fn square(&self, q: &BigUint) -> Fq2 {
        // (a + b)(a - b) + 2ab i
        let sum = (&self.re + &self.im) % q;
        let diff = sub_mod(&self.re, &self.im, q);

        Fq2 {
            re: (sum * diff) % q,
            im: (&self.re * &self.im * 2u32) % q,
        }
    }

    /// Frobenius `x -> x^q`, which is conjugation since `i^q = -i`.
    pub fn conjugate(&self, q: &BigUint) -> Fq2 {
        Fq2 {
            re: self.re.clone(),
            im: neg_mod(&self.im, q),
        }
    }

    /// `(a - b i) / (a^2 + b^2)`. Zero maps to zero.
    pub fn invert(&self, q: &BigUint) -> Fq2 {
        let norm = (&self.re * &self.re + &self.im * &self.im) % q;
        let inv = inv_mod(&norm, q);
        let conj = self.conjugate(q);

        Fq2 {
            re: (conj.re * &inv) % q,
            im: (conj.im * &inv) % q,
        }
    }

    pub fn pow(&self, k: &BigUint, q: &BigUint) -> Fq2 {
        let mut acc = Fq2::one();
        if k.is_zero() {
            return acc;
        }

        for bit in bits_msb_first(k) {
            acc = acc.square(q);
            if bit == 1 {
                acc = acc.mul(self, q);
            }
        }

        acc
    }
}
