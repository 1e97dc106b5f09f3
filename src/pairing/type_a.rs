//! Symmetric pairing on the type-A curve `E: y^2 = x^3 + x` over `F_q`.
//!
//! For `q = 3 (mod 4)` the curve is supersingular with `#E(F_q) = q + 1` and
//! embedding degree 2. G1 is the subgroup of prime order `r`, reached from a
//! random curve point by multiplying with the cofactor `h = (q + 1) / r`.
//! GT is the order `r` subgroup of `F_{q^2}^*`.
//!
//! The pairing is the reduced Tate pairing composed with the distortion map
//! `φ(x, y) = (-x, i y)`:
//!
//! `e(P, Q) = f_{r,P}(φ(Q))^((q^2 - 1) / r)`
//!
//! `φ(Q)` has its x-coordinate in `F_q`, so every vertical line evaluates into
//! `F_q^*` and is wiped out by the `q - 1` factor of the final exponent. The
//! Miller loop therefore only accumulates chord and tangent lines.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::Zero;
use rand::{CryptoRng, Rng, RngCore};

use super::fq2::Fq2;
use super::{BilinearGroup, Scalar};
use crate::bigint::{bits_msb_first, byte_len, inv_mod, neg_mod, sub_mod, to_fixed_be};
use crate::error::{Error, Result};
use crate::params::{CurveKind, DomainParameters};

/// A point of `E(F_q)` in affine coordinates.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Point {
    Infinity,
    Affine { x: BigUint, y: BigUint },
}

impl Point {
    pub fn is_infinity(&self) -> bool {
        matches!(self, Point::Infinity)
    }
}

/// Element of the target group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Gt(Fq2);

/// Type-A pairing instance bound to one parameter set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeA {
    q: BigUint,
    r: BigUint,
    /// `(q + 1) / r`, also the hard part of the final exponentiation.
    h: BigUint,
    /// `(q + 1) / 4`, the square root exponent.
    sqrt_exp: BigUint,
    width: usize,
}

impl TypeA {
    pub fn field_prime(&self) -> &BigUint {
        &self.q
    }

    pub fn cofactor(&self) -> &BigUint {
        &self.h
    }

    /// Whether `(x, y)` satisfies the curve equation.
    pub fn is_on_curve(&self, p: &Point) -> bool {
        match p {
            Point::Infinity => true,
            Point::Affine { x, y } => (y * y) % &self.q == self.rhs(x),
        }
    }

    /// `x^3 + x mod q`.
    fn rhs(&self, x: &BigUint) -> BigUint {
        (x * x * x + x) % &self.q
    }

    fn add_points(&self, a: &Point, b: &Point) -> Point {
        let q = &self.q;

        let (x1, y1, x2, y2) = match (a, b) {
            (Point::Infinity, _) => return b.clone(),
            (_, Point::Infinity) => return a.clone(),
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };

        if x1 == x2 {
            if y1 == y2 && !y1.is_zero() {
                return self.double_point(a);
            }
            return Point::Infinity;
        }

        let lambda = (sub_mod(y2, y1, q) * inv_mod(&sub_mod(x2, x1, q), q)) % q;
        let (x, y) = self.chord_point(&lambda, x1, y1, x2);

        Point::Affine { x, y }
    }

    fn double_point(&self, a: &Point) -> Point {
        match a {
            Point::Affine { x, y } if !y.is_zero() => {
                let lambda = self.tangent_slope(x, y);
                let (x3, y3) = self.chord_point(&lambda, x, y, x);

                Point::Affine { x: x3, y: y3 }
            }
            _ => Point::Infinity,
        }
    }

    /// `(3x^2 + 1) / 2y`.
    fn tangent_slope(&self, x: &BigUint, y: &BigUint) -> BigUint {
        let q = &self.q;
        let num = (x * x * 3u32 + 1u32) % q;
        let den = (y * 2u32) % q;

        (num * inv_mod(&den, q)) % q
    }

    /// Third intersection of the line with slope `lambda` through `(x1, y1)`,
    /// reflected: `x3 = λ^2 - x1 - x2`, `y3 = λ(x1 - x3) - y1`.
    fn chord_point(
        &self,
        lambda: &BigUint,
        x1: &BigUint,
        y1: &BigUint,
        x2: &BigUint,
    ) -> (BigUint, BigUint) {
        let q = &self.q;
        let x3 = sub_mod(&((lambda * lambda) % q), &((x1 + x2) % q), q);
        let y3 = sub_mod(&((lambda * sub_mod(x1, &x3, q)) % q), y1, q);

        (x3, y3)
    }

    /// Line with slope `lambda` through `(tx, ty)`, evaluated at `φ(Q)`:
    /// `(λ(x_Q + x_T) - y_T) + y_Q i`.
    fn line_at_distorted(
        &self,
        lambda: &BigUint,
        tx: &BigUint,
        ty: &BigUint,
        qx: &BigUint,
        qy: &BigUint,
    ) -> Fq2 {
        let q = &self.q;
        let re = sub_mod(&((lambda * ((qx + tx) % q)) % q), ty, q);

        Fq2::new(re, qy.clone())
    }

    fn miller_loop(&self, px: &BigUint, py: &BigUint, qx: &BigUint, qy: &BigUint) -> Fq2 {
        let q = &self.q;
        let mut f = Fq2::one();
        let mut tx = px.clone();
        let mut ty = py.clone();

        for bit in bits_msb_first(&self.r).into_iter().skip(1) {
            if ty.is_zero() {
                // T has order 2, which an element of odd prime order never reaches
                break;
            }

            let lambda = self.tangent_slope(&tx, &ty);
            f = f
                .square(q)
                .mul(&self.line_at_distorted(&lambda, &tx, &ty, qx, qy), q);
            let (x, y) = self.chord_point(&lambda, &tx, &ty, &tx);
            tx = x;
            ty = y;

            if bit == 1 {
                // T = -P only at the very last step (T = (r - 1)P); the line is vertical
                if &tx == px {
                    break;
                }

                let lambda = (sub_mod(py, &ty, q) * inv_mod(&sub_mod(px, &tx, q), q)) % q;
                f = f.mul(&self.line_at_distorted(&lambda, &tx, &ty, qx, qy), q);
                let (x, y) = self.chord_point(&lambda, &tx, &ty, px);
                tx = x;
                ty = y;
            }
        }

        f
    }

    /// `f^((q^2 - 1) / r) = (f^(q - 1))^((q + 1) / r)`.
    fn final_exponentiation(&self, f: &Fq2) -> Fq2 {
        let q = &self.q;
        let easy = f.conjugate(q).mul(&f.invert(q), q);

        easy.pow(&self.h, q)
    }
}

impl BilinearGroup for TypeA {
    type G1 = Point;
    type Gt = Gt;

    fn init(params: &DomainParameters) -> Result<Self> {
        let CurveKind::TypeA = params.curve;
        let q = params.field_prime.clone();
        let r = params.group_order.clone();

        let q_plus_one = &q + 1u32;
        if (&q % 4u32) != BigUint::from(3u32) {
            return Err(Error::ParameterFileCorrupt(
                "field prime is not 3 mod 4".into(),
            ));
        }
        if r.is_zero() || r.is_even() || !(&q_plus_one % &r).is_zero() {
            return Err(Error::ParameterFileCorrupt(
                "group order does not divide the curve order".into(),
            ));
        }

        let h = &q_plus_one / &r;
        if (&h % &r).is_zero() {
            return Err(Error::ParameterFileCorrupt(
                "group order divides the cofactor".into(),
            ));
        }

        Ok(TypeA {
            width: byte_len(&q),
            sqrt_exp: &q_plus_one >> 2u32,
            h,
            q,
            r,
        })
    }

    fn order(&self) -> &BigUint {
        &self.r
    }

    fn g1_identity(&self) -> Point {
        Point::Infinity
    }

    fn is_g1_identity(&self, p: &Point) -> bool {
        p.is_infinity()
    }

    fn random_g1<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Point {
        let q = &self.q;

        // about half of all x yield a point
        loop {
            let x = rng.gen_biguint_below(q);
            let t = self.rhs(&x);

            let y = t.modpow(&self.sqrt_exp, q);
            if (&y * &y) % q != t {
                continue;
            }

            let y = if rng.gen::<bool>() { neg_mod(&y, q) } else { y };

            return self.g1_mul(&Point::Affine { x, y }, &self.h);
        }
    }

    fn g1_add(&self, a: &Point, b: &Point) -> Point {
        self.add_points(a, b)
    }

    fn g1_neg(&self, a: &Point) -> Point {
        match a {
            Point::Infinity => Point::Infinity,
            Point::Affine { x, y } => Point::Affine {
                x: x.clone(),
                y: neg_mod(y, &self.q),
            },
        }
    }

    fn g1_mul(&self, p: &Point, k: &Scalar) -> Point {
        let mut acc = Point::Infinity;
        if k.is_zero() {
            return acc;
        }

        for bit in bits_msb_first(k) {
            acc = self.double_point(&acc);
            if bit == 1 {
                acc = self.add_points(&acc, p);
            }
        }

        acc
    }

    fn pair(&self, p: &Point, q: &Point) -> Gt {
        match (p, q) {
            (Point::Affine { x: px, y: py }, Point::Affine { x: qx, y: qy }) => {
                let f = self.miller_loop(px, py, qx, qy);
                Gt(self.final_exponentiation(&f))
            }
            _ => Gt(Fq2::one()),
        }
    }

    fn gt_identity(&self) -> Gt {
        Gt(Fq2::one())
    }

    fn gt_mul(&self, a: &Gt, b: &Gt) -> Gt {
        Gt(a.0.mul(&b.0, &self.q))
    }

    fn gt_pow(&self, a: &Gt, k: &Scalar) -> Gt {
        Gt(a.0.pow(k, &self.q))
    }

    fn g1_to_bytes(&self, p: &Point) -> Vec<u8> {
        match p {
            // (0, 0) has order 2, so all zeros never collides with a G1 element
            Point::Infinity => vec![0u8; 2 * self.width],
            Point::Affine { x, y } => {
                let mut buf = to_fixed_be(x, self.width);
                buf.extend_from_slice(&to_fixed_be(y, self.width));
                buf
            }
        }
    }

    fn g1_from_bytes(&self, bytes: &[u8]) -> Option<Point> {
        if bytes.len() != 2 * self.width {
            return None;
        }
        if bytes.iter().all(|b| *b == 0) {
            return Some(Point::Infinity);
        }

        let (xb, yb) = bytes.split_at(self.width);
        let x = BigUint::from_bytes_be(xb);
        let y = BigUint::from_bytes_be(yb);
        if x >= self.q || y >= self.q {
            return None;
        }

        let p = Point::Affine { x, y };
        if !self.is_on_curve(&p) || !self.g1_mul(&p, &self.r).is_infinity() {
            return None;
        }

        Some(p)
    }

    fn gt_to_bytes(&self, a: &Gt) -> Vec<u8> {
        let mut buf = to_fixed_be(&a.0.re, self.width);
        buf.extend_from_slice(&to_fixed_be(&a.0.im, self.width));
        buf
    }
}
