//! Quadratic curves with an explicit domain
//!
//! A [`QuadraticCurve`] stores its coefficients against a scaled variable `t`
//! which maps the curve's domain `[lo, hi]` onto `[-1, 1]`. Fitting in `t`
//! rather than in raw row coordinates keeps the least squares system well
//! conditioned when rows run into the thousands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Matrix3, Vector3};
use serde::Serialize;
use util::maths::lin_map;

use super::TrajError;
use crate::per::BinaryMask;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Degree of the fitted polynomials.
pub const FIT_DEGREE: usize = 2;

/// Scaled variable range the domain is mapped onto.
const WINDOW: (f64, f64) = (-1.0, 1.0);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A degree 2 polynomial from row to column, valid over `domain`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuadraticCurve {
    /// Coefficients `[c0, c1, c2]` of `c0 + c1 t + c2 t^2`, with `t` the
    /// domain-scaled row.
    coeffs: [f64; 3],

    /// Row interval `(lo, hi)` the curve was fitted over.
    domain: (f64, f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl QuadraticCurve {
    /// Build a curve from scaled-variable coefficients.
    pub fn from_scaled(coeffs: [f64; 3], domain: (f64, f64)) -> Self {
        Self { coeffs, domain }
    }

    /// Build a curve from ordinary coefficients `a0 + a1 x + a2 x^2`.
    pub fn from_power(power: [f64; 3], domain: (f64, f64)) -> Self {
        // x = (t - o) / s
        let (s, o) = scale_offset(domain);
        let (p, q) = (1.0 / s, -o / s);

        Self {
            coeffs: substitute(power, p, q),
            domain,
        }
    }

    /// Least squares fit through `(row, col)` points.
    ///
    /// The domain is the range of rows present. At least 3 distinct rows are
    /// needed for the fit to be determined.
    pub fn fit(points: &[(f64, f64)]) -> Result<Self, TrajError> {
        let distinct_rows = count_distinct_rows(points);
        if distinct_rows <= FIT_DEGREE {
            return Err(TrajError::InsufficientPoints { distinct_rows });
        }

        let lo = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let hi = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let domain = (lo, hi);

        // Normal equations in the scaled variable
        let mut ata = Matrix3::<f64>::zeros();
        let mut atb = Vector3::<f64>::zeros();
        for &(row, col) in points {
            let t = lin_map(domain, WINDOW, row);
            let basis = Vector3::new(1.0, t, t * t);
            ata += basis * basis.transpose();
            atb += basis * col;
        }

        let coeffs = ata
            .cholesky()
            .map(|c| c.solve(&atb))
            .ok_or(TrajError::SingularFit)?;

        Ok(Self {
            coeffs: [coeffs[0], coeffs[1], coeffs[2]],
            domain,
        })
    }

    /// Fit through the set pixels of an edge mask.
    pub fn fit_mask(mask: &BinaryMask) -> Result<Self, TrajError> {
        let points: Vec<(f64, f64)> = mask
            .indexed_iter()
            .filter(|&(_, &b)| b)
            .map(|((r, c), _)| (r as f64, c as f64))
            .collect();

        Self::fit(&points)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Row in the middle of the domain.
    pub fn domain_mid(&self) -> f64 {
        0.5 * (self.domain.0 + self.domain.1)
    }

    pub fn scaled_coeffs(&self) -> [f64; 3] {
        self.coeffs
    }

    /// Ordinary coefficients `[a0, a1, a2]` of `a0 + a1 x + a2 x^2`.
    pub fn power_coeffs(&self) -> [f64; 3] {
        let (s, o) = scale_offset(self.domain);
        substitute(self.coeffs, s, o)
    }

    /// Column at the given row.
    pub fn eval(&self, row: f64) -> f64 {
        let t = self.scaled(row);
        let [c0, c1, c2] = self.coeffs;
        c0 + t * (c1 + t * c2)
    }

    /// First derivative with respect to row.
    pub fn deriv(&self, row: f64) -> f64 {
        let (s, _) = scale_offset(self.domain);
        let [_, c1, c2] = self.coeffs;
        (c1 + 2.0 * c2 * self.scaled(row)) * s
    }

    /// Second derivative with respect to row, constant for a quadratic.
    pub fn second_deriv(&self) -> f64 {
        let (s, _) = scale_offset(self.domain);
        2.0 * self.coeffs[2] * s * s
    }

    /// The same curve re-expressed over a different domain.
    pub fn with_domain(&self, domain: (f64, f64)) -> Self {
        // t_old = p * t_new + q
        let (s_old, o_old) = scale_offset(self.domain);
        let (s_new, o_new) = scale_offset(domain);
        let p = s_old / s_new;
        let q = o_old - s_old * o_new / s_new;

        Self {
            coeffs: substitute(self.coeffs, p, q),
            domain,
        }
    }

    fn scaled(&self, row: f64) -> f64 {
        lin_map(self.domain, WINDOW, row)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Scale and offset `(s, o)` with `t = s x + o` mapping `domain` onto the window.
fn scale_offset(domain: (f64, f64)) -> (f64, f64) {
    let s = (WINDOW.1 - WINDOW.0) / (domain.1 - domain.0);
    let o = WINDOW.0 - s * domain.0;
    (s, o)
}

/// Coefficients of `c(p u + q)` in terms of `u`.
fn substitute(c: [f64; 3], p: f64, q: f64) -> [f64; 3] {
    [
        c[0] + c[1] * q + c[2] * q * q,
        c[1] * p + 2.0 * c[2] * p * q,
        c[2] * p * p,
    ]
}

fn count_distinct_rows(points: &[(f64, f64)]) -> usize {
    let mut rows: Vec<f64> = points.iter().map(|p| p.0).collect();
    rows.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    rows.dedup();
    rows.len()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
