//! Centreline derivation
//!
//! The left and right fits generally cover different row ranges. Both are put
//! onto a common domain, averaged coefficient by coefficient, and the result
//! is re-expressed over the union of the two original domains.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::trace;
use serde::{Deserialize, Serialize};

use super::QuadraticCurve;
use crate::per::LanePair;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Last row of the fixed unification domain, the row extent of a 1440 row frame.
pub const REFERENCE_UNIFY_MAX_ROW: f64 = 1439.0;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The common domain both lane curves are expressed on before averaging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UnifyDomain {
    /// `[0, height - 1]` of the frame being processed
    ImageHeight,

    /// `[0, max_row]` regardless of the frame size
    Fixed { max_row: f64 },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for UnifyDomain {
    fn default() -> Self {
        UnifyDomain::ImageHeight
    }
}

impl UnifyDomain {
    /// Reproduces the fixed 1440 row domain.
    pub fn reference() -> Self {
        UnifyDomain::Fixed {
            max_row: REFERENCE_UNIFY_MAX_ROW,
        }
    }

    /// Resolve to a concrete row interval for a frame with `num_rows` rows.
    pub fn resolve(&self, num_rows: usize) -> (f64, f64) {
        match *self {
            // A single row frame would give a zero width domain
            UnifyDomain::ImageHeight => (0.0, (num_rows.max(2) - 1) as f64),
            UnifyDomain::Fixed { max_row } => (0.0, max_row),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Average the two lane curves into a centreline.
pub fn centreline(curves: &LanePair<QuadraticCurve>, unify: (f64, f64)) -> QuadraticCurve {
    let left = curves.left.with_domain(unify).scaled_coeffs();
    let right = curves.right.with_domain(unify).scaled_coeffs();

    let mut avg = [0f64; 3];
    for (a, (l, r)) in avg.iter_mut().zip(left.iter().zip(right.iter())) {
        *a = 0.5 * (l + r);
    }

    let (l_dom, r_dom) = (curves.left.domain(), curves.right.domain());
    let union = (l_dom.0.min(r_dom.0), l_dom.1.max(r_dom.1));

    trace!(
        "Centreline: left domain {:?}, right domain {:?}, union {:?}",
        l_dom,
        r_dom,
        union
    );

    QuadraticCurve::from_scaled(avg, unify).with_domain(union)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_centreline_is_pointwise_mean() {
        let left = QuadraticCurve::from_power([100.0, 0.1, 1e-4], (200.0, 719.0));
        let right = QuadraticCurve::from_power([500.0, -0.3, 3e-4], (50.0, 600.0));
        let curves = LanePair::new(left, right);

        let centre = centreline(&curves, UnifyDomain::reference().resolve(720));

        assert_eq!(centre.domain(), (50.0, 719.0));
        for &row in &[50.0, 300.0, 719.0] {
            let expected = 0.5 * (left.eval(row) + right.eval(row));
            assert!((centre.eval(row) - expected).abs() < 1e-6);
        }
        assert!((centre.second_deriv() - 4e-4).abs() < 1e-12);
    }

    #[test]
    fn test_unify_domain_choice_does_not_change_result() {
        let left = QuadraticCurve::from_power([80.0, 0.5, -2e-4], (100.0, 400.0));
        let right = QuadraticCurve::from_power([300.0, 0.2, 1e-4], (150.0, 479.0));
        let curves = LanePair::new(left, right);

        let a = centreline(&curves, UnifyDomain::ImageHeight.resolve(480));
        let b = centreline(&curves, UnifyDomain::reference().resolve(480));

        assert_eq!(a.domain(), b.domain());
        for (x, y) in a.power_coeffs().iter().zip(b.power_coeffs().iter()) {
            assert!((x - y).abs() < 1e-8 * x.abs().max(1.0));
        }
    }

    #[test]
    fn test_resolve() {
        assert_eq!(UnifyDomain::ImageHeight.resolve(720), (0.0, 719.0));
        assert_eq!(UnifyDomain::reference().resolve(720), (0.0, 1439.0));
        assert_eq!(UnifyDomain::ImageHeight.resolve(1), (0.0, 1.0));
    }
}
