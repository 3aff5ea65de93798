//! Parameters structure for SteerEst

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use crate::{label::DEFAULT_STRAIGHT_THRESHOLD_PX, traj::UnifyDomain};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the steering estimator.
///
/// The pipeline's thresholds and window sizes are fixed constants of their
/// stages, only choices which legitimately vary between deployments live here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Domain the two lane curves are brought onto before being averaged.
    pub unify_domain: UnifyDomain,

    /// Largest `|dx|` still labelled as straight ahead.
    ///
    /// Units: pixels
    pub straight_threshold_px: f64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            unify_domain: UnifyDomain::default(),
            straight_threshold_px: DEFAULT_STRAIGHT_THRESHOLD_PX,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use util::params::from_toml_str;

    #[test]
    fn test_params_from_toml() {
        let p: Params = from_toml_str(
            r#"
            straight_threshold_px = 12.5

            [unify_domain]
            type = "Fixed"
            max_row = 1439.0
            "#,
        )
        .unwrap();

        assert_eq!(p.unify_domain, UnifyDomain::reference());
        assert_eq!(p.straight_threshold_px, 12.5);

        let p: Params = from_toml_str("").unwrap();
        assert_eq!(p, Params::default());
    }
}
