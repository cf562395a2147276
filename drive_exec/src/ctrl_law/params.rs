//! Control law parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// Internal
use super::CtrlLawId;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Gains and tolerance for a control law.
///
/// The meaning of each gain depends on the law:
///
/// | law         | `k_1`        | `k_2`         | `k_3`         | `epsilon`         |
/// |-------------|--------------|---------------|---------------|-------------------|
/// | MoveToPoint | speed        | unused        | heading       | goal tolerance    |
/// | FollowPath  | speed        | integral      | heading       | standoff distance |
/// | MoveToPose  | speed (rho)  | alpha         | beta          | goal tolerance    |
/// | FollowLine  | distance     | cruise speed  | heading       | line tolerance    |
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtrlParams {
    pub k_1: f64,
    pub k_2: f64,
    pub k_3: f64,
    pub epsilon: f64,
}

/// Optional per-law gain overrides, as found in the parameter file.
///
/// Any law without an entry uses [`CtrlParams::defaults_for`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CtrlLawGains {
    #[serde(rename = "MoveToPoint")]
    pub move_to_point: Option<CtrlParams>,

    #[serde(rename = "FollowPath")]
    pub follow_path: Option<CtrlParams>,

    #[serde(rename = "MoveToPose")]
    pub move_to_pose: Option<CtrlParams>,

    #[serde(rename = "FollowLine")]
    pub follow_line: Option<CtrlParams>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CtrlParams {
    pub fn new(k_1: f64, k_2: f64, k_3: f64, epsilon: f64) -> Self {
        Self { k_1, k_2, k_3, epsilon }
    }

    /// The documented default gains of each law.
    pub fn defaults_for(law: CtrlLawId) -> Self {
        match law {
            CtrlLawId::MoveToPoint => Self::new(3.0, 0.1, 0.5, 3.0),
            CtrlLawId::FollowPath => Self::new(0.5, 0.05, 0.3, 2.0),
            CtrlLawId::MoveToPose => Self::new(0.5, 0.1, 0.2, 3.0),
            CtrlLawId::FollowLine => Self::new(0.5, 0.1, 0.2, 3.0),
        }
    }
}

impl Default for CtrlParams {
    /// Generic gains, not tuned for any particular law.
    fn default() -> Self {
        Self::new(0.5, 0.1, 0.2, 0.2)
    }
}

impl CtrlLawGains {
    /// Get the gains for the given law, falling back on its defaults.
    pub fn for_law(&self, law: CtrlLawId) -> CtrlParams {
        let over = match law {
            CtrlLawId::MoveToPoint => self.move_to_point,
            CtrlLawId::FollowPath => self.follow_path,
            CtrlLawId::MoveToPose => self.move_to_pose,
            CtrlLawId::FollowLine => self.follow_line,
        };

        over.unwrap_or_else(|| CtrlParams::defaults_for(law))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_gains_fallback() {
        let gains: CtrlLawGains = util::params::parse(
            "[FollowLine]\nk_1 = 1.0\nk_2 = 0.2\nk_3 = 0.4\nepsilon = 0.5\n",
        )
        .unwrap();

        assert_eq!(
            gains.for_law(CtrlLawId::FollowLine),
            CtrlParams::new(1.0, 0.2, 0.4, 0.5)
        );
        assert_eq!(
            gains.for_law(CtrlLawId::MoveToPoint),
            CtrlParams::defaults_for(CtrlLawId::MoveToPoint)
        );
    }
}
