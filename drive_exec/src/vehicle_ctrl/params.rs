//! Parameters structure for VehicleCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use super::{VehicleCtrlError, DEFAULT_NAME};
use crate::{
    cmd_map::CmdMapParams,
    ctrl_law::{CtrlLawGains, CtrlLawId},
    kin_state::BoundingBox,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for vehicle control.
///
/// Every field is optional in the parameter file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Name of the vehicle, used in logs and descriptions.
    pub name: String,

    /// Name of the control law selected at start up.
    pub initial_ctrl_law: String,

    // ---- GEOMETRY ----

    /// Region of the world a random initial pose is drawn from.
    ///
    /// Units: meters
    pub bbox: BoundingBox,

    /// Distance between the front and rear axles.
    ///
    /// Units: meters
    pub body_length_m: f64,

    // ---- CONTROL ----

    /// Per-law gain overrides.
    pub gains: CtrlLawGains,

    /// Physical to actuator command transform.
    pub cmd_map: CmdMapParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for Params {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.into(),
            initial_ctrl_law: CtrlLawId::FALLBACK.name().into(),
            bbox: BoundingBox::default(),
            body_length_m: 0.15,
            gains: CtrlLawGains::default(),
            cmd_map: CmdMapParams::default(),
        }
    }
}

impl Params {
    /// Check the parameters describe a physically meaningful vehicle.
    pub fn validate(&self) -> Result<(), VehicleCtrlError> {
        if self.body_length_m.is_nan() || self.body_length_m <= 0.0 {
            return Err(VehicleCtrlError::InvalidParams(format!(
                "body_length_m must be positive, got {}",
                self.body_length_m
            )));
        }

        if self.bbox.x_min >= self.bbox.x_max || self.bbox.y_min >= self.bbox.y_max {
            return Err(VehicleCtrlError::InvalidParams(format!(
                "bounding box is empty: {:?}",
                self.bbox
            )));
        }

        let cmd_map = &self.cmd_map;

        if cmd_map.speed_min.is_nan()
            || cmd_map.speed_max.is_nan()
            || cmd_map.speed_min > cmd_map.speed_max
        {
            return Err(VehicleCtrlError::InvalidParams(format!(
                "cmd_map speed range is empty: [{}, {}]",
                cmd_map.speed_min, cmd_map.speed_max
            )));
        }

        if cmd_map.steer_angle_limit_rad.is_nan() || cmd_map.steer_angle_limit_rad < 0.0 {
            return Err(VehicleCtrlError::InvalidParams(format!(
                "cmd_map steer_angle_limit_rad must not be negative, got {}",
                cmd_map.steer_angle_limit_rad
            )));
        }

        if cmd_map.steering_min > cmd_map.steering_max {
            return Err(VehicleCtrlError::InvalidParams(format!(
                "cmd_map steering range is empty: [{}, {}]",
                cmd_map.steering_min, cmd_map.steering_max
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ctrl_law::CtrlParams;

    #[test]
    fn test_parse_partial() {
        let params: Params = util::params::parse(
            r#"
            name = "Test Car"
            initial_ctrl_law = "FollowPath"
            body_length_m = 0.3

            [bbox]
            x_min = -5.0
            x_max = 5.0
            y_min = 0.0
            y_max = 2.0

            [gains.MoveToPose]
            k_1 = 1.0
            k_2 = 0.2
            k_3 = 0.3
            epsilon = 0.1

            [cmd_map]
            speed_gain = -500.0
            "#,
        )
        .unwrap();

        assert_eq!(params.name, "Test Car");
        assert_eq!(params.initial_ctrl_law, "FollowPath");
        assert_eq!(params.bbox.y_max, 2.0);
        assert_eq!(
            params.gains.for_law(CtrlLawId::MoveToPose),
            CtrlParams::new(1.0, 0.2, 0.3, 0.1)
        );
        assert_eq!(params.cmd_map.speed_gain, -500.0);
        assert_eq!(params.cmd_map.steer_offset, 90.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_empty_is_default() {
        let params: Params = util::params::parse("").unwrap();
        assert_eq!(params, Params::default());
        assert_eq!(params.name, DEFAULT_NAME);
    }

    #[test]
    fn test_validate() {
        let mut params = Params::default();
        params.body_length_m = 0.0;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.bbox.x_max = params.bbox.x_min;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_cmd_map() {
        let mut params = Params::default();
        params.cmd_map.speed_min = 500.0;
        params.cmd_map.speed_max = -500.0;
        assert!(matches!(
            params.validate(),
            Err(VehicleCtrlError::InvalidParams(_))
        ));

        let mut params = Params::default();
        params.cmd_map.steer_angle_limit_rad = -0.1;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.cmd_map.steer_angle_limit_rad = f64::NAN;
        assert!(params.validate().is_err());

        let mut params = Params::default();
        params.cmd_map.steering_min = 180;
        params.cmd_map.steering_max = 0;
        assert!(params.validate().is_err());

        // A zero angle limit and a single point speed range are allowed
        let mut params = Params::default();
        params.cmd_map.steer_angle_limit_rad = 0.0;
        params.cmd_map.speed_min = 0.0;
        params.cmd_map.speed_max = 0.0;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_shipped_params() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../params/vehicle_ctrl.toml");
        let params: Params = util::params::load_file(path).unwrap();

        for law in CtrlLawId::ALL.iter() {
            assert_eq!(params.gains.for_law(*law), CtrlParams::defaults_for(*law));
        }
        assert_eq!(params.cmd_map, crate::cmd_map::CmdMapParams::default());
        assert!(params.validate().is_ok());
    }
}
