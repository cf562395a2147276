//! Implementations for the VehicleCtrl state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;
use std::convert::Infallible;

// Internal
use super::{Params, VehicleCtrlError, DEFAULT_NAME};
use crate::{
    cmd_map::{ActuatorCmd, ActuatorIf, CmdMapReport, CmdMapper},
    ctrl_law::{ControlOutput, CtrlLawId, CtrlParams},
    kin_state::{Goal, KinState, Pose},
    pose_integrator,
};
use util::{
    archive::{ArchiveError, Archived, Archiver},
    module::State,
    params,
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle control module state
pub struct VehicleCtrl {
    pub(crate) params: Params,

    name: String,

    /// Pose, velocity and goal of the vehicle
    kin: KinState,

    /// Selected law and the gains it runs with
    ctrl_law: CtrlLawId,
    ctrl_params: CtrlParams,

    /// Integral accumulator of the selected law
    error_prev: f64,

    /// Last physical control output
    control: ControlOutput,

    /// Last actuator command
    cmd: ActuatorCmd,

    goal_achieved: bool,

    mapper: CmdMapper,

    report: StatusReport,
    arch_report: Archiver,
}

/// Input data to vehicle control.
///
/// Each field is `None` if there is no new value on this cycle.
#[derive(Debug, Clone, Default)]
pub struct InputData {
    /// Localised pose of the vehicle.
    pub pose: Option<Pose>,

    /// New goal for the selected law.
    pub goal: Option<Goal>,

    /// Name of a control law to switch to.
    pub ctrl_law: Option<String>,
}

/// Output from vehicle control that the actuator interface must execute.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct OutputData {
    pub cmd: ActuatorCmd,
}

/// Status report for vehicle control processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// True if the law reported the goal as achieved this cycle.
    pub goal_achieved: bool,

    /// Physical control output held after this cycle.
    pub v: f64,
    pub gamma: f64,

    /// Flags raised while mapping the command. Only set on cycles where a new
    /// command was mapped.
    pub speed_limited: bool,
    pub steer_angle_limited: bool,
    pub steering_out_of_range: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl VehicleCtrl {
    /// Create a new controller with the vehicle at the origin.
    pub fn new(name: &str, params: Params) -> Self {
        Self::from_kin_state(name, params, KinState::default())
    }

    /// Create a new controller with the vehicle at the given pose.
    pub fn with_pose(name: &str, params: Params, x: f64, y: f64, theta: f64) -> Self {
        Self::from_kin_state(name, params, KinState::at(x, y, theta))
    }

    /// Create a new controller with the vehicle at a random pose inside the
    /// bounding box of `params`.
    ///
    /// The same seed always gives the same pose.
    pub fn with_random_pose(name: &str, params: Params, seed: u64) -> Self {
        let mut ctrl = Self::new(name, params);
        ctrl.jump_to_random(seed);
        ctrl
    }

    fn from_kin_state(name: &str, params: Params, kin: KinState) -> Self {
        let ctrl_law = CtrlLawId::from_name(&params.initial_ctrl_law);

        Self {
            name: name.to_string(),
            kin,
            ctrl_law,
            ctrl_params: params.gains.for_law(ctrl_law),
            error_prev: 0.0,
            control: ControlOutput::default(),
            cmd: ActuatorCmd::default(),
            goal_achieved: false,
            mapper: CmdMapper::new(params.cmd_map),
            report: StatusReport::default(),
            arch_report: Archiver::default(),
            params,
        }
    }

    // ---- ACCESSORS ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn pose(&self) -> &Pose {
        &self.kin.pose
    }

    pub fn goal(&self) -> &Goal {
        &self.kin.goal
    }

    pub fn ctrl_law(&self) -> CtrlLawId {
        self.ctrl_law
    }

    pub fn ctrl_params(&self) -> &CtrlParams {
        &self.ctrl_params
    }

    /// The integral accumulator of the selected law.
    pub fn error_prev(&self) -> f64 {
        self.error_prev
    }

    /// The last physical control output.
    pub fn control(&self) -> ControlOutput {
        self.control
    }

    /// The command currently held for the actuators.
    pub fn actuator_cmd(&self) -> ActuatorCmd {
        self.cmd
    }

    /// True if the last tick found the goal achieved.
    pub fn is_goal_achieved(&self) -> bool {
        self.goal_achieved
    }

    // ---- CONTROL LAW ----

    /// Select a control law by name, using its configured gains.
    ///
    /// Unknown names select `MoveToPoint`. Returns the selected law.
    pub fn set_ctrl_law(&mut self, name: &str) -> CtrlLawId {
        let law = CtrlLawId::from_name(name);
        self.set_ctrl_law_with(law, self.params.gains.for_law(law));
        law
    }

    /// Select a control law with explicit gains.
    pub fn set_ctrl_law_with(&mut self, law: CtrlLawId, params: CtrlParams) {
        info!("{}: control law set to {} with {:?}", self.name, law, params);

        self.ctrl_law = law;
        self.ctrl_params = params;
        self.error_prev = 0.0;
    }

    /// Set the goal of the selected law.
    ///
    /// Clears the achieved flag until the next tick.
    pub fn set_goal(&mut self, goal: Goal) {
        debug!("{}: new goal {:?}", self.name, goal);

        self.kin.set_goal(goal);
        self.goal_achieved = false;
    }

    /// Directly set the physical control output, without mapping a new
    /// actuator command.
    pub fn set_control(&mut self, v: f64, gamma: f64) {
        self.control = ControlOutput { v, gamma };
    }

    // ---- POSE ----

    /// Teleport the vehicle, clearing its velocity.
    pub fn jump_to(&mut self, x: f64, y: f64, theta: f64) {
        info!(
            "{}: jump to ({:.2}, {:.2}, {:.2})",
            self.name, x, y, theta
        );

        self.kin.set_pose(x, y, theta);
    }

    /// Teleport the vehicle to a random pose inside the bounding box,
    /// clearing its velocity.
    ///
    /// The same seed always gives the same pose.
    pub fn jump_to_random(&mut self, seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let pose = KinState::random(&self.params.bbox, &mut rng).pose;

        self.jump_to(pose.x(), pose.y(), pose.theta());
    }

    /// Overwrite the pose with a localised one. The velocity is kept.
    pub fn update_pose_from_loc(&mut self, x: f64, y: f64, theta: f64) {
        self.kin.pose.set(x, y, theta);
    }

    /// Set the world frame velocity used by `update_pose`.
    pub fn update_velocity(&mut self, x_dot: f64, y_dot: f64, theta_dot: f64) {
        self.kin.set_velocity(x_dot, y_dot, theta_dot);
    }

    /// Advance the pose by the current velocity over `dt_s` seconds.
    pub fn update_pose(&mut self, dt_s: f64) {
        self.kin.pose = pose_integrator::integrate(&self.kin.pose, &self.kin.velocity, dt_s);
    }

    // ---- CYCLIC ----

    /// Run one control cycle.
    ///
    /// Evaluates the selected law. If the goal is achieved the integral
    /// accumulator is reset and the previous control output and command stay
    /// in effect. Otherwise the new output is mapped into a new command.
    ///
    /// Returns true if the goal was achieved.
    pub fn tick(&mut self) -> bool {
        self.report = StatusReport::default();

        let output = self.ctrl_law.evaluate(
            &self.kin.pose,
            &self.kin.goal,
            &self.ctrl_params,
            &mut self.error_prev,
        );

        match output {
            None => {
                debug!("{}: {} goal achieved", self.name, self.ctrl_law);

                self.error_prev = 0.0;
                self.goal_achieved = true;
            }
            Some(out) => {
                let (cmd, map_report) = self.mapper.map(out.v, out.gamma);

                trace!(
                    "{}: {} output v = {:.3}, gamma = {:.3} -> {:?}",
                    self.name,
                    self.ctrl_law,
                    out.v,
                    out.gamma,
                    cmd
                );

                self.control = out;
                self.cmd = cmd;
                self.goal_achieved = false;
                self.set_map_flags(&map_report);
            }
        }

        self.report.goal_achieved = self.goal_achieved;
        self.report.v = self.control.v;
        self.report.gamma = self.control.gamma;

        self.goal_achieved
    }

    /// Send the current command to an actuator interface.
    pub fn publish(&self, actuator: &mut dyn ActuatorIf) {
        debug!(
            "{}: publishing speed {}, steering {}",
            self.name, self.cmd.speed, self.cmd.steering
        );

        actuator.send(&self.cmd);
    }

    /// One line description of the vehicle, with numbers to 2 decimals.
    ///
    /// Takes the form `<name>: Pose(x,y,theta) Goal(x,y,theta) Control(v,gamma)`.
    pub fn describe(&self) -> String {
        let (gx, gy, gt) = self.kin.goal.triple();

        format!(
            "{}: Pose({:.2},{:.2},{:.2}) Goal({:.2},{:.2},{:.2}) Control({:.2},{:.2})",
            self.name,
            self.kin.pose.x(),
            self.kin.pose.y(),
            self.kin.pose.theta(),
            gx,
            gy,
            gt,
            self.control.v,
            self.control.gamma
        )
    }

    fn set_map_flags(&mut self, map_report: &CmdMapReport) {
        self.report.speed_limited = map_report.speed_limited;
        self.report.steer_angle_limited = map_report.steer_angle_limited;
        self.report.steering_out_of_range = map_report.steering_out_of_range;
    }
}

impl Default for VehicleCtrl {
    fn default() -> Self {
        Self::new(DEFAULT_NAME, Params::default())
    }
}

impl State for VehicleCtrl {
    type InitData = &'static str;
    type InitError = VehicleCtrlError;

    type InputData = InputData;
    type OutputData = OutputData;
    type StatusReport = StatusReport;
    type ProcError = Infallible;

    /// Initialise the VehicleCtrl module.
    ///
    /// Expected init data is the path to the parameter file. The pose is
    /// kept, everything else is reset from the new parameters.
    fn init(
        &mut self,
        init_data: Self::InitData,
        session: &Session,
    ) -> Result<(), Self::InitError> {
        let params: Params = params::load(init_data)?;
        params.validate()?;

        let name = params.name.clone();
        let kin = self.kin;
        *self = Self::from_kin_state(&name, params, kin);

        // Create the arch folder for vehicle_ctrl
        std::fs::create_dir_all(session.arch_root.join("vehicle_ctrl"))
            .map_err(VehicleCtrlError::CannotCreateArchDir)?;

        self.arch_report = Archiver::from_path(session, "vehicle_ctrl/status_report.csv")?;

        info!(
            "{} initialised with {} control law",
            self.name, self.ctrl_law
        );

        Ok(())
    }

    /// Perform cyclic processing of vehicle control.
    ///
    /// New inputs are applied in order law, goal, pose, then one tick is run.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        if let Some(ref name) = input_data.ctrl_law {
            self.set_ctrl_law(name);
        }

        if let Some(goal) = input_data.goal {
            self.set_goal(goal);
        }

        if let Some(pose) = input_data.pose {
            self.update_pose_from_loc(pose.x(), pose.y(), pose.theta());
        }

        self.tick();

        Ok((OutputData { cmd: self.cmd }, self.report))
    }
}

impl Archived for VehicleCtrl {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cmd_map::LogActuator;

    #[test]
    fn test_new_defaults() {
        let ctrl = VehicleCtrl::new(DEFAULT_NAME, Params::default());

        assert_eq!(*ctrl.pose(), Pose::new(0.0, 0.0, 0.0));
        assert_eq!(ctrl.ctrl_law(), CtrlLawId::MoveToPoint);
        assert_eq!(
            *ctrl.ctrl_params(),
            CtrlParams::defaults_for(CtrlLawId::MoveToPoint)
        );
        assert_eq!(ctrl.actuator_cmd(), ActuatorCmd::default());
        assert!(!ctrl.is_goal_achieved());
    }

    #[test]
    fn test_tick_maps_command() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        ctrl.set_goal(Goal::pose(3.0, 4.0, 0.0));

        assert!(!ctrl.tick());

        // v = 15 saturates the speed, gamma = 0.5 * atan2(4, 3)
        let gamma = 0.5 * 4f64.atan2(3.0);
        assert!((ctrl.control().v - 15.0).abs() < 1e-9);
        assert!((ctrl.control().gamma - gamma).abs() < 1e-9);
        assert_eq!(ctrl.actuator_cmd().speed, -1000);
        assert_eq!(
            ctrl.actuator_cmd().steering,
            (720.0 * gamma / std::f64::consts::PI + 90.0) as i32
        );
        assert!(ctrl.report.speed_limited);
    }

    #[test]
    fn test_achieved_keeps_previous_cmd() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        ctrl.set_goal(Goal::pose(10.0, 0.0, 0.0));
        assert!(!ctrl.tick());

        let cmd = ctrl.actuator_cmd();
        let control = ctrl.control();

        // Move within tolerance of the goal
        ctrl.update_pose_from_loc(9.0, 0.0, 0.0);
        assert!(ctrl.tick());
        assert!(ctrl.is_goal_achieved());
        assert_eq!(ctrl.actuator_cmd(), cmd);
        assert_eq!(ctrl.control(), control);
    }

    #[test]
    fn test_law_change_resets_integral() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        assert_eq!(ctrl.set_ctrl_law("FollowPath"), CtrlLawId::FollowPath);
        ctrl.set_goal(Goal::pose(10.0, 0.0, 0.0));

        ctrl.tick();
        ctrl.tick();
        assert!((ctrl.error_prev() - 16.0).abs() < 1e-9);

        ctrl.set_ctrl_law("FollowPath");
        assert_eq!(ctrl.error_prev(), 0.0);

        ctrl.tick();
        ctrl.set_ctrl_law_with(CtrlLawId::MoveToPose, CtrlParams::default());
        assert_eq!(ctrl.error_prev(), 0.0);
        assert_eq!(*ctrl.ctrl_params(), CtrlParams::default());
    }

    #[test]
    fn test_achieved_resets_integral() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        ctrl.set_ctrl_law("FollowPath");
        ctrl.set_goal(Goal::pose(10.0, 0.0, 0.0));
        ctrl.tick();
        assert!((ctrl.error_prev() - 8.0).abs() < 1e-9);

        // Inside the standoff distance
        ctrl.update_pose_from_loc(9.5, 0.0, 0.0);
        assert!(ctrl.tick());
        assert_eq!(ctrl.error_prev(), 0.0);
    }

    #[test]
    fn test_unknown_law_falls_back() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        ctrl.set_ctrl_law("FollowLine");
        assert_eq!(ctrl.set_ctrl_law("Spiral"), CtrlLawId::MoveToPoint);
        assert_eq!(ctrl.ctrl_law(), CtrlLawId::MoveToPoint);
    }

    #[test]
    fn test_random_pose_reproducible() {
        let a = VehicleCtrl::with_random_pose("a", Params::default(), 1234);
        let b = VehicleCtrl::with_random_pose("b", Params::default(), 1234);
        let c = VehicleCtrl::with_random_pose("c", Params::default(), 4321);

        assert_eq!(a.pose(), b.pose());
        assert_ne!(a.pose(), c.pose());
    }

    #[test]
    fn test_pose_updates() {
        let mut ctrl = VehicleCtrl::with_pose("test", Params::default(), 1.0, 2.0, 0.0);

        ctrl.update_velocity(1.0, -1.0, 0.5);
        ctrl.update_pose(2.0);
        assert_eq!(*ctrl.pose(), Pose::new(3.0, 0.0, 1.0));

        // Localisation keeps the velocity, jumping clears it
        ctrl.update_pose_from_loc(0.0, 0.0, 0.0);
        ctrl.update_pose(1.0);
        assert_eq!(*ctrl.pose(), Pose::new(1.0, -1.0, 0.5));

        ctrl.jump_to(5.0, 5.0, 0.0);
        ctrl.update_pose(1.0);
        assert_eq!(*ctrl.pose(), Pose::new(5.0, 5.0, 0.0));
    }

    #[test]
    fn test_proc() {
        let mut ctrl = VehicleCtrl::default();

        let input = InputData {
            pose: Some(Pose::new(0.0, 0.0, 0.0)),
            goal: Some(Goal::pose(0.0, 10.0, 0.0)),
            ctrl_law: Some("MoveToPose".into()),
        };

        let (out, report) = ctrl.proc(&input).unwrap();
        assert_eq!(ctrl.ctrl_law(), CtrlLawId::MoveToPose);
        assert!(!report.goal_achieved);
        assert_eq!(out.cmd, ctrl.actuator_cmd());
        assert!((report.v - 5.0).abs() < 1e-9);

        let (_, report) = ctrl
            .proc(&InputData {
                pose: Some(Pose::new(0.0, 9.0, 0.0)),
                ..Default::default()
            })
            .unwrap();
        assert!(report.goal_achieved);
    }

    #[test]
    fn test_publish_and_describe() {
        let mut ctrl = VehicleCtrl::with_pose("Car", Params::default(), 1.0, -2.0, 0.5);
        ctrl.set_goal(Goal::pose(2.0, 2.0, 0.52359878));
        ctrl.set_control(0.25, -0.126);

        assert_eq!(
            ctrl.describe(),
            "Car: Pose(1.00,-2.00,0.50) Goal(2.00,2.00,0.52) Control(0.25,-0.13)"
        );

        let mut act = LogActuator::default();
        ctrl.publish(&mut act);
        ctrl.publish(&mut act);
        assert_eq!(act.num_sent, 2);
    }

    #[test]
    fn test_nan_pose_gives_zero_cmd() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        ctrl.set_goal(Goal::pose(3.0, 4.0, 0.0));
        ctrl.update_pose_from_loc(f64::NAN, 0.0, 0.0);

        assert!(!ctrl.tick());
        assert!(ctrl.control().v.is_nan());
        assert!(ctrl.control().gamma.is_nan());
        assert_eq!(ctrl.actuator_cmd(), ActuatorCmd { speed: 0, steering: 0 });
        assert!(!ctrl.report.speed_limited);
        assert!(ctrl.report.steering_out_of_range);
    }

    #[test]
    fn test_degenerate_line() {
        let mut ctrl = VehicleCtrl::new("test", Params::default());
        ctrl.set_ctrl_law("FollowLine");

        // a = b = 0 with c != 0 is infinitely far from the line
        ctrl.set_goal(Goal::line(0.0, 0.0, 1.0));
        assert!(!ctrl.tick());
        assert_eq!(ctrl.control().gamma, f64::NEG_INFINITY);
        assert_eq!(
            ctrl.actuator_cmd(),
            ActuatorCmd {
                speed: -1000,
                steering: i32::MIN
            }
        );
        assert!(ctrl.report.steering_out_of_range);

        // a = b = c = 0 gives a NaN distance
        ctrl.set_goal(Goal::line(0.0, 0.0, 0.0));
        assert!(!ctrl.tick());
        assert!(ctrl.control().gamma.is_nan());
        assert_eq!(ctrl.actuator_cmd().steering, 0);
        assert!(ctrl.report.steering_out_of_range);
    }
}
