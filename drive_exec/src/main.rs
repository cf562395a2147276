//! # Drive Executable
//!
//! Runs the vehicle controller in closed loop against the simulated plant.
//! Goals and control law changes come from a drive script, which can be
//! given as the only argument or set in `drive_exec.toml`.
//!
//! Time in the script is simulated time, so runs are reproducible and can be
//! executed faster than real time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{
    env, thread,
    time::{Duration, Instant},
};

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{debug, info, warn};
use serde::Serialize;

use drive_lib::{
    cmd_map::LogActuator,
    drive_cmd::{DriveCmd, GoalQueue},
    kin_state::Pose,
    params::DriveExecParams,
    sim_plant::SimPlant,
    vehicle_ctrl::{InputData, VehicleCtrl},
};
use util::{
    archive::{Archived, Archiver},
    host,
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Archived record of a single cycle.
#[derive(Serialize)]
struct CycleRecord {
    time_s: f64,
    x_m: f64,
    y_m: f64,
    theta_rad: f64,
    goal_0: f64,
    goal_1: f64,
    goal_2: f64,
    ctrl_law: &'static str,
    v: f64,
    gamma: f64,
    speed: i32,
    steering: i32,
    error_prev: f64,
    goal_achieved: bool,
}

/// Summary saved into the session at the end of the run.
#[derive(Serialize)]
struct RunSummary {
    num_cycles: u64,
    sim_time_s: f64,
    goals_achieved: u64,
    goals_remaining: usize,
    hit_cycle_limit: bool,
    final_pose: Pose,
    description: String,
}

// ---------------------------------------------------------------------------
// MAIN
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session =
        Session::new("drive_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Drive Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let exec_params: DriveExecParams = util::params::load("drive_exec.toml")
        .wrap_err("Could not load drive_exec params")?;

    if exec_params.cycle_period_s <= 0.0 {
        return Err(eyre!(
            "The cycle period must be positive, found {} s",
            exec_params.cycle_period_s
        ));
    }

    // ---- INITIALISE DRIVE SCRIPT ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    // A single argument is the script path, otherwise use the one from the
    // parameters
    let script_path = match args.len() {
        1 => host::get_auto_driver_root()
            .wrap_err("The AUTO_DRIVER_ROOT environment variable is not set")?
            .join(&exec_params.script_path),
        2 => args[1].clone().into(),
        _ => return Err(eyre!("Expected the path to a drive script as the only argument")),
    };

    info!("Loading script from {:?}", script_path);

    let mut script_interpreter: ScriptInterpreter<DriveCmd> =
        ScriptInterpreter::new(&script_path).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} commands\n",
        script_interpreter.get_duration(),
        script_interpreter.get_num_cmds()
    );

    // ---- MODULE INIT ----

    let mut vehicle_ctrl = VehicleCtrl::default();
    vehicle_ctrl
        .init("vehicle_ctrl.toml", &session)
        .wrap_err("Failed to initialise VehicleCtrl")?;

    if let Some(seed) = exec_params.seed {
        info!("Using random start pose with seed {}", seed);
        vehicle_ctrl.jump_to_random(seed);
    }

    info!("VehicleCtrl init complete: {}", vehicle_ctrl.describe());
    info!(
        "Initial control law {} with {:?}",
        vehicle_ctrl.ctrl_law(),
        vehicle_ctrl.ctrl_params()
    );

    let plant = SimPlant::new(vehicle_ctrl.params().body_length_m);
    let mut actuator = LogActuator::default();
    let mut goal_queue = GoalQueue::default();

    let mut arch_cycle = Archiver::from_path(&session, "cycles.csv")
        .wrap_err("Failed to create the cycle archive")?;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    let mut end_of_script = false;
    let mut hit_cycle_limit = false;
    let mut num_cycles: u64 = 0;
    let mut goals_achieved: u64 = 0;
    let mut sim_time_s = 0.0;

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // ---- DRIVE SCRIPT PROCESSING ----

        if !end_of_script {
            match script_interpreter.get_pending_cmds(sim_time_s) {
                PendingCmds::None => (),
                PendingCmds::Some(cmds) => {
                    for cmd in cmds {
                        goal_queue.exec(cmd, &mut vehicle_ctrl);
                    }
                }
                PendingCmds::EndOfScript => {
                    info!("End of drive script reached, finishing the remaining goals");
                    end_of_script = true;
                }
            }
        }

        goal_queue.activate_next(&mut vehicle_ctrl);

        // Exit once the script is finished and there's nothing left to do
        if end_of_script && goal_queue.is_empty() {
            info!("End of script and no goals remaining, exiting");
            break;
        }

        if num_cycles >= exec_params.max_num_cycles {
            warn!(
                "Cycle limit of {} reached with {} goals remaining, exiting",
                exec_params.max_num_cycles,
                goal_queue.len()
            );
            hit_cycle_limit = true;
            break;
        }

        // ---- CONTROL PROCESSING ----

        // With no goal the vehicle holds its last command
        let mut goal_achieved = false;

        if goal_queue.active().is_some() {
            let (_, report) = vehicle_ctrl
                .proc(&InputData::default())
                .wrap_err("Error processing VehicleCtrl")?;
            goal_achieved = report.goal_achieved;

            vehicle_ctrl
                .write()
                .wrap_err("Failed to archive VehicleCtrl")?;
        }

        vehicle_ctrl.publish(&mut actuator);

        // ---- SIMULATION PROCESSING ----

        if goal_achieved {
            if let Some(goal) = goal_queue.complete_active() {
                info!(
                    "Goal {:?} achieved at {:.2} s: {}",
                    goal,
                    sim_time_s,
                    vehicle_ctrl.describe()
                );
                goals_achieved += 1;
            }
        } else if goal_queue.active().is_some() {
            let vel = plant.velocity(vehicle_ctrl.pose(), &vehicle_ctrl.control());
            vehicle_ctrl.update_velocity(vel.x_dot, vel.y_dot, vel.theta_dot);
            vehicle_ctrl.update_pose(exec_params.cycle_period_s);
        }

        // ---- ARCHIVING ----

        let pose = vehicle_ctrl.pose();
        let (goal_0, goal_1, goal_2) = vehicle_ctrl.goal().triple();
        let control = vehicle_ctrl.control();
        let cmd = vehicle_ctrl.actuator_cmd();

        arch_cycle
            .serialise(CycleRecord {
                time_s: sim_time_s,
                x_m: pose.x(),
                y_m: pose.y(),
                theta_rad: pose.theta(),
                goal_0,
                goal_1,
                goal_2,
                ctrl_law: vehicle_ctrl.ctrl_law().name(),
                v: control.v,
                gamma: control.gamma,
                speed: cmd.speed,
                steering: cmd.steering,
                error_prev: vehicle_ctrl.error_prev(),
                goal_achieved,
            })
            .wrap_err("Failed to archive the cycle")?;

        // ---- CYCLE MANAGEMENT ----

        if exec_params.realtime {
            let cycle_dur = Instant::now() - cycle_start_instant;

            // Get sleep duration
            match Duration::from_secs_f64(exec_params.cycle_period_s).checked_sub(cycle_dur) {
                Some(d) => thread::sleep(d),
                None => warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - exec_params.cycle_period_s
                ),
            }
        }

        // Increment cycle counter
        num_cycles += 1;
        sim_time_s = num_cycles as f64 * exec_params.cycle_period_s;
    }

    // ---- SHUTDOWN ----

    info!("Final state: {}", vehicle_ctrl.describe());

    session
        .save(
            "summary.json",
            &RunSummary {
                num_cycles,
                sim_time_s,
                goals_achieved,
                goals_remaining: goal_queue.len(),
                hit_cycle_limit,
                final_pose: *vehicle_ctrl.pose(),
                description: vehicle_ctrl.describe(),
            },
        )
        .wrap_err("Failed to save the run summary")?;

    info!(
        "{} run complete: {} goals achieved in {} cycles ({:.2} s simulated)",
        vehicle_ctrl.name(),
        goals_achieved,
        num_cycles,
        sim_time_s
    );

    Ok(())
}
