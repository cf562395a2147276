//! Cyclic module interface
//!
//! A cyclic module is initialised once from a parameter file and then
//! processed once per cycle by the executable's main loop. The executable
//! owns the module and is the only caller of `proc`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// MODULE STATE
// ---------------------------------------------------------------------------

/// Internal state of a cyclic module.
pub trait State {
    /// Data needed by `init`, usually the path to the parameter file
    /// relative to the params directory.
    type InitData;
    type InitError;

    /// New inputs for one cycle.
    type InputData;
    /// Demands produced by one cycle.
    type OutputData;
    /// Monitoring flags and quantities produced by one cycle.
    type StatusReport;
    type ProcError;

    /// Load parameters and reset the module.
    ///
    /// `session` gives the archive root for any module that archives data.
    fn init(
        &mut self,
        init_data: Self::InitData,
        session: &Session,
    ) -> Result<(), Self::InitError>;

    /// Run one cycle, returning the output data and status report.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
