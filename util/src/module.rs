//! Processing module interface
//!
//! A module is set up once from a parameter file, then fed one input at a time.
//! Every call to `proc` yields both the module's output and a status report
//! describing how that output was reached, so the caller can archive reports
//! for failed inputs as well as successful ones.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use crate::session::Session;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Lifecycle of a processing module.
pub trait State {
    /// Passed to `init`, usually the parameter file name.
    type InitData;
    type InitError;

    /// One unit of work, for example a single frame.
    type InputData;
    type OutputData;
    type StatusReport;
    type ProcError;

    /// Load parameters and open any archives inside `session`.
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>;

    /// Process a single input.
    ///
    /// A failed input must leave the module usable for the next one.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
