//! # Lane Executable Parameters
//!
//! This module provides parameters for the lane steering executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneExecParams {
    /// Directory holding the frames to process
    pub frame_dir: PathBuf,

    /// Process every Nth frame of the sequence
    pub sample_period_frames: usize,

    /// File extensions treated as frames
    pub frame_extensions: Vec<String>,

    /// Write a CSV record for every processed frame into the session archive
    pub archive_records: bool,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
