//! Frame sequence handling
//!
//! The pipeline itself only ever sees one frame. This module provides what a
//! caller working through a sequence of frames needs: picking every Nth frame
//! out of a directory, and deciding what vector to use when a frame fails.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use log::debug;

use crate::traj::DirectionVector;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Image files from a directory, sampled every `period` frames.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    frames: Vec<PathBuf>,
    period: usize,
}

/// Substitutes a value for frames where the pipeline failed.
///
/// The substitute is the most recent successful vector, or zero before any
/// frame has succeeded.
#[derive(Debug, Default, Clone, Copy)]
pub struct DxFallback {
    last_good: Option<DirectionVector>,
}

/// A vector to use for a frame, and whether it was substituted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVector {
    pub vector: DirectionVector,
    pub is_fallback: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FrameSampler {
    /// List all files in `dir` with one of the given extensions (compared
    /// case-insensitively), sorted by file name.
    pub fn from_dir<P: AsRef<Path>>(
        dir: P,
        extensions: &[String],
        period: usize,
    ) -> io::Result<Self> {
        let mut frames = Vec::new();

        for entry in fs::read_dir(dir.as_ref())? {
            let path = entry?.path();

            if !path.is_file() {
                continue;
            }

            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
                .unwrap_or(false);

            if matches {
                frames.push(path);
            }
        }

        frames.sort();

        debug!(
            "Found {} frames in {:?}, sampling every {}",
            frames.len(),
            dir.as_ref(),
            period
        );

        Ok(Self::from_frames(frames, period))
    }

    /// Sample an existing list of frames. A period of zero is treated as one.
    pub fn from_frames(frames: Vec<PathBuf>, period: usize) -> Self {
        Self {
            frames,
            period: period.max(1),
        }
    }

    /// Total number of frames, sampled or not.
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Sampled frames with their index in the full sequence.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Path)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .step_by(self.period)
            .map(|(i, p)| (i, p.as_path()))
    }
}

impl DxFallback {
    /// Resolve the outcome of a frame into the vector to use.
    pub fn resolve<E>(&mut self, outcome: &Result<DirectionVector, E>) -> ResolvedVector {
        match outcome {
            Ok(v) => {
                self.last_good = Some(*v);
                ResolvedVector {
                    vector: *v,
                    is_fallback: false,
                }
            }
            Err(_) => ResolvedVector {
                vector: self.last_good.unwrap_or_default(),
                is_fallback: true,
            },
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
