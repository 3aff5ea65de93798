//! # Lane Steering Executable
//!
//! Runs the steering estimator over a directory of recorded camera frames.
//!
//! # Architecture
//!
//!  - Initialise the session, logging and parameters
//!  - Initialise the `SteerEst` module
//!  - For every sampled frame:
//!      - Decode the frame
//!      - Estimate the direction vector
//!      - Substitute the previous vector if the frame failed
//!      - Archive a record of the frame
//!  - Save a summary of the run into the session

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::{collections::HashMap, path::PathBuf};

use color_eyre::{eyre::WrapErr, Result};
use log::{info, warn};
use serde::Serialize;
use structopt::StructOpt;

// Internal
use lane_lib::{
    frame_seq::{DxFallback, FrameSampler},
    label::SteerClass,
    steer_est::{InputData, SteerEst},
    traj::TurnDirection,
    SteerErrorKind,
};
use params::LaneExecParams;
use util::{
    archive::{Archived, Archiver},
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "lane_exec", about = "Estimate steering vectors over a sequence of frames")]
struct Opt {
    /// Frame directory, overrides the parameter file
    #[structopt(short, long, parse(from_os_str))]
    frame_dir: Option<PathBuf>,

    /// Sample period in frames, overrides the parameter file
    #[structopt(short = "n", long)]
    sample_period: Option<usize>,

    /// Log trace records from the perception stages
    #[structopt(short, long)]
    verbose: bool,
}

/// One row of the per-frame archive.
#[derive(Debug, Serialize)]
struct FrameRecord {
    frame_index: usize,
    file: String,
    dx: f64,
    dy: f64,
    curvature: Option<f64>,
    direction: Option<TurnDirection>,
    steer_class: SteerClass,
    steer_class_index: u8,
    is_fallback: bool,
}

/// Summary of the run, saved into the session root.
#[derive(Debug, Default, Serialize)]
struct RunSummary {
    num_frames: usize,
    num_sampled: usize,
    num_succeeded: usize,
    failures: HashMap<SteerErrorKind, usize>,
    decode_failures: usize,
    classes: HashMap<SteerClass, usize>,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("lane_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, per_log_level(opt.verbose), &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Lane Steering Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    info!("Initialising...");

    // ---- LOAD PARAMETERS ----

    let mut params: LaneExecParams =
        util::params::load("lane_exec.toml").wrap_err("Could not load lane_exec parameters")?;

    if let Some(dir) = opt.frame_dir {
        params.frame_dir = dir;
    }
    if let Some(n) = opt.sample_period {
        params.sample_period_frames = n;
    }

    info!("Parameters loaded");

    // ---- INIT MODULES ----

    let mut steer_est = SteerEst::default();
    steer_est
        .init("steer_est.toml", &session)
        .wrap_err("Failed to initialise SteerEst")?;
    let threshold = steer_est.params().straight_threshold_px;

    info!("SteerEst initialised");

    let mut arch_frames = if params.archive_records {
        Archiver::from_path(&session, "lane_exec/frames.csv")
            .wrap_err("Could not create the frame archive")?
    } else {
        Archiver::default()
    };

    if arch_frames.is_active() {
        info!("Archiving frame records");
    }

    let sampler = FrameSampler::from_dir(
        &params.frame_dir,
        &params.frame_extensions,
        params.sample_period_frames,
    )
    .wrap_err_with(|| format!("Could not list frames in {:?}", params.frame_dir))?;

    info!(
        "Processing {} frames from {:?}, every {} frame(s)\n",
        sampler.num_frames(),
        params.frame_dir,
        params.sample_period_frames
    );

    // ---- MAIN LOOP ----

    let mut fallback = DxFallback::default();
    let mut summary = RunSummary {
        num_frames: sampler.num_frames(),
        ..Default::default()
    };

    for (frame_index, path) in sampler.iter() {
        summary.num_sampled += 1;

        // A frame which can't be decoded is skipped entirely rather than
        // counted as a pipeline failure
        let image = match image::open(path) {
            Ok(i) => i.to_rgb8(),
            Err(e) => {
                warn!("Could not decode frame {:?}: {}", path, e);
                summary.decode_failures += 1;
                continue;
            }
        };

        let outcome = steer_est.proc(&InputData { frame_index, image });

        let (curvature, direction) = match &outcome {
            Ok((_, report)) => {
                summary.num_succeeded += 1;
                (Some(report.curvature), report.direction)
            }
            Err(e) => {
                warn!("Frame {} ({:?}) failed: {}", frame_index, path, e);
                *summary.failures.entry(e.kind()).or_insert(0) += 1;
                (None, None)
            }
        };

        let resolved = fallback.resolve(&outcome.map(|(v, _)| v));
        let steer_class = SteerClass::from_dx(resolved.vector.dx, threshold);
        *summary.classes.entry(steer_class).or_insert(0) += 1;

        info!(
            "Frame {:>6}: dx = {:>9.3}, dy = {:>9.3}, {:?}{}",
            frame_index,
            resolved.vector.dx,
            resolved.vector.dy,
            steer_class,
            if resolved.is_fallback { " (fallback)" } else { "" }
        );

        arch_frames
            .serialise(FrameRecord {
                frame_index,
                file: path.to_string_lossy().into_owned(),
                dx: resolved.vector.dx,
                dy: resolved.vector.dy,
                curvature,
                direction,
                steer_class,
                steer_class_index: steer_class.index(),
                is_fallback: resolved.is_fallback,
            })
            .wrap_err("Could not archive the frame record")?;

        steer_est
            .write()
            .wrap_err("Could not archive SteerEst data")?;
    }

    // ---- SHUTDOWN ----

    info!(
        "Processed {} of {} sampled frames successfully",
        summary.num_succeeded, summary.num_sampled
    );

    session.save("lane_exec/summary.json", summary);
    session.exit();

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Level cap for the perception stages, which only log at trace.
fn per_log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use log::Level;

    #[test]
    fn test_verbose_enables_per_trace() {
        assert!(Level::Trace <= per_log_level(true));
        assert!(Level::Trace > per_log_level(false));
        assert!(Level::Info <= per_log_level(false));
    }
}
