//! Implementations for the SteerEst state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use image::RgbImage;
use log::trace;
use serde::Serialize;

// Internal
use super::{estimate, Params, SteerError, SteerEstimate};
use crate::{
    label::SteerClass,
    traj::{DirectionVector, TurnDirection},
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

/// Steering estimator module state
#[derive(Default)]
pub struct SteerEst {
    pub(crate) params: Params,

    pub(crate) report: StatusReport,
    arch_report: Archiver,

    /// Output of the most recent frame, `None` if that frame failed
    pub(crate) output: Option<DirectionVector>,
    last_good: Option<DirectionVector>,
    arch_output: Archiver,
}

/// Input data to the steering estimator.
pub struct InputData {
    /// Index of the frame in its sequence, carried through to the report.
    pub frame_index: usize,

    /// The frame to process, in RGB order.
    pub image: RgbImage,
}

/// Status report for SteerEst processing.
///
/// Kept flat so it can be archived as a CSV row.
#[derive(Clone, Copy, Default, Serialize, Debug)]
pub struct StatusReport {
    pub frame_index: usize,
    pub left_base: usize,
    pub right_base: usize,
    pub left_domain_lo: f64,
    pub left_domain_hi: f64,
    pub right_domain_lo: f64,
    pub right_domain_hi: f64,
    pub eval_row: f64,
    pub curvature: f64,
    pub direction: Option<TurnDirection>,
    pub steer_class: Option<SteerClass>,
}

/// Row of the output archive, only written for frames which succeeded.
#[derive(Clone, Copy, Serialize, Debug)]
struct OutputRecord {
    frame_index: usize,
    dx: f64,
    dy: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while initialising SteerEst.
#[derive(Debug, thiserror::Error)]
pub enum SteerEstInitError {
    #[error("Could not load the SteerEst parameters: {0}")]
    ParamLoad(#[from] params::LoadError),

    #[error("Could not set up the SteerEst archives: {0}")]
    Archive(#[from] ArchiveError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl SteerEst {
    /// Create an estimator with the given parameters which does not archive.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// The most recent successful output, if any.
    pub fn last_output(&self) -> Option<DirectionVector> {
        self.last_good
    }

    fn build_report(&self, frame_index: usize, est: &SteerEstimate) -> StatusReport {
        let (l_lo, l_hi) = est.lane_curves.left.domain();
        let (r_lo, r_hi) = est.lane_curves.right.domain();

        StatusReport {
            frame_index,
            left_base: est.bases.left,
            right_base: est.bases.right,
            left_domain_lo: l_lo,
            left_domain_hi: l_hi,
            right_domain_lo: r_lo,
            right_domain_hi: r_hi,
            eval_row: est.curvature.row,
            curvature: est.curvature.curvature,
            direction: Some(est.curvature.direction),
            steer_class: Some(SteerClass::from_dx(
                est.vector.dx,
                self.params.straight_threshold_px,
            )),
        }
    }
}

impl State for SteerEst {
    type InitData = &'static str;
    type InitError = SteerEstInitError;

    type InputData = InputData;
    type OutputData = DirectionVector;
    type StatusReport = StatusReport;
    type ProcError = SteerError;

    /// Initialise the SteerEst module.
    ///
    /// Expected init data is the path to the parameter file
    fn init(&mut self, init_data: Self::InitData, session: &Session)
        -> Result<(), Self::InitError>
    {
        self.params = params::load(init_data)?;

        self.arch_report = Archiver::from_path(session, "steer_est/status_report.csv")?;
        self.arch_output = Archiver::from_path(session, "steer_est/output.csv")?;

        Ok(())
    }

    /// Estimate the direction vector for one frame.
    ///
    /// On failure no output is held for this frame, although `last_output`
    /// still returns the last success. It is up to the caller to
    /// decide what to substitute.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        self.report = StatusReport {
            frame_index: input_data.frame_index,
            ..Default::default()
        };
        self.output = None;

        let est = estimate(&input_data.image, &self.params)?;

        self.report = self.build_report(input_data.frame_index, &est);
        self.output = Some(est.vector);
        self.last_good = Some(est.vector);

        trace!("SteerEst output: {:?}", est.vector);

        Ok((est.vector, self.report))
    }
}

impl Archived for SteerEst {
    fn write(&mut self) -> Result<(), ArchiveError> {
        self.arch_report.serialise(self.report)?;
        if let Some(out) = self.output {
            self.arch_output.serialise(OutputRecord {
                frame_index: self.report.frame_index,
                dx: out.dx,
                dy: out.dy,
            })?;
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::per::synthetic_stripes;
    use image::Rgb;

    #[test]
    fn test_proc_reports_and_keeps_last_output() {
        let mut se = SteerEst::with_params(Params::default());
        assert_eq!(se.last_output(), None);

        let good = InputData {
            frame_index: 3,
            image: synthetic_stripes(400, 360, &[100, 300], 10),
        };
        let (out, report) = se.proc(&good).unwrap();

        assert_eq!(report.frame_index, 3);
        assert_eq!(report.steer_class, Some(SteerClass::Straight));
        assert_eq!(report.left_domain_lo, 0.0);
        assert_eq!(report.left_domain_hi, 359.0);
        assert!(report.left_base < report.right_base);
        assert_eq!(se.last_output(), Some(out));

        let bad = InputData {
            frame_index: 4,
            image: RgbImage::from_pixel(400, 360, Rgb([0, 0, 0])),
        };
        assert!(se.proc(&bad).is_err());
        assert_eq!(se.report.frame_index, 4);
        assert_eq!(se.report.direction, None);
        assert_eq!(se.last_output(), Some(out));

        // No session so nothing is written, but archiving still succeeds
        assert!(se.write().is_ok());
    }

    #[test]
    fn test_failed_frame_writes_no_output_row() -> Result<(), ArchiveError> {
        let dir = std::env::temp_dir().join("steer_est_output_archive_test");
        std::fs::create_dir_all(&dir).map_err(ArchiveError::CreateError)?;
        let output_path = dir.join("output.csv");

        let mut se = SteerEst::with_params(Params::default());
        se.arch_output = Archiver::from_file_path(&output_path)?;

        let good = InputData {
            frame_index: 0,
            image: synthetic_stripes(400, 360, &[100, 300], 10),
        };
        assert!(se.proc(&good).is_ok());
        se.write()?;

        let bad = InputData {
            frame_index: 30,
            image: RgbImage::from_pixel(400, 360, Rgb([0, 0, 0])),
        };
        assert!(se.proc(&bad).is_err());
        se.write()?;

        assert!(se.last_output().is_some());

        let contents = std::fs::read_to_string(&output_path).map_err(ArchiveError::FlushError)?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "frame_index,dx,dy");
        assert!(lines[1].starts_with("0,"));

        std::fs::remove_dir_all(&dir).ok();

        Ok(())
    }
}
