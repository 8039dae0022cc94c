//! Sequential analysis of a motion command stream.
//!
//! Each move starts where the previous one ended, so commands must be fed
//! in stream order. All mutable state of a run lives in a [`RunContext`]
//! owned by the caller; the processor itself only holds configuration and
//! kinematics and can be shared between independent runs.

use crate::{
    accuracy::{AccuracyEvaluator, EvaluationConfig},
    kinematics::{AxisMapping, DeltaGeometry, DeltaKin, Kinematics, KinematicsError},
    segment::{
        AdaptiveSegmentation, AdaptiveSegmenter, Move, NaiveTimeSegmenter, SegmentError,
        SegmentationConfig, SegmentationResult,
    },
    stats::RunStatistics,
    vector::Vector,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A motion command as handed over by the G-code front end.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Return X, Y and Z to the origin.
    Home,
    /// Linear move; absent fields keep their current value.
    Move(MoveCommand),
    /// Feed rate override in percent.
    SetFeedMultiplier(u32),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MoveCommand {
    pub feed_rate: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    pub e: Option<f64>,
}

/// Feed settings in effect before the first command changes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionDefaults {
    /// Feed rate in mm/min
    pub feed_rate: f64,
    pub feed_multiplier_percent: u32,
}

impl Default for MotionDefaults {
    fn default() -> Self {
        Self {
            feed_rate: 1500.0,
            feed_multiplier_percent: 100,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub geometry: DeltaGeometry,
    pub segmentation: SegmentationConfig,
    pub evaluation: EvaluationConfig,
    pub motion: MotionDefaults,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessorState {
    pub current_position: Vector,
    pub feed_rate: f64,
    pub feed_multiplier_percent: u32,
}

/// Everything a single analysis run mutates.
#[derive(Clone, Debug, PartialEq)]
pub struct RunContext {
    pub state: ProcessorState,
    pub stats: RunStatistics,
}

impl RunContext {
    pub fn new(motion: &MotionDefaults) -> Self {
        Self {
            state: ProcessorState {
                current_position: Vector::ORIGIN,
                feed_rate: motion.feed_rate,
                feed_multiplier_percent: motion.feed_multiplier_percent,
            },
            stats: RunStatistics::default(),
        }
    }
}

/// Both segmentations of one move and their measured accuracy.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveReport {
    pub naive: SegmentationResult,
    pub adaptive: AdaptiveSegmentation,
    pub naive_deviation: f64,
    pub adaptive_deviation: f64,
}

#[derive(Debug, Clone, Copy, Error, PartialEq)]
pub enum ProcessError {
    #[error("skipped move to {destination}: {source}")]
    Unreachable {
        destination: Vector,
        #[source]
        source: KinematicsError,
    },

    #[error("skipped move to {destination}: position is not finite")]
    NotFinite { destination: Vector },

    #[error("skipped move to {destination}: feed {feed_rate} mm/min at {feed_multiplier_percent}%")]
    InvalidFeed {
        destination: Vector,
        feed_rate: f64,
        feed_multiplier_percent: u32,
    },

    #[error("skipped move to {destination}: {source}")]
    Oversized {
        destination: Vector,
        #[source]
        source: SegmentError,
    },

    #[error("move to {destination} exceeded the recursion depth limit of {max_depth}")]
    DepthLimitExceeded { destination: Vector, max_depth: u32 },
}

impl ProcessError {
    /// Whether the run can continue with the next command.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProcessError::DepthLimitExceeded { .. })
    }
}

pub struct MoveProcessor<K = DeltaKin> {
    kinematics: K,
    config: ProcessorConfig,
}

impl MoveProcessor<DeltaKin> {
    pub fn new(config: ProcessorConfig) -> Self {
        Self::with_kinematics(DeltaKin::new(&config.geometry), config)
    }
}

impl<K: Kinematics> MoveProcessor<K> {
    pub fn with_kinematics(kinematics: K, config: ProcessorConfig) -> Self {
        Self { kinematics, config }
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Fresh state for a new run.
    pub fn start_run(&self) -> RunContext {
        RunContext::new(&self.config.motion)
    }

    /// Apply a single command.
    ///
    /// Returns the analysis of the move, or `None` for commands that do not
    /// move the effector. A move that fails with a recoverable error is
    /// counted as skipped and leaves the current position where it was.
    pub fn process(
        &self,
        ctx: &mut RunContext,
        command: Command,
    ) -> Result<Option<MoveReport>, ProcessError> {
        match command {
            Command::Home => {
                let position = &mut ctx.state.current_position;
                *position = Vector::new(0.0, 0.0, 0.0, position.e);
                tracing::debug!("homed to {}", position);
                Ok(None)
            }
            Command::SetFeedMultiplier(percent) => {
                ctx.state.feed_multiplier_percent = percent;
                Ok(None)
            }
            Command::Move(cmd) => self.process_move(ctx, &cmd),
        }
    }

    /// Apply every command in order.
    ///
    /// Recoverable failures are logged and the stream continues; the first
    /// fatal error aborts the run.
    pub fn run<I>(&self, ctx: &mut RunContext, commands: I) -> Result<(), ProcessError>
    where
        I: IntoIterator<Item = Command>,
    {
        for command in commands {
            match self.process(ctx, command) {
                Ok(_) => {}
                Err(err) if err.is_recoverable() => tracing::warn!("{err}"),
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// Resolve the absolute destination of a move command.
    pub fn destination(&self, current: Vector, cmd: &MoveCommand) -> Vector {
        let mut destination = current;
        match self.config.geometry.axis_mapping {
            AxisMapping::Independent => {
                destination.x = cmd.x.unwrap_or(current.x);
                destination.y = cmd.y.unwrap_or(current.y);
                destination.z = cmd.z.unwrap_or(current.z);
            }
            AxisMapping::Legacy => {
                // the last of X, Y, Z present wins the X axis
                for value in [cmd.x, cmd.y, cmd.z].into_iter().flatten() {
                    destination.x = value;
                }
            }
        }
        destination.e = cmd.e.unwrap_or(current.e);
        destination
    }

    fn process_move(
        &self,
        ctx: &mut RunContext,
        cmd: &MoveCommand,
    ) -> Result<Option<MoveReport>, ProcessError> {
        let m = Move {
            start: ctx.state.current_position,
            destination: self.destination(ctx.state.current_position, cmd),
            feed_rate: cmd.feed_rate.unwrap_or(ctx.state.feed_rate),
            feed_multiplier_percent: ctx.state.feed_multiplier_percent,
        };

        if !m.destination.is_finite() {
            ctx.stats.moves_skipped += 1;
            return Err(ProcessError::NotFinite {
                destination: m.destination,
            });
        }
        if !(m.feed_rate.is_finite() && m.feed_rate > 0.0) || m.feed_multiplier_percent == 0 {
            ctx.stats.moves_skipped += 1;
            return Err(ProcessError::InvalidFeed {
                destination: m.destination,
                feed_rate: m.feed_rate,
                feed_multiplier_percent: m.feed_multiplier_percent,
            });
        }
        // F is modal: it sticks even when the move itself is rejected later
        ctx.state.feed_rate = m.feed_rate;

        if m.is_degenerate() {
            ctx.stats.degenerate_moves += 1;
            ctx.state.current_position = m.destination;
            return Ok(None);
        }

        let report = match self.analyze(&m) {
            Ok(report) => report,
            Err(SegmentError::DegenerateMove { .. }) => {
                ctx.stats.degenerate_moves += 1;
                ctx.state.current_position = m.destination;
                return Ok(None);
            }
            Err(SegmentError::Kinematics(source)) => {
                ctx.stats.moves_skipped += 1;
                return Err(ProcessError::Unreachable {
                    destination: m.destination,
                    source,
                });
            }
            Err(source @ SegmentError::TooManySteps { .. }) => {
                ctx.stats.moves_skipped += 1;
                return Err(ProcessError::Oversized {
                    destination: m.destination,
                    source,
                });
            }
        };
        ctx.state.current_position = m.destination;

        let truncated = report.adaptive.trace.truncated_branches;
        if truncated > 0 {
            let max_depth = self.config.segmentation.max_depth;
            if self.config.segmentation.strict_depth_limit {
                return Err(ProcessError::DepthLimitExceeded {
                    destination: m.destination,
                    max_depth,
                });
            }
            tracing::warn!(
                "move to {} left {} branches above tolerance at depth {}",
                m.destination,
                truncated,
                max_depth
            );
        }

        tracing::trace!(
            naive = report.naive.waypoints.len(),
            adaptive = report.adaptive.result.waypoints.len(),
            "analyzed move to {}",
            m.destination
        );
        ctx.stats.record(&report);
        Ok(Some(report))
    }

    /// Segment a move both ways and measure both results.
    ///
    /// The adaptive pass runs first so an unreachable destination is
    /// reported before the fixed-rate waypoints are allocated.
    pub fn analyze(&self, m: &Move) -> Result<MoveReport, SegmentError> {
        let segmentation = &self.config.segmentation;
        let adaptive = AdaptiveSegmenter::new(&self.kinematics, segmentation.max_depth)
            .segment(m, segmentation.tolerance_squared)?;
        let naive = NaiveTimeSegmenter::new(segmentation.segments_per_second).segment(m)?;

        let evaluator =
            AccuracyEvaluator::new(&self.kinematics, self.config.evaluation.sample_step);
        let naive_deviation = evaluator.worst_deviation(&naive.waypoints)?;
        let adaptive_deviation = evaluator.worst_deviation(&adaptive.result.waypoints)?;

        Ok(MoveReport {
            naive,
            adaptive,
            naive_deviation,
            adaptive_deviation,
        })
    }
}
