use anyhow::{Context, Result};
use deltapath_core::{
    ProcessorConfig,
    accuracy::EvaluationConfig,
    kinematics::DeltaGeometry,
    processor::MotionDefaults,
    segment::SegmentationConfig,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::report::OutputFormat;

/// Main configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Printer dimensions
    #[serde(default)]
    pub geometry: DeltaGeometry,

    /// Segmenter tuning
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Dense re-sampling used to measure deviation
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Feed settings before the program sets its own
    #[serde(default)]
    pub motion: MotionDefaults,

    #[serde(default)]
    pub report: ReportConfig,
}

/// Report configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Signatures listed in the text report, most frequent first
    #[serde(default = "default_max_signatures")]
    pub max_signatures: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            max_signatures: default_max_signatures(),
        }
    }
}

fn default_max_signatures() -> usize {
    25
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            // TOML first, then JSON
            _ => Self::from_toml(&content).or_else(|_| Self::from_json(&content)),
        }
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    /// Reject values the kinematics or segmenters cannot work with
    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;
        if !is_positive(g.diagonal_rod) {
            anyhow::bail!("geometry.diagonal_rod must be positive");
        }
        if !is_positive(g.radius) {
            anyhow::bail!("geometry.radius must be positive");
        }
        if !g.zero_offset.is_finite() {
            anyhow::bail!("geometry.zero_offset must be finite");
        }

        let s = &self.segmentation;
        if !is_positive(s.segments_per_second) {
            anyhow::bail!("segmentation.segments_per_second must be positive");
        }
        if !is_positive(s.tolerance_squared) {
            anyhow::bail!("segmentation.tolerance_squared must be positive");
        }
        if s.max_depth == 0 {
            anyhow::bail!("segmentation.max_depth must be at least 1");
        }

        if !is_positive(self.evaluation.sample_step) {
            anyhow::bail!("evaluation.sample_step must be positive");
        }

        if !is_positive(self.motion.feed_rate) {
            anyhow::bail!("motion.feed_rate must be positive");
        }
        if self.motion.feed_multiplier_percent == 0 {
            anyhow::bail!("motion.feed_multiplier_percent must be positive");
        }

        Ok(())
    }

    pub fn processor_config(&self) -> ProcessorConfig {
        ProcessorConfig {
            geometry: self.geometry,
            segmentation: self.segmentation,
            evaluation: self.evaluation,
            motion: self.motion,
        }
    }
}
