// Run-wide comparison of the two segmentation strategies

use crate::processor::MoveReport;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunStatistics {
    /// Waypoints produced by the fixed-rate segmenter, start points included
    pub total_steps_naive: u64,
    /// Waypoints produced by the adaptive segmenter, start points included
    pub total_steps_adaptive: u64,
    /// Midpoint deviation tests performed by the adaptive segmenter
    pub distance_calculation_count: u64,
    /// Adaptive kinematics evaluations minus fixed-rate ones
    pub adaptive_calculation_surplus: i64,
    pub max_deviation_naive: f64,
    pub max_deviation_adaptive: f64,
    pub max_recursion_depth: u32,
    pub moves_processed: u64,
    pub moves_skipped: u64,
    pub degenerate_moves: u64,
    /// Adaptive branches cut off by the depth ceiling
    pub depth_limit_hits: u64,
}

impl RunStatistics {
    /// Fold one analyzed move into the totals.
    pub fn record(&mut self, report: &MoveReport) {
        let naive = &report.naive;
        let adaptive = &report.adaptive.result;
        let trace = &report.adaptive.trace;

        self.moves_processed += 1;
        self.total_steps_naive += naive.waypoints.len() as u64;
        self.total_steps_adaptive += adaptive.waypoints.len() as u64;
        self.distance_calculation_count += trace.distance_calculations;
        self.adaptive_calculation_surplus +=
            adaptive.calculation_count as i64 - naive.calculation_count as i64;
        self.max_deviation_naive = self.max_deviation_naive.max(report.naive_deviation);
        self.max_deviation_adaptive = self.max_deviation_adaptive.max(report.adaptive_deviation);
        self.max_recursion_depth = self.max_recursion_depth.max(trace.max_depth);
        self.depth_limit_hits += trace.truncated_branches;
    }

    /// Combine statistics of an independent run into this one.
    pub fn merge(&mut self, other: &Self) {
        self.total_steps_naive += other.total_steps_naive;
        self.total_steps_adaptive += other.total_steps_adaptive;
        self.distance_calculation_count += other.distance_calculation_count;
        self.adaptive_calculation_surplus += other.adaptive_calculation_surplus;
        self.max_deviation_naive = self.max_deviation_naive.max(other.max_deviation_naive);
        self.max_deviation_adaptive = self
            .max_deviation_adaptive
            .max(other.max_deviation_adaptive);
        self.max_recursion_depth = self.max_recursion_depth.max(other.max_recursion_depth);
        self.moves_processed += other.moves_processed;
        self.moves_skipped += other.moves_skipped;
        self.degenerate_moves += other.degenerate_moves;
        self.depth_limit_hits += other.depth_limit_hits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        segment::{AdaptiveSegmentation, PartitionTrace, SegmentationResult},
        vector::Vector,
    };

    fn report(naive_points: usize, adaptive_points: usize, depth: u32) -> MoveReport {
        let points = |n| vec![Vector::ORIGIN; n];
        MoveReport {
            naive: SegmentationResult {
                waypoints: points(naive_points),
                calculation_count: naive_points as u64 - 1,
            },
            adaptive: AdaptiveSegmentation {
                result: SegmentationResult {
                    waypoints: points(adaptive_points),
                    calculation_count: 9,
                },
                trace: PartitionTrace {
                    distance_calculations: 3,
                    max_depth: depth,
                    truncated_branches: 0,
                },
            },
            naive_deviation: depth as f64,
            adaptive_deviation: 0.01,
        }
    }

    #[test]
    fn stats_record_accumulates() {
        let mut stats = RunStatistics::default();
        stats.record(&report(11, 3, 2));
        stats.record(&report(5, 3, 1));

        assert_eq!(stats.moves_processed, 2);
        assert_eq!(stats.total_steps_naive, 16);
        assert_eq!(stats.total_steps_adaptive, 6);
        assert_eq!(stats.distance_calculation_count, 6);
        // (9 - 10) + (9 - 4)
        assert_eq!(stats.adaptive_calculation_surplus, 4);
        assert_eq!(stats.max_deviation_naive, 2.0);
        assert_eq!(stats.max_deviation_adaptive, 0.01);
        assert_eq!(stats.max_recursion_depth, 2);
    }

    #[test]
    fn stats_merge_sums_counters_and_keeps_maxima() {
        let mut a = RunStatistics::default();
        a.record(&report(11, 3, 2));
        a.moves_skipped = 1;

        let mut b = RunStatistics::default();
        b.record(&report(5, 3, 4));
        b.degenerate_moves = 2;

        let mut merged = a.clone();
        merged.merge(&b);
        assert_eq!(merged.moves_processed, 2);
        assert_eq!(merged.total_steps_naive, 16);
        assert_eq!(merged.adaptive_calculation_surplus, 4);
        assert_eq!(merged.max_recursion_depth, 4);
        assert_eq!(merged.max_deviation_naive, 4.0);
        assert_eq!(merged.moves_skipped, 1);
        assert_eq!(merged.degenerate_moves, 2);

        // merging is order independent
        let mut reversed = b.clone();
        reversed.merge(&a);
        assert_eq!(merged, reversed);
    }
}
