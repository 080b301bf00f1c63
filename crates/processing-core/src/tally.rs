//! Per-run summary of classification decisions.

use std::collections::BTreeMap;

use flowsteer_motion_model::direction::{ClassificationResult, Direction};
use serde::{Deserialize, Serialize};

/// Counts of each direction seen over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionTally {
    /// Frames recorded per direction. Directions never seen are absent.
    pub counts: BTreeMap<Direction, u64>,

    /// Total frames recorded.
    pub total: u64,

    /// Sum of folded angles over non-straight frames.
    turning_angle_sum: f64,
}

impl DirectionTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame's decision.
    pub fn record(&mut self, result: &ClassificationResult) {
        *self.counts.entry(result.direction).or_insert(0) += 1;
        self.total += 1;
        if !result.is_straight() {
            self.turning_angle_sum += result.angle_deg;
        }
    }

    pub fn count(&self, direction: Direction) -> u64 {
        self.counts.get(&direction).copied().unwrap_or(0)
    }

    /// Frames that got any left or right label.
    pub fn turning_frames(&self) -> u64 {
        self.total - self.count(Direction::Straight)
    }

    /// Frames left with a coarse label because the angle hit a bucket boundary.
    pub fn coarse_frames(&self) -> u64 {
        self.counts
            .iter()
            .filter(|(direction, _)| direction.is_coarse())
            .map(|(_, n)| n)
            .sum()
    }

    /// Mean folded angle over turning frames.
    pub fn mean_turning_angle(&self) -> Option<f64> {
        let turning = self.turning_frames();
        (turning > 0).then(|| self.turning_angle_sum / turning as f64)
    }

    /// Most frequent direction; ties resolve to the earlier label in [`Direction::ALL`].
    pub fn dominant(&self) -> Option<Direction> {
        Direction::ALL
            .iter()
            .copied()
            .filter(|d| self.count(*d) > 0)
            .fold(None, |best: Option<Direction>, d| match best {
                Some(b) if self.count(b) >= self.count(d) => Some(b),
                _ => Some(d),
            })
    }
}

impl<'a> Extend<&'a ClassificationResult> for DirectionTally {
    fn extend<I: IntoIterator<Item = &'a ClassificationResult>>(&mut self, iter: I) {
        for result in iter {
            self.record(result);
        }
    }
}
