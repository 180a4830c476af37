//! Stagger distribution
//!
//! A stagger spreads the start times of one rule across a set of targets.
//! The configured `spread_ms` is a *total* budget: the target furthest from
//! the origin starts exactly `spread_ms` after the first one, and everyone
//! else is placed proportionally in between. Adding targets makes the gaps
//! smaller, never the total span longer.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Where the stagger wave starts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaggerFrom {
    /// First to last
    #[default]
    Start,
    /// Last to first
    End,
    /// From the middle outward
    Center,
    /// Shuffled order, reproducible from the seed
    Random { seed: u64 },
}

/// Configuration for a staggered start
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    /// Total spread between the first and last start (ms)
    pub spread_ms: u32,
    #[serde(default)]
    pub from: StaggerFrom,
}

impl Stagger {
    /// Sequential-from-start stagger with the given total spread
    pub fn new(spread_ms: u32) -> Self {
        Self {
            spread_ms,
            from: StaggerFrom::Start,
        }
    }

    /// Stagger from last to first
    pub fn reverse(mut self) -> Self {
        self.from = StaggerFrom::End;
        self
    }

    /// Stagger from center outward
    pub fn from_center(mut self) -> Self {
        self.from = StaggerFrom::Center;
        self
    }

    /// Stagger in a seeded random order
    pub fn random(mut self, seed: u64) -> Self {
        self.from = StaggerFrom::Random { seed };
        self
    }

    /// Start offsets (ms) for `total` targets, in target order
    pub fn offsets(&self, total: usize) -> Vec<u32> {
        if total == 0 {
            return Vec::new();
        }

        let distances: Vec<f32> = match self.from {
            StaggerFrom::Start => (0..total).map(|i| i as f32).collect(),
            StaggerFrom::End => (0..total).map(|i| (total - 1 - i) as f32).collect(),
            StaggerFrom::Center => {
                let center = (total - 1) as f32 / 2.0;
                (0..total).map(|i| (i as f32 - center).abs()).collect()
            }
            StaggerFrom::Random { seed } => {
                let mut order: Vec<usize> = (0..total).collect();
                let mut rng = StdRng::seed_from_u64(seed);
                order.shuffle(&mut rng);
                let mut distances = vec![0.0; total];
                for (rank, index) in order.into_iter().enumerate() {
                    distances[index] = rank as f32;
                }
                distances
            }
        };

        let max = distances.iter().copied().fold(0.0_f32, f32::max);
        if max <= 0.0 {
            return vec![0; total];
        }

        distances
            .into_iter()
            .map(|d| ((d / max) * self.spread_ms as f32).round() as u32)
            .collect()
    }
}
