//! Checkpoint progress tracking
//!
//! Player x is quantized into fixed-width buckets; only a bucket higher
//! than any seen before produces a save signal.

use serde::{Deserialize, Serialize};

/// High-water mark over checkpoint buckets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckpointTracker {
    bucket_width: f32,
    last_bucket: i32,
}

impl CheckpointTracker {
    pub fn new(bucket_width: f32) -> Self {
        Self {
            bucket_width,
            last_bucket: 0,
        }
    }

    /// Tracker that already considers the bucket containing `x` saved
    pub fn resume(bucket_width: f32, x: f32) -> Self {
        let mut tracker = Self::new(bucket_width);
        if let Some(bucket) = tracker.bucket_of(x) {
            tracker.last_bucket = bucket.max(0);
        }
        tracker
    }

    /// Bucket start for a world x, or None for a degenerate width
    pub fn bucket_of(&self, x: f32) -> Option<i32> {
        if self.bucket_width.is_nan() || self.bucket_width <= 0.0 || !x.is_finite() {
            return None;
        }
        Some(((x / self.bucket_width).floor() * self.bucket_width) as i32)
    }

    /// Feed the current player x; returns the new bucket when the mark rises
    pub fn observe(&mut self, x: f32) -> Option<i32> {
        let bucket = self.bucket_of(x)?;
        if bucket > self.last_bucket {
            self.last_bucket = bucket;
            Some(bucket)
        } else {
            None
        }
    }

    pub fn last_bucket(&self) -> i32 {
        self.last_bucket
    }
}
