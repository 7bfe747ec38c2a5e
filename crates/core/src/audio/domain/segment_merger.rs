use super::deletion_plan::DeletionPlan;
use crate::shared::time_range::TimeRange;

/// Folds raw deletion ranges into a [`DeletionPlan`].
///
/// Ranges are sorted by start, then each one is absorbed into the running
/// accumulator whenever it starts at or before the accumulator's end.
/// Touching ranges merge, so no boundary is ever faded or cut twice.
/// Bounds are left alone; clamping to the buffer is the excision engine's job.
pub struct SegmentMerger;

impl SegmentMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(&self, ranges: &[TimeRange]) -> DeletionPlan {
        let mut sorted = ranges.to_vec();
        sorted.sort_by(|a, b| {
            a.start()
                .total_cmp(&b.start())
                .then(a.end().total_cmp(&b.end()))
        });

        let mut merged: Vec<TimeRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(acc) if acc.reaches(&range) => *acc = acc.span(&range),
                _ => merged.push(range),
            }
        }

        DeletionPlan::from_merged(merged)
    }
}

impl Default for SegmentMerger {
    fn default() -> Self {
        Self::new()
    }
}
