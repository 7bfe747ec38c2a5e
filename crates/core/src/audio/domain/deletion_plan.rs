use crate::shared::time_range::TimeRange;

/// Sorted, non-overlapping ranges to remove from a buffer.
///
/// Only [`SegmentMerger`](super::segment_merger::SegmentMerger) builds
/// non-empty plans, so `ranges[i].end < ranges[i + 1].start` always holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeletionPlan {
    ranges: Vec<TimeRange>,
}

impl DeletionPlan {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(super) fn from_merged(ranges: Vec<TimeRange>) -> Self {
        debug_assert!(ranges.windows(2).all(|w| w[0].end() < w[1].start()));
        Self { ranges }
    }

    pub fn ranges(&self) -> &[TimeRange] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimeRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Seconds covered by the plan, before clamping to any buffer.
    pub fn total_duration(&self) -> f64 {
        self.ranges.iter().map(TimeRange::duration).sum()
    }
}

impl<'a> IntoIterator for &'a DeletionPlan {
    type Item = &'a TimeRange;
    type IntoIter = std::slice::Iter<'a, TimeRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_plan() {
        let plan = DeletionPlan::empty();
        assert!(plan.is_empty());
        assert_eq!(plan.len(), 0);
        assert_eq!(plan.total_duration(), 0.0);
    }

    #[test]
    fn test_total_duration_sums_ranges() {
        let plan = DeletionPlan::from_merged(vec![
            TimeRange::new(1.0, 2.0).unwrap(),
            TimeRange::new(3.0, 3.5).unwrap(),
        ]);
        assert_relative_eq!(plan.total_duration(), 1.5);
        assert_eq!(plan.iter().count(), 2);
    }
}
