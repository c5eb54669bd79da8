use std::fmt;

use serde::{Deserialize, Serialize};

/// Share of fields that passed validation on the last submit, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Progress(u8);

impl Progress {
    pub const COMPLETE: Progress = Progress(100);

    /// `round(100 * valid / total)` with halves rounded up; `None` for an empty schema.
    pub fn from_counts(valid: usize, total: usize) -> Option<Progress> {
        if total == 0 {
            return None;
        }
        let valid = valid.min(total) as u64;
        let total = total as u64;
        let percent = (200 * valid + total) / (2 * total);
        Some(Progress(percent as u8))
    }

    pub fn percent(self) -> u8 {
        self.0
    }

    /// Filled share for gauges, `0.0..=1.0`.
    pub fn ratio(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn is_complete(self) -> bool {
        self.0 == 100
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_nearest_percent() {
        assert_eq!(Progress::from_counts(1, 3).map(Progress::percent), Some(33));
        assert_eq!(Progress::from_counts(2, 3).map(Progress::percent), Some(67));
        assert_eq!(Progress::from_counts(1, 8).map(Progress::percent), Some(13));
        assert_eq!(Progress::from_counts(1, 200).map(Progress::percent), Some(1));
        assert_eq!(Progress::from_counts(0, 4).map(Progress::percent), Some(0));
        assert_eq!(Progress::from_counts(4, 4), Some(Progress::COMPLETE));
    }

    #[test]
    fn empty_schema_has_no_progress() {
        assert_eq!(Progress::from_counts(0, 0), None);
    }

    #[test]
    fn display_and_ratio() {
        let p = Progress::from_counts(3, 4).unwrap();
        assert_eq!(p.to_string(), "75%");
        assert!((p.ratio() - 0.75).abs() < f64::EPSILON);
        assert!(!p.is_complete());
    }
}
