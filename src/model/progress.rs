use serde::{Deserialize, Serialize};

use super::{now, LessonId, Timestamp};

/// Fraction of the total duration that must be watched before a lesson
/// counts as complete.
pub const COMPLETION_THRESHOLD: f64 = 0.9;

/// A persisted snapshot of engagement with one lesson.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VideoProgress {
    pub lesson_id: LessonId,
    pub watched_duration: f64,
    pub total_duration: f64,
    /// `watched / total * 100`, clamped to `[0, 100]`.
    pub progress_percentage: f64,
    pub is_completed: bool,
    pub last_watched_at: Timestamp,
}

impl VideoProgress {
    /// Derives a snapshot from the watched high-water mark, stamped with the
    /// current time.
    pub fn capture(lesson_id: LessonId, watched_duration: f64, total_duration: f64) -> Self {
        let progress_percentage = if total_duration > 0.0 {
            (watched_duration / total_duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        let is_completed =
            total_duration > 0.0 && watched_duration >= total_duration * COMPLETION_THRESHOLD;

        Self {
            lesson_id,
            watched_duration,
            total_duration,
            progress_percentage,
            is_completed,
            last_watched_at: now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson_id() -> LessonId {
        "lesson-101".parse().unwrap()
    }

    #[test]
    fn completion_threshold_is_ninety_percent() {
        let before = VideoProgress::capture(lesson_id(), 1079.0, 1200.0);
        assert!(!before.is_completed, "one second short of 90% is not complete");

        let at = VideoProgress::capture(lesson_id(), 1080.0, 1200.0);
        assert!(at.is_completed, "exactly 90% watched counts as complete");
    }

    #[test]
    fn percentage_is_clamped() {
        let overshoot = VideoProgress::capture(lesson_id(), 1500.0, 1200.0);
        assert_eq!(overshoot.progress_percentage, 100.0);

        let unloaded = VideoProgress::capture(lesson_id(), 300.0, 0.0);
        assert_eq!(unloaded.progress_percentage, 0.0);
        assert!(!unloaded.is_completed, "a lesson with no known duration cannot be complete");
    }

    #[test]
    fn halfway_is_fifty_percent() {
        let halfway = VideoProgress::capture(lesson_id(), 900.0, 1800.0);
        assert_eq!(halfway.progress_percentage, 50.0);
        assert!(!halfway.is_completed);
    }
}
