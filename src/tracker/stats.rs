use serde::Serialize;

/// Read-only aggregate of one viewing session, for dashboards and the
/// course-overview collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoStats {
    pub watched_duration: f64,
    pub total_duration: f64,
    pub completion_percentage: f64,
    pub bookmark_count: usize,
    pub has_notes: bool,
}
