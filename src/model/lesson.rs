use derive_new::new;
use serde::{Deserialize, Serialize};
use snafu::Snafu;
use url::Url;

use super::{Timestamp, VideoBookmark};

/// One playable video unit within a course.
///
/// Supplied by the course-content collaborator when the learner selects a
/// lesson; the tracker treats everything except `duration` as display data.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct VideoLesson {
    pub id: LessonId,
    pub title: String,
    pub description: String,
    pub video_url: Url,
    /// Total length in seconds, authoritative once known from playback
    /// metadata. Never overridden by cached progress records.
    pub duration: f64,
    pub course_id: String,
    pub order: u32,

    #[new(default)]
    #[serde(default)]
    pub is_completed: bool,
    #[new(default)]
    #[serde(default)]
    pub watched_duration: f64,
    #[new(default)]
    #[serde(default)]
    pub last_watched_at: Option<Timestamp>,
    #[new(default)]
    #[serde(default)]
    pub notes: Option<String>,
    #[new(default)]
    #[serde(default)]
    pub bookmarks: Vec<VideoBookmark>,
}

/// Identifier of a lesson, stable across sessions. Must not be blank since
/// it is embedded into the durable store keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl std::str::FromStr for LessonId {
    type Err = ParseLessonId;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(ParseLessonId::new(input.to_string()));
        }

        Ok(LessonId(input.to_string()))
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::convert::AsRef<str> for LessonId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Snafu, new)]
#[snafu(display("Failed to parse lesson id: {:?}", text))]
pub struct ParseLessonId {
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lesson_id_is_rejected() {
        assert!("lesson-101".parse::<LessonId>().is_ok());
        assert!("".parse::<LessonId>().is_err());
        assert!("   ".parse::<LessonId>().is_err(), "whitespace-only ids would produce colliding store keys");
    }
}
