use std::time::Duration as StdDuration;

use crate::model::{
    now, BookmarkId, LessonId, Timestamp, VideoBookmark, VideoLesson, VideoProgress,
};
use crate::store::{self, Store};

pub use clock::format_clock;
pub use stats::VideoStats;

mod clock;
mod stats;

/// How far a single forward/backward seek moves the playhead.
pub const SEEK_STEP_SECS: f64 = 10.0;

/// Percentage past which the session counts as "near the end".
pub const NEAR_END_PERCENT: f64 = 90.0;

pub const DEFAULT_FLUSH_INTERVAL: StdDuration = StdDuration::from_secs(1);

/// Single source of truth for what is currently playing and how far the
/// learner has progressed, plus the durable per-lesson engagement history.
///
/// One tracker serves one viewer; callers inject the store and hold the
/// tracker mutably rather than resolving a global. All operations are
/// synchronous and infallible: invalid numeric inputs are clamped, unknown
/// ids are ignored, and store failures are logged and absorbed so the
/// playback surface never sees an error from here.
#[derive(Debug)]
pub struct PlaybackTracker<S> {
    store: S,
    flush_interval: StdDuration,

    current_video: Option<VideoLesson>,
    is_playing: bool,
    current_time: f64,
    duration: f64,
    volume: f64,
    playback_rate: f64,
    is_fullscreen: bool,
    is_muted: bool,
    video_progress: Option<VideoProgress>,
    notes: String,
    bookmarks: Vec<VideoBookmark>,

    /// High-water mark of the playhead; never lowered by backward seeks, so
    /// resume returns to the furthest point reached.
    watched_duration: f64,
    last_flush: Option<Timestamp>,
    dirty: bool,
}

impl<S: Store> PlaybackTracker<S> {
    pub fn new(store: S) -> Self {
        Self::with_flush_interval(store, DEFAULT_FLUSH_INTERVAL)
    }

    /// A zero interval writes every progress update through immediately.
    pub fn with_flush_interval(store: S, flush_interval: StdDuration) -> Self {
        Self {
            store,
            flush_interval,
            current_video: None,
            is_playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            playback_rate: 1.0,
            is_fullscreen: false,
            is_muted: false,
            video_progress: None,
            notes: String::new(),
            bookmarks: Vec::new(),
            watched_duration: 0.0,
            last_flush: None,
            dirty: false,
        }
    }

    /// Starts a viewing session for `lesson`, replacing the previous one.
    ///
    /// Transient state resets to defaults, then any persisted records for
    /// this lesson id overlay it: position and watched high-water come from
    /// the saved snapshot, notes and bookmarks from their own records.
    /// `duration` always comes from the lesson itself; a stale snapshot
    /// must not override a re-encoded video's length.
    pub fn load_video(&mut self, lesson: VideoLesson) {
        // unload write for the outgoing session
        self.flush_progress();

        self.clear_transient();
        self.duration = lesson.duration;
        self.notes = lesson.notes.clone().unwrap_or_default();
        self.bookmarks = lesson.bookmarks.clone();

        if let Some(saved) = self.restore::<VideoProgress>(&store::progress_key(&lesson.id)) {
            self.current_time = saved.watched_duration;
            self.watched_duration = saved.watched_duration;
            self.video_progress = Some(saved);
        }
        if let Some(saved) = self.restore::<String>(&store::notes_key(&lesson.id)) {
            self.notes = saved;
        }
        if let Some(saved) = self.restore::<Vec<VideoBookmark>>(&store::bookmarks_key(&lesson.id))
        {
            self.bookmarks = saved;
        }

        self.current_video = Some(lesson);
    }

    pub fn play(&mut self) {
        self.is_playing = true;
    }

    /// Pausing also flushes any pending progress write.
    pub fn pause(&mut self) {
        self.is_playing = false;
        self.flush_progress();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Moves the playhead, clamped into `[0, duration]`.
    pub fn seek_to(&mut self, time: f64) {
        self.current_time = time.clamp(0.0, self.duration.max(0.0));
    }

    pub fn seek_forward(&mut self) {
        self.seek_to(self.current_time + SEEK_STEP_SECS);
    }

    pub fn seek_backward(&mut self) {
        self.seek_to(self.current_time - SEEK_STEP_SECS);
    }

    /// Clamps into `[0, 1]`; a volume of exactly zero reads as muted.
    pub fn set_volume(&mut self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);
        self.volume = volume;
        self.is_muted = volume == 0.0;
    }

    pub fn toggle_mute(&mut self) {
        self.is_muted = !self.is_muted;
    }

    pub fn set_playback_rate(&mut self, rate: f64) {
        self.playback_rate = rate;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.is_fullscreen = !self.is_fullscreen;
    }

    /// Position report from the playback surface. Taken verbatim, then the
    /// progress snapshot is recomputed and (subject to the flush interval)
    /// persisted.
    pub fn update_current_time(&mut self, time: f64) {
        self.current_time = time;
        self.refresh_progress();
    }

    /// Length report from the playback surface, taken verbatim.
    pub fn update_duration(&mut self, duration: f64) {
        self.duration = duration;
        self.refresh_progress();
    }

    /// Drops a bookmark at the current playhead and persists the list.
    /// The timestamp is clamped into `[0, duration]`. A no-op without a
    /// loaded lesson, since there is no key to store it under.
    pub fn add_bookmark(&mut self, title: impl Into<String>, description: Option<String>) {
        let Some(lesson_id) = self.current_lesson_id() else {
            return;
        };

        let timestamp = self.current_time.clamp(0.0, self.duration.max(0.0));
        self.bookmarks
            .push(VideoBookmark::new(timestamp, title.into(), description));
        self.persist_bookmarks(&lesson_id);
    }

    /// Removes the bookmark if it exists; an unknown id is a no-op.
    pub fn remove_bookmark(&mut self, id: BookmarkId) {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|bookmark| bookmark.id != id);
        if self.bookmarks.len() == before {
            return;
        }

        if let Some(lesson_id) = self.current_lesson_id() {
            self.persist_bookmarks(&lesson_id);
        }
    }

    /// Seeks to the bookmark's timestamp; an unknown id is a no-op.
    pub fn jump_to_bookmark(&mut self, id: BookmarkId) {
        let target = self
            .bookmarks
            .iter()
            .find(|bookmark| bookmark.id == id)
            .map(|bookmark| bookmark.timestamp);

        if let Some(timestamp) = target {
            self.seek_to(timestamp);
        }
    }

    /// Replaces the lesson notes and persists them.
    pub fn update_notes(&mut self, text: impl Into<String>) {
        self.notes = text.into();

        if let Some(lesson_id) = self.current_lesson_id() {
            let key = store::notes_key(&lesson_id);
            if let Err(err) = store::write_record(&mut self.store, &key, &self.notes) {
                tracing::warn!("failed to persist notes `{key}`: {err}");
            }
        }
    }

    /// Clears all transient state back to "no video loaded". Persisted
    /// records are untouched.
    pub fn reset(&mut self) {
        self.clear_transient();
    }

    pub fn video_stats(&self) -> VideoStats {
        let completion_percentage = if self.duration > 0.0 {
            (self.watched_duration / self.duration * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        VideoStats {
            watched_duration: self.watched_duration,
            total_duration: self.duration,
            completion_percentage,
            bookmark_count: self.bookmarks.len(),
            has_notes: !self.notes.is_empty(),
        }
    }

    // --- derived values ---

    pub fn progress_percentage(&self) -> f64 {
        if self.duration > 0.0 {
            self.current_time / self.duration * 100.0
        } else {
            0.0
        }
    }

    pub fn remaining_time(&self) -> f64 {
        (self.duration - self.current_time).max(0.0)
    }

    pub fn is_near_end(&self) -> bool {
        self.progress_percentage() >= NEAR_END_PERCENT
    }

    pub fn is_video_loaded(&self) -> bool {
        self.duration > 0.0
    }

    pub fn time_formatted(&self) -> String {
        format_clock(self.current_time)
    }

    pub fn duration_formatted(&self) -> String {
        format_clock(self.duration)
    }

    pub fn remaining_time_formatted(&self) -> String {
        format_clock(self.remaining_time())
    }

    // --- state accessors ---

    pub fn current_video(&self) -> Option<&VideoLesson> {
        self.current_video.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn is_muted(&self) -> bool {
        self.is_muted
    }

    pub fn video_progress(&self) -> Option<&VideoProgress> {
        self.video_progress.as_ref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn bookmarks(&self) -> &[VideoBookmark] {
        &self.bookmarks
    }

    pub fn watched_duration(&self) -> f64 {
        self.watched_duration
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // --- internals ---

    fn clear_transient(&mut self) {
        self.current_video = None;
        self.is_playing = false;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.volume = 1.0;
        self.playback_rate = 1.0;
        self.is_fullscreen = false;
        self.is_muted = false;
        self.video_progress = None;
        self.notes.clear();
        self.bookmarks.clear();
        self.watched_duration = 0.0;
        self.last_flush = None;
        self.dirty = false;
    }

    fn current_lesson_id(&self) -> Option<LessonId> {
        self.current_video.as_ref().map(|lesson| lesson.id.clone())
    }

    /// Recomputes the progress snapshot once a lesson and a positive
    /// duration are both present, then persists it if a flush is due.
    fn refresh_progress(&mut self) {
        let Some(lesson_id) = self.current_lesson_id() else {
            return;
        };
        if self.duration <= 0.0 {
            return;
        }

        self.watched_duration = self.watched_duration.max(self.current_time);
        self.video_progress = Some(VideoProgress::capture(
            lesson_id,
            self.watched_duration,
            self.duration,
        ));
        self.dirty = true;

        if self.flush_due() {
            self.flush_progress();
        }
    }

    fn flush_due(&self) -> bool {
        let Some(last) = self.last_flush else {
            return true;
        };

        match chrono::Duration::from_std(self.flush_interval) {
            Ok(interval) => now() - last >= interval,
            // an interval too large to represent never elapses
            Err(_) => false,
        }
    }

    fn flush_progress(&mut self) {
        if !self.dirty {
            return;
        }
        let Some(progress) = &self.video_progress else {
            return;
        };

        let key = store::progress_key(&progress.lesson_id);
        if let Err(err) = store::write_record(&mut self.store, &key, progress) {
            tracing::warn!("failed to persist progress `{key}`: {err}");
        }

        self.last_flush = Some(now());
        self.dirty = false;
    }

    fn persist_bookmarks(&mut self, lesson_id: &LessonId) {
        let key = store::bookmarks_key(lesson_id);
        if let Err(err) = store::write_record(&mut self.store, &key, &self.bookmarks) {
            tracing::warn!("failed to persist bookmarks `{key}`: {err}");
        }
    }

    fn restore<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        match store::read_record(&self.store, key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("discarding unreadable record `{key}`: {err}");
                None
            }
        }
    }
}
