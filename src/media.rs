//! Playback state for the music player, commander messages and the background
//! video. Nothing here decodes media: positions advance on [`tick`] calls from
//! the UI loop, and track ends are detected against known durations.
//!
//! [`tick`]: MusicPlayer::tick

use rand::Rng;
use std::collections::BTreeMap;
use std::time::Duration;

/// `m:ss`
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

// ── Music player ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    #[default]
    Sequential,
    Repeat,
    Shuffle,
}

impl PlaybackMode {
    pub fn next(self) -> Self {
        match self {
            PlaybackMode::Sequential => PlaybackMode::Repeat,
            PlaybackMode::Repeat => PlaybackMode::Shuffle,
            PlaybackMode::Shuffle => PlaybackMode::Sequential,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackMode::Sequential => "Séquentiel",
            PlaybackMode::Repeat => "Répéter",
            PlaybackMode::Shuffle => "Aléatoire",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MusicPlayer {
    len: usize,
    current: usize,
    playing: bool,
    mode: PlaybackMode,
    position: f64,
    volume: u8,
}

impl MusicPlayer {
    pub fn new(volume: u8) -> Self {
        Self {
            len: 0,
            current: 0,
            playing: false,
            mode: PlaybackMode::default(),
            position: 0.0,
            volume: volume.min(100),
        }
    }

    pub fn set_playlist_len(&mut self, len: usize) {
        self.len = len;
        if self.current >= len {
            self.current = 0;
            self.position = 0.0;
        }
        if len == 0 {
            self.playing = false;
        }
    }

    pub fn current(&self) -> Option<usize> {
        (self.len > 0).then_some(self.current)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else if self.len > 0 {
            self.playing = true;
        }
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn stop(&mut self) {
        self.pause();
        self.position = 0.0;
    }

    /// Jumps to `index`, keeping the play/pause state.
    pub fn select(&mut self, index: usize) {
        if index < self.len {
            self.current = index;
            self.position = 0.0;
        }
    }

    /// Moves by `direction` (+1 / -1). Shuffle only applies going forward.
    pub fn change_track<R: Rng + ?Sized>(&mut self, direction: i32, rng: &mut R) {
        if self.len == 0 {
            return;
        }
        if self.mode == PlaybackMode::Shuffle && direction > 0 {
            if self.len > 1 {
                let pick = rng.gen_range(0..self.len - 1);
                self.current = if pick >= self.current { pick + 1 } else { pick };
            }
        } else {
            let len = self.len as i64;
            self.current = (self.current as i64 + i64::from(direction)).rem_euclid(len) as usize;
        }
        self.position = 0.0;
    }

    /// Advances playback. Returns true when the current track ended during
    /// this tick.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        elapsed: Duration,
        track_duration: Option<f64>,
        rng: &mut R,
    ) -> bool {
        if !self.playing {
            return false;
        }
        self.position += elapsed.as_secs_f64();
        match track_duration {
            Some(total) if total > 0.0 && self.position >= total => {
                if self.mode == PlaybackMode::Repeat {
                    self.position = 0.0;
                } else {
                    self.change_track(1, rng);
                }
                true
            }
            _ => false,
        }
    }
}

// ── Commander messages ────────────────────────────────────────────────────────

/// One player per commander message; at most one plays at a time.
#[derive(Debug, Clone, Default)]
pub struct CommanderAudio {
    playing: Option<usize>,
    positions: BTreeMap<usize, f64>,
}

impl CommanderAudio {
    /// Plays `index`, pausing any other message, or pauses it if playing.
    pub fn toggle(&mut self, index: usize) {
        self.playing = if self.playing == Some(index) { None } else { Some(index) };
    }

    pub fn stop(&mut self, index: usize) {
        if self.playing == Some(index) {
            self.playing = None;
        }
        self.positions.remove(&index);
    }

    pub fn stop_all(&mut self) {
        self.playing = None;
        self.positions.clear();
    }

    pub fn is_playing(&self, index: usize) -> bool {
        self.playing == Some(index)
    }

    pub fn position(&self, index: usize) -> f64 {
        self.positions.get(&index).copied().unwrap_or(0.0)
    }

    pub fn tick(&mut self, elapsed: Duration, duration_of: impl Fn(usize) -> Option<f64>) {
        let Some(index) = self.playing else {
            return;
        };
        let position = self.positions.entry(index).or_insert(0.0);
        *position += elapsed.as_secs_f64();
        if let Some(total) = duration_of(index) {
            if *position >= total {
                *position = 0.0;
                self.playing = None;
            }
        }
    }
}

// ── Background video ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct BackgroundVideo {
    source: Option<String>,
    playing: bool,
    position: f64,
}

impl BackgroundVideo {
    /// Switches to `source` and starts playing it.
    pub fn load(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
        self.position = 0.0;
        self.playing = true;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn toggle(&mut self) {
        if self.source.is_some() {
            self.playing = !self.playing;
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.position = 0.0;
    }

    pub fn tick(&mut self, elapsed: Duration) {
        if self.playing {
            self.position += elapsed.as_secs_f64();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player(len: usize) -> MusicPlayer {
        let mut p = MusicPlayer::new(70);
        p.set_playlist_len(len);
        p
    }

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(65.9), "1:05");
        assert_eq!(format_time(600.0), "10:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn sequential_wraps_both_ways() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut p = player(3);
        p.change_track(-1, &mut rng);
        assert_eq!(p.current(), Some(2));
        p.change_track(1, &mut rng);
        assert_eq!(p.current(), Some(0));
    }

    #[test]
    fn shuffle_never_repeats_current_track() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut p = player(4);
        p.set_mode(PlaybackMode::Shuffle);
        for _ in 0..50 {
            let before = p.current();
            p.change_track(1, &mut rng);
            assert_ne!(p.current(), before);
            assert!(p.current().unwrap() < 4);
        }
    }

    #[test]
    fn shuffle_backwards_is_sequential() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = player(4);
        p.set_mode(PlaybackMode::Shuffle);
        p.select(2);
        p.change_track(-1, &mut rng);
        assert_eq!(p.current(), Some(1));
    }

    #[test]
    fn single_track_shuffle_stays_put() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = player(1);
        p.set_mode(PlaybackMode::Shuffle);
        p.change_track(1, &mut rng);
        assert_eq!(p.current(), Some(0));
    }

    #[test]
    fn track_end_advances_and_keeps_playing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = player(3);
        p.toggle();
        assert!(p.tick(Duration::from_secs(4), Some(3.0), &mut rng));
        assert_eq!(p.current(), Some(1));
        assert!(p.is_playing());
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn repeat_rewinds_same_track() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = player(3);
        p.set_mode(PlaybackMode::Repeat);
        p.toggle();
        assert!(p.tick(Duration::from_secs(4), Some(3.0), &mut rng));
        assert_eq!(p.current(), Some(0));
        assert!(p.is_playing());
    }

    #[test]
    fn paused_player_does_not_advance() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = player(2);
        assert!(!p.tick(Duration::from_secs(10), Some(1.0), &mut rng));
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn empty_playlist_cannot_play() {
        let mut p = player(0);
        p.toggle();
        assert!(!p.is_playing());
        assert_eq!(p.current(), None);
    }

    #[test]
    fn stop_rewinds() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = player(2);
        p.toggle();
        p.tick(Duration::from_secs(1), None, &mut rng);
        p.stop();
        assert!(!p.is_playing());
        assert_eq!(p.position(), 0.0);
    }

    #[test]
    fn toggle_pauses_without_rewinding() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = player(2);
        p.toggle();
        p.tick(Duration::from_secs(1), None, &mut rng);
        p.toggle();
        assert!(!p.is_playing());
        assert_eq!(p.position(), 1.0);
        p.toggle();
        assert!(p.is_playing());
    }

    #[test]
    fn commander_plays_one_message_at_a_time() {
        let mut audio = CommanderAudio::default();
        audio.toggle(0);
        audio.toggle(1);
        assert!(!audio.is_playing(0));
        assert!(audio.is_playing(1));
        audio.toggle(1);
        assert!(!audio.is_playing(1));
    }

    #[test]
    fn commander_message_finishes() {
        let mut audio = CommanderAudio::default();
        audio.toggle(0);
        audio.tick(Duration::from_secs(2), |_| Some(5.0));
        assert_eq!(audio.position(0), 2.0);
        audio.tick(Duration::from_secs(4), |_| Some(5.0));
        assert!(!audio.is_playing(0));
        assert_eq!(audio.position(0), 0.0);
    }

    #[test]
    fn video_load_autoplays_and_stop_rewinds() {
        let mut video = BackgroundVideo::default();
        video.toggle();
        assert!(!video.is_playing());
        video.load("video/ocean.mp4");
        assert!(video.is_playing());
        video.tick(Duration::from_secs(3));
        video.stop();
        assert_eq!(video.position(), 0.0);
        assert_eq!(video.source(), Some("video/ocean.mp4"));
    }
}
