use crate::signal::MediaSignal;

/// UI-local playback state of one overlay instance.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Whether the overlay believes the media is playing.
    pub playing: bool,
    /// Play head in seconds.
    pub position: f64,
    /// Media length in seconds, `0.0` until metadata arrives.
    pub duration: f64,
    /// Audio level, `0.0..=1.0`.
    pub volume: f64,
    /// Whether the control bar is shown.
    pub controls_visible: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playing: false,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            controls_visible: true,
        }
    }
}

impl PlaybackState {
    /// Mirror a signal from the media surface.
    pub fn apply(&mut self, signal: &MediaSignal) {
        match *signal {
            MediaSignal::TimeUpdated(position) => self.position = position,
            MediaSignal::MetadataLoaded { duration } => self.duration = duration,
            MediaSignal::Ended => self.playing = false,
        }
    }

    /// Whether the media length is known.
    pub fn has_duration(&self) -> bool {
        self.duration.is_finite() && self.duration > 0.0
    }

    /// Position for display, never past the known duration.
    pub fn displayed_position(&self) -> f64 {
        if self.has_duration() {
            self.position.min(self.duration)
        } else {
            self.position
        }
    }

    /// `elapsed / total`, e.g. `1:05 / 3:20`.
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_time(self.displayed_position()),
            format_time(self.duration)
        )
    }
}

/// Format seconds as `m:ss`, minutes unpadded.
///
/// Negative and non-finite input renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{minutes}:{secs:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn format_time_handles_zero() {
        assert_eq!(format_time(0.0), "0:00");
    }

    #[test]
    fn format_time_pads_seconds_only() {
        assert_eq!(format_time(65.0), "1:05");
        assert_eq!(format_time(125.7), "2:05");
    }

    #[test]
    fn format_time_floors_fractions() {
        assert_eq!(format_time(3599.9), "59:59");
        assert_eq!(format_time(59.999), "0:59");
    }

    #[test]
    fn format_time_keeps_counting_minutes_past_an_hour() {
        assert_eq!(format_time(3665.0), "61:05");
    }

    #[test]
    fn format_time_handles_invalid_input() {
        assert_eq!(format_time(-10.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn defaults() {
        let state = PlaybackState::default();
        assert!(!state.playing);
        assert_eq!(state.position, 0.0);
        assert_eq!(state.duration, 0.0);
        assert_eq!(state.volume, 1.0);
        assert!(state.controls_visible);
    }

    #[test]
    fn apply_mirrors_signals() {
        let mut state = PlaybackState::default();
        state.apply(&MediaSignal::MetadataLoaded { duration: 200.0 });
        state.apply(&MediaSignal::TimeUpdated(65.2));
        assert_eq!(state.duration, 200.0);
        assert_eq!(state.position, 65.2);
        assert_eq!(state.time_label(), "1:05 / 3:20");
    }

    #[test]
    fn ended_clears_play_flag_only() {
        let mut state = PlaybackState {
            playing: true,
            position: 12.0,
            ..Default::default()
        };
        state.apply(&MediaSignal::Ended);
        assert!(!state.playing);
        assert_eq!(state.position, 12.0);
    }

    #[test]
    fn displayed_position_never_exceeds_duration() {
        let state = PlaybackState {
            position: 31.0,
            duration: 30.0,
            ..Default::default()
        };
        assert_eq!(state.displayed_position(), 30.0);

        let unknown = PlaybackState {
            position: 31.0,
            ..Default::default()
        };
        assert_eq!(unknown.displayed_position(), 31.0);
    }
}
