use gpui::{Pixels, px};

/// Presentation settings for [`crate::VideoOverlay`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    /// Width of the dialog.
    pub dialog_width: Pixels,
    /// Maximum media height as a fraction of the viewport height.
    pub max_height_fraction: f32,
    /// Granularity of the position slider, in seconds.
    pub seek_step: f64,
    /// Granularity of the volume slider.
    pub volume_step: f64,
    /// Width of the volume slider.
    pub volume_width: Pixels,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            dialog_width: px(1140.),
            max_height_fraction: 0.7,
            seek_step: 1.0,
            volume_step: 0.1,
            volume_width: px(80.),
        }
    }
}

impl OverlayConfig {
    pub fn dialog_width(mut self, width: Pixels) -> Self {
        self.dialog_width = width;
        self
    }

    /// Clamped to `0.1..=1.0`.
    pub fn max_height_fraction(mut self, fraction: f32) -> Self {
        self.max_height_fraction = fraction.clamp(0.1, 1.0);
        self
    }

    /// Ignored unless positive.
    pub fn seek_step(mut self, step: f64) -> Self {
        if step > 0.0 {
            self.seek_step = step;
        }
        self
    }

    /// Ignored unless positive.
    pub fn volume_step(mut self, step: f64) -> Self {
        if step > 0.0 {
            self.volume_step = step;
        }
        self
    }

    pub fn volume_width(mut self, width: Pixels) -> Self {
        self.volume_width = width;
        self
    }

    /// Volume level for a raw slider value: snapped to [`Self::volume_step`] in `f64` and
    /// clamped to `0.0..=1.0`, so `0.3` stays `0.3` rather than its `f32` neighbour.
    pub fn volume_level(&self, raw: f32) -> f64 {
        let steps = (f64::from(raw) / self.volume_step).round();
        let level = (steps * self.volume_step).clamp(0.0, 1.0);
        (level * 1e9).round() / 1e9
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_extra_large_dialog() {
        let config = OverlayConfig::default();
        assert_eq!(config.dialog_width, px(1140.));
        assert_eq!(config.max_height_fraction, 0.7);
        assert_eq!(config.volume_step, 0.1);
        assert_eq!(config.seek_step, 1.0);
    }

    #[test]
    fn builder_rejects_nonsense() {
        let config = OverlayConfig::default()
            .max_height_fraction(3.0)
            .seek_step(0.0)
            .volume_step(-1.0);
        assert_eq!(config.max_height_fraction, 1.0);
        assert_eq!(config.seek_step, 1.0);
        assert_eq!(config.volume_step, 0.1);
    }

    #[test]
    fn volume_level_snaps_to_tenths() {
        let config = OverlayConfig::default();
        assert_eq!(config.volume_level(0.3), 0.3);
        assert_eq!(config.volume_level(0.7), 0.7);
        assert_eq!(config.volume_level(0.34), 0.3);
        assert_eq!(config.volume_level(0.96), 1.0);
    }

    #[test]
    fn volume_level_stays_in_range() {
        let config = OverlayConfig::default();
        assert_eq!(config.volume_level(-0.2), 0.0);
        assert_eq!(config.volume_level(1.4), 1.0);

        let quarters = OverlayConfig::default().volume_step(0.25);
        assert_eq!(quarters.volume_level(0.3), 0.25);
    }
}
