//! Viewport-to-surface geometry: letterboxing against a fixed spread ratio,
//! per-device-class clamping, and the hysteresis rule that keeps continuous
//! resizes from churning the animation surface.

/// Applied render-surface size in logical units. Derived, never
/// authoritative; recomputed from the viewport on resize and on
/// visibility-regain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
}

impl Geometry {
    pub const fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Two viewport classes, split at [`LayoutConfig::breakpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Compact,
    Regular,
}

/// Fixed chrome heights reserved around the book.
#[derive(Debug, Clone, Copy)]
pub struct Chrome {
    pub nav_height: u32,
    pub search_height: u32,
    pub margin: u32,
}

impl Chrome {
    const fn vertical(self) -> u32 {
        self.nav_height
            .saturating_add(self.search_height)
            .saturating_add(self.margin)
    }
}

/// Per-device-class tuning: chrome reservations and the width band the
/// surface is clamped into.
#[derive(Debug, Clone, Copy)]
pub struct ClassProfile {
    pub chrome: Chrome,
    pub min_width: u32,
    pub max_width: u32,
}

/// Every resize/layout constant in one place.
#[derive(Debug, Clone, Copy)]
pub struct LayoutConfig {
    /// Resize events within this window are coalesced.
    pub resize_debounce_ms: u64,
    /// Deferral before constructing a surface after a geometry change.
    pub init_delay_ms: u64,
    /// A computed geometry is only applied when width or height moved by
    /// more than this many logical units.
    pub hysteresis_threshold: u32,
    /// Viewport width below which the compact profile applies.
    pub breakpoint: u32,
    /// Width:height ratio of the open two-page spread.
    pub spread_ratio: f32,
    pub compact: ClassProfile,
    pub regular: ClassProfile,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            resize_debounce_ms: 150,
            init_delay_ms: 100,
            hysteresis_threshold: 50,
            breakpoint: 768,
            spread_ratio: 1.4,
            compact: ClassProfile {
                chrome: Chrome {
                    nav_height: 56,
                    search_height: 48,
                    margin: 24,
                },
                min_width: 320,
                max_width: 900,
            },
            regular: ClassProfile {
                chrome: Chrome {
                    nav_height: 70,
                    search_height: 60,
                    margin: 40,
                },
                min_width: 500,
                max_width: 1600,
            },
        }
    }
}

impl LayoutConfig {
    pub const fn device_class(&self, viewport_width: u32) -> DeviceClass {
        if viewport_width < self.breakpoint {
            DeviceClass::Compact
        } else {
            DeviceClass::Regular
        }
    }

    const fn profile(&self, class: DeviceClass) -> &ClassProfile {
        match class {
            DeviceClass::Compact => &self.compact,
            DeviceClass::Regular => &self.regular,
        }
    }

    /// Compute the surface geometry for a viewport.
    ///
    /// Width-first letterboxing: take all available width, derive height from
    /// the spread ratio, and if that overflows the available height, cap the
    /// height and re-derive the width. The result is clamped into the
    /// profile's width band and the height re-derived once more so the ratio
    /// holds exactly. Pure and total; degenerate viewports land on the
    /// minimum band.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn compute(&self, viewport_width: u32, viewport_height: u32) -> Geometry {
        let profile = self.profile(self.device_class(viewport_width));
        let chrome = profile.chrome;

        let available_width = viewport_width.saturating_sub(chrome.margin) as f32;
        let available_height = viewport_height.saturating_sub(chrome.vertical()) as f32;

        let mut width = available_width;
        let mut height = width / self.spread_ratio;

        if height > available_height {
            height = available_height;
            width = height * self.spread_ratio;
        }

        width = width.clamp(profile.min_width as f32, profile.max_width as f32);
        height = width / self.spread_ratio;

        Geometry {
            width: width.floor() as u32,
            height: height.floor() as u32,
        }
    }

    /// Whether moving from `applied` to `next` is a significant change.
    ///
    /// Sub-threshold deltas are recorded by the caller but must not trigger a
    /// surface reinitialization.
    pub const fn exceeds_hysteresis(&self, applied: Geometry, next: Geometry) -> bool {
        applied.width.abs_diff(next.width) > self.hysteresis_threshold
            || applied.height.abs_diff(next.height) > self.hysteresis_threshold
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]
    use {super::*, assert2::check as assert};

    #[test]
    fn test_width_bound_viewport() {
        let config = LayoutConfig::default();
        // Tall viewport: width is the binding constraint.
        let geometry = config.compute(1000, 2000);
        assert!(geometry.width == 960);
        assert!(geometry.height == (960.0_f32 / 1.4).floor() as u32);
    }

    #[test]
    fn test_height_bound_viewport_letterboxes() {
        let config = LayoutConfig::default();
        // Wide viewport: height binds, width re-derived from the ratio.
        let geometry = config.compute(3000, 900);
        let available_height = 900 - 170;
        assert!(geometry.height == available_height);
        assert!(geometry.width == (available_height as f32 * 1.4).floor() as u32);
    }

    #[test]
    fn test_ratio_holds_after_clamping() {
        let config = LayoutConfig::default();
        let geometry = config.compute(5000, 5000);
        assert!(geometry.width == 1600);
        assert!(geometry.height == (1600.0_f32 / 1.4).floor() as u32);
    }

    #[test]
    fn test_degenerate_viewport_clamps_to_min_band() {
        let config = LayoutConfig::default();
        let geometry = config.compute(0, 0);
        assert!(geometry.width == config.compact.min_width);
        assert!(!geometry.is_zero());
    }

    #[test]
    fn test_breakpoint_selects_device_class() {
        let config = LayoutConfig::default();
        assert!(config.device_class(767) == DeviceClass::Compact);
        assert!(config.device_class(768) == DeviceClass::Regular);
    }

    #[test]
    fn test_compact_band_caps_narrow_viewports() {
        let config = LayoutConfig::default();
        let geometry = config.compute(700, 2000);
        assert!(geometry.width <= config.compact.max_width);
        assert!(geometry.width >= config.compact.min_width);
    }

    #[test]
    fn test_hysteresis_threshold_is_strict() {
        let config = LayoutConfig::default();
        let applied = Geometry {
            width: 1000,
            height: 714,
        };

        let nudged = Geometry {
            width: 1010,
            height: 714,
        };
        assert!(!config.exceeds_hysteresis(applied, nudged));

        let at_threshold = Geometry {
            width: 1050,
            height: 714,
        };
        assert!(!config.exceeds_hysteresis(applied, at_threshold));

        let moved = Geometry {
            width: 1060,
            height: 714,
        };
        assert!(config.exceeds_hysteresis(applied, moved));

        let taller = Geometry {
            width: 1000,
            height: 780,
        };
        assert!(config.exceeds_hysteresis(applied, taller));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let config = LayoutConfig::default();
        assert!(config.compute(1280, 800) == config.compute(1280, 800));
    }
}
