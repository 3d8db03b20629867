//! Terminal implementation of the page-turn capability contract.
//!
//! The "animation" is a timed fold sweeping across the spread; the renderer
//! samples [`TermFlipSurface::frame`] every loop iteration and the
//! controller observes completion through `poll_settled` like any other
//! surface.

#![allow(clippy::arithmetic_side_effects)]

use {
    clap::ValueEnum,
    lerp::Lerp,
    pagebound::{BookError, PageSurface, Result, SurfaceProvider, SurfaceSpec},
    std::time::Instant,
};

/// Easing curve applied to the fold sweep.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum Easing {
    /// Constant-rate sweep
    Linear,
    /// Ease-in/ease-out (smoothstep)
    Smooth,
    /// Cosine blend
    Cosine,
    /// Cubic with a sharp middle
    Cubic,
    /// Quintic hermite (Perlin smoothstep)
    Perlin,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Linear => t,
            Self::Smooth => t * t * (3.0 - 2.0 * t),
            Self::Cosine => (1.0 - f32::cos(t * std::f32::consts::PI)) / 2.0,
            Self::Cubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = 2.0 * t - 2.0;
                    1.0 + f * f * f / 2.0
                }
            }
            Self::Perlin => t * t * t * (t * (t * 6.0 - 15.0) + 10.0),
        }
    }
}

/// Page-turn timing knobs.
#[derive(Debug, Clone, Copy)]
pub struct FlipTiming {
    pub duration_ms: u64,
    pub easing: Easing,
}

impl Default for FlipTiming {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            easing: Easing::Smooth,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Flight {
    from: usize,
    to: usize,
    started_ms: u64,
}

/// Snapshot of an in-progress turn for the renderer.
#[derive(Debug, Clone, Copy)]
pub struct FlipFrame {
    pub from: usize,
    pub to: usize,
    /// Eased progress in `[0, 1]`.
    pub progress: f32,
    pub forward: bool,
}

/// The live terminal page-turn surface.
pub struct TermFlipSurface {
    spec: SurfaceSpec,
    timing: FlipTiming,
    epoch: Instant,
    index: usize,
    flight: Option<Flight>,
    destroyed: bool,
}

impl TermFlipSurface {
    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn begin(&mut self, target: usize) -> Result<()> {
        if self.destroyed {
            return Err(BookError::Surface("surface already destroyed".into()));
        }
        if self.flight.is_some() {
            return Err(BookError::Surface("flip already in progress".into()));
        }

        let target = target.min(self.spec.total_pages.saturating_sub(1));
        self.flight = Some(Flight {
            from: self.index,
            to: target,
            started_ms: self.now_ms(),
        });
        Ok(())
    }

    /// The turn in progress, if any.
    pub fn frame(&self, now_ms: u64) -> Option<FlipFrame> {
        let flight = self.flight?;
        let elapsed = now_ms.saturating_sub(flight.started_ms);
        let t = if self.timing.duration_ms == 0 {
            1.0
        } else {
            (elapsed as f32 / self.timing.duration_ms as f32).min(1.0)
        };

        Some(FlipFrame {
            from: flight.from,
            to: flight.to,
            progress: self.timing.easing.apply(t),
            forward: flight.to >= flight.from,
        })
    }

    /// Column the fold currently occupies, swept across `spread_cols`.
    pub fn sweep_column(&self, now_ms: u64, spread_cols: u16) -> Option<u16> {
        let frame = self.frame(now_ms)?;
        let (start, end) = if frame.forward {
            (spread_cols as f32, 0.0)
        } else {
            (0.0, spread_cols as f32)
        };
        Some(start.lerp(end, frame.progress).round() as u16)
    }
}

impl PageSurface for TermFlipSurface {
    fn flip_next(&mut self) -> Result<()> {
        self.begin(self.index.saturating_add(1))
    }

    fn flip_prev(&mut self) -> Result<()> {
        self.begin(self.index.saturating_sub(1))
    }

    fn turn_to(&mut self, index: usize) -> Result<()> {
        self.begin(index)
    }

    fn current_index(&self) -> Result<usize> {
        if self.destroyed {
            return Err(BookError::Surface("surface already destroyed".into()));
        }
        Ok(self.index)
    }

    fn poll_settled(&mut self, now_ms: u64) -> Option<usize> {
        let flight = self.flight?;
        if now_ms.saturating_sub(flight.started_ms) < self.timing.duration_ms {
            return None;
        }
        self.index = flight.to;
        self.flight = None;
        Some(self.index)
    }

    fn destroy(&mut self) {
        self.destroyed = true;
        self.flight = None;
    }
}

/// Builds terminal surfaces against the app's shared monotonic epoch.
pub struct TermSurfaceProvider {
    epoch: Instant,
    timing: FlipTiming,
}

impl TermSurfaceProvider {
    pub const fn new(epoch: Instant, timing: FlipTiming) -> Self {
        Self { epoch, timing }
    }
}

impl SurfaceProvider for TermSurfaceProvider {
    type Surface = TermFlipSurface;

    fn construct(&mut self, spec: &SurfaceSpec) -> Result<TermFlipSurface> {
        if spec.page_width == 0 || spec.page_height == 0 || spec.total_pages == 0 {
            return Err(BookError::Surface("degenerate surface spec".into()));
        }

        Ok(TermFlipSurface {
            spec: *spec,
            timing: self.timing,
            epoch: self.epoch,
            index: spec.start_index.min(spec.total_pages - 1),
            flight: None,
            destroyed: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use {super::*, assert2::check as assert};

    fn surface(duration_ms: u64) -> TermFlipSurface {
        let mut provider = TermSurfaceProvider::new(
            Instant::now(),
            FlipTiming {
                duration_ms,
                easing: Easing::Linear,
            },
        );
        provider
            .construct(&SurfaceSpec {
                page_width: 400,
                page_height: 500,
                total_pages: 6,
                start_index: 0,
            })
            .unwrap()
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::Smooth,
            Easing::Cosine,
            Easing::Cubic,
            Easing::Perlin,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-5);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_flip_settles_after_duration() {
        let mut s = surface(800);
        s.flip_next().unwrap();
        assert!(s.poll_settled(1).is_none());
        assert!(s.poll_settled(10_000) == Some(1));
        assert!(s.current_index().unwrap() == 1);
        // Signal fires exactly once.
        assert!(s.poll_settled(20_000).is_none());
    }

    #[test]
    fn test_concurrent_flip_is_refused() {
        let mut s = surface(800);
        s.flip_next().unwrap();
        assert!(s.flip_next().is_err());
    }

    #[test]
    fn test_turn_to_clamps_target() {
        let mut s = surface(0);
        s.turn_to(99).unwrap();
        assert!(s.poll_settled(10_000) == Some(5));
    }

    #[test]
    fn test_destroy_is_idempotent_and_blocks_calls() {
        let mut s = surface(800);
        s.destroy();
        s.destroy();
        assert!(s.flip_next().is_err());
        assert!(s.current_index().is_err());
    }

    #[test]
    fn test_provider_rejects_degenerate_spec() {
        let mut provider = TermSurfaceProvider::new(Instant::now(), FlipTiming::default());
        let result = provider.construct(&SurfaceSpec {
            page_width: 0,
            page_height: 500,
            total_pages: 6,
            start_index: 0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_sweep_spans_the_spread() {
        let mut s = surface(1_000_000);
        s.flip_next().unwrap();
        // Forward turn: fold starts at the right edge.
        let column = s.sweep_column(0, 80).unwrap();
        assert!(column >= 78);
    }
}
