//! The capability contract the controller requires from an animated
//! page-turn surface.
//!
//! The real surface is a stateful, side-effecting thing (a terminal widget
//! here, a DOM widget elsewhere). The controller only ever talks to it
//! through this trait, so its state machine is testable against a scripted
//! fake. Every call may fail synchronously; callers must tolerate that.

use crate::Result;

/// Construction parameters for a surface.
///
/// `page_width` is half the spread width: the surface shows two pages side by
/// side. `total_pages` is the full descriptor count including covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec {
    pub page_width: u32,
    pub page_height: u32,
    pub total_pages: usize,
    /// Page the fresh surface opens on. Lets a rebuild after a geometry
    /// change restore the reader's place.
    pub start_index: usize,
}

/// A live animated page-turn surface.
pub trait PageSurface {
    /// Begin an animated turn to the next page.
    fn flip_next(&mut self) -> Result<()>;

    /// Begin an animated turn to the previous page.
    fn flip_prev(&mut self) -> Result<()>;

    /// Begin a turn to an absolute page index. The index has already been
    /// clamped by the caller.
    fn turn_to(&mut self, index: usize) -> Result<()>;

    /// The surface's own notion of the current page. This is the
    /// authoritative value; callers must not cache it across flips.
    fn current_index(&self) -> Result<usize>;

    /// Completion signal: yields the settled index exactly once per finished
    /// flip. Polled from the event loop with the current monotonic time.
    fn poll_settled(&mut self, now_ms: u64) -> Option<usize>;

    /// Tear the surface down. Best-effort, idempotent, and must never fail
    /// even when the underlying resource is already gone.
    fn destroy(&mut self);
}

/// Constructs surfaces. Separated from [`PageSurface`] so the controller can
/// rebuild after a geometry change without owning platform details.
pub trait SurfaceProvider {
    /// The surface type this provider constructs.
    type Surface: PageSurface;

    /// Construct a fresh surface. May fail synchronously (for example when
    /// the mount point disappeared concurrently); the controller recovers by
    /// staying uninitialized and retrying on a later event.
    fn construct(&mut self, spec: &SurfaceSpec) -> Result<Self::Surface>;
}
