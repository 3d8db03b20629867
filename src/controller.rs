//! Lifecycle and navigation state machine for the animated page-turn
//! surface.
//!
//! The controller owns the single surface instance and the single
//! [`NavigationIndex`] for their whole lifetime. It is single-threaded and
//! event-driven: the host loop feeds it viewport events and a monotonic
//! `now_ms` clock, and calls [`RenderSurfaceController::tick`] once per
//! iteration to fire due timers and drain the surface's completion signal.
//!
//! States: `Uninitialized -> Initializing -> Ready <-> Flipping`, with
//! `Destroyed` reachable from anywhere on unmount. A geometry change past the
//! hysteresis threshold tears the surface down fully before a fresh
//! `Initializing`; sub-threshold changes are recorded but not applied.

use {
    crate::{
        layout::{Geometry, LayoutConfig},
        surface::{PageSurface, SurfaceProvider, SurfaceSpec},
    },
    log::{debug, warn},
};

/// Where the surface is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    Uninitialized,
    Initializing,
    Ready,
    Flipping,
    Destroyed,
}

/// The single authoritative "current page" exposed to the presentation
/// layer.
///
/// Updated only from the surface's settled-flip signal or from the surface's
/// own reported index after construction -- never speculatively from a
/// navigation request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationIndex {
    current: usize,
}

impl NavigationIndex {
    pub const fn current(self) -> usize {
        self.current
    }

    fn settle(&mut self, index: usize) {
        self.current = index;
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingResize {
    due_ms: u64,
    geometry: Geometry,
}

/// Owns the page-turn surface and drives it through its state machine.
pub struct RenderSurfaceController<P: SurfaceProvider> {
    provider: P,
    config: LayoutConfig,
    total_pages: usize,
    surface: Option<P::Surface>,
    state: SurfaceState,
    nav: NavigationIndex,
    /// Geometry the live (or scheduled) surface was built for.
    applied: Option<Geometry>,
    /// Most recently computed geometry, possibly sub-threshold.
    computed: Option<Geometry>,
    pending_init_ms: Option<u64>,
    pending_resize: Option<PendingResize>,
}

impl<P: SurfaceProvider> RenderSurfaceController<P> {
    pub fn new(provider: P, config: LayoutConfig, total_pages: usize) -> Self {
        Self {
            provider,
            config,
            total_pages,
            surface: None,
            state: SurfaceState::Uninitialized,
            nav: NavigationIndex::default(),
            applied: None,
            computed: None,
            pending_init_ms: None,
            pending_resize: None,
        }
    }

    pub const fn state(&self) -> SurfaceState {
        self.state
    }

    pub const fn navigation(&self) -> NavigationIndex {
        self.nav
    }

    /// Authoritative current page index for the presentation layer.
    pub const fn current_index(&self) -> usize {
        self.nav.current()
    }

    pub const fn is_transitioning(&self) -> bool {
        matches!(self.state, SurfaceState::Flipping)
    }

    pub const fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Geometry the surface was last built for, if any.
    pub const fn geometry(&self) -> Option<Geometry> {
        self.applied
    }

    pub const fn surface(&self) -> Option<&P::Surface> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut P::Surface> {
        self.surface.as_mut()
    }

    /// Debounced viewport change. Only the last geometry computed within the
    /// debounce window is applied, on a later [`tick`](Self::tick).
    pub fn handle_resize(&mut self, viewport_width: u32, viewport_height: u32, now_ms: u64) {
        if self.state == SurfaceState::Destroyed {
            return;
        }

        let geometry = self.config.compute(viewport_width, viewport_height);
        self.pending_resize = Some(PendingResize {
            due_ms: now_ms.saturating_add(self.config.resize_debounce_ms),
            geometry,
        });
    }

    /// Immediate viewport refresh: first mount and visibility-regain events.
    /// Also the retry path after a failed construction.
    pub fn refresh(&mut self, viewport_width: u32, viewport_height: u32, now_ms: u64) {
        if self.state == SurfaceState::Destroyed {
            return;
        }

        let geometry = self.config.compute(viewport_width, viewport_height);
        self.pending_resize = None;
        self.apply_geometry(geometry, now_ms);
    }

    /// Fire due timers and drain the surface's completion signal. Call once
    /// per event-loop iteration.
    pub fn tick(&mut self, now_ms: u64) {
        if self.state == SurfaceState::Destroyed {
            return;
        }

        if let Some(pending) = self.pending_resize
            && now_ms >= pending.due_ms
        {
            self.pending_resize = None;
            self.apply_geometry(pending.geometry, now_ms);
        }

        if let Some(due_ms) = self.pending_init_ms
            && now_ms >= due_ms
            && self.state == SurfaceState::Initializing
        {
            self.pending_init_ms = None;
            self.construct_surface();
        }

        if self.state == SurfaceState::Flipping
            && let Some(surface) = self.surface.as_mut()
            && let Some(settled) = surface.poll_settled(now_ms)
        {
            debug!("flip settled at index {settled}");
            self.nav.settle(settled);
            self.state = SurfaceState::Ready;
        }
    }

    /// Tear everything down. Idempotent; the controller is inert afterwards.
    pub fn unmount(&mut self) {
        self.pending_init_ms = None;
        self.pending_resize = None;
        self.teardown_surface();
        self.state = SurfaceState::Destroyed;
    }

    /// Begin an animated turn to the next page. No-op at the last page or
    /// while a flip is in flight.
    pub fn next(&mut self) {
        let total = self.total_pages;
        self.navigate(|surface, current| {
            if current.saturating_add(1) >= total {
                return None;
            }
            Some(surface.flip_next())
        });
    }

    /// Begin an animated turn to the previous page. No-op at the first page
    /// or while a flip is in flight.
    pub fn previous(&mut self) {
        self.navigate(|surface, current| {
            if current == 0 {
                return None;
            }
            Some(surface.flip_prev())
        });
    }

    /// Turn to an absolute index, clamped into `[0, total_pages - 1]`.
    pub fn jump_to(&mut self, index: i64) {
        let last = self.total_pages.saturating_sub(1);
        let target = index.clamp(0, last as i64) as usize;
        self.navigate(|surface, current| {
            if target == current {
                return None;
            }
            Some(surface.turn_to(target))
        });
    }

    pub fn jump_first(&mut self) {
        self.jump_to(0);
    }

    pub fn jump_last(&mut self) {
        self.jump_to(self.total_pages.saturating_sub(1) as i64);
    }

    /// Admission control and failure policy shared by all navigation
    /// primitives.
    ///
    /// Requests are dropped (not queued) unless the surface is `Ready`; the
    /// boundary check runs against the surface's own reported index, not a
    /// cached copy. A surface call that fails leaves the controller `Ready`
    /// -- the next user-initiated navigation is the retry.
    fn navigate<F>(&mut self, dispatch: F)
    where
        F: FnOnce(&mut P::Surface, usize) -> Option<crate::Result<()>>,
    {
        if self.state != SurfaceState::Ready {
            debug!("navigation dropped in state {:?}", self.state);
            return;
        }

        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        let current = match surface.current_index() {
            Ok(index) => index,
            Err(err) => {
                warn!("surface index query failed: {err}");
                return;
            }
        };

        match dispatch(surface, current) {
            Some(Ok(())) => self.state = SurfaceState::Flipping,
            Some(Err(err)) => warn!("navigation dispatch failed: {err}"),
            None => {}
        }
    }

    /// Apply a computed geometry: reinitialize when the change is
    /// significant (or no surface is live), otherwise just record it.
    fn apply_geometry(&mut self, geometry: Geometry, now_ms: u64) {
        self.computed = Some(geometry);

        if geometry.is_zero() {
            return;
        }

        let significant = match self.applied {
            Some(applied) if self.surface.is_some() => {
                self.config.exceeds_hysteresis(applied, geometry)
            }
            // No live surface: any known geometry warrants (re)construction,
            // including the retry after a failed one.
            _ => true,
        };

        if !significant {
            return;
        }

        debug!(
            "geometry {}x{} applied, scheduling surface init",
            geometry.width, geometry.height
        );
        self.teardown_surface();
        self.applied = Some(geometry);
        self.state = SurfaceState::Initializing;
        // Re-scheduling on every change cancels any not-yet-fired init.
        self.pending_init_ms = Some(now_ms.saturating_add(self.config.init_delay_ms));
    }

    /// Construct the surface for the applied geometry. On failure the
    /// controller stays `Uninitialized`; a later geometry or visibility
    /// event retries.
    fn construct_surface(&mut self) {
        debug_assert!(self.surface.is_none());

        let Some(geometry) = self.applied else {
            self.state = SurfaceState::Uninitialized;
            return;
        };

        let spec = SurfaceSpec {
            page_width: geometry.width / 2,
            page_height: geometry.height,
            total_pages: self.total_pages,
            start_index: self.nav.current(),
        };

        match self.provider.construct(&spec) {
            Ok(surface) => {
                // The surface's own index is authoritative from here on.
                if let Ok(index) = surface.current_index() {
                    self.nav.settle(index);
                }
                self.surface = Some(surface);
                self.state = SurfaceState::Ready;
                debug!("surface ready at index {}", self.nav.current());
            }
            Err(err) => {
                warn!("surface construction failed: {err}");
                self.surface = None;
                self.applied = None;
                self.state = SurfaceState::Uninitialized;
            }
        }
    }

    /// Destruction is best-effort and idempotent; a surface that is already
    /// gone is not an error.
    fn teardown_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]
    use {
        super::*,
        crate::{BookError, Result},
        assert2::check as assert,
        std::{cell::Cell, cell::RefCell, rc::Rc},
    };

    const TOTAL_PAGES: usize = 6;
    const INIT: u64 = 100;
    const DEBOUNCE: u64 = 150;

    #[derive(Default)]
    struct Shared {
        constructed: Cell<usize>,
        destroyed: Cell<usize>,
        fail_construct: Cell<bool>,
        fail_flips: Cell<bool>,
        dispatched: RefCell<Vec<usize>>,
        last_spec: Cell<Option<SurfaceSpec>>,
    }

    struct FakeSurface {
        shared: Rc<Shared>,
        index: usize,
        pending: Option<usize>,
        alive: bool,
    }

    impl PageSurface for FakeSurface {
        fn flip_next(&mut self) -> Result<()> {
            self.dispatch(self.index + 1)
        }

        fn flip_prev(&mut self) -> Result<()> {
            self.dispatch(self.index.saturating_sub(1))
        }

        fn turn_to(&mut self, index: usize) -> Result<()> {
            self.dispatch(index)
        }

        fn current_index(&self) -> Result<usize> {
            if !self.alive {
                return Err(BookError::Surface("surface destroyed".into()));
            }
            Ok(self.index)
        }

        fn poll_settled(&mut self, _now_ms: u64) -> Option<usize> {
            let settled = self.pending.take()?;
            self.index = settled;
            Some(settled)
        }

        fn destroy(&mut self) {
            if self.alive {
                self.alive = false;
                self.shared.destroyed.set(self.shared.destroyed.get() + 1);
            }
        }
    }

    impl FakeSurface {
        fn dispatch(&mut self, target: usize) -> Result<()> {
            if self.shared.fail_flips.get() {
                return Err(BookError::Surface("flip refused".into()));
            }
            self.shared.dispatched.borrow_mut().push(target);
            self.pending = Some(target);
            Ok(())
        }
    }

    struct FakeProvider {
        shared: Rc<Shared>,
    }

    impl SurfaceProvider for FakeProvider {
        type Surface = FakeSurface;

        fn construct(&mut self, spec: &SurfaceSpec) -> Result<FakeSurface> {
            if self.shared.fail_construct.take() {
                return Err(BookError::Surface("mount point gone".into()));
            }
            self.shared.constructed.set(self.shared.constructed.get() + 1);
            self.shared.last_spec.set(Some(*spec));
            Ok(FakeSurface {
                shared: Rc::clone(&self.shared),
                index: spec.start_index,
                pending: None,
                alive: true,
            })
        }
    }

    fn controller() -> (RenderSurfaceController<FakeProvider>, Rc<Shared>) {
        let shared = Rc::new(Shared::default());
        let provider = FakeProvider {
            shared: Rc::clone(&shared),
        };
        let controller =
            RenderSurfaceController::new(provider, LayoutConfig::default(), TOTAL_PAGES);
        (controller, shared)
    }

    /// Mount at 1200x900 and run the deferred init to completion.
    fn ready_controller() -> (RenderSurfaceController<FakeProvider>, Rc<Shared>) {
        let (mut c, shared) = controller();
        c.refresh(1200, 900, 0);
        assert!(c.state() == SurfaceState::Initializing);
        c.tick(INIT);
        assert!(c.state() == SurfaceState::Ready);
        (c, shared)
    }

    fn dispatched(shared: &Shared) -> Vec<usize> {
        shared.dispatched.borrow().clone()
    }

    #[test]
    fn test_init_is_deferred_not_immediate() {
        let (mut c, shared) = controller();
        c.refresh(1200, 900, 0);
        assert!(shared.constructed.get() == 0);
        c.tick(INIT - 1);
        assert!(shared.constructed.get() == 0);
        c.tick(INIT);
        assert!(shared.constructed.get() == 1);
        assert!(c.state() == SurfaceState::Ready);
    }

    #[test]
    fn test_spec_uses_half_width_pages() {
        let (c, shared) = ready_controller();
        let spec = shared.last_spec.get().unwrap();
        let geometry = c.geometry().unwrap();
        assert!(spec.page_width == geometry.width / 2);
        assert!(spec.page_height == geometry.height);
        assert!(spec.total_pages == TOTAL_PAGES);
    }

    #[test]
    fn test_admission_control_drops_second_request() {
        let (mut c, shared) = ready_controller();

        c.next();
        c.next();

        assert!(dispatched(&shared) == vec![1]);
        assert!(c.state() == SurfaceState::Flipping);
        assert!(c.current_index() == 0, "never updated optimistically");

        c.tick(INIT + 50);
        assert!(c.state() == SurfaceState::Ready);
        assert!(c.current_index() == 1);
    }

    #[test]
    fn test_jump_clamps_both_ends() {
        let (mut c, shared) = ready_controller();

        c.jump_to(3);
        c.tick(INIT + 10);
        assert!(c.current_index() == 3);

        c.jump_to(-5);
        c.tick(INIT + 20);
        assert!(c.current_index() == 0);

        c.jump_to(TOTAL_PAGES as i64 + 5);
        c.tick(INIT + 30);
        assert!(c.current_index() == TOTAL_PAGES - 1);

        assert!(dispatched(&shared) == vec![3, 0, TOTAL_PAGES - 1]);
    }

    #[test]
    fn test_boundary_no_ops() {
        let (mut c, shared) = ready_controller();

        c.previous();
        assert!(dispatched(&shared).is_empty());
        assert!(c.state() == SurfaceState::Ready);

        c.jump_last();
        c.tick(INIT + 10);
        c.next();
        assert!(dispatched(&shared) == vec![TOTAL_PAGES - 1]);
        assert!(c.state() == SurfaceState::Ready);
    }

    #[test]
    fn test_jump_to_current_page_is_a_no_op() {
        let (mut c, shared) = ready_controller();
        c.jump_to(0);
        assert!(dispatched(&shared).is_empty());
        assert!(c.state() == SurfaceState::Ready);
    }

    #[test]
    fn test_sub_threshold_resize_keeps_surface() {
        let (mut c, shared) = ready_controller();
        // 1200x907 differs from 1200x900 by well under the 50-unit
        // threshold once computed.
        c.refresh(1200, 907, 200);
        c.tick(200 + INIT);
        assert!(shared.constructed.get() == 1);
        assert!(shared.destroyed.get() == 0);
        assert!(c.state() == SurfaceState::Ready);
    }

    #[test]
    fn test_super_threshold_resize_rebuilds_surface() {
        let (mut c, shared) = ready_controller();
        c.refresh(1200, 990, 200);
        assert!(shared.destroyed.get() == 1, "torn down before rebuild");
        assert!(c.state() == SurfaceState::Initializing);
        c.tick(200 + INIT);
        assert!(shared.constructed.get() == 2);
        assert!(c.state() == SurfaceState::Ready);
    }

    #[test]
    fn test_rebuild_restores_current_page() {
        let (mut c, shared) = ready_controller();
        c.jump_to(4);
        c.tick(INIT + 10);
        assert!(c.current_index() == 4);

        c.refresh(1200, 990, 200);
        c.tick(200 + INIT);
        assert!(shared.last_spec.get().unwrap().start_index == 4);
        assert!(c.current_index() == 4);
    }

    #[test]
    fn test_resize_debounce_coalesces_to_last_geometry() {
        let (mut c, shared) = ready_controller();

        // A huge intermediate geometry followed by one matching the applied
        // geometry within the window: nothing should rebuild.
        c.handle_resize(3000, 2000, 1000);
        c.handle_resize(1200, 900, 1040);

        c.tick(1000 + DEBOUNCE);
        assert!(shared.constructed.get() == 1, "intermediate never applied");
        c.tick(1040 + DEBOUNCE + INIT);
        assert!(shared.constructed.get() == 1);
        assert!(c.state() == SurfaceState::Ready);
    }

    #[test]
    fn test_pending_init_is_rescheduled_by_new_geometry() {
        let (mut c, shared) = controller();
        c.refresh(1200, 900, 0);
        // Geometry changes again before the deferred init fires.
        c.refresh(3000, 2000, 50);
        c.tick(INIT);
        assert!(shared.constructed.get() == 0, "first init was cancelled");
        c.tick(50 + INIT);
        assert!(shared.constructed.get() == 1);
        let spec = shared.last_spec.get().unwrap();
        assert!(spec.page_width == 1600 / 2);
    }

    #[test]
    fn test_construction_failure_recovers_on_next_event() {
        let (mut c, shared) = controller();
        shared.fail_construct.set(true);
        c.refresh(1200, 900, 0);
        c.tick(INIT);
        assert!(c.state() == SurfaceState::Uninitialized);
        assert!(shared.constructed.get() == 0);

        // The next visibility/geometry event retries.
        c.refresh(1200, 900, 500);
        c.tick(500 + INIT);
        assert!(c.state() == SurfaceState::Ready);
        assert!(shared.constructed.get() == 1);
    }

    #[test]
    fn test_failed_dispatch_leaves_controller_ready() {
        let (mut c, shared) = ready_controller();
        shared.fail_flips.set(true);
        c.next();
        assert!(c.state() == SurfaceState::Ready);
        assert!(dispatched(&shared).is_empty());

        // The next user-initiated navigation is the retry.
        shared.fail_flips.set(false);
        c.next();
        assert!(c.state() == SurfaceState::Flipping);
    }

    #[test]
    fn test_resize_during_flip_tears_down_cleanly() {
        let (mut c, shared) = ready_controller();
        c.next();
        assert!(c.state() == SurfaceState::Flipping);

        c.refresh(1200, 990, 200);
        assert!(shared.destroyed.get() == 1);
        c.tick(200 + INIT);
        assert!(c.state() == SurfaceState::Ready);
        // The flip never settled, so the index never moved.
        assert!(c.current_index() == 0);
    }

    #[test]
    fn test_unmount_is_idempotent_and_inert() {
        let (mut c, shared) = ready_controller();
        c.unmount();
        c.unmount();
        assert!(c.state() == SurfaceState::Destroyed);
        assert!(shared.destroyed.get() == 1);

        c.next();
        c.handle_resize(1200, 900, 500);
        c.tick(1000);
        assert!(dispatched(&shared).is_empty());
        assert!(shared.constructed.get() == 1);
        assert!(c.state() == SurfaceState::Destroyed);
    }

    #[test]
    fn test_unmount_cancels_pending_init() {
        let (mut c, shared) = controller();
        c.refresh(1200, 900, 0);
        c.unmount();
        c.tick(INIT);
        assert!(shared.constructed.get() == 0);
    }
}
