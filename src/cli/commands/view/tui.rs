//! Interactive book viewer: event loop, keyboard handling, and overlays.

#![allow(clippy::arithmetic_side_effects)]
use {
    super::{
        draw,
        surface::{FlipTiming, TermSurfaceProvider},
    },
    crossterm::{
        cursor,
        event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
        execute,
        terminal::{self},
    },
    pagebound::{
        Book, Catalog, LayoutConfig, RenderSurfaceController, Result, SearchResolver, SurfaceState,
    },
    ratatui::{
        Frame, Terminal,
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout, Rect},
    },
    std::{
        io, panic,
        time::{Duration, Instant},
    },
};

/// Assumed pixel footprint of one terminal cell, used to map the cell grid
/// onto the pixel-space layout model.
const CELL_WIDTH_PX: u32 = 12;
const CELL_HEIGHT_PX: u32 = 24;

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

enum AppMode {
    Normal,
    Search { input: String, selected: usize },
    Help,
}

/// One row of the search popup, resolved to its destination page up front.
pub struct SearchRow {
    pub name: String,
    pub group: String,
    pub page_index: usize,
}

pub struct TuiApp {
    catalog: Catalog,
    book: Book,
    controller: RenderSurfaceController<TermSurfaceProvider>,
    epoch: Instant,
    mode: AppMode,
    search_results: Vec<SearchRow>,
}

impl TuiApp {
    pub fn new(catalog: Catalog, book: Book, timing: FlipTiming) -> Self {
        let epoch = Instant::now();
        let provider = TermSurfaceProvider::new(epoch, timing);
        let controller =
            RenderSurfaceController::new(provider, LayoutConfig::default(), book.total_pages());

        Self {
            catalog,
            book,
            controller,
            epoch,
            mode: AppMode::Normal,
            search_results: Vec::new(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    pub fn run(&mut self) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
            let _ = terminal::disable_raw_mode();
            original_hook(info);
        }));

        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        let _guard = TerminalGuard;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let size = terminal.size()?;
        self.controller.refresh(
            u32::from(size.width) * CELL_WIDTH_PX,
            u32::from(size.height) * CELL_HEIGHT_PX,
            self.now_ms(),
        );

        let result = self.main_loop(&mut terminal);

        self.controller.unmount();

        drop(_guard);
        let _ = panic::take_hook();

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.controller.tick(self.now_ms());

            terminal.draw(|f| self.render_ui(f))?;

            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if !self.handle_key(key) {
                            break;
                        }
                    }
                    Event::Resize(cols, rows) => {
                        self.controller.handle_resize(
                            u32::from(cols) * CELL_WIDTH_PX,
                            u32::from(rows) * CELL_HEIGHT_PX,
                            self.now_ms(),
                        );
                    }
                    Event::FocusGained => {
                        let size = terminal.size()?;
                        self.controller.refresh(
                            u32::from(size.width) * CELL_WIDTH_PX,
                            u32::from(size.height) * CELL_HEIGHT_PX,
                            self.now_ms(),
                        );
                    }
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Returns `false` when the app should exit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return false;
        }

        match &mut self.mode {
            AppMode::Search { .. } => self.handle_search_key(key),
            AppMode::Help => {
                self.mode = AppMode::Normal;
                true
            }
            AppMode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Right | KeyCode::Char('l') => self.controller.next(),
            KeyCode::Left | KeyCode::Char('h') => self.controller.previous(),
            KeyCode::Home | KeyCode::Char('g') => self.controller.jump_first(),
            KeyCode::End | KeyCode::Char('G') => self.controller.jump_last(),
            // The table of contents always sits right after the cover.
            KeyCode::Char('t') => self.controller.jump_to(1),
            KeyCode::Char('/') => {
                self.search_results.clear();
                self.mode = AppMode::Search {
                    input: String::new(),
                    selected: 0,
                };
            }
            KeyCode::Char('?') => self.mode = AppMode::Help,
            KeyCode::Char(c @ '1'..='9') => self.jump_to_chapter(c as usize - '1' as usize),
            _ => {}
        }
        true
    }

    /// Jump to the nth non-empty group, matching the slot numbers printed on
    /// the table of contents.
    fn jump_to_chapter(&mut self, slot: usize) {
        let resolver = SearchResolver::new(&self.book);
        let target = self
            .catalog
            .groups
            .iter()
            .filter(|g| !g.entries.is_empty())
            .nth(slot)
            .and_then(|g| resolver.resolve_group(&g.name));
        if let Some(index) = target {
            self.controller.jump_to(index as i64);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> bool {
        let AppMode::Search { input, selected } = &mut self.mode else {
            return true;
        };

        match key.code {
            KeyCode::Esc => self.mode = AppMode::Normal,
            KeyCode::Enter => {
                let target = self.search_results.get(*selected).map(|row| row.page_index);
                self.mode = AppMode::Normal;
                if let Some(index) = target {
                    self.controller.jump_to(index as i64);
                }
            }
            KeyCode::Up => *selected = selected.saturating_sub(1),
            KeyCode::Down => {
                if selected.saturating_add(1) < self.search_results.len() {
                    *selected += 1;
                }
            }
            KeyCode::Backspace => {
                input.pop();
                self.refresh_search();
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.refresh_search();
            }
            _ => {}
        }
        true
    }

    fn refresh_search(&mut self) {
        let AppMode::Search { input, selected } = &mut self.mode else {
            return;
        };

        // Single characters match half the book; wait for two.
        if input.trim().len() < 2 {
            self.search_results.clear();
            return;
        }

        let resolver = SearchResolver::new(&self.book);
        let results: Vec<SearchRow> = self
            .catalog
            .search_entries(input)
            .into_iter()
            .filter_map(|hit| {
                Some(SearchRow {
                    name: hit.entry.name.clone(),
                    group: hit.group.name.clone(),
                    page_index: resolver.resolve_entry(&hit.entry.id)?,
                })
            })
            .collect();

        *selected = (*selected).min(results.len().saturating_sub(1));
        self.search_results = results;
    }

    fn render_ui(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(1)])
            .split(frame.area());

        self.render_spread(frame, chunks[0]);

        draw::render_status_bar(
            frame,
            chunks[1],
            &self.book,
            self.controller.current_index(),
            self.controller.is_transitioning(),
        );

        match &self.mode {
            AppMode::Search { input, selected } => {
                draw::render_search_overlay(frame, input, &self.search_results, *selected);
            }
            AppMode::Help => draw::render_help_overlay(frame),
            AppMode::Normal => {}
        }
    }

    /// Centered book area sized from the controller's applied geometry, with
    /// the in-flight fold sampled from the live surface.
    fn render_spread(&mut self, frame: &mut Frame, area: Rect) {
        if self.controller.state() == SurfaceState::Uninitialized
            || self.controller.state() == SurfaceState::Initializing
        {
            return;
        }

        let book_area = self
            .controller
            .geometry()
            .map_or(area, |geometry| {
                let width = (geometry.width / CELL_WIDTH_PX) as u16;
                let height = (geometry.height / CELL_HEIGHT_PX) as u16;
                centered(area, width, height)
            });

        let now = self.now_ms();
        let settled = self.controller.current_index();
        let (shown, fold) = match self.controller.surface() {
            Some(surface) => {
                let shown = surface.frame(now).map_or(settled, |f| {
                    if f.progress < 0.5 { f.from } else { f.to }
                });
                (shown, surface.sweep_column(now, book_area.width))
            }
            None => (settled, None),
        };

        draw::render_book(frame, book_area, &self.catalog, &self.book, shown, fold);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
