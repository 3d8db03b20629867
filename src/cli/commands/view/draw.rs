//! Widget drawing for the book view: the two-page spread, covers, table of
//! contents, search popup, and the status bar.

#![allow(clippy::arithmetic_side_effects)]

use {
    super::tui::SearchRow,
    pagebound::{Book, Catalog, Entry, PageDescriptor, PageKind},
    ratatui::{
        Frame,
        layout::{Alignment, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{Block, Borders, Clear, Paragraph, Wrap},
    },
};

const PARCHMENT: Color = Color::Rgb(0xe8, 0xdc, 0xc0);
const LEATHER: Color = Color::Rgb(0x6b, 0x3a, 0x21);

/// Which page indices the open book shows for a settled index.
///
/// The front cover sits alone on the right; after that pages pair up
/// `(1,2)`, `(3,4)`, ... and an odd final index sits alone on the left.
pub fn spread_for(index: usize, total: usize) -> (Option<usize>, Option<usize>) {
    if index == 0 {
        return (None, Some(0));
    }
    let left = if index % 2 == 1 { index } else { index - 1 };
    let right = left + 1;
    (Some(left), (right < total).then_some(right))
}

/// Parse a catalog color string (`#rrggbb` or a named color).
pub fn group_color(raw: &str) -> Color {
    raw.trim().parse().unwrap_or(Color::Yellow)
}

pub fn render_book(
    frame: &mut Frame,
    area: Rect,
    catalog: &Catalog,
    book: &Book,
    shown_index: usize,
    fold_column: Option<u16>,
) {
    if area.width < 4 || area.height < 4 {
        return;
    }

    let (left, right) = spread_for(shown_index, book.total_pages());
    let half = area.width / 2;
    let left_area = Rect {
        x: area.x,
        y: area.y,
        width: half,
        height: area.height,
    };
    let right_area = Rect {
        x: area.x + half,
        y: area.y,
        width: area.width - half,
        height: area.height,
    };

    match left.and_then(|i| book.page(i)) {
        Some(page) => render_page(frame, left_area, catalog, page),
        None => render_desk(frame, left_area),
    }
    match right.and_then(|i| book.page(i)) {
        Some(page) => render_page(frame, right_area, catalog, page),
        None => render_desk(frame, right_area),
    }

    if let Some(column) = fold_column {
        render_fold(frame, area, column);
    }
}

/// The empty table surface beside a lone cover page.
fn render_desk(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Block::default().style(Style::default().bg(Color::Rgb(0x1c, 0x16, 0x10))),
        area,
    );
}

/// The moving fold line of an in-flight page turn.
fn render_fold(frame: &mut Frame, area: Rect, column: u16) {
    let x = area.x + column.min(area.width.saturating_sub(1));
    let fold = Rect {
        x,
        y: area.y,
        width: 1,
        height: area.height,
    };
    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(Color::Rgb(0x3a, 0x2c, 0x1a))
                .add_modifier(Modifier::DIM),
        ),
        fold,
    );
}

fn render_page(frame: &mut Frame, area: Rect, catalog: &Catalog, page: &PageDescriptor) {
    match &page.kind {
        PageKind::CoverFront => render_cover(frame, area, catalog, true),
        PageKind::CoverBack => render_cover(frame, area, catalog, false),
        PageKind::TableOfContents => render_toc(frame, area, catalog),
        PageKind::GroupHeader { group, entries } => {
            render_content(frame, area, catalog, page, Some(group), entries)
        }
        PageKind::ContentPage { group, entries } => {
            render_content(frame, area, catalog, page, None, entries)
        }
    }

    // The group name is only banner'd on header pages; content pages rely on
    // the logical page number alone.
    if let Some(number) = page.page_number {
        let footer = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(1),
            width: area.width,
            height: 1,
        };
        frame.render_widget(
            Paragraph::new(format!("~ {} ~", number))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Rgb(0x8a, 0x6d, 0x4a))),
            footer,
        );
    }
}

fn render_cover(frame: &mut Frame, area: Rect, catalog: &Catalog, front: bool) {
    let title = if catalog.title.is_empty() {
        "Pagebound"
    } else {
        &catalog.title
    };

    let mut lines = vec![Line::from("")];
    for _ in 0..area.height / 3 {
        lines.push(Line::from(""));
    }
    if front {
        lines.push(Line::from(Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Rgb(0xd4, 0xaf, 0x37))
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "\u{2766}",
            Style::default().fg(Color::Rgb(0xd4, 0xaf, 0x37)),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "\u{2767}",
            Style::default().fg(Color::Rgb(0xd4, 0xaf, 0x37)),
        )));
    }

    let cover = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Rgb(0xd4, 0xaf, 0x37)).bg(LEATHER)),
        );
    frame.render_widget(cover, area);
}

fn render_toc(frame: &mut Frame, area: Rect, catalog: &Catalog) {
    let book_block = page_block("Table of Contents");
    let mut lines = vec![Line::from("")];

    let mut slot = 0usize;
    for group in &catalog.groups {
        if group.entries.is_empty() {
            continue;
        }
        slot += 1;
        let key = if slot <= 9 {
            format!("[{}] ", slot)
        } else {
            "    ".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled("  \u{25cf} ", Style::default().fg(group_color(&group.color))),
            Span::styled(key, Style::default().fg(Color::DarkGray)),
            Span::styled(
                group.name.clone(),
                Style::default()
                    .fg(group_color(&group.color))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({})", group.entries.len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    if catalog.groups.iter().all(|g| g.entries.is_empty()) {
        lines.push(Line::from("  (this book is empty)"));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  press a number to jump to a chapter",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .block(book_block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn render_content(
    frame: &mut Frame,
    area: Rect,
    catalog: &Catalog,
    page: &PageDescriptor,
    header: Option<&str>,
    entries: &[Entry],
) {
    let color = page
        .group()
        .and_then(|name| catalog.groups.iter().find(|g| g.name == name))
        .map_or(Color::Yellow, |g| group_color(&g.color));

    let mut lines = Vec::new();
    if let Some(name) = header {
        lines.push(Line::from(Span::styled(
            format!("  {}", name),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {}", "\u{2500}".repeat((area.width as usize).saturating_sub(6).min(28))),
            Style::default().fg(color),
        )));
        lines.push(Line::from(""));
    } else {
        lines.push(Line::from(""));
    }

    for entry in entries {
        lines.push(Line::from(Span::styled(
            format!("  {}", entry.name),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        if !entry.summary.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", entry.summary),
                Style::default().fg(Color::Rgb(0x4a, 0x3b, 0x28)),
            )));
        }
        if !entry.detail.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    {}", entry.detail),
                Style::default().fg(Color::Rgb(0x5c, 0x4a, 0x33)),
            )));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(page_block(""))
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn page_block(title: &str) -> Block<'_> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::Rgb(0x8a, 0x6d, 0x4a)).bg(PARCHMENT));
    if !title.is_empty() {
        block = block
            .title(format!(" {} ", title))
            .title_alignment(Alignment::Center);
    }
    block
}

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    book: &Book,
    current: usize,
    transitioning: bool,
) {
    let place = match book.page(current).and_then(|p| p.page_number) {
        Some(number) => format!(" Page {}/{}", number, book.logical_pages()),
        None if current == 0 => " Cover".to_string(),
        None => " Back cover".to_string(),
    };
    let spinner = if transitioning { " ~" } else { "" };
    let help = " | [\u{2190}/\u{2192}] Turn | [/] Search | [t] Contents | [?] Help | [q] Quit";

    frame.render_widget(
        Paragraph::new(Line::from(vec![Span::styled(
            format!("{}{}{}", place, spinner, help),
            Style::default().fg(Color::Gray),
        )])),
        area,
    );
}

pub fn render_search_overlay(
    frame: &mut Frame,
    input: &str,
    results: &[SearchRow],
    selected: usize,
) {
    let area = frame.area();
    let popup_width = 52.min(area.width.saturating_sub(4));
    let popup_height = (results.len() as u16 + 4).clamp(5, area.height.saturating_sub(2));
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: 1,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let mut lines = vec![Line::from(format!(" \u{1f50d} {}_", input)), Line::from("")];
    for (i, row) in results.iter().enumerate() {
        let style = if i == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(0xd4, 0xaf, 0x37))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!(" {}  ({})", row.name, row.group),
            style,
        )));
    }
    if results.is_empty() && input.len() >= 2 {
        lines.push(Line::from(Span::styled(
            " no matches",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let popup = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(popup, popup_area);
}

pub fn render_help_overlay(frame: &mut Frame) {
    let area = frame.area();
    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = 18.min(area.height.saturating_sub(2));
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled(
            "Navigation",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
        )),
        Line::from("  \u{2190}, h           Previous page"),
        Line::from("  \u{2192}, l           Next page"),
        Line::from("  g, Home        Front cover"),
        Line::from("  G, End         Back cover"),
        Line::from("  t              Table of contents"),
        Line::from("  1-9            Jump to chapter"),
        Line::from(""),
        Line::from(Span::styled(
            "Search",
            Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow),
        )),
        Line::from("  /              Open search"),
        Line::from("  \u{2191}/\u{2193}, Enter     Pick a result"),
        Line::from("  Esc            Close search"),
        Line::from(""),
        Line::from("  q, Esc, Ctrl-c Quit"),
    ];

    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Keyboard Controls ")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(Color::Cyan)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup_area);
}
