use crate::app::{AppModel, OpenLevel};
use crate::domain::MenuEntry;
use ratatui::prelude::*;
use ratatui::widgets::*;
use unicode_width::UnicodeWidthStr;

pub mod theme;

const MIN_PANEL_WIDTH: u16 = 12;

/// Draws the open menu levels as cascading panels, the way a popup menu
/// chain stacks: each submenu opens beside the row it was opened from.
pub fn render(frame: &mut Frame, model: &AppModel) {
    let full_area = frame.area();
    if full_area.width == 0 || full_area.height == 0 {
        return;
    }

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG)),
        full_area,
    );

    let content_area = Rect {
        height: full_area.height.saturating_sub(1),
        ..full_area
    };

    let levels = model.open_levels();
    let deepest = levels.len().saturating_sub(1);
    let mut x = content_area.x.saturating_add(1);
    let mut y = content_area.y;
    for (depth, level) in levels.iter().enumerate() {
        let rect = panel_rect(level, x, y, content_area);
        render_level(frame, rect, level, depth == deepest);

        // The next panel starts beside the highlighted row of this one.
        x = rect.x.saturating_add(rect.width);
        y = rect
            .y
            .saturating_add(u16::try_from(level.cursor).unwrap_or(u16::MAX));
    }

    render_footer(frame, full_area, model);
}

fn panel_rect(level: &OpenLevel, x: u16, y: u16, content: Rect) -> Rect {
    let widest = level
        .node
        .entries
        .iter()
        .map(entry_width)
        .max()
        .unwrap_or(0)
        .max(level.node.name.width());
    let width = u16::try_from(widest)
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .max(MIN_PANEL_WIDTH)
        .min(content.width);
    let height = u16::try_from(level.node.entries.len().max(1))
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(content.height);

    let max_x = content.right().saturating_sub(width);
    let max_y = content.bottom().saturating_sub(height);
    Rect {
        x: x.min(max_x),
        y: y.min(max_y),
        width,
        height,
    }
}

fn entry_width(entry: &MenuEntry) -> usize {
    match entry {
        // Room for the gap and the ▸ marker.
        MenuEntry::Submenu(node) => node.name.width() + 2,
        MenuEntry::Action(node) => node.display_name.width(),
        MenuEntry::Separator => 0,
    }
}

fn render_level(frame: &mut Frame, rect: Rect, level: &OpenLevel, active: bool) {
    let border_style = if active {
        Style::default().fg(theme::ACCENT)
    } else {
        Style::default().fg(theme::BORDER)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Span::styled(
            level.node.name.clone(),
            Style::default().fg(theme::MUTED),
        ))
        .style(Style::default().bg(theme::SURFACE));

    if level.node.entries.is_empty() {
        let empty = Paragraph::new(Span::styled("(empty)", Style::default().fg(theme::DIM)))
            .block(block);
        frame.render_widget(empty, rect);
        return;
    }

    let inner_width = rect.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = level
        .node
        .entries
        .iter()
        .map(|entry| entry_item(entry, inner_width))
        .collect();

    let highlight_style = if active {
        Style::default()
            .fg(theme::ACCENT)
            .bg(theme::ACCENT_BG)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme::FG).bg(theme::ACCENT_BG)
    };
    let list = List::new(items)
        .style(Style::default().fg(theme::FG))
        .block(block)
        .highlight_style(highlight_style);

    let mut state = ListState::default();
    state.select(Some(
        level.cursor.min(level.node.entries.len().saturating_sub(1)),
    ));
    frame.render_stateful_widget(list, rect, &mut state);
}

fn entry_item(entry: &MenuEntry, inner_width: usize) -> ListItem<'static> {
    match entry {
        MenuEntry::Submenu(node) => ListItem::new(Line::from(submenu_label(&node.name, inner_width))),
        MenuEntry::Action(node) => ListItem::new(Line::from(node.display_name.clone())),
        MenuEntry::Separator => ListItem::new(Line::from(Span::styled(
            "─".repeat(inner_width),
            Style::default().fg(theme::BORDER),
        ))),
    }
}

fn submenu_label(name: &str, inner_width: usize) -> String {
    let pad = inner_width.saturating_sub(name.width() + 1).max(1);
    format!("{name}{}▸", " ".repeat(pad))
}

fn render_footer(frame: &mut Frame, area: Rect, model: &AppModel) {
    let bar_area = Rect {
        x: area.x,
        y: area.bottom().saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(
            model.data.scripts_dir.display().to_string(),
            Style::default().fg(theme::MUTED),
        ),
        Span::raw("  "),
    ];
    match &model.notice {
        Some(notice) => spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(theme::ERROR),
        )),
        None => spans.push(Span::styled(
            "↑↓ move · → open · ← back · ⏎ run · q quit",
            Style::default().fg(theme::DIM),
        )),
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BAR_BG));
    frame.render_widget(footer, bar_area);
}
