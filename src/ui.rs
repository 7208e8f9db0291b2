use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Screen};
use crate::clock::Clock;
use crate::session::Phase;
use crate::util;

const PAGE_MARGIN: u16 = 6;
const PROGRESS_CELLS: usize = 10;

pub fn draw<C: Clock + Copy>(app: &App<C>, f: &mut Frame) {
    let theme = app.theme();
    let base = Style::default().bg(theme.bg).fg(theme.fg);
    f.render_widget(Block::default().style(base), f.area());

    match &app.screen {
        Screen::Writing => draw_writing(app, f, true),
        Screen::TimesUp { words } => {
            draw_writing(app, f, false);
            draw_times_up(app, f, *words);
        }
        Screen::SaveAs { input, .. } => {
            draw_writing(app, f, false);
            draw_save_prompt(app, f, input);
        }
        Screen::ConfirmDiscard { .. } => {
            draw_writing(app, f, false);
            draw_confirm(app, f);
        }
        Screen::History => draw_history(app, f),
        Screen::Preview { title, content } => draw_preview(app, f, title, content),
    }
}

fn draw_writing<C: Clock + Copy>(app: &App<C>, f: &mut Frame, show_cursor: bool) {
    let theme = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let page = page_area(chunks[0]);
    let lines: Vec<Line> = app
        .editor
        .lines()
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();

    let (cursor_row, cursor_col) = app.editor.cursor();
    let height = page.height.max(1) as usize;
    let scroll = (cursor_row + 1).saturating_sub(height) as u16;

    f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), page);

    if show_cursor {
        let line = &app.editor.lines()[cursor_row];
        let prefix: String = line.chars().take(cursor_col).collect();
        let x = page.x + (prefix.width() as u16).min(page.width.saturating_sub(1));
        let y = page.y + (cursor_row as u16).saturating_sub(scroll);
        f.set_cursor_position(Position::new(x, y));
    }

    let accent = Style::default().fg(theme.accent);
    let mut left = vec![];
    if app.editor.backspace_locked {
        left.push(Span::styled("no backspace", accent));
        left.push(Span::raw("  "));
    }
    match app.session.phase() {
        Phase::Paused => left.push(Span::styled("PAUSED", accent.add_modifier(Modifier::BOLD))),
        Phase::Idle => left.push(Span::raw("type to start")),
        _ => {}
    }
    if let Some(status) = &app.status {
        left.push(Span::raw("  "));
        left.push(Span::raw(status.as_str()));
    }

    let words = app.word_count();
    let right = Line::from(vec![
        Span::raw(format!("{}/{} words ", words, app.config.word_goal)),
        Span::styled(progress_bar(words, app.config.word_goal), accent),
        Span::raw(" "),
        Span::styled(
            app.session.display_remaining(),
            accent.add_modifier(Modifier::BOLD),
        ),
    ]);

    let bar = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(right.width() as u16 + 1)])
        .split(chunks[1]);
    f.render_widget(Paragraph::new(Line::from(left)), bar[0]);
    f.render_widget(Paragraph::new(right), bar[1]);
}

fn draw_times_up<C: Clock + Copy>(app: &App<C>, f: &mut Frame, words: usize) {
    let theme = app.theme();
    let area = centered_rect(44, 7, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" time's up ")
        .style(Style::default().bg(theme.bg).fg(theme.fg));
    let text = vec![
        Line::from(""),
        Line::from(format!("you wrote {} words", words)).alignment(Alignment::Center),
        Line::from(""),
        Line::from(vec![
            Span::styled("c", Style::default().fg(theme.accent)),
            Span::raw(" keep writing   "),
            Span::styled("s", Style::default().fg(theme.accent)),
            Span::raw(" save   "),
            Span::styled("esc", Style::default().fg(theme.accent)),
            Span::raw(" stop"),
        ])
        .alignment(Alignment::Center),
    ];
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_save_prompt<C: Clock + Copy>(app: &App<C>, f: &mut Frame, input: &str) {
    let theme = app.theme();
    let area = centered_rect(64, 3, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" save as ")
        .style(Style::default().bg(theme.bg).fg(theme.fg));
    f.render_widget(Paragraph::new(input).block(block), area);
    let x = area.x + 1 + (input.width() as u16).min(area.width.saturating_sub(3));
    f.set_cursor_position(Position::new(x, area.y + 1));
}

fn draw_confirm<C: Clock + Copy>(app: &App<C>, f: &mut Frame) {
    let theme = app.theme();
    let area = centered_rect(48, 5, f.area());
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" unsaved words ")
        .style(Style::default().bg(theme.bg).fg(theme.fg));
    let text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().fg(theme.accent)),
            Span::raw(" save first   "),
            Span::styled("n", Style::default().fg(theme.accent)),
            Span::raw(" discard   "),
            Span::styled("esc", Style::default().fg(theme.accent)),
            Span::raw(" cancel"),
        ])
        .alignment(Alignment::Center),
    ];
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_history<C: Clock + Copy>(app: &App<C>, f: &mut Frame) {
    let theme = app.theme();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(page_area(f.area()));

    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("drafts", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  enter preview, esc back"),
        ])),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(format!("search: {}", app.history.query)),
        chunks[1],
    );

    let now = chrono::Local::now();
    let selected_style = Style::default()
        .fg(theme.bg)
        .bg(theme.accent)
        .add_modifier(Modifier::BOLD);

    let visible = app.history.visible();
    let height = chunks[2].height as usize;
    let first = app
        .history
        .selected
        .saturating_sub(height.saturating_sub(1));

    let mut lines = Vec::with_capacity(height);
    for (i, meta) in visible.iter().enumerate().skip(first).take(height) {
        let when = match &meta.created {
            Some(dt) => format!("{} ({})", util::human_date(dt), util::relative_age(dt, &now)),
            None => meta.file_name.clone(),
        };
        let line = Line::from(vec![
            Span::raw(format!("{}  {} words  ", when, meta.word_count)),
            Span::styled(
                meta.preview.clone(),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]);
        if i == app.history.selected {
            lines.push(line.style(selected_style));
        } else {
            lines.push(line);
        }
    }
    if visible.is_empty() {
        lines.push(Line::from("no drafts yet"));
    }
    f.render_widget(Paragraph::new(lines), chunks[2]);
}

fn draw_preview<C: Clock + Copy>(app: &App<C>, f: &mut Frame, title: &str, content: &str) {
    let theme = app.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .title_bottom(" e edit, esc back ")
        .style(Style::default().bg(theme.bg).fg(theme.fg));
    f.render_widget(
        Paragraph::new(content).wrap(Wrap { trim: false }).block(block),
        page_area(f.area()),
    );
}

/// Inset the writing surface so text never hugs the terminal edge
fn page_area(area: Rect) -> Rect {
    let margin = if area.width > PAGE_MARGIN * 4 { PAGE_MARGIN } else { 0 };
    Rect {
        x: area.x + margin,
        y: area.y + 1,
        width: area.width.saturating_sub(margin * 2),
        height: area.height.saturating_sub(2),
    }
}

/// Center a fixed-size rect within `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn progress_bar(words: usize, goal: usize) -> String {
    let filled = if goal == 0 {
        0
    } else {
        (words * PROGRESS_CELLS / goal).min(PROGRESS_CELLS)
    };
    let mut bar = String::with_capacity(PROGRESS_CELLS + 2);
    bar.push('[');
    for i in 0..PROGRESS_CELLS {
        bar.push(if i < filled { '#' } else { '-' });
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_bar_is_empty_at_zero() {
        assert_eq!(progress_bar(0, 500), "[----------]");
    }

    #[test]
    fn progress_bar_fills_halfway() {
        assert_eq!(progress_bar(250, 500), "[#####-----]");
    }

    #[test]
    fn progress_bar_caps_at_goal() {
        assert_eq!(progress_bar(9000, 500), "[##########]");
    }

    #[test]
    fn page_area_keeps_narrow_terminals_usable() {
        let tiny = Rect::new(0, 0, 20, 10);
        let page = page_area(tiny);
        assert_eq!(page.width, 20);
    }
}
