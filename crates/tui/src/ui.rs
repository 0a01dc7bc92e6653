use document::gutter;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Clear, List, ListItem, Paragraph, Wrap},
};

use crate::{
    app::{App, Focus, PackagesOverlay},
    prompt::{Prompt, PromptKind},
    widgets::{ConsoleView, EditorView, GutterView, PackagesView, editor::display_column},
};

const EXPLORER_WIDTH: u16 = 28;
const CONSOLE_HEIGHT: u16 = 10;
const DIALOG_WIDTH: u16 = 64;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let console_height = if app.show_console { CONSOLE_HEIGHT } else { 0 };
    let [main_area, console_area, status_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(console_height),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let explorer_width = if app.show_explorer { EXPLORER_WIDTH } else { 0 };
    let [explorer_area, editor_area] =
        Layout::horizontal([Constraint::Length(explorer_width), Constraint::Min(10)])
            .areas(main_area);

    app.areas.explorer = explorer_area;
    app.areas.console = console_area;

    if app.show_explorer {
        draw_explorer(frame, app, explorer_area);
    }
    draw_editor(frame, app, editor_area);
    if app.show_console {
        draw_console(frame, app, console_area);
    }
    draw_status(frame, app, status_area);

    match &app.packages_overlay {
        PackagesOverlay::Hidden => {}
        PackagesOverlay::Loading(_) => {
            frame.render_widget(PackagesView::new(None), packages_area(frame.area()))
        }
        PackagesOverlay::Loaded(packages) => frame.render_widget(
            PackagesView::new(Some(packages.as_slice())),
            packages_area(frame.area()),
        ),
    }

    if let Some(prompt) = &app.prompt {
        draw_prompt(frame, prompt);
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn draw_explorer(frame: &mut Frame, app: &mut App, area: Rect) {
    let root = app.explorer.root();
    let title = root
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let items: Vec<ListItem> = app
        .explorer
        .entries()
        .iter()
        .map(|entry| {
            if entry.is_dir {
                ListItem::new(format!("{}/", entry.name)).style(Style::default().fg(Color::Blue))
            } else {
                ListItem::new(entry.name.as_str())
            }
        })
        .collect();
    let selected = (!items.is_empty()).then(|| app.explorer.selected());

    let list = List::new(items)
        .block(
            Block::bordered()
                .title(format!(" {title} "))
                .border_style(border_style(app.focus == Focus::Explorer)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).bold())
        .highlight_symbol("> ");

    app.explorer_list.select(selected);
    frame.render_stateful_widget(list, area, &mut app.explorer_list);
}

fn draw_editor(frame: &mut Frame, app: &mut App, area: Rect) {
    let name = app
        .buffer
        .path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "untitled".to_string());
    let modified = if app.buffer.is_modified() { " [+]" } else { "" };
    let block = Block::bordered()
        .title(format!(" {name}{modified} "))
        .border_style(border_style(app.focus == Focus::Editor));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let digits = gutter::digits(app.buffer.line_count());
    let [gutter_area, text_area] = Layout::horizontal([
        Constraint::Length(GutterView::width(digits)),
        Constraint::Min(1),
    ])
    .areas(inner);
    app.areas.gutter = gutter_area;
    app.areas.editor = text_area;

    app.scroll_to_cursor(text_area.height);
    let lines = app.visible_lines(text_area.height);
    let commands = gutter::render(
        lines.iter().copied(),
        &app.breakpoints,
        app.markers.current_line(),
        digits,
    );
    frame.render_widget(GutterView::new(&commands), gutter_area);
    frame.render_widget(
        EditorView::new(app.buffer.lines(), &lines, app.markers.error_line())
            .tab_width(app.tab_width),
        text_area,
    );

    let overlay_open =
        app.prompt.is_some() || !matches!(app.packages_overlay, PackagesOverlay::Hidden);
    if app.focus != Focus::Editor || overlay_open {
        return;
    }
    let cursor = app.buffer.cursor();
    let Some(row) = cursor.line.checked_sub(app.scroll) else {
        return;
    };
    if row >= usize::from(text_area.height) {
        return;
    }
    let column = app
        .buffer
        .line(cursor.line)
        .map(|line| display_column(line, cursor.column, app.tab_width))
        .unwrap_or(0)
        .min(usize::from(text_area.width.saturating_sub(1)));
    frame.set_cursor_position(Position::new(
        text_area.x + column as u16,
        text_area.y + row as u16,
    ));
}

fn draw_console(frame: &mut Frame, app: &App, area: Rect) {
    let capture = if app.console_log { " [log]" } else { "" };
    let block = Block::bordered()
        .title(format!(" Output{capture} "))
        .border_style(border_style(app.focus == Focus::Console));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(ConsoleView::new(&app.console), inner);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if app.relay.is_running() {
        spans.push(Span::styled(
            " RUNNING ",
            Style::default().bg(Color::Green).fg(Color::Black),
        ));
    }
    if app.package_op.is_some() {
        spans.push(Span::styled(
            " PACKAGES ",
            Style::default().bg(Color::Blue).fg(Color::Black),
        ));
    }
    if app.debugging {
        spans.push(Span::styled(
            " DEBUG ",
            Style::default().bg(Color::Magenta).fg(Color::Black),
        ));
    }
    spans.push(Span::raw(format!(" {}", app.status)));

    let cursor = app.buffer.cursor();
    let position = format!("Ln {}, Col {} ", cursor.line + 1, cursor.column + 1);
    let [left, right] = Layout::horizontal([
        Constraint::Min(1),
        Constraint::Length(position.len() as u16),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().add_modifier(Modifier::REVERSED)),
        left,
    );
    frame.render_widget(
        Paragraph::new(position).style(Style::default().add_modifier(Modifier::REVERSED)),
        right,
    );
}

fn draw_prompt(frame: &mut Frame, prompt: &Prompt) {
    let takes_input = prompt.kind.takes_input();
    let text_lines = prompt.text.lines().count().max(1) as u16;
    // borders plus the input or hint line
    let height = text_lines + 3;
    let area = centered(frame.area(), DIALOG_WIDTH, height);

    let block = Block::bordered()
        .title(format!(" {} ", prompt.title))
        .border_style(Style::default().fg(Color::Yellow));
    let inner = block.inner(area);

    let mut lines: Vec<Line> = prompt.text.lines().map(Line::from).collect();
    if takes_input {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Green)),
            Span::raw(prompt.input.as_str()),
        ]));
    } else if prompt.kind == PromptKind::Message {
        lines.push(Line::styled("Press any key to continue", Style::default().dim()));
    } else {
        lines.push(Line::styled("y / n", Style::default().dim()));
    }

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );

    if takes_input {
        let column = (2 + prompt.character_index() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(inner.x + column, inner.y + text_lines));
    }
}

fn packages_area(area: Rect) -> Rect {
    centered(area, DIALOG_WIDTH, area.height.saturating_mul(7) / 10)
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centering() {
        assert_eq!(
            centered(Rect::new(0, 0, 80, 24), 60, 10),
            Rect::new(10, 7, 60, 10)
        );
        assert_eq!(
            centered(Rect::new(0, 0, 40, 5), 60, 10),
            Rect::new(0, 0, 40, 5)
        );
    }
}
