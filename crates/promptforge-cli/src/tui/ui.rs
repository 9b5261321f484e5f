//! TUI rendering using ratatui.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph};

use promptforge_core::{Block as PromptBlock, ColorFamily};

use super::app::{App, Focus};

/// Columns of indentation per nesting level below the top.
const INDENT_WIDTH: u16 = 4;

const HERO_HEIGHT: u16 = 7;
const BANNER_HEIGHT: u16 = 3;

/// Render the editor.
pub fn render(f: &mut Frame, app: &App) {
    let header_height = if app.session.is_empty() {
        HERO_HEIGHT
    } else {
        BANNER_HEIGHT
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height), // header
            Constraint::Min(3),                // blocks + snippets
            Constraint::Length(3),             // command bar
            Constraint::Length(1),             // status bar
        ])
        .split(f.area());

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(chunks[1]);

    render_header(f, app, chunks[0]);
    render_blocks(f, app, main[0]);
    render_snippets(f, app, main[1]);
    render_command_bar(f, app, chunks[2]);
    render_suggestions(f, app, chunks[1], chunks[2]);
    render_status_bar(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = Span::styled(
        "PROMPT FORGE",
        Style::default()
            .fg(family_color(ColorFamily::Cyan))
            .add_modifier(Modifier::BOLD),
    );
    let tagline = Span::styled(
        "ARCHITECT YOUR AI INTERACTIONS",
        Style::default().fg(Color::DarkGray),
    );

    let text = if app.session.is_empty() {
        vec![
            Line::from(""),
            Line::from(title),
            Line::from(""),
            Line::from(tagline),
            Line::from(""),
        ]
    } else {
        vec![Line::from(vec![title, Span::raw("  //  "), tagline])]
    };

    let header = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn render_blocks(f: &mut Frame, app: &App, area: Rect) {
    let blocks = app.session.blocks();
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Blocks ({}) ", blocks.len()));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    if blocks.is_empty() {
        let help = Paragraph::new(vec![
            Line::from(""),
            Line::from("  Type /role, /context, /task ... to add a section."),
            Line::from("  //name nests a custom section one level down."),
            Line::from("  /forge <description> writes a ROLE for you."),
        ])
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, inner);
        return;
    }

    let focused_index = app
        .session
        .focused()
        .and_then(|id| blocks.iter().position(|b| b.id == id))
        .unwrap_or(blocks.len() - 1);
    let heights: Vec<u16> = blocks.iter().map(block_height).collect();
    let start = first_visible(&heights, focused_index, inner.height);

    let mut y = inner.y;
    for (block, height) in blocks.iter().zip(&heights).skip(start) {
        if y >= inner.bottom() {
            break;
        }
        let indent = indent_for(block)
            .min(inner.width.saturating_sub(INDENT_WIDTH * 2));
        let rect = Rect {
            x: inner.x + indent,
            y,
            width: inner.width - indent,
            height: (*height).min(inner.bottom() - y),
        };
        render_block(f, app, block, rect);
        y = y.saturating_add(*height);
    }
}

fn render_block(f: &mut Frame, app: &App, block: &PromptBlock, area: Rect) {
    let color = family_color(block.family);
    let is_focused = app.session.focused() == Some(block.id);
    let is_editing = app.focus == Focus::Editing(block.id);

    let mut title = vec![Span::styled(
        format!(" {} ", block.tag),
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )];
    if is_editing {
        title.push(Span::styled(" EDITING ", Style::default().fg(color)));
    }

    let border = Block::default()
        .borders(Borders::ALL)
        .border_type(if is_focused {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(Style::default().fg(color))
        .title(Line::from(title));

    let lines: Vec<Line> = if block.content.is_empty() {
        vec![Line::from(Span::styled(
            block.hint(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))]
    } else {
        block.content.split('\n').map(Line::from).collect()
    };

    let inner = border.inner(area);
    f.render_widget(Paragraph::new(lines).block(border), area);

    if is_editing {
        let last = block.content.rsplit('\n').next().unwrap_or_default();
        let row = block.content.matches('\n').count() as u16;
        let x = inner.x + (last.chars().count() as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + row.min(inner.height.saturating_sub(1));
        f.set_cursor_position((x, y));
    }
}

fn render_snippets(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.session.focused_block() {
        Some(block) => format!(" Snippets: {} ", block.tag),
        None => " Snippets ".to_string(),
    };
    let panel = Block::default().borders(Borders::ALL).title(title);

    if app.snippets.is_empty() {
        let hint = if app.session.focused_block().is_some() {
            "None saved. /save <name> stores this block."
        } else {
            "Select a block to see its snippets."
        };
        let text = Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
            .block(panel);
        f.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .snippets
        .iter()
        .map(|s| {
            let first = s.content.lines().next().unwrap_or_default();
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!("/use {}", s.name),
                    Style::default().fg(Color::Yellow),
                )),
                Line::from(Span::styled(
                    format!("  {}", truncate(first, 40)),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();
    f.render_widget(List::new(items).block(panel), area);
}

fn render_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let (title, style) = if app.is_generating() {
        (" FORGING... ", Style::default().fg(Color::DarkGray))
    } else {
        (" Command ", Style::default())
    };

    let bar = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(family_color(app.session.last_family()))),
        Span::raw(app.input.as_str()),
    ]))
    .style(style)
    .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(bar, area);

    if app.focus == Focus::CommandBar && !app.is_generating() {
        let x = area.x + 3 + app.input.chars().count() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Autocomplete popup, drawn over the bottom of `main` just above the bar.
fn render_suggestions(f: &mut Frame, app: &App, main: Rect, bar: Rect) {
    let suggestions = app.session.suggestions();
    if suggestions.is_empty() || app.focus != Focus::CommandBar {
        return;
    }

    let height = (suggestions.len() as u16 + 2).min(main.height);
    let width = 34u16.min(bar.width);
    let area = Rect {
        x: bar.x,
        y: bar.y.saturating_sub(height),
        width,
        height,
    };

    let items: Vec<ListItem> = suggestions
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let mut style = Style::default().fg(family_color(k.family));
            if i == app.selected_suggestion {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(vec![
                Span::styled(format!("/{:<14}", k.name), style),
                Span::styled(k.display.clone(), Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        List::new(items).block(Block::default().borders(Borders::ALL).title(" Tab ")),
        area,
    );
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mode = if app.is_generating() {
        "FORGING"
    } else {
        match app.focus {
            Focus::CommandBar => "COMMAND",
            Focus::Editing(_) => "EDIT",
        }
    };

    let hints = match app.focus {
        Focus::CommandBar => "  Enter:run/edit  Up/Down:focus  ^D:delete  ^Y:copy  ^C:quit",
        Focus::Editing(_) => "  Esc:done  Enter:newline  ^C:quit",
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" {mode} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        Span::styled(
            app.status_message.as_deref().unwrap_or(""),
            Style::default().fg(Color::Green),
        ),
        Span::styled(hints, Style::default().fg(Color::DarkGray)),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

// -- Helpers --

fn family_color(family: ColorFamily) -> Color {
    match family {
        ColorFamily::Cyan => Color::Rgb(38, 198, 218),
        ColorFamily::Pink => Color::Rgb(233, 30, 99),
        ColorFamily::Lime => Color::Rgb(212, 225, 87),
        ColorFamily::Red => Color::Rgb(244, 67, 54),
        ColorFamily::Purple => Color::Rgb(171, 71, 188),
        ColorFamily::Teal => Color::Rgb(38, 166, 154),
        ColorFamily::Amber => Color::Rgb(255, 202, 40),
        ColorFamily::White => Color::White,
    }
}

fn indent_for(block: &PromptBlock) -> u16 {
    u16::from(block.level.get().saturating_sub(1)) * INDENT_WIDTH
}

/// Rows a block takes: its content lines (at least one) plus borders.
fn block_height(block: &PromptBlock) -> u16 {
    let lines = block.content.split('\n').count().max(1);
    u16::try_from(lines).unwrap_or(u16::MAX).saturating_add(2)
}

/// Index of the first block to draw so the focused block is on screen.
fn first_visible(heights: &[u16], focused: usize, available: u16) -> usize {
    let Some(&focused_height) = heights.get(focused) else {
        return 0;
    };
    let mut start = focused;
    let mut used = focused_height;
    while start > 0 {
        let next = used.saturating_add(heights[start - 1]);
        if next > available {
            break;
        }
        used = next;
        start -= 1;
    }
    start
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use promptforge_core::IndentLevel;

    use super::*;

    #[test]
    fn nested_blocks_indent_four_columns_per_level() {
        let top = PromptBlock::new("ROLE", IndentLevel::TOP, ColorFamily::Cyan);
        let third = PromptBlock::new("X", IndentLevel::new(3).unwrap(), ColorFamily::Cyan);
        assert_eq!(indent_for(&top), 0);
        assert_eq!(indent_for(&third), 8);
    }

    #[test]
    fn block_height_counts_content_lines() {
        let empty = PromptBlock::new("ROLE", IndentLevel::TOP, ColorFamily::Cyan);
        assert_eq!(block_height(&empty), 3);
        let two = empty.clone().with_content("a\nb");
        assert_eq!(block_height(&two), 4);
    }

    #[test]
    fn first_visible_starts_at_top_when_everything_fits() {
        assert_eq!(first_visible(&[3, 3, 3], 2, 20), 0);
    }

    #[test]
    fn first_visible_scrolls_to_focused_block() {
        assert_eq!(first_visible(&[3, 3, 3, 3], 3, 7), 2);
        assert_eq!(first_visible(&[3, 3, 10], 2, 5), 2);
        assert_eq!(first_visible(&[], 0, 5), 0);
    }

    #[test]
    fn families_have_distinct_colours() {
        let families = [
            ColorFamily::Cyan,
            ColorFamily::Pink,
            ColorFamily::Lime,
            ColorFamily::Red,
            ColorFamily::Purple,
            ColorFamily::Teal,
            ColorFamily::Amber,
            ColorFamily::White,
        ];
        for (i, a) in families.iter().enumerate() {
            for b in &families[i + 1..] {
                assert_ne!(family_color(*a), family_color(*b), "{a} and {b}");
            }
        }
    }

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("héllo", 5), "héllo");
        assert_eq!(truncate("héllo wörld", 5), "héllo...");
    }
}
