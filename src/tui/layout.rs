//! Tabbed layout: one panel visible at a time.
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │ Unified IDE Demo                                │
//! │  [F1 DB]  [F2 Scripts]  [F3 Prompt]  [F4 Python]│
//! ├─────────────────────────────────────────────────┤
//! │  (content for the active tab)                   │
//! ├─────────────────────────────────────────────────┤
//! │ http://localhost:5000  [busy]  F5 run ...       │
//! └─────────────────────────────────────────────────┘
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use crate::shell::{QueryView, ResultTable, ScriptLanguage, Tab, TextBuffer};

use super::app::{ConsoleApp, ScriptsFocus};
use super::dashboard;

/// Widest a result column is allowed to grow.
const MAX_COLUMN_WIDTH: usize = 40;

/// Draw the full TUI layout.
pub fn draw(f: &mut Frame, app: &ConsoleApp) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // tab bar
            Constraint::Min(5),    // content area
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(Span::styled(
            " Unified IDE Demo",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        outer[0],
    );
    draw_tab_bar(f, app, outer[1]);

    match app.active_tab() {
        Tab::Database => draw_database(f, app, outer[2]),
        Tab::Scripts => draw_scripts(f, app, outer[2]),
        Tab::Prompt => draw_prompt(f, app, outer[2]),
        Tab::Python => draw_python(f, app, outer[2]),
    }

    draw_status(f, app, outer[3]);
}

/// Short label shown in the tab bar.
fn tab_label(tab: Tab) -> &'static str {
    match tab {
        Tab::Database => "DB",
        Tab::Scripts => "Scripts",
        Tab::Prompt => "Prompt",
        Tab::Python => "Python",
    }
}

fn draw_tab_bar(f: &mut Frame, app: &ConsoleApp, area: Rect) {
    let spans: Vec<Span> = Tab::ALL
        .iter()
        .flat_map(|tab| {
            let is_active = *tab == app.active_tab();
            let style = if is_active {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            vec![
                Span::raw(" "),
                Span::styled(format!("[F{} {}]", tab.index() + 1, tab_label(*tab)), style),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status(f: &mut Frame, app: &ConsoleApp, area: Rect) {
    let tab = app.active_tab();
    let mut spans = vec![Span::styled(
        format!(" {} ", app.backend_url),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )];
    if app.shell.is_busy(tab) {
        spans.push(Span::styled(" [busy]", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::styled(
        format!("  {}  ^\u{2190}/^\u{2192} tabs  ^Q quit", dashboard::key_hints(tab)),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Outer block for a panel, titled with the tab's full name.
fn panel_block(tab: Tab) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", tab.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
}

/// One line of inline feedback: error (red) wins over an info message.
fn feedback_line(error: Option<&str>, info: Option<&str>) -> Paragraph<'static> {
    match (error, info) {
        (Some(err), _) => Paragraph::new(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )),
        (None, Some(info)) => Paragraph::new(Span::styled(
            info.to_string(),
            Style::default().fg(Color::Green),
        )),
        (None, None) => Paragraph::new(""),
    }
}

/// Render an edit buffer in a bordered box, scrolled so the cursor is
/// visible. Places the terminal cursor when `focused`.
fn draw_editor(f: &mut Frame, area: Rect, title: String, buffer: &TextBuffer, focused: bool) {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);

    let (row, col) = buffer.cursor();
    let row_off = row.saturating_sub(inner.height.saturating_sub(1) as usize);
    let col_off = col.saturating_sub(inner.width.saturating_sub(1) as usize);

    let lines: Vec<Line> = buffer.lines().iter().map(|l| Line::raw(l.as_str())).collect();
    let para = Paragraph::new(lines)
        .block(block)
        .scroll((clamp_u16(row_off), clamp_u16(col_off)));
    f.render_widget(para, area);

    if focused && inner.width > 0 && inner.height > 0 {
        let x = inner.x.saturating_add(clamp_u16(col - col_off));
        let y = inner.y.saturating_add(clamp_u16(row - row_off));
        f.set_cursor_position(Position::new(x, y));
    }
}

fn clamp_u16(n: usize) -> u16 {
    n.min(u16::MAX as usize) as u16
}

fn draw_database(f: &mut Frame, app: &ConsoleApp, area: Rect) {
    let block = panel_block(Tab::Database);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let db = &app.shell.database;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // query editor
            Constraint::Length(1), // feedback
            Constraint::Min(3),    // results
        ])
        .split(inner);

    draw_editor(f, chunks[0], " Query (F5 to run) ".into(), &db.query, true);

    let info = match &db.result {
        Some(QueryView::Executed {
            message,
            rows_affected,
        }) => Some(dashboard::format_executed(message, *rows_affected)),
        _ if db.pending => Some("Running...".to_string()),
        _ => None,
    };
    f.render_widget(feedback_line(db.error.as_deref(), info.as_deref()), chunks[1]);

    if let Some(QueryView::Table(table)) = &db.result {
        draw_result_table(f, table, chunks[2]);
    }
}

/// Render query rows. No header row when the result set is empty.
fn draw_result_table(f: &mut Frame, table: &ResultTable, area: Rect) {
    let block = Block::default()
        .title(format!(" Results ({}) ", dashboard::format_row_count(table.rows.len())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let widths: Vec<Constraint> = table
        .column_widths()
        .into_iter()
        .map(|w| Constraint::Length(clamp_u16(w.min(MAX_COLUMN_WIDTH))))
        .collect();

    let rows: Vec<Row> = table
        .rows
        .iter()
        .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))))
        .collect();

    let mut widget = Table::new(rows, widths).block(block).column_spacing(2);
    if !table.headers.is_empty() {
        let header = Row::new(table.headers.iter().map(|h| Cell::from(h.as_str()))).style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        widget = widget.header(header);
    }
    f.render_widget(widget, area);
}

fn draw_scripts(f: &mut Frame, app: &ConsoleApp, area: Rect) {
    let block = panel_block(Tab::Scripts);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let scripts = &app.shell.scripts;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(10)])
        .split(rows[0]);

    // Catalog
    let catalog_focused = app.scripts_focus == ScriptsFocus::Catalog;
    let list_block = Block::default()
        .title(" Catalog ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if catalog_focused {
            Color::Cyan
        } else {
            Color::DarkGray
        }));
    if scripts.catalog.is_empty() {
        let para = Paragraph::new(Span::styled(
            "No scripts.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(list_block);
        f.render_widget(para, cols[0]);
    } else {
        let items: Vec<ListItem> = scripts
            .catalog
            .names()
            .iter()
            .map(|n| ListItem::new(n.as_str()))
            .collect();
        let list = List::new(items)
            .block(list_block)
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(scripts.catalog.selected_index());
        f.render_stateful_widget(list, cols[0], &mut state);
    }

    // Editor
    let title = match scripts.catalog.selected() {
        Some(name) if scripts.loading => format!(" {name} (loading...) "),
        Some(name) => format!(" {name} [{}] ", ScriptLanguage::of(name).label()),
        None => " (no script) ".to_string(),
    };
    draw_editor(f, cols[1], title, &scripts.content, !catalog_focused);

    f.render_widget(
        feedback_line(scripts.error.as_deref(), scripts.notice.as_deref()),
        rows[1],
    );
}

fn draw_prompt(f: &mut Frame, app: &ConsoleApp, area: Rect) {
    let block = panel_block(Tab::Prompt);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let prompt = &app.shell.prompt;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    draw_editor(f, chunks[0], " Prompt (F5 to test) ".into(), &prompt.input, true);
    f.render_widget(feedback_line(prompt.error.as_deref(), None), chunks[1]);

    let title = if prompt.pending {
        " Response (waiting...) "
    } else {
        " Response "
    };
    let response = Paragraph::new(prompt.response.as_str())
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(response, chunks[2]);
}

fn draw_python(f: &mut Frame, app: &ConsoleApp, area: Rect) {
    let block = panel_block(Tab::Python);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let python = &app.shell.python;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(55),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(inner);

    draw_editor(f, chunks[0], " Code [python] (F5 to run) ".into(), &python.code, true);

    let info = python.running.then_some("Running...");
    f.render_widget(feedback_line(python.error.as_deref(), info), chunks[1]);

    // Output is hidden whenever an error is shown.
    let output = if python.error.is_some() {
        ""
    } else {
        python.output.as_str()
    };
    let para = Paragraph::new(output)
        .block(
            Block::default()
                .title(" Output ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(para, chunks[2]);
}
