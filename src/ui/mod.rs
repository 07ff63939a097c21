// UI module for rendering the TUI.
// Task list on the left, statistics sidebar on the right, status bar below;
// add/edit/confirm modals render on top.

mod list;
mod modal;
mod stats;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Mode};
use crate::store::TodoStore;

/// Main draw function that renders the entire UI.
pub fn draw<S: TodoStore>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(32)])
        .split(chunks[0]);

    list::render_todo_list(frame, app, content[0]);
    stats::render_stats_panel(frame, &app.stats, content[1]);
    draw_status_bar(frame, app, chunks[1]);

    // Modals render last, on top of everything.
    match &app.mode {
        Mode::Normal => {}
        Mode::Adding(form) => modal::draw_form_modal(frame, " Add Task ", form, false),
        Mode::Editing { form, .. } => modal::draw_form_modal(frame, " Edit Task ", form, true),
        Mode::ConfirmDelete { task, .. } => modal::draw_confirm_modal(frame, task),
    }
}

/// Draw the status bar: feedback message if any, keybinding hints otherwise.
fn draw_status_bar<S: TodoStore>(frame: &mut Frame, app: &App<S>, area: Rect) {
    if let Some(status) = &app.status {
        let color = if status.is_error {
            Color::Red
        } else {
            Color::Green
        };
        let line = Line::from(Span::styled(
            format!(" {}", status.message),
            Style::default().fg(color),
        ));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  ␣ "),
        Span::styled("Toggle", Style::default().fg(Color::DarkGray)),
        Span::raw("  a "),
        Span::styled("Add", Style::default().fg(Color::DarkGray)),
        Span::raw("  e "),
        Span::styled("Edit", Style::default().fg(Color::DarkGray)),
        Span::raw("  d "),
        Span::styled("Delete", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}
