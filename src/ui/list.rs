// Task list rendering.
// Priority-colored dot, task text (dimmed and struck through when done),
// and a relative updated-at timestamp per row.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::store::TodoStore;
use crate::todo::Priority;

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Color for a priority dot, matching the production score colors
/// (red / yellow / green / gray from high to low).
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::MediumHigh => Color::Yellow,
        Priority::Medium => Color::Green,
        Priority::Low => Color::Gray,
    }
}

pub fn render_todo_list<S: TodoStore>(frame: &mut Frame, app: &mut App<S>, area: Rect) {
    let title = if app.skipped > 0 {
        format!(" Todos ({} records skipped) ", app.skipped)
    } else {
        " Todos ".to_string()
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if app.todos.is_empty() {
        let text = Paragraph::new("No tasks yet! Press a to add your first task.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .todos
        .iter()
        .map(|todo| {
            let task_style = if todo.completed() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default()
            };
            let marker = if todo.completed() { "✓" } else { " " };

            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(priority_color(todo.priority))),
                Span::styled(format!("{} ", marker), Style::default().fg(Color::Green)),
                Span::styled(todo.task.clone(), task_style),
                Span::styled(
                    format!("  {}", format_relative_time(&todo.updated_at)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.list_state);
}
