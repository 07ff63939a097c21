// Modal UI components.
// Add/edit form and delete confirmation, centered over the main view.

use ratatui::{prelude::*, widgets::*};

use crate::app::TaskForm;
use crate::todo::Priority;

use super::list::priority_color;

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

/// Draw the add/edit form modal on top of the current view.
pub fn draw_form_modal(frame: &mut Frame, title: &str, form: &TaskForm, show_completed: bool) {
    let modal_area = centered_rect(frame.area(), 60, 10);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Task input
            Constraint::Length(3), // Priority selector (+ completed toggle)
            Constraint::Length(2), // Instructions
        ])
        .split(modal_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title.to_string());

    let input_line = Line::from(vec![
        Span::styled("Task: ", Style::default().fg(Color::DarkGray)),
        Span::raw(form.task.clone()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[0]);

    let fields_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let mut fields_line = vec![Span::styled(
        "Priority: ",
        Style::default().fg(Color::DarkGray),
    )];
    for priority in Priority::ALL {
        let style = if priority == form.priority {
            Style::default()
                .fg(priority_color(priority))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        fields_line.push(Span::styled(format!("{} ", priority.label()), style));
    }
    if show_completed {
        fields_line.push(Span::styled(
            "  Completed: ",
            Style::default().fg(Color::DarkGray),
        ));
        fields_line.push(Span::styled(
            if form.completed { "[x]" } else { "[ ]" },
            Style::default().fg(Color::Green),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(fields_line)).block(fields_block),
        chunks[1],
    );

    let mut instructions = vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Save  ", Style::default().fg(Color::DarkGray)),
        Span::styled("←→", Style::default().fg(Color::Yellow)),
        Span::styled(" = Priority  ", Style::default().fg(Color::DarkGray)),
    ];
    if show_completed {
        instructions.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
        instructions.push(Span::styled(
            " = Completed  ",
            Style::default().fg(Color::DarkGray),
        ));
    }
    instructions.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
    instructions.push(Span::styled(" = Cancel ", Style::default().fg(Color::DarkGray)));

    frame.render_widget(
        Paragraph::new(Line::from(instructions)).alignment(Alignment::Center),
        chunks[2],
    );
}

/// Draw the delete confirmation modal.
pub fn draw_confirm_modal(frame: &mut Frame, task: &str) {
    let modal_area = centered_rect(frame.area(), 50, 5);
    frame.render_widget(Clear, modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Delete Task ");

    let text = vec![
        Line::from(Span::raw(format!("Delete \"{}\"?", task))),
        Line::from(vec![
            Span::styled("y", Style::default().fg(Color::Yellow)),
            Span::styled(" = Delete  ", Style::default().fg(Color::DarkGray)),
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::styled(" = Cancel", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).block(block),
        modal_area,
    );
}
