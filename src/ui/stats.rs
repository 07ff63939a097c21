// Statistics sidebar.
// Completion progress gauge, status counts, and priority distribution.

use ratatui::{prelude::*, widgets::*};

use crate::stats::Stats;
use crate::todo::Priority;

use super::list::priority_color;

pub fn render_stats_panel(frame: &mut Frame, stats: &Stats, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Statistics ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Progress gauge
            Constraint::Length(2), // Status counts
            Constraint::Min(1),    // Priority distribution
        ])
        .split(inner);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .ratio(stats.progress())
        .label(format!(
            "{}/{} ({:.0}%)",
            stats.completed,
            stats.total,
            stats.progress() * 100.0
        ));
    frame.render_widget(gauge, chunks[0]);

    let counts = Line::from(vec![
        Span::styled("Pending ", Style::default().fg(Color::DarkGray)),
        Span::raw(stats.pending.to_string()),
        Span::styled("  Done ", Style::default().fg(Color::DarkGray)),
        Span::raw(stats.completed.to_string()),
        Span::styled("  Total ", Style::default().fg(Color::DarkGray)),
        Span::raw(stats.total.to_string()),
    ]);
    frame.render_widget(
        Paragraph::new(counts).alignment(Alignment::Center),
        chunks[1],
    );

    let bar_width = 12usize;
    let lines: Vec<Line> = Priority::ALL
        .iter()
        .map(|&priority| {
            let count = stats.count_for(priority);
            let filled = if stats.total > 0 {
                (count * bar_width).div_ceil(stats.total)
            } else {
                0
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<12}", priority.label()),
                    Style::default().fg(priority_color(priority)),
                ),
                Span::styled(
                    "█".repeat(filled),
                    Style::default().fg(priority_color(priority)),
                ),
                Span::styled(
                    "░".repeat(bar_width - filled),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(" {}", count)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[2]);
}
