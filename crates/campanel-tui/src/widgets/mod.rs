//! Small rendering helpers shared by the tab screens.

pub mod signal_bars;

use campanel_core::view::FailureView;
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::theme;

/// A control drawn as `[ Label ]`.
pub fn control_span(label: &str, selected: bool) -> Span<'static> {
    let style = if selected {
        theme::control_selected()
    } else {
        theme::control()
    };
    Span::styled(format!("[ {label} ]"), style)
}

/// The outer block every tab screen draws into.
pub fn panel_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
}

/// A load failure in place of the whole content panel.
pub fn render_failure(frame: &mut Frame, area: Rect, view: &FailureView) {
    let block = Block::default()
        .title(format!(" {} ", view.heading))
        .title_style(Style::default().fg(theme::ERROR_RED))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ERROR_RED));

    let mut lines = vec![Line::from("")];
    lines.extend(view.lines.iter().map(|line| {
        Line::from(vec![
            Span::styled("  ✗ ", Style::default().fg(theme::ERROR_RED)),
            Span::styled(line.clone(), theme::row()),
        ])
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {}", view.hint),
        theme::key_hint(),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}
