//! Wi-Fi signal strength bars: ▂▄▆█ with color thresholds.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

/// Styled bars for a signal quality percentage as the device reports it.
///
/// | Bars    | Percent  | Color          |
/// |---------|----------|----------------|
/// | `▂▄▆█` | >= 75    | Success Green  |
/// | `▂▄▆ ` | 50 - 74  | Neon Cyan      |
/// | `▂▄  ` | 30 - 49  | Electric Yellow|
/// | `▂   ` | 10 - 29  | Coral          |
/// | `·   ` | < 10     | Error Red      |
pub fn signal_span(percent: u8) -> Span<'static> {
    let (bars, color) = bars_for(percent);
    Span::styled(bars, Style::default().fg(color))
}

fn bars_for(percent: u8) -> (&'static str, ratatui::style::Color) {
    match percent {
        75.. => ("▂▄▆█", theme::SUCCESS_GREEN),
        50..=74 => ("▂▄▆ ", theme::NEON_CYAN),
        30..=49 => ("▂▄  ", theme::ELECTRIC_YELLOW),
        10..=29 => ("▂   ", theme::CORAL),
        _ => ("·   ", theme::ERROR_RED),
    }
}
