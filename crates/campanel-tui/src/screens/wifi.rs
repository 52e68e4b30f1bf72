//! Wi-Fi tab: the connected network, saved profiles, and the scan.
//!
//! The screen draws whatever [`WifiView`] the panel last rendered and turns
//! key presses into the [`Intent`] of the selected control. The only state
//! it owns is the selection and the text typed into a revealed password
//! field.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use secrecy::SecretString;

use campanel_core::view::{Control, RowAction, WifiSection, WifiView};
use campanel_core::{Command, Intent, RowState, View};

use crate::action::Action;
use crate::component::Component;
use crate::screens::step;
use crate::theme;
use crate::widgets::{control_span, panel_block, signal_bars::signal_span};

/// A selectable control, addressed by its place in the view tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Toggle(usize),
    Forget(usize),
    Available(usize),
}

/// Selectable controls in display order.
fn slots(view: &WifiView) -> Vec<Slot> {
    let mut out = Vec::new();
    if let Some(known) = view.known() {
        for i in 0..known.rows.len() {
            out.push(Slot::Toggle(i));
            out.push(Slot::Forget(i));
        }
    }
    if let Some(available) = view.available() {
        out.extend((0..available.rows.len()).map(Slot::Available));
    }
    out
}

fn control_at(view: &WifiView, slot: Slot) -> Option<&Control> {
    match slot {
        Slot::Toggle(i) => view.known()?.rows.get(i).map(|r| &r.toggle),
        Slot::Forget(i) => view.known()?.rows.get(i).map(|r| &r.forget),
        Slot::Available(i) => view.available()?.rows.get(i).map(|r| r.action.control()),
    }
}

/// SSID of the row currently showing a password field.
fn revealed_ssid(view: &WifiView) -> Option<&str> {
    view.available()?.rows.iter().find_map(|row| match row.action {
        RowAction::PasswordEntry { .. } => Some(row.ssid.as_str()),
        _ => None,
    })
}

#[derive(Default)]
pub struct WifiScreen {
    view: Option<WifiView>,
    selected: usize,
    /// Typed password and the SSID it was typed for.
    password: String,
    password_ssid: Option<String>,
}

impl WifiScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> Vec<Slot> {
        self.view.as_ref().map(slots).unwrap_or_default()
    }

    fn selected_slot(&self) -> Option<Slot> {
        self.slots().get(self.selected).copied()
    }

    fn selected_control(&self) -> Option<&Control> {
        let view = self.view.as_ref()?;
        control_at(view, self.selected_slot()?)
    }

    /// SSID being typed for, when the selection sits on a password field.
    fn entering_password(&self) -> Option<&str> {
        match &self.selected_control()?.intent {
            Intent::SubmitPassword { ssid } => Some(ssid),
            _ => None,
        }
    }

    fn move_selection(&mut self, delta: isize) {
        self.selected = step(self.selected, delta, self.slots().len());
    }

    fn set_view(&mut self, view: &View) {
        self.view = match view {
            View::Wifi(wifi) => Some(wifi.clone()),
            _ => None,
        };
        self.selected = step(self.selected, 0, self.slots().len());

        let revealed = self.view.as_ref().and_then(revealed_ssid);
        if revealed != self.password_ssid.as_deref() {
            self.password.clear();
            self.password_ssid = revealed.map(str::to_owned);
        }
    }

    fn handle_password_key(&mut self, ssid: String, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.password.clear();
                Some(Action::HidePassword)
            }
            KeyCode::Enter => {
                let password = SecretString::from(std::mem::take(&mut self.password));
                Some(Action::Invoke(Intent::Run(Command::ConnectNew {
                    ssid,
                    password,
                })))
            }
            KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Tab => {
                self.move_selection(1);
                None
            }
            KeyCode::Backspace => {
                self.password.pop();
                None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.password.push(c);
                None
            }
            _ => None,
        }
    }

    #[allow(clippy::too_many_lines)]
    fn render_lines(&self, view: &WifiView) -> (Vec<Line<'static>>, usize) {
        let selected = self.selected_slot();
        let mut lines = Vec::new();
        let mut selected_line = 0;

        for section in &view.sections {
            match section {
                WifiSection::Active(active) => {
                    lines.push(Line::from(Span::styled(active.heading, theme::section_heading())));
                    lines.push(Line::from(Span::styled(
                        format!("  {}", active.ssid_line),
                        theme::row(),
                    )));
                    lines.push(Line::from(vec![
                        Span::styled(format!("  {}  ", active.signal_line), theme::row()),
                        signal_span(active.signal),
                    ]));
                }
                WifiSection::Known(known) => {
                    lines.push(Line::from(Span::styled(known.heading, theme::section_heading())));
                    for (i, row) in known.rows.iter().enumerate() {
                        let toggle_selected = selected == Some(Slot::Toggle(i));
                        let forget_selected = selected == Some(Slot::Forget(i));
                        if toggle_selected || forget_selected {
                            selected_line = lines.len();
                        }
                        let state_color = if row.autoconnect.is_yes() {
                            theme::SUCCESS_GREEN
                        } else {
                            theme::BORDER_GRAY
                        };
                        lines.push(Line::from(vec![
                            Span::styled(format!("  {:<24}", row.name), theme::row()),
                            Span::styled(
                                format!("{:<18}", row.autoconnect_label),
                                Style::default().fg(state_color),
                            ),
                            control_span(&row.toggle.label, toggle_selected),
                            Span::raw(" "),
                            control_span(&row.forget.label, forget_selected),
                        ]));
                    }
                }
                WifiSection::Available(available) => {
                    lines.push(Line::from(Span::styled(
                        available.heading,
                        theme::section_heading(),
                    )));
                    if available.rows.is_empty() {
                        lines.push(Line::from(Span::styled(
                            "  No networks in range",
                            theme::key_hint(),
                        )));
                    }
                    for (i, row) in available.rows.iter().enumerate() {
                        let is_selected = selected == Some(Slot::Available(i));
                        if is_selected {
                            selected_line = lines.len();
                        }
                        let marker = match row.state {
                            RowState::Active => Span::styled("● ", Style::default().fg(theme::SUCCESS_GREEN)),
                            RowState::Known => Span::styled("○ ", Style::default().fg(theme::NEON_CYAN)),
                            RowState::Unknown => Span::raw("  "),
                        };
                        let mut spans = vec![
                            Span::raw("  "),
                            marker,
                            Span::styled(format!("{:<24}", row.ssid), theme::row()),
                            signal_span(row.signal),
                            Span::styled(format!("  {:<13}", row.signal_line), theme::key_hint()),
                        ];
                        match &row.action {
                            RowAction::PasswordEntry {
                                placeholder,
                                confirm,
                            } => {
                                spans.extend(self.password_spans(placeholder, is_selected));
                                spans.push(Span::raw(" "));
                                spans.push(control_span(&confirm.label, is_selected));
                            }
                            RowAction::Connect(control) | RowAction::Disconnect(control) => {
                                spans.push(control_span(&control.label, is_selected));
                            }
                        }
                        lines.push(Line::from(spans));
                    }
                }
            }
            lines.push(Line::from(""));
        }

        (lines, selected_line)
    }

    fn password_spans(&self, placeholder: &str, editing: bool) -> Vec<Span<'static>> {
        let field = if self.password.is_empty() {
            Span::styled(format!("{placeholder:<16}"), theme::key_hint())
        } else {
            let masked = "•".repeat(self.password.chars().count());
            Span::styled(format!("{masked:<16}"), Style::default().fg(theme::NEON_CYAN))
        };
        let cursor = if editing {
            Span::styled("█", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else {
            Span::raw(" ")
        };
        vec![
            Span::styled("Password: ", theme::row()),
            field,
            cursor,
        ]
    }
}

impl Component for WifiScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(ssid) = self.entering_password().map(str::to_owned) {
            return Ok(self.handle_password_key(ssid, key));
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.selected = 0;
                None
            }
            KeyCode::Char('G') => {
                self.selected = self.slots().len().saturating_sub(1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self
                .selected_control()
                .map(|control| Action::Invoke(control.intent.clone())),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewChanged(view) = action {
            self.set_view(Arc::as_ref(view));
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(view) = &self.view else {
            return;
        };
        let block = panel_block(view.title);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (lines, selected_line) = self.render_lines(view);
        let height = usize::from(inner.height.max(1));
        let offset = selected_line.saturating_sub(height - 1);
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), inner);
    }

    fn captures_input(&self) -> bool {
        self.entering_password().is_some()
    }

    fn key_hints(&self) -> &'static str {
        if self.captures_input() {
            "type password  Enter confirm  Esc cancel"
        } else {
            "j/k move  Enter select"
        }
    }
}
