//! Camera tab: the camera's wired address, its Wi-Fi address, and power
//! controls. Editing the wired address opens a two-field form.

use std::sync::Arc;

use campanel_api::IpAndMask;
use campanel_core::view::{CameraView, Control};
use campanel_core::{Command, Intent, View};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::action::Action;
use crate::component::Component;
use crate::screens::step;
use crate::theme;
use crate::widgets::{control_span, panel_block};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Ip,
    Mask,
}

/// The ethernet address editor.
#[derive(Debug, Clone)]
struct EthernetForm {
    ip: String,
    mask: String,
    field: Field,
    error: Option<String>,
}

impl EthernetForm {
    fn from_current(current: &IpAndMask) -> Self {
        Self {
            ip: current.ip.clone(),
            mask: current.mask.clone(),
            field: Field::Ip,
            error: None,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.field {
            Field::Ip => &mut self.ip,
            Field::Mask => &mut self.mask,
        }
    }

    fn next_field(&mut self) {
        self.field = match self.field {
            Field::Ip => Field::Mask,
            Field::Mask => Field::Ip,
        };
    }

    /// Addresses only need digits and dots.
    fn push(&mut self, c: char) {
        if c.is_ascii_digit() || c == '.' {
            self.focused_mut().push(c);
            self.error = None;
        }
    }

    fn pop(&mut self) {
        self.focused_mut().pop();
        self.error = None;
    }

    fn submit(&self) -> Result<Command, String> {
        Command::set_ethernet(&self.ip, &self.mask).map_err(|e| e.message().to_owned())
    }
}

#[derive(Default)]
pub struct CameraScreen {
    view: Option<CameraView>,
    selected: usize,
    edit: Option<EthernetForm>,
}

impl CameraScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Card controls first, then the system controls.
    fn controls(&self) -> Vec<&Control> {
        let Some(view) = &self.view else {
            return Vec::new();
        };
        view.cards
            .iter()
            .flat_map(|card| card.controls.iter())
            .chain(view.system.iter())
            .collect()
    }

    fn move_selection(&mut self, delta: isize) {
        self.selected = step(self.selected, delta, self.controls().len());
    }

    fn activate(&mut self) -> Option<Action> {
        let intent = self.controls().get(self.selected)?.intent.clone();
        match intent {
            Intent::EditEthernet { current } => {
                self.edit = Some(EthernetForm::from_current(&current));
                None
            }
            other => Some(Action::Invoke(other)),
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Option<Action> {
        let form = self.edit.as_mut()?;
        match key.code {
            KeyCode::Esc => {
                self.edit = None;
                None
            }
            KeyCode::Enter => match form.submit() {
                Ok(command) => {
                    self.edit = None;
                    Some(Action::Invoke(Intent::Run(command)))
                }
                Err(message) => {
                    form.error = Some(message);
                    None
                }
            },
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                form.next_field();
                None
            }
            KeyCode::Backspace => {
                form.pop();
                None
            }
            KeyCode::Char(c) => {
                form.push(c);
                None
            }
            _ => None,
        }
    }

    fn render_form(frame: &mut Frame, area: Rect, form: &EthernetForm) {
        let overlay_w = 46u16.min(area.width.saturating_sub(4));
        let overlay_h = 9u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .title(" Edit Ethernet Address ")
            .title_style(
                Style::default()
                    .fg(theme::ELECTRIC_YELLOW)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(theme::border_focused());
        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let label = Style::default().fg(theme::DIM_WHITE);
        let focused_label = Style::default()
            .fg(theme::ELECTRIC_YELLOW)
            .add_modifier(Modifier::BOLD);
        let value = Style::default().fg(theme::NEON_CYAN);

        let field_line = |name: &str, text: &str, field: Field| {
            let focused = form.field == field;
            let style = if focused { focused_label } else { label };
            Line::from(vec![
                Span::styled(if focused { "▸ " } else { "  " }, style),
                Span::styled(format!("{name:<8}"), style),
                Span::styled(text.to_owned(), value),
                Span::styled(
                    if focused { "▎" } else { "" },
                    Style::default().fg(theme::ELECTRIC_YELLOW),
                ),
            ])
        };

        let mut lines = vec![
            Line::from(""),
            field_line("IP", &form.ip, Field::Ip),
            field_line("Mask", &form.mask, Field::Mask),
            Line::from(Span::styled(
                "          prefix (24) or dotted (255.255.255.0)",
                theme::key_hint(),
            )),
        ];
        lines.push(match &form.error {
            Some(message) => Line::from(Span::styled(
                format!("  ✗ {message}"),
                Style::default().fg(theme::ERROR_RED),
            )),
            None => Line::from(""),
        });
        lines.push(Line::from(vec![
            Span::styled(" Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for CameraScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.edit.is_some() {
            return Ok(self.handle_form_key(key));
        }

        let action = match key.code {
            KeyCode::Char('j' | 'l') | KeyCode::Down | KeyCode::Right => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k' | 'h') | KeyCode::Up | KeyCode::Left => {
                self.move_selection(-1);
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewChanged(view) = action {
            self.view = match Arc::as_ref(view) {
                View::Camera(camera) => Some(camera.clone()),
                _ => None,
            };
            if self.view.is_none() {
                self.edit = None;
            }
            self.selected = step(self.selected, 0, self.controls().len());
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(view) = &self.view else {
            return;
        };
        let block = panel_block("Camera");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut index = 0usize;
        let mut next_control = |control: &Control| {
            let span = control_span(&control.label, index == self.selected);
            index += 1;
            span
        };

        let mut lines = vec![Line::from("")];
        if let Some(placeholder) = view.placeholder {
            lines.push(
                Line::from(Span::styled(placeholder, theme::key_hint()))
                    .alignment(Alignment::Center),
            );
        }
        for card in &view.cards {
            lines.push(Line::from(vec![
                Span::styled("  ● ", Style::default().fg(theme::SUCCESS_GREEN)),
                Span::styled(card.title.clone(), theme::title_style()),
            ]));
            lines.push(Line::from(Span::styled(
                format!("    {}", card.mask_line),
                theme::row(),
            )));
            let mut spans = vec![Span::raw("    ")];
            for control in &card.controls {
                spans.push(next_control(control));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", view.wifi_line),
            theme::row(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("  System", theme::section_heading())));
        let mut spans = vec![Span::raw("    ")];
        for control in &view.system {
            spans.push(next_control(control));
            spans.push(Span::raw(" "));
        }
        lines.push(Line::from(spans));

        frame.render_widget(Paragraph::new(lines), inner);

        if let Some(form) = &self.edit {
            Self::render_form(frame, area, form);
        }
    }

    fn captures_input(&self) -> bool {
        self.edit.is_some()
    }

    fn key_hints(&self) -> &'static str {
        if self.edit.is_some() {
            "Tab next field  Enter save  Esc cancel"
        } else {
            "←/→ move  Enter select"
        }
    }
}
