//! Application core: event loop, tab control, action dispatch.
//!
//! The [`Panel`] from `campanel-core` is the single source of truth for what
//! the content area shows. Loads and mutations run in spawned tasks and
//! report back as actions tagged with the panel's [`Ticket`]; the panel
//! drops results from superseded tickets.

use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Tabs},
};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use campanel_api::DeviceClient;
use campanel_core::view::LOADING_TEXT;
use campanel_core::{
    Busy, Command, CommandResult, CoreError, Intent, Panel, Tab, Ticket, View, load, run_mutation,
};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventPump};
use crate::screens::create_screen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{panel_block, render_failure};

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);
const RENDER_RATE: Duration = Duration::from_millis(33);

/// Top-level application state and event loop.
pub struct App {
    client: DeviceClient,
    panel: Panel,
    /// Last view rendered from `panel`.
    view: Arc<View>,
    /// Screen for the active tab. Replaced on every tab activation.
    screen: Box<dyn Component>,
    running: bool,
    help_visible: bool,
    tick_rate: Duration,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    notification: Option<(Notification, Instant)>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl App {
    pub fn new(client: DeviceClient, tab: Tab, tick_rate: Duration) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let panel = Panel::new(tab);
        Self {
            client,
            view: Arc::new(panel.view()),
            panel,
            screen: create_screen(tab),
            running: true,
            help_visible: false,
            tick_rate,
            action_tx,
            action_rx,
            pending_confirm: None,
            notification: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        let mut events = EventPump::start(self.tick_rate, RENDER_RATE);

        self.action_tx
            .send(Action::SwitchTab(self.panel.active_tab()))?;

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        drop(events);
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// everything else goes to the active tab's screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if self.screen.captures_input() {
            return self.screen.handle_key_event(key);
        }

        let active = self.panel.active_tab();
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                return Ok(Some(Action::ToggleHelp));
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => return Ok(Some(Action::Refresh)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => {
                let index = c as usize - '1' as usize;
                return Ok(Tab::from_index(index).map(Action::SwitchTab));
            }
            (KeyModifiers::NONE, KeyCode::Tab) => return Ok(Some(Action::SwitchTab(active.next()))),
            (_, KeyCode::BackTab) => return Ok(Some(Action::SwitchTab(active.prev()))),
            (KeyModifiers::NONE, KeyCode::Esc) if self.notification.is_some() => {
                return Ok(Some(Action::DismissNotification));
            }
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    /// Process a single action: update app state and propagate to the screen.
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Tick => {
                self.throbber_state.calc_next();
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, shown_at)| shown_at.elapsed() >= NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
            }

            Action::Render => {}

            // ── Tab controller ───────────────────────────────────────
            Action::SwitchTab(tab) => {
                debug!("activating tab: {} → {tab}", self.panel.active_tab());
                self.screen = create_screen(*tab);
                let ticket = self.panel.activate(*tab);
                self.spawn_load(ticket);
                self.publish()?;
            }

            Action::Refresh => {
                let ticket = self.panel.refresh();
                self.spawn_load(ticket);
                self.publish()?;
            }

            Action::Loaded(ticket, result) => {
                let result = (**result).clone();
                if let Err(e) = &result {
                    warn!(tab = %ticket.tab, error = %e, "tab failed to load");
                }
                if self.panel.resolve(*ticket, result) {
                    self.publish()?;
                }
            }

            // ── Dispatcher ───────────────────────────────────────────
            Action::Invoke(intent) => self.invoke(intent.clone())?,

            Action::HidePassword => {
                self.panel.hide_password();
                self.publish()?;
            }

            Action::MutationDone(ticket, outcome) => {
                self.notify(mutation_notification(&outcome.command, &outcome.result))?;
                if self.panel.resolve_mutation(*ticket, outcome.reload.clone()) {
                    self.publish()?;
                }
            }

            // ── Confirmation dialog ──────────────────────────────────
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(confirm.clone()),

            Action::ConfirmYes => {
                if let Some(ConfirmAction(command)) = self.pending_confirm.take() {
                    self.dispatch(command)?;
                }
            }

            Action::ConfirmNo => self.pending_confirm = None,

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::DismissNotification => self.notification = None,

            Action::ViewChanged(_) => {
                if let Some(follow_up) = self.screen.update(action)? {
                    self.action_tx.send(follow_up)?;
                }
            }
        }

        Ok(())
    }

    fn notify(&self, notification: Notification) -> Result<()> {
        self.action_tx.send(Action::Notify(notification))?;
        Ok(())
    }

    /// Re-render the panel and hand the new tree to the screen.
    fn publish(&mut self) -> Result<()> {
        self.view = Arc::new(self.panel.view());
        self.action_tx
            .send(Action::ViewChanged(Arc::clone(&self.view)))?;
        Ok(())
    }

    fn invoke(&mut self, intent: Intent) -> Result<()> {
        if intent.is_mutating() && self.panel.is_mutating() {
            return self.notify(busy_notification());
        }
        match intent {
            Intent::Run(command) if command.needs_confirmation() => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction(command)))?;
            }
            Intent::Run(command) => self.dispatch(command)?,
            Intent::RevealPassword { ssid } => {
                self.panel.toggle_password(&ssid);
                self.publish()?;
            }
            Intent::OpenCamera { url } => {
                self.notify(Notification::info(format!("Camera web UI: {url}")))?;
            }
            Intent::SubmitPassword { .. } | Intent::EditEthernet { .. } => {
                debug!("intent is handled inside the screen");
            }
        }
        Ok(())
    }

    /// Loading placeholder, then the command, then a full reload of the tab.
    fn dispatch(&mut self, command: Command) -> Result<()> {
        let ticket = match self.panel.begin_mutation() {
            Ok(ticket) => ticket,
            Err(Busy) => {
                return self.notify(busy_notification());
            }
        };
        info!(command = %command.describe(), generation = ticket.generation, "dispatching");
        self.publish()?;

        let client = self.client.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = run_mutation(ticket.tab, command, &client).await;
            let _ = tx.send(Action::MutationDone(ticket, Box::new(outcome)));
        });
        Ok(())
    }

    fn spawn_load(&self, ticket: Ticket) {
        let client = self.client.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = load(ticket.tab, &client).await;
            let _ = tx.send(Action::Loaded(ticket, Box::new(result)));
        });
    }

    // ── Rendering ─────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Min(1),    // Content panel
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        match self.view.as_ref() {
            View::Loading => self.render_loading(frame, layout[0]),
            View::Failed(failure) => render_failure(frame, layout[0], failure),
            View::Camera(_) | View::Wifi(_) => self.screen.render(frame, layout[0]),
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays, last drawn is topmost.
        if let Some((ref notif, _)) = self.notification {
            render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let block = panel_block(&self.panel.active_tab().to_string());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);
        let columns = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(u16::try_from(LOADING_TEXT.len() + 4).unwrap_or(u16::MAX)),
            Constraint::Min(0),
        ])
        .split(rows[1]);

        let throbber = throbber_widgets_tui::Throbber::default()
            .label(LOADING_TEXT)
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, columns[1], &mut self.throbber_state.clone());
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.panel.active_tab();
        let titles: Vec<Line> = Tab::iter()
            .map(|tab| {
                let style = if tab == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(format!(" {} {tab} ", tab.index() + 1), style))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(active.index());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let host = self.client.host().unwrap_or("device").to_owned();
        let indicator = if self.panel.is_mutating() {
            Span::styled(
                format!("◐ {host} applying change"),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            )
        } else if self.panel.is_loading() {
            Span::styled(format!("◐ {host}"), Style::default().fg(theme::ELECTRIC_YELLOW))
        } else if matches!(self.view.as_ref(), View::Failed(_)) {
            Span::styled(format!("○ {host}"), Style::default().fg(theme::ERROR_RED))
        } else {
            Span::styled(format!("● {host}"), Style::default().fg(theme::SUCCESS_GREEN))
        };

        let mut spans = vec![Span::raw(" "), indicator];
        let screen_hints = self.screen.key_hints();
        if !screen_hints.is_empty() {
            spans.push(Span::styled(format!(" │ {screen_hints}"), theme::key_hint()));
        }
        spans.push(Span::styled(" │ r refresh  ? help  q quit", theme::key_hint()));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn busy_notification() -> Notification {
    Notification::warning("Another change is still being applied")
}

/// Toast for a finished command. The reload that follows is shown
/// regardless.
fn mutation_notification(
    command: &Command,
    result: &Result<CommandResult, CoreError>,
) -> Notification {
    match result {
        Ok(CommandResult::Ok(Some(message))) if !message.trim().is_empty() => {
            Notification::success(message.trim())
        }
        Ok(CommandResult::Ok(_)) => Notification::success(format!("{}: done", command.describe())),
        Ok(CommandResult::Address(applied)) => Notification::success(format!(
            "Ethernet address set to {}/{}",
            applied.ip, applied.mask
        )),
        Err(e) => Notification::error(format!("{} failed: {}", command.describe(), e.message())),
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_width = 52u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(4));

    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        help_area,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |key: &'static str, text: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(text, theme::key_hint()),
        ])
    };

    let help_text = vec![
        Line::from(""),
        entry("1 / 2", "Camera / Wi-Fi tab"),
        entry("Tab", "Next tab"),
        entry("j/k ↑/↓", "Move between controls"),
        entry("Enter", "Activate control"),
        entry("Esc", "Cancel password / form"),
        entry("r", "Reload the current tab"),
        Line::from(""),
        entry("?", "This help"),
        entry("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled("  Esc or ? to close", theme::key_hint())),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}

fn render_confirm_dialog(frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
    let width = 50u16.min(area.width.saturating_sub(4));
    let height = 5u16;

    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        dialog_area,
    );

    let block = Block::default()
        .title(" Confirm ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::ELECTRIC_YELLOW));

    let inner = block.inner(dialog_area);
    frame.render_widget(block, dialog_area);

    let text = vec![
        Line::from(Span::styled(
            format!("  {confirm}"),
            Style::default().fg(theme::DIM_WHITE),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y ", theme::key_hint_key()),
            Span::styled("confirm    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text), inner);
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len
        .saturating_add(6)
        .clamp(20, 70)
        .min(area.width);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width, height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(
        Block::default().style(Style::default().bg(theme::BG_DARK)),
        toast_area,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use campanel_api::{IpAndMask, TransportConfig, WifiNetwork, YesNo};
    use campanel_core::view::RowAction;
    use campanel_core::{LoadError, MutationOutcome, TabData, WifiSnapshot};
    use pretty_assertions::assert_eq;

    /// Nothing listens here; spawned requests fail in the background.
    fn app(tab: Tab) -> App {
        let client = DeviceClient::new(
            "http://127.0.0.1:9".parse().unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        App::new(client, tab, Duration::from_millis(250))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn drain(app: &mut App) {
        while let Ok(action) = app.action_rx.try_recv() {
            app.process_action(&action).unwrap();
        }
    }

    fn wifi_snapshot() -> WifiSnapshot {
        WifiSnapshot {
            available: vec![WifiNetwork {
                ssid: "Cafe".into(),
                signal: 40,
                active: YesNo::No,
            }],
            ..WifiSnapshot::default()
        }
    }

    /// Resolve the active tab's load with `data`, as a finished task would.
    fn loaded(app: &mut App, data: TabData) {
        let ticket = app.panel.refresh();
        app.process_action(&Action::Loaded(ticket, Box::new(Ok(data))))
            .unwrap();
        drain(app);
    }

    #[test]
    fn number_keys_and_tab_switch_tabs() {
        let mut app = app(Tab::Camera);
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('2'))).unwrap(),
            Some(Action::SwitchTab(Tab::Wifi))
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('1'))).unwrap(),
            Some(Action::SwitchTab(Tab::Camera))
        ));
        assert!(app.handle_key_event(key(KeyCode::Char('3'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Tab)).unwrap(),
            Some(Action::SwitchTab(Tab::Wifi))
        ));
        assert!(matches!(
            app.handle_key_event(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT))
                .unwrap(),
            Some(Action::SwitchTab(Tab::Wifi))
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('r'))).unwrap(),
            Some(Action::Refresh)
        ));
    }

    #[test]
    fn confirm_dialog_captures_input() {
        let mut app = app(Tab::Camera);
        app.pending_confirm = Some(ConfirmAction(Command::Reboot));
        assert!(app.handle_key_event(key(KeyCode::Char('q'))).unwrap().is_none());
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Char('y'))).unwrap(),
            Some(Action::ConfirmYes)
        ));
        assert!(matches!(
            app.handle_key_event(key(KeyCode::Esc)).unwrap(),
            Some(Action::ConfirmNo)
        ));
        assert!(matches!(
            app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
                .unwrap(),
            Some(Action::Quit)
        ));
    }

    #[tokio::test]
    async fn switching_tabs_shows_loading_and_drops_old_content() {
        let mut app = app(Tab::Camera);
        loaded(
            &mut app,
            TabData::Camera(campanel_core::CameraSnapshot {
                ethernet: IpAndMask {
                    ip: "10.0.0.2".into(),
                    mask: "24".into(),
                },
                wifi: None,
            }),
        );
        assert!(matches!(app.view.as_ref(), View::Camera(_)));

        app.process_action(&Action::SwitchTab(Tab::Wifi)).unwrap();
        drain(&mut app);
        assert_eq!(app.panel.active_tab(), Tab::Wifi);
        assert!(matches!(app.view.as_ref(), View::Loading));
        assert!(app.panel.data().is_none());
    }

    #[tokio::test]
    async fn power_commands_wait_for_confirmation() {
        let mut app = app(Tab::Camera);
        app.process_action(&Action::Invoke(Intent::Run(Command::Shutdown)))
            .unwrap();
        drain(&mut app);
        assert!(matches!(
            app.pending_confirm,
            Some(ConfirmAction(Command::Shutdown))
        ));
        assert!(!app.panel.is_mutating());

        app.process_action(&Action::ConfirmNo).unwrap();
        assert!(app.pending_confirm.is_none());
        assert!(!app.panel.is_mutating());
    }

    #[tokio::test]
    async fn second_mutation_is_refused_while_one_runs() {
        let mut app = app(Tab::Wifi);
        loaded(&mut app, TabData::Wifi(wifi_snapshot()));

        app.process_action(&Action::Invoke(Intent::Run(Command::Forget {
            name: "Old".into(),
        })))
        .unwrap();
        drain(&mut app);
        assert!(app.panel.is_mutating());
        assert!(matches!(app.view.as_ref(), View::Loading));

        app.process_action(&Action::Invoke(Intent::Run(Command::Disconnect {
            name: "Cafe".into(),
        })))
        .unwrap();
        drain(&mut app);
        let (notification, _) = app.notification.clone().unwrap();
        assert_eq!(notification, busy_notification());
    }

    #[tokio::test]
    async fn reveal_is_local_and_does_not_reload() {
        let mut app = app(Tab::Wifi);
        loaded(&mut app, TabData::Wifi(wifi_snapshot()));
        let generation = app.panel.generation();

        app.process_action(&Action::Invoke(Intent::RevealPassword {
            ssid: "Cafe".into(),
        }))
        .unwrap();
        drain(&mut app);

        assert_eq!(app.panel.generation(), generation);
        let View::Wifi(view) = app.view.as_ref() else {
            panic!("expected wifi view");
        };
        assert!(matches!(
            view.available().unwrap().rows[0].action,
            RowAction::PasswordEntry { .. }
        ));
        assert!(app.screen.captures_input());

        app.process_action(&Action::HidePassword).unwrap();
        drain(&mut app);
        assert!(!app.screen.captures_input());
    }

    #[tokio::test]
    async fn finished_mutation_reloads_and_reports_failure() {
        let mut app = app(Tab::Wifi);
        let ticket = app.panel.begin_mutation().unwrap();
        let outcome = MutationOutcome {
            command: Command::Forget { name: "Old".into() },
            result: Err(CoreError::Rejected {
                status: 500,
                message: "nmcli failed".into(),
            }),
            reload: Ok(TabData::Wifi(wifi_snapshot())),
        };

        app.process_action(&Action::MutationDone(ticket, Box::new(outcome)))
            .unwrap();
        drain(&mut app);

        assert!(!app.panel.is_mutating());
        assert!(matches!(app.view.as_ref(), View::Wifi(_)));
        let (notification, _) = app.notification.clone().unwrap();
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "Forgetting Old failed: nmcli failed");
    }

    #[tokio::test]
    async fn failed_load_renders_failure_view() {
        let mut app = app(Tab::Camera);
        let ticket = app.panel.refresh();
        app.process_action(&Action::Loaded(
            ticket,
            Box::new(Err(LoadError::Camera(CoreError::Unreachable {
                message: "refused".into(),
            }))),
        ))
        .unwrap();
        assert!(matches!(app.view.as_ref(), View::Failed(_)));
    }

    #[test]
    fn mutation_notifications() {
        let forget = Command::Forget { name: "Home".into() };
        assert_eq!(
            mutation_notification(&forget, &Ok(CommandResult::Ok(Some("Deleted".into())))),
            Notification::success("Deleted")
        );
        assert_eq!(
            mutation_notification(&forget, &Ok(CommandResult::Ok(None))),
            Notification::success("Forgetting Home: done")
        );
        let set = Command::set_ethernet("10.0.0.5", "24").unwrap();
        assert_eq!(
            mutation_notification(
                &set,
                &Ok(CommandResult::Address(IpAndMask {
                    ip: "10.0.0.5".into(),
                    mask: "24".into()
                }))
            ),
            Notification::success("Ethernet address set to 10.0.0.5/24")
        );
    }
}
