use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;
use ratatui::Terminal;
use tokio::runtime::Handle;

use crate::api::SoundApi;
use crate::config::AppConfig;
use crate::ui;

pub mod actions;
pub mod state;

pub use actions::{ActionDispatcher, RemoteEvent};
pub use state::{AppState, DeleteSoundOverlay, OverlayState};

enum Action {
    Quit,
    SelectNext,
    SelectPrevious,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    DeleteSound,
    PlaySound,
}

pub struct App {
    pub config: Arc<AppConfig>,
    state: AppState,
    table_state: TableState,
    dispatcher: ActionDispatcher,
    remote_events: Receiver<RemoteEvent>,
    should_quit: bool,
    tick_rate: Duration,
}

impl App {
    pub fn new(config: Arc<AppConfig>, api: Arc<dyn SoundApi>, runtime: Handle) -> Self {
        let (dispatcher, remote_events) = ActionDispatcher::new(runtime, api);
        let state = AppState::new(
            config.api.base_url.clone(),
            config.notifications.display_duration(),
        );
        let tick_rate = config.ui.tick_rate();
        Self {
            config,
            state,
            table_state: TableState::default(),
            dispatcher,
            remote_events,
            should_quit: false,
            tick_rate,
        }
    }

    pub fn run(&mut self) -> Result<()> {
        self.activate();
        let mut terminal = setup_terminal()?;
        let result = self.event_loop(&mut terminal);
        restore_terminal(&mut terminal)?;
        result
    }

    fn activate(&mut self) {
        if self.state.begin_bootstrap() {
            tracing::info!(base_url = %self.state.base_url, "fetching sound catalog");
            self.dispatcher.fetch_catalog();
        }
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        let mut last_tick = Instant::now();
        loop {
            self.drain_remote_events();

            terminal
                .draw(|frame| {
                    if self.state.visible_rows().is_empty() {
                        self.table_state.select(None);
                    } else {
                        self.table_state.select(Some(self.state.selected));
                    }
                    ui::draw_app(frame, &self.state, &mut self.table_state);
                })
                .context("rendering frame")?;

            if self.should_quit {
                break;
            }

            let timeout = self
                .tick_rate
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(0));

            if event::poll(timeout).context("polling for terminal events")? {
                match event::read().context("reading terminal event")? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {
                        // next draw picks up the new size
                    }
                    _ => {}
                }
            }

            if last_tick.elapsed() >= self.tick_rate {
                self.on_tick();
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    fn drain_remote_events(&mut self) {
        loop {
            match self.remote_events.try_recv() {
                Ok(event) => {
                    self.state.apply_remote(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::error!("remote event channel disconnected");
                    break;
                }
            }
        }
    }

    fn on_tick(&mut self) {
        self.state.expire_toasts(Instant::now());
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.handle_overlay_key(key) {
            return;
        }

        let plain = !key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER);
        let action = match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Quit)
            }
            KeyCode::Char('j') | KeyCode::Down => Some(Action::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::SelectPrevious),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => Some(Action::NextPage),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => Some(Action::PreviousPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Action::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Action::LastPage),
            KeyCode::Char('d') | KeyCode::Delete if plain => Some(Action::DeleteSound),
            KeyCode::Char('p') | KeyCode::Enter if plain => Some(Action::PlaySound),
            _ => None,
        };

        if let Some(action) = action {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::SelectNext => self.state.move_selection(1),
            Action::SelectPrevious => self.state.move_selection(-1),
            Action::NextPage => {
                self.state.next_page();
            }
            Action::PreviousPage => {
                self.state.previous_page();
            }
            Action::FirstPage => {
                self.state.first_page();
            }
            Action::LastPage => {
                self.state.last_page();
            }
            Action::DeleteSound => self.handle_delete_sound(),
            Action::PlaySound => self.handle_play_sound(),
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> bool {
        if !matches!(self.state.overlay(), Some(OverlayState::DeleteSound(_))) {
            return false;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.state.close_overlay();
                self.state.set_status_message(Some("Delete canceled"));
            }
            KeyCode::Enter | KeyCode::Char('y') => self.submit_delete_sound(),
            _ => {}
        }
        true
    }

    fn handle_delete_sound(&mut self) {
        if self.state.overlay().is_some() {
            return;
        }
        if !self.state.open_delete_sound() {
            self.state.set_status_message(Some("No sound selected"));
            return;
        }
        self.state
            .set_status_message(Some("Delete sound: Enter confirm • Esc cancel"));
    }

    fn submit_delete_sound(&mut self) {
        let ticket = self.state.confirm_delete();
        self.state.set_status_message(None::<String>);
        if let Some(ticket) = ticket {
            self.dispatcher.delete_sound(ticket);
        }
    }

    fn handle_play_sound(&mut self) {
        if let Some(id) = self.state.selected_id() {
            tracing::info!(id, "playing sound");
            let message = format!("Playing {id}");
            self.state.set_status_message(Some(message));
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("switching to alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal backend")?;
    terminal.hide_cursor().context("hiding cursor")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    terminal.show_cursor().ok();
    disable_raw_mode().context("disabling raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("restoring screen state")?;
    Ok(())
}
