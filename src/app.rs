//! Terminal lifecycle and the two interactive loops

use anyhow::{Context, Result};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::mpsc;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::{ProfileStore, Settings};
use crate::constants::layout;
use crate::event_handler::{handle_event, handle_worker_event, Action};
use crate::session::Session;
use crate::ui;
use crate::ui::profile_menu::{self, MenuOutcome, ProfileMenu};
use crate::worker::{self, Job, WorkerEvent};

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Raw mode, alternate screen and mouse capture for as long as it lives
pub struct TerminalGuard {
    pub terminal: Tui,
}

impl TerminalGuard {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")?;
        debug!("Terminal initialized");
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture);
        let _ = self.terminal.show_cursor();
        debug!("Terminal restored");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorExit {
    Quit,
    OpenProfiles,
}

fn poll_interval() -> Duration {
    Duration::from_millis(layout::POLL_INTERVAL_MS)
}

fn terminal_size(terminal: &Tui) -> (u16, u16) {
    match terminal.size() {
        Ok(size) => (size.width, size.height),
        Err(_) => (layout::FALLBACK_TERM_WIDTH, layout::FALLBACK_TERM_HEIGHT),
    }
}

/// Run the layout editor until the user quits or asks for the profile page
pub fn run_editor(
    terminal: &mut Tui,
    settings: &Settings,
    store: &ProfileStore,
    profile_name: Option<String>,
) -> Result<EditorExit> {
    let (width, height) = terminal_size(terminal);
    let mut session = Session::new(settings, width, height);
    session.profile_name = profile_name;
    session.profile_names = store.ordered_list().unwrap_or_else(|e| {
        error!(error = %format!("{e:#}"), "Failed to list profiles");
        Vec::new()
    });

    let (tx, rx) = mpsc::channel::<WorkerEvent>();
    worker::spawn(Job::LoadMonitors, tx.clone());
    info!("Editor started");

    loop {
        terminal.draw(|frame| ui::draw(frame, &session))?;

        let mut pending = Vec::new();
        if event::poll(poll_interval())? {
            pending.push(handle_event(&mut session, event::read()?, store));
        }

        while let Ok(event) = rx.try_recv() {
            pending.push(handle_worker_event(&mut session, event));
        }

        for action in pending {
            match action {
                Action::None => {}
                Action::Quit => {
                    info!("Editor closed");
                    return Ok(EditorExit::Quit);
                }
                Action::OpenProfiles => return Ok(EditorExit::OpenProfiles),
                Action::Run(job) => {
                    worker::spawn(job, tx.clone());
                }
            }
        }
    }
}

/// Run the profile page until the user picks an entry or quits
pub fn run_profile_menu(terminal: &mut Tui, store: &ProfileStore, active: Option<String>) -> Result<MenuOutcome> {
    let mut menu = ProfileMenu::load(store, active)?;
    loop {
        terminal.draw(|frame| profile_menu::render(frame, &menu))?;
        if !event::poll(poll_interval())? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match menu.handle_key(key, store) {
                MenuOutcome::Continue => {}
                outcome => return Ok(outcome),
            }
        }
    }
}
