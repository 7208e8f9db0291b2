use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use webbrowser::Browser;

use crate::clock::{Clock, SystemClock};
use crate::config::{Config, MAX_SESSION_MINUTES, MIN_SESSION_MINUTES};
use crate::drafts::DraftStore;
use crate::editor::Editor;
use crate::history::HistoryState;
use crate::session::{AutosaveTimer, Phase, Session, TickOutcome};
use crate::stats::{self, SessionRecord};
use crate::{theme, util};
use std::time::Duration;

const LENGTH_STEP_MINUTES: i64 = 5;

/// What the UI is currently showing
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Writing,
    /// End-of-session decision point: continue or stop
    TimesUp { words: usize },
    History,
    Preview { title: String, content: String },
    /// Path prompt for an explicit save
    SaveAs { input: String, then: AfterSave },
    /// Unsaved words exist; save, discard, or cancel
    ConfirmDiscard { pending: PendingAction },
}

/// Where to go once an explicit save succeeds
#[derive(Debug, Clone, PartialEq)]
pub enum AfterSave {
    Stay,
    StopSession,
    Quit,
    NewSession,
    Load(PathBuf),
}

/// Action held back behind a discard confirmation
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    NewSession,
    Quit,
    Load(PathBuf),
}

/// The whole application: session core, editor surface, draft store,
/// history browser, and the active screen. All state lives here and is
/// only ever mutated from the single event loop.
pub struct App<C: Clock + Copy = SystemClock> {
    clock: C,
    pub session: Session<C>,
    pub editor: Editor,
    pub store: DraftStore,
    pub config: Config,
    pub history: HistoryState,
    pub screen: Screen,
    pub theme_index: usize,
    pub status: Option<String>,
    pub should_quit: bool,
    autosave: AutosaveTimer,
    session_log: Option<PathBuf>,
}

impl<C: Clock + Copy> App<C> {
    /// `config` must already be validated at the boundary.
    pub fn new(clock: C, config: Config, store: DraftStore) -> Self {
        let session = Session::new(clock, config.session_secs());
        let editor = Editor::new(config.lock_backspace);
        let autosave = AutosaveTimer::new(Duration::from_secs(config.autosave_secs), clock.now());
        let theme_index = theme::by_name(&config.theme).unwrap_or(0);
        Self {
            clock,
            session,
            editor,
            store,
            config,
            history: HistoryState::new(),
            screen: Screen::Writing,
            theme_index,
            status: None,
            should_quit: false,
            autosave,
            session_log: Some(crate::app_dirs::AppDirs::session_log_path()),
        }
    }

    /// Redirect (or with None, disable) the session summary log.
    pub fn set_session_log(&mut self, path: Option<PathBuf>) {
        self.session_log = path;
    }

    pub fn theme(&self) -> &'static theme::Theme {
        &theme::THEMES[self.theme_index]
    }

    pub fn word_count(&self) -> usize {
        self.editor.word_count()
    }

    fn now_local(&self) -> DateTime<Local> {
        self.clock.now().into()
    }

    /// Periodic tick: advance the session, detect expiry (forcing one
    /// snapshot), and run the autosave cadence. Autosave failure is
    /// reported on the status line and never propagates.
    pub fn on_tick(&mut self) {
        let now = self.clock.now();

        if let TickOutcome::Expired = self.session.on_tick() {
            let words = self.editor.word_count();
            self.force_snapshot();
            self.autosave.rearm(now);
            self.log_finished_session(words);
            self.screen = Screen::TimesUp { words };
            return;
        }

        if self.autosave.fire_if_due(now) && self.session.is_running() && !self.editor.is_empty() {
            match self
                .store
                .persist_snapshot(&self.editor.text(), self.now_local())
            {
                Ok(path) => {
                    self.status = Some(format!("autosaved {}", path.display()));
                }
                Err(e) => {
                    // best effort: next cycle will try again
                    self.status = Some(format!("autosave failed: {}", e));
                }
            }
        }
    }

    /// The one synchronous snapshot attempt at expiry, independent of
    /// the autosave cadence.
    fn force_snapshot(&mut self) {
        if self.editor.is_empty() {
            return;
        }
        if let Err(e) = self
            .store
            .persist_snapshot(&self.editor.text(), self.now_local())
        {
            self.status = Some(format!("autosave failed: {}", e));
        }
    }

    fn log_finished_session(&self, words: usize) {
        let Some(path) = &self.session_log else {
            return;
        };
        let record = SessionRecord {
            finished_at: self.now_local(),
            length_secs: self.session.length_secs(),
            elapsed_secs: self.session.elapsed().as_secs(),
            words,
        };
        let _ = stats::append_record(path, &record);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.screen.clone() {
            Screen::Writing => self.handle_writing_key(key),
            Screen::TimesUp { words } => self.handle_times_up_key(key, words),
            Screen::History => self.handle_history_key(key),
            Screen::Preview { title, content } => self.handle_preview_key(key, title, content),
            Screen::SaveAs { input, then } => self.handle_save_as_key(key, input, then),
            Screen::ConfirmDiscard { pending } => self.handle_confirm_key(key, pending),
        }
    }

    fn handle_writing_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.request_quit(),
                KeyCode::Char('n') => self.request_new_session(),
                KeyCode::Char('s') => self.open_save_prompt(AfterSave::Stay),
                KeyCode::Char('p') => self.session.toggle_pause(),
                KeyCode::Char('h') => self.open_history(),
                KeyCode::Char('t') => {
                    self.theme_index = theme::next(self.theme_index);
                    self.config.theme = self.theme().name.to_string();
                }
                KeyCode::Char('b') => {
                    self.editor.backspace_locked = !self.editor.backspace_locked;
                    self.config.lock_backspace = self.editor.backspace_locked;
                    self.status = Some(if self.editor.backspace_locked {
                        "backspace disabled".to_string()
                    } else {
                        "backspace enabled".to_string()
                    });
                }
                KeyCode::Char('g') => self.open_chat(),
                KeyCode::Up => self.adjust_length(LENGTH_STEP_MINUTES),
                KeyCode::Down => self.adjust_length(-LENGTH_STEP_MINUTES),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char(c) => {
                self.status = None;
                self.editor.insert_char(c);
                // the first keystroke of an idle session starts the clock
                self.session.start();
            }
            KeyCode::Enter => {
                self.status = None;
                self.editor.insert_newline();
                self.session.start();
            }
            KeyCode::Backspace => {
                self.editor.backspace();
            }
            KeyCode::Left => self.editor.move_left(),
            KeyCode::Right => self.editor.move_right(),
            KeyCode::Up => self.editor.move_up(),
            KeyCode::Down => self.editor.move_down(),
            KeyCode::Home => self.editor.move_home(),
            KeyCode::End => self.editor.move_end(),
            KeyCode::Esc => self.request_quit(),
            _ => {}
        }
    }

    fn handle_times_up_key(&mut self, key: KeyEvent, words: usize) {
        match key.code {
            KeyCode::Char('c') => {
                // fresh full-length deadline
                self.session.continue_writing();
                self.screen = Screen::Writing;
            }
            KeyCode::Char('s') => self.open_save_prompt(AfterSave::StopSession),
            KeyCode::Esc | KeyCode::Char('q') => {
                // stop without an explicit save; the forced snapshot
                // already preserved the text
                self.session.reset();
                self.screen = Screen::Writing;
                self.status = Some(format!("session over: {} words", words));
            }
            _ => {}
        }
    }

    fn handle_history_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.screen = Screen::Writing,
            KeyCode::Up => self.history.select_prev(),
            KeyCode::Down => self.history.select_next(),
            KeyCode::Backspace => self.history.pop_query_char(),
            KeyCode::Enter => {
                if let Some(meta) = self.history.selected_draft() {
                    let title = match &meta.created {
                        Some(dt) => util::human_date(dt),
                        None => meta.file_name.clone(),
                    };
                    match self.store.read(&meta.path) {
                        Ok(content) => self.screen = Screen::Preview { title, content },
                        Err(e) => self.status = Some(format!("could not open draft: {}", e)),
                    }
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.history.push_query_char(c);
            }
            _ => {}
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent, title: String, content: String) {
        match key.code {
            KeyCode::Esc => self.screen = Screen::History,
            KeyCode::Char('e') => {
                if let Some(meta) = self.history.selected_draft() {
                    let path = meta.path.clone();
                    if self.editor.word_count() > 0 && self.editor.text() != content {
                        self.screen = Screen::ConfirmDiscard {
                            pending: PendingAction::Load(path),
                        };
                    } else {
                        self.load_draft(path);
                    }
                } else {
                    self.screen = Screen::Preview { title, content };
                }
            }
            _ => {}
        }
    }

    fn handle_save_as_key(&mut self, key: KeyEvent, mut input: String, then: AfterSave) {
        match key.code {
            KeyCode::Esc => {
                // an expired session goes back to its decision point
                self.screen = match self.session.phase() {
                    Phase::Expired => Screen::TimesUp {
                        words: self.editor.word_count(),
                    },
                    _ => Screen::Writing,
                };
            }
            KeyCode::Enter => {
                match self.store.save_to(&input, &self.editor.text()) {
                    Ok(()) => {
                        self.status = Some(format!("saved to {}", input));
                        self.after_save(then);
                    }
                    Err(e) => {
                        // surfaced to the user, state unchanged
                        self.status = Some(format!("save failed: {}", e));
                        self.screen = Screen::SaveAs { input, then };
                    }
                }
            }
            KeyCode::Backspace => {
                input.pop();
                self.screen = Screen::SaveAs { input, then };
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.push(c);
                self.screen = Screen::SaveAs { input, then };
            }
            _ => self.screen = Screen::SaveAs { input, then },
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, pending: PendingAction) {
        match key.code {
            KeyCode::Char('y') => {
                let then = match pending {
                    PendingAction::NewSession => AfterSave::NewSession,
                    PendingAction::Quit => AfterSave::Quit,
                    PendingAction::Load(path) => AfterSave::Load(path),
                };
                self.open_save_prompt(then);
            }
            KeyCode::Char('n') => self.perform(pending),
            KeyCode::Esc => self.screen = Screen::Writing,
            _ => self.screen = Screen::ConfirmDiscard { pending },
        }
    }

    fn after_save(&mut self, then: AfterSave) {
        match then {
            AfterSave::Stay => self.screen = Screen::Writing,
            AfterSave::StopSession => {
                self.session.reset();
                self.screen = Screen::Writing;
            }
            AfterSave::Quit => self.should_quit = true,
            AfterSave::NewSession => self.new_session(),
            AfterSave::Load(path) => self.load_draft(path),
        }
    }

    fn perform(&mut self, pending: PendingAction) {
        match pending {
            PendingAction::NewSession => self.new_session(),
            PendingAction::Quit => self.should_quit = true,
            PendingAction::Load(path) => self.load_draft(path),
        }
    }

    fn request_quit(&mut self) {
        if self.editor.word_count() > 0 {
            self.screen = Screen::ConfirmDiscard {
                pending: PendingAction::Quit,
            };
        } else {
            self.should_quit = true;
        }
    }

    fn request_new_session(&mut self) {
        if self.editor.word_count() > 0 {
            self.screen = Screen::ConfirmDiscard {
                pending: PendingAction::NewSession,
            };
        } else {
            self.new_session();
        }
    }

    fn new_session(&mut self) {
        self.editor.clear();
        self.session.reset();
        self.status = None;
        self.screen = Screen::Writing;
    }

    fn load_draft(&mut self, path: PathBuf) {
        match self.store.read(&path) {
            Ok(content) => {
                self.editor.load(&content);
                self.session.reset();
                self.screen = Screen::Writing;
            }
            Err(e) => {
                self.status = Some(format!("could not open draft: {}", e));
                self.screen = Screen::History;
            }
        }
    }

    fn open_history(&mut self) {
        match self.history.refresh(&self.store) {
            Ok(()) => self.screen = Screen::History,
            Err(e) => self.status = Some(format!("could not list drafts: {}", e)),
        }
    }

    fn open_save_prompt(&mut self, then: AfterSave) {
        let stamp = self.now_local().format("%Y%m%d-%H%M%S");
        let input = self
            .store
            .dir()
            .join(format!("freewrite_{}.txt", stamp))
            .to_string_lossy()
            .into_owned();
        self.screen = Screen::SaveAs { input, then };
    }

    /// Change the session length by whole minutes, clamped to the
    /// config range. While Running or Paused this re-anchors the
    /// deadline, discarding progress.
    fn adjust_length(&mut self, delta_minutes: i64) {
        let minutes = (self.config.session_minutes as i64 + delta_minutes)
            .clamp(MIN_SESSION_MINUTES as i64, MAX_SESSION_MINUTES as i64) as u64;
        if minutes == self.config.session_minutes {
            return;
        }
        self.config.session_minutes = minutes;
        self.session.set_length_secs(minutes * 60);
        self.status = Some(format!("session length: {} min", minutes));
    }

    fn open_chat(&mut self) {
        if self.editor.is_empty() {
            self.status = Some("nothing to chat about yet; write something first".to_string());
            return;
        }
        if Browser::is_available() {
            let _ = webbrowser::open(&util::chat_url(&self.editor.text()));
        } else {
            self.status = Some("no browser available".to_string());
        }
    }
}
