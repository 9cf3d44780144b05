//! Form state for the interactive mode.
//!
//! [`App`] owns the draft request being edited and the outcome of the last
//! send. It never performs I/O; key handling returns an [`Action`] and the
//! event loop decides what to do with it.

use crate::domain::entities::{HeaderEntry, Method, RequestDescription, ResponseDescription};
use crate::domain::errors::ErrorDescription;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub const DEFAULT_URL: &str = "https://jsonplaceholder.typicode.com/posts/1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Method,
    Url,
    HeaderKey,
    HeaderValue,
    Body,
}

impl Focus {
    const ORDER: [Focus; 5] = [
        Focus::Method,
        Focus::Url,
        Focus::HeaderKey,
        Focus::HeaderValue,
        Focus::Body,
    ];

    fn offset(self, step: isize) -> Focus {
        let len = Self::ORDER.len() as isize;
        let idx = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ORDER[(idx + step).rem_euclid(len) as usize]
    }

    fn is_header(self) -> bool {
        matches!(self, Focus::HeaderKey | Focus::HeaderValue)
    }
}

/// What the event loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Send(RequestDescription),
    Cancel,
    Quit,
}

pub struct App {
    pub draft: RequestDescription,
    pub last_result: Option<Result<ResponseDescription, ErrorDescription>>,
    pub loading: bool,
    pub focus: Focus,
    pub selected_header: usize,
}

impl App {
    pub fn new(draft: RequestDescription) -> Self {
        Self {
            draft,
            last_result: None,
            loading: false,
            focus: Focus::Url,
            selected_header: 0,
        }
    }

    pub fn method(&self) -> Method {
        self.draft.method.parse().unwrap_or(Method::Get)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press {
            return Action::None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return self.handle_control(key.code);
        }

        match key.code {
            KeyCode::Esc if self.loading => Action::Cancel,
            KeyCode::F(5) => self.begin_send(),
            KeyCode::Tab => {
                self.move_focus(1);
                Action::None
            }
            KeyCode::BackTab => {
                self.move_focus(-1);
                Action::None
            }
            KeyCode::Left if self.focus == Focus::Method => {
                self.draft.method = self.method().previous().to_string();
                Action::None
            }
            KeyCode::Right if self.focus == Focus::Method => {
                self.draft.method = self.method().next().to_string();
                Action::None
            }
            KeyCode::Up if self.focus.is_header() => {
                self.selected_header = self.selected_header.saturating_sub(1);
                Action::None
            }
            KeyCode::Down if self.focus.is_header() => {
                if self.selected_header + 1 < self.draft.headers.len() {
                    self.selected_header += 1;
                }
                Action::None
            }
            KeyCode::Enter if self.focus == Focus::Body => {
                self.draft.body.push('\n');
                Action::None
            }
            KeyCode::Enter => self.begin_send(),
            KeyCode::Backspace => {
                if let Some(field) = self.focused_text() {
                    field.pop();
                }
                Action::None
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::ALT) => {
                if let Some(field) = self.focused_text() {
                    field.push(c);
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_control(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('c') | KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('s') => self.begin_send(),
            KeyCode::Char('n') => {
                self.draft.headers.push(HeaderEntry::new("", ""));
                self.selected_header = self.draft.headers.len() - 1;
                self.focus = Focus::HeaderKey;
                Action::None
            }
            KeyCode::Char('d') => {
                if self.selected_header < self.draft.headers.len() {
                    self.draft.headers.remove(self.selected_header);
                    self.selected_header = self
                        .selected_header
                        .min(self.draft.headers.len().saturating_sub(1));
                    if self.draft.headers.is_empty() && self.focus.is_header() {
                        self.move_focus(1);
                    }
                }
                Action::None
            }
            KeyCode::Char('t') => {
                if let Some(header) = self.draft.headers.get_mut(self.selected_header) {
                    header.enabled = !header.enabled;
                }
                Action::None
            }
            _ => Action::None,
        }
    }

    fn begin_send(&mut self) -> Action {
        if self.loading {
            return Action::None;
        }
        self.loading = true;
        Action::Send(self.draft.clone())
    }

    /// Records the outcome of the in-flight send.
    pub fn finish(&mut self, result: Result<ResponseDescription, ErrorDescription>) {
        self.loading = false;
        self.last_result = Some(result);
    }

    fn move_focus(&mut self, step: isize) {
        let mut next = self.focus.offset(step);
        if self.draft.headers.is_empty() {
            while next.is_header() {
                next = next.offset(step);
            }
        }
        self.focus = next;
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Method => None,
            Focus::Url => Some(&mut self.draft.url),
            Focus::Body => Some(&mut self.draft.body),
            Focus::HeaderKey => self
                .draft
                .headers
                .get_mut(self.selected_header)
                .map(|h| &mut h.key),
            Focus::HeaderValue => self
                .draft
                .headers
                .get_mut(self.selected_header)
                .map(|h| &mut h.value),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(
            RequestDescription::new("GET", DEFAULT_URL)
                .with_header(HeaderEntry::new("Content-Type", "application/json"))
                .with_header(HeaderEntry::new("Accept", "application/json")),
        )
    }
}
