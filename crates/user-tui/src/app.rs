use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use user_shared::User;

use crate::api::ApiClient;
use crate::form::{Submission, UserForm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
}

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    LoadUsers,
}

pub struct App {
    pub api: ApiClient,
    pub focus: Focus,
    pub field: FormField,

    // Loading state
    pub loading: bool,
    pub loading_message: String,

    // User list
    pub users: Vec<User>,
    pub selected: usize,
    pub confirming_delete: bool,

    pub form: UserForm,
}

impl App {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            focus: Focus::List,
            field: FormField::Name,
            loading: false,
            loading_message: String::new(),
            users: Vec::new(),
            selected: 0,
            confirming_delete: false,
            form: UserForm::new(),
        }
    }

    pub fn set_loading(&mut self, loading: bool, message: &str) {
        self.loading = loading;
        self.loading_message = message.to_string();
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected)
    }

    pub fn on_tick(&mut self) {
        self.form.expire_message(Instant::now());
    }

    /// Handle key events, returns true if app should quit
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        // Global quit with Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(true);
        }

        if self.loading {
            return Ok(false);
        }

        if self.confirming_delete {
            self.handle_confirm_key(key).await;
            return Ok(false);
        }

        match self.focus {
            Focus::List => self.handle_list_key(key).await,
            Focus::Form => {
                self.handle_form_key(key).await;
                Ok(false)
            }
        }
    }

    async fn handle_list_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('j') | KeyCode::Down => self.move_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(),
            KeyCode::Char('r') => self.load_users().await,
            KeyCode::Char('n') => {
                self.form.reset();
                self.focus_form();
            }
            KeyCode::Char('i') | KeyCode::Tab => self.focus_form(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(user) = self.selected_user().cloned() {
                    self.form.start_edit(&user);
                    self.focus_form();
                }
            }
            KeyCode::Char('c') => self.form.reset(),
            KeyCode::Char('d') => {
                if self.selected_user().is_some() {
                    self.confirming_delete = true;
                }
            }
            _ => {}
        }

        Ok(false)
    }

    async fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.focus = Focus::List,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.field = match self.field {
                    FormField::Name => FormField::Email,
                    FormField::Email => FormField::Name,
                };
            }
            KeyCode::Enter => self.submit().await,
            KeyCode::Char(c) => self.active_field_mut().push(c),
            KeyCode::Backspace => {
                self.active_field_mut().pop();
            }
            _ => {}
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirming_delete = false;
                self.delete_selected().await;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirming_delete = false;
            }
            _ => {}
        }
    }

    fn focus_form(&mut self) {
        self.focus = Focus::Form;
        self.field = FormField::Name;
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Name => &mut self.form.name,
            FormField::Email => &mut self.form.email,
        }
    }

    pub async fn load_users(&mut self) {
        self.set_loading(true, "Loading users...");

        match self.api.list_users().await {
            Ok(users) => {
                self.users = users;
                self.selected = self.selected.min(self.users.len().saturating_sub(1));
            }
            Err(e) => {
                self.form.on_error(format!("Failed to load users: {}", e));
            }
        }

        self.set_loading(false, "");
    }

    /// Creates or updates depending on whether an edit is in progress.
    pub async fn submit(&mut self) {
        let submission = match self.form.submission() {
            Ok(submission) => submission,
            Err(message) => {
                self.form.on_error(message);
                return;
            }
        };

        self.set_loading(true, "Saving...");

        let result = match submission {
            Submission::Create(req) => self.api.create_user(&req).await,
            Submission::Update { id, req } => self.api.update_user(id, &req).await,
        };

        self.set_loading(false, "");

        match result {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "Saved user");
                self.form.on_saved();
                self.focus = Focus::List;
                self.load_users().await;
            }
            Err(e) => self.form.on_error(e.to_string()),
        }
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self.selected_user().map(|u| u.id) else {
            return;
        };

        self.set_loading(true, "Deleting user...");
        let result = self.api.delete_user(id).await;
        self.set_loading(false, "");

        match result {
            Ok(()) => {
                self.form.on_deleted(id);
                self.load_users().await;
            }
            Err(e) => self.form.on_error(format!("Delete failed: {}", e)),
        }
    }

    pub fn move_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.selected < self.users.len().saturating_sub(1) {
            self.selected += 1;
        }
    }
}
