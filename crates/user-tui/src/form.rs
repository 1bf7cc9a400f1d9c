use std::time::{Duration, Instant};

use user_shared::{
    api::{CreateUserRequest, UpdateUserRequest},
    User,
};
use uuid::Uuid;

/// How long a status message stays visible.
pub const MESSAGE_TTL: Duration = Duration::from_secs(4);

pub const REQUIRED_MESSAGE: &str = "Name and email are required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl StatusMessage {
    fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= MESSAGE_TTL
    }
}

/// What submitting the form should do.
#[derive(Debug)]
pub enum Submission {
    Create(CreateUserRequest),
    Update { id: Uuid, req: UpdateUserRequest },
}

/// Client-side form state shared by the terminal UI and the command line.
///
/// `editing_id` decides between create and update on submit; the status
/// message is transient and cleared by [`UserForm::expire_message`].
#[derive(Debug, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub editing_id: Option<Uuid>,
    pub(crate) message: Option<StatusMessage>,
}

impl UserForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    /// Validates the fields and builds the request to send.
    pub fn submission(&self) -> Result<Submission, String> {
        let name = self.name.trim();
        let email = self.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(REQUIRED_MESSAGE.to_string());
        }

        let (name, email) = (name.to_string(), email.to_string());
        Ok(match self.editing_id {
            Some(id) => Submission::Update {
                id,
                req: UpdateUserRequest { name, email },
            },
            None => Submission::Create(CreateUserRequest { name, email }),
        })
    }

    pub fn start_edit(&mut self, user: &User) {
        self.name = user.name.clone();
        self.email = user.email.clone();
        self.editing_id = Some(user.id);
        self.show("Editing user, submit to save", MessageKind::Info);
    }

    /// Drops any edit in progress and empties the fields.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.editing_id = None;
    }

    pub fn on_saved(&mut self) {
        self.reset();
        self.show("Saved", MessageKind::Success);
    }

    pub fn on_deleted(&mut self, id: Uuid) {
        if self.editing_id == Some(id) {
            self.reset();
        }
        self.show("Deleted", MessageKind::Success);
    }

    /// Reports a failure; fields and `editing_id` are left as they were.
    pub fn on_error(&mut self, text: impl Into<String>) {
        self.show(text, MessageKind::Error);
    }

    pub fn show(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.message = Some(StatusMessage::new(text, kind));
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn expire_message(&mut self, now: Instant) {
        if self.message.as_ref().is_some_and(|m| m.is_expired_at(now)) {
            self.message = None;
        }
    }
}
