use crate::domain::traits::KeyboardButton;

/// Who gets to see a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Posted in the chat the request came from
    Public,
    /// Only the requesting user
    Ephemeral,
}

/// Reply payload
#[derive(Debug, Clone)]
pub enum ReplyBody {
    Text(String),
    Photo { url: String, caption: String },
}

/// Outgoing reply produced by a command
#[derive(Debug, Clone)]
pub struct Reply {
    pub visibility: Visibility,
    pub body: ReplyBody,
    pub buttons: Vec<Vec<KeyboardButton>>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Public,
            body: ReplyBody::Text(text.into()),
            buttons: Vec::new(),
        }
    }

    pub fn photo(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            visibility: Visibility::Public,
            body: ReplyBody::Photo {
                url: url.into(),
                caption: caption.into(),
            },
            buttons: Vec::new(),
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.visibility = Visibility::Ephemeral;
        self
    }

    /// Add a row of inline buttons
    pub fn with_buttons(mut self, row: Vec<KeyboardButton>) -> Self {
        self.buttons.push(row);
        self
    }

    pub fn is_ephemeral(&self) -> bool {
        self.visibility == Visibility::Ephemeral
    }

    /// Text or caption of the reply
    pub fn text_content(&self) -> &str {
        match &self.body {
            ReplyBody::Text(text) => text,
            ReplyBody::Photo { caption, .. } => caption,
        }
    }
}
