//! Transcript — the append-only ordered log of bot/user turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::wizard::step::{FormKind, ImageField, InputModality, SelectorKind};

/// Who spoke a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    Bot,
    User,
}

/// An inline interactive control bound to a bot message. The view layer
/// renders it; it is only interactive while its step is current.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    TypePicker,
    TypeConfirm,
    CategoryPicker,
    SubdomainConfirm { candidate: String },
    ImageUpload { field: ImageField },
    LocationForm,
    HoursForm,
    ThemePicker,
    ReviewActions,
}

impl Widget {
    /// The widget (if any) a bot message carries for the given modality.
    /// Free-text steps use the main input box, not an inline widget.
    pub fn for_modality(modality: &InputModality, subdomain: Option<&str>) -> Option<Widget> {
        match modality {
            InputModality::FreeText(_) | InputModality::None => None,
            InputModality::Form(FormKind::ImageUpload(field)) => {
                Some(Widget::ImageUpload { field: *field })
            }
            InputModality::Form(FormKind::Location) => Some(Widget::LocationForm),
            InputModality::Form(FormKind::Hours) => Some(Widget::HoursForm),
            InputModality::Selector(SelectorKind::StoreType) => Some(Widget::TypePicker),
            InputModality::Selector(SelectorKind::TypeConfirm) => Some(Widget::TypeConfirm),
            InputModality::Selector(SelectorKind::Category) => Some(Widget::CategoryPicker),
            InputModality::Selector(SelectorKind::SubdomainConfirm) => {
                Some(Widget::SubdomainConfirm {
                    candidate: subdomain.unwrap_or_default().to_string(),
                })
            }
            InputModality::Selector(SelectorKind::Theme) => Some(Widget::ThemePicker),
            InputModality::Selector(SelectorKind::ReviewActions) => Some(Widget::ReviewActions),
        }
    }
}

/// One turn in the conversation. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub speaker: Speaker,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<Widget>,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(speaker: Speaker, text: impl Into<String>, widget: Option<Widget>) -> Self {
        Self {
            id: Uuid::new_v4(),
            speaker,
            text: text.into(),
            widget,
            created_at: Utc::now(),
        }
    }
}

/// Ordered sequence of messages. Insertion order is append-only and is the
/// sole ordering guarantee: no reordering, no deletion except `clear` on a
/// full restart.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bot turn, optionally carrying a step widget.
    pub fn push_bot(&mut self, text: impl Into<String>, widget: Option<Widget>) {
        self.messages.push(Message::new(Speaker::Bot, text, widget));
    }

    /// Append a user turn.
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(Message::new(Speaker::User, text, None));
    }

    /// Drop everything. Restart only.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
