// src/domain/shared/notification.rs
//
// Error accumulator owned by each aggregate. Validation writes into it and a
// boundary step (create factory, use case) turns a non-empty notification into
// AppError::EntityValidation.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single accumulated entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEntry {
    /// Errors attached to a named field
    Field { field: String, messages: Vec<String> },
    /// A field-less error message
    Message(String),
}

impl NotificationEntry {
    pub fn field(&self) -> Option<&str> {
        match self {
            NotificationEntry::Field { field, .. } => Some(field),
            NotificationEntry::Message(_) => None,
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        match self {
            NotificationEntry::Field { messages, .. } => {
                messages.iter().map(String::as_str).collect()
            }
            NotificationEntry::Message(message) => vec![message.as_str()],
        }
    }
}

/// Serialized as `{"field": ["..."]}` or as a bare string
impl Serialize for NotificationEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            NotificationEntry::Field { field, messages } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(field, messages)?;
                map.end()
            }
            NotificationEntry::Message(message) => serializer.serialize_str(message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Notification {
    entries: Vec<NotificationEntry>,
}

impl Notification {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, skipping it if the field already carries it
    pub fn add_error(&mut self, message: impl Into<String>, field: Option<&str>) {
        let message = message.into();
        match field {
            Some(field) => {
                let messages = self.field_messages_mut(field);
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
            None => self.push_message(message),
        }
    }

    /// Append one message; never overwrites what the field already holds
    pub fn set_error(&mut self, message: impl Into<String>, field: Option<&str>) {
        self.set_errors([message], field);
    }

    /// Append several messages at once
    pub fn set_errors<I, M>(&mut self, messages: I, field: Option<&str>)
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        match field {
            Some(field) => {
                let target = self.field_messages_mut(field);
                target.extend(messages.into_iter().map(Into::into));
            }
            None => {
                for message in messages {
                    self.push_message(message.into());
                }
            }
        }
    }

    /// Merge every entry of a nested notification into this one
    pub fn copy_errors(&mut self, other: &Notification) {
        for entry in &other.entries {
            match entry {
                NotificationEntry::Field { field, messages } => {
                    self.set_errors(messages.iter().cloned(), Some(field))
                }
                NotificationEntry::Message(message) => self.push_message(message.clone()),
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn errors_for(&self, field: &str) -> Option<&[String]> {
        self.entries.iter().find_map(|entry| match entry {
            NotificationEntry::Field { field: f, messages } if f == field => {
                Some(messages.as_slice())
            }
            _ => None,
        })
    }

    pub fn entries(&self) -> &[NotificationEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<NotificationEntry> {
        self.entries
    }

    /// Total number of messages across all entries
    pub fn error_count(&self) -> usize {
        self.entries.iter().map(|e| e.messages().len()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or(serde_json::Value::Null)
    }

    fn field_messages_mut(&mut self, field: &str) -> &mut Vec<String> {
        let position = self
            .entries
            .iter()
            .position(|entry| entry.field() == Some(field));

        let index = match position {
            Some(index) => index,
            None => {
                self.entries.push(NotificationEntry::Field {
                    field: field.to_string(),
                    messages: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        match &mut self.entries[index] {
            NotificationEntry::Field { messages, .. } => messages,
            NotificationEntry::Message(_) => unreachable!("position matched a field entry"),
        }
    }

    fn push_message(&mut self, message: String) {
        let exists = self
            .entries
            .iter()
            .any(|entry| matches!(entry, NotificationEntry::Message(m) if *m == message));
        if !exists {
            self.entries.push(NotificationEntry::Message(message));
        }
    }
}
