//! Message storage abstraction and the in-memory implementation.

use crate::error::StoreError;
use crate::model::Message;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Persistence seam for the message board.
///
/// Handlers receive a `&dyn MessageStore` per call; nothing holds on to a
/// global instance.
pub trait MessageStore: Send + Sync {
    /// All messages, ordered by text (ordinal), ties by id.
    fn list(&self) -> Result<Vec<Message>, StoreError>;

    /// Stores a new message and returns it with its assigned id.
    fn add(&self, text: &str) -> Result<Message, StoreError>;

    /// Removes one message. Returns `false` if no message had that id.
    fn delete(&self, id: u32) -> Result<bool, StoreError>;

    /// Removes every message and returns how many there were.
    fn delete_all(&self) -> Result<usize, StoreError>;
}

impl<S: MessageStore + ?Sized> MessageStore for Arc<S> {
    fn list(&self) -> Result<Vec<Message>, StoreError> {
        (**self).list()
    }

    fn add(&self, text: &str) -> Result<Message, StoreError> {
        (**self).add(text)
    }

    fn delete(&self, id: u32) -> Result<bool, StoreError> {
        (**self).delete(id)
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        (**self).delete_all()
    }
}

#[derive(Debug)]
struct Inner {
    /// `None` once `u32::MAX` has been handed out
    next_id: Option<u32>,
    messages: BTreeMap<u32, Message>,
}

/// Thread-safe in-memory store. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                next_id: Some(1),
                messages: BTreeMap::new(),
            }),
        }
    }

    /// Creates a store pre-filled with the given texts, in order.
    pub fn with_messages<I, T>(texts: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let store = Self::new();
        for text in texts {
            store.add(text.as_ref())?;
        }
        Ok(store)
    }
}

impl MessageStore for MemoryStore {
    fn list(&self) -> Result<Vec<Message>, StoreError> {
        let inner = self.inner.lock();
        let mut messages: Vec<Message> = inner.messages.values().cloned().collect();
        messages.sort_by(|a, b| a.text.cmp(&b.text).then(a.id.cmp(&b.id)));
        Ok(messages)
    }

    fn add(&self, text: &str) -> Result<Message, StoreError> {
        let mut inner = self.inner.lock();
        let id = inner.next_id.ok_or(StoreError::IdsExhausted)?;
        inner.next_id = id.checked_add(1);

        let message = Message {
            id,
            text: text.to_string(),
        };
        inner.messages.insert(id, message.clone());
        debug!(id, "message stored");
        Ok(message)
    }

    fn delete(&self, id: u32) -> Result<bool, StoreError> {
        Ok(self.inner.lock().messages.remove(&id).is_some())
    }

    fn delete_all(&self) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock();
        let count = inner.messages.len();
        inner.messages.clear();
        Ok(count)
    }
}
