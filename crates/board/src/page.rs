//! Handlers behind the message board's index page.
//!
//! Each handler takes the store it works on as a parameter. Routing,
//! rendering and redirects belong to the host; handlers only return what
//! the host needs to decide between showing the page again and redirecting.

use crate::analysis;
use crate::error::BoardError;
use crate::model::{Message, NewMessage, ValidationError};
use crate::store::MessageStore;
use tracing::{info, warn};

/// Result of submitting the add-message form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The message was stored; the host should redirect back to the page.
    Added(Message),

    /// The form was rejected; the host should render the page again with
    /// these errors and the current messages.
    Invalid {
        errors: Vec<ValidationError>,
        messages: Vec<Message>,
    },
}

/// Page state that outlives a single request.
///
/// Only the analysis result is kept, and it is handed out once.
#[derive(Debug, Default)]
pub struct IndexPage {
    analysis_result: Option<String>,
}

impl IndexPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages to render.
    pub fn on_get(&self, store: &dyn MessageStore) -> Result<Vec<Message>, BoardError> {
        Ok(store.list()?)
    }

    pub fn on_post_add_message(
        &self,
        store: &dyn MessageStore,
        form: NewMessage,
    ) -> Result<AddOutcome, BoardError> {
        if let Err(errors) = form.validate() {
            warn!(errors = errors.len(), "message rejected by validation");
            return Ok(AddOutcome::Invalid {
                errors,
                messages: store.list()?,
            });
        }

        let message = store.add(&form.text)?;
        info!(id = message.id, "message added");
        Ok(AddOutcome::Added(message))
    }

    /// Deletes every message, returning how many were removed.
    pub fn on_post_delete_all_messages(
        &self,
        store: &dyn MessageStore,
    ) -> Result<usize, BoardError> {
        let removed = store.delete_all()?;
        info!(removed, "all messages deleted");
        Ok(removed)
    }

    /// Deletes one message. An unknown id is ignored.
    pub fn on_post_delete_message(
        &self,
        store: &dyn MessageStore,
        id: u32,
    ) -> Result<(), BoardError> {
        if store.delete(id)? {
            info!(id, "message deleted");
        }
        Ok(())
    }

    /// Computes the average word count and keeps the sentence for the next
    /// [`IndexPage::take_analysis_result`].
    pub fn on_post_analyze_messages(
        &mut self,
        store: &dyn MessageStore,
    ) -> Result<String, BoardError> {
        let messages = store.list()?;
        let result = analysis::summarize(&messages);
        self.analysis_result = Some(result.clone());
        Ok(result)
    }

    /// Returns the pending analysis result, clearing it.
    pub fn take_analysis_result(&mut self) -> Option<String> {
        self.analysis_result.take()
    }
}
