//! # Board
//!
//! Request handlers for a single-page message board: list, add and delete
//! messages, and report the average word count.
//!
//! Storage is injected: every handler receives a `&dyn MessageStore`, so the
//! host decides which store backs a request.
//!
//! ```rust
//! use board::{AddOutcome, IndexPage, MemoryStore, NewMessage};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = MemoryStore::new();
//! let mut page = IndexPage::new();
//!
//! let outcome = page.on_post_add_message(&store, NewMessage::new("hello board"))?;
//! assert!(matches!(outcome, AddOutcome::Added(_)));
//!
//! page.on_post_analyze_messages(&store)?;
//! assert_eq!(
//!     page.take_analysis_result().as_deref(),
//!     Some("The average message length is 2 words.")
//! );
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod error;
pub mod model;
pub mod page;
pub mod store;

pub use error::{BoardError, StoreError};
pub use model::{Message, NewMessage, ValidationError, MAX_MESSAGE_LENGTH};
pub use page::{AddOutcome, IndexPage};
pub use store::{MemoryStore, MessageStore};
