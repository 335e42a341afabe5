//! Backend services.

pub mod clipboard;
pub mod notifier;
pub mod op_cli;
pub mod store;

pub use notifier::{Level, Notifier};
pub use op_cli::OpCli;
pub use store::{save_text, Lookup, SaveOutcome, SecureNoteStore, StoreError};
