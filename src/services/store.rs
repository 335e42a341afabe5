//! Secure-note store seam and the capture-save flow.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Item;

/// Result of looking up the capture item by title.
///
/// Lookup failure is deliberately not a variant: a failed query surfaces as
/// an error instead of being treated as absence, so a flaky CLI call can
/// never fork a second item with the same title.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// An item with the requested title exists.
    Found(Item),
    /// The store answered and no item with that title exists.
    NotFound,
}

/// Errors from talking to the external store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to run 1Password CLI: {0}")]
    Io(#[from] std::io::Error),

    #[error("1Password CLI timed out after {0}s")]
    Timeout(u64),

    #[error("1Password CLI failed ({status}): {stderr}")]
    CommandFailed {
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("could not parse 1Password CLI output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What a successful save did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Store operations needed by the capture-save flow.
#[async_trait]
pub trait SecureNoteStore {
    /// Check whether an item with the given title exists.
    async fn lookup(&self, title: &str) -> Result<Lookup, StoreError>;

    /// Create a new secure note with the given title and note text.
    async fn create(&self, title: &str, text: &str) -> Result<(), StoreError>;

    /// Overwrite the notes field of an existing item with the given text.
    async fn update(&self, item: &Item, text: &str) -> Result<(), StoreError>;
}

/// Save captured text into the titled secure note, creating it if absent.
pub async fn save_text<S>(store: &S, title: &str, text: &str) -> Result<SaveOutcome, StoreError>
where
    S: SecureNoteStore + ?Sized + Sync,
{
    match store.lookup(title).await? {
        Lookup::Found(item) => {
            store.update(&item, text).await?;
            Ok(SaveOutcome::Updated)
        }
        Lookup::NotFound => {
            store.create(title, text).await?;
            Ok(SaveOutcome::Created)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Lookup(String),
        Create(String, String),
        Update(String, String),
    }

    enum LookupBehavior {
        Found,
        NotFound,
        Fail,
    }

    struct MockStore {
        behavior: LookupBehavior,
        calls: Mutex<Vec<Call>>,
    }

    impl MockStore {
        fn new(behavior: LookupBehavior) -> Self {
            Self {
                behavior,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn existing_item(title: &str) -> Item {
            serde_json::from_str(&format!(
                r#"{{
                    "id": "existing",
                    "title": "{title}",
                    "category": "SECURE_NOTE",
                    "fields": [
                        {{ "id": "notesPlain", "label": "notesPlain", "value": "old" }}
                    ]
                }}"#
            ))
            .unwrap()
        }

        fn into_calls(self) -> Vec<Call> {
            self.calls.into_inner().unwrap()
        }
    }

    #[async_trait]
    impl SecureNoteStore for MockStore {
        async fn lookup(&self, title: &str) -> Result<Lookup, StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Lookup(title.to_string()));
            match self.behavior {
                LookupBehavior::Found => Ok(Lookup::Found(Self::existing_item(title))),
                LookupBehavior::NotFound => Ok(Lookup::NotFound),
                LookupBehavior::Fail => Err(StoreError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    "op not on PATH",
                ))),
            }
        }

        async fn create(&self, title: &str, text: &str) -> Result<(), StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Create(title.to_string(), text.to_string()));
            Ok(())
        }

        async fn update(&self, item: &Item, text: &str) -> Result<(), StoreError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Update(item.title.clone(), text.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_creates_when_absent() {
        let store = MockStore::new(LookupBehavior::NotFound);
        let outcome = save_text(&store, "_CP", "captured").await.unwrap();

        assert_eq!(outcome, SaveOutcome::Created);
        assert_eq!(
            store.into_calls(),
            vec![
                Call::Lookup("_CP".to_string()),
                Call::Create("_CP".to_string(), "captured".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_updates_when_present_without_retitling() {
        let store = MockStore::new(LookupBehavior::Found);
        let outcome = save_text(&store, "_CP", "captured").await.unwrap();

        assert_eq!(outcome, SaveOutcome::Updated);
        assert_eq!(
            store.into_calls(),
            vec![
                Call::Lookup("_CP".to_string()),
                Call::Update("_CP".to_string(), "captured".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_writes_nothing() {
        let store = MockStore::new(LookupBehavior::Fail);
        let result = save_text(&store, "_CP", "captured").await;

        assert!(result.is_err());
        assert_eq!(store.into_calls(), vec![Call::Lookup("_CP".to_string())]);
    }

    #[tokio::test]
    async fn test_repeated_saves_hit_the_same_item() {
        let store = MockStore::new(LookupBehavior::Found);
        save_text(&store, "_CP", "first").await.unwrap();
        save_text(&store, "_CP", "second").await.unwrap();

        assert_eq!(
            store.into_calls(),
            vec![
                Call::Lookup("_CP".to_string()),
                Call::Update("_CP".to_string(), "first".to_string()),
                Call::Lookup("_CP".to_string()),
                Call::Update("_CP".to_string(), "second".to_string()),
            ]
        );
    }
}
