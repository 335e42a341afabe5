//! 1Password item types as emitted by `op --format json`.

use serde::Deserialize;

/// Reserved identifier of the built-in notes field on a secure note.
pub const NOTES_FIELD_ID: &str = "notesPlain";

/// A single item fetched from the store.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    /// Item UUID
    #[serde(default)]
    pub id: String,
    /// Item title (e.g. "_CP")
    pub title: String,
    /// Item category (e.g. "SECURE_NOTE")
    #[serde(default)]
    pub category: Option<String>,
    /// All fields on the item
    #[serde(default)]
    pub fields: Vec<ItemField>,
}

/// A named field within an item.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemField {
    /// Field identifier
    #[serde(default)]
    pub id: String,
    /// Field type (e.g. "STRING", "CONCEALED")
    #[serde(rename = "type", default)]
    pub field_type: Option<String>,
    /// Field purpose (e.g. "NOTES")
    #[serde(default)]
    pub purpose: Option<String>,
    /// Human-readable label
    #[serde(default)]
    pub label: Option<String>,
    /// Current value, if any
    #[serde(default)]
    pub value: Option<String>,
}

impl Item {
    /// Select the field that holds free-form note text.
    ///
    /// Selection is three-tiered: a field whose identifier is the reserved
    /// notes identifier wins; otherwise a field whose label mentions
    /// "note"/"notes" (case-insensitive); otherwise the first field that
    /// currently holds a value.
    pub fn notes_field(&self) -> Option<&ItemField> {
        if let Some(field) = self.fields.iter().find(|f| f.id == NOTES_FIELD_ID) {
            return Some(field);
        }

        if let Some(field) = self.fields.iter().find(|f| {
            f.label
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains("note"))
        }) {
            return Some(field);
        }

        self.fields.iter().find(|f| f.value.is_some())
    }
}

impl ItemField {
    /// The name to address this field by in an `op item edit` assignment.
    pub fn edit_target(&self) -> &str {
        if self.id == NOTES_FIELD_ID {
            return NOTES_FIELD_ID;
        }
        if let Some(label) = self.label.as_deref() {
            if !label.is_empty() {
                return label;
            }
        }
        if !self.id.is_empty() {
            return &self.id;
        }
        NOTES_FIELD_ID
    }
}
