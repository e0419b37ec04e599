use super::models::Document;
use super::reference::convert_fields_to_serde_value;
use super::FirestoreError;
use serde::de::DeserializeOwned;

/// A document returned by a query, paired with its id.
#[derive(Debug, Clone)]
pub struct DocumentSnapshot {
    pub(crate) id: String,
    pub(crate) document: Document,
}

impl DocumentSnapshot {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Full resource name of the document.
    pub fn name(&self) -> &str {
        &self.document.name
    }

    /// Decodes the document fields into `T`.
    pub fn data<T: DeserializeOwned>(&self) -> Result<T, FirestoreError> {
        let serde_value = convert_fields_to_serde_value(self.document.fields.clone())?;
        Ok(serde_json::from_value(serde_value)?)
    }
}

/// The result set of an executed query.
#[derive(Debug, Clone, Default)]
pub struct QuerySnapshot {
    pub documents: Vec<DocumentSnapshot>,
}

impl QuerySnapshot {
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}
