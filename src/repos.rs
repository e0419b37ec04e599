use crate::firestore::models::Direction;
use crate::firestore::query::Query;
use crate::firestore::{FirebaseFirestore, FirestoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A document with its id, as handed to the HTTP layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keyed<T> {
    pub id: String,
    #[serde(flatten)]
    pub data: T,
}

/// One page of a cursor-paginated listing. `next_cursor` is the id of the
/// last document and is only present when the page came back full.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<Keyed<T>>,
    pub next_cursor: Option<String>,
}

/// Thin wrapper over a single Firestore collection, offering exactly the
/// operations the route handlers need.
#[derive(Clone)]
pub struct CollectionRepo {
    db: Arc<FirebaseFirestore>,
    collection: &'static str,
}

impl CollectionRepo {
    pub fn new(db: Arc<FirebaseFirestore>, collection: &'static str) -> Self {
        Self { db, collection }
    }

    fn doc_path(&self, id: &str) -> String {
        format!("{}/{}", self.collection, id)
    }

    pub async fn get<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>, FirestoreError> {
        self.db.doc(&self.doc_path(id)).get().await
    }

    /// Creates a document with a server-assigned id and returns the id.
    pub async fn create<T: Serialize>(&self, value: &T) -> Result<String, FirestoreError> {
        self.db.collection(self.collection).add(value).await
    }

    /// Patches only the fields present in `patch` (a JSON object).
    pub async fn patch(&self, id: &str, patch: &Value) -> Result<(), FirestoreError> {
        let mask = match patch {
            Value::Object(map) => map.keys().cloned().collect::<Vec<_>>(),
            _ => {
                return Err(FirestoreError::SerializationError(
                    serde::ser::Error::custom("patch body must be a JSON object"),
                ))
            }
        };
        self.db.doc(&self.doc_path(id)).update(patch, Some(mask)).await
    }

    pub async fn delete(&self, id: &str) -> Result<(), FirestoreError> {
        self.db.doc(&self.doc_path(id)).delete().await
    }

    /// Lists documents in `__name__` order. `cursor_after` is a document id
    /// from a previous page; the listing resumes just after it.
    pub async fn list<T: DeserializeOwned>(
        &self,
        limit: Option<i64>,
        cursor_after: Option<&str>,
    ) -> Result<Page<T>, FirestoreError> {
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE) as i32;

        let mut query = Query::new(self.collection)
            .order_by("__name__", Direction::Ascending)
            .limit(limit);
        if let Some(id) = cursor_after {
            query = query.start_after_document(&self.db.document_name(&self.doc_path(id)));
        }

        let snapshot = self.db.query(query).get().await?;

        let full_page = snapshot.len() as i32 == limit;
        let mut items = Vec::with_capacity(snapshot.len());
        for doc in &snapshot.documents {
            items.push(Keyed {
                id: doc.id().to_string(),
                data: doc.data()?,
            });
        }
        let next_cursor = if full_page {
            items.last().map(|k| k.id.clone())
        } else {
            None
        };

        Ok(Page { items, next_cursor })
    }
}
