use super::models::{
    CommitRequest, CommitResponse, Document, DocumentMask, Write, WriteOperation, WriteResult,
};
use super::reference::convert_serializable_to_fields;
use super::FirestoreError;
use crate::core::parse_error_response;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;

/// A batch of writes committed in a single request.
///
/// Firestore caps a commit at 500 writes; callers chunk above that.
pub struct WriteBatch<'a> {
    client: &'a ClientWithMiddleware,
    base_url: String,
    resource_root: String,
    writes: Vec<Write>,
}

impl<'a> WriteBatch<'a> {
    pub(crate) fn new(
        client: &'a ClientWithMiddleware,
        base_url: String,
        resource_root: String,
    ) -> Self {
        Self {
            client,
            base_url,
            resource_root,
            writes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.writes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    fn resource_name(&self, document_path: &str) -> String {
        format!("{}/{}", self.resource_root, document_path)
    }

    /// Queues an overwrite of the document at `document_path`.
    pub fn set<T: Serialize>(
        &mut self,
        document_path: &str,
        value: &T,
    ) -> Result<&mut Self, FirestoreError> {
        let fields = convert_serializable_to_fields(value)?;
        self.writes.push(Write {
            update_mask: None,
            current_document: None,
            operation: WriteOperation::Update(Document {
                name: self.resource_name(document_path),
                fields,
                create_time: String::new(),
                update_time: String::new(),
            }),
        });
        Ok(self)
    }

    /// Queues a merge write: only the serialized fields are touched, the
    /// document is created when absent.
    pub fn set_merge<T: Serialize>(
        &mut self,
        document_path: &str,
        value: &T,
    ) -> Result<&mut Self, FirestoreError> {
        let fields = convert_serializable_to_fields(value)?;
        let field_paths = fields.keys().cloned().collect();
        self.writes.push(Write {
            update_mask: Some(DocumentMask { field_paths }),
            current_document: None,
            operation: WriteOperation::Update(Document {
                name: self.resource_name(document_path),
                fields,
                create_time: String::new(),
                update_time: String::new(),
            }),
        });
        Ok(self)
    }

    /// Queues a delete of the document at `document_path`.
    pub fn delete(&mut self, document_path: &str) -> &mut Self {
        let name = self.resource_name(document_path);
        self.writes.push(Write {
            update_mask: None,
            current_document: None,
            operation: WriteOperation::Delete(name),
        });
        self
    }

    /// Commits the queued writes. The batch is reusable afterwards.
    pub async fn commit(&mut self) -> Result<Vec<WriteResult>, FirestoreError> {
        let writes = std::mem::take(&mut self.writes);
        if writes.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}:commit", self.base_url);
        let request = CommitRequest { writes };

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(
                parse_error_response(response, "commit batch failed").await,
            ));
        }

        let result: CommitResponse = response.json().await?;
        Ok(result.write_results)
    }
}
