use super::models::{
    CollectionSelector, CompositeFilter, CompositeOperator, Cursor, Direction, FieldFilter,
    FieldOperator, FieldReference, FilterType, Order, QueryFilter, RunQueryRequest,
    RunQueryResponse, StructuredQuery, Value, ValueType,
};
use super::reference::{convert_serde_value_to_firestore_value, document_id};
use super::snapshot::{DocumentSnapshot, QuerySnapshot};
use super::FirestoreError;
use crate::core::parse_error_response;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;

/// A structured-query definition for a single collection.
///
/// Built independently of a client so a definition can be reused; attach it
/// with [`crate::firestore::FirebaseFirestore::query`] to execute.
#[derive(Clone, Debug)]
pub struct Query {
    pub(crate) query: StructuredQuery,
}

impl Query {
    pub fn new(collection_id: impl Into<String>) -> Self {
        Self {
            query: StructuredQuery {
                from: Some(vec![CollectionSelector {
                    collection_id: collection_id.into(),
                }]),
                where_clause: None,
                order_by: None,
                start_at: None,
                limit: None,
            },
        }
    }

    /// Adds a field filter; multiple filters are combined with AND.
    pub fn where_filter<T: Serialize>(
        mut self,
        field: &str,
        op: FieldOperator,
        value: T,
    ) -> Result<Self, FirestoreError> {
        let serde_value = serde_json::to_value(value)?;
        let firestore_value = convert_serde_value_to_firestore_value(serde_value)?;

        let filter = QueryFilter {
            filter_type: Some(FilterType::FieldFilter(FieldFilter {
                field: FieldReference {
                    field_path: field.to_string(),
                },
                op,
                value: firestore_value,
            })),
        };

        self.query.where_clause = Some(match self.query.where_clause.take() {
            None => filter,
            Some(existing) => {
                let filters = match existing.filter_type {
                    Some(FilterType::CompositeFilter(cf)) if cf.op == CompositeOperator::And => {
                        let mut filters = cf.filters;
                        filters.push(filter);
                        filters
                    }
                    _ => vec![existing, filter],
                };
                QueryFilter {
                    filter_type: Some(FilterType::CompositeFilter(CompositeFilter {
                        op: CompositeOperator::And,
                        filters,
                    })),
                }
            }
        });

        Ok(self)
    }

    pub fn order_by(mut self, field: &str, direction: Direction) -> Self {
        let order = Order {
            field: FieldReference {
                field_path: field.to_string(),
            },
            direction,
        };
        self.query.order_by.get_or_insert_with(Vec::new).push(order);
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    /// Resumes the query just after the document with the given resource
    /// name. Requires an `order_by` on `__name__`.
    pub fn start_after_document(mut self, resource_name: &str) -> Self {
        self.query.start_at = Some(Cursor {
            values: vec![Value {
                value_type: ValueType::ReferenceValue(resource_name.to_string()),
            }],
            before: false,
        });
        self
    }
}

/// A [`Query`] bound to a Firestore client, ready for execution.
pub struct ExecutableQuery<'a> {
    pub(crate) client: &'a ClientWithMiddleware,
    pub(crate) parent_path: String,
    pub(crate) query: Query,
}

impl<'a> ExecutableQuery<'a> {
    pub(crate) fn new(
        client: &'a ClientWithMiddleware,
        parent_path: String,
        query: Query,
    ) -> Self {
        Self {
            client,
            parent_path,
            query,
        }
    }

    /// Executes the query and collects the matching documents.
    pub async fn get(&self) -> Result<QuerySnapshot, FirestoreError> {
        let url = format!("{}:runQuery", self.parent_path);
        let request = RunQueryRequest {
            structured_query: self.query.query.clone(),
        };

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(&request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FirestoreError::ApiError(
                parse_error_response(response, "run query failed").await,
            ));
        }

        let responses: Vec<RunQueryResponse> = response.json().await?;

        let documents = responses
            .into_iter()
            .filter_map(|res| res.document)
            .map(|doc| DocumentSnapshot {
                id: document_id(&doc.name),
                document: doc,
            })
            .collect();

        Ok(QuerySnapshot { documents })
    }
}
