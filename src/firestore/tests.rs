use super::models::{Direction, FieldOperator};
use super::query::Query;
use super::FirebaseFirestore;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde::{Deserialize, Serialize};
use serde_json::json;

const BASE: &str = "/v1/projects/p/databases/(default)/documents";

fn firestore_against(server: &MockServer) -> FirebaseFirestore {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseFirestore::new_with_url(client, server.url(BASE))
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Client_ {
    name: String,
    age: i64,
    username: String,
    notes: Option<String>,
}

#[tokio::test]
async fn get_decodes_the_wire_value_encoding() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    let mock = server.mock(|when, then| {
        when.method(GET).path(format!("{}/clients/7", BASE));
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/clients/7",
            "fields": {
                "name": { "stringValue": "Mei Lin" },
                "age": { "integerValue": "34" },
                "username": { "stringValue": "meilin" },
                "notes": { "nullValue": null }
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    let client: Option<Client_> = db.doc("clients/7").get().await.unwrap();
    assert_eq!(
        client,
        Some(Client_ {
            name: "Mei Lin".to_string(),
            age: 34,
            username: "meilin".to_string(),
            notes: None,
        })
    );
    mock.assert();
}

#[tokio::test]
async fn get_of_a_missing_document_is_none() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    server.mock(|when, then| {
        when.method(GET).path(format!("{}/clients/999", BASE));
        then.status(404).json_body(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        }));
    });

    let client: Option<Client_> = db.doc("clients/999").get().await.unwrap();
    assert!(client.is_none());
}

#[tokio::test]
async fn set_encodes_fields_in_firestore_form() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    let mock = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path(format!("{}/clients/7", BASE))
            .json_body(json!({
                "fields": {
                    "name": { "stringValue": "Mei Lin" },
                    "age": { "integerValue": "34" },
                    "username": { "stringValue": "meilin" },
                    "notes": { "nullValue": null }
                }
            }));
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/clients/7",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    db.doc("clients/7")
        .set(&Client_ {
            name: "Mei Lin".to_string(),
            age: 34,
            username: "meilin".to_string(),
            notes: None,
        })
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn datetime_fields_encode_as_native_timestamps() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    let mock = server.mock(|when, then| {
        when.method(httpmock::Method::PATCH)
            .path(format!("{}/clients/7", BASE))
            .json_body(json!({
                "fields": {
                    "name": { "stringValue": "Mei Lin" },
                    "updated_at": { "timestampValue": "2024-03-05T08:30:00+00:00" }
                }
            }));
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/clients/7",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-03-05T08:30:00Z"
        }));
    });

    db.doc("clients/7")
        .set(&json!({
            "name": "Mei Lin",
            "updated_at": "2024-03-05T08:30:00+00:00"
        }))
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn add_returns_the_server_assigned_id() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    server.mock(|when, then| {
        when.method(POST).path(format!("{}/clients", BASE));
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/clients/AbC123",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    let id = db
        .collection("clients")
        .add(&json!({ "name": "Mei Lin" }))
        .await
        .unwrap();
    assert_eq!(id, "AbC123");
}

#[tokio::test]
async fn paginated_query_sends_name_cursor() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{}:runQuery", BASE))
            .json_body(json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "clients" }],
                    "orderBy": [{
                        "field": { "fieldPath": "__name__" },
                        "direction": "ASCENDING"
                    }],
                    "startAt": {
                        "values": [{
                            "referenceValue": "projects/p/databases/(default)/documents/clients/7"
                        }],
                        "before": false
                    },
                    "limit": 2
                }
            }));
        then.status(200).json_body(json!([
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/clients/8",
                    "fields": { "username": { "stringValue": "u8" } },
                    "createTime": "2024-01-01T00:00:00Z",
                    "updateTime": "2024-01-01T00:00:00Z"
                },
                "readTime": "2024-01-02T00:00:00Z"
            },
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/clients/9",
                    "fields": { "username": { "stringValue": "u9" } },
                    "createTime": "2024-01-01T00:00:00Z",
                    "updateTime": "2024-01-01T00:00:00Z"
                },
                "readTime": "2024-01-02T00:00:00Z"
            }
        ]));
    });

    let query = Query::new("clients")
        .order_by("__name__", Direction::Ascending)
        .start_after_document(&db.document_name("clients/7"))
        .limit(2);

    let snapshot = db.query(query).get().await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.documents[0].id(), "8");
    assert_eq!(snapshot.documents[1].id(), "9");
    mock.assert();
}

#[tokio::test]
async fn filtered_query_builds_a_field_filter() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{}:runQuery", BASE))
            .json_body(json!({
                "structuredQuery": {
                    "from": [{ "collectionId": "clients" }],
                    "where": {
                        "fieldFilter": {
                            "field": { "fieldPath": "username" },
                            "op": "EQUAL",
                            "value": { "stringValue": "meilin" }
                        }
                    }
                }
            }));
        then.status(200).json_body(json!([ { "readTime": "2024-01-02T00:00:00Z" } ]));
    });

    let query = Query::new("clients")
        .where_filter("username", FieldOperator::Equal, "meilin")
        .unwrap();
    let snapshot = db.query(query).get().await.unwrap();
    assert!(snapshot.is_empty());
    mock.assert();
}

#[tokio::test]
async fn batch_commit_mixes_sets_merge_sets_and_deletes() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(format!("{}:commit", BASE))
            .json_body(json!({
                "writes": [
                    {
                        "updateMask": { "fieldPaths": ["name"] },
                        "update": {
                            "name": "projects/p/databases/(default)/documents/clients/1",
                            "fields": { "name": { "stringValue": "Mei Lin" } }
                        }
                    },
                    {
                        // no mask: a plain set replaces the whole document
                        "update": {
                            "name": "projects/p/databases/(default)/documents/clients/3",
                            "fields": { "name": { "stringValue": "Li Wei" } }
                        }
                    },
                    {
                        "delete": "projects/p/databases/(default)/documents/clients/2"
                    }
                ]
            }));
        then.status(200).json_body(json!({
            "writeResults": [
                { "updateTime": "2024-01-02T00:00:00Z" },
                { "updateTime": "2024-01-02T00:00:00Z" },
                {}
            ],
            "commitTime": "2024-01-02T00:00:00Z"
        }));
    });

    let mut batch = db.batch();
    batch
        .set_merge("clients/1", &json!({ "name": "Mei Lin" }))
        .unwrap();
    batch.set("clients/3", &json!({ "name": "Li Wei" })).unwrap();
    batch.delete("clients/2");
    assert_eq!(batch.len(), 3);

    let results = batch.commit().await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(batch.is_empty());
    mock.assert();
}

#[tokio::test]
async fn empty_batch_commit_is_a_no_op() {
    let server = MockServer::start();
    let db = firestore_against(&server);

    // no mock registered: a request would fail the test
    let mut batch = db.batch();
    let results = batch.commit().await.unwrap();
    assert!(results.is_empty());
}
