use super::*;
use crate::auth::models::CreateUserRequest;
use httpmock::prelude::*;
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use serde_json::json;

fn auth_against(server: &MockServer) -> FirebaseAuth {
    let client = ClientBuilder::new(Client::new()).build();
    FirebaseAuth::new_with_url(client, server.url("/v1/projects/test-project"))
}

#[tokio::test]
async fn create_user_posts_to_accounts() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts")
            .header("content-type", "application/json")
            .json_body(json!({
                "email": "amy@example.com",
                "password": "hunter2",
                "displayName": "Amy"
            }));
        then.status(200)
            .header("content-type", "application/json")
            .json_body(json!({
                "localId": "uid-1",
                "email": "amy@example.com",
                "emailVerified": false,
                "displayName": "Amy",
                "disabled": false
            }));
    });

    let user = auth
        .create_user(CreateUserRequest {
            email: Some("amy@example.com".to_string()),
            password: Some("hunter2".to_string()),
            display_name: Some("Amy".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(user.local_id, "uid-1");
    assert_eq!(user.email.as_deref(), Some("amy@example.com"));
    mock.assert();
}

#[tokio::test]
async fn get_user_pops_the_single_lookup_result() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:lookup")
            .json_body(json!({ "localId": ["uid-1"] }));
        then.status(200).json_body(json!({
            "users": [{
                "localId": "uid-1",
                "email": "amy@example.com",
                "emailVerified": true,
                "disabled": false
            }]
        }));
    });

    let user = auth.get_user("uid-1").await.unwrap();
    assert_eq!(user.local_id, "uid-1");
    assert!(user.email_verified);
    mock.assert();
}

#[tokio::test]
async fn lookup_without_matches_is_user_not_found() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:lookup");
        then.status(200).json_body(json!({}));
    });

    let err = auth.get_user_by_email("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));
}

#[tokio::test]
async fn api_errors_carry_the_upstream_message() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:delete");
        then.status(400).json_body(json!({
            "error": { "code": 400, "message": "USER_NOT_FOUND", "status": "INVALID_ARGUMENT" }
        }));
    });

    let err = auth.delete_user("ghost").await.unwrap_err();
    match err {
        AuthError::ApiError(msg) => assert!(msg.contains("USER_NOT_FOUND"), "got: {}", msg),
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn set_custom_claims_serializes_the_claims_object() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/projects/test-project/accounts:update")
            .json_body(json!({
                "localId": "uid-1",
                "customAttributes": "{\"admin\":true}"
            }));
        then.status(200).json_body(json!({
            "localId": "uid-1",
            "emailVerified": false,
            "disabled": false,
            "customAttributes": "{\"admin\":true}"
        }));
    });

    let user = auth
        .set_custom_claims("uid-1", &json!({ "admin": true }))
        .await
        .unwrap();
    assert_eq!(user.custom_attributes.as_deref(), Some("{\"admin\":true}"));
    mock.assert();
}

#[tokio::test]
async fn sign_in_uses_the_unscoped_accounts_endpoint() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/accounts:signInWithPassword")
            .json_body(json!({
                "email": "amy@example.com",
                "password": "hunter2",
                "returnSecureToken": true
            }));
        then.status(200).json_body(json!({
            "localId": "uid-1",
            "email": "amy@example.com",
            "idToken": "id-token-abc",
            "refreshToken": "refresh-xyz",
            "expiresIn": "3600"
        }));
    });

    let signed_in = auth
        .sign_in_with_password("amy@example.com", "hunter2")
        .await
        .unwrap();
    assert_eq!(signed_in.id_token, "id-token-abc");
    assert_eq!(signed_in.local_id, "uid-1");
    mock.assert();
}

#[tokio::test]
async fn list_users_forwards_pagination_params() {
    let server = MockServer::start();
    let auth = auth_against(&server);

    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/projects/test-project/accounts")
            .query_param("maxResults", "2")
            .query_param("nextPageToken", "tok-1");
        then.status(200).json_body(json!({
            "users": [
                { "localId": "a", "emailVerified": false, "disabled": false },
                { "localId": "b", "emailVerified": false, "disabled": false }
            ],
            "nextPageToken": "tok-2"
        }));
    });

    let page = auth.list_users(2, Some("tok-1")).await.unwrap();
    assert_eq!(page.users.unwrap().len(), 2);
    assert_eq!(page.next_page_token.as_deref(), Some("tok-2"));
    mock.assert();
}
