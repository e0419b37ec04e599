pub mod keys;
pub mod models;
pub mod verifier;

#[cfg(test)]
mod tests;

use crate::auth::models::{
    CreateUserRequest, DeleteAccountRequest, GetAccountInfoRequest, GetAccountInfoResponse,
    ListUsersResponse, SignInRequest, SignInResponse, UpdateUserRequest, UserRecord,
};
use crate::core::parse_error_response;
use reqwest::header;
use reqwest_middleware::ClientWithMiddleware;
use thiserror::Error;

const IDENTITY_TOOLKIT_V1: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    ApiError(String),
    #[error("user not found")]
    UserNotFound,
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Pass-through client for the Identity Toolkit accounts API.
///
/// Adds no policy of its own: failures are whatever the service reports,
/// mapped to `AuthError` and propagated.
#[derive(Clone)]
pub struct FirebaseAuth {
    client: ClientWithMiddleware,
    base_url: String,
}

impl FirebaseAuth {
    pub fn new(client: ClientWithMiddleware, project_id: String) -> Self {
        Self {
            client,
            base_url: format!("{}/projects/{}", IDENTITY_TOOLKIT_V1, project_id),
        }
    }

    /// Points the client at a custom base URL, used by tests to talk to a
    /// mock server instead of Google.
    pub fn new_with_url(client: ClientWithMiddleware, base_url: String) -> Self {
        Self { client, base_url }
    }

    async fn post_json<Req: serde::Serialize>(
        &self,
        url: &str,
        request: &Req,
        context: &str,
    ) -> Result<reqwest::Response, AuthError> {
        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(serde_json::to_vec(request)?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::ApiError(
                parse_error_response(response, context).await,
            ));
        }
        Ok(response)
    }

    /// Creates a new account. This is the sign-up path: Identity Toolkit
    /// hashes the password server-side.
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserRecord, AuthError> {
        let url = format!("{}/accounts", self.base_url);
        let response = self.post_json(&url, &request, "create user failed").await?;
        Ok(response.json().await?)
    }

    pub async fn update_user(&self, request: UpdateUserRequest) -> Result<UserRecord, AuthError> {
        let url = format!("{}/accounts:update", self.base_url);
        let response = self.post_json(&url, &request, "update user failed").await?;
        Ok(response.json().await?)
    }

    pub async fn delete_user(&self, uid: &str) -> Result<(), AuthError> {
        let url = format!("{}/accounts:delete", self.base_url);
        let request = DeleteAccountRequest {
            local_id: uid.to_string(),
        };
        self.post_json(&url, &request, "delete user failed").await?;
        Ok(())
    }

    async fn get_account_info(
        &self,
        request: GetAccountInfoRequest,
    ) -> Result<UserRecord, AuthError> {
        let url = format!("{}/accounts:lookup", self.base_url);
        let response = self.post_json(&url, &request, "lookup failed").await?;

        let result: GetAccountInfoResponse = response.json().await?;
        result
            .users
            .and_then(|mut users| users.pop())
            .ok_or(AuthError::UserNotFound)
    }

    pub async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        self.get_account_info(GetAccountInfoRequest {
            local_id: Some(vec![uid.to_string()]),
            email: None,
        })
        .await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<UserRecord, AuthError> {
        self.get_account_info(GetAccountInfoRequest {
            local_id: None,
            email: Some(vec![email.to_string()]),
        })
        .await
    }

    pub async fn list_users(
        &self,
        max_results: u32,
        page_token: Option<&str>,
    ) -> Result<ListUsersResponse, AuthError> {
        let url = format!("{}/accounts", self.base_url);

        let mut params = vec![("maxResults", max_results.to_string())];
        if let Some(token) = page_token {
            params.push(("nextPageToken", token.to_string()));
        }

        let response = self.client.get(&url).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(AuthError::ApiError(
                parse_error_response(response, "list users failed").await,
            ));
        }
        Ok(response.json().await?)
    }

    /// Replaces the custom claims on an account. Claims must be a JSON
    /// object; Identity Toolkit stores them as a serialized string.
    pub async fn set_custom_claims(
        &self,
        uid: &str,
        claims: &serde_json::Value,
    ) -> Result<UserRecord, AuthError> {
        let request = UpdateUserRequest {
            local_id: uid.to_string(),
            custom_attributes: Some(serde_json::to_string(claims)?),
            ..Default::default()
        };
        self.update_user(request).await
    }

    /// Exchanges an email/password pair for an ID token.
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, AuthError> {
        // signInWithPassword is not project-scoped; the bearer token from
        // the middleware stands in for an API key.
        let url = match self.base_url.find("/projects/") {
            Some(idx) => format!("{}/accounts:signInWithPassword", &self.base_url[..idx]),
            None => format!("{}/accounts:signInWithPassword", self.base_url),
        };
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
            return_secure_token: true,
        };
        let response = self.post_json(&url, &request, "sign-in failed").await?;
        Ok(response.json().await?)
    }
}
