use crate::auth::models::CreateUserRequest;
use crate::error::AppError;
use crate::state::AppState;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login).service(me);
}

#[derive(Debug, Deserialize)]
pub struct RegisterReq {
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

#[post("/api/auth/register")]
async fn register(
    state: web::Data<AppState>,
    payload: web::Json<RegisterReq>,
) -> Result<impl Responder, AppError> {
    let payload = payload.into_inner();
    let user = state
        .auth
        .create_user(CreateUserRequest {
            email: Some(payload.email),
            password: Some(payload.password),
            display_name: payload.display_name,
            ..Default::default()
        })
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "uid": user.local_id,
        "email": user.email,
        "display_name": user.display_name
    })))
}

#[post("/api/auth/login")]
async fn login(
    state: web::Data<AppState>,
    payload: web::Json<LoginReq>,
) -> Result<impl Responder, AppError> {
    let signed_in = state
        .auth
        .sign_in_with_password(&payload.email, &payload.password)
        .await?;
    Ok(HttpResponse::Ok().json(signed_in))
}

/// Verifies the bearer ID token and echoes its claims.
#[get("/api/auth/me")]
async fn me(state: web::Data<AppState>, req: HttpRequest) -> Result<impl Responder, AppError> {
    let token = bearer_token(&req)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;
    let claims = state.verifier.verify_token(token).await?;
    Ok(HttpResponse::Ok().json(claims))
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}
