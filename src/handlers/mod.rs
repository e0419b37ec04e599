use actix_web::web;

pub mod admin;
pub mod auth_api;
pub mod pages;
pub mod users;

/// Registers every API route. Template pages hang off the default service
/// (see `pages::page`), so they are wired up in `main` after the static
/// file service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    pages::configure(cfg);
    auth_api::configure(cfg);
    users::configure(cfg);
    admin::configure(cfg);
}
