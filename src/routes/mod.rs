use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::auth::AuthenticatedUser;
use crate::repository::{FeatureReader, StoreReader};
use crate::services::{ServiceError, context as context_service};

pub mod auth;
pub mod billing;
pub mod customers;
pub mod main;
pub mod orders;
pub mod products;
pub mod sales;
pub mod settings;
pub mod tabs;

/// 303 redirect to the given location.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Renders a Tera template, logging and returning a 500 on failure.
pub fn render_template(tera: &Tera, name: &str, context: &Context) -> HttpResponse {
    match tera.render(name, context) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(err) => {
            log::error!("Failed to render template {name}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Builds the context every page starts from: flash messages, the current
/// user and the active navigation entry.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: Option<&AuthenticatedUser>,
    active: &str,
) -> Context {
    let alerts: Vec<(&str, &str)> = flash_messages
        .iter()
        .map(|message| {
            let level = match message.level() {
                Level::Error => "error",
                Level::Warning => "warning",
                Level::Success => "success",
                _ => "info",
            };
            (level, message.content())
        })
        .collect();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("user", &user);
    context.insert("active", active);
    context
}

/// Inserts the tenant context (branding, segment, plan, flag map) used by the
/// navigation. Failures only log: a page is still usable without it.
pub fn insert_tenant_context<R>(context: &mut Context, repo: &R, user: &AuthenticatedUser)
where
    R: StoreReader + FeatureReader + ?Sized,
{
    match context_service::load_tenant_context(repo, user) {
        Ok(tenant) => context.insert("tenant", &tenant),
        Err(err) => log::error!("Failed to load tenant context: {err}"),
    }
}

/// Formats cents the way the templates and exports show money: `12,34`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}{},{:02}", cents / 100, cents % 100)
}

/// Tera filter wrapping [`format_cents`].
pub fn money_filter(
    value: &tera::Value,
    _args: &std::collections::HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let cents = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("money filter expects an integer amount in cents"))?;
    Ok(tera::Value::String(format_cents(cents)))
}

/// Shared translation of service failures into a flash message plus a
/// redirect. Gating failures land on the billing page; everything else goes
/// back to `fallback`.
pub fn service_error_redirect(err: ServiceError, fallback: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            FlashMessage::error("Sem permissão para esta ação.").send();
            redirect(fallback)
        }
        ServiceError::SubscriptionBlocked(reason) => {
            FlashMessage::error(reason).send();
            redirect("/billing")
        }
        ServiceError::FeatureNotLicensed(_) => {
            FlashMessage::error("Disponível apenas no plano superior.").send();
            redirect("/billing")
        }
        ServiceError::ProductNotFound => {
            FlashMessage::error("Produto não encontrado.").send();
            redirect(fallback)
        }
        ServiceError::InsufficientStock(name) => {
            FlashMessage::error(format!("Estoque insuficiente para {name}.")).send();
            redirect(fallback)
        }
        ServiceError::InvalidStatus(_) => {
            FlashMessage::error("Status inválido.").send();
            redirect(fallback)
        }
        ServiceError::NotFound => {
            FlashMessage::error("Registro não encontrado.").send();
            redirect(fallback)
        }
        ServiceError::Conflict => {
            FlashMessage::error("Registro já existe.").send();
            redirect(fallback)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(fallback)
        }
        ServiceError::Repository(err) => {
            log::error!("Repository failure: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
