use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::routes::{base_context, insert_tenant_context, render_template};

/// The billing page stays reachable for a blocked tenant; it is where the
/// gates redirect to.
#[get("/billing")]
pub async fn show_billing(
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let mut context = base_context(&flash_messages, user.as_ref(), "billing");
    if let Some(user) = user.as_ref() {
        insert_tenant_context(&mut context, repo.get_ref(), user);
    }

    context.insert("pix_key", &config.pix_key);
    context.insert("plan_price", &config.plan_price);
    context.insert("support_whatsapp", &config.support_whatsapp);
    context.insert(
        "message",
        "Faça o PIX e envie o comprovante no WhatsApp para liberar/renovar sua assinatura.",
    );

    render_template(&tera, "billing.html", &context)
}
