use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, insert_tenant_context, render_template, service_error_redirect};
use crate::services::main as main_service;

#[get("/dashboard")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "dashboard");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("stats", &data.stats);
            context.insert("last_sales", &data.last_sales);
            render_template(&tera, "dashboard.html", &context)
        }
        Err(err) => service_error_redirect(err, "/billing"),
    }
}
