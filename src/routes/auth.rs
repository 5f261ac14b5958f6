use actix_identity::Identity;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{LoginForm, SetupForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template, service_error_redirect};
use crate::services::{ServiceError, auth as auth_service};

#[get("/")]
pub async fn index() -> impl Responder {
    redirect("/login")
}

#[get("/login")]
pub async fn login_page(flash_messages: IncomingFlashMessages, tera: web::Data<Tera>) -> impl Responder {
    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "login.html", &context)
}

#[post("/login")]
pub async fn login_action(
    request: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth_service::login(repo.get_ref(), form) {
        Ok(user) => {
            if let Err(err) = user.login(&request) {
                log::error!("Failed to attach session identity: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            redirect("/dashboard")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Loja não encontrada.").send();
            redirect("/login")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Usuário ou senha inválidos.").send();
            redirect("/login")
        }
        Err(err) => service_error_redirect(err, "/login"),
    }
}

#[get("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    redirect("/login")
}

#[get("/admin/setup")]
pub async fn setup_page(flash_messages: IncomingFlashMessages, tera: web::Data<Tera>) -> impl Responder {
    let context = base_context(&flash_messages, None, "setup");
    render_template(&tera, "setup.html", &context)
}

#[post("/admin/setup")]
pub async fn setup_action(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SetupForm>,
) -> impl Responder {
    match auth_service::register_store(repo.get_ref(), form) {
        Ok(store) => {
            FlashMessage::success(format!("Loja «{}» criada. Faça login.", store.name)).send();
            redirect("/login")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Essa loja já existe.").send();
            redirect("/admin/setup")
        }
        Err(err) => service_error_redirect(err, "/admin/setup"),
    }
}
