use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::settings::{AddUserForm, BrandingForm, ChangePlanForm, ChangeSegmentForm};
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, insert_tenant_context, redirect, render_template, service_error_redirect,
};
use crate::services::settings as settings_service;

#[get("/settings")]
pub async fn show_settings(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match settings_service::load_settings_page(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "settings");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("store", &data.store);
            context.insert("branding", &data.branding);
            context.insert("features", &data.features);
            context.insert("users", &data.users);
            render_template(&tera, "settings/index.html", &context)
        }
        Err(err) => service_error_redirect(err, "/dashboard"),
    }
}

#[post("/settings/plan")]
pub async fn change_plan(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ChangePlanForm>,
) -> impl Responder {
    match settings_service::change_plan(repo.get_ref(), &user, form) {
        Ok(store) => {
            FlashMessage::success(format!("Plano alterado para {}.", store.plan.as_str())).send();
            redirect("/settings")
        }
        Err(err) => service_error_redirect(err, "/settings"),
    }
}

#[post("/settings/segment")]
pub async fn change_segment(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ChangeSegmentForm>,
) -> impl Responder {
    match settings_service::change_segment(repo.get_ref(), &user, form) {
        Ok(store) => {
            FlashMessage::success(format!("Segmento alterado para {}.", store.segment.as_str()))
                .send();
            redirect("/settings")
        }
        Err(err) => service_error_redirect(err, "/settings"),
    }
}

#[post("/settings/branding")]
pub async fn update_branding(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<BrandingForm>,
) -> impl Responder {
    match settings_service::update_branding(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Identidade visual atualizada.").send();
            redirect("/settings")
        }
        Err(err) => service_error_redirect(err, "/settings"),
    }
}

#[post("/settings/users")]
pub async fn add_user(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddUserForm>,
) -> impl Responder {
    match settings_service::add_user(repo.get_ref(), &user, form) {
        Ok(created) => {
            FlashMessage::success(format!("Usuário «{}» criado.", created.username)).send();
            redirect("/settings")
        }
        Err(err) => service_error_redirect(err, "/settings"),
    }
}
