use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::customers::AddCustomerForm;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, insert_tenant_context, redirect, render_template, service_error_redirect,
};
use crate::services::customers as customers_service;

#[get("/customers")]
pub async fn show_customers(
    params: web::Query<customers_service::CustomersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match customers_service::load_customers_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "customers");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("customers", &data.customers);
            context.insert("search", &data.search);
            render_template(&tera, "customers/index.html", &context)
        }
        Err(err) => service_error_redirect(err, "/dashboard"),
    }
}

#[post("/customers/create")]
pub async fn add_customer(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCustomerForm>,
) -> impl Responder {
    match customers_service::create_customer(repo.get_ref(), &user, form) {
        Ok(customer) => {
            FlashMessage::success(format!("Cliente «{}» cadastrado.", customer.name)).send();
            redirect("/customers")
        }
        Err(err) => service_error_redirect(err, "/customers"),
    }
}

#[post("/customers/{customer_id}/delete")]
pub async fn delete_customer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let customer_id = path.into_inner();

    match customers_service::remove_customer(repo.get_ref(), &user, customer_id) {
        Ok(()) => {
            FlashMessage::success("Cliente removido.").send();
            redirect("/customers")
        }
        Err(err) => service_error_redirect(err, "/customers"),
    }
}
