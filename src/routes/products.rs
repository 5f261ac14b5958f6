use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::products::AddProductForm;
use crate::repository::DieselRepository;
use crate::routes::{
    base_context, insert_tenant_context, redirect, render_template, service_error_redirect,
};
use crate::services::products as products_service;

#[get("/products")]
pub async fn show_products(
    params: web::Query<products_service::ProductsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_products_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "products");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("products", &data.products);
            context.insert("search", &data.search);
            render_template(&tera, "products/index.html", &context)
        }
        Err(err) => service_error_redirect(err, "/dashboard"),
    }
}

#[post("/products/create")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddProductForm>,
) -> impl Responder {
    match products_service::create_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!("Produto «{}» cadastrado.", product.name)).send();
            redirect("/products")
        }
        Err(err) => service_error_redirect(err, "/products"),
    }
}

#[post("/products/{product_id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match products_service::remove_product(repo.get_ref(), &user, product_id) {
        Ok(()) => {
            FlashMessage::success("Produto removido.").send();
            redirect("/products")
        }
        Err(err) => service_error_redirect(err, "/products"),
    }
}
