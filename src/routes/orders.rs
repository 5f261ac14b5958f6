use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::product::ProductListQuery;
use crate::forms::orders::{NewOrderForm, SetStatusForm};
use crate::repository::{DieselRepository, ProductReader};
use crate::routes::{
    base_context, insert_tenant_context, redirect, render_template, service_error_redirect,
};
use crate::services::orders as orders_service;

#[get("/orders")]
pub async fn show_orders(
    params: web::Query<orders_service::OrdersQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match orders_service::load_orders_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "orders");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("orders", &data.orders);
            context.insert("status_filter", &data.status);
            render_template(&tera, "orders/index.html", &context)
        }
        Err(err) => service_error_redirect(err, "/dashboard"),
    }
}

#[get("/orders/new")]
pub async fn new_order_page(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let products = match repo.list_products(ProductListQuery::new(user.store_id)) {
        Ok((_, products)) => products,
        Err(err) => {
            log::error!("Failed to load products for the order form: {err}");
            Vec::new()
        }
    };

    let mut context = base_context(&flash_messages, Some(&user), "orders");
    insert_tenant_context(&mut context, repo.get_ref(), &user);
    context.insert("products", &products);
    render_template(&tera, "orders/new.html", &context)
}

#[post("/orders/create")]
pub async fn add_order(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let form: NewOrderForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse order form: {err}");
            FlashMessage::error("Dados do pedido inválidos.").send();
            return redirect("/orders/new");
        }
    };

    match orders_service::create_order(repo.get_ref(), &user, form) {
        Ok(order) => {
            let number = order.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!("Pedido {number} criado.")).send();
            redirect("/orders")
        }
        Err(err) => service_error_redirect(err, "/orders/new"),
    }
}

#[post("/orders/{order_id}/status")]
pub async fn update_order_status(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SetStatusForm>,
) -> impl Responder {
    let order_id = path.into_inner();

    match orders_service::update_order_status(repo.get_ref(), &user, order_id, form) {
        Ok((order, Some(sale))) => {
            let order_number = order.number.as_deref().unwrap_or("-");
            let sale_number = sale.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!(
                "Pedido {order_number} entregue e convertido na venda {sale_number}."
            ))
            .send();
            redirect("/orders")
        }
        Ok((order, None)) => {
            let number = order.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!("Pedido {number} atualizado.")).send();
            redirect("/orders")
        }
        Err(err) => service_error_redirect(err, "/orders"),
    }
}
