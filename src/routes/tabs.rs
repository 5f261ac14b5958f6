use actix_web::{Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::product::ProductListQuery;
use crate::forms::tabs::{AddTabItemsForm, OpenTabForm};
use crate::repository::{DieselRepository, ProductReader};
use crate::routes::{
    base_context, insert_tenant_context, redirect, render_template, service_error_redirect,
};
use crate::services::tabs as tabs_service;

#[get("/tabs")]
pub async fn show_tabs(
    params: web::Query<tabs_service::TabsQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match tabs_service::load_tabs_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let products = match repo.list_products(ProductListQuery::new(user.store_id)) {
                Ok((_, products)) => products,
                Err(err) => {
                    log::error!("Failed to load products for the tab form: {err}");
                    Vec::new()
                }
            };

            let mut context = base_context(&flash_messages, Some(&user), "tabs");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("tabs", &data.tabs);
            context.insert("products", &products);
            render_template(&tera, "tabs/index.html", &context)
        }
        Err(err) => service_error_redirect(err, "/dashboard"),
    }
}

#[post("/tabs/open")]
pub async fn open_tab(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OpenTabForm>,
) -> impl Responder {
    match tabs_service::open_tab(repo.get_ref(), &user, form) {
        Ok(tab) => {
            let number = tab.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!("Comanda {number} aberta para {}.", tab.table_name))
                .send();
            redirect("/tabs")
        }
        Err(err) => service_error_redirect(err, "/tabs"),
    }
}

#[post("/tabs/{tab_id}/items")]
pub async fn add_tab_items(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    let tab_id = path.into_inner();

    let form: AddTabItemsForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse tab items form: {err}");
            FlashMessage::error("Dados dos itens inválidos.").send();
            return redirect("/tabs");
        }
    };

    match tabs_service::add_tab_items(repo.get_ref(), &user, tab_id, form) {
        Ok(tab) => {
            let number = tab.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!("Itens lançados na comanda {number}.")).send();
            redirect("/tabs")
        }
        Err(err) => service_error_redirect(err, "/tabs"),
    }
}

#[post("/tabs/{tab_id}/close")]
pub async fn close_tab(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let tab_id = path.into_inner();

    match tabs_service::close_tab(repo.get_ref(), &user, tab_id) {
        Ok((tab, sale)) => {
            let tab_number = tab.number.as_deref().unwrap_or("-");
            let sale_number = sale.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!(
                "Comanda {tab_number} fechada e convertida na venda {sale_number}."
            ))
            .send();
            redirect("/tabs")
        }
        Err(err) => service_error_redirect(err, "/tabs"),
    }
}
