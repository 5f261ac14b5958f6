use actix_web::http::header;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::product::ProductListQuery;
use crate::domain::sale::Sale;
use crate::forms::sales::NewSaleForm;
use crate::repository::{DieselRepository, ProductReader};
use crate::routes::{
    base_context, format_cents, insert_tenant_context, redirect, render_template,
    service_error_redirect,
};
use crate::services::sales as sales_service;

#[get("/sales")]
pub async fn show_sales(
    params: web::Query<sales_service::SalesQuery>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match sales_service::load_sales_page(repo.get_ref(), &user, params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "sales");
            insert_tenant_context(&mut context, repo.get_ref(), &user);
            context.insert("sales", &data.sales);
            render_template(&tera, "sales/index.html", &context)
        }
        Err(err) => service_error_redirect(err, "/dashboard"),
    }
}

#[get("/sales/new")]
pub async fn new_sale_page(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let products = match repo.list_products(ProductListQuery::new(user.store_id)) {
        Ok((_, products)) => products,
        Err(err) => {
            log::error!("Failed to load products for the sale form: {err}");
            Vec::new()
        }
    };

    let mut context = base_context(&flash_messages, Some(&user), "sales");
    insert_tenant_context(&mut context, repo.get_ref(), &user);
    context.insert("products", &products);
    render_template(&tera, "sales/new.html", &context)
}

#[post("/sales/create")]
pub async fn add_sale(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    body: web::Bytes,
) -> impl Responder {
    // The item rows post repeated fields; serde_html_form collects them into
    // the form's Vec fields.
    let form: NewSaleForm = match serde_html_form::from_bytes(&body) {
        Ok(form) => form,
        Err(err) => {
            log::error!("Failed to parse sale form: {err}");
            FlashMessage::error("Dados da venda inválidos.").send();
            return redirect("/sales/new");
        }
    };

    match sales_service::create_sale(repo.get_ref(), &user, form) {
        Ok(sale) => {
            let number = sale.number.as_deref().unwrap_or("-");
            FlashMessage::success(format!("Venda {number} registrada.")).send();
            redirect("/sales")
        }
        Err(err) => service_error_redirect(err, "/sales/new"),
    }
}

#[get("/sales/export")]
pub async fn export_sales(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match sales_service::export_sales(repo.get_ref(), &user) {
        Ok(sales) => match sales_to_csv(&sales) {
            Ok(body) => HttpResponse::Ok()
                .content_type("text/csv; charset=utf-8")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"vendas.csv\"",
                ))
                .body(body),
            Err(err) => {
                log::error!("Failed to build the sales CSV: {err}");
                HttpResponse::InternalServerError().finish()
            }
        },
        Err(err) => service_error_redirect(err, "/sales"),
    }
}

fn sales_to_csv(sales: &[Sale]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(["numero", "cliente", "total", "status", "criada_em"])?;
    for sale in sales {
        writer.write_record([
            sale.number.as_deref().unwrap_or(""),
            sale.customer_name.as_deref().unwrap_or(""),
            &format_cents(sale.total_cents),
            &sale.status,
            &sale.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|err| err.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn csv_export_carries_one_row_per_sale() {
        let sales = vec![Sale {
            id: 1,
            store_id: 1,
            number: Some("V-000001".to_string()),
            customer_name: Some("Carlos".to_string()),
            total_cents: 600,
            status: "concluida".to_string(),
            items: Vec::new(),
            created_at: NaiveDateTime::default(),
        }];

        let body = sales_to_csv(&sales).expect("expected csv");
        let text = String::from_utf8(body).expect("utf8");
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("numero,cliente,total,status,criada_em"));
        let row = lines.next().expect("data row");
        assert!(row.starts_with("V-000001,Carlos,\"6,00\",concluida,"));
    }
}
