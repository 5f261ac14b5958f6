use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::{App, HttpServer, middleware as actix_middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use balcao::db::establish_connection_pool;
use balcao::middleware::RedirectUnauthorized;
use balcao::models::config::ServerConfig;
use balcao::repository::DieselRepository;
use balcao::routes::auth::{index, login_action, login_page, logout, setup_action, setup_page};
use balcao::routes::billing::show_billing;
use balcao::routes::customers::{add_customer, delete_customer, show_customers};
use balcao::routes::main::show_dashboard;
use balcao::routes::orders::{add_order, new_order_page, show_orders, update_order_status};
use balcao::routes::products::{add_product, delete_product, show_products};
use balcao::routes::sales::{add_sale, export_sales, new_sale_page, show_sales};
use balcao::routes::settings::{
    add_user, change_plan, change_segment, show_settings, update_branding,
};
use balcao::routes::tabs::{add_tab_items, close_tab, open_tab, show_tabs};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("balcao.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());
    let domain = env::var("DOMAIN").unwrap_or("localhost".to_string());

    let secret_key = match env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let config = ServerConfig {
        pix_key: env::var("PIX_KEY").unwrap_or_default(),
        plan_price: env::var("PRICE_ELITE").unwrap_or("157,00".to_string()),
        support_whatsapp: env::var("SUPPORT_WHATSAPP").ok(),
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let mut tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };
    tera.register_filter("money", balcao::routes::money_filter);

    HttpServer::new(move || {
        App::new()
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .cookie_domain(Some(format!(".{domain}")))
                    .build(),
            )
            .wrap(actix_middleware::Compress::default())
            .wrap(actix_middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(index)
            .service(login_page)
            .service(login_action)
            .service(setup_page)
            .service(setup_action)
            .service(show_billing)
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_dashboard)
                    .service(show_products)
                    .service(add_product)
                    .service(delete_product)
                    .service(show_customers)
                    .service(add_customer)
                    .service(delete_customer)
                    .service(show_sales)
                    .service(new_sale_page)
                    .service(add_sale)
                    .service(export_sales)
                    .service(show_orders)
                    .service(new_order_page)
                    .service(add_order)
                    .service(update_order_status)
                    .service(show_tabs)
                    .service(open_tab)
                    .service(add_tab_items)
                    .service(close_tab)
                    .service(show_settings)
                    .service(change_plan)
                    .service(change_segment)
                    .service(update_branding)
                    .service(add_user)
                    .service(logout),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(config.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
