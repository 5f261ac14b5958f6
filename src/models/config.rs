/// Server-wide configuration shared with the handlers through `web::Data`.
///
/// Billing is manual: the billing page shows the PIX key and the support
/// contact, and the subscription is activated out of band.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub pix_key: String,
    pub plan_price: String,
    pub support_whatsapp: Option<String>,
}
