use serde::Deserialize;

use crate::domain::item::LineRequest;
use crate::forms::{ItemsFormError, collect_lines, sanitize_optional};

/// Payload of the "new order" form. The item rows post repeated
/// `product_id`/`qty` fields, which is why this is deserialized with
/// `serde_html_form` instead of the plain urlencoded extractor.
#[derive(Debug, Default, Deserialize)]
pub struct NewOrderForm {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub product_id: Vec<i32>,
    #[serde(default)]
    pub qty: Vec<i32>,
}

impl NewOrderForm {
    pub fn into_parts(self) -> Result<(Option<String>, Vec<LineRequest>), ItemsFormError> {
        let lines = collect_lines(&self.product_id, &self.qty)?;
        Ok((sanitize_optional(self.customer_name), lines))
    }
}

/// Payload of the per-order status form.
#[derive(Debug, Deserialize)]
pub struct SetStatusForm {
    pub status: String,
}
