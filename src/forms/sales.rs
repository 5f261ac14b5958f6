use serde::Deserialize;

use crate::domain::item::LineRequest;
use crate::forms::{ItemsFormError, collect_lines, sanitize_optional};

/// Payload of the point-of-sale "new sale" form; the item rows post repeated
/// `product_id`/`qty` fields.
#[derive(Debug, Default, Deserialize)]
pub struct NewSaleForm {
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub product_id: Vec<i32>,
    #[serde(default)]
    pub qty: Vec<i32>,
}

impl NewSaleForm {
    pub fn into_parts(self) -> Result<(Option<String>, Vec<LineRequest>), ItemsFormError> {
        let lines = collect_lines(&self.product_id, &self.qty)?;
        Ok((sanitize_optional(self.customer_name), lines))
    }
}
