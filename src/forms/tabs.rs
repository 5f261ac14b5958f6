use serde::Deserialize;
use validator::Validate;

use crate::domain::item::LineRequest;
use crate::forms::{ItemsFormError, collect_lines};
use crate::services::{ServiceError, ServiceResult};

/// Payload of the "open tab" form.
#[derive(Debug, Deserialize, Validate)]
pub struct OpenTabForm {
    #[validate(length(min = 1, max = 80))]
    pub table_name: String,
}

impl OpenTabForm {
    pub fn into_table_name(self) -> ServiceResult<String> {
        self.validate()
            .map_err(|err| ServiceError::Form(err.to_string()))?;

        let table_name = self.table_name.trim().to_string();
        if table_name.is_empty() {
            return Err(ServiceError::Form("Informe a mesa.".to_string()));
        }
        Ok(table_name)
    }
}

/// Payload of the "add items to tab" form; same repeated-row layout as the
/// order form.
#[derive(Debug, Default, Deserialize)]
pub struct AddTabItemsForm {
    #[serde(default)]
    pub product_id: Vec<i32>,
    #[serde(default)]
    pub qty: Vec<i32>,
}

impl AddTabItemsForm {
    pub fn into_lines(self) -> Result<Vec<LineRequest>, ItemsFormError> {
        collect_lines(&self.product_id, &self.qty)
    }
}
