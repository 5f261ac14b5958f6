use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::NewCustomer;
use crate::forms::sanitize_optional;
use crate::services::{ServiceError, ServiceResult};

/// Form payload emitted when submitting the "add customer" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddCustomerForm {
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(length(max = 60))]
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl AddCustomerForm {
    pub fn into_new_customer(self, store_id: i32) -> ServiceResult<NewCustomer> {
        self.validate()
            .map_err(|err| ServiceError::Form(err.to_string()))?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ServiceError::Form("Informe o nome do cliente.".to_string()));
        }

        let mut new_customer = NewCustomer::new(store_id, name);
        if let Some(phone) = sanitize_optional(self.phone) {
            new_customer = new_customer.with_phone(phone);
        }
        if let Some(address) = sanitize_optional(self.address) {
            new_customer = new_customer.with_address(address);
        }

        Ok(new_customer)
    }
}
