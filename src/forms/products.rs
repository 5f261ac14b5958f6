use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::NewProduct;
use crate::forms::{parse_price_cents, sanitize_optional};

const NAME_MAX_LEN: u64 = 160;
const SKU_MAX_LEN: u64 = 80;

/// Errors produced while turning the "add product" form into a domain
/// payload.
#[derive(Debug, Error)]
pub enum ProductFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("invalid price `{value}`")]
    InvalidPrice { value: String },
    #[error("stock cannot be negative")]
    NegativeStock,
}

/// Form payload emitted when submitting the "add product" form.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    #[validate(length(min = 1, max = NAME_MAX_LEN))]
    pub name: String,
    #[validate(length(max = SKU_MAX_LEN))]
    pub sku: Option<String>,
    /// Decimal price as typed ("12,34" or "12.34").
    pub price: String,
    pub stock: Option<i32>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self, store_id: i32) -> Result<NewProduct, ProductFormError> {
        self.validate()?;

        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ProductFormError::EmptyName);
        }

        let price_cents =
            parse_price_cents(&self.price).ok_or_else(|| ProductFormError::InvalidPrice {
                value: self.price.clone(),
            })?;

        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            return Err(ProductFormError::NegativeStock);
        }

        let mut new_product = NewProduct::new(store_id, name, price_cents, stock);
        if let Some(sku) = sanitize_optional(self.sku) {
            new_product = new_product.with_sku(sku);
        }

        Ok(new_product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_a_product_payload_with_cents() {
        let form = AddProductForm {
            name: " Água Mineral ".to_string(),
            sku: Some("  ".to_string()),
            price: "2,00".to_string(),
            stock: Some(10),
        };

        let product = form.into_new_product(5).expect("expected success");
        assert_eq!(product.store_id, 5);
        assert_eq!(product.name, "Água Mineral");
        assert_eq!(product.sku, None);
        assert_eq!(product.price_cents, 200);
        assert_eq!(product.stock, 10);
    }

    #[test]
    fn rejects_garbage_prices_and_negative_stock() {
        let form = AddProductForm {
            name: "Refrigerante".to_string(),
            sku: None,
            price: "dois reais".to_string(),
            stock: Some(1),
        };
        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::InvalidPrice { .. })
        ));

        let form = AddProductForm {
            name: "Refrigerante".to_string(),
            sku: None,
            price: "2.00".to_string(),
            stock: Some(-1),
        };
        assert!(matches!(
            form.into_new_product(1),
            Err(ProductFormError::NegativeStock)
        ));
    }
}
