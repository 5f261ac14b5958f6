use thiserror::Error;

use crate::domain::item::LineRequest;

pub mod auth;
pub mod customers;
pub mod orders;
pub mod products;
pub mod sales;
pub mod settings;
pub mod tabs;

/// Errors shared by the multi-line item forms.
#[derive(Debug, Error)]
pub enum ItemsFormError {
    /// Every submitted row was empty or zero-quantity.
    #[error("a submissão não contém itens")]
    Empty,
    /// A row carries a negative quantity.
    #[error("quantidade inválida na linha {row}")]
    InvalidQty { row: usize },
}

/// Pairs the repeated `product_id`/`qty` fields of an item form into line
/// requests. Unfilled UI rows (product 0 or quantity 0) are dropped; a
/// submission with no usable row is rejected.
pub(crate) fn collect_lines(
    product_ids: &[i32],
    qtys: &[i32],
) -> Result<Vec<LineRequest>, ItemsFormError> {
    let mut lines = Vec::new();

    for (row, (&product_id, &qty)) in product_ids.iter().zip(qtys.iter()).enumerate() {
        if qty < 0 {
            return Err(ItemsFormError::InvalidQty { row: row + 1 });
        }
        if product_id <= 0 || qty == 0 {
            continue;
        }
        lines.push(LineRequest { product_id, qty });
    }

    if lines.is_empty() {
        return Err(ItemsFormError::Empty);
    }

    Ok(lines)
}

/// Parses a decimal money string ("12.34", "12,34", "12") into cents.
pub(crate) fn parse_price_cents(raw: &str) -> Option<i64> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }

    let mut parts = cleaned.splitn(2, '.');
    let whole_part = parts.next().unwrap_or("");
    let whole: i64 = if whole_part.is_empty() {
        0
    } else {
        whole_part.parse().ok()?
    };
    if whole < 0 {
        return None;
    }

    let frac_part: String = parts.next().unwrap_or("").chars().take(2).collect();
    let frac: i64 = match frac_part.len() {
        0 => 0,
        1 => frac_part.parse::<i64>().ok()? * 10,
        _ => frac_part.parse().ok()?,
    };

    Some(whole * 100 + frac)
}

/// Trims a free-text field, mapping an empty result to `None`.
pub(crate) fn sanitize_optional(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
