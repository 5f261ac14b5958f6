use serde::Deserialize;
use validator::Validate;

use crate::domain::store::{Plan, Segment, UpdateBranding};
use crate::forms::sanitize_optional;
use crate::services::{ServiceError, ServiceResult};

/// Payload of the plan selector on the settings page.
#[derive(Debug, Deserialize)]
pub struct ChangePlanForm {
    pub plan: String,
}

impl ChangePlanForm {
    pub fn into_plan(self) -> ServiceResult<Plan> {
        Plan::parse(&self.plan)
            .ok_or_else(|| ServiceError::Form(format!("plano inválido: {}", self.plan)))
    }
}

/// Payload of the segment selector on the settings page.
#[derive(Debug, Deserialize)]
pub struct ChangeSegmentForm {
    pub segment: String,
}

impl ChangeSegmentForm {
    pub fn into_segment(self) -> ServiceResult<Segment> {
        Segment::parse(&self.segment)
            .ok_or_else(|| ServiceError::Form(format!("segmento inválido: {}", self.segment)))
    }
}

/// Payload of the branding form (white label).
#[derive(Debug, Deserialize, Validate)]
pub struct BrandingForm {
    #[validate(length(min = 1, max = 80))]
    pub product_name: String,
    #[validate(length(max = 30))]
    pub primary_color: Option<String>,
    #[validate(length(max = 30))]
    pub secondary_color: Option<String>,
    #[validate(length(max = 40))]
    pub whatsapp_support: Option<String>,
    #[validate(length(max = 200))]
    pub receipt_footer: Option<String>,
}

impl BrandingForm {
    pub fn into_update(self) -> ServiceResult<UpdateBranding> {
        self.validate()
            .map_err(|err| ServiceError::Form(err.to_string()))?;

        Ok(UpdateBranding {
            product_name: self.product_name.trim().to_string(),
            primary_color: sanitize_optional(self.primary_color)
                .unwrap_or_else(|| "#2f6bff".to_string()),
            secondary_color: sanitize_optional(self.secondary_color)
                .unwrap_or_else(|| "#9a7bff".to_string()),
            whatsapp_support: sanitize_optional(self.whatsapp_support),
            receipt_footer: sanitize_optional(self.receipt_footer),
        })
    }
}

/// Payload of the "add user" form (multi user).
#[derive(Debug, Deserialize, Validate)]
pub struct AddUserForm {
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub role: Option<String>,
}

impl AddUserForm {
    pub fn into_parts(self) -> ServiceResult<(String, String, String)> {
        self.validate()
            .map_err(|err| ServiceError::Form(err.to_string()))?;

        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => "staff".to_string(),
            Some(role @ ("admin" | "manager" | "cashier" | "staff")) => role.to_string(),
            Some(other) => {
                return Err(ServiceError::Form(format!("papel inválido: {other}")));
            }
        };

        Ok((self.username.trim().to_string(), self.password, role))
    }
}
