use serde::Deserialize;
use validator::Validate;

use crate::domain::store::Segment;
use crate::services::{ServiceError, ServiceResult};

/// Payload posted by the login page.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, max = 120))]
    pub store_name: String,
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginForm {
    pub fn into_parts(self) -> ServiceResult<(String, String, String)> {
        self.validate()
            .map_err(|err| ServiceError::Form(err.to_string()))?;
        Ok((
            self.store_name.trim().to_string(),
            self.username.trim().to_string(),
            self.password,
        ))
    }
}

/// Payload posted by the store setup page.
#[derive(Debug, Deserialize, Validate)]
pub struct SetupForm {
    #[validate(length(min = 1, max = 120))]
    pub store_name: String,
    #[validate(length(min = 1, max = 80))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub segment: Option<String>,
}

impl SetupForm {
    pub fn into_parts(self) -> ServiceResult<(String, String, String, Segment)> {
        self.validate()
            .map_err(|err| ServiceError::Form(err.to_string()))?;

        let segment = match self.segment.as_deref() {
            None | Some("") => Segment::Deposito,
            Some(raw) => Segment::parse(raw)
                .ok_or_else(|| ServiceError::Form(format!("segmento inválido: {raw}")))?,
        };

        Ok((
            self.store_name.trim().to_string(),
            self.username.trim().to_string(),
            self.password,
            segment,
        ))
    }
}
