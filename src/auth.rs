use std::future::Future;
use std::pin::Pin;

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

/// The session identity of a logged-in store user.
///
/// Serialized as JSON into the actix-identity cookie at login and rebuilt from
/// it on every request by the [`FromRequest`] impl below.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub store_id: i32,
    pub username: String,
    pub role: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == crate::ADMIN_ROLE
    }

    /// Attach this identity to the current session.
    pub fn login(&self, request: &HttpRequest) -> Result<(), Error> {
        let payload =
            serde_json::to_string(self).map_err(actix_web::error::ErrorInternalServerError)?;
        Identity::login(&request.extensions(), payload)?;
        Ok(())
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload);
        Box::pin(async move {
            let identity = identity.await.map_err(|_| ErrorUnauthorized("login required"))?;
            let id = identity
                .id()
                .map_err(|_| ErrorUnauthorized("invalid session"))?;
            serde_json::from_str(&id).map_err(|_| ErrorUnauthorized("invalid session"))
        })
    }
}
