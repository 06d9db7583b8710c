use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use super::auth;
use crate::{error::AppError, state::AppState};

/// Header carrying the caller's identity when no bearer token is sent.
pub const USER_ID_HEADER: &str = "user-id";

/// `axum::Json` whose rejections render as the `{success: false}` envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// The user a request acts for.
///
/// Resolved from, in order: an `Authorization: Bearer` token, the `user-id`
/// header, the configured demo user. A bearer token that does not verify is
/// rejected rather than falling through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for UserContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Ok(TypedHeader(Authorization(bearer))) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
        {
            let user_id = auth::user_id_from_token(bearer.token(), &state.config.auth)?;
            return Ok(Self { user_id });
        }

        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| state.config.auth.demo_user_id.clone());

        Ok(Self { user_id })
    }
}
