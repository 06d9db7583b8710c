use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use shared::{ApiResponse, AuthPayload, LoginRequest, RegisterRequest, User};

use super::{
    extract::{ApiJson, UserContext},
    required,
};
use crate::{
    config::AuthConfig,
    db::{DbError, NewUser, UserRow},
    error::{AppError, ResultExt},
    mapper,
    state::AppState,
};

/// Tokens handed out when no JWT secret is configured.
const DEMO_TOKEN_PREFIX: &str = "demo-token-";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub exp: usize,
}

/// Log in by email. An unknown email gets an account on the spot; a stored
/// password hash must be matched.
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, AppError> {
    const FAILED: &str = "Login failed";

    let email = required(req.email.as_deref(), "email")?;
    let password = req.password.as_deref().filter(|p| !p.is_empty());

    let row = match state.db.find_user_by_email(email).await.or_fail(FAILED)? {
        Some(user) => {
            check_password(&user, password)?;
            user
        }
        None => {
            let name = email.split('@').next().unwrap_or(email);
            let mut new_user = NewUser::new(email, name);
            new_user.password_hash = password.map(hash_password).transpose()?;
            match state.db.create_user(&new_user).await {
                Ok(user) => {
                    tracing::info!("Created user {} on first login", user.id);
                    user
                }
                // A concurrent first login for the same email got there first
                Err(DbError::Conflict(_)) => {
                    let user = state
                        .db
                        .find_user_by_email(email)
                        .await
                        .or_fail(FAILED)?
                        .ok_or_else(|| {
                            let cause = anyhow::anyhow!("user missing after conflict");
                            AppError::internal(FAILED, cause)
                        })?;
                    check_password(&user, password)?;
                    user
                }
                Err(e) => return Err(AppError::from_db(e, FAILED)),
            }
        }
    };

    auth_payload(row, &state.config.auth, FAILED)
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<ApiResponse<AuthPayload>>, AppError> {
    const FAILED: &str = "Registration failed";

    let email = required(req.email.as_deref(), "email")?;
    let password = required(req.password.as_deref(), "password")?;
    let name = required(req.name.as_deref(), "name")?;

    if state.db.find_user_by_email(email).await.or_fail(FAILED)?.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let mut new_user = NewUser::new(email, name);
    new_user.password_hash = Some(hash_password(password)?);
    let row = match state.db.create_user(&new_user).await {
        // Lost a race with a concurrent registration
        Err(DbError::Conflict(_)) => {
            return Err(AppError::Conflict("User already exists".to_string()))
        }
        other => other.or_fail(FAILED)?,
    };
    tracing::info!("Registered user {}", row.id);

    auth_payload(row, &state.config.auth, FAILED)
}

/// Replace the caller's preferences document, creating the user if needed.
/// POST /auth/preferences
pub async fn save_preferences(
    State(state): State<AppState>,
    ctx: UserContext,
    ApiJson(preferences): ApiJson<serde_json::Value>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    const FAILED: &str = "Failed to save preferences";

    if !preferences.is_object() {
        return Err(AppError::validation("preferences must be a JSON object"));
    }

    let row = state
        .db
        .upsert_user_preferences(&ctx.user_id, &mapper::serialize_preferences(&preferences))
        .await
        .or_fail(FAILED)?;
    let user = User::try_from(row).or_fail(FAILED)?;

    Ok(Json(ApiResponse::ok(user)))
}

fn auth_payload(
    row: UserRow,
    auth: &AuthConfig,
    message: &'static str,
) -> Result<Json<ApiResponse<AuthPayload>>, AppError> {
    let token = issue_token(&row.id, auth)?;
    let user = User::try_from(row).or_fail(message)?;
    Ok(Json(ApiResponse::ok(AuthPayload { user, token })))
}

/// Users without a stored hash (seeded or placeholder) accept any password.
fn check_password(user: &UserRow, password: Option<&str>) -> Result<(), AppError> {
    let Some(hash) = &user.password_hash else {
        return Ok(());
    };
    let matches = match password {
        Some(password) => verify_password(password, hash)?,
        None => false,
    };
    if !matches {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Failed to hash password", anyhow::anyhow!("{e}")))
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::internal("Login failed", anyhow::anyhow!("stored hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// A signed JWT when a secret is configured, otherwise a demo token that
/// embeds the user id.
pub fn issue_token(user_id: &str, auth: &AuthConfig) -> Result<String, AppError> {
    let Some(secret) = &auth.jwt_secret else {
        return Ok(format!("{DEMO_TOKEN_PREFIX}{user_id}"));
    };

    let expiration = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::hours(auth.token_expiry_hours as i64))
        .ok_or_else(|| {
            AppError::internal("Failed to issue token", anyhow::anyhow!("expiry overflow"))
        })?
        .timestamp() as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal("Failed to issue token", e))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
        &jsonwebtoken::Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })
}

/// Inverse of [`issue_token`] under the same configuration.
pub fn user_id_from_token(token: &str, auth: &AuthConfig) -> Result<String, AppError> {
    match &auth.jwt_secret {
        Some(secret) => verify_token(token, secret).map(|claims| claims.sub),
        None => token
            .strip_prefix(DEMO_TOKEN_PREFIX)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .ok_or_else(|| AppError::Unauthorized("Invalid or expired token".to_string())),
    }
}
