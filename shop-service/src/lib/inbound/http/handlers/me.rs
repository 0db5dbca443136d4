use auth::AuthClaims;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;

/// Claims of the caller, as resolved by the gate.
pub async fn me(
    Extension(claims): Extension<AuthClaims>,
) -> Result<ApiSuccess<AuthClaims>, ApiError> {
    Ok(ApiSuccess::new(StatusCode::OK, claims))
}
