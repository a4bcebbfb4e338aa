// vitrina/storefront/src/sagas/common_steps.rs

use crate::errors::{AppError, Result as AppResult};
use crate::services::credentials::CredentialCheck;
use tracing::instrument;

pub const UNAUTHORIZED_MESSAGE: &str = "Acceso no autorizado.";

/// Shared first step of the write sagas.
#[instrument(name = "common_step::check_password", skip_all)]
pub fn check_password(credentials: &CredentialCheck, supplied: Option<&str>) -> AppResult<()> {
  if credentials.verify_optional(supplied) {
    Ok(())
  } else {
    Err(AppError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string()))
  }
}
