// vitrina/storefront/src/services/credentials.rs

use tracing::{error, warn};

/// Header carrying the shared admin secret.
pub const PASSWORD_HEADER: &str = "X-Professor-Password";

/// Exact-match check against the single configured admin secret.
#[derive(Clone)]
pub struct CredentialCheck {
  secret: Option<String>,
}

impl std::fmt::Debug for CredentialCheck {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CredentialCheck").field("configured", &self.is_configured()).finish()
  }
}

impl CredentialCheck {
  pub fn new(secret: Option<String>) -> Self {
    Self {
      secret: secret.filter(|s| !s.is_empty()),
    }
  }

  pub fn is_configured(&self) -> bool {
    self.secret.is_some()
  }

  /// Allows `supplied` only if it equals the configured secret. Without a
  /// configured secret every call denies.
  pub fn verify(&self, supplied: &str) -> bool {
    match &self.secret {
      Some(secret) => {
        let allowed = secret == supplied;
        if !allowed {
          warn!("Admin credential rejected.");
        }
        allowed
      }
      None => {
        error!("ADMIN_PASSWORD is not configured; denying admin request.");
        false
      }
    }
  }

  /// Like `verify`, treating an absent header as a denial.
  pub fn verify_optional(&self, supplied: Option<&str>) -> bool {
    match supplied {
      Some(value) => self.verify(value),
      None => {
        if !self.is_configured() {
          error!("ADMIN_PASSWORD is not configured; denying admin request.");
        }
        false
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_the_exact_secret_passes() {
    let check = CredentialCheck::new(Some("profe123".to_string()));
    assert!(check.verify("profe123"));
    assert!(!check.verify("profe123 "));
    assert!(!check.verify("PROFE123"));
    assert!(!check.verify(""));
    assert!(!check.verify_optional(None));
    assert!(check.verify_optional(Some("profe123")));
  }

  #[test]
  fn unconfigured_secret_denies_everything() {
    let check = CredentialCheck::new(None);
    assert!(!check.is_configured());
    assert!(!check.verify(""));
    assert!(!check.verify("anything"));

    let empty = CredentialCheck::new(Some(String::new()));
    assert!(!empty.verify(""));
  }

  #[test]
  fn debug_does_not_print_the_secret() {
    let check = CredentialCheck::new(Some("profe123".to_string()));
    assert!(!format!("{:?}", check).contains("profe123"));
  }
}
