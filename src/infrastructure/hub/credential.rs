use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

use crate::domain::DomainError;

/// API token for the hosted inference endpoints. Never printed.
#[derive(Clone)]
pub struct HubCredential(Arc<SecretString>);

impl HubCredential {
    pub fn new(token: impl Into<String>) -> Result<Self, DomainError> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(DomainError::configuration("API token must not be empty"));
        }
        Ok(Self(Arc::new(SecretString::new(token.to_string()))))
    }

    /// Reads the token from `var`; absent or blank values are rejected.
    pub fn from_env(var: &str) -> Result<Self, DomainError> {
        let token = std::env::var(var)
            .map_err(|_| DomainError::configuration(format!("{var} is not set")))?;
        Self::new(token).map_err(|_| DomainError::configuration(format!("{var} is empty")))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for HubCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("HubCredential([REDACTED])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_rejected() {
        assert!(matches!(
            HubCredential::new("  \n"),
            Err(DomainError::Configuration(_))
        ));
    }

    #[test]
    fn test_token_trimmed_and_redacted() {
        let credential = HubCredential::new(" hf_secret \n").unwrap();

        assert_eq!(credential.expose(), "hf_secret");
        assert!(!format!("{credential:?}").contains("hf_secret"));
    }

    #[test]
    fn test_missing_env_var_rejected() {
        let err = HubCredential::from_env("HUB_ASSISTANT_TEST_UNSET_TOKEN").unwrap_err();

        assert!(matches!(err, DomainError::Configuration(msg) if msg.contains("not set")));
    }

    #[test]
    fn test_env_var_read() {
        std::env::set_var("HUB_ASSISTANT_TEST_TOKEN", "hf_from_env");

        let credential = HubCredential::from_env("HUB_ASSISTANT_TEST_TOKEN").unwrap();

        assert_eq!(credential.expose(), "hf_from_env");
    }
}
