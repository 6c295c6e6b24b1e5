use serde::{Deserialize, Serialize};

use crate::remote::{PasswordGate, RemoteError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Asks the validation service whether a password is the shared one.
pub struct HttpPasswordGate {
    endpoint: String,
}

impl HttpPasswordGate {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

impl PasswordGate for HttpPasswordGate {
    fn validate(&self, password: &str) -> Result<bool, RemoteError> {
        let request = ValidateRequest { password: password.to_string() };
        let response: ValidateResponse = ureq::post(&self.endpoint)
            .send_json(request)?
            .into_json()?;

        if let Some(message) = &response.message {
            log::debug!("validation service: {message}");
        }

        Ok(response.success)
    }
}
