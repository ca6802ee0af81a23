//! Transport-independent request building and response decoding

use serde::de::DeserializeOwned;

use super::error::BackendError;
use super::types::*;

/// Longest display name the server accepts
pub const MAX_DISPLAY_NAME_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully described API call, ready to hand to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path plus query, relative to the API base
    pub path: String,
    /// JSON body
    pub body: Option<String>,
}

impl ApiRequest {
    fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    fn post<B: serde::Serialize>(path: impl Into<String>, body: &B) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            // Plain structs of strings and integers always serialize
            body: serde_json::to_string(body).ok(),
        }
    }

    /// Join with the configured base URL (empty base = same origin)
    pub fn url(&self, base: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), self.path)
    }

    pub fn login(display_name: &str) -> Result<Self, BackendError> {
        let display_name = validate_display_name(display_name)?;
        Ok(Self::post("/api/login", &LoginRequest { display_name }))
    }

    /// Credentialed login variant
    pub fn login_with_password(username: &str, password: &str) -> Result<Self, BackendError> {
        require_credentials(username, password)?;
        Ok(Self::post(
            "/api/login",
            &CredentialsRequest { username, password },
        ))
    }

    pub fn register(username: &str, password: &str) -> Result<Self, BackendError> {
        require_credentials(username, password)?;
        Ok(Self::post(
            "/api/register",
            &CredentialsRequest { username, password },
        ))
    }

    pub fn logout() -> Self {
        Self {
            method: Method::Post,
            path: "/api/logout".to_string(),
            body: None,
        }
    }

    pub fn submit_score(score: u32) -> Self {
        Self::post("/api/scores", &SubmitScoreRequest { score })
    }

    pub fn leaderboard(limit: u32) -> Self {
        Self::get(format!("/api/leaderboard?limit={}", limit.max(1)))
    }

    pub fn me() -> Self {
        Self::get("/api/me")
    }

    pub fn user(id: u32) -> Self {
        Self::get(format!("/api/users/{}", id))
    }

    pub fn user_scores(id: u32) -> Self {
        Self::get(format!("/api/users/{}/scores", id))
    }
}

/// Trim and length-check a display name
pub fn validate_display_name(raw: &str) -> Result<&str, BackendError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(BackendError::Validation {
            status: 400,
            message: "Name is required".to_string(),
        });
    }
    if name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(BackendError::Validation {
            status: 400,
            message: format!(
                "Name must be no more than {} characters long",
                MAX_DISPLAY_NAME_LEN
            ),
        });
    }
    Ok(name)
}

fn require_credentials(username: &str, password: &str) -> Result<(), BackendError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(BackendError::Validation {
            status: 400,
            message: "Username and password required".to_string(),
        });
    }
    Ok(())
}

/// Decode a response body, classifying non-2xx statuses
pub fn parse_response<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, BackendError> {
    if !(200..300).contains(&status) {
        return Err(BackendError::from_status(status, body));
    }
    serde_json::from_str(body).map_err(|e| BackendError::Network(format!("bad response: {}", e)))
}

/// For endpoints whose success body we do not need (logout)
pub fn expect_success(status: u16, body: &str) -> Result<(), BackendError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(BackendError::from_status(status, body))
    }
}
