//! Browser fetch transport

use std::cell::RefCell;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use super::error::BackendError;
use super::request::{ApiRequest, expect_success, parse_response};
use super::types::*;
use super::{ScoreReporter, Session};

/// HTTP client for the leaderboard API
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Perform the request and return `(status, body)`
    async fn send(&self, req: &ApiRequest) -> Result<(u16, String), BackendError> {
        let init = RequestInit::new();
        init.set_method(req.method.as_str());
        // Session cookie must travel with every call
        init.set_credentials(RequestCredentials::Include);
        if let Some(body) = &req.body {
            init.set_body(&JsValue::from_str(body));
        }

        let request = Request::new_with_str_and_init(&req.url(&self.base), &init)
            .map_err(js_error)?;
        if req.body.is_some() {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
        }

        let window = web_sys::window().ok_or_else(|| BackendError::Network("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        Ok((response.status(), text))
    }

    async fn call<T: DeserializeOwned>(&self, req: ApiRequest) -> Result<T, BackendError> {
        let (status, body) = self.send(&req).await?;
        let result = parse_response(status, &body);
        if let Err(e) = &result {
            log::warn!("{} {} failed: {}", req.method.as_str(), req.path, e);
        }
        result
    }

    pub async fn login(&self, display_name: &str) -> Result<User, BackendError> {
        let resp: UserResponse = self.call(ApiRequest::login(display_name)?).await?;
        Ok(resp.user)
    }

    pub async fn login_with_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, BackendError> {
        let req = ApiRequest::login_with_password(username, password)?;
        let resp: UserResponse = self.call(req).await?;
        Ok(resp.user)
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, BackendError> {
        let resp: UserResponse = self.call(ApiRequest::register(username, password)?).await?;
        Ok(resp.user)
    }

    pub async fn logout(&self) -> Result<(), BackendError> {
        let (status, body) = self.send(&ApiRequest::logout()).await?;
        expect_success(status, &body)
    }

    pub async fn submit_score(&self, score: u32) -> Result<ScoreRecord, BackendError> {
        let resp: ScoreResponse = self.call(ApiRequest::submit_score(score)).await?;
        Ok(resp.score)
    }

    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, BackendError> {
        let resp: LeaderboardResponse = self.call(ApiRequest::leaderboard(limit)).await?;
        Ok(resp.leaderboard)
    }

    pub async fn me(&self) -> Result<User, BackendError> {
        let resp: UserResponse = self.call(ApiRequest::me()).await?;
        Ok(resp.user)
    }

    pub async fn user(&self, id: u32) -> Result<User, BackendError> {
        let resp: UserResponse = self.call(ApiRequest::user(id)).await?;
        Ok(resp.user)
    }

    pub async fn user_scores(&self, id: u32) -> Result<Vec<ScoreRecord>, BackendError> {
        let resp: ScoresResponse = self.call(ApiRequest::user_scores(id)).await?;
        Ok(resp.scores)
    }
}

fn js_error(value: JsValue) -> BackendError {
    BackendError::Network(format!("{:?}", value))
}

/// Last backend outcome, read by the HUD
#[derive(Debug, Default)]
pub struct BackendStatus {
    /// User-visible message (cleared on the next success)
    pub message: Option<String>,
    /// Set when the server rejected the session; the shell drops it
    pub session_expired: bool,
    /// Bumped after every submission, so the leaderboard knows to refresh
    pub generation: u32,
}

/// Submits scores in the background via `spawn_local`
pub struct WebReporter {
    client: ApiClient,
    status: Rc<RefCell<BackendStatus>>,
}

impl WebReporter {
    pub fn new(client: ApiClient, status: Rc<RefCell<BackendStatus>>) -> Self {
        Self { client, status }
    }
}

impl ScoreReporter for WebReporter {
    fn submit(&mut self, session: &Session, score: u32) {
        let client = self.client.clone();
        let status = self.status.clone();
        let name = session.user.display_name.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = client.submit_score(score).await;
            let mut status = status.borrow_mut();
            match result {
                Ok(record) => {
                    log::info!("Submitted score {} for {} (#{})", score, name, record.id);
                    status.message = None;
                }
                Err(e) => {
                    status.session_expired |= e.needs_login();
                    status.message = Some(e.user_message());
                }
            }
            status.generation = status.generation.wrapping_add(1);
        });
    }
}
