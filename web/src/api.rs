//! Thin client for the game server. No retries: callers log failures and move on.

use gloo::net::http::{Request, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tictac_protocol::{
    Endpoint, LogGameRequest, MoveRequest, MoveResponse, NewGameRequest, NewGameResponse,
};

#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("{} request failed: {source}", .endpoint.path())]
    Request {
        endpoint: Endpoint,
        #[source]
        source: gloo::net::Error,
    },
    #[error("{} returned HTTP {status}", .endpoint.path())]
    Status { endpoint: Endpoint, status: u16 },
}

pub(crate) type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub(crate) fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn new_game(&self, request: &NewGameRequest) -> Result<NewGameResponse> {
        self.post_json(Endpoint::NewGame, request).await
    }

    pub(crate) async fn send_move(&self, request: &MoveRequest) -> Result<MoveResponse> {
        self.post_json(Endpoint::Move, request).await
    }

    /// The server's reply body is not used.
    pub(crate) async fn log_game(&self, request: &LogGameRequest) -> Result<()> {
        self.post(Endpoint::LogGame, request).await.map(|_| ())
    }

    async fn post_json<B, T>(&self, endpoint: Endpoint, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let response = self.post(endpoint, body).await?;
        response
            .json()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> Result<Response> {
        let url = endpoint.url(&self.base_url);
        log::debug!("POST {}", url);

        let response = Request::post(&url)
            .json(body)
            .map_err(|source| ApiError::Request { endpoint, source })?
            .send()
            .await
            .map_err(|source| ApiError::Request { endpoint, source })?;

        if !response.ok() {
            return Err(ApiError::Status {
                endpoint,
                status: response.status(),
            });
        }
        Ok(response)
    }
}
