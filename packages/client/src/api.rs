//! HTTP API calls (login, stream status).

use reqwest::StatusCode;
use yagura_server::infrastructure::dto::http::{
    ErrorResponseDto, LoginRequestDto, LoginResponseDto, StreamStatusDto,
};

use crate::{domain::api_url, error::ClientError};

/// Log in as the broadcaster and return the bearer token
pub async fn login(server: &str, password: &str) -> Result<String, ClientError> {
    let response = reqwest::Client::new()
        .post(api_url(server, "/api/login"))
        .json(&LoginRequestDto {
            password: password.to_string(),
        })
        .send()
        .await?;

    match response.status() {
        StatusCode::OK => {
            let body: LoginResponseDto = response.json().await?;
            tracing::info!("Logged in (token expires at {})", body.expires_at);
            Ok(body.token)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
            let reason = match response.json::<ErrorResponseDto>().await {
                Ok(body) => body.error,
                Err(_) => "login rejected".to_string(),
            };
            Err(ClientError::Unauthorized(reason))
        }
        status => Err(ClientError::ConnectionError(format!(
            "login failed with HTTP {}",
            status
        ))),
    }
}

/// `GET /api/stream-status`
pub async fn fetch_stream_status(server: &str) -> Result<StreamStatusDto, ClientError> {
    let status = reqwest::get(api_url(server, "/api/stream-status"))
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(status)
}
