/// Thin wrappers over the `/api` endpoints, used by the components in the browser.
use crate::models::wire::{
    CreateSessionRequest, ErrorBody, RatingRequest, SessionView, SubmissionReceipt,
};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] gloo_net::Error),

    #[error("{}", .0.message)]
    Api(ErrorBody),
}

async fn check(response: Response) -> Result<Response, ClientError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.json::<ErrorBody>().await.unwrap_or_else(|_| ErrorBody {
        kind: "http".into(),
        message: format!("Request failed with status {status}"),
    });
    Err(ClientError::Api(body))
}

async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = check(response).await?;
    let value = response.json::<T>().await?;
    Ok(value)
}

pub async fn fetch_users() -> Result<Vec<String>, ClientError> {
    json(Request::get("/api/users").send().await?).await
}

pub async fn start_session(user_id: &str) -> Result<SessionView, ClientError> {
    let request = CreateSessionRequest {
        user_id: user_id.to_string(),
    };
    json(Request::post("/api/sessions").json(&request)?.send().await?).await
}

pub async fn reload_session(session_id: Uuid) -> Result<SessionView, ClientError> {
    let url = format!("/api/sessions/{session_id}/reload");
    json(Request::post(&url).send().await?).await
}

pub async fn put_rating(session_id: Uuid, rating: &RatingRequest) -> Result<(), ClientError> {
    let url = format!("/api/sessions/{session_id}/ratings");
    check(Request::put(&url).json(rating)?.send().await?).await?;
    Ok(())
}

pub async fn submit(session_id: Uuid) -> Result<SubmissionReceipt, ClientError> {
    let url = format!("/api/sessions/{session_id}/submit");
    json(Request::post(&url).send().await?).await
}
