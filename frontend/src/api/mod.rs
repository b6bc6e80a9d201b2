//! Thin wrappers over `gloo-net` for the gateway REST API.
//!
//! Every call goes to the same origin; the host server forwards `/api` to the
//! gateway. Non-2xx responses become [`ApiError`] through
//! [`ApiError::from_response`], so pages only deal with typed errors.

use common::errors::ApiError;
use gloo_net::http::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub mod auth;
pub mod bulk;
pub mod config;
pub mod history;
pub mod resources;

fn network_error(err: gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

/// Turns a non-2xx response into an [`ApiError`], keeping 2xx responses.
async fn check(response: Response) -> Result<Response, ApiError> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::from_response(status, &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    check(response)
        .await?
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

pub async fn get_json<T: DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = gloo_net::http::Request::get(url)
        .header("Accept", "application/json")
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}

/// Sends `body` as JSON with the method of `builder` and decodes the reply.
pub async fn send_json<B, T>(builder: RequestBuilder, body: &B) -> Result<T, ApiError>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let response = builder
        .json(body)
        .map_err(|err| ApiError::Decode(err.to_string()))?
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}

/// Like [`send_json`] for endpoints that answer without a body.
pub async fn send_json_no_content<B>(builder: RequestBuilder, body: &B) -> Result<(), ApiError>
where
    B: Serialize + ?Sized,
{
    let response = builder
        .json(body)
        .map_err(|err| ApiError::Decode(err.to_string()))?
        .send()
        .await
        .map_err(network_error)?;
    check(response).await.map(|_| ())
}

pub async fn delete(url: &str) -> Result<(), ApiError> {
    let response = gloo_net::http::Request::delete(url)
        .send()
        .await
        .map_err(network_error)?;
    check(response).await.map(|_| ())
}

/// Posts a multipart form and decodes the reply.
pub async fn post_form<T: DeserializeOwned>(
    url: &str,
    form: web_sys::FormData,
) -> Result<T, ApiError> {
    let response = gloo_net::http::Request::post(url)
        .body(form)
        .map_err(network_error)?
        .send()
        .await
        .map_err(network_error)?;
    decode(response).await
}
