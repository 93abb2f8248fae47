//! Shared request plumbing for the HTTP providers.

use std::time::Duration;

use relay::LlmError;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

const MAX_ERROR_BODY: usize = 512;

/// Sends `request` and decodes a successful JSON response.
///
/// Non-2xx answers become [`LlmError::Status`]; a request that outlives
/// `timeout` becomes [`LlmError::Timeout`].
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, LlmError> {
    let response = request
        .timeout(timeout)
        .send()
        .await
        .map_err(|err| transport(err, timeout))?;

    if !response.status().is_success() {
        return Err(status_error(response).await);
    }

    response.json::<T>().await.map_err(|err| {
        if err.is_timeout() {
            LlmError::Timeout { after: timeout }
        } else {
            LlmError::Malformed {
                message: err.to_string(),
            }
        }
    })
}

fn transport(err: reqwest::Error, timeout: Duration) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout { after: timeout }
    } else {
        LlmError::Transport {
            message: err.to_string(),
        }
    }
}

async fn status_error(response: Response) -> LlmError {
    let status = response.status().as_u16();
    let body: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(MAX_ERROR_BODY)
        .collect();
    LlmError::Status { status, body }
}
