// Shared HTTP plumbing for the hosted-store backends.
// Builds authenticated clients and converts HTTP statuses into error kinds.

use reqwest::{
    Client, Response, StatusCode,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};

use crate::error::{Result, TidoError};

const USER_AGENT_VALUE: &str = concat!("tido/", env!("CARGO_PKG_VERSION"));

/// Build a reqwest client with a default bearer-auth header.
pub fn authenticated_client(token: &str) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| TidoError::Config(format!("invalid token: {}", e)))?,
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_static(USER_AGENT_VALUE),
    );

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

/// Check a response status and convert failures into error kinds.
///
/// 404 becomes `NotFound` with the given id when one is supplied (document
/// operations); otherwise a missing endpoint means the configured
/// spreadsheet/collection itself is unreachable.
pub async fn check_response(response: Response, not_found_id: Option<&str>) -> Result<Response> {
    match response.status() {
        StatusCode::OK | StatusCode::CREATED | StatusCode::ACCEPTED => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(TidoError::StoreUnavailable(
            "authentication failed: invalid or expired token".into(),
        )),
        StatusCode::NOT_FOUND => match not_found_id {
            Some(id) => Err(TidoError::NotFound(id.to_string())),
            None => Err(TidoError::StoreUnavailable(format!(
                "endpoint not found: {}",
                response.url()
            ))),
        },
        // Firestore reports a failed currentDocument precondition as 409.
        StatusCode::CONFLICT => match not_found_id {
            Some(id) => Err(TidoError::NotFound(id.to_string())),
            None => Err(TidoError::StoreUnavailable(body_summary(response).await)),
        },
        _ => Err(TidoError::StoreUnavailable(body_summary(response).await)),
    }
}

async fn body_summary(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!("HTTP {}: {}", status, body.chars().take(300).collect::<String>())
}
