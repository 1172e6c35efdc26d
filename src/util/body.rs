use futures::StreamExt;
use thiserror::Error;

/// Upper bound on a response body read from the relay or from upstream.
pub const MAX_BODY_SIZE: usize = 5 * 1024 * 1024; // 5MB

#[derive(Debug, Error)]
pub enum BodyError {
    #[error("Response too large (exceeds {0} bytes)")]
    TooLarge(usize),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Stream `response` into memory, refusing anything over `limit` bytes.
///
/// A declared `Content-Length` over the limit fails before any chunk is read.
pub async fn read_limited_body(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, BodyError> {
    if let Some(len) = response.content_length() {
        if len > limit as u64 {
            return Err(BodyError::TooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(BodyError::TooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn get(server: &MockServer) -> reqwest::Response {
        reqwest::get(server.uri()).await.unwrap()
    }

    #[tokio::test]
    async fn test_body_within_limit_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
            .mount(&server)
            .await;

        let body = read_limited_body(get(&server).await, 5).await.unwrap();
        assert_eq!(body, b"hello");
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("hello!"))
            .mount(&server)
            .await;

        let err = read_limited_body(get(&server).await, 5).await.unwrap_err();
        assert!(matches!(err, BodyError::TooLarge(5)));
    }
}
