// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::ACCEPT;

use crate::error::{ExtractionError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_client(config: &HttpConfig) -> Result<Client> {
    let client = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a URL and return its body, treating non-2xx statuses as failures.
pub async fn fetch_text(
    client: &Client,
    url: &str,
) -> std::result::Result<String, ExtractionError> {
    fetch_text_with(client, url, None).await
}

/// Like [`fetch_text`], optionally sending an `Accept` header.
pub async fn fetch_text_with(
    client: &Client,
    url: &str,
    accept: Option<&str>,
) -> std::result::Result<String, ExtractionError> {
    let mut request = client.get(url);
    if let Some(accept) = accept {
        request = request.header(ACCEPT, accept);
    }

    let response = request
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ExtractionError::network(describe(&e)))?;
    response
        .text()
        .await
        .map_err(|e| ExtractionError::network(describe(&e)))
}

/// Render a request error with the detail that matters for an operator.
pub fn describe(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if let Some(status) = e.status() {
        format!("unexpected status {}", status)
    } else {
        e.to_string()
    }
}

/// Address of a server that accepts connections and never answers.
#[cfg(test)]
pub(crate) async fn silent_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{addr}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_timeout_client() -> Client {
        create_client(&HttpConfig {
            timeout_secs: 1,
            ..HttpConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_text_ok() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body("hello")
            .create_async()
            .await;

        let client = create_client(&HttpConfig::default()).unwrap();
        let body = fetch_text(&client, &server.url()).await.unwrap();
        assert_eq!(body, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_text_with_accept_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let client = create_client(&HttpConfig::default()).unwrap();
        fetch_text_with(&client, &server.url(), Some("application/json"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_text_non_2xx_is_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .with_status(503)
            .create_async()
            .await;

        let client = create_client(&HttpConfig::default()).unwrap();
        let err = fetch_text(&client, &server.url()).await.unwrap_err();
        match err {
            ExtractionError::Network(detail) => assert!(detail.contains("503")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_text_timeout_is_reported() {
        let url = silent_server().await;

        let err = fetch_text(&short_timeout_client(), &url).await.unwrap_err();
        match err {
            ExtractionError::Network(detail) => assert!(detail.contains("timed out")),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_text_connection_refused_is_network_error() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetch_text(&short_timeout_client(), &format!("http://{addr}/"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::Network(_)));
    }
}
