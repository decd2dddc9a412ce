use offer_sync::FetchError;

/// HTTP client for fetching provider payloads as JSON.
///
/// This is a pure transport utility: it knows nothing about any vendor's
/// payload layout. Non-success responses become [`FetchError::Http`].
#[derive(Debug, Clone, Default)]
pub struct JsonClient {
    client: reqwest::Client,
}

impl JsonClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// GET `url` on behalf of `provider` and decode the body as JSON.
    pub async fn get(&self, provider: &str, url: &str) -> Result<serde_json::Value, FetchError> {
        tracing::debug!(provider, url, "requesting offers");

        let response = self
            .client
            .get(url)
            .header("User-Agent", "offer-sync")
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                provider: provider.to_owned(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                provider: provider.to_owned(),
                status: status
                    .canonical_reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| status.as_str().to_owned()),
            });
        }

        response.json().await.map_err(|e| FetchError::Decode {
            provider: provider.to_owned(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn start_mock_server() -> wiremock::MockServer {
        wiremock::MockServer::start().await
    }

    #[tokio::test]
    async fn get_returns_decoded_json() {
        let server = start_mock_server().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/offers"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_raw(r#"{"status":"success"}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let client = JsonClient::new();
        let value = client
            .get("offer2", &format!("{}/offers", server.uri()))
            .await
            .unwrap();

        assert_eq!(value["status"], "success");
    }

    #[tokio::test]
    async fn server_error_reports_status_text() {
        let server = start_mock_server().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = JsonClient::new();
        let err = client
            .get("offer1", &format!("{}/offers", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "Failed to fetch offers from offer1: Internal Server Error"
        );
    }

    #[tokio::test]
    async fn not_found_is_http_error() {
        let server = start_mock_server().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = JsonClient::new();
        let err = client
            .get("offer1", &format!("{}/offers", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { ref status, .. } if status == "Not Found"));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let server = start_mock_server().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = JsonClient::new();
        let err = client
            .get("offer1", &format!("{}/offers", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let client = JsonClient::new();
        let err = client
            .get("offer1", "http://127.0.0.1:1/offers")
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Network { .. }));
    }
}
