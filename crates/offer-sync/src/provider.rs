use std::sync::Arc;

use crate::offer::Offer;

/// Errors raised while retrieving a provider's raw payload.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The transport answered with a non-success status.
    #[error("Failed to fetch offers from {provider}: {status}")]
    Http { provider: String, status: String },

    /// The request never produced a response.
    #[error("network error fetching offers from {provider}: {message}")]
    Network { provider: String, message: String },

    /// The payload's own status discriminator reported a failure.
    #[error("Provider {provider} returned unsuccessful status: {status}")]
    Status { provider: String, status: String },

    /// The body could not be decoded as JSON.
    #[error("failed to decode payload from {provider}: {message}")]
    Decode { provider: String, message: String },
}

/// An external source of offers.
///
/// Adapters fetch a raw JSON payload and map it into canonical [`Offer`]
/// records. `transform` is total: a payload missing the expected offers
/// collection produces an empty vector instead of an error.
#[async_trait::async_trait]
pub trait OfferProvider: Send + Sync {
    /// Fixed identifier for this provider, stored on every offer it produces.
    fn provider_name(&self) -> &str;

    /// Retrieve the provider's raw payload.
    async fn fetch(&self) -> Result<serde_json::Value, FetchError>;

    /// Map a raw payload into canonical offers, preserving payload order.
    fn transform(&self, payload: &serde_json::Value) -> Vec<Offer>;
}

#[async_trait::async_trait]
impl<T: OfferProvider + ?Sized> OfferProvider for Arc<T> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        (**self).fetch().await
    }

    fn transform(&self, payload: &serde_json::Value) -> Vec<Offer> {
        (**self).transform(payload)
    }
}

#[async_trait::async_trait]
impl<T: OfferProvider + ?Sized> OfferProvider for Box<T> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        (**self).fetch().await
    }

    fn transform(&self, payload: &serde_json::Value) -> Vec<Offer> {
        (**self).transform(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_names_provider_and_status() {
        let err = FetchError::Http {
            provider: "offer2".into(),
            status: "Internal Server Error".into(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch offers from offer2: Internal Server Error"
        );
    }

    #[test]
    fn status_error_names_reported_status() {
        let err = FetchError::Status {
            provider: "offer2".into(),
            status: "error".into(),
        };
        assert_eq!(
            err.to_string(),
            "Provider offer2 returned unsuccessful status: error"
        );
    }
}
