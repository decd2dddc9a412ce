use std::sync::Arc;

use crate::offer::{Offer, StoredOffer};

/// Errors raised by an [`OfferRepository`].
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("database error: {0}")]
    Database(String),

    /// The batch was rolled back; nothing from it was persisted.
    #[error("transaction failed: {0}")]
    Transaction(String),
}

/// Persistent storage for offers, keyed by slug.
#[async_trait::async_trait]
pub trait OfferRepository: Send + Sync {
    /// Look up the stored offer with this slug, if any.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredOffer>, SaveError>;

    /// All stored offers last written by the named provider.
    async fn find_by_provider(&self, provider_name: &str) -> Result<Vec<StoredOffer>, SaveError>;

    /// Upsert a single offer by slug.
    async fn save_offer(&self, offer: &Offer) -> Result<StoredOffer, SaveError>;

    /// Upsert every offer by slug inside one transaction.
    ///
    /// Either all offers are written or none are. Empty input returns an
    /// empty vector without touching storage.
    async fn save_many(&self, offers: &[Offer]) -> Result<Vec<StoredOffer>, SaveError>;
}

#[async_trait::async_trait]
impl<T: OfferRepository + ?Sized> OfferRepository for Arc<T> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredOffer>, SaveError> {
        (**self).find_by_slug(slug).await
    }

    async fn find_by_provider(&self, provider_name: &str) -> Result<Vec<StoredOffer>, SaveError> {
        (**self).find_by_provider(provider_name).await
    }

    async fn save_offer(&self, offer: &Offer) -> Result<StoredOffer, SaveError> {
        (**self).save_offer(offer).await
    }

    async fn save_many(&self, offers: &[Offer]) -> Result<Vec<StoredOffer>, SaveError> {
        (**self).save_many(offers).await
    }
}
