use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{
    FetchError, Offer, OfferProvider, OfferRepository, PlatformFlags, SaveError, StoredOffer,
};

/// A valid offer with a name, slug and ID derived from `id`.
pub fn sample_offer(id: &str, provider_name: &str) -> Offer {
    let name = format!("Test Offer {id}");
    Offer {
        external_offer_id: id.to_owned(),
        slug: crate::slugify(name.as_str()),
        name,
        description: "Test description".to_owned(),
        requirements: "Test requirements".to_owned(),
        thumbnail: "https://example.com/image.jpg".to_owned(),
        offer_url_template: "https://example.com/offer".to_owned(),
        provider_name: provider_name.to_owned(),
        platforms: PlatformFlags::DESKTOP_ONLY,
    }
}

/// Provider whose transform step returns a fixed list of offers.
pub struct StaticProvider {
    name: String,
    offers: Vec<Offer>,
}

impl StaticProvider {
    pub fn new(name: impl Into<String>, offers: Vec<Offer>) -> Self {
        Self {
            name: name.into(),
            offers,
        }
    }
}

#[async_trait::async_trait]
impl OfferProvider for StaticProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        Ok(serde_json::Value::Null)
    }

    fn transform(&self, _payload: &serde_json::Value) -> Vec<Offer> {
        self.offers.clone()
    }
}

/// Provider whose fetch always fails with a network error.
pub struct FailingProvider {
    name: String,
    message: String,
}

impl FailingProvider {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait::async_trait]
impl OfferProvider for FailingProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        Err(FetchError::Network {
            provider: self.name.clone(),
            message: self.message.clone(),
        })
    }

    fn transform(&self, _payload: &serde_json::Value) -> Vec<Offer> {
        Vec::new()
    }
}

/// Provider that panics during transform.
pub struct PanickingProvider {
    name: String,
    message: String,
}

impl PanickingProvider {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

#[async_trait::async_trait]
impl OfferProvider for PanickingProvider {
    fn provider_name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        Ok(serde_json::Value::Null)
    }

    fn transform(&self, _payload: &serde_json::Value) -> Vec<Offer> {
        panic!("{}", self.message);
    }
}

/// In-memory repository with optional failure injection.
#[derive(Default)]
pub struct InMemoryOfferRepository {
    rows: Mutex<Vec<StoredOffer>>,
    save_failure: Mutex<Option<String>>,
    clock: AtomicU64,
}

impl InMemoryOfferRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent save fail with this message.
    pub fn fail_saves_with(&self, message: impl Into<String>) {
        *self.save_failure.lock().unwrap() = Some(message.into());
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn all(&self) -> Vec<StoredOffer> {
        self.rows.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), SaveError> {
        match self.save_failure.lock().unwrap().as_ref() {
            Some(message) => Err(SaveError::Transaction(message.clone())),
            None => Ok(()),
        }
    }

    fn upsert_into(&self, rows: &mut Vec<StoredOffer>, offer: &Offer) -> StoredOffer {
        let now = self.clock.fetch_add(1, Ordering::SeqCst);

        if let Some(existing) = rows.iter_mut().find(|row| row.slug == offer.slug) {
            existing.reconcile(offer, now);
            return existing.clone();
        }

        let id = rows.iter().map(|row| row.id).max().unwrap_or(0) + 1;
        let stored = StoredOffer::new(id, offer, now);
        rows.push(stored.clone());
        stored
    }
}

#[async_trait::async_trait]
impl OfferRepository for InMemoryOfferRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<StoredOffer>, SaveError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.slug == slug)
            .cloned())
    }

    async fn find_by_provider(&self, provider_name: &str) -> Result<Vec<StoredOffer>, SaveError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.provider_name == provider_name)
            .cloned()
            .collect())
    }

    async fn save_offer(&self, offer: &Offer) -> Result<StoredOffer, SaveError> {
        self.check_failure()?;
        let mut rows = self.rows.lock().unwrap();
        Ok(self.upsert_into(&mut rows, offer))
    }

    async fn save_many(&self, offers: &[Offer]) -> Result<Vec<StoredOffer>, SaveError> {
        if offers.is_empty() {
            return Ok(Vec::new());
        }
        self.check_failure()?;

        let mut rows = self.rows.lock().unwrap();
        let mut staged = rows.clone();
        let saved = offers
            .iter()
            .map(|offer| self.upsert_into(&mut staged, offer))
            .collect();
        *rows = staged;
        Ok(saved)
    }
}
