pub mod offer;
pub mod provider;
pub mod repository;
pub mod slug;
pub mod sync;
pub mod validator;

pub use offer::{Offer, PlatformFlags, StoredOffer};
pub use provider::{FetchError, OfferProvider};
pub use repository::{OfferRepository, SaveError};
pub use slug::slugify;
pub use sync::{OfferSyncJob, ProviderResult, SyncSummary, SyncTotals};
pub use validator::{OfferValidator, ValidationResult};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
