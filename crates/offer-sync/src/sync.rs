//! Provider-by-provider sync pipeline.
//!
//! Each provider runs `fetch -> transform -> validate -> save` in turn. Any
//! failure is recorded on that provider's [`ProviderResult`] and the loop
//! moves on, so one broken vendor never stops the others.

use std::any::Any;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{error, info, warn};

use crate::offer::Offer;
use crate::provider::{FetchError, OfferProvider};
use crate::repository::OfferRepository;
use crate::validator::OfferValidator;

/// Statistics and messages for one provider's run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderResult {
    pub provider_name: String,
    pub total_offers: usize,
    pub valid_offers: usize,
    pub invalid_offers: usize,
    pub saved_offers: usize,
    pub errors: Vec<String>,
}

impl ProviderResult {
    pub fn new(provider_name: impl Into<String>) -> Self {
        Self {
            provider_name: provider_name.into(),
            ..Self::default()
        }
    }

    /// Zero totals with a single fatal error.
    pub fn fatal(provider_name: impl Into<String>, message: &str) -> Self {
        Self {
            errors: vec![format!("Fatal error: {message}")],
            ..Self::new(provider_name)
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}

/// Sums across every provider in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncTotals {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub saved: usize,
    pub errors: usize,
}

/// Outcome of a whole sync run, one entry per provider in run order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncSummary {
    pub providers: Vec<ProviderResult>,
}

impl SyncSummary {
    pub fn totals(&self) -> SyncTotals {
        self.providers
            .iter()
            .fold(SyncTotals::default(), |acc, result| SyncTotals {
                total: acc.total + result.total_offers,
                valid: acc.valid + result.valid_offers,
                invalid: acc.invalid + result.invalid_offers,
                saved: acc.saved + result.saved_offers,
                errors: acc.errors + result.error_count(),
            })
    }

    /// Find a provider's result by name.
    pub fn provider(&self, name: &str) -> Option<&ProviderResult> {
        self.providers.iter().find(|r| r.provider_name == name)
    }

    fn log(&self) {
        for result in &self.providers {
            info!(
                provider = %result.provider_name,
                total = result.total_offers,
                valid = result.valid_offers,
                invalid = result.invalid_offers,
                saved = result.saved_offers,
                errors = result.error_count(),
                "Provider summary"
            );
        }

        let totals = self.totals();
        info!(
            total = totals.total,
            valid = totals.valid,
            invalid = totals.invalid,
            saved = totals.saved,
            errors = totals.errors,
            "Overall summary"
        );
    }
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Offer Sync Job Summary ===")?;

        for result in &self.providers {
            writeln!(f)?;
            writeln!(f, "Provider: {}", result.provider_name)?;
            writeln!(f, "  Total offers: {}", result.total_offers)?;
            writeln!(f, "  Valid offers: {}", result.valid_offers)?;
            writeln!(f, "  Invalid offers: {}", result.invalid_offers)?;
            writeln!(f, "  Saved offers: {}", result.saved_offers)?;
            if !result.errors.is_empty() {
                writeln!(f, "  Errors/Warnings: {}", result.error_count())?;
            }
        }

        let totals = self.totals();
        writeln!(f)?;
        writeln!(f, "=== Overall Summary ===")?;
        writeln!(f, "Total offers processed: {}", totals.total)?;
        writeln!(f, "Total valid offers: {}", totals.valid)?;
        writeln!(f, "Invalid offers: {}", totals.invalid)?;
        writeln!(f, "Total offers saved: {}", totals.saved)
    }
}

/// Drives the sync pipeline over a list of providers.
pub struct OfferSyncJob<R> {
    validator: OfferValidator,
    repository: R,
}

impl<R: OfferRepository> OfferSyncJob<R> {
    pub fn new(repository: R) -> Self {
        Self {
            validator: OfferValidator::new(),
            repository,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Run the pipeline for a single provider.
    ///
    /// Fetch failures and save failures are recorded in the returned result
    /// rather than propagated.
    pub async fn process_provider<P>(&self, provider: &P) -> ProviderResult
    where
        P: OfferProvider + ?Sized,
    {
        let name = provider.provider_name();
        let mut result = ProviderResult::new(name);

        if let Err(e) = self.run_pipeline(provider, &mut result).await {
            let message = format!("[{name}] Error processing provider: {e}");
            error!(provider = %name, error = %e, "Error processing provider");
            result.errors.push(message);
        }

        result
    }

    /// Run every provider in order and log a summary.
    ///
    /// A panic inside one provider's pipeline is caught here and recorded as
    /// a fatal error for that provider only.
    pub async fn process_providers<P: OfferProvider>(&self, providers: &[P]) -> SyncSummary {
        info!(
            providers = providers.len(),
            "Starting offer sync job for {} provider(s)",
            providers.len()
        );

        let mut summary = SyncSummary::default();

        for provider in providers {
            let outcome = AssertUnwindSafe(self.process_provider(provider))
                .catch_unwind()
                .await;

            let result = match outcome {
                Ok(result) => result,
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(provider = %provider.provider_name(), error = %message, "Fatal error");
                    ProviderResult::fatal(provider.provider_name(), &message)
                }
            };
            summary.providers.push(result);
        }

        summary.log();
        summary
    }

    async fn run_pipeline<P>(&self, provider: &P, result: &mut ProviderResult) -> Result<(), FetchError>
    where
        P: OfferProvider + ?Sized,
    {
        let name = provider.provider_name();

        info!(provider = %name, "Fetching offers");
        let payload = provider.fetch().await?;

        info!(provider = %name, "Transforming offers");
        let offers = provider.transform(&payload);
        result.total_offers = offers.len();

        if offers.is_empty() {
            warn!(provider = %name, "No offers found in payload");
            return Ok(());
        }

        info!(provider = %name, count = offers.len(), "Validating {} offers", offers.len());
        let valid = self.partition_valid(name, offers, result);

        if valid.is_empty() {
            warn!(provider = %name, "No valid offers to save");
            return Ok(());
        }

        info!(provider = %name, count = valid.len(), "Saving {} valid offers", valid.len());
        match self.repository.save_many(&valid).await {
            Ok(saved) => {
                result.saved_offers = saved.len();
                info!(provider = %name, count = saved.len(), "Successfully saved {} offers", saved.len());
            }
            Err(e) => {
                error!(provider = %name, error = %e, "Error saving offers");
                result.errors.push(format!("[{name}] Error saving offers: {e}"));
            }
        }

        Ok(())
    }

    /// Keep the valid offers, recording a message for each rejected one.
    fn partition_valid(
        &self,
        name: &str,
        offers: Vec<Offer>,
        result: &mut ProviderResult,
    ) -> Vec<Offer> {
        let outcomes = self.validator.validate_batch(&offers);
        let mut valid = Vec::with_capacity(offers.len());

        // Batch results are keyed 0..n, so values line up with `offers`.
        for (offer, outcome) in offers.into_iter().zip(outcomes.into_values()) {
            if outcome.is_valid() {
                result.valid_offers += 1;
                valid.push(offer);
                continue;
            }

            result.invalid_offers += 1;
            let message = format!(
                "[{name}] Skipping invalid offer \"{}\" (ID: {}): {}",
                offer.name,
                offer.external_offer_id,
                outcome.errors.join(", ")
            );
            warn!(
                provider = %name,
                offer_id = %offer.external_offer_id,
                errors = ?outcome.errors,
                "Skipping invalid offer"
            );
            result.errors.push(message);
        }

        valid
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
