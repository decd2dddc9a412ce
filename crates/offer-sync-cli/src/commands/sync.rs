use anyhow::Result;
use offer_sync::OfferSyncJob;
use offer_sync_providers::{ProviderConfig, build_providers};
use offer_sync_store::OfferStore;

/// Run every configured provider and print the summary to stdout.
///
/// Per-provider failures are part of the summary, not an error.
pub async fn run(store: OfferStore, configs: &[ProviderConfig]) -> Result<()> {
    let providers = build_providers(configs);
    println!("Syncing offers from {} provider(s)...", providers.len());

    let job = OfferSyncJob::new(store);
    let summary = job.process_providers(&providers).await;

    print!("{summary}");

    Ok(())
}
