use anyhow::Result;
use offer_sync::OfferRepository;
use offer_sync_store::OfferStore;

use super::format;

pub async fn run(store: &OfferStore, provider_filter: Option<&str>) -> Result<()> {
    let offers = match provider_filter {
        Some(provider) => store.find_by_provider(provider).await?,
        None => store.list_all()?,
    };

    if offers.is_empty() {
        println!("No offers stored.");
    } else {
        format::print_offer_table(&offers);
    }

    Ok(())
}
