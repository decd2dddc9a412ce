use anyhow::{Result, bail};
use offer_sync::OfferRepository;
use offer_sync_store::OfferStore;

use super::format;

pub async fn run(store: &OfferStore, slug: &str) -> Result<()> {
    let Some(offer) = store.find_by_slug(slug).await? else {
        bail!("Offer not found: {slug}");
    };

    println!("Name:         {}", offer.name);
    println!("Slug:         {}", offer.slug);
    println!("Provider:     {}", offer.provider_name);
    println!("External ID:  {}", offer.external_offer_id);
    println!("Platforms:    {}", offer.platforms);
    println!("URL template: {}", offer.offer_url_template);
    println!("Thumbnail:    {}", offer.thumbnail);
    println!("Created:      {}", format::age(offer.created_at));
    println!("Updated:      {}", format::age(offer.updated_at));

    if !offer.description.is_empty() {
        println!();
        println!("{}", offer.description);
    }
    if !offer.requirements.is_empty() {
        println!();
        println!("Requirements: {}", offer.requirements);
    }

    Ok(())
}
