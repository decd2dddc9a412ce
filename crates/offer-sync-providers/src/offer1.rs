use offer_sync::{FetchError, Offer, OfferProvider, PlatformFlags, slugify};
use serde::Deserialize;

use crate::client::JsonClient;
use crate::lenient;

/// Adapter for the `offer1` feed.
///
/// Payload shape: `{ "response": { "offers": [ ... ] } }`. Each offer carries
/// a `platform` (`desktop` / `mobile`) and a free-text `device` that tells
/// iOS apart from Android.
pub struct Offer1Provider {
    base_url: String,
    client: JsonClient,
}

impl Offer1Provider {
    pub const NAME: &'static str = "offer1";
    pub const DEFAULT_URL: &'static str = "https://api.offer1.com/offers";

    const IOS_DEVICE: &'static str = "iphone_ipad";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, JsonClient::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: JsonClient) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Infer platform flags from the `platform` / `device` pair.
    ///
    /// `desktop` is desktop-only, `mobile` is iOS when the device is
    /// `iphone_ipad` and Android otherwise. Any other platform value enables
    /// all three.
    pub fn platforms_for(platform: &str, device: &str) -> PlatformFlags {
        match platform.to_lowercase().as_str() {
            "desktop" => PlatformFlags::DESKTOP_ONLY,
            "mobile" if device.to_lowercase() == Self::IOS_DEVICE => PlatformFlags::IOS_ONLY,
            "mobile" => PlatformFlags::ANDROID_ONLY,
            _ => PlatformFlags::ALL,
        }
    }

    fn to_offer(&self, raw: RawOffer) -> Offer {
        Offer {
            slug: slugify(raw.offer_name.as_str()),
            platforms: Self::platforms_for(&raw.platform, &raw.device),
            external_offer_id: raw.offer_id,
            name: raw.offer_name,
            description: raw.offer_desc,
            requirements: raw.call_to_action,
            thumbnail: raw.image_url,
            offer_url_template: raw.offer_url,
            provider_name: Self::NAME.to_owned(),
        }
    }
}

#[async_trait::async_trait]
impl OfferProvider for Offer1Provider {
    fn provider_name(&self) -> &str {
        Self::NAME
    }

    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        self.client.get(Self::NAME, &self.base_url).await
    }

    fn transform(&self, payload: &serde_json::Value) -> Vec<Offer> {
        let Some(offers) = payload
            .pointer("/response/offers")
            .and_then(serde_json::Value::as_array)
        else {
            return Vec::new();
        };

        offers
            .iter()
            .map(|item| {
                // Entries that are not objects still count; they fail validation.
                let raw = RawOffer::deserialize(item).unwrap_or_default();
                self.to_offer(raw)
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOffer {
    #[serde(deserialize_with = "lenient::string")]
    offer_id: String,
    #[serde(deserialize_with = "lenient::string")]
    offer_name: String,
    #[serde(deserialize_with = "lenient::string")]
    offer_desc: String,
    #[serde(deserialize_with = "lenient::string")]
    call_to_action: String,
    #[serde(deserialize_with = "lenient::string")]
    offer_url: String,
    #[serde(deserialize_with = "lenient::string")]
    image_url: String,
    #[serde(deserialize_with = "lenient::string")]
    platform: String,
    #[serde(deserialize_with = "lenient::string")]
    device: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider() -> Offer1Provider {
        Offer1Provider::new(Offer1Provider::DEFAULT_URL)
    }

    fn raw_offer(platform: &str, device: &str) -> serde_json::Value {
        json!({
            "offer_id": "19524555",
            "offer_name": "MyGym - iOS",
            "offer_desc": "Play and reach level 20 within 30 days.",
            "call_to_action": "Install and play until you reach level 20.",
            "disclaimer": "This offer rewards within 24 hours.",
            "offer_url": "https://some.url/click?id=1",
            "offer_url_easy": "https://some.url/easy",
            "payout": 10.675,
            "payout_type": "cpe",
            "amount": 8873,
            "image_url": "https://some.url/image.jpg",
            "image_url_220x124": "https://some.url/small.jpg",
            "countries": ["NZ"],
            "platform": platform,
            "device": device,
            "category": { "9": "Mobile" },
            "last_modified": 1645095666,
            "preview_url": "https://apps.apple.com/nz/app/mygym/id1",
            "package_id": "id1",
            "verticals": []
        })
    }

    fn payload(offers: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "query": { "pubid": "1", "appid": 1, "country": "", "platform": "all" },
            "response": {
                "currency_name": "Coins",
                "offers_count": offers.len(),
                "offers": offers
            }
        })
    }

    fn flags(platform: &str, device: &str) -> (i32, i32, i32) {
        let offers = provider().transform(&payload(vec![raw_offer(platform, device)]));
        offers[0].platforms.as_tuple()
    }

    #[test]
    fn maps_fields_onto_canonical_offer() {
        let offers = provider().transform(&payload(vec![raw_offer("mobile", "iphone_ipad")]));

        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.external_offer_id, "19524555");
        assert_eq!(offer.name, "MyGym - iOS");
        assert_eq!(offer.slug, "mygym-ios");
        assert_eq!(offer.description, "Play and reach level 20 within 30 days.");
        assert_eq!(offer.requirements, "Install and play until you reach level 20.");
        assert_eq!(offer.thumbnail, "https://some.url/image.jpg");
        assert_eq!(offer.offer_url_template, "https://some.url/click?id=1");
        assert_eq!(offer.provider_name, "offer1");
    }

    #[test]
    fn desktop_platform_is_desktop_only() {
        assert_eq!(flags("desktop", "anything"), (1, 0, 0));
    }

    #[test]
    fn mobile_iphone_is_ios_only() {
        assert_eq!(flags("mobile", "iphone_ipad"), (0, 0, 1));
    }

    #[test]
    fn mobile_other_device_is_android_only() {
        assert_eq!(flags("mobile", "android"), (0, 1, 0));
        assert_eq!(flags("mobile", ""), (0, 1, 0));
    }

    #[test]
    fn platform_matching_ignores_case() {
        assert_eq!(flags("DESKTOP", ""), (1, 0, 0));
        assert_eq!(flags("Mobile", "IPHONE_IPAD"), (0, 0, 1));
    }

    #[test]
    fn unknown_platform_enables_everything() {
        assert_eq!(flags("unknown", "unknown"), (1, 1, 1));
        assert_eq!(flags("", ""), (1, 1, 1));
    }

    #[test]
    fn preserves_payload_order() {
        let mut second = raw_offer("desktop", "");
        second["offer_id"] = json!("2");
        let offers = provider().transform(&payload(vec![raw_offer("desktop", ""), second]));

        let ids: Vec<&str> = offers.iter().map(|o| o.external_offer_id.as_str()).collect();
        assert_eq!(ids, vec!["19524555", "2"]);
    }

    #[test]
    fn numeric_offer_id_is_stringified() {
        let mut raw = raw_offer("desktop", "");
        raw["offer_id"] = json!(42);
        let offers = provider().transform(&payload(vec![raw]));
        assert_eq!(offers[0].external_offer_id, "42");
    }

    #[test]
    fn missing_optional_text_becomes_empty() {
        let offers = provider().transform(&payload(vec![json!({
            "offer_id": "1",
            "offer_name": "Bare",
            "platform": "desktop"
        })]));

        assert_eq!(offers[0].description, "");
        assert_eq!(offers[0].requirements, "");
        assert_eq!(offers[0].thumbnail, "");
        assert_eq!(offers[0].offer_url_template, "");
    }

    #[test]
    fn empty_offers_list_yields_nothing() {
        assert!(provider().transform(&payload(vec![])).is_empty());
    }

    #[test]
    fn missing_or_malformed_offers_yield_nothing() {
        let p = provider();
        assert!(p.transform(&json!({})).is_empty());
        assert!(p.transform(&json!({ "response": {} })).is_empty());
        assert!(p.transform(&json!({ "response": { "offers": "nope" } })).is_empty());
        assert!(p.transform(&json!({ "response": { "offers": {} } })).is_empty());
        assert!(p.transform(&serde_json::Value::Null).is_empty());
    }
}
