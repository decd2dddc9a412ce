use offer_sync::{FetchError, Offer, OfferProvider, PlatformFlags, slugify};
use serde::Deserialize;

use crate::client::JsonClient;
use crate::lenient;

/// Adapter for the `offer2` feed.
///
/// Payload shape: `{ "status": "success", "data": { "<id>": campaign } }`.
/// Each campaign nests business fields under `Offer` and three independent
/// platform booleans under `OS`.
pub struct Offer2Provider {
    base_url: String,
    client: JsonClient,
}

impl Offer2Provider {
    pub const NAME: &'static str = "offer2";
    pub const DEFAULT_URL: &'static str = "https://api.offer2.com/offers";

    const SUCCESS: &'static str = "success";

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

    fn to_offer(&self, campaign: RawCampaign) -> Offer {
        let RawCampaign { offer, os } = campaign;

        Offer {
            slug: slugify(offer.name.as_str()),
            external_offer_id: offer.campaign_id,
            name: offer.name,
            description: offer.description,
            requirements: offer.instructions,
            thumbnail: offer.icon,
            offer_url_template: offer.tracking_url,
            provider_name: Self::NAME.to_owned(),
            platforms: PlatformFlags::from_bools(os.web, os.android, os.ios),
        }
    }
}

#[async_trait::async_trait]
impl OfferProvider for Offer2Provider {
    fn provider_name(&self) -> &str {
        Self::NAME
    }

    /// Fetch the feed; a `status` other than `"success"` is a fetch failure.
    async fn fetch(&self) -> Result<serde_json::Value, FetchError> {
        let payload = self.client.get(Self::NAME, &self.base_url).await?;

        match payload.get("status").and_then(serde_json::Value::as_str) {
            Some(Self::SUCCESS) => Ok(payload),
            other => Err(FetchError::Status {
                provider: Self::NAME.to_owned(),
                status: other.unwrap_or("missing").to_owned(),
            }),
        }
    }

    fn transform(&self, payload: &serde_json::Value) -> Vec<Offer> {
        let Some(campaigns) = payload.get("data").and_then(serde_json::Value::as_object) else {
            return Vec::new();
        };

        campaigns
            .values()
            .map(|item| self.to_offer(RawCampaign::deserialize(item).unwrap_or_default()))
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCampaign {
    #[serde(rename = "Offer")]
    offer: RawCampaignOffer,
    #[serde(rename = "OS")]
    os: RawOs,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCampaignOffer {
    #[serde(deserialize_with = "lenient::string")]
    campaign_id: String,
    #[serde(deserialize_with = "lenient::string")]
    name: String,
    #[serde(deserialize_with = "lenient::string")]
    description: String,
    #[serde(deserialize_with = "lenient::string")]
    instructions: String,
    #[serde(deserialize_with = "lenient::string")]
    icon: String,
    #[serde(deserialize_with = "lenient::string")]
    tracking_url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOs {
    #[serde(deserialize_with = "lenient::flag")]
    android: bool,
    #[serde(deserialize_with = "lenient::flag")]
    ios: bool,
    #[serde(deserialize_with = "lenient::flag")]
    web: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn provider() -> Offer2Provider {
        Offer2Provider::new(Offer2Provider::DEFAULT_URL)
    }

    fn campaign(id: u64, name: &str, android: bool, ios: bool, web: bool) -> serde_json::Value {
        json!({
            "Offer": {
                "campaign_id": id,
                "store_id": null,
                "tracking_type": "CPA",
                "campaign_vertical": "Gaming",
                "currency_name_singular": "coin",
                "currency_name_plural": "coins",
                "network_epc": "4.8359",
                "icon": "https://cdn.example.com/icon.png",
                "name": name,
                "tracking_url": "https://track.example.com/c?id=1",
                "instructions": "Complete level 10",
                "disclaimer": null,
                "description": "Play the game",
                "short_description": "Play",
                "category_1": "Gaming",
                "category_2": null,
                "amount": 1000,
                "payout_usd": 1.5,
                "start_datetime": "2022-01-01 00:00:00",
                "end_datetime": "2030-01-01 00:00:00",
                "is_multi_reward": false
            },
            "Country": { "include": { "US": { "id": 243 } }, "exclude": [] },
            "State": { "include": [], "exclude": [] },
            "City": { "include": [], "exclude": [] },
            "Connection_Type": { "cellular": true, "wifi": true },
            "Device": { "include": [], "exclude": [] },
            "OS": {
                "android": android,
                "ios": ios,
                "web": web,
                "min_ios": null,
                "max_ios": null,
                "min_android": null,
                "max_android": null
            }
        })
    }

    fn payload(campaigns: Vec<(&str, serde_json::Value)>) -> serde_json::Value {
        let data: serde_json::Map<String, serde_json::Value> = campaigns
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v))
            .collect();
        json!({ "status": "success", "data": data })
    }

    #[test]
    fn maps_fields_onto_canonical_offer() {
        let offers = provider().transform(&payload(vec![(
            "22222",
            campaign(22222, "Sofi Banking", true, false, false),
        )]));

        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.external_offer_id, "22222");
        assert_eq!(offer.name, "Sofi Banking");
        assert_eq!(offer.slug, "sofi-banking");
        assert_eq!(offer.description, "Play the game");
        assert_eq!(offer.requirements, "Complete level 10");
        assert_eq!(offer.thumbnail, "https://cdn.example.com/icon.png");
        assert_eq!(offer.offer_url_template, "https://track.example.com/c?id=1");
        assert_eq!(offer.provider_name, "offer2");
    }

    #[test]
    fn os_flags_map_one_to_one() {
        let cases = [
            ((true, false, false), (0, 1, 0)),
            ((false, true, false), (0, 0, 1)),
            ((false, false, true), (1, 0, 0)),
            ((true, true, true), (1, 1, 1)),
        ];

        for ((android, ios, web), expected) in cases {
            let offers = provider().transform(&payload(vec![(
                "1",
                campaign(1, "Offer", android, ios, web),
            )]));
            assert_eq!(offers[0].platforms.as_tuple(), expected);
        }
    }

    #[test]
    fn all_flags_false_has_no_fallback() {
        let offers = provider().transform(&payload(vec![(
            "1",
            campaign(1, "Offer", false, false, false),
        )]));
        assert_eq!(offers[0].platforms.as_tuple(), (0, 0, 0));
    }

    #[test]
    fn each_campaign_becomes_one_offer() {
        let offers = provider().transform(&payload(vec![
            ("a", campaign(1, "First", true, false, false)),
            ("b", campaign(2, "Second", false, true, false)),
        ]));

        let mut ids: Vec<&str> = offers.iter().map(|o| o.external_offer_id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn missing_os_block_disables_all_platforms() {
        let offers = provider().transform(&json!({
            "status": "success",
            "data": { "1": { "Offer": { "campaign_id": 1, "name": "No OS" } } }
        }));
        assert_eq!(offers[0].platforms.as_tuple(), (0, 0, 0));
        assert_eq!(offers[0].external_offer_id, "1");
    }

    #[test]
    fn empty_data_yields_nothing() {
        assert!(provider().transform(&payload(vec![])).is_empty());
    }

    #[test]
    fn missing_or_malformed_data_yields_nothing() {
        let p = provider();
        assert!(p.transform(&json!({ "status": "success" })).is_empty());
        assert!(p.transform(&json!({ "status": "success", "data": [] })).is_empty());
        assert!(p.transform(&json!({ "status": "success", "data": "x" })).is_empty());
        assert!(p.transform(&serde_json::Value::Null).is_empty());
    }
}
