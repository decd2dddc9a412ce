use std::collections::BTreeMap;

use crate::offer::{Offer, PlatformFlags};

pub const NAME_MAX_LENGTH: usize = 255;
pub const SLUG_MAX_LENGTH: usize = 255;
pub const THUMBNAIL_MAX_LENGTH: usize = 255;
pub const OFFER_URL_TEMPLATE_MAX_LENGTH: usize = 256;

pub const NAME_REQUIRED: &str = "Offer name is required";
pub const SLUG_REQUIRED: &str = "Offer slug is required";
pub const DESCRIPTION_REQUIRED: &str = "Offer description is required";
pub const REQUIREMENTS_REQUIRED: &str = "Offer requirements are required";
pub const THUMBNAIL_REQUIRED: &str = "Offer thumbnail URL is required";
pub const OFFER_URL_TEMPLATE_REQUIRED: &str = "Offer URL template is required";
pub const PROVIDER_NAME_REQUIRED: &str = "Provider name is required";
pub const EXTERNAL_OFFER_ID_REQUIRED: &str = "External offer ID is required";

pub const NAME_TOO_LONG: &str = "Offer name must be 255 characters or less";
pub const SLUG_TOO_LONG: &str = "Offer slug must be 255 characters or less";
pub const THUMBNAIL_TOO_LONG: &str = "Offer thumbnail URL must be 255 characters or less";
pub const OFFER_URL_TEMPLATE_TOO_LONG: &str = "Offer URL template must be 256 characters or less";

pub const THUMBNAIL_INVALID_URL: &str = "Offer thumbnail must be a valid URL";
pub const OFFER_URL_TEMPLATE_INVALID_URL: &str = "Offer URL template must be a valid URL";

pub const PLATFORM_REQUIRED: &str =
    "At least one platform (desktop, Android, or iOS) must be enabled";
pub const IS_DESKTOP_INVALID: &str = "isDesktop must be 0 or 1";
pub const IS_ANDROID_INVALID: &str = "isAndroid must be 0 or 1";
pub const IS_IOS_INVALID: &str = "isIos must be 0 or 1";

/// Outcome of validating a single offer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }
}

/// Stateless business-rule checks for [`Offer`] records.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfferValidator;

/// Length and URL checks that only run once a field is known to be present.
struct BoundedField<'a> {
    value: &'a str,
    max_len: usize,
    required: &'static str,
    too_long: &'static str,
    invalid_url: Option<&'static str>,
}

impl OfferValidator {
    pub fn new() -> Self {
        Self
    }

    /// Apply every rule to `offer` and collect all failures.
    pub fn validate(&self, offer: &Offer) -> ValidationResult {
        let mut result = ValidationResult::default();

        check_bounded(
            &mut result,
            BoundedField {
                value: &offer.name,
                max_len: NAME_MAX_LENGTH,
                required: NAME_REQUIRED,
                too_long: NAME_TOO_LONG,
                invalid_url: None,
            },
        );
        check_bounded(
            &mut result,
            BoundedField {
                value: &offer.slug,
                max_len: SLUG_MAX_LENGTH,
                required: SLUG_REQUIRED,
                too_long: SLUG_TOO_LONG,
                invalid_url: None,
            },
        );
        check_required(&mut result, &offer.description, DESCRIPTION_REQUIRED);
        check_required(&mut result, &offer.requirements, REQUIREMENTS_REQUIRED);
        check_bounded(
            &mut result,
            BoundedField {
                value: &offer.thumbnail,
                max_len: THUMBNAIL_MAX_LENGTH,
                required: THUMBNAIL_REQUIRED,
                too_long: THUMBNAIL_TOO_LONG,
                invalid_url: Some(THUMBNAIL_INVALID_URL),
            },
        );
        check_bounded(
            &mut result,
            BoundedField {
                value: &offer.offer_url_template,
                max_len: OFFER_URL_TEMPLATE_MAX_LENGTH,
                required: OFFER_URL_TEMPLATE_REQUIRED,
                too_long: OFFER_URL_TEMPLATE_TOO_LONG,
                invalid_url: Some(OFFER_URL_TEMPLATE_INVALID_URL),
            },
        );
        check_required(&mut result, &offer.provider_name, PROVIDER_NAME_REQUIRED);
        check_required(
            &mut result,
            &offer.external_offer_id,
            EXTERNAL_OFFER_ID_REQUIRED,
        );

        check_platforms(&mut result, &offer.platforms);

        result
    }

    /// Validate every offer, keyed by its position in `offers`.
    ///
    /// Always returns one entry per input; an invalid record never stops the
    /// remaining ones from being checked.
    pub fn validate_batch(&self, offers: &[Offer]) -> BTreeMap<usize, ValidationResult> {
        offers
            .iter()
            .enumerate()
            .map(|(index, offer)| (index, self.validate(offer)))
            .collect()
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn check_required(result: &mut ValidationResult, value: &str, message: &'static str) {
    if is_blank(value) {
        result.push(message);
    }
}

fn check_bounded(result: &mut ValidationResult, field: BoundedField<'_>) {
    if is_blank(field.value) {
        result.push(field.required);
    } else if field.value.chars().count() > field.max_len {
        result.push(field.too_long);
    } else if let Some(message) = field.invalid_url
        && !is_valid_url(field.value)
    {
        result.push(message);
    }
}

fn check_platforms(result: &mut ValidationResult, platforms: &PlatformFlags) {
    if !platforms.any_enabled() {
        result.push(PLATFORM_REQUIRED);
    }

    let valid = [PlatformFlags::DISABLED, PlatformFlags::ENABLED];
    if !valid.contains(&platforms.desktop) {
        result.push(IS_DESKTOP_INVALID);
    }
    if !valid.contains(&platforms.android) {
        result.push(IS_ANDROID_INVALID);
    }
    if !valid.contains(&platforms.ios) {
        result.push(IS_IOS_INVALID);
    }
}

fn is_valid_url(value: &str) -> bool {
    url::Url::parse(value).is_ok()
}
