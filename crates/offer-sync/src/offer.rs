use std::fmt;

/// Availability of an offer on each supported platform.
///
/// Each flag is stored as a plain integer so that adapters can hand over
/// whatever the vendor sent; the validator is responsible for rejecting
/// values outside `{0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlatformFlags {
    pub desktop: i32,
    pub android: i32,
    pub ios: i32,
}

impl PlatformFlags {
    pub const ENABLED: i32 = 1;
    pub const DISABLED: i32 = 0;

    pub const DESKTOP_ONLY: Self = Self::new(1, 0, 0);
    pub const ANDROID_ONLY: Self = Self::new(0, 1, 0);
    pub const IOS_ONLY: Self = Self::new(0, 0, 1);
    pub const ALL: Self = Self::new(1, 1, 1);

    pub const fn new(desktop: i32, android: i32, ios: i32) -> Self {
        Self {
            desktop,
            android,
            ios,
        }
    }

    /// Build flags from three independent booleans.
    pub fn from_bools(desktop: bool, android: bool, ios: bool) -> Self {
        Self::new(desktop.into(), android.into(), ios.into())
    }

    /// True if any flag is exactly `ENABLED`.
    pub fn any_enabled(&self) -> bool {
        [self.desktop, self.android, self.ios].contains(&Self::ENABLED)
    }

    pub fn as_tuple(&self) -> (i32, i32, i32) {
        (self.desktop, self.android, self.ios)
    }
}

impl fmt::Display for PlatformFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.desktop == Self::ENABLED {
            names.push("desktop");
        }
        if self.android == Self::ENABLED {
            names.push("android");
        }
        if self.ios == Self::ENABLED {
            names.push("ios");
        }
        if names.is_empty() {
            f.write_str("none")
        } else {
            f.write_str(&names.join(", "))
        }
    }
}

/// Provider-agnostic offer record produced by every adapter.
///
/// A fresh `Offer` is built on every sync run; it only outlives the run
/// once it has been persisted as a [`StoredOffer`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Offer {
    pub external_offer_id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub requirements: String,
    pub thumbnail: String,
    pub offer_url_template: String,
    pub provider_name: String,
    pub platforms: PlatformFlags,
}

/// An offer as persisted by an [`OfferRepository`](crate::OfferRepository).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOffer {
    pub id: i64,
    pub external_offer_id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub requirements: String,
    pub thumbnail: String,
    pub offer_url_template: String,
    pub provider_name: String,
    pub platforms: PlatformFlags,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
    /// Seconds since the Unix epoch.
    pub updated_at: u64,
}

impl StoredOffer {
    /// A freshly inserted row.
    pub fn new(id: i64, offer: &Offer, now: u64) -> Self {
        let mut stored = Self {
            id,
            external_offer_id: String::new(),
            name: String::new(),
            slug: String::new(),
            description: String::new(),
            requirements: String::new(),
            thumbnail: String::new(),
            offer_url_template: String::new(),
            provider_name: String::new(),
            platforms: PlatformFlags::default(),
            created_at: now,
            updated_at: now,
        };
        stored.reconcile(offer, now);
        stored
    }

    /// Overwrite every canonical field with the incoming values.
    ///
    /// `id` and `created_at` are kept; `updated_at` moves to `now`. The
    /// destructuring is exhaustive so adding a field to [`Offer`] fails to
    /// compile until it is reconciled here.
    pub fn reconcile(&mut self, incoming: &Offer, now: u64) {
        let Offer {
            external_offer_id,
            name,
            slug,
            description,
            requirements,
            thumbnail,
            offer_url_template,
            provider_name,
            platforms,
        } = incoming;

        self.external_offer_id.clone_from(external_offer_id);
        self.name.clone_from(name);
        self.slug.clone_from(slug);
        self.description.clone_from(description);
        self.requirements.clone_from(requirements);
        self.thumbnail.clone_from(thumbnail);
        self.offer_url_template.clone_from(offer_url_template);
        self.provider_name.clone_from(provider_name);
        self.platforms = *platforms;
        self.updated_at = now;
    }

    /// The canonical record this row currently holds.
    pub fn to_offer(&self) -> Offer {
        Offer {
            external_offer_id: self.external_offer_id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            description: self.description.clone(),
            requirements: self.requirements.clone(),
            thumbnail: self.thumbnail.clone(),
            offer_url_template: self.offer_url_template.clone(),
            provider_name: self.provider_name.clone(),
            platforms: self.platforms,
        }
    }
}
