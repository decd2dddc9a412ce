use rusqlite_migration::{M, Migrations};

pub fn migrations() -> Migrations<'static> {
    Migrations::new(vec![M::up(
        "CREATE TABLE offers (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            external_offer_id   TEXT NOT NULL,
            name                TEXT NOT NULL,
            slug                TEXT NOT NULL UNIQUE,
            description         TEXT NOT NULL,
            requirements        TEXT NOT NULL,
            thumbnail           TEXT NOT NULL,
            offer_url_template  TEXT NOT NULL,
            provider_name       TEXT NOT NULL,
            is_desktop          INTEGER NOT NULL DEFAULT 0,
            is_android          INTEGER NOT NULL DEFAULT 0,
            is_ios              INTEGER NOT NULL DEFAULT 0,
            created_at          INTEGER NOT NULL,
            updated_at          INTEGER NOT NULL
        );

        CREATE INDEX idx_offers_provider_name ON offers(provider_name);
        CREATE INDEX idx_offers_external_id ON offers(provider_name, external_offer_id);",
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_valid() {
        assert!(migrations().validate().is_ok());
    }
}
