use std::time::{SystemTime, UNIX_EPOCH};

use offer_sync::StoredOffer;

const MAX_NAME_WIDTH: usize = 35;
const LINE_BUDGET: usize = 90;

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;

pub fn print_offer_table(offers: &[StoredOffer]) {
    if offers.is_empty() {
        return;
    }

    let groups = group_by_provider(offers);
    let mut first = true;

    for (provider, entries) in &groups {
        if !first {
            println!();
        }
        first = false;

        let name_width = entries
            .iter()
            .map(|o| o.name.chars().count())
            .max()
            .unwrap_or(0)
            .min(MAX_NAME_WIDTH);

        let slug_budget = LINE_BUDGET.saturating_sub(2 + name_width + 2);

        println!("{provider} ({})", entries.len());

        for entry in entries {
            let name = clip(&entry.name, name_width);
            let slug = clip(&entry.slug, slug_budget);

            println!("  {:<width$}  {}", name, slug, width = name_width);
        }
    }

    println!("\n{} offers", offers.len());
}

/// Groups offers by provider, keeping first-seen provider order.
fn group_by_provider(offers: &[StoredOffer]) -> Vec<(&str, Vec<&StoredOffer>)> {
    let mut groups: Vec<(&str, Vec<&StoredOffer>)> = Vec::new();

    for offer in offers {
        let provider = offer.provider_name.as_str();
        if let Some(group) = groups.iter_mut().find(|(p, _)| *p == provider) {
            group.1.push(offer);
        } else {
            groups.push((provider, vec![offer]));
        }
    }

    groups
}

/// Clip `s` to `width` columns, marking the cut with an ellipsis.
fn clip(s: &str, width: usize) -> String {
    match s.char_indices().nth(width) {
        None => s.to_owned(),
        Some(_) if width == 0 => String::new(),
        Some(_) => {
            let keep = s.char_indices().nth(width - 1).map_or(s.len(), |(i, _)| i);
            format!("{}…", &s[..keep])
        }
    }
}

/// Human-readable age of an epoch-seconds timestamp.
pub fn age(epoch_secs: u64) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    age_at(epoch_secs, now)
}

fn age_at(epoch_secs: u64, now: u64) -> String {
    let elapsed = now.saturating_sub(epoch_secs);

    match elapsed {
        e if e >= SECS_PER_DAY => format!("{} day(s) ago", e / SECS_PER_DAY),
        e if e >= SECS_PER_HOUR => format!("{} hour(s) ago", e / SECS_PER_HOUR),
        _ => "just now".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use offer_sync::test_support::sample_offer;

    use super::*;

    fn stored(id: &str, provider: &str) -> StoredOffer {
        StoredOffer::new(1, &sample_offer(id, provider), 0)
    }

    #[test]
    fn clip_keeps_slugs_that_fit() {
        assert_eq!(clip("sofi-banking", 12), "sofi-banking");
        assert_eq!(clip("sofi-banking", 40), "sofi-banking");
    }

    #[test]
    fn clip_marks_cut_offer_names() {
        assert_eq!(clip("MyGym - iOS Rewards", 8), "MyGym -…");
    }

    #[test]
    fn clip_counts_characters_not_bytes() {
        assert_eq!(clip("Crème brûlée offer", 6), "Crème…");
    }

    #[test]
    fn clip_to_zero_width_is_empty() {
        assert_eq!(clip("offer", 0), "");
    }

    #[test]
    fn groups_keep_first_seen_provider_order() {
        let offers = vec![
            stored("a", "offer2"),
            stored("b", "offer1"),
            stored("c", "offer2"),
        ];

        let groups = group_by_provider(&offers);
        let providers: Vec<&str> = groups.iter().map(|(p, _)| *p).collect();

        assert_eq!(providers, vec!["offer2", "offer1"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 1);
    }

    #[test]
    fn age_buckets() {
        assert_eq!(age_at(1_000, 1_030), "just now");
        assert_eq!(age_at(0, 2 * SECS_PER_HOUR + 5), "2 hour(s) ago");
        assert_eq!(age_at(0, 3 * SECS_PER_DAY), "3 day(s) ago");
    }

    #[test]
    fn age_in_the_future_is_just_now() {
        assert_eq!(age_at(5_000, 1_000), "just now");
    }
}
