// Entity Pattern Library
// Static catalogue of regex rules, grouped per entity category.
// Rules are deliberately permissive: over-matching is acceptable, under-matching
// is not. Overlaps between rules (and across categories) are resolved later by
// the span merger, never here.

use crate::models::EntityCategory;

/// A single detection rule.
pub struct EntityPattern {
    /// Short snake_case identifier used in logs.
    pub name: &'static str,
    pub category: EntityCategory,
    /// Regex string, compiled once at detector construction.
    pub pattern: &'static str,
}

/// The built-in rule catalogue, kept as a static slice so it costs nothing
/// until the detector compiles it. Order within a category matters for the
/// stable ordering of emitted spans; order across categories is fixed but not
/// load-bearing.
pub static PATTERNS: &[EntityPattern] = &[
    // ============ EMAIL_ADDRESS ============
    EntityPattern {
        name: "email_standard",
        category: EntityCategory::EmailAddress,
        pattern: r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
    },
    EntityPattern {
        name: "email_compact",
        category: EntityCategory::EmailAddress,
        pattern: r"\b[A-Za-z0-9]+[._]?[A-Za-z0-9]+@[A-Za-z0-9]+\.[A-Za-z]{2,6}\b",
    },
    // ============ IP_ADDRESS ============
    EntityPattern {
        name: "ipv4_dotted_quad",
        category: EntityCategory::IpAddress,
        pattern: r"\b(?:\d{1,3}\.){3}\d{1,3}\b",
    },
    EntityPattern {
        name: "ipv6_full",
        category: EntityCategory::IpAddress,
        pattern: r"\b(?:[0-9A-Fa-f]{1,4}:){7}[0-9A-Fa-f]{1,4}\b",
    },
    // ============ PHONE_NUMBER ============
    EntityPattern {
        name: "phone_generic",
        category: EntityCategory::PhoneNumber,
        pattern: r"\+?\d{1,4}?[-.\s]?\(?\d{1,4}\)?[-.\s]?\d{1,4}[-.\s]?\d{1,9}",
    },
    EntityPattern {
        name: "phone_us_paren",
        category: EntityCategory::PhoneNumber,
        pattern: r"\(\d{3}\)\s?\d{3}-\d{4}",
    },
    EntityPattern {
        name: "phone_us_dashed",
        category: EntityCategory::PhoneNumber,
        pattern: r"\b\d{3}[-.\s]?\d{3}[-.\s]?\d{4}\b",
    },
    EntityPattern {
        name: "phone_international",
        category: EntityCategory::PhoneNumber,
        pattern: r"\+\d{1,3}\s?\d{1,14}",
    },
    // ============ CREDIT_CARD ============
    EntityPattern {
        name: "card_grouped",
        category: EntityCategory::CreditCard,
        pattern: r"\b(?:\d{4}[-\s]?){3}\d{4}\b",
    },
    EntityPattern {
        name: "card_contiguous",
        category: EntityCategory::CreditCard,
        pattern: r"\b\d{13,19}\b",
    },
    // Brand prefixes: Visa 4xxx, Mastercard 51-55, Discover 6011, Amex 34/37
    EntityPattern {
        name: "card_branded",
        category: EntityCategory::CreditCard,
        pattern: r"\b(?:4\d{3}|5[1-5]\d{2}|6011|3[47]\d{2})[-\s]?\d{4,6}[-\s]?\d{4,5}[-\s]?\d{3,4}\b",
    },
    // ============ DATE_TIME ============
    EntityPattern {
        name: "date_slash",
        category: EntityCategory::DateTime,
        pattern: r"\b\d{1,2}/\d{1,2}/\d{2,4}\b",
    },
    EntityPattern {
        name: "date_dash",
        category: EntityCategory::DateTime,
        pattern: r"\b\d{1,2}-\d{1,2}-\d{2,4}\b",
    },
    EntityPattern {
        name: "time_clock",
        category: EntityCategory::DateTime,
        pattern: r"\b\d{2}:\d{2}(?::\d{2})?\s?(?:AM|PM|am|pm)?\b",
    },
    EntityPattern {
        name: "date_month_name",
        category: EntityCategory::DateTime,
        pattern: r"(?i)\b(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{2,4}\b",
    },
    EntityPattern {
        name: "date_iso_8601",
        category: EntityCategory::DateTime,
        pattern: r"\b\d{4}-\d{2}-\d{2}(?:T\d{2}:\d{2}:\d{2}(?:\.\d{3})?(?:Z|[+-]\d{2}:\d{2})?)?\b",
    },
    EntityPattern {
        name: "date_weekday",
        category: EntityCategory::DateTime,
        pattern: r"(?i)\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday),?\s+(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},?\s+\d{4}\b",
    },
    // ============ URL ============
    EntityPattern {
        name: "url_http",
        category: EntityCategory::Url,
        pattern: r"https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    },
    EntityPattern {
        name: "url_www",
        category: EntityCategory::Url,
        pattern: r"www\.[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    },
    // Bare-domain fallback, intentionally loose
    EntityPattern {
        name: "url_bare_domain",
        category: EntityCategory::Url,
        pattern: r"\b[a-zA-Z0-9][a-zA-Z0-9-]{0,61}[a-zA-Z0-9]?\.[a-zA-Z]{2,}\b",
    },
    // ============ PERSON ============
    EntityPattern {
        name: "person_full_name",
        category: EntityCategory::Person,
        pattern: r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z']+)+\b",
    },
    EntityPattern {
        name: "person_titled",
        category: EntityCategory::Person,
        pattern: r"\b(?:Mr\.|Mrs\.|Ms\.|Dr\.|Prof\.)\s+[A-Z][a-z]+(?:\s+[A-Z][a-z']+)*\b",
    },
    EntityPattern {
        name: "person_initial_surname",
        category: EntityCategory::Person,
        pattern: r"\b[A-Z]\.\s?[A-Z][a-z]+\b",
    },
    // ============ LOCATION ============
    // Closed gazetteer of known place names: exact, case-sensitive, whole-word.
    EntityPattern {
        name: "location_gazetteer",
        category: EntityCategory::Location,
        pattern: r"\b(?:New York|London|Paris|Tokyo|Beijing|Sydney|Berlin|Madrid|Rome|Mumbai|Dubai|Singapore|Toronto|Los Angeles|Chicago|San Francisco|Boston|Seattle|Miami|Dallas|Houston|Philadelphia|Phoenix|San Diego|Atlanta|Denver|Minneapolis|Portland|Austin|Nashville|Las Vegas|Washington|Cardiff|Manchester|Birmingham|Edinburgh|Glasgow|Liverpool|Leeds|Sheffield|Bristol|Leicester|Belfast|Dublin|Cork|Galway|Aberdeen|Newcastle|Brighton|Oxford|Cambridge)\b",
    },
    EntityPattern {
        name: "location_street_address",
        category: EntityCategory::Location,
        pattern: r"\b\d+\s+[A-Z][a-z]+\s+(?:Street|St|Avenue|Ave|Road|Rd|Boulevard|Blvd|Drive|Dr|Lane|Ln|Court|Ct)\b",
    },
    EntityPattern {
        name: "location_city_state",
        category: EntityCategory::Location,
        pattern: r"\b[A-Z][a-z]+,\s+[A-Z]{2}\b",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        for pat in PATTERNS {
            regex::Regex::new(pat.pattern)
                .unwrap_or_else(|e| panic!("pattern '{}' failed to compile: {e}", pat.name));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for pat in PATTERNS {
            assert!(seen.insert(pat.name), "duplicate pattern name: {}", pat.name);
        }
    }

    #[test]
    fn every_category_has_rules() {
        for category in EntityCategory::ALL {
            assert!(
                PATTERNS.iter().any(|p| p.category == category),
                "no rules for category {category}"
            );
        }
    }
}
