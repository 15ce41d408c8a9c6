//! # GS1 Prefix Table
//!
//! Static mapping of GS1 numeric prefix ranges to issuing country.
//!
//! ## Lookup Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Prefix Matching Rules                              │
//! │                                                                         │
//! │  Barcode: 4006381333931                                                │
//! │  Prefix candidate: "400" (leading 3 digits)                            │
//! │                                                                         │
//! │  Single entry  ("45")     → candidate starts_with("45")?               │
//! │  Range entry   ("40"-"44")→ leading 2 digits as int in 40..=44?        │
//! │                             (range width = digit length of its bounds) │
//! │                                                                         │
//! │  Entries are walked IN DECLARATION ORDER and the first match wins.     │
//! │  Order matters: "0" (USA and Canada) is declared before every          │
//! │  three-digit entry that also begins with 0, so "00000000" resolves     │
//! │  to USA and Canada, never to a later overlapping entry.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The table itself is `&'static` data loaded into the binary at compile
//! time. There is no registration or mutation API: GS1 country prefixes are
//! process-wide read-only facts.

// =============================================================================
// Prefix Entry
// =============================================================================

/// One row of the GS1 prefix table.
///
/// `end == None` means the entry is a plain prefix matched with
/// `starts_with`. `end == Some(..)` means a numeric range; the range is
/// evaluated at the digit length of its bounds (see module docs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixEntry {
    /// Start of the range, or the whole prefix for single entries.
    pub start: &'static str,
    /// Inclusive end of the range (same digit length as `start`), if any.
    pub end: Option<&'static str>,
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: &'static str,
    /// Human-readable country name.
    pub country_name: &'static str,
}

impl PrefixEntry {
    const fn single(
        start: &'static str,
        country_code: &'static str,
        country_name: &'static str,
    ) -> Self {
        PrefixEntry {
            start,
            end: None,
            country_code,
            country_name,
        }
    }

    const fn range(
        start: &'static str,
        end: &'static str,
        country_code: &'static str,
        country_name: &'static str,
    ) -> Self {
        PrefixEntry {
            start,
            end: Some(end),
            country_code,
            country_name,
        }
    }

    /// Tests whether this entry matches the given prefix candidate.
    ///
    /// `candidate` is the leading 3 digits of an already length-checked
    /// barcode, so it is always pure ASCII digits.
    pub fn matches(&self, candidate: &str) -> bool {
        match self.end {
            Some(end) => {
                // Compare the candidate at the range's own digit width.
                let width = self.start.len();
                let Some(head) = candidate.get(..width) else {
                    return false;
                };
                match (
                    head.parse::<u32>(),
                    self.start.parse::<u32>(),
                    end.parse::<u32>(),
                ) {
                    (Ok(value), Ok(lo), Ok(hi)) => lo <= value && value <= hi,
                    _ => false,
                }
            }
            None => candidate.starts_with(self.start),
        }
    }
}

/// Looks up the first table entry matching the prefix candidate.
///
/// Walks `table` in declaration order and stops at the first hit. With the
/// built-in [`GS1_PREFIXES`] no two entries should both match a real
/// barcode, but if they do the earlier declaration wins by construction.
pub fn lookup<'t>(table: &'t [PrefixEntry], candidate: &str) -> Option<&'t PrefixEntry> {
    table.iter().find(|entry| entry.matches(candidate))
}

// =============================================================================
// The GS1 Table
// =============================================================================

/// GS1 country prefixes, in canonical declaration order.
///
/// Source: GS1 company prefix allocations. Declaration order is significant
/// and must not be reordered (see module docs).
pub const GS1_PREFIXES: &[PrefixEntry] = &[
    PrefixEntry::single("0", "US", "USA and Canada"),
    PrefixEntry::single("1", "US", "USA"),
    PrefixEntry::range("30", "37", "FR", "France and Monaco"),
    PrefixEntry::single("380", "BG", "Bulgaria"),
    PrefixEntry::single("383", "SI", "Slovenia"),
    PrefixEntry::single("385", "HR", "Croatia"),
    PrefixEntry::single("387", "BA", "Bosnia and Herzegovina"),
    PrefixEntry::single("389", "ME", "Montenegro"),
    PrefixEntry::range("40", "44", "DE", "Germany"),
    PrefixEntry::single("45", "JP", "Japan"),
    PrefixEntry::single("46", "RU", "Russia"),
    PrefixEntry::single("470", "KG", "Kyrgyzstan"),
    PrefixEntry::single("471", "TW", "Taiwan"),
    PrefixEntry::single("474", "EE", "Estonia"),
    PrefixEntry::single("475", "LV", "Latvia"),
    PrefixEntry::single("476", "AZ", "Azerbaijan"),
    PrefixEntry::single("477", "LT", "Lithuania"),
    PrefixEntry::single("478", "UZ", "Uzbekistan"),
    PrefixEntry::single("479", "LK", "Sri Lanka"),
    PrefixEntry::single("480", "PH", "Philippines"),
    PrefixEntry::single("481", "BY", "Belarus"),
    PrefixEntry::single("482", "UA", "Ukraine"),
    PrefixEntry::single("483", "TM", "Turkmenistan"),
    PrefixEntry::single("484", "MD", "Moldova"),
    PrefixEntry::single("485", "AM", "Armenia"),
    PrefixEntry::single("486", "GE", "Georgia"),
    PrefixEntry::single("487", "KZ", "Kazakhstan"),
    PrefixEntry::single("488", "TJ", "Tajikistan"),
    PrefixEntry::single("489", "HK", "Hong Kong"),
    PrefixEntry::single("49", "JP", "Japan"),
    PrefixEntry::single("50", "GB", "United Kingdom"),
    PrefixEntry::range("520", "521", "GR", "Greece"),
    PrefixEntry::single("528", "LB", "Lebanon"),
    PrefixEntry::single("529", "CY", "Cyprus"),
    PrefixEntry::single("530", "AL", "Albania"),
    PrefixEntry::single("531", "MK", "North Macedonia"),
    PrefixEntry::single("535", "MT", "Malta"),
    PrefixEntry::single("539", "IE", "Ireland"),
    PrefixEntry::single("54", "BE", "Belgium and Luxembourg"),
    PrefixEntry::single("560", "PT", "Portugal"),
    PrefixEntry::single("569", "IS", "Iceland"),
    PrefixEntry::single("57", "DK", "Denmark"),
    PrefixEntry::single("590", "PL", "Poland"),
    PrefixEntry::single("594", "RO", "Romania"),
    PrefixEntry::single("599", "HU", "Hungary"),
    PrefixEntry::range("600", "601", "ZA", "South Africa"),
    PrefixEntry::single("603", "GH", "Ghana"),
    PrefixEntry::single("604", "SN", "Senegal"),
    PrefixEntry::single("608", "BH", "Bahrain"),
    PrefixEntry::single("609", "MU", "Mauritius"),
    PrefixEntry::single("611", "MA", "Morocco"),
    PrefixEntry::single("613", "DZ", "Algeria"),
    PrefixEntry::single("615", "NG", "Nigeria"),
    PrefixEntry::single("616", "KE", "Kenya"),
    PrefixEntry::single("618", "CI", "Côte d'Ivoire"),
    PrefixEntry::single("619", "TN", "Tunisia"),
    PrefixEntry::single("620", "TZ", "Tanzania"),
    PrefixEntry::single("621", "SY", "Syria"),
    PrefixEntry::single("622", "EG", "Egypt"),
    PrefixEntry::single("623", "BN", "Brunei"),
    PrefixEntry::single("624", "LY", "Libya"),
    PrefixEntry::single("625", "JO", "Jordan"),
    PrefixEntry::single("626", "IR", "Iran"),
    PrefixEntry::single("627", "KW", "Kuwait"),
    PrefixEntry::single("628", "SA", "Saudi Arabia"),
    PrefixEntry::single("629", "AE", "United Arab Emirates"),
    PrefixEntry::single("630", "QA", "Qatar"),
    PrefixEntry::single("64", "FI", "Finland"),
    PrefixEntry::single("69", "CN", "China"),
    PrefixEntry::single("70", "NO", "Norway"),
    PrefixEntry::single("729", "IL", "Israel"),
    PrefixEntry::single("73", "SE", "Sweden"),
    PrefixEntry::single("740", "GT", "Guatemala"),
    PrefixEntry::single("741", "SV", "El Salvador"),
    PrefixEntry::single("742", "HN", "Honduras"),
    PrefixEntry::single("743", "NI", "Nicaragua"),
    PrefixEntry::single("744", "CR", "Costa Rica"),
    PrefixEntry::single("745", "PA", "Panama"),
    PrefixEntry::single("746", "DO", "Dominican Republic"),
    PrefixEntry::single("750", "MX", "Mexico"),
    PrefixEntry::range("754", "755", "CA", "Canada"),
    PrefixEntry::single("759", "VE", "Venezuela"),
    PrefixEntry::single("76", "CH", "Switzerland and Liechtenstein"),
    PrefixEntry::range("770", "771", "CO", "Colombia"),
    PrefixEntry::single("773", "UY", "Uruguay"),
    PrefixEntry::single("775", "PE", "Peru"),
    PrefixEntry::single("777", "BO", "Bolivia"),
    PrefixEntry::range("778", "779", "AR", "Argentina"),
    PrefixEntry::single("780", "CL", "Chile"),
    PrefixEntry::single("784", "PY", "Paraguay"),
    PrefixEntry::single("786", "EC", "Ecuador"),
    PrefixEntry::range("789", "790", "BR", "Brazil"),
    PrefixEntry::range("80", "83", "IT", "Italy, San Marino, and Vatican City"),
    PrefixEntry::single("84", "ES", "Spain and Andorra"),
    PrefixEntry::single("850", "CU", "Cuba"),
    PrefixEntry::single("858", "SK", "Slovakia"),
    PrefixEntry::single("859", "CZ", "Czech Republic"),
    PrefixEntry::single("860", "RS", "Serbia"),
    PrefixEntry::single("865", "MN", "Mongolia"),
    PrefixEntry::single("867", "KP", "North Korea"),
    PrefixEntry::range("868", "869", "TR", "Turkey"),
    PrefixEntry::single("87", "NL", "Netherlands"),
    PrefixEntry::single("880", "KR", "South Korea"),
    PrefixEntry::single("883", "MM", "Myanmar"),
    PrefixEntry::single("884", "KH", "Cambodia"),
    PrefixEntry::single("885", "TH", "Thailand"),
    PrefixEntry::single("888", "SG", "Singapore"),
    PrefixEntry::single("890", "IN", "India"),
    PrefixEntry::single("893", "VN", "Vietnam"),
    PrefixEntry::single("894", "BD", "Bangladesh"),
    PrefixEntry::single("896", "PK", "Pakistan"),
    PrefixEntry::single("899", "ID", "Indonesia"),
    PrefixEntry::range("90", "91", "AT", "Austria"),
    PrefixEntry::single("93", "AU", "Australia"),
    PrefixEntry::single("94", "NZ", "New Zealand"),
    PrefixEntry::single("955", "MY", "Malaysia"),
    PrefixEntry::single("958", "MO", "Macau"),
];

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_entry_matches_by_starts_with() {
        let entry = PrefixEntry::single("45", "JP", "Japan");
        assert!(entry.matches("450"));
        assert!(entry.matches("459"));
        assert!(!entry.matches("460"));
    }

    #[test]
    fn test_range_entry_matches_at_its_own_width() {
        let entry = PrefixEntry::range("40", "44", "DE", "Germany");
        // "400" is inside 40..=44 when compared at width 2.
        assert!(entry.matches("400"));
        assert!(entry.matches("449"));
        assert!(!entry.matches("450"));
        assert!(!entry.matches("399"));
    }

    #[test]
    fn test_three_digit_range() {
        let entry = PrefixEntry::range("520", "521", "GR", "Greece");
        assert!(entry.matches("520"));
        assert!(entry.matches("521"));
        assert!(!entry.matches("522"));
    }

    #[test]
    fn test_lookup_first_match_wins() {
        // Crafted ambiguous table: a broad single-digit entry declared
        // before a narrower three-digit entry that also matches.
        let table = [
            PrefixEntry::single("6", "XX", "First"),
            PrefixEntry::single("690", "CN", "Second"),
        ];
        let hit = lookup(&table, "690").unwrap();
        assert_eq!(hit.country_code, "XX");

        // Reversed declaration order flips the winner.
        let table = [
            PrefixEntry::single("690", "CN", "First"),
            PrefixEntry::single("6", "XX", "Second"),
        ];
        let hit = lookup(&table, "690").unwrap();
        assert_eq!(hit.country_code, "CN");
    }

    #[test]
    fn test_builtin_table_spot_checks() {
        assert_eq!(lookup(GS1_PREFIXES, "000").unwrap().country_code, "US");
        assert_eq!(lookup(GS1_PREFIXES, "400").unwrap().country_code, "DE");
        assert_eq!(lookup(GS1_PREFIXES, "690").unwrap().country_code, "CN");
        assert_eq!(lookup(GS1_PREFIXES, "890").unwrap().country_code, "IN");
        assert_eq!(lookup(GS1_PREFIXES, "958").unwrap().country_code, "MO");
        assert!(lookup(GS1_PREFIXES, "999").is_none());
    }

    #[test]
    fn test_builtin_table_declaration_order_preserved() {
        // "0" must come first so that "000" resolves to USA and Canada
        // rather than any later entry.
        assert_eq!(GS1_PREFIXES[0].start, "0");
        assert_eq!(GS1_PREFIXES[0].country_name, "USA and Canada");
        assert_eq!(GS1_PREFIXES[1].start, "1");
    }
}
