//! Phone canonicalization and city inference.

use crate::text::find_phones;

/// Known cities, scanned in this order. The first one found in an address wins.
pub const CITY_LIST: &[&str] = &[
    "تهران",
    "کرج",
    "مشهد",
    "اصفهان",
    "شیراز",
    "تبریز",
    "قم",
    "رشت",
    "اهواز",
    "کرمان",
    "یزد",
    "قزوین",
    "ارومیه",
    "همدان",
    "کرمانشاه",
    "بندرعباس",
    "سنندج",
    "زنجان",
    "ساری",
    "اراک",
    "گرگان",
    "خرم آباد",
    "بوشهر",
    "نیشابور",
    "اردبیل",
    "کاشان",
];

/// Canonicalize every phone number found in `raw`.
///
/// Matches are deduplicated and sorted before rewriting, so the output does
/// not depend on the order numbers appeared in. Iranian mobiles are rewritten
/// to `+98…`; anything else passes through with its whitespace removed.
#[must_use]
pub fn normalize_phones(raw: &str) -> String {
    let mut numbers = find_phones(raw);
    numbers.sort();
    numbers.dedup();

    numbers
        .iter()
        .map(|n| canonical_phone(&n.split_whitespace().collect::<String>()))
        .collect::<Vec<_>>()
        .join("|")
}

fn canonical_phone(n: &str) -> String {
    if n.starts_with("+98") {
        n.to_string()
    } else if let Some(rest) = n.strip_prefix("0098") {
        format!("+98{rest}")
    } else if n.len() == 11 && n.starts_with("09") {
        format!("+98{}", &n[1..])
    } else {
        n.to_string()
    }
}

/// First entry of [`CITY_LIST`] that occurs anywhere in `address`.
#[must_use]
pub fn guess_city(address: &str) -> String {
    if address.is_empty() {
        return String::new();
    }
    CITY_LIST
        .iter()
        .find(|city| address.contains(*city))
        .map_or_else(String::new, |city| (*city).to_string())
}
