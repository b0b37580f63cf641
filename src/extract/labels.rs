//! Field extraction from Persian label text sitting next to its value.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::models::{Field, FieldMap};
use crate::text::{compact_text, document_text, element_text, find_phones};

static LABEL_CANDIDATES: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div, li, span, p, th, td, dt, strong, b").expect("valid label selector")
});

/// Label synonyms per field, tried in order.
const LABEL_GROUPS: &[(Field, &[&str])] = &[
    (Field::Address, &["آدرس", "نشانی", "محل", "نشانی باشگاه"]),
    (Field::Phones, &["تلفن", "شماره", "تماس", "Phone", "Tel"]),
    (Field::Hours, &["ساعت", "ساعات کار", "ساعت کاری", "زمان فعالیت"]),
    (Field::Website, &["سایت", "وب سایت", "website", "وب‌سایت"]),
    (Field::Instagram, &["اینستاگرام", "Instagram", "IG"]),
    (Field::City, &["شهر", "استان", "منطقه", "محله"]),
];

/// Extract fields by label proximity.
///
/// Phone numbers found anywhere in the page text come first; a labelled
/// phone value only fills in when the page has none.
pub fn parse_labels(document: &Html) -> FieldMap {
    let mut fields = FieldMap::new();

    let mut phones = find_phones(&document_text(document));
    phones.sort();
    phones.dedup();
    fields.fill(Field::Phones, phones.join("|"));

    for (field, synonyms) in LABEL_GROUPS {
        for label in *synonyms {
            let Some(node) = document
                .select(&LABEL_CANDIDATES)
                .find(|el| compact_text(*el).starts_with(label))
            else {
                continue;
            };
            if let Some(value) = labelled_value(node, label) {
                fields.fill(*field, value);
            }
            break;
        }
    }

    fields
}

/// Value for a label element: the next sibling element's text, or failing
/// that the parent's text with the label removed (if anything meaningful is left).
fn labelled_value(node: ElementRef<'_>, label: &str) -> Option<String> {
    if let Some(sibling) = node.next_siblings().find_map(ElementRef::wrap) {
        let value = element_text(sibling);
        if !value.is_empty() {
            return Some(value);
        }
    }

    let parent = node.parent().and_then(ElementRef::wrap)?;
    let value = element_text(parent).replace(label, "").trim().to_string();
    (value.chars().count() > 2).then_some(value)
}
