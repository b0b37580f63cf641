//! Data models for gym records and the partial field maps extractors produce

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// A card link discovered on a list page, with the first thumbnail seen for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEntry {
    pub url: String,
    pub thumbnail: String,
}

impl LinkEntry {
    pub fn new(url: impl Into<String>, thumbnail: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            thumbnail: thumbnail.into(),
        }
    }
}

/// Text fields an extractor may contribute to a [`Record`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    City,
    Address,
    Phones,
    Instagram,
    Website,
    Hours,
    Manager,
    MaleSession,
    FemaleSession,
    Description,
    Images,
    MapLinks,
}

/// Partial set of field values produced by a single extraction pass.
///
/// Values are only ever added, never replaced: [`FieldMap::fill`] ignores
/// empty values and fields that already hold one, and [`FieldMap::coalesce`]
/// keeps `self`'s values over `other`'s. Merging passes in priority order
/// therefore keeps the first non-empty value per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(BTreeMap<Field, String>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `field` unless the field is already set or the
    /// value is blank. Returns whether the value was stored.
    pub fn fill(&mut self, field: Field, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.trim().is_empty() || self.0.contains_key(&field) {
            return false;
        }
        self.0.insert(field, value);
        true
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge a lower-priority map into this one.
    #[must_use]
    pub fn coalesce(mut self, other: FieldMap) -> FieldMap {
        for (field, value) in other.0 {
            self.fill(field, value);
        }
        self
    }

    /// Merge maps given in priority order, highest first.
    pub fn coalesce_all(maps: impl IntoIterator<Item = FieldMap>) -> FieldMap {
        maps.into_iter().fold(FieldMap::new(), FieldMap::coalesce)
    }
}

/// One output row per unique gym detail page.
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub city: String,
    pub address: String,
    pub phones: String,
    pub instagram: String,
    pub website: String,
    pub hours: String,
    pub manager: String,
    /// `None` until a detail page was extracted; rendered as an empty cell
    #[serde(serialize_with = "as_flag")]
    pub has_male: Option<bool>,
    #[serde(serialize_with = "as_flag")]
    pub has_female: Option<bool>,
    pub male_session: String,
    pub female_session: String,
    pub description: String,
    pub thumbnail: String,
    pub cover_image: String,
    pub images: String,
    pub map_links: String,
    pub details_url: String,
    pub error: String,
}

/// Column names in output order.
pub const COLUMNS: [&str; 19] = [
    "name",
    "city",
    "address",
    "phones",
    "instagram",
    "website",
    "hours",
    "manager",
    "has_male",
    "has_female",
    "male_session",
    "female_session",
    "description",
    "thumbnail",
    "cover_image",
    "images",
    "map_links",
    "details_url",
    "error",
];

impl Record {
    /// Empty record seeded from a list-page link.
    pub fn seeded(link: &LinkEntry) -> Self {
        Self {
            details_url: link.url.clone(),
            thumbnail: link.thumbnail.clone(),
            ..Self::default()
        }
    }

    /// Copy merged field values into the still-empty text fields.
    pub fn absorb(&mut self, fields: &FieldMap) {
        for (field, value) in &fields.0 {
            let slot = match field {
                Field::Name => &mut self.name,
                Field::City => &mut self.city,
                Field::Address => &mut self.address,
                Field::Phones => &mut self.phones,
                Field::Instagram => &mut self.instagram,
                Field::Website => &mut self.website,
                Field::Hours => &mut self.hours,
                Field::Manager => &mut self.manager,
                Field::MaleSession => &mut self.male_session,
                Field::FemaleSession => &mut self.female_session,
                Field::Description => &mut self.description,
                Field::Images => &mut self.images,
                Field::MapLinks => &mut self.map_links,
            };
            if slot.is_empty() {
                slot.clone_from(value);
            }
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref, clippy::ref_option)]
fn as_flag<S: Serializer>(flag: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
    match flag {
        Some(set) => serializer.serialize_u8(u8::from(*set)),
        None => serializer.serialize_str(""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_keeps_first_value() {
        let mut map = FieldMap::new();
        assert!(map.fill(Field::Address, "تهران، خیابان ولیعصر"));
        assert!(!map.fill(Field::Address, "آدرس دیگر"));
        assert_eq!(map.get(Field::Address), Some("تهران، خیابان ولیعصر"));
    }

    #[test]
    fn fill_ignores_blank_values() {
        let mut map = FieldMap::new();
        assert!(!map.fill(Field::Name, "   "));
        assert!(!map.contains(Field::Name));
        assert!(map.fill(Field::Name, "باشگاه"));
    }

    #[test]
    fn coalesce_prefers_higher_priority() {
        let mut structured = FieldMap::new();
        structured.fill(Field::Address, "structured");
        let mut labels = FieldMap::new();
        labels.fill(Field::Address, "label");
        labels.fill(Field::Hours, "8-22");

        let merged = FieldMap::coalesce_all([structured, labels]);
        assert_eq!(merged.get(Field::Address), Some("structured"));
        assert_eq!(merged.get(Field::Hours), Some("8-22"));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn absorb_does_not_overwrite() {
        let link = LinkEntry::new("https://gym.example/g/1", "https://cdn.example/t.jpg");
        let mut record = Record::seeded(&link);
        record.name = "از عنوان".to_string();

        let mut fields = FieldMap::new();
        fields.fill(Field::Name, "از متادیتا");
        fields.fill(Field::Website, "https://gym.example");
        record.absorb(&fields);

        assert_eq!(record.name, "از عنوان");
        assert_eq!(record.website, "https://gym.example");
        assert_eq!(record.details_url, "https://gym.example/g/1");
        assert_eq!(record.thumbnail, "https://cdn.example/t.jpg");
    }

    #[test]
    fn seeded_record_has_no_gender_flags() {
        let record = Record::seeded(&LinkEntry::new("https://gym.example/g/1", ""));
        assert_eq!(record.has_male, None);
        assert_eq!(record.has_female, None);
    }
}
