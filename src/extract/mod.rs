//! Detail-page extraction.
//!
//! Every pass returns a partial [`FieldMap`]; the maps are merged in priority
//! order so an earlier pass is never overwritten by a later one:
//!
//! 1. page title (configured selectors, then `og:title`)
//! 2. JSON-LD structured metadata
//! 3. label heuristics
//! 4. specialized extractors (manager, instagram, images, map links)
//! 5. session / description classification
//!
//! Normalization (phones, city) and cover selection run on the merged result.

pub mod fields;
pub mod jsonld;
pub mod labels;
pub mod sessions;

use std::sync::LazyLock;

use anyhow::{Result, anyhow};
use scraper::{Html, Selector};
use tracing::debug;

use crate::models::{Field, FieldMap, Record};
use crate::normalize::{guess_city, normalize_phones, select_cover};
use crate::text::element_text;

use fields::{
    extract_gender_flags, extract_images, extract_instagram, extract_manager, extract_map_links,
};
use jsonld::parse_jsonld;
use labels::parse_labels;
use sessions::extract_sessions;

static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[property="og:title"]"#).expect("valid og:title selector")
});

/// Parse a comma-separated selector list, one [`Selector`] per entry, in order.
///
/// # Errors
/// Returns an error naming the first entry that is not valid CSS.
pub fn parse_selector_list(list: &str) -> Result<Vec<Selector>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Selector::parse(s).map_err(|e| anyhow!("Failed to parse selector '{s}': {e:?}")))
        .collect()
}

/// Turns a rendered detail page into a [`Record`].
pub struct DetailExtractor {
    title_selectors: Vec<Selector>,
}

impl DetailExtractor {
    pub fn new(title_selectors: Vec<Selector>) -> Self {
        Self { title_selectors }
    }

    /// Fill the empty fields of `record` from the detail page `html`.
    ///
    /// `base_url` resolves relative image links. `record` arrives seeded with
    /// its details URL and list-page thumbnail; its `error` is left alone.
    pub fn extract(&self, html: &str, base_url: &str, mut record: Record) -> Record {
        let document = Html::parse_document(html);

        let images = extract_images(&document, base_url);
        let merged = FieldMap::coalesce_all([
            self.title_fields(&document),
            parse_jsonld(&document),
            parse_labels(&document),
            specialized_fields(&document, &images),
            extract_sessions(&document).into_fields(),
        ]);
        debug!(
            "Merged {} fields for {:?} from {}",
            merged.len(),
            merged.get(Field::Name).unwrap_or_default(),
            base_url
        );
        record.absorb(&merged);

        let flags = extract_gender_flags(&document);
        record.has_male = Some(flags.has_male);
        record.has_female = Some(flags.has_female);

        if !record.phones.is_empty() {
            record.phones = normalize_phones(&record.phones);
        }
        if record.city.is_empty() {
            record.city = guess_city(&record.address);
        }
        record.cover_image = select_cover(&images, &record.thumbnail);

        record
    }

    /// The first configured title selector that matches decides the name; an
    /// empty match falls through to `og:title` rather than to later selectors.
    fn title_fields(&self, document: &Html) -> FieldMap {
        let mut fields = FieldMap::new();

        if let Some(title) = self
            .title_selectors
            .iter()
            .find_map(|sel| document.select(sel).next())
        {
            fields.fill(Field::Name, element_text(title));
        }
        if !fields.contains(Field::Name)
            && let Some(content) = document
                .select(&OG_TITLE)
                .next()
                .and_then(|m| m.value().attr("content"))
        {
            fields.fill(Field::Name, content.trim());
        }

        fields
    }
}

fn specialized_fields(document: &Html, images: &[String]) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.fill(Field::Manager, extract_manager(document));
    fields.fill(Field::Instagram, extract_instagram(document));
    fields.fill(Field::Images, images.join("|"));
    fields.fill(Field::MapLinks, extract_map_links(document).join("|"));
    fields
}
