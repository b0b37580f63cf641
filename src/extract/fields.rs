//! Single-purpose extractors: manager, instagram, gender flags, map links, images.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use scraper::{Html, Selector};

use crate::normalize::{image_source, is_placeholder};
use crate::text::{element_text, resolve_url};

pub const MAX_IMAGES: usize = 12;
pub const MAX_MAP_LINKS: usize = 5;

const MALE_MARKER: &str = "آقایان";
const FEMALE_MARKER: &str = "بانوان";
const BOTH_SESSIONS_MARKER: &str = "سانس آقایان و سانس بانوان";
const MANAGER_MARKER: &str = "مدیریت";

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("valid built-in selector")
}

static CONTACT_NAME: LazyLock<Selector> = LazyLock::new(|| selector(".detail-contact-name"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static MANAGER_CANDIDATES: LazyLock<Selector> = LazyLock::new(|| selector("div, p, li, span"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IFRAME: LazyLock<Selector> = LazyLock::new(|| selector("iframe[src]"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static TITLED: LazyLock<Selector> = LazyLock::new(|| selector("[title]"));
static OG_IMAGE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:image"]"#));

static MANAGER_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(مدیریت|مدیر)\s*[:：]?\s*").expect("valid manager regex"));

static MAP_RE: LazyLock<Regex> = LazyLock::new(|| {
    let patterns = [
        r"google\.(?:com|co\.\w+)/maps",
        r"goo\.gl/maps",
        r"map\.ir",
        r"neshan\.org",
        r"balad\.ir",
        r"openstreetmap\.org",
        r"yandex\.(?:com|ru)/maps",
        r"maps\.apple\.com",
        r"/maps?/",
        r"maps?\.(?:png|jpg|jpeg|webp)$",
        r"(?:location|marker|pin)\.(?:png|jpg|jpeg|webp)$",
    ];
    RegexBuilder::new(&patterns.join("|"))
        .case_insensitive(true)
        .build()
        .expect("valid map regex")
});

/// Manager name: the second part of a `.detail-contact-name` box, or the
/// text of the first element mentioning management with the marker removed.
pub fn extract_manager(document: &Html) -> String {
    if let Some(contact) = document.select(&CONTACT_NAME).next() {
        let spans: Vec<_> = contact.select(&SPAN).collect();
        if spans.len() >= 2
            && let Some(last) = spans.last()
        {
            return element_text(*last);
        }
    }

    document
        .select(&MANAGER_CANDIDATES)
        .find(|el| el.text().collect::<String>().contains(MANAGER_MARKER))
        .map(|el| {
            MANAGER_PREFIX_RE
                .replace_all(&element_text(el), "")
                .trim()
                .to_string()
        })
        .unwrap_or_default()
}

/// `href` of the first link to instagram.com.
pub fn extract_instagram(document: &Html) -> String {
    document
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.contains("instagram.com"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default()
}

/// Whether the gym runs men's and women's sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenderFlags {
    pub has_male: bool,
    pub has_female: bool,
}

/// Read gender flags from `title` attributes, or from the combined
/// "men's and women's sessions" phrase anywhere in the page text.
pub fn extract_gender_flags(document: &Html) -> GenderFlags {
    let titled = |marker: &str| {
        document
            .select(&TITLED)
            .filter_map(|el| el.value().attr("title"))
            .any(|title| title.contains(marker))
    };

    if document
        .root_element()
        .text()
        .any(|t| t.contains(BOTH_SESSIONS_MARKER))
    {
        return GenderFlags {
            has_male: true,
            has_female: true,
        };
    }

    GenderFlags {
        has_male: titled(MALE_MARKER),
        has_female: titled(FEMALE_MARKER),
    }
}

/// Links and embeds that point at a map, in document order (anchors first).
pub fn extract_map_links(document: &Html) -> Vec<String> {
    let hrefs = document.select(&ANCHOR).filter_map(|a| a.value().attr("href"));
    let srcs = document.select(&IFRAME).filter_map(|f| f.value().attr("src"));

    unique_capped(
        hrefs
            .chain(srcs)
            .filter(|u| MAP_RE.is_match(u))
            .map(|u| u.trim().to_string()),
        MAX_MAP_LINKS,
    )
}

/// Real photos on the page: the `og:image` preview, then every `<img>`.
pub fn extract_images(document: &Html, base_url: &str) -> Vec<String> {
    let preview = document
        .select(&OG_IMAGE)
        .filter_map(|m| m.value().attr("content"))
        .filter(|c| !c.trim().is_empty())
        .take(1);
    let inline = document.select(&IMG).filter_map(image_source);

    unique_capped(
        preview
            .chain(inline)
            .map(|raw| resolve_url(base_url, raw))
            .filter(|u| !is_placeholder(u)),
        MAX_IMAGES,
    )
}

/// First `cap` distinct items, in order.
fn unique_capped(items: impl Iterator<Item = String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    items.filter(|item| seen.insert(item.clone())).take(cap).collect()
}
