//! Placeholder filtering and cover-image selection.

use scraper::ElementRef;

/// Lowercase substrings that mark decorative or system assets.
const PLACEHOLDER_MARKERS: &[&str] = &[
    "/img/",
    "sprite",
    "logo",
    "placeholder",
    "blank",
    "promote_icon",
    "default",
    "icon",
    ".svg",
    "map",
    "gallery_lazy_load",
    "gym-no-image",
];

/// True when `url` is empty or points at a logo, icon, blank tile or other
/// asset that is not a genuine photo of the item.
#[must_use]
pub fn is_placeholder(url: &str) -> bool {
    if url.is_empty() {
        return true;
    }
    let lower = url.to_lowercase();
    PLACEHOLDER_MARKERS.iter().any(|m| lower.contains(m))
}

/// Raw source of an `<img>`: `data-src`, then `src`, then the first
/// `srcset` entry. Empty attributes are skipped.
#[must_use]
pub fn image_source<'a>(img: ElementRef<'a>) -> Option<&'a str> {
    let el = img.value();
    let non_empty = |name: &str| el.attr(name).filter(|v| !v.trim().is_empty());

    non_empty("data-src").or_else(|| non_empty("src")).or_else(|| {
        non_empty("srcset")?
            .split(',')
            .next()?
            .split_whitespace()
            .next()
    })
}

/// Pick the cover image: the first collected image if it is a real photo,
/// otherwise the list-page thumbnail if it is, otherwise nothing.
#[must_use]
pub fn select_cover(images: &[String], thumbnail: &str) -> String {
    let first = images.first().map_or("", |s| s.trim());
    let thumbnail = thumbnail.trim();

    if !is_placeholder(first) {
        first.to_string()
    } else if !is_placeholder(thumbnail) {
        thumbnail.to_string()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::*;

    #[test]
    fn rejects_blacklisted_assets() {
        assert!(is_placeholder("https://gym.example/img/logo.png"));
        assert!(is_placeholder("https://cdn.example/Sprite-Sheet.PNG"));
        assert!(is_placeholder("https://cdn.example/a/arrow.svg"));
        assert!(is_placeholder("https://cdn.example/uploads/gym-no-image.jpg"));
        assert!(is_placeholder(""));
    }

    #[test]
    fn accepts_real_photos() {
        assert!(!is_placeholder("https://cdn.example/photos/abc123.jpg"));
    }

    #[test]
    fn image_source_prefers_lazy_attribute() {
        let html = Html::parse_fragment(
            r#"<img data-src="/a.jpg" src="/b.jpg">
               <img src="" srcset="/c-300.jpg 300w, /c-600.jpg 600w">
               <img alt="none">"#,
        );
        let sel = Selector::parse("img").unwrap();
        let sources: Vec<_> = html.select(&sel).map(image_source).collect();
        assert_eq!(sources, vec![Some("/a.jpg"), Some("/c-300.jpg"), None]);
    }

    #[test]
    fn cover_prefers_first_image() {
        let images = vec!["https://a/1.jpg".to_string()];
        assert_eq!(select_cover(&images, "https://b/2.jpg"), "https://a/1.jpg");
    }

    #[test]
    fn cover_falls_back_to_thumbnail() {
        assert_eq!(select_cover(&[], "https://b/2.jpg"), "https://b/2.jpg");
        let logo_only = vec!["https://a/logo.png".to_string()];
        assert_eq!(select_cover(&logo_only, "https://b/2.jpg"), "https://b/2.jpg");
    }

    #[test]
    fn cover_is_empty_without_candidates() {
        assert_eq!(select_cover(&[], ""), "");
        assert_eq!(select_cover(&[], "https://b/default.jpg"), "");
    }
}
