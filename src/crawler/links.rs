//! Card link and thumbnail collection for a single list page

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::LinkEntry;
use crate::normalize::{image_source, is_placeholder};
use crate::text::resolve_url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));
static IMG: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid img selector"));
static BG_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"url\(["']?(?P<u>[^"')]+)["']?\)"#).expect("valid background url regex")
});

/// Extract one `(url, thumbnail)` pair per card that contains a link.
///
/// Cards are gathered selector by selector, in the order given. The result is
/// deduplicated by URL, keeping the first occurrence.
pub fn collect_list_links(document: &Html, base_url: &str, cards: &[Selector]) -> Vec<LinkEntry> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for card in cards.iter().flat_map(|sel| document.select(sel)) {
        let Some(href) = card.select(&ANCHOR).next().and_then(|a| a.value().attr("href")) else {
            continue;
        };
        let url = resolve_url(base_url, href);
        if seen.insert(url.clone()) {
            let thumbnail = card_thumbnail(card, base_url).unwrap_or_default();
            links.push(LinkEntry::new(url, thumbnail));
        }
    }

    links
}

/// Thumbnail for a card: its first `<img>`, then a `data-bg` style attribute,
/// then an inline `background-image`. Placeholder hits count as absent.
fn card_thumbnail(card: ElementRef<'_>, base_url: &str) -> Option<String> {
    let accept = |raw: &str| {
        let url = resolve_url(base_url, raw);
        (!is_placeholder(&url)).then_some(url)
    };

    let from_img = card.select(&IMG).next().and_then(image_source).and_then(accept);
    if from_img.is_some() {
        return from_img;
    }

    let el = card.value();
    let from_data = el
        .attr("data-bg")
        .filter(|v| !v.trim().is_empty())
        .or_else(|| el.attr("data-background-image"))
        .filter(|v| !v.trim().is_empty())
        .and_then(accept);
    if from_data.is_some() {
        return from_data;
    }

    el.attr("style")
        .and_then(|style| BG_URL_RE.captures(style))
        .and_then(|caps| caps.name("u"))
        .and_then(|m| accept(m.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://gym.example/gyms?page=1";

    fn selectors(list: &str) -> Vec<Selector> {
        list.split(',').map(|s| Selector::parse(s.trim()).unwrap()).collect()
    }

    fn collect(html: &str, cards: &str) -> Vec<LinkEntry> {
        collect_list_links(&Html::parse_document(html), BASE, &selectors(cards))
    }

    #[test]
    fn resolves_links_and_image_thumbnails() {
        let links = collect(
            r#"<div class="card"><a href="/g/1"><img data-src="/photos/1.jpg"></a></div>
               <div class="card"><a href="https://gym.example/g/2">دو</a></div>"#,
            ".card",
        );
        assert_eq!(
            links,
            vec![
                LinkEntry::new("https://gym.example/g/1", "https://gym.example/photos/1.jpg"),
                LinkEntry::new("https://gym.example/g/2", ""),
            ]
        );
    }

    #[test]
    fn falls_back_to_data_bg_then_inline_style() {
        let links = collect(
            r#"<div class="card" data-bg="/photos/bg.jpg"><a href="/g/1">x</a>
                 <img src="/img/logo.png"></div>
               <div class="card" style="background-image:url('/photos/st.webp')"><a href="/g/2">y</a></div>"#,
            ".card",
        );
        assert_eq!(links[0].thumbnail, "https://gym.example/photos/bg.jpg");
        assert_eq!(links[1].thumbnail, "https://gym.example/photos/st.webp");
    }

    #[test]
    fn placeholder_thumbnails_are_dropped() {
        let links = collect(
            r#"<div class="card" style="background-image:url(/uploads/gym-no-image.png)">
                 <a href="/g/1"><img src="/assets/placeholder.jpg"></a></div>"#,
            ".card",
        );
        assert_eq!(links, vec![LinkEntry::new("https://gym.example/g/1", "")]);
    }

    #[test]
    fn cards_without_anchor_are_skipped() {
        let links = collect(
            r#"<div class="card"><span>no link</span></div>
               <div class="card"><a>no href</a></div>
               <div class="card"><a href="/g/3">ok</a></div>"#,
            ".card",
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://gym.example/g/3");
    }

    #[test]
    fn duplicates_across_selectors_keep_first_thumbnail() {
        let links = collect(
            r#"<article class="gym-card card-simple"><a href="/g/1"><img src="/photos/a.jpg"></a></article>
               <div class="card-simple"><a href="/g/1"><img src="/photos/b.jpg"></a></div>"#,
            "article.gym-card, .card-simple",
        );
        assert_eq!(
            links,
            vec![LinkEntry::new("https://gym.example/g/1", "https://gym.example/photos/a.jpg")]
        );
    }
}
