//! Splits a gym's description into men's sessions, women's sessions and
//! general description text.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::models::{Field, FieldMap};
use crate::text::element_text;

static DESCRIPTION_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#gym-descriptions").expect("valid container selector"));
static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h3, h2, h4, blockquote").expect("valid paragraph selector")
});

const MALE_SESSION: &str = "سانس آقایان";
const FEMALE_SESSION: &str = "سانس بانوان";
const HOURS_PREFIX: &str = "ساعت کاری";
const MEN: &str = "آقایان";
const WOMEN: &str = "بانوان";

/// Lines mentioning any of these are address fragments, not session or description text.
const ADDRESS_KEYWORDS: &[&str] = &["آدرس", "تهران", "خیابان", "میدان", "کوچه", "پلاک"];

const MAX_LINES: usize = 6;

/// Which bucket subsequent lines belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Section {
    #[default]
    Description,
    Male,
    Female,
}

impl Section {
    /// The section a heading line switches to, if it is a heading at all.
    fn switched_by(line: &str) -> Option<Self> {
        let hours_for = |who: &str| line.starts_with(HOURS_PREFIX) && line.contains(who);

        if line.contains(MALE_SESSION) || hours_for(MEN) {
            Some(Self::Male)
        } else if line.contains(FEMALE_SESSION) || hours_for(WOMEN) {
            Some(Self::Female)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sessions {
    pub male_session: String,
    pub female_session: String,
    pub description: String,
}

impl Sessions {
    pub fn into_fields(self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.fill(Field::MaleSession, self.male_session);
        fields.fill(Field::FemaleSession, self.female_session);
        fields.fill(Field::Description, self.description);
        fields
    }
}

/// Classify the paragraph-like lines of the description tab, or of the whole
/// page when the tab is missing.
pub fn extract_sessions(document: &Html) -> Sessions {
    let scope = document
        .select(&DESCRIPTION_CONTAINER)
        .next()
        .unwrap_or_else(|| document.root_element());

    let lines = scope
        .select(&PARAGRAPHS)
        .map(|el| element_text(el).replace('\u{a0}', " ").trim().to_string())
        .filter(|line| !line.is_empty());

    classify_lines(lines)
}

/// Run the heading state machine over `lines`.
///
/// Heading lines only switch state and are not kept. Address-like lines are
/// dropped whatever the state. Each bucket keeps its first six lines.
pub fn classify_lines<I, S>(lines: I) -> Sessions
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut section = Section::default();
    let mut male = Vec::new();
    let mut female = Vec::new();
    let mut description = Vec::new();

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        if let Some(next) = Section::switched_by(line) {
            section = next;
            continue;
        }
        if ADDRESS_KEYWORDS.iter().any(|k| line.contains(k)) {
            continue;
        }
        let bucket = match section {
            Section::Description => &mut description,
            Section::Male => &mut male,
            Section::Female => &mut female,
        };
        if bucket.len() < MAX_LINES {
            bucket.push(line.to_string());
        }
    }

    Sessions {
        male_session: male.join(" | "),
        female_session: female.join(" | "),
        description: description.join(" "),
    }
}
