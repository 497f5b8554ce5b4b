//! Title capture and removal of non-content elements.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::conf::L_TAGS_STRIPPED;

static SEL_TITLE: LazyLock<Selector> = LazyLock::new(|| build_selector("title"));
static SEL_STRIPPED: LazyLock<Selector> =
    LazyLock::new(|| build_selector(&L_TAGS_STRIPPED.join(", ")));

pub(crate) fn build_selector(c_selector: &str) -> Selector {
    Selector::parse(c_selector).expect("static selector")
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of the first `<title>` element; empty when the document has none.
pub fn capture_title(document: &Html) -> String {
    document
        .select(&SEL_TITLE)
        .next()
        .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        .unwrap_or_default()
}

/// Detach every denylisted element and re-serialize the remaining tree.
pub fn strip_non_content(mut document: Html) -> String {
    let l_ids_stripped = document
        .select(&SEL_STRIPPED)
        .map(|element| element.id())
        .collect::<Vec<_>>();
    for node_id in l_ids_stripped {
        if let Some(mut node) = document.tree.get_mut(node_id) {
            node.detach();
        }
    }
    document.html()
}
