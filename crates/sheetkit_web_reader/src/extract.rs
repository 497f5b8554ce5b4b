//! Candidate selection and article text assembly.

use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::conf::{C_SELECTOR_CANDIDATES, L_TAGS_BLOCK, N_LEN_CANDIDATE_MIN};
use crate::preprocess::{build_selector, capture_title, normalize_whitespace, strip_non_content};
use crate::scoring::{base_tag_score, class_id_weight, content_score, link_density};
use crate::spec::{ReaderError, SpecArticle};

static SEL_CANDIDATES: LazyLock<Selector> =
    LazyLock::new(|| build_selector(C_SELECTOR_CANDIDATES));

/// Extract title and main text from one markup document.
///
/// Steps:
/// 1. Parse and capture `<title>`.
/// 2. Strip denylisted elements, re-serialize and parse again.
/// 3. Score paragraph candidates into their parent (full) and grandparent (half).
/// 4. Scale each ancestor by `1 - link_density` and keep the best one.
///
/// A document with no scoring candidate yields empty `content`, not an error.
pub fn extract_article(markup: &str) -> Result<SpecArticle, ReaderError> {
    if markup.trim().is_empty() {
        return Err(ReaderError::Parse("Empty document".to_string()));
    }

    let document = Html::parse_document(markup);
    let title = capture_title(&document);
    let c_markup_clean = strip_non_content(document);
    let document_clean = Html::parse_document(&c_markup_clean);

    let content = select_best_candidate(&document_clean)
        .map(collect_block_text)
        .unwrap_or_default();

    Ok(SpecArticle { title, content })
}

fn select_best_candidate(document: &Html) -> Option<ElementRef<'_>> {
    let mut dict_scores = HashMap::new();
    let mut l_ids_order = Vec::new();

    let mut add_score = |element: ElementRef<'_>, n_score: f64| {
        let node_id = element.id();
        let n_score_current = dict_scores.entry(node_id).or_insert_with(|| {
            l_ids_order.push(node_id);
            base_tag_score(element.value().name()) + class_id_weight(element)
        });
        *n_score_current += n_score;
    };

    for paragraph in document.select(&SEL_CANDIDATES) {
        let c_text = normalize_whitespace(&paragraph.text().collect::<String>());
        if c_text.chars().count() < N_LEN_CANDIDATE_MIN {
            continue;
        }
        let Some(parent) = paragraph.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let n_score = content_score(&c_text);
        add_score(parent, n_score);
        if let Some(grandparent) = parent.parent().and_then(ElementRef::wrap) {
            add_score(grandparent, n_score / 2.0);
        }
    }

    // Ties go to the first-scored ancestor, which keeps results stable.
    let mut best: Option<(ElementRef<'_>, f64)> = None;
    for node_id in l_ids_order {
        let Some(element) = document.tree.get(node_id).and_then(ElementRef::wrap) else {
            continue;
        };
        let n_score = dict_scores[&node_id] * (1.0 - link_density(element));
        if best.is_none_or(|(_, n_best)| n_score > n_best) {
            best = Some((element, n_score));
        }
    }
    best.map(|(element, _)| element)
}

/// Text of `element`, block-level children as separate paragraphs joined by
/// a blank line and inline runs merged into the surrounding paragraph.
fn collect_block_text(element: ElementRef<'_>) -> String {
    let mut l_paragraphs = Vec::new();
    let mut c_inline = String::new();

    for child in element.children() {
        match child.value() {
            Node::Text(text) => c_inline.push_str(text),
            Node::Element(child_element) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if L_TAGS_BLOCK.contains(&child_element.name()) {
                    l_paragraphs.push(std::mem::take(&mut c_inline));
                    l_paragraphs.push(child_ref.text().collect::<String>());
                } else if child_element.name() == "br" {
                    c_inline.push(' ');
                } else {
                    c_inline.extend(child_ref.text());
                }
            }
            _ => {}
        }
    }
    l_paragraphs.push(c_inline);

    l_paragraphs
        .iter()
        .map(|c_paragraph| normalize_whitespace(c_paragraph))
        .filter(|c_paragraph| !c_paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const C_ARTICLE_PAGE: &str = r#"
<html>
  <head><title>Rust Release Notes</title><style>p { color: red; }</style></head>
  <body>
    <header><h1>Site banner</h1></header>
    <nav><a href="/">Home</a> <a href="/blog">Blog</a></nav>
    <div class="sidebar">
      <p><a href="/a">Related article one with a long enough link title</a></p>
    </div>
    <div id="story" class="post-body">
      <h2>What changed</h2>
      <p>The new release stabilises several APIs, improves compile times, and fixes a number of long-standing bugs.</p>
      <p>Upgrading is straightforward, although crates relying on unstable features may need small adjustments.</p>
      <script>trackVisit();</script>
    </div>
    <footer>Copyright notice for the whole site</footer>
  </body>
</html>"#;

    #[test]
    fn extracts_title_and_main_paragraphs() {
        let article = extract_article(C_ARTICLE_PAGE).expect("extract");

        assert_eq!(article.title, "Rust Release Notes");
        assert_eq!(
            article.content,
            "What changed\n\n\
             The new release stabilises several APIs, improves compile times, and fixes a number of long-standing bugs.\n\n\
             Upgrading is straightforward, although crates relying on unstable features may need small adjustments."
        );
    }

    #[test]
    fn stripped_elements_never_reach_content() {
        let article = extract_article(C_ARTICLE_PAGE).expect("extract");
        for c_gone in ["trackVisit", "Copyright", "Site banner", "Home", "Related article"] {
            assert!(!article.content.contains(c_gone), "{c_gone} leaked");
        }
    }

    #[test]
    fn page_without_candidates_has_empty_content() {
        let article =
            extract_article("<html><head><title>Tiny</title></head><body><p>Too short.</p></body></html>")
                .expect("extract");
        assert_eq!(article.title, "Tiny");
        assert_eq!(article.content, "");
    }

    #[test]
    fn empty_markup_is_parse_error() {
        let err = extract_article("   \n").expect_err("empty");
        assert!(matches!(err, ReaderError::Parse(_)));
    }

    #[test]
    fn link_heavy_block_loses_to_prose() {
        let c_page = r#"<body>
<div id="links"><p><a href="/1">A first link list entry that is long enough to count</a></p>
<p><a href="/2">A second link list entry that is long enough to count</a></p></div>
<div id="prose"><p>Plain prose paragraph that is comfortably longer than the minimum length.</p></div>
</body>"#;
        let article = extract_article(c_page).expect("extract");
        assert_eq!(
            article.content,
            "Plain prose paragraph that is comfortably longer than the minimum length."
        );
    }
}
