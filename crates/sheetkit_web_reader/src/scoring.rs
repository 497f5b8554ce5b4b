//! Readability scoring primitives.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Selector};

use crate::conf::{
    C_PATTERN_NEGATIVE, C_PATTERN_POSITIVE, N_LEN_PER_BONUS_POINT, N_SCORE_LENGTH_BONUS_MAX,
    N_WEIGHT_CLASS_ID,
};
use crate::preprocess::build_selector;

static RE_POSITIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(C_PATTERN_POSITIVE).expect("static positive pattern"));
static RE_NEGATIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(C_PATTERN_NEGATIVE).expect("static negative pattern"));
static SEL_LINKS: LazyLock<Selector> = LazyLock::new(|| build_selector("a"));

/// Starting score of an ancestor node, by tag.
pub fn base_tag_score(tag: &str) -> f64 {
    match tag {
        "div" | "article" | "main" | "section" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    }
}

/// Positive/negative weight from the `class` and `id` attributes.
pub fn class_id_weight(element: ElementRef<'_>) -> f64 {
    let mut n_weight = 0.0;
    for c_attr in [element.value().attr("class"), element.value().id()]
        .into_iter()
        .flatten()
    {
        if c_attr.is_empty() {
            continue;
        }
        if RE_NEGATIVE.is_match(c_attr) {
            n_weight -= N_WEIGHT_CLASS_ID;
        }
        if RE_POSITIVE.is_match(c_attr) {
            n_weight += N_WEIGHT_CLASS_ID;
        }
    }
    n_weight
}

/// Score contributed by one paragraph of `text`.
///
/// One point for being a paragraph, one per comma, and one per 100 chars up to 3.
pub fn content_score(text: &str) -> f64 {
    let n_commas = text.matches(',').count() as f64;
    let n_len_bonus =
        ((text.chars().count() / N_LEN_PER_BONUS_POINT) as f64).min(N_SCORE_LENGTH_BONUS_MAX);
    1.0 + n_commas + n_len_bonus
}

/// Share of an element's text that sits inside links, in `[0, 1]`.
pub fn link_density(element: ElementRef<'_>) -> f64 {
    let n_len_text = element.text().map(|t| t.chars().count()).sum::<usize>();
    if n_len_text == 0 {
        return 0.0;
    }
    let n_len_links = element
        .select(&SEL_LINKS)
        .flat_map(|link| link.text())
        .map(|t| t.chars().count())
        .sum::<usize>();
    (n_len_links as f64 / n_len_text as f64).min(1.0)
}
