//! Reader constants.

/// Element kinds removed before scoring.
pub const L_TAGS_STRIPPED: [&str; 28] = [
    "nav", "script", "style", "noscript", "iframe", "frame", "embed", "object", "video", "audio",
    "source", "track", "picture", "img", "svg", "canvas", "map", "form", "button", "input",
    "select", "textarea", "template", "link", "meta", "aside", "header", "footer",
];

/// Elements scored as paragraph candidates.
pub const C_SELECTOR_CANDIDATES: &str = "p, pre, td, blockquote";

/// Minimum text length (chars) for a paragraph to be scored.
pub const N_LEN_CANDIDATE_MIN: usize = 25;
/// Text length granted one bonus point, capped at `N_SCORE_LENGTH_BONUS_MAX`.
pub const N_LEN_PER_BONUS_POINT: usize = 100;
pub const N_SCORE_LENGTH_BONUS_MAX: f64 = 3.0;
/// Weight applied for a positive or negative class/id match.
pub const N_WEIGHT_CLASS_ID: f64 = 25.0;

pub const C_PATTERN_POSITIVE: &str = r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story";
pub const C_PATTERN_NEGATIVE: &str = r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget";

/// Children that start a new paragraph when assembling the article text.
pub const L_TAGS_BLOCK: [&str; 26] = [
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1",
    "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table", "td",
    "tr", "ul",
];

/// Content types accepted as markup.
pub const L_CONTENT_TYPES_MARKUP: [&str; 2] = ["html", "xml"];

pub const C_USER_AGENT: &str = concat!("sheetkit-web-reader/", env!("CARGO_PKG_VERSION"));
