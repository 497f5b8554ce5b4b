//! `sheetkit_web_reader` v1:
//! Single-URL article reader (fetch, strip, score, extract).
//!
//! Module layout:
//! - `conf`       : tag lists, thresholds, scoring patterns
//! - `spec`       : article model and errors
//! - `fetch`      : HTTP retrieval of markup
//! - `preprocess` : title capture and denylist stripping
//! - `scoring`    : readability scoring primitives
//! - `extract`    : candidate selection and text assembly
//! - `reader`     : fetch + extract facade

pub mod conf;
pub mod extract;
pub mod fetch;
pub mod preprocess;
pub mod reader;
pub mod scoring;
pub mod spec;

pub use extract::extract_article;
pub use fetch::fetch_markup;
pub use preprocess::{capture_title, strip_non_content};
pub use reader::{ArticleReader, parse_article_url};
pub use scoring::{base_tag_score, class_id_weight, content_score, link_density};
pub use spec::{ReaderError, SpecArticle};
