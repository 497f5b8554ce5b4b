//! `GET /web-page-reader/get-content?url=`

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use sheetkit_web_reader::SpecArticle;

use crate::AppState;
use crate::error::{ApiEnvelope, AppError};

#[derive(Debug, Deserialize)]
pub struct GetContentQuery {
    #[serde(default)]
    pub url: Option<String>,
}

pub async fn get_content(
    State(state): State<AppState>,
    query: Result<Query<GetContentQuery>, QueryRejection>,
) -> Result<ApiEnvelope<SpecArticle>, AppError> {
    let Query(query) = query?;
    let c_url = match query.url {
        Some(c_url) if !c_url.trim().is_empty() => c_url,
        _ => {
            return Err(AppError::Validation(
                "Query parameter `url` is required.".to_string(),
            ));
        }
    };

    let article = state.reader.read(&c_url).await?;
    tracing::info!(
        url = %c_url,
        title = %article.title,
        chars = article.content.chars().count(),
        "page content extracted"
    );
    Ok(ApiEnvelope::ok("Page content extracted successfully", article))
}
