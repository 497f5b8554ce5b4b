//! HTTP retrieval of page markup.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::conf::L_CONTENT_TYPES_MARKUP;
use crate::spec::ReaderError;

/// Single GET of `url`, returning the decoded body.
///
/// No retry is attempted; timeouts are whatever `client` was built with.
/// A response without a `Content-Type` header is treated as markup.
pub async fn fetch_markup(client: &Client, url: &Url) -> Result<String, ReaderError> {
    let c_url = url.to_string();
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| ReaderError::Fetch {
            url: c_url.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReaderError::Status {
            url: c_url,
            status: status.as_u16(),
        });
    }

    if let Some(value) = response.headers().get(CONTENT_TYPE) {
        let c_content_type = value.to_str().unwrap_or_default().to_ascii_lowercase();
        if !L_CONTENT_TYPES_MARKUP
            .iter()
            .any(|kind| c_content_type.contains(kind))
        {
            return Err(ReaderError::Parse(format!(
                "Unsupported content type {c_content_type:?} at {c_url}"
            )));
        }
    }

    response
        .text()
        .await
        .map_err(|source| ReaderError::Fetch { url: c_url, source })
}
