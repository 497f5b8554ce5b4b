//! `POST /excel-generator/generate`

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sheetkit_io_xlsx::{SpecExcelConfig, SpecExcelConfigPatch, SpecSheet, XlsxWorkbookBuilder};

use crate::AppState;
use crate::error::{ApiEnvelope, AppError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub sheets_data: Option<Vec<SpecSheet>>,
    #[serde(default)]
    pub excel_configs: Option<SpecExcelConfigPatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub download_url: String,
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<ApiEnvelope<GenerateResponse>, AppError> {
    let Json(request) = payload?;
    let sheets = match request.sheets_data {
        Some(sheets) if !sheets.is_empty() => sheets,
        _ => {
            return Err(AppError::Validation(
                "`sheetsData` must be a non-empty array of sheets.".to_string(),
            ));
        }
    };
    let config = SpecExcelConfig::default().with_patch(&request.excel_configs.unwrap_or_default());

    let builder = XlsxWorkbookBuilder::new(state.dir_output.clone(), config);
    let report = tokio::task::spawn_blocking(move || builder.build(&sheets, Utc::now()))
        .await
        .map_err(|e| AppError::Generation(e.to_string()))??;

    for c_warning in &report.warnings {
        tracing::warn!(file = %report.file_name, "{c_warning}");
    }
    tracing::info!(
        file = %report.file_name,
        sheets = report.cnt_sheets,
        tables = report.cnt_tables,
        "workbook generated"
    );

    Ok(ApiEnvelope::ok(
        "Excel file generated successfully",
        GenerateResponse {
            download_url: state.derive_download_url(&report.file_name),
        },
    ))
}
