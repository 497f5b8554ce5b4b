//! XLSX constants and default preset factories.

use crate::spec::{SpecCellFormat, SpecExcelConfig, SpecTableFormatPresets};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Anchor cell used when a table omits `startCell`.
pub const C_START_CELL_DEFAULT: &str = "A1";

/// Default display format of `percent` columns.
pub const C_NUM_FORMAT_PERCENT: &str = "0.00%";
/// Default display format of `currency` columns.
pub const C_NUM_FORMAT_CURRENCY: &str = "$#,##0";
/// Fallback display format of literal `number` cells.
pub const C_NUM_FORMAT_INTEGER: &str = "0";
/// Fallback display format of literal `date` cells.
pub const C_NUM_FORMAT_DATE: &str = "yyyy-mm-dd";

/// Padding added to the widest rendered value when autofitting.
pub const N_WIDTH_AUTOFIT_PADDING: usize = 2;

/// Default font family.
pub const C_FONT_FAMILY_DEFAULT: &str = "Calibri";
/// Default table-title font size.
pub const N_FONT_SIZE_TITLE_DEFAULT: f64 = 14.0;
/// Default header font size.
pub const N_FONT_SIZE_HEADER_DEFAULT: f64 = 12.0;
/// Default body font size.
pub const N_FONT_SIZE_BODY_DEFAULT: f64 = 11.0;
/// Default border style name.
pub const C_BORDER_STYLE_DEFAULT: &str = "thin";

/// Prefix of every generated workbook file name.
pub const C_OUTPUT_FILE_PREFIX: &str = "excel-file-";
/// Extension of every generated workbook file name.
pub const C_OUTPUT_FILE_EXTENSION: &str = "xlsx";

/// Build title/header/body formats from one resolved style config.
pub fn derive_table_format_presets(config: &SpecExcelConfig) -> SpecTableFormatPresets {
    let cfg_base_fmt_spec = SpecCellFormat {
        font_name: Some(config.font_family.clone()),
        font_size: Some(config.font_size),
        border: config.border_style.clone(),
        valign: Some("vcenter".to_string()),
        ..Default::default()
    };

    SpecTableFormatPresets {
        title: cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(config.title_font_size),
            bold: Some(true),
            align: Some("center".to_string()),
            ..Default::default()
        }),
        header: cfg_base_fmt_spec.with_(SpecCellFormat {
            font_size: Some(config.header_font_size),
            bold: Some(true),
            align: Some("center".to_string()),
            ..Default::default()
        }),
        body: cfg_base_fmt_spec.with_(SpecCellFormat {
            text_wrap: Some(config.wrap_text),
            ..Default::default()
        }),
    }
}
