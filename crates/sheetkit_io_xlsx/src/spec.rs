//! Shared XLSX specification models.

use std::path::PathBuf;

use chrono::NaiveDate;
use rust_xlsxwriter::XlsxError;
use serde::{Deserialize, Deserializer};

use crate::conf::{
    C_BORDER_STYLE_DEFAULT, C_FONT_FAMILY_DEFAULT, C_START_CELL_DEFAULT,
    N_FONT_SIZE_BODY_DEFAULT, N_FONT_SIZE_HEADER_DEFAULT, N_FONT_SIZE_TITLE_DEFAULT,
};

////////////////////////////////////////////////////////////////////////////////
// #region RequestModels

/// One sheet of a generation request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecSheet {
    /// Sheet tab name, unique within one workbook.
    pub sheet_name: String,
    /// Tables placed on this sheet, in input order.
    #[serde(default)]
    pub tables: Vec<SpecTable>,
}

/// One row of input cells, positionally aligned to the table columns.
///
/// `null` entries and missing trailing entries leave the cell untouched.
pub type SpecRow = Vec<Option<EnumCellInput>>;

/// One table anchored on a sheet.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecTable {
    /// Optional title merged across the table width.
    #[serde(default)]
    pub title: Option<String>,
    /// Anchor cell reference such as `B3`.
    #[serde(default = "derive_start_cell_default")]
    pub start_cell: String,
    /// Suppress the column-name header row.
    #[serde(default)]
    pub skip_header: bool,
    /// Column descriptors; their count is the table width.
    #[serde(default)]
    pub columns: Vec<SpecColumn>,
    /// Data rows.
    #[serde(default)]
    pub rows: Vec<SpecRow>,
}

fn derive_start_cell_default() -> String {
    C_START_CELL_DEFAULT.to_string()
}

/// Column descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpecColumn {
    /// Header text.
    pub name: String,
    /// Semantic cell type.
    #[serde(rename = "type", default)]
    pub column_type: EnumColumnType,
    /// Explicit display format overriding the type default.
    #[serde(default)]
    pub format: Option<String>,
}

/// Semantic column type driving coercion and display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum EnumColumnType {
    /// Plain text (also the fallback for unknown type names).
    #[default]
    Text,
    /// Integer-rounded number.
    Number,
    /// Fraction shown as percentage.
    Percent,
    /// Money amount.
    Currency,
    /// Calendar date.
    Date,
    /// True/false.
    Boolean,
}

impl EnumColumnType {
    /// Resolve a wire type name; unknown names fall back to [`EnumColumnType::Text`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "number" => Self::Number,
            "percent" => Self::Percent,
            "currency" => Self::Currency,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            _ => Self::Text,
        }
    }

    /// Types whose explicit/default format also applies to formula cells.
    pub fn is_formula_formatted(self) -> bool {
        matches!(
            self,
            Self::Percent | Self::Currency | Self::Number | Self::Date
        )
    }
}

impl From<String> for EnumColumnType {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

/// Input cell, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnumCellInput {
    /// Literal value coerced per column type.
    StaticValue {
        /// Raw literal; `null` renders blank.
        #[serde(default)]
        value: Option<EnumCellScalar>,
    },
    /// Formula expression stored unevaluated.
    Formula {
        /// Formula text, with or without a leading `=`.
        #[serde(default)]
        value: Option<EnumCellScalar>,
    },
}

/// Scalar carried by an input cell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnumCellScalar {
    /// JSON boolean.
    Boolean(bool),
    /// JSON number.
    Number(f64),
    /// JSON string.
    Text(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StyleConfig

/// Resolved global style configuration of one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecExcelConfig {
    /// Font family for every written cell.
    pub font_family: String,
    /// Table-title font size.
    pub title_font_size: f64,
    /// Header font size.
    pub header_font_size: f64,
    /// Body font size.
    pub font_size: f64,
    /// Border style name for all sides; `None` disables borders.
    pub border_style: Option<String>,
    /// Wrap body text.
    pub wrap_text: bool,
    /// Register an autofilter range per table.
    pub auto_filter: bool,
    /// Size columns from their widest rendered value.
    pub auto_fit_column_width: bool,
}

impl Default for SpecExcelConfig {
    fn default() -> Self {
        Self {
            font_family: C_FONT_FAMILY_DEFAULT.to_string(),
            title_font_size: N_FONT_SIZE_TITLE_DEFAULT,
            header_font_size: N_FONT_SIZE_HEADER_DEFAULT,
            font_size: N_FONT_SIZE_BODY_DEFAULT,
            border_style: Some(C_BORDER_STYLE_DEFAULT.to_string()),
            wrap_text: false,
            auto_filter: false,
            auto_fit_column_width: true,
        }
    }
}

impl SpecExcelConfig {
    /// Return a new config by overlaying caller overrides onto `self`.
    pub fn with_patch(&self, patch: &SpecExcelConfigPatch) -> SpecExcelConfig {
        SpecExcelConfig {
            font_family: patch
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            title_font_size: patch.title_font_size.unwrap_or(self.title_font_size),
            header_font_size: patch.header_font_size.unwrap_or(self.header_font_size),
            font_size: patch.font_size.unwrap_or(self.font_size),
            border_style: match &patch.border_style {
                Some(value) => value.clone(),
                None => self.border_style.clone(),
            },
            wrap_text: patch.wrap_text.unwrap_or(self.wrap_text),
            auto_filter: patch.auto_filter.unwrap_or(self.auto_filter),
            auto_fit_column_width: patch
                .auto_fit_column_width
                .unwrap_or(self.auto_fit_column_width),
        }
    }
}

/// Caller-supplied partial style overrides (`excelConfigs` on the wire).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecExcelConfigPatch {
    pub font_family: Option<String>,
    pub title_font_size: Option<f64>,
    pub header_font_size: Option<f64>,
    pub font_size: Option<f64>,
    /// Absent keeps the default, `null` disables borders.
    #[serde(default, deserialize_with = "deserialize_present")]
    pub border_style: Option<Option<String>>,
    pub wrap_text: Option<bool>,
    pub auto_filter: Option<bool>,
    pub auto_fit_column_width: Option<bool>,
}

fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellFormatSpecification

/// Cell format specification merged before conversion to `rust_xlsxwriter::Format`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecCellFormat {
    /// Font family name.
    pub font_name: Option<String>,
    /// Font size in points.
    pub font_size: Option<f64>,
    /// Bold style.
    pub bold: Option<bool>,

    /// Horizontal alignment.
    pub align: Option<String>,
    /// Vertical alignment.
    pub valign: Option<String>,
    /// Border style name for all sides.
    pub border: Option<String>,
    /// Text wrap.
    pub text_wrap: Option<bool>,

    /// Number format code.
    pub num_format: Option<String>,
}

impl SpecCellFormat {
    /// Return a new format by overlaying `patch` onto `self`.
    pub fn with_(&self, patch: SpecCellFormat) -> SpecCellFormat {
        self.merge(&patch)
    }

    /// Merge two formats with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellFormat) -> SpecCellFormat {
        SpecCellFormat {
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_size: other.font_size.or(self.font_size),
            bold: other.bold.or(self.bold),
            align: other.align.clone().or_else(|| self.align.clone()),
            valign: other.valign.clone().or_else(|| self.valign.clone()),
            border: other.border.clone().or_else(|| self.border.clone()),
            text_wrap: other.text_wrap.or(self.text_wrap),
            num_format: other.num_format.clone().or_else(|| self.num_format.clone()),
        }
    }
}

/// Title/header/body formats derived from one [`SpecExcelConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct SpecTableFormatPresets {
    /// Merged title bar.
    pub title: SpecCellFormat,
    /// Column-name header cells.
    pub header: SpecCellFormat,
    /// Body cells before per-cell number format.
    pub body: SpecCellFormat,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region RenderedCells

/// Stored value of one rendered body cell.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumRenderedValue {
    /// Explicit `null`; written as a styled blank.
    Blank,
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Boolean value.
    Boolean(bool),
    /// Calendar date.
    Date(NaiveDate),
    /// Unevaluated formula expression.
    Formula(String),
}

/// Body cell after type coercion and format resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRenderedCell {
    /// Stored value.
    pub value: EnumRenderedValue,
    /// Applied number/date format code.
    pub num_format: Option<String>,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutPlan

/// Horizontal merge plan item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSheetHorizontalMerge {
    /// Row index where merge is applied.
    pub row_idx_start: usize,
    /// Start column index (inclusive).
    pub col_idx_start: usize,
    /// End column index (inclusive).
    pub col_idx_end: usize,
    /// Merge display text.
    pub text: String,
}

impl SpecSheetHorizontalMerge {
    /// Number of columns covered by the merge.
    pub fn width(&self) -> usize {
        self.col_idx_end - self.col_idx_start + 1
    }
}

/// One cell placed at a zero-based absolute position.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecPlacedCell {
    /// Zero-based row.
    pub row_idx: usize,
    /// Zero-based column.
    pub col_idx: usize,
    /// Rendered content.
    pub cell: SpecRenderedCell,
}

/// Inclusive rectangular range with zero-based bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecCellRange {
    pub row_idx_first: usize,
    pub col_idx_first: usize,
    pub row_idx_last: usize,
    pub col_idx_last: usize,
}

/// Computed display width of one sheet column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpecColumnWidth {
    /// Zero-based sheet column.
    pub col_idx: usize,
    /// Width in character units.
    pub width: f64,
}

/// Complete placement plan for one table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecTableLayout {
    /// Title bar; `col_idx_end == col_idx_start` means a single unmerged cell.
    pub title: Option<SpecSheetHorizontalMerge>,
    /// Column-name cells.
    pub header_cells: Vec<SpecPlacedCell>,
    /// Data cells.
    pub body_cells: Vec<SpecPlacedCell>,
    /// Autofilter range when enabled and non-empty.
    pub autofilter: Option<SpecCellRange>,
    /// Autofit widths when enabled.
    pub column_widths: Vec<SpecColumnWidth>,
    /// First row below the table.
    pub row_idx_next: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportAndErrors

/// Result of one workbook build.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecGeneratedFile {
    /// File name inside the output directory.
    pub file_name: String,
    /// Full path of the written file.
    pub path: PathBuf,
    /// Sheets written.
    pub cnt_sheets: usize,
    /// Tables placed across all sheets.
    pub cnt_tables: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecGeneratedFile {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Failures while laying out or saving a workbook.
#[derive(Debug, thiserror::Error)]
pub enum XlsxGenerationError {
    /// `startCell` is not a column-letters + row-number reference.
    #[error("Invalid cell reference: {0:?}")]
    InvalidCellReference(String),
    /// Sheet name is empty after sanitizing.
    #[error("Invalid sheet name: {0:?}")]
    InvalidSheetName(String),
    /// Two sheets resolve to the same (case-insensitive) name.
    #[error("Duplicate sheet name: {0:?}")]
    DuplicateSheetName(String),
    /// Placement runs past Excel's grid.
    #[error("{axis} index overflow: {value}")]
    IndexOverflow {
        /// `row` or `column`.
        axis: &'static str,
        /// Offending zero-based index.
        value: usize,
    },
    /// Error raised by `rust_xlsxwriter`.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    /// Output directory or file error.
    #[error("output file error: {0}")]
    Io(#[from] std::io::Error),
}

impl XlsxGenerationError {
    /// Whether the failure stems from malformed caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::InvalidCellReference(_) | Self::InvalidSheetName(_) | Self::DuplicateSheetName(_)
        )
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
