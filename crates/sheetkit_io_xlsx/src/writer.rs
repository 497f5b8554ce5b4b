//! XLSX writer kernel that applies table layouts and saves workbooks.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, Utc};
use rust_xlsxwriter::{ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::conf::derive_table_format_presets;
use crate::layout::plan_table_layout;
use crate::spec::{
    EnumRenderedValue, SpecCellFormat, SpecExcelConfig, SpecGeneratedFile, SpecSheet,
    SpecTable, SpecTableLayout, XlsxGenerationError,
};
use crate::util::{derive_output_file_name, derive_sheet_names};

/// Builds one workbook per call from sheet/table definitions.
pub struct XlsxWorkbookBuilder {
    path_dir_out: PathBuf,
    config: SpecExcelConfig,
}

impl XlsxWorkbookBuilder {
    /// Create a builder writing into `path_dir_out` with one resolved style config.
    pub fn new(path_dir_out: impl Into<PathBuf>, config: SpecExcelConfig) -> Self {
        Self {
            path_dir_out: path_dir_out.into(),
            config,
        }
    }

    /// Lay out every sheet/table in input order and save the workbook.
    ///
    /// The file is first saved under a hidden `.part` name and renamed into
    /// place, so a visible `excel-file-*.xlsx` is always complete.
    pub fn build(
        &self,
        sheets: &[SpecSheet],
        now: DateTime<Utc>,
    ) -> Result<SpecGeneratedFile, XlsxGenerationError> {
        let (l_sheet_names, l_warnings) =
            derive_sheet_names(sheets.iter().map(|sheet| sheet.sheet_name.as_str()))?;

        let mut report = SpecGeneratedFile {
            file_name: derive_output_file_name(now),
            warnings: l_warnings,
            ..Default::default()
        };

        let mut workbook = Workbook::new();
        for (sheet, c_sheet_name) in sheets.iter().zip(l_sheet_names) {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&c_sheet_name)?;

            let mut cnt_autofilters = 0usize;
            for table in &sheet.tables {
                let layout = place_table(worksheet, table, &self.config)?;
                if layout.autofilter.is_some() {
                    cnt_autofilters += 1;
                }
                if table.title.is_some() && table.columns.is_empty() {
                    report.warn(format!(
                        "Sheet {c_sheet_name:?}: table {:?} has no columns; title written to a single cell.",
                        table.start_cell
                    ));
                }
                report.cnt_tables += 1;
            }
            // Excel keeps one autofilter per worksheet.
            if cnt_autofilters > 1 {
                report.warn(format!(
                    "Sheet {c_sheet_name:?}: {cnt_autofilters} tables requested an autofilter; only the last one is kept."
                ));
            }
            report.cnt_sheets += 1;
        }

        fs::create_dir_all(&self.path_dir_out)?;
        let path_file_out = self.path_dir_out.join(&report.file_name);
        let path_file_part = self.path_dir_out.join(format!(".{}.part", report.file_name));

        if let Err(err) = workbook.save(&path_file_part) {
            let _ = fs::remove_file(&path_file_part);
            return Err(err.into());
        }
        fs::rename(&path_file_part, &path_file_out)?;

        report.path = path_file_out;
        Ok(report)
    }
}

/// Plan `table` and write it onto `worksheet`.
pub fn place_table(
    worksheet: &mut Worksheet,
    table: &SpecTable,
    config: &SpecExcelConfig,
) -> Result<SpecTableLayout, XlsxGenerationError> {
    let layout = plan_table_layout(table, config)?;
    let mut styles = XlsxTableStyles::new(config);
    write_table_layout(worksheet, &layout, &mut styles)?;
    Ok(layout)
}

/// Format cache for one style config; body formats are keyed by number format.
pub struct XlsxTableStyles {
    fmt_title: Format,
    fmt_header: Format,
    fmt_body_spec: SpecCellFormat,
    dict_fmt_body: BTreeMap<Option<String>, Format>,
}

impl XlsxTableStyles {
    /// Build title/header formats and an empty body-format cache.
    pub fn new(config: &SpecExcelConfig) -> Self {
        let presets = derive_table_format_presets(config);
        Self {
            fmt_title: derive_rust_xlsx_format(&presets.title),
            fmt_header: derive_rust_xlsx_format(&presets.header),
            fmt_body_spec: presets.body,
            dict_fmt_body: BTreeMap::new(),
        }
    }

    fn body(&mut self, num_format: Option<&String>) -> &Format {
        let fmt_body_spec = &self.fmt_body_spec;
        self.dict_fmt_body
            .entry(num_format.cloned())
            .or_insert_with(|| {
                derive_rust_xlsx_format(&fmt_body_spec.with_(SpecCellFormat {
                    num_format: num_format.cloned(),
                    ..Default::default()
                }))
            })
    }
}

/// Apply a planned layout to `worksheet`.
pub fn write_table_layout(
    worksheet: &mut Worksheet,
    layout: &SpecTableLayout,
    styles: &mut XlsxTableStyles,
) -> Result<(), XlsxGenerationError> {
    if let Some(title) = &layout.title {
        let n_row = cast_row_num(title.row_idx_start)?;
        if title.col_idx_end > title.col_idx_start {
            worksheet.merge_range(
                n_row,
                cast_col_num(title.col_idx_start)?,
                n_row,
                cast_col_num(title.col_idx_end)?,
                &title.text,
                &styles.fmt_title,
            )?;
        } else {
            worksheet.write_string_with_format(
                n_row,
                cast_col_num(title.col_idx_start)?,
                &title.text,
                &styles.fmt_title,
            )?;
        }
    }

    for placed in &layout.header_cells {
        write_cell_with_format(
            worksheet,
            placed.row_idx,
            placed.col_idx,
            &placed.cell.value,
            &styles.fmt_header,
        )?;
    }

    for placed in &layout.body_cells {
        let format = styles.body(placed.cell.num_format.as_ref());
        write_cell_with_format(
            worksheet,
            placed.row_idx,
            placed.col_idx,
            &placed.cell.value,
            format,
        )?;
    }

    if let Some(range) = &layout.autofilter {
        worksheet.autofilter(
            cast_row_num(range.row_idx_first)?,
            cast_col_num(range.col_idx_first)?,
            cast_row_num(range.row_idx_last)?,
            cast_col_num(range.col_idx_last)?,
        )?;
    }

    for spec_width in &layout.column_widths {
        worksheet.set_column_width(cast_col_num(spec_width.col_idx)?, spec_width.width)?;
    }

    Ok(())
}

fn write_cell_with_format(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumRenderedValue,
    format: &Format,
) -> Result<(), XlsxGenerationError> {
    let n_row = cast_row_num(row_idx)?;
    let n_col = cast_col_num(col_idx)?;
    match value {
        EnumRenderedValue::Blank => {
            worksheet.write_blank(n_row, n_col, format)?;
        }
        EnumRenderedValue::Text(val) => {
            worksheet.write_string_with_format(n_row, n_col, val, format)?;
        }
        EnumRenderedValue::Number(val) => {
            worksheet.write_number_with_format(n_row, n_col, *val, format)?;
        }
        EnumRenderedValue::Boolean(val) => {
            worksheet.write_boolean_with_format(n_row, n_col, *val, format)?;
        }
        EnumRenderedValue::Date(val) => {
            let datetime =
                ExcelDateTime::from_ymd(val.year() as u16, val.month() as u8, val.day() as u8)?;
            worksheet.write_datetime_with_format(n_row, n_col, &datetime, format)?;
        }
        EnumRenderedValue::Formula(val) => {
            worksheet.write_formula_with_format(n_row, n_col, val.as_str(), format)?;
        }
    }
    Ok(())
}

fn derive_rust_xlsx_format(spec: &SpecCellFormat) -> Format {
    let mut format = Format::new();

    if let Some(val) = &spec.font_name {
        format = format.set_font_name(val.clone());
    }
    if let Some(val) = spec.font_size {
        format = format.set_font_size(val);
    }
    if spec.bold.unwrap_or(false) {
        format = format.set_bold();
    }

    if let Some(val) = &spec.align
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &spec.valign
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }

    if let Some(val) = &spec.num_format {
        format = format.set_num_format(val.clone());
    }

    if let Some(val) = &spec.border {
        format = format.set_border(derive_format_border(val));
    }

    if spec.text_wrap.unwrap_or(false) {
        format = format.set_text_wrap();
    }

    format
}

/// Map a border style name (as used by spreadsheet tools) to `FormatBorder`.
fn derive_format_border(border: &str) -> FormatBorder {
    match border.trim().to_ascii_lowercase().as_str() {
        "thin" => FormatBorder::Thin,
        "medium" => FormatBorder::Medium,
        "dashed" => FormatBorder::Dashed,
        "dotted" => FormatBorder::Dotted,
        "thick" => FormatBorder::Thick,
        "double" => FormatBorder::Double,
        "hair" => FormatBorder::Hair,
        "mediumdashed" | "medium_dashed" => FormatBorder::MediumDashed,
        "dashdot" | "dash_dot" => FormatBorder::DashDot,
        "mediumdashdot" | "medium_dash_dot" => FormatBorder::MediumDashDot,
        "dashdotdot" | "dash_dot_dot" => FormatBorder::DashDotDot,
        "mediumdashdotdot" | "medium_dash_dot_dot" => FormatBorder::MediumDashDotDot,
        "slantdashdot" | "slant_dash_dot" => FormatBorder::SlantDashDot,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "top" => Some(FormatAlign::Top),
        "bottom" => Some(FormatAlign::Bottom),
        "vcenter" | "vertical_center" => Some(FormatAlign::VerticalCenter),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32, XlsxGenerationError> {
    u32::try_from(value).map_err(|_| XlsxGenerationError::IndexOverflow { axis: "row", value })
}

fn cast_col_num(value: usize) -> Result<u16, XlsxGenerationError> {
    u16::try_from(value).map_err(|_| XlsxGenerationError::IndexOverflow {
        axis: "column",
        value,
    })
}
