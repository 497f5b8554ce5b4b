//! Stateless helper utilities used by the XLSX layout kernel.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;

use crate::conf::{
    C_NUM_FORMAT_CURRENCY, C_NUM_FORMAT_DATE, C_NUM_FORMAT_INTEGER, C_NUM_FORMAT_PERCENT,
    C_OUTPUT_FILE_EXTENSION, C_OUTPUT_FILE_PREFIX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    EnumCellInput, EnumCellScalar, EnumColumnType, EnumRenderedValue, SpecColumn,
    SpecRenderedCell, XlsxGenerationError,
};

static RE_CELL_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\$?([A-Za-z]+)\$?([0-9]+)$").expect("static cell reference pattern")
});

const TUP_DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];
const TUP_DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

////////////////////////////////////////////////////////////////////////////////
// #region CellReference

/// Convert column letters (`A`, `Z`, `AA`, ...) to a 1-based column number.
///
/// Returns `None` for empty input, non-letters, or columns past Excel's limit.
pub fn convert_column_letters_to_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }

    let mut n_col = 0usize;
    for chr in letters.chars() {
        if !chr.is_ascii_alphabetic() {
            return None;
        }
        let n_digit = (chr.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        n_col = n_col.checked_mul(26)?.checked_add(n_digit)?;
        if n_col > N_NCOLS_EXCEL_MAX {
            return None;
        }
    }
    Some(n_col)
}

/// Convert a 1-based column number back to letters. `0` yields an empty string.
pub fn convert_column_index_to_letters(col: usize) -> String {
    let mut n_rest = col;
    let mut l_chars = Vec::new();
    while n_rest > 0 {
        let n_digit = (n_rest - 1) % 26;
        l_chars.push((b'A' + n_digit as u8) as char);
        n_rest = (n_rest - 1) / 26;
    }
    l_chars.iter().rev().collect()
}

/// Parse a cell reference such as `B3` or `$AA$10` into 1-based `(row, col)`.
pub fn parse_cell_reference(cell_ref: &str) -> Result<(usize, usize), XlsxGenerationError> {
    let err_invalid = || XlsxGenerationError::InvalidCellReference(cell_ref.to_string());

    let caps = RE_CELL_REFERENCE
        .captures(cell_ref.trim())
        .ok_or_else(err_invalid)?;
    let n_col = convert_column_letters_to_index(&caps[1]).ok_or_else(err_invalid)?;
    let n_row = caps[2].parse::<usize>().map_err(|_| err_invalid())?;
    if n_row == 0 || n_row > N_NROWS_EXCEL_MAX {
        return Err(err_invalid());
    }

    Ok((n_row, n_col))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellFormatting

/// Explicit column format, else the type default (`percent`/`currency` only).
pub fn resolve_column_format(column: &SpecColumn) -> Option<String> {
    if let Some(fmt) = &column.format {
        return Some(fmt.clone());
    }
    match column.column_type {
        EnumColumnType::Percent => Some(C_NUM_FORMAT_PERCENT.to_string()),
        EnumColumnType::Currency => Some(C_NUM_FORMAT_CURRENCY.to_string()),
        EnumColumnType::Number
        | EnumColumnType::Date
        | EnumColumnType::Text
        | EnumColumnType::Boolean => None,
    }
}

/// Decide stored value and display format of one body cell.
///
/// Coercion failures never error; they keep the raw literal.
pub fn render_cell(column: &SpecColumn, cell: &EnumCellInput) -> SpecRenderedCell {
    let c_fmt_resolved = resolve_column_format(column);

    match cell {
        EnumCellInput::Formula { value } => {
            let Some(scalar) = value else {
                return SpecRenderedCell {
                    value: EnumRenderedValue::Blank,
                    num_format: None,
                };
            };
            SpecRenderedCell {
                value: EnumRenderedValue::Formula(convert_scalar_to_text(scalar)),
                num_format: if column.column_type.is_formula_formatted() {
                    c_fmt_resolved
                } else {
                    None
                },
            }
        }
        EnumCellInput::StaticValue { value } => {
            let Some(scalar) = value else {
                return SpecRenderedCell {
                    value: EnumRenderedValue::Blank,
                    num_format: None,
                };
            };
            render_static_value(column.column_type, scalar, c_fmt_resolved)
        }
    }
}

fn render_static_value(
    column_type: EnumColumnType,
    scalar: &EnumCellScalar,
    fmt_resolved: Option<String>,
) -> SpecRenderedCell {
    match column_type {
        EnumColumnType::Number => SpecRenderedCell {
            value: match derive_f64_from_scalar(scalar) {
                Some(n) => EnumRenderedValue::Number(round_half_up(n)),
                None => derive_raw_literal(scalar),
            },
            num_format: Some(fmt_resolved.unwrap_or_else(|| C_NUM_FORMAT_INTEGER.to_string())),
        },
        EnumColumnType::Percent | EnumColumnType::Currency => SpecRenderedCell {
            value: match derive_f64_from_scalar(scalar) {
                Some(n) => EnumRenderedValue::Number(n),
                None => derive_raw_literal(scalar),
            },
            num_format: fmt_resolved,
        },
        EnumColumnType::Date => SpecRenderedCell {
            value: match derive_date_from_scalar(scalar) {
                Some(date) => EnumRenderedValue::Date(date),
                None => derive_raw_literal(scalar),
            },
            num_format: Some(fmt_resolved.unwrap_or_else(|| C_NUM_FORMAT_DATE.to_string())),
        },
        EnumColumnType::Boolean => SpecRenderedCell {
            value: EnumRenderedValue::Boolean(convert_scalar_to_bool(scalar)),
            num_format: fmt_resolved,
        },
        EnumColumnType::Text => SpecRenderedCell {
            value: EnumRenderedValue::Text(convert_scalar_to_text(scalar)),
            num_format: fmt_resolved,
        },
    }
}

/// Round to nearest integer with halves going up (`2.5 -> 3`, `-2.5 -> -2`).
///
/// Exact integers are returned unchanged, including those beyond 2^52.
pub fn round_half_up(x: f64) -> f64 {
    let n_rounded = x.round();
    if (n_rounded - x).abs() == 0.5 {
        x.ceil()
    } else {
        n_rounded
    }
}

fn derive_raw_literal(scalar: &EnumCellScalar) -> EnumRenderedValue {
    match scalar {
        EnumCellScalar::Boolean(val) => EnumRenderedValue::Boolean(*val),
        EnumCellScalar::Number(val) => EnumRenderedValue::Number(*val),
        EnumCellScalar::Text(val) => EnumRenderedValue::Text(val.clone()),
    }
}

fn derive_f64_from_scalar(scalar: &EnumCellScalar) -> Option<f64> {
    let n_value = match scalar {
        EnumCellScalar::Number(val) => *val,
        EnumCellScalar::Text(val) => val.trim().parse::<f64>().ok()?,
        EnumCellScalar::Boolean(_) => return None,
    };
    n_value.is_finite().then_some(n_value)
}

fn derive_date_from_scalar(scalar: &EnumCellScalar) -> Option<NaiveDate> {
    let EnumCellScalar::Text(val) = scalar else {
        return None;
    };
    let c_value = val.trim();

    let date = TUP_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(c_value, fmt).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(c_value)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .or_else(|| {
            TUP_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(c_value, fmt).ok())
                .map(|dt| dt.date())
        })?;

    // Excel cannot store dates outside 1900..=9999.
    (1900..=9999).contains(&date.year()).then_some(date)
}

fn convert_scalar_to_bool(scalar: &EnumCellScalar) -> bool {
    match scalar {
        EnumCellScalar::Boolean(val) => *val,
        EnumCellScalar::Number(val) => *val != 0.0 && !val.is_nan(),
        EnumCellScalar::Text(val) => !matches!(
            val.trim().to_ascii_lowercase().as_str(),
            "" | "false" | "no" | "n" | "0"
        ),
    }
}

/// Text form of a scalar; integral numbers print without a fraction.
pub fn convert_scalar_to_text(scalar: &EnumCellScalar) -> String {
    match scalar {
        EnumCellScalar::Boolean(val) => val.to_string(),
        EnumCellScalar::Number(val) => format_number(*val),
        EnumCellScalar::Text(val) => val.clone(),
    }
}

fn format_number(x: f64) -> String {
    if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        x.to_string()
    }
}

/// Text used to measure a rendered value for autofit; `None` for blanks.
pub fn derive_display_text(value: &EnumRenderedValue) -> Option<String> {
    match value {
        EnumRenderedValue::Blank => None,
        EnumRenderedValue::Number(val) => Some(format_number(*val)),
        EnumRenderedValue::Text(val) => Some(val.clone()),
        EnumRenderedValue::Boolean(val) => Some(val.to_string()),
        EnumRenderedValue::Date(val) => Some(val.format("%Y-%m-%d").to_string()),
        EnumRenderedValue::Formula(val) => Some(val.clone()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to a valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().trim_matches('\'').to_string();

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

/// Sanitize all sheet names and reject empty or case-insensitive duplicates.
///
/// Returns the final names plus warnings for every rewritten name.
pub fn derive_sheet_names<'a, I>(names: I) -> Result<(Vec<String>, Vec<String>), XlsxGenerationError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut l_names = Vec::new();
    let mut l_warnings = Vec::new();
    let mut set_names_lower = BTreeSet::new();

    for c_name_raw in names {
        let c_name = sanitize_sheet_name(c_name_raw, "_");
        if c_name.is_empty() {
            return Err(XlsxGenerationError::InvalidSheetName(c_name_raw.to_string()));
        }
        if c_name != c_name_raw {
            l_warnings.push(format!("Sheet name {c_name_raw:?} rewritten to {c_name:?}."));
        }
        if !set_names_lower.insert(c_name.to_lowercase()) {
            return Err(XlsxGenerationError::DuplicateSheetName(c_name));
        }
        l_names.push(c_name);
    }

    Ok((l_names, l_warnings))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region OutputNaming

/// `excel-file-<digits of the ISO-8601 timestamp>.xlsx`.
///
/// Unique per millisecond only.
pub fn derive_output_file_name(now: DateTime<Utc>) -> String {
    let c_digits: String = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    format!("{C_OUTPUT_FILE_PREFIX}{c_digits}.{C_OUTPUT_FILE_EXTENSION}")
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn column(column_type: EnumColumnType, format: Option<&str>) -> SpecColumn {
        SpecColumn {
            name: "col".to_string(),
            column_type,
            format: format.map(str::to_string),
        }
    }

    fn literal(value: EnumCellScalar) -> EnumCellInput {
        EnumCellInput::StaticValue { value: Some(value) }
    }

    fn text(value: &str) -> EnumCellScalar {
        EnumCellScalar::Text(value.to_string())
    }

    #[test]
    fn column_letters_follow_spreadsheet_numbering() {
        for (letters, n_expected) in [
            ("A", 1),
            ("Z", 26),
            ("AA", 27),
            ("AZ", 52),
            ("BA", 53),
            ("ZZ", 702),
            ("AAA", 703),
            ("XFD", 16_384),
        ] {
            assert_eq!(convert_column_letters_to_index(letters), Some(n_expected));
            assert_eq!(convert_column_index_to_letters(n_expected), letters);
        }
        assert_eq!(convert_column_letters_to_index("az"), Some(52));
        assert_eq!(convert_column_letters_to_index("XFE"), None);
        assert_eq!(convert_column_letters_to_index(""), None);
    }

    #[test]
    fn cell_reference_parses_to_one_based_coordinates() {
        assert_eq!(parse_cell_reference("A1").expect("A1"), (1, 1));
        assert_eq!(parse_cell_reference("B3").expect("B3"), (3, 2));
        assert_eq!(parse_cell_reference("$AA$10").expect("AA10"), (10, 27));
        assert_eq!(parse_cell_reference(" c7 ").expect("c7"), (7, 3));
    }

    #[test]
    fn cell_reference_rejects_malformed_input() {
        for bad in ["", "A", "12", "A0", "1A", "A-1", "A1048577"] {
            assert!(
                matches!(
                    parse_cell_reference(bad),
                    Err(XlsxGenerationError::InvalidCellReference(_))
                ),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn number_rounds_half_up_with_integer_format() {
        let rendered = render_cell(&column(EnumColumnType::Number, None), &literal(text("42.7")));
        assert_eq!(rendered.value, EnumRenderedValue::Number(43.0));
        assert_eq!(rendered.num_format.as_deref(), Some("0"));

        let rendered = render_cell(
            &column(EnumColumnType::Number, Some("#,##0")),
            &literal(EnumCellScalar::Number(2.5)),
        );
        assert_eq!(rendered.value, EnumRenderedValue::Number(3.0));
        assert_eq!(rendered.num_format.as_deref(), Some("#,##0"));

        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn number_rounding_keeps_large_integers_and_near_halves() {
        let rendered = render_cell(
            &column(EnumColumnType::Number, None),
            &literal(text("4503599627370497")),
        );
        assert_eq!(rendered.value, EnumRenderedValue::Number(4503599627370497.0));

        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(9007199254740991.0), 9007199254740991.0);
    }

    #[test]
    fn unparseable_number_keeps_raw_literal() {
        let rendered = render_cell(&column(EnumColumnType::Number, None), &literal(text("n/a")));
        assert_eq!(rendered.value, EnumRenderedValue::Text("n/a".to_string()));
        assert_eq!(rendered.num_format.as_deref(), Some("0"));
    }

    #[test]
    fn percent_and_currency_use_type_default_formats() {
        let rendered = render_cell(&column(EnumColumnType::Percent, None), &literal(text("0.25")));
        assert_eq!(rendered.value, EnumRenderedValue::Number(0.25));
        assert_eq!(rendered.num_format.as_deref(), Some("0.00%"));

        let rendered = render_cell(
            &column(EnumColumnType::Currency, None),
            &literal(EnumCellScalar::Number(1200.5)),
        );
        assert_eq!(rendered.value, EnumRenderedValue::Number(1200.5));
        assert_eq!(rendered.num_format.as_deref(), Some("$#,##0"));

        let rendered =
            render_cell(&column(EnumColumnType::Currency, None), &literal(text("lots")));
        assert_eq!(rendered.value, EnumRenderedValue::Text("lots".to_string()));
    }

    #[test]
    fn formula_keeps_expression_and_column_format() {
        let formula = EnumCellInput::Formula {
            value: Some(text("SUM(B2:B9)")),
        };

        let rendered = render_cell(&column(EnumColumnType::Currency, None), &formula);
        assert_eq!(
            rendered.value,
            EnumRenderedValue::Formula("SUM(B2:B9)".to_string())
        );
        assert_eq!(rendered.num_format.as_deref(), Some("$#,##0"));

        let rendered = render_cell(&column(EnumColumnType::Number, None), &formula);
        assert_eq!(rendered.num_format, None);

        let rendered = render_cell(&column(EnumColumnType::Text, Some("@")), &formula);
        assert_eq!(rendered.num_format, None);
    }

    #[test]
    fn dates_parse_or_keep_raw_literal() {
        let rendered = render_cell(&column(EnumColumnType::Date, None), &literal(text("2024-03-05")));
        assert_eq!(
            rendered.value,
            EnumRenderedValue::Date(NaiveDate::from_ymd_opt(2024, 3, 5).expect("date"))
        );
        assert_eq!(rendered.num_format.as_deref(), Some("yyyy-mm-dd"));

        let rendered = render_cell(
            &column(EnumColumnType::Date, Some("dd/mm/yyyy")),
            &literal(text("2024-03-05T10:00:00Z")),
        );
        assert!(matches!(rendered.value, EnumRenderedValue::Date(_)));
        assert_eq!(rendered.num_format.as_deref(), Some("dd/mm/yyyy"));

        let rendered = render_cell(&column(EnumColumnType::Date, None), &literal(text("not-a-date")));
        assert_eq!(
            rendered.value,
            EnumRenderedValue::Text("not-a-date".to_string())
        );
    }

    #[test]
    fn booleans_and_text_are_coerced() {
        let col_bool = column(EnumColumnType::Boolean, None);
        for (scalar, b_expected) in [
            (text("true"), true),
            (text("FALSE"), false),
            (text("0"), false),
            (text(""), false),
            (text("anything"), true),
            (EnumCellScalar::Number(0.0), false),
            (EnumCellScalar::Number(3.0), true),
            (EnumCellScalar::Boolean(true), true),
        ] {
            assert_eq!(
                render_cell(&col_bool, &literal(scalar)).value,
                EnumRenderedValue::Boolean(b_expected)
            );
        }

        let rendered = render_cell(
            &column(EnumColumnType::Text, None),
            &literal(EnumCellScalar::Number(42.0)),
        );
        assert_eq!(rendered.value, EnumRenderedValue::Text("42".to_string()));
        assert_eq!(rendered.num_format, None);
    }

    #[test]
    fn null_value_renders_blank() {
        let rendered = render_cell(
            &column(EnumColumnType::Number, None),
            &EnumCellInput::StaticValue { value: None },
        );
        assert_eq!(rendered.value, EnumRenderedValue::Blank);
        assert_eq!(derive_display_text(&rendered.value), None);
    }

    #[test]
    fn sheet_names_are_sanitized_and_deduplicated() {
        let (l_names, l_warnings) =
            derive_sheet_names(["Report", "Q1/Q2", "Notes"]).expect("names");
        assert_eq!(l_names, vec!["Report", "Q1_Q2", "Notes"]);
        assert_eq!(l_warnings.len(), 1);

        assert!(matches!(
            derive_sheet_names(["Report", "report"]),
            Err(XlsxGenerationError::DuplicateSheetName(_))
        ));
        assert!(matches!(
            derive_sheet_names(["   "]),
            Err(XlsxGenerationError::InvalidSheetName(_))
        ));
    }

    #[test]
    fn output_file_name_embeds_timestamp_digits() {
        let now = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 45)
            .single()
            .expect("timestamp");
        assert_eq!(
            derive_output_file_name(now),
            "excel-file-20240115103045000.xlsx"
        );
    }
}
