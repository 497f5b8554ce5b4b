//! Table placement planner.
//!
//! Turns one [`SpecTable`] into a [`SpecTableLayout`]: absolute cell positions for
//! the title bar, header row and body, plus autofilter and autofit results. The
//! plan is pure data; [`crate::writer::write_table_layout`] applies it to a sheet.

use crate::conf::{N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_WIDTH_AUTOFIT_PADDING};
use crate::spec::{
    EnumRenderedValue, SpecCellRange, SpecColumnWidth, SpecExcelConfig, SpecPlacedCell,
    SpecRenderedCell, SpecSheetHorizontalMerge, SpecTable, SpecTableLayout, XlsxGenerationError,
};
use crate::util::{derive_display_text, parse_cell_reference, render_cell};

/// Plan the placement of `table` on a sheet.
///
/// Steps, starting at the table's anchor cell:
/// 1. title written at the anchor and merged across the column count (min. 1),
/// 2. header row of column names unless `skip_header`,
/// 3. one sheet row per data row, each cell rendered by its column policy,
/// 4. autofilter over the data rows when enabled,
/// 5. autofit widths (`widest value + 2`) over header and data when enabled.
pub fn plan_table_layout(
    table: &SpecTable,
    config: &SpecExcelConfig,
) -> Result<SpecTableLayout, XlsxGenerationError> {
    let (n_row_anchor, n_col_anchor) = parse_cell_reference(&table.start_cell)?;
    let n_row_start = n_row_anchor - 1;
    let n_col_start = n_col_anchor - 1;
    let n_width = table.columns.len();

    let n_col_last = n_col_start + usize::max(n_width, 1) - 1;
    validate_col_idx(n_col_last)?;

    let mut layout = SpecTableLayout::default();
    let mut n_row_cursor = n_row_start;

    if let Some(c_title) = &table.title {
        validate_row_idx(n_row_cursor)?;
        layout.title = Some(SpecSheetHorizontalMerge {
            row_idx_start: n_row_cursor,
            col_idx_start: n_col_start,
            col_idx_end: n_col_last,
            text: c_title.clone(),
        });
        n_row_cursor += 1;
    }

    if !table.skip_header && n_width > 0 {
        validate_row_idx(n_row_cursor)?;
        layout.header_cells = table
            .columns
            .iter()
            .enumerate()
            .map(|(n_idx_col, column)| SpecPlacedCell {
                row_idx: n_row_cursor,
                col_idx: n_col_start + n_idx_col,
                cell: SpecRenderedCell {
                    value: EnumRenderedValue::Text(column.name.clone()),
                    num_format: None,
                },
            })
            .collect();
        n_row_cursor += 1;
    }

    let n_row_body_first = n_row_cursor;
    for row in &table.rows {
        validate_row_idx(n_row_cursor)?;
        for (n_idx_col, (column, cell)) in table.columns.iter().zip(row.iter()).enumerate() {
            let Some(cell) = cell else {
                continue;
            };
            layout.body_cells.push(SpecPlacedCell {
                row_idx: n_row_cursor,
                col_idx: n_col_start + n_idx_col,
                cell: render_cell(column, cell),
            });
        }
        n_row_cursor += 1;
    }

    if config.auto_filter && n_width > 0 && n_row_cursor > n_row_body_first {
        layout.autofilter = Some(SpecCellRange {
            row_idx_first: n_row_body_first,
            col_idx_first: n_col_start,
            row_idx_last: n_row_cursor - 1,
            col_idx_last: n_col_last,
        });
    }

    if config.auto_fit_column_width {
        layout.column_widths = plan_autofit_widths(&layout, n_col_start, n_width);
    }

    layout.row_idx_next = n_row_cursor;
    Ok(layout)
}

/// `max(len(header), len(each written body value)) + padding` per table column.
fn plan_autofit_widths(
    layout: &SpecTableLayout,
    n_col_start: usize,
    n_width: usize,
) -> Vec<SpecColumnWidth> {
    let mut l_len_max_by_col = vec![0usize; n_width];

    for placed in layout.header_cells.iter().chain(layout.body_cells.iter()) {
        let Some(c_text) = derive_display_text(&placed.cell.value) else {
            continue;
        };
        let n_idx_col = placed.col_idx - n_col_start;
        l_len_max_by_col[n_idx_col] = usize::max(l_len_max_by_col[n_idx_col], c_text.chars().count());
    }

    l_len_max_by_col
        .into_iter()
        .enumerate()
        .map(|(n_idx_col, n_len_max)| SpecColumnWidth {
            col_idx: n_col_start + n_idx_col,
            width: (n_len_max + N_WIDTH_AUTOFIT_PADDING) as f64,
        })
        .collect()
}

fn validate_row_idx(value: usize) -> Result<(), XlsxGenerationError> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(XlsxGenerationError::IndexOverflow { axis: "row", value });
    }
    Ok(())
}

fn validate_col_idx(value: usize) -> Result<(), XlsxGenerationError> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxGenerationError::IndexOverflow {
            axis: "column",
            value,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{EnumCellInput, EnumCellScalar, EnumColumnType, SpecColumn};

    fn column(name: &str, column_type: EnumColumnType) -> SpecColumn {
        SpecColumn {
            name: name.to_string(),
            column_type,
            format: None,
        }
    }

    fn literal(value: &str) -> Option<EnumCellInput> {
        Some(EnumCellInput::StaticValue {
            value: Some(EnumCellScalar::Text(value.to_string())),
        })
    }

    fn table(start_cell: &str, title: Option<&str>, columns: Vec<SpecColumn>) -> SpecTable {
        SpecTable {
            title: title.map(str::to_string),
            start_cell: start_cell.to_string(),
            skip_header: false,
            columns,
            rows: vec![],
        }
    }

    fn config_plain() -> SpecExcelConfig {
        SpecExcelConfig {
            auto_filter: false,
            auto_fit_column_width: false,
            ..Default::default()
        }
    }

    #[test]
    fn title_header_and_body_follow_the_cursor() {
        let mut spec = table("A1", Some("Sales"), vec![column("Qty", EnumColumnType::Number)]);
        spec.rows = vec![vec![literal("3")]];

        let layout = plan_table_layout(&spec, &config_plain()).expect("layout");

        let title = layout.title.expect("title");
        assert_eq!((title.row_idx_start, title.col_idx_start), (0, 0));
        assert_eq!(title.width(), 1);
        assert_eq!(layout.header_cells.len(), 1);
        assert_eq!(layout.header_cells[0].row_idx, 1);
        assert_eq!(
            layout.header_cells[0].cell.value,
            EnumRenderedValue::Text("Qty".to_string())
        );
        assert_eq!(layout.body_cells.len(), 1);
        assert_eq!(
            (layout.body_cells[0].row_idx, layout.body_cells[0].col_idx),
            (2, 0)
        );
        assert_eq!(layout.body_cells[0].cell.value, EnumRenderedValue::Number(3.0));
        assert_eq!(layout.body_cells[0].cell.num_format.as_deref(), Some("0"));
        assert_eq!(layout.row_idx_next, 3);
    }

    #[test]
    fn title_merges_across_every_column_from_the_anchor() {
        let spec = table(
            "C4",
            Some("Quarterly"),
            vec![
                column("a", EnumColumnType::Text),
                column("b", EnumColumnType::Text),
                column("c", EnumColumnType::Text),
                column("d", EnumColumnType::Text),
            ],
        );

        let layout = plan_table_layout(&spec, &config_plain()).expect("layout");

        let title = layout.title.expect("title");
        assert_eq!(title.row_idx_start, 3);
        assert_eq!(title.col_idx_start, 2);
        assert_eq!(title.col_idx_end, 5);
        assert_eq!(title.width(), 4);
        let l_cols: Vec<usize> = layout.header_cells.iter().map(|c| c.col_idx).collect();
        assert_eq!(l_cols, vec![2, 3, 4, 5]);
        assert!(layout.header_cells.iter().all(|c| c.row_idx == 4));
    }

    #[test]
    fn zero_column_title_spans_one_cell() {
        let spec = table("B2", Some("Empty"), vec![]);
        let layout = plan_table_layout(&spec, &config_plain()).expect("layout");

        let title = layout.title.expect("title");
        assert_eq!(title.width(), 1);
        assert_eq!(title.col_idx_start, 1);
        assert!(layout.header_cells.is_empty());
        assert_eq!(layout.row_idx_next, 2);
    }

    #[test]
    fn empty_rows_still_place_title_and_header() {
        let spec = table(
            "A1",
            Some("Nothing yet"),
            vec![column("x", EnumColumnType::Text), column("y", EnumColumnType::Text)],
        );
        let config = SpecExcelConfig {
            auto_filter: true,
            auto_fit_column_width: false,
            ..Default::default()
        };

        let layout = plan_table_layout(&spec, &config).expect("layout");
        assert!(layout.title.is_some());
        assert_eq!(layout.header_cells.len(), 2);
        assert!(layout.body_cells.is_empty());
        assert_eq!(layout.autofilter, None);
    }

    #[test]
    fn skip_header_starts_body_under_title() {
        let mut spec = table("A1", Some("T"), vec![column("x", EnumColumnType::Text)]);
        spec.skip_header = true;
        spec.rows = vec![vec![literal("v")]];

        let layout = plan_table_layout(&spec, &config_plain()).expect("layout");
        assert!(layout.header_cells.is_empty());
        assert_eq!(layout.body_cells[0].row_idx, 1);
    }

    #[test]
    fn missing_and_extra_cells_are_ignored() {
        let mut spec = table(
            "A1",
            None,
            vec![column("x", EnumColumnType::Text), column("y", EnumColumnType::Text)],
        );
        spec.rows = vec![
            vec![literal("only-first")],
            vec![None, literal("only-second")],
            vec![literal("a"), literal("b"), literal("overflow")],
        ];

        let layout = plan_table_layout(&spec, &config_plain()).expect("layout");
        let l_positions: Vec<(usize, usize)> = layout
            .body_cells
            .iter()
            .map(|c| (c.row_idx, c.col_idx))
            .collect();
        assert_eq!(l_positions, vec![(1, 0), (2, 1), (3, 0), (3, 1)]);
    }

    #[test]
    fn autofilter_spans_data_rows_and_all_columns() {
        let mut spec = table(
            "B2",
            Some("T"),
            vec![column("x", EnumColumnType::Text), column("y", EnumColumnType::Text)],
        );
        spec.rows = vec![vec![literal("1")], vec![literal("2")], vec![literal("3")]];
        let config = SpecExcelConfig {
            auto_filter: true,
            auto_fit_column_width: false,
            ..Default::default()
        };

        let layout = plan_table_layout(&spec, &config).expect("layout");
        assert_eq!(
            layout.autofilter,
            Some(SpecCellRange {
                row_idx_first: 3,
                col_idx_first: 1,
                row_idx_last: 5,
                col_idx_last: 2,
            })
        );
    }

    #[test]
    fn autofit_uses_widest_header_or_body_value_plus_two() {
        let mut spec = table(
            "A1",
            Some("A very long title that is not measured"),
            vec![column("Name", EnumColumnType::Text), column("Qty", EnumColumnType::Number)],
        );
        spec.rows = vec![
            vec![literal("Bob"), literal("12345.4")],
            vec![literal("Alexandria"), None],
            vec![
                Some(EnumCellInput::StaticValue { value: None }),
                literal("7"),
            ],
        ];
        let config = SpecExcelConfig {
            auto_fit_column_width: true,
            ..Default::default()
        };

        let layout = plan_table_layout(&spec, &config).expect("layout");
        assert_eq!(
            layout.column_widths,
            vec![
                SpecColumnWidth {
                    col_idx: 0,
                    width: ("Alexandria".len() + 2) as f64,
                },
                SpecColumnWidth {
                    col_idx: 1,
                    width: ("12345".len() + 2) as f64,
                },
            ]
        );
    }

    #[test]
    fn invalid_anchor_is_rejected() {
        let spec = table("1A", None, vec![column("x", EnumColumnType::Text)]);
        assert!(matches!(
            plan_table_layout(&spec, &config_plain()),
            Err(XlsxGenerationError::InvalidCellReference(_))
        ));
    }

    #[test]
    fn table_past_last_column_overflows() {
        let spec = table(
            "XFD1",
            None,
            vec![column("x", EnumColumnType::Text), column("y", EnumColumnType::Text)],
        );
        assert!(matches!(
            plan_table_layout(&spec, &config_plain()),
            Err(XlsxGenerationError::IndexOverflow { axis: "column", .. })
        ));
    }
}
