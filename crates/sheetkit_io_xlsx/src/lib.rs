//! `sheetkit_io_xlsx` v1:
//! Spreadsheet layout kernel behind the generate endpoint.
//!
//! Module layout:
//! - `conf`   : constants and default presets
//! - `spec`   : request models, style config, layout plans, errors
//! - `util`   : cell references, cell coercion, naming helpers
//! - `layout` : pure table placement planner
//! - `writer` : `rust_xlsxwriter` application and workbook builder
pub mod conf;
pub mod layout;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_NUM_FORMAT_CURRENCY, C_NUM_FORMAT_DATE, C_NUM_FORMAT_INTEGER, C_NUM_FORMAT_PERCENT,
    C_OUTPUT_FILE_EXTENSION, C_OUTPUT_FILE_PREFIX, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX,
};
pub use layout::plan_table_layout;
pub use spec::{
    EnumCellInput, EnumCellScalar, EnumColumnType, EnumRenderedValue, SpecCellRange, SpecColumn,
    SpecColumnWidth, SpecExcelConfig, SpecExcelConfigPatch, SpecGeneratedFile, SpecPlacedCell,
    SpecRenderedCell, SpecRow, SpecSheet, SpecSheetHorizontalMerge, SpecTable, SpecTableLayout,
    XlsxGenerationError,
};
pub use util::{
    convert_column_index_to_letters, convert_column_letters_to_index, derive_output_file_name,
    parse_cell_reference, render_cell, resolve_column_format,
};
pub use writer::{XlsxTableStyles, XlsxWorkbookBuilder, place_table, write_table_layout};
