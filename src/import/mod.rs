pub mod normalizer;
pub mod outcome;
pub mod pipeline;
pub mod spreadsheet;
pub mod store;

pub use normalizer::{CellValue, ImportProfile, RawRow, WinnerCandidate, normalize_row};
pub use outcome::{AdminNotices, ApiImportSummary, ImportOutcome, RowRejection};
pub use pipeline::{ImportError, run_import};
pub use spreadsheet::{TEMPLATE_FILE_NAME, decode_workbook, winner_template};
pub use store::{DbWinnerStore, WinnerStore};
