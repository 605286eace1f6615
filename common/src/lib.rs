//! VisionHelper Common Library
//!
//! 分類結果の整形・ファイル名規約・ギャラリー選択・性能レポートの純粋ロジック。
//! ファイルI/Oは持たない。

pub mod error;
pub mod filename;
pub mod formatter;
pub mod labels;
pub mod report;
pub mod selection;
pub mod types;

pub use error::{Error, Result};
pub use filename::DecodedFileName;
pub use formatter::{
    capitalize_first, format_results, title_case, FormattedResults, RankedEntry,
};
pub use labels::{resolve_label, LabelTable};
pub use report::{build_report, build_report_at};
pub use selection::{remove_selected, DeleteSummary, SelectionStore};
pub use types::{DetectionResult, GalleryItem, PerformanceMetrics};
