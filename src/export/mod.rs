//! 性能レポートの書き出し

use crate::error::{Result, VisionError};
use chrono::{Local, NaiveDateTime};
use log::info;
use std::path::{Path, PathBuf};
use vision_helper_common::{build_report_at, filename, PerformanceMetrics};

/// メトリクスJSON（deviceInfo, androidVersion/osVersion, ...）を読み込む
pub fn read_metrics(path: &Path) -> Result<PerformanceMetrics> {
    if !path.is_file() {
        return Err(VisionError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(PerformanceMetrics::from_json(&content)?)
}

/// レポートを `dir` に書き出してパスを返す
///
/// ファイル名: `VisionHelper_Performance_<yyyyMMdd_HHmmss>.txt`
pub async fn export_report(
    metrics: &PerformanceMetrics,
    notes: &str,
    dir: &Path,
) -> Result<PathBuf> {
    export_report_at(metrics, notes, dir, Local::now().naive_local()).await
}

pub async fn export_report_at(
    metrics: &PerformanceMetrics,
    notes: &str,
    dir: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let content = build_report_at(metrics, notes, generated_at);
    let path = dir.join(filename::report_file_name(generated_at));

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, content).await?;

    info!("レポート出力: {}", path.display());
    Ok(path)
}
