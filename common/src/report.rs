//! 性能レポート生成
//!
//! 固定順のテキストレポートを組み立てる。保存は呼び出し側が行う。

use crate::formatter::format_half_up;
use crate::types::PerformanceMetrics;
use chrono::{Local, NaiveDateTime};
use std::fmt::Write;

const BANNER: &str = "======================================";
const RULE: &str = "--------------------------------------";
const TITLE: &str = "       VISIONHELPER PERFORMANCE REPORT";

/// 現在時刻でレポートを生成
pub fn build_report(metrics: &PerformanceMetrics, notes: &str) -> String {
    build_report_at(metrics, notes, Local::now().naive_local())
}

/// 指定時刻でレポートを生成
///
/// 備考セクションは `notes` が空でない場合のみ出力する。
pub fn build_report_at(
    metrics: &PerformanceMetrics,
    notes: &str,
    generated_at: NaiveDateTime,
) -> String {
    let mut out = String::new();
    // String への書き込みは失敗しない
    let _ = write_report(&mut out, metrics, notes, generated_at);
    out
}

fn write_report(
    out: &mut String,
    metrics: &PerformanceMetrics,
    notes: &str,
    generated_at: NaiveDateTime,
) -> std::fmt::Result {
    writeln!(out, "{}", BANNER)?;
    writeln!(out, "{}", TITLE)?;
    writeln!(out, "{}", BANNER)?;
    writeln!(out)?;

    section(out, "DEVICE INFORMATION")?;
    writeln!(out, "Device: {}", metrics.device_info)?;
    writeln!(out, "OS: {}", metrics.os_version)?;
    writeln!(out)?;

    section(out, "MODEL INFORMATION")?;
    writeln!(out, "Model: {}", metrics.model_name)?;
    writeln!(out)?;

    section(out, "PERFORMANCE METRICS")?;
    writeln!(out, "Average Inference Time: {} ms", metrics.average_inference_time_ms)?;
    writeln!(
        out,
        "Frames Per Second: {} FPS",
        format_half_up(f64::from(metrics.frames_per_second), 1)
    )?;
    writeln!(out)?;

    if !notes.is_empty() {
        section(out, "ADDITIONAL NOTES")?;
        writeln!(out, "{}", notes)?;
        writeln!(out)?;
    }

    writeln!(
        out,
        "Report generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "{}", BANNER)
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", RULE)
}
