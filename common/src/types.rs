//! 共有データ型
//!
//! - DetectionResult: 分類器1回分の出力（ラベル解決済み）
//! - GalleryItem: 保存済み画像1枚
//! - PerformanceMetrics: 性能レポート用のスナップショット

use crate::error::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 検出結果（ラベル + 信頼度）
///
/// 信頼度はモデルの生スコア。リスト全体で合計1になる保証はない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub label: String,
    pub confidence: f32,
}

impl DetectionResult {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// 「検出なし」を表す番兵
    pub fn no_objects() -> Self {
        Self::new(crate::formatter::NO_OBJECTS_DETECTED, 0.0)
    }
}

/// ギャラリー項目
///
/// `identity` はパス（URI）。同一性は内容ではなく identity で判定する。
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub identity: String,
    pub detection_label: String,
    pub captured_at: DateTime<Local>,
}

/// 性能メトリクス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub device_info: String,
    #[serde(alias = "androidVersion")]
    pub os_version: String,
    pub model_name: String,
    pub average_inference_time_ms: u64,
    pub frames_per_second: f32,
}

impl PerformanceMetrics {
    /// JSON文字列から読み込み
    pub fn from_json(json: &str) -> Result<Self> {
        let metrics: Self = serde_json::from_str(json)?;
        Ok(metrics)
    }
}
