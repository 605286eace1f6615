//! 検出結果の表示整形
//!
//! 分類器の出力順（信頼度順を想定）をそのまま使い、並べ替えはしない。
//! "background" は表示から除外するが、入力リストからは取り除かない。

use crate::types::DetectionResult;
use serde::Serialize;

pub const NO_OBJECTS_DETECTED: &str = "No objects detected";
pub const NO_SIGNIFICANT_OBJECTS: &str = "No significant objects detected";

const BACKGROUND_LABEL: &str = "background";
const DETECTED_HEADER: &str = "Detected:\n";

/// 表示用の1行
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub label: String,
    pub confidence_percent_text: String,
}

/// 整形結果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResults {
    /// 結果一覧テキスト
    pub summary_text: String,
    /// 先頭の非background項目（タイトルケース済み）
    pub top_label: Option<String>,
    pub ranked_display: Vec<RankedEntry>,
    /// プレビュー枠に出す "Label: 80%"。None は解析中表示
    pub overlay_label: Option<String>,
}

impl FormattedResults {
    fn empty(summary: &str) -> Self {
        Self {
            summary_text: summary.to_string(),
            top_label: None,
            ranked_display: Vec::new(),
            overlay_label: None,
        }
    }
}

pub fn is_background(result: &DetectionResult) -> bool {
    result.label.eq_ignore_ascii_case(BACKGROUND_LABEL)
}

/// 空リスト、または "No objects..." 番兵1件のみ
pub fn is_empty_detection(results: &[DetectionResult]) -> bool {
    match results {
        [] => true,
        [only] => only.label.starts_with("No objects"),
        _ => false,
    }
}

/// 1文字をタイトルケースに変換
///
/// 大文字化で複数文字になる場合は先頭だけ大文字で残りは小文字（"ß" → "Ss"）。
/// 合字（ǆ など）は大文字ではなくタイトルケース文字（ǅ）になる。
pub fn titlecase_char(c: char) -> String {
    let upper: String = c.to_uppercase().collect();
    let mut chars = upper.chars();
    let Some(first) = chars.next() else {
        return c.to_string();
    };
    if !chars.as_str().is_empty() {
        // ŉ は分解後もそのまま
        if c == '\u{149}' {
            return upper;
        }
        return first.to_string() + &chars.as_str().to_lowercase();
    }

    let title = match c {
        '\u{1C4}'..='\u{1C6}' => '\u{1C5}',
        '\u{1C7}'..='\u{1C9}' => '\u{1C8}',
        '\u{1CA}'..='\u{1CC}' => '\u{1CB}',
        '\u{1F1}'..='\u{1F3}' => '\u{1F2}',
        // ジョージア文字（ムヘドルリ）はタイトルケースでも変わらない
        '\u{10D0}'..='\u{10FA}' | '\u{10FD}'..='\u{10FF}' => c,
        _ => first,
    };
    title.to_string()
}

/// 先頭文字が小文字ならタイトルケースにする
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => titlecase_char(first) + chars.as_str(),
        _ => word.to_string(),
    }
}

/// 各単語の先頭文字をタイトルケースに
///
/// 小文字で始まる単語のみ変換し、それ以外はそのまま残す。
pub fn title_case(label: &str) -> String {
    label
        .split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 小数 `decimals` 桁に丸めて整形（0.5 は切り上げ。`{:.1}` の偶数丸めとは異なる）
pub fn format_half_up(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    format!("{:.*}", decimals, rounded)
}

/// 信頼度を "80.0%" 形式に
pub fn confidence_percent(confidence: f32) -> String {
    format!("{}%", format_half_up(f64::from(confidence * 100.0), 1))
}

/// 検出結果を表示用に整形
pub fn format_results(results: &[DetectionResult]) -> FormattedResults {
    if is_empty_detection(results) {
        return FormattedResults::empty(NO_OBJECTS_DETECTED);
    }

    let ranked_display: Vec<RankedEntry> = results
        .iter()
        .filter(|r| !is_background(r))
        .map(|r| RankedEntry {
            label: title_case(&r.label),
            confidence_percent_text: confidence_percent(r.confidence),
        })
        .collect();

    if ranked_display.is_empty() {
        return FormattedResults::empty(NO_SIGNIFICANT_OBJECTS);
    }

    let mut summary_text = String::from(DETECTED_HEADER);
    for entry in &ranked_display {
        summary_text.push_str(&format!(
            "• {}: {}\n",
            entry.label, entry.confidence_percent_text
        ));
    }

    // 最大信頼度ではなくリスト順で最初の項目
    let top = results.iter().find(|r| !is_background(r));
    let top_label = top.map(|r| title_case(&r.label));
    let overlay_label = top.map(|r| {
        format!(
            "{}: {}%",
            title_case(&r.label),
            format_half_up(f64::from(r.confidence * 100.0), 0)
        )
    });

    FormattedResults {
        summary_text,
        top_label,
        ranked_display,
        overlay_label,
    }
}
