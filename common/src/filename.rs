//! 保存ファイル名の生成と解析
//!
//! 形式: `VisionHelper_<Label_With_Underscores>_<yyyyMMdd>_<HHmmss>.jpg`
//!
//! ファイル名がギャラリーの永続キーになる。ラベル中の空白は `_` に置換し、
//! 解析時に空白へ戻す。ラベル自体に `_` や `_<8桁>_<6桁>.jpg` を含む場合は
//! 元に戻せない（既知の制約）。

use chrono::NaiveDateTime;
use regex::Regex;

pub const FILE_PREFIX: &str = "VisionHelper_";
pub const IMAGE_EXTENSION: &str = ".jpg";
pub const UNKNOWN_LABEL: &str = "Unknown";

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// 解析結果
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFileName {
    pub label: String,
    /// 日付として不正な数字列の場合は None
    pub timestamp: Option<NaiveDateTime>,
}

/// ラベルと撮影時刻からファイル名を生成
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use vision_helper_common::filename;
///
/// let ts = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(14, 5, 7).unwrap();
/// assert_eq!(
///     filename::encode("red car", ts),
///     "VisionHelper_red_car_20240309_140507.jpg"
/// );
/// ```
pub fn encode(label: &str, timestamp: NaiveDateTime) -> String {
    format!(
        "{}{}_{}{}",
        FILE_PREFIX,
        label.replace(' ', "_"),
        timestamp.format(TIMESTAMP_FORMAT),
        IMAGE_EXTENSION
    )
}

/// ファイル名からラベルと時刻を取り出す
pub fn decode(file_name: &str) -> Option<DecodedFileName> {
    lazy_static::lazy_static! {
        static ref FILE_NAME_RE: Regex =
            Regex::new(r"VisionHelper_(.+?)_(\d{8})_(\d{6})\.jpg").unwrap();
    }

    let caps = FILE_NAME_RE.captures(file_name)?;
    let label = caps[1].replace('_', " ");
    let timestamp = NaiveDateTime::parse_from_str(
        &format!("{}_{}", &caps[2], &caps[3]),
        TIMESTAMP_FORMAT,
    )
    .ok();

    Some(DecodedFileName { label, timestamp })
}

/// 解析できなければ "Unknown"
pub fn label_or_unknown(file_name: &str) -> String {
    decode(file_name)
        .map(|d| d.label)
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

/// ギャラリー対象のファイル名か（接頭辞と拡張子のみで判定）
pub fn is_gallery_file_name(file_name: &str) -> bool {
    file_name.starts_with(FILE_PREFIX) && file_name.ends_with(IMAGE_EXTENSION)
}

/// 性能レポートのファイル名
pub fn report_file_name(timestamp: NaiveDateTime) -> String {
    format!(
        "{}Performance_{}.txt",
        FILE_PREFIX,
        timestamp.format(TIMESTAMP_FORMAT)
    )
}
