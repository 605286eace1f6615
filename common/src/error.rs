//! エラー型定義

use thiserror::Error;

/// 共通エラー型
///
/// 共通ライブラリはI/Oを持たないので、外部データの解析失敗のみ。
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
