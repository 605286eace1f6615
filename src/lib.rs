//! VisionHelper
//!
//! 分類結果の整形（共通ライブラリ）に、ラベル読み込み・分類器インターフェース・
//! 画像保存・ギャラリー・性能レポート出力を加えたもの。

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod gallery;
pub mod labels;
pub mod metrics;
pub mod storage;

pub use vision_helper_common as common;
