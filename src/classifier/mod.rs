//! 画像分類
//!
//! - [`OnnxClassifier`]: ONNX モデルで推論する
//! - [`ReplayClassifier`]: 記録済みの分類結果を返す（推論なし）
//!
//! 入力画像の前処理と、出力カテゴリのラベル解決（検出結果への変換）もここで行う。

mod onnx;
mod replay;
mod types;

pub use onnx::OnnxClassifier;
pub use replay::ReplayClassifier;
pub use types::{Category, ClassifierOptions, TensorLayout};

use crate::error::{Result, VisionError};
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use log::{debug, error};
use std::path::Path;
use std::time::{Duration, Instant};
use vision_helper_common::{resolve_label, DetectionResult, LabelTable};

/// 分類器インターフェース
///
/// 固定サイズの入力画像を受け取り、順序付きのカテゴリ列を返す。
pub trait Classifier {
    fn classify(&self, input: &RgbImage) -> Result<Vec<Category>>;
}

/// 入力画像を読み込む
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|e| VisionError::ImageLoad(format!("{}: {}", path.display(), e)))
}

/// モデル入力サイズ（正方形）に縮小
pub fn prepare_input(image: &DynamicImage, size: u32) -> RgbImage {
    image.resize_exact(size, size, FilterType::Triangle).to_rgb8()
}

/// 画像を分類してラベル解決済みの検出結果を返す
///
/// 失敗はしない:
/// - 出力なし → "No objects detected"
/// - 分類器エラー → "Error: ..."
pub fn analyze<C: Classifier + ?Sized>(
    classifier: &C,
    image: &DynamicImage,
    table: &LabelTable,
    options: &ClassifierOptions,
) -> Vec<DetectionResult> {
    analyze_timed(classifier, image, table, options).0
}

/// [`analyze`] と同じ。分類器の呼び出し時間（前処理を除く）も返す
pub fn analyze_timed<C: Classifier + ?Sized>(
    classifier: &C,
    image: &DynamicImage,
    table: &LabelTable,
    options: &ClassifierOptions,
) -> (Vec<DetectionResult>, Duration) {
    let input = prepare_input(image, options.input_size);

    let started = Instant::now();
    let output = classifier.classify(&input);
    let elapsed = started.elapsed();

    let detections = match output {
        Ok(categories) if !categories.is_empty() => {
            debug!("分類結果 {}件 ({:?})", categories.len(), elapsed);
            categories
                .iter()
                .map(|c| DetectionResult::new(resolve_label(&c.label, table), c.score))
                .collect()
        }
        Ok(_) => vec![DetectionResult::no_objects()],
        Err(e) => {
            error!("画像解析エラー: {}", e);
            vec![DetectionResult::new(format!("Error: {}", e), 0.0)]
        }
    };
    (detections, elapsed)
}
