//! ONNX Runtime による分類器
//!
//! 1. 入力画像（前処理済み RGB）をテンソルに詰める
//!    - 量子化モデル: uint8 そのまま
//!    - 浮動小数モデル: (v - 127.5) / 127.5 で [-1, 1] に正規化
//! 2. 推論してクラス数分のスコアを得る（インデックス = ラベル表の行番号）
//! 3. 閾値以上をスコア降順に最大 N 件

use super::types::{Category, ClassifierOptions, TensorLayout};
use super::Classifier;
use crate::error::{Result, VisionError};
use image::RgbImage;
use log::debug;
use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;

/// 量子化出力のスケール（MobileNet quant は 1/256、ゼロ点 0）
const QUANT_OUTPUT_SCALE: f32 = 1.0 / 256.0;

const FLOAT_INPUT_MEAN: f32 = 127.5;
const FLOAT_INPUT_STD: f32 = 127.5;

pub struct OnnxClassifier {
    // run は &mut を要求する
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    options: ClassifierOptions,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("options", &self.options)
            .finish()
    }
}

fn model_error(context: &str, e: impl std::fmt::Display) -> VisionError {
    VisionError::Classifier(format!("{}: {}", context, e))
}

impl OnnxClassifier {
    /// モデルファイルからセッションを作成
    pub fn from_file(path: &Path, options: ClassifierOptions) -> Result<Self> {
        if !path.is_file() {
            return Err(VisionError::FileNotFound(path.display().to_string()));
        }
        let bytes = std::fs::read(path)?;

        let session = Session::builder()
            .map_err(|e| model_error("セッションを作成できません", e))?
            .commit_from_memory(&bytes)
            .map_err(|e| model_error(&format!("モデルを読み込めません ({})", path.display()), e))?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| VisionError::Classifier("モデルに入力がありません".into()))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| VisionError::Classifier("モデルに出力がありません".into()))?;

        debug!(
            "モデル読み込み: {} (入力 {}, 出力 {}, {:?}, 量子化 {})",
            path.display(),
            input_name,
            output_name,
            options.layout,
            options.quantized
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            options,
        })
    }

    fn run_quantized(&self, session: &mut Session, input: &RgbImage) -> Result<Vec<f32>> {
        let value = Value::from_array(to_tensor(input, self.options.layout, |v| v))
            .map_err(|e| model_error("入力テンソルを作成できません", e))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => &value])
            .map_err(|e| model_error("推論に失敗しました", e))?;
        let view = outputs[self.output_name.as_str()]
            .try_extract_array::<u8>()
            .map_err(|e| model_error("出力を取り出せません", e))?;

        Ok(view
            .iter()
            .map(|&q| f32::from(q) * QUANT_OUTPUT_SCALE)
            .collect())
    }

    fn run_float(&self, session: &mut Session, input: &RgbImage) -> Result<Vec<f32>> {
        let tensor = to_tensor(input, self.options.layout, |v| {
            (f32::from(v) - FLOAT_INPUT_MEAN) / FLOAT_INPUT_STD
        });
        let value =
            Value::from_array(tensor).map_err(|e| model_error("入力テンソルを作成できません", e))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => &value])
            .map_err(|e| model_error("推論に失敗しました", e))?;
        let view = outputs[self.output_name.as_str()]
            .try_extract_array::<f32>()
            .map_err(|e| model_error("出力を取り出せません", e))?;

        Ok(probabilities(view.iter().copied().collect()))
    }
}

impl Classifier for OnnxClassifier {
    fn classify(&self, input: &RgbImage) -> Result<Vec<Category>> {
        let mut session = self
            .session
            .lock()
            .map_err(|_| VisionError::Classifier("セッションが利用できません".into()))?;

        let scores = if self.options.quantized {
            self.run_quantized(&mut session, input)?
        } else {
            self.run_float(&mut session, input)?
        };
        debug!("出力 {}クラス", scores.len());

        Ok(top_categories(&scores, &self.options))
    }
}

/// 画像を [1, H, W, 3] または [1, 3, H, W] のテンソルに詰める
pub(crate) fn to_tensor<T: Clone + Default>(
    image: &RgbImage,
    layout: TensorLayout,
    convert: impl Fn(u8) -> T,
) -> Array4<T> {
    let (width, height) = (image.width() as usize, image.height() as usize);
    let shape = match layout {
        TensorLayout::Nhwc => (1, height, width, 3),
        TensorLayout::Nchw => (1, 3, height, width),
    };
    let mut tensor = Array4::<T>::default(shape);

    for (x, y, pixel) in image.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, &value) in pixel.0.iter().enumerate() {
            let index = match layout {
                TensorLayout::Nhwc => [0, y, x, c],
                TensorLayout::Nchw => [0, c, y, x],
            };
            tensor[index] = convert(value);
        }
    }
    tensor
}

/// 確率になっていない出力（ロジット）はソフトマックスをかける
pub(crate) fn probabilities(raw: Vec<f32>) -> Vec<f32> {
    let sum: f32 = raw.iter().sum();
    let is_distribution =
        raw.iter().all(|v| (0.0..=1.0).contains(v)) && (sum - 1.0).abs() < 1e-3;
    if is_distribution || raw.is_empty() {
        return raw;
    }

    let max = raw.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = raw.iter().map(|v| (v - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// 閾値以上をスコア降順に最大 `max_results` 件。同点はインデックス順
pub(crate) fn top_categories(scores: &[f32], options: &ClassifierOptions) -> Vec<Category> {
    let mut ranked: Vec<(usize, f32)> = scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, score)| *score >= options.score_threshold)
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .take(options.max_results)
        .map(|(index, score)| Category::new(index.to_string(), score))
        .collect()
}
