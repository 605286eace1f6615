use serde::{Deserialize, Serialize};

/// 分類器の生出力1件
///
/// `label` はインデックス・"index: name"・文字列ラベルのいずれか。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub label: String,
    pub score: f32,
}

impl Category {
    pub fn new(label: impl Into<String>, score: f32) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// モデル入力テンソルの次元順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensorLayout {
    /// [1, H, W, 3]（TFLite 由来のモデル）
    #[default]
    Nhwc,
    /// [1, 3, H, W]
    Nchw,
}

/// 分類器オプション
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOptions {
    pub max_results: usize,
    pub score_threshold: f32,
    /// モデル入力の一辺（正方形）
    pub input_size: u32,
    pub layout: TensorLayout,
    /// uint8 入出力の量子化モデルか
    pub quantized: bool,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            max_results: 3,
            score_threshold: 0.3,
            input_size: 224,
            layout: TensorLayout::Nhwc,
            quantized: true,
        }
    }
}
