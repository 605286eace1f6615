use crate::classifier::{ClassifierOptions, TensorLayout};
use crate::error::{Result, VisionError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ラベル表（1行1ラベル）
    pub labels_path: PathBuf,
    /// 読み込み失敗時の予備ラベル表
    pub fallback_labels_path: PathBuf,
    /// 保存画像の格納先
    pub gallery_dir: PathBuf,
    /// 性能レポートの出力先
    pub reports_dir: PathBuf,
    /// 分類モデル（ONNX）
    pub model_path: PathBuf,
    pub model_name: String,
    pub model_layout: TensorLayout,
    /// uint8 入出力の量子化モデルか
    pub model_quantized: bool,
    pub max_results: usize,
    pub score_threshold: f32,
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.validate()?;
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| VisionError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("vision-helper").join("config.json"))
    }

    fn default_config() -> Self {
        let pictures = dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."));
        let documents = dirs::document_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            labels_path: PathBuf::from("labels_mobilenet_quant_v1_224.txt"),
            fallback_labels_path: PathBuf::from("labels.txt"),
            gallery_dir: pictures.join("VisionHelper"),
            reports_dir: documents.join("VisionHelper"),
            model_path: PathBuf::from("mobilenet_v1_1.0_224_quant.onnx"),
            model_name: "mobilenet_v1_1.0_224_quant".into(),
            model_layout: TensorLayout::Nhwc,
            model_quantized: true,
            max_results: 3,
            score_threshold: 0.3,
            jpeg_quality: 90,
        }
    }

    /// 分類器オプション。CLI 指定があればそちらを優先
    pub fn classifier_options(
        &self,
        max_results: Option<usize>,
        threshold: Option<f32>,
    ) -> ClassifierOptions {
        ClassifierOptions {
            max_results: max_results.unwrap_or(self.max_results),
            score_threshold: threshold.unwrap_or(self.score_threshold),
            layout: self.model_layout,
            quantized: self.model_quantized,
            ..ClassifierOptions::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(VisionError::Config(format!(
                "jpeg_quality は 1-100 で指定してください: {}",
                self.jpeg_quality
            )));
        }
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(VisionError::Config(format!(
                "score_threshold は 0.0-1.0 で指定してください: {}",
                self.score_threshold
            )));
        }
        if self.max_results == 0 {
            return Err(VisionError::Config("max_results は 1 以上".into()));
        }
        Ok(())
    }
}
