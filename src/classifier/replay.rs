//! 記録済み分類結果の再生
//!
//! 外部の分類器で得た出力（JSON配列）を読み込み、分類器として振る舞う。
//!
//! ```json
//! [{"label": "0", "score": 0.91}, {"label": "282: tiger cat", "score": 0.42}]
//! ```

use super::types::{Category, ClassifierOptions};
use super::Classifier;
use crate::error::{Result, VisionError};
use image::RgbImage;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct ReplayClassifier {
    categories: Vec<Category>,
    options: ClassifierOptions,
}

impl ReplayClassifier {
    pub fn new(categories: Vec<Category>, options: ClassifierOptions) -> Self {
        Self { categories, options }
    }

    pub fn from_json(json: &str, options: ClassifierOptions) -> Result<Self> {
        let categories: Vec<Category> = serde_json::from_str(json)
            .map_err(|e| VisionError::Classifier(format!("分類結果JSONパースエラー: {}", e)))?;
        Ok(Self::new(categories, options))
    }

    pub fn from_file(path: &Path, options: ClassifierOptions) -> Result<Self> {
        if !path.exists() {
            return Err(VisionError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content, options)
    }
}

impl Classifier for ReplayClassifier {
    fn classify(&self, _input: &RgbImage) -> Result<Vec<Category>> {
        // 順序は保持（並べ替えない）
        Ok(self
            .categories
            .iter()
            .filter(|c| c.score >= self.options.score_threshold)
            .take(self.options.max_results)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> RgbImage {
        RgbImage::new(224, 224)
    }

    #[test]
    fn test_threshold_and_limit_preserve_order() {
        let json = r#"[
            {"label": "0", "score": 0.35},
            {"label": "5", "score": 0.2},
            {"label": "3", "score": 0.9},
            {"label": "7", "score": 0.5},
            {"label": "9", "score": 0.4}
        ]"#;
        let classifier = ReplayClassifier::from_json(json, ClassifierOptions::default()).unwrap();
        let labels: Vec<String> = classifier
            .classify(&input())
            .unwrap()
            .into_iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec!["0", "3", "7"]);
    }

    #[test]
    fn test_invalid_json() {
        let err = ReplayClassifier::from_json("not json", ClassifierOptions::default()).unwrap_err();
        assert!(matches!(err, VisionError::Classifier(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ReplayClassifier::from_file(
            Path::new("/nonexistent/scores.json"),
            ClassifierOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, VisionError::FileNotFound(_)));
    }
}
