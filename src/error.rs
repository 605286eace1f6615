use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("ラベルファイルを読み込めません: {0}")]
    LabelLoad(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("画像エンコードエラー: {0}")]
    ImageEncode(String),

    #[error("分類器エラー: {0}")]
    Classifier(String),

    #[error("保存に失敗しました: {0}")]
    Persist(String),

    #[error("不正なファイル名: {0}")]
    InvalidFileName(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] vision_helper_common::Error),
}

pub type Result<T> = std::result::Result<T, VisionError>;
