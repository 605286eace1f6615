//! 画像の永続化
//!
//! 保存先は [`PersistenceSink`] で抽象化する。
//! 既定実装の [`FolderSink`] はギャラリーフォルダにJPEGを書き、
//! 説明文は索引ファイルに記録する。

pub mod index;

use crate::error::{Result, VisionError};
use chrono::{Local, NaiveDateTime};
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use index::GalleryIndex;
use log::{debug, error, warn};
use std::path::{Path, PathBuf};
use vision_helper_common::{filename, DetectionResult};

/// 永続化先
pub trait PersistenceSink {
    /// 画像データを保存し、識別子（パス / URI）を返す
    fn persist(&self, data: &[u8], file_name: &str, description: &str) -> Result<String>;

    /// 識別子で削除。存在しなければ false
    fn delete(&self, identity: &str) -> Result<bool>;
}

/// フォルダ保存
#[derive(Debug, Clone)]
pub struct FolderSink {
    dir: PathBuf,
}

impl FolderSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn validate_file_name(file_name: &str) -> Result<()> {
    let invalid = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\']);
    if invalid {
        return Err(VisionError::InvalidFileName(file_name.to_string()));
    }
    Ok(())
}

impl PersistenceSink for FolderSink {
    fn persist(&self, data: &[u8], file_name: &str, description: &str) -> Result<String> {
        validate_file_name(file_name)?;
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(file_name);
        std::fs::write(&path, data)
            .map_err(|e| VisionError::Persist(format!("{}: {}", path.display(), e)))?;

        // 索引は説明文のみ。書けなくても画像の保存は成功扱い
        let mut index = GalleryIndex::load(&self.dir);
        index.insert(file_name.to_string(), description.to_string(), Local::now());
        if let Err(e) = index.save(&self.dir) {
            warn!("索引を更新できません ({}): {}", self.dir.display(), e);
        }

        debug!("画像を保存: {}", path.display());
        Ok(path.to_string_lossy().to_string())
    }

    fn delete(&self, identity: &str) -> Result<bool> {
        let path = Path::new(identity);
        if !path.is_file() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;

        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            let mut index = GalleryIndex::load(&self.dir);
            if index.remove(name).is_some() {
                if let Err(e) = index.save(&self.dir) {
                    warn!("索引を更新できません ({}): {}", self.dir.display(), e);
                }
            }
        }
        Ok(true)
    }
}

/// 保存結果
#[derive(Debug, Clone, PartialEq)]
pub struct SavedImage {
    pub identity: String,
    pub file_name: String,
}

/// JPEGにエンコード
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    image
        .to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| VisionError::ImageEncode(e.to_string()))?;
    Ok(buffer)
}

/// 認識した画像を保存
///
/// ファイル名には検出リスト先頭のラベルを使う（空なら "unknown"）。
pub fn save_recognized_image<S: PersistenceSink + ?Sized>(
    sink: &S,
    image: &DynamicImage,
    detections: &[DetectionResult],
    captured_at: NaiveDateTime,
    jpeg_quality: u8,
) -> Result<SavedImage> {
    let top_label = detections
        .first()
        .map(|d| d.label.as_str())
        .unwrap_or("unknown");
    let file_name = filename::encode(top_label, captured_at);
    let description = format!("Object detected: {}", top_label);

    let data = encode_jpeg(image, jpeg_quality)?;
    let identity = sink.persist(&data, &file_name, &description).map_err(|e| {
        error!("画像保存エラー: {}", e);
        e
    })?;

    Ok(SavedImage { identity, file_name })
}
