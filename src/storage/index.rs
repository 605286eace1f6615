//! ギャラリー索引
//!
//! 保存画像ごとの説明文（"Object detected: ..."）をフォルダ内のJSONに記録する。
//! 壊れている・バージョン違いの場合は空として扱い、次回保存で作り直す。

use crate::error::Result;
use chrono::{DateTime, Local};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const INDEX_FILE_NAME: &str = ".visionhelper-index.json";

/// 索引ファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryIndex {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイル名 → エントリ
    entries: BTreeMap<String, IndexEntry>,
}

/// 索引エントリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub description: String,
    pub saved_at: DateTime<Local>,
}

impl GalleryIndex {
    const CURRENT_VERSION: u32 = 1;

    pub fn index_path(folder: &Path) -> PathBuf {
        folder.join(INDEX_FILE_NAME)
    }

    /// 索引を読み込み
    pub fn load(folder: &Path) -> Self {
        let index_path = Self::index_path(folder);
        let file = match File::open(&index_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        match serde_json::from_reader::<_, GalleryIndex>(BufReader::new(file)) {
            Ok(index) if index.version == Self::CURRENT_VERSION => index,
            Ok(_) => {
                warn!("索引バージョン不一致、再生成します");
                Self::default()
            }
            Err(e) => {
                warn!("索引を読み込めません ({}): {}", index_path.display(), e);
                Self::default()
            }
        }
    }

    /// 索引を保存
    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::index_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn get(&self, file_name: &str) -> Option<&IndexEntry> {
        self.entries.get(file_name)
    }

    pub fn insert(&mut self, file_name: String, description: String, saved_at: DateTime<Local>) {
        self.entries.insert(file_name, IndexEntry { description, saved_at });
    }

    pub fn remove(&mut self, file_name: &str) -> Option<IndexEntry> {
        self.entries.remove(file_name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for GalleryIndex {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: BTreeMap::new(),
        }
    }
}
