//! ギャラリー（保存済み画像一覧）
//!
//! - フォルダ直下の `VisionHelper_*.jpg` を列挙
//! - ファイル名からラベルを復元（解析できなければ "Unknown"）
//! - 新しい順に並べる

use crate::error::Result;
use crate::storage::PersistenceSink;
use chrono::{DateTime, Local};
use log::{debug, warn};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use vision_helper_common::{
    capitalize_first, filename, remove_selected, title_case, DeleteSummary, GalleryItem,
    SelectionStore,
};
use walkdir::WalkDir;

/// 列挙元の1件（識別子・ファイル名・更新時刻）
#[derive(Debug, Clone)]
struct GalleryEntry {
    path: PathBuf,
    file_name: String,
    modified: DateTime<Local>,
}

fn list_entries(folder: &Path) -> Vec<GalleryEntry> {
    WalkDir::new(folder)
        .max_depth(1) // 直下のみ
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|entry| {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if !filename::is_gallery_file_name(&file_name) {
                return None;
            }
            let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
            Some(GalleryEntry {
                path: entry.path().to_path_buf(),
                file_name,
                modified: captured_time(modified, entry.path()),
            })
        })
        .collect()
}

/// 更新時刻が取れなければ最古扱い（一覧の末尾）で残す
fn captured_time(modified: Option<SystemTime>, path: &Path) -> DateTime<Local> {
    match modified {
        Some(time) => DateTime::<Local>::from(time),
        None => {
            warn!("更新時刻を取得できません: {}", path.display());
            unknown_time()
        }
    }
}

/// 更新時刻が不明な項目に使う時刻（UNIXエポック）
pub fn unknown_time() -> DateTime<Local> {
    DateTime::<Local>::from(SystemTime::UNIX_EPOCH)
}

/// ギャラリーフォルダを読み込む
///
/// フォルダが無ければ空のギャラリー。
pub fn scan_gallery(folder: &Path) -> Result<Vec<GalleryItem>> {
    if !folder.exists() {
        debug!("ギャラリーフォルダがありません: {}", folder.display());
        return Ok(Vec::new());
    }

    let items = into_items(list_entries(folder));
    debug!("ギャラリー {}件", items.len());
    Ok(items)
}

fn into_items(entries: Vec<GalleryEntry>) -> Vec<GalleryItem> {
    // ファイル名解析は純粋関数なので並列に
    let mut items: Vec<GalleryItem> = entries
        .par_iter()
        .map(|entry| GalleryItem {
            identity: entry.path.to_string_lossy().to_string(),
            detection_label: filename::label_or_unknown(&entry.file_name),
            captured_at: entry.modified,
        })
        .collect();

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(item.identity.clone()));

    // 新しい順
    items.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    items
}

/// 選択項目を削除
///
/// 降順に削除し、終わったら選択をクリアして選択モードを抜ける。
/// 個々の削除失敗は件数として返す。
pub fn delete_items<S: PersistenceSink + ?Sized>(
    items: &mut Vec<GalleryItem>,
    store: &mut SelectionStore,
    sink: &S,
    positions: &[usize],
    mut on_progress: impl FnMut(&GalleryItem),
) -> DeleteSummary {
    let summary = remove_selected(items, positions, |item| {
        on_progress(item);
        match sink.delete(&item.identity) {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("削除に失敗: {}: {}", item.identity, e);
                false
            }
        }
    });

    store.set_len(items.len());
    store.clear();
    store.set_selection_mode(false);
    summary
}

/// 一覧表示用ラベル（先頭文字のみタイトルケース）
pub fn display_label(item: &GalleryItem) -> String {
    capitalize_first(&item.detection_label)
}

/// 一覧表示用日付（例: "Mar 9, 2024"）
pub fn display_date(item: &GalleryItem) -> String {
    item.captured_at.format("%b %-d, %Y").to_string()
}

/// 詳細表示用（各単語を大文字化）
pub fn display_title(item: &GalleryItem) -> String {
    title_case(&item.detection_label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(label: &str) -> GalleryItem {
        GalleryItem {
            identity: format!("/tmp/{}.jpg", label),
            detection_label: label.to_string(),
            captured_at: Local.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_display_label_capitalizes_first_char_only() {
        assert_eq!(display_label(&item("tabby cat")), "Tabby cat");
        assert_eq!(display_label(&item("Unknown")), "Unknown");
        assert_eq!(display_label(&item("")), "");
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title(&item("tabby cat")), "Tabby Cat");
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date(&item("cat")), "Mar 9, 2024");
    }

    fn entry(name: &str, modified: Option<SystemTime>) -> GalleryEntry {
        let path = PathBuf::from("/gallery").join(name);
        GalleryEntry {
            modified: captured_time(modified, &path),
            path,
            file_name: name.to_string(),
        }
    }

    #[test]
    fn test_unreadable_time_is_kept_as_oldest() {
        let recent = SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_700_000_000);
        let items = into_items(vec![
            entry("VisionHelper_cat_20240101_120000.jpg", None),
            entry("VisionHelper_dog_20240101_120000.jpg", Some(recent)),
        ]);

        let labels: Vec<&str> = items.iter().map(|i| i.detection_label.as_str()).collect();
        assert_eq!(labels, vec!["dog", "cat"]);
        assert_eq!(items[1].captured_at, unknown_time());
    }

    #[test]
    fn test_duplicate_identities_collapse() {
        let time = Some(SystemTime::UNIX_EPOCH);
        let items = into_items(vec![
            entry("VisionHelper_cat_20240101_120000.jpg", time),
            entry("VisionHelper_cat_20240101_120000.jpg", time),
        ]);
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_display_label_uses_titlecase_letter() {
        assert_eq!(display_label(&item("ǆungla")), "ǅungla");
    }

    #[test]
    fn test_scan_missing_folder_is_empty() {
        let items = scan_gallery(Path::new("/nonexistent/VisionHelper")).unwrap();
        assert!(items.is_empty());
    }
}
