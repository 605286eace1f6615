//! ラベル表の読み込み
//!
//! 1. 指定ファイルを読む
//! 2. 失敗したら予備ファイル（小さいラベル表）を読む
//! 3. どちらも失敗したら空の表（ラベル解決は素通し / "Unknown" になる）

use crate::error::{Result, VisionError};
use log::{debug, warn};
use std::path::Path;
use vision_helper_common::LabelTable;

/// ラベルファイルを1つ読む
pub fn read_label_file(path: &Path) -> Result<LabelTable> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| VisionError::LabelLoad(format!("{}: {}", path.display(), e)))?;
    Ok(LabelTable::parse(&text))
}

/// 予備ファイルへのフォールバック付きで読む。失敗はしない
pub fn load_label_table(primary: &Path, fallback: &Path) -> LabelTable {
    match read_label_file(primary) {
        Ok(table) => {
            debug!("ラベル {}件を読み込み: {}", table.len(), primary.display());
            let sample: Vec<&str> = table.iter().take(5).collect();
            debug!("先頭ラベル: {}", sample.join(", "));
            return table;
        }
        Err(e) => warn!("{}", e),
    }

    match read_label_file(fallback) {
        Ok(table) => {
            debug!("予備ラベル {}件を読み込み: {}", table.len(), fallback.display());
            table
        }
        Err(e) => {
            warn!("{}", e);
            warn!("ラベル表なしで続行します");
            LabelTable::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_primary_file_used() {
        let dir = tempdir().expect("Failed to create temp dir");
        let primary = dir.path().join("labels_mobilenet.txt");
        let fallback = dir.path().join("labels.txt");
        fs::write(&primary, "background\ntench\n\ngoldfish\n").unwrap();
        fs::write(&fallback, "other\n").unwrap();

        let table = load_label_table(&primary, &fallback);
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(2), Some("goldfish"));
    }

    #[test]
    fn test_falls_back_when_primary_missing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let fallback = dir.path().join("labels.txt");
        fs::write(&fallback, "cat\ndog\n").unwrap();

        let table = load_label_table(&dir.path().join("missing.txt"), &fallback);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0), Some("cat"));
    }

    #[test]
    fn test_empty_table_when_both_missing() {
        let dir = tempdir().expect("Failed to create temp dir");
        let table = load_label_table(&dir.path().join("a.txt"), &dir.path().join("b.txt"));
        assert!(table.is_empty());
    }

    #[test]
    fn test_read_label_file_error_names_path() {
        let err = read_label_file(Path::new("/nonexistent/labels.txt")).unwrap_err();
        assert!(matches!(err, VisionError::LabelLoad(_)));
        assert!(err.to_string().contains("/nonexistent/labels.txt"));
    }
}
