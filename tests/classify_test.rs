//! 分類 → ラベル解決 → 表示整形 の統合テスト

use image::DynamicImage;
use std::fs;
use tempfile::tempdir;
use vision_helper::classifier::{analyze, ClassifierOptions, ReplayClassifier};
use vision_helper::common::format_results;
use vision_helper::labels::load_label_table;

const LABELS: &str = "background\ntench\ngoldfish\ntabby cat\ntiger cat\n";

/// インデックス形式の出力が表示名になり、background は表示されない
#[test]
fn test_replay_to_display() {
    let dir = tempdir().expect("Failed to create temp dir");
    let labels_path = dir.path().join("labels.txt");
    let scores_path = dir.path().join("scores.json");
    fs::write(&labels_path, LABELS).unwrap();
    fs::write(
        &scores_path,
        r#"[
            {"label": "0", "score": 0.55},
            {"label": "3", "score": 0.42},
            {"label": "4: tiger cat", "score": 0.31},
            {"label": "1", "score": 0.05}
        ]"#,
    )
    .unwrap();

    let options = ClassifierOptions::default();
    let table = load_label_table(&labels_path, &dir.path().join("missing.txt"));
    let classifier = ReplayClassifier::from_file(&scores_path, options).unwrap();
    let detections = analyze(&classifier, &DynamicImage::new_rgb8(320, 240), &table, &options);

    // 閾値0.3・最大3件、順序維持
    let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["background", "tabby cat", "tiger cat"]);

    let formatted = format_results(&detections);
    assert_eq!(formatted.top_label.as_deref(), Some("Tabby Cat"));
    assert_eq!(
        formatted.summary_text,
        "Detected:\n• Tabby Cat: 42.0%\n• Tiger Cat: 31.0%\n"
    );
    assert_eq!(formatted.overlay_label.as_deref(), Some("Tabby Cat: 42%"));
}

/// 閾値未満しかない場合は「検出なし」
#[test]
fn test_nothing_above_threshold() {
    let options = ClassifierOptions::default();
    let classifier =
        ReplayClassifier::from_json(r#"[{"label": "2", "score": 0.1}]"#, options).unwrap();
    let table = vision_helper::common::LabelTable::parse(LABELS);
    let detections = analyze(&classifier, &DynamicImage::new_rgb8(10, 10), &table, &options);

    let formatted = format_results(&detections);
    assert_eq!(formatted.summary_text, "No objects detected");
    assert_eq!(formatted.top_label, None);
}

/// ラベル表が無くても文字列ラベルはそのまま、数値は Unknown
#[test]
fn test_without_label_table() {
    let dir = tempdir().expect("Failed to create temp dir");
    let table = load_label_table(&dir.path().join("a.txt"), &dir.path().join("b.txt"));
    assert!(table.is_empty());

    let options = ClassifierOptions::default();
    let classifier = ReplayClassifier::from_json(
        r#"[{"label": "red fox", "score": 0.7}, {"label": "12", "score": 0.6}]"#,
        options,
    )
    .unwrap();
    let detections = analyze(&classifier, &DynamicImage::new_rgb8(10, 10), &table, &options);
    let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
    assert_eq!(labels, vec!["red fox", "Unknown (12)"]);
}
