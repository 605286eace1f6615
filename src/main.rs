use anyhow::Result;
use clap::Parser;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::collections::BTreeSet;
use std::path::Path;
use vision_helper::classifier::{self, Classifier, OnnxClassifier, ReplayClassifier};
use vision_helper::cli::{Cli, Commands, GalleryAction};
use vision_helper::common::{format_results, SelectionStore};
use vision_helper::config::Config;
use vision_helper::metrics::PerformanceTracker;
use vision_helper::storage::{self, FolderSink};
use vision_helper::{export, gallery, labels};

fn init_logger(verbose: u8) {
    let mut builder = if verbose == 0 && std::env::var_os("RUST_LOG").is_some() {
        env_logger::Builder::from_env(env_logger::Env::default())
    } else {
        let level = match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        };
        let mut b = env_logger::Builder::new();
        b.filter_level(level);
        b
    };
    builder.format_timestamp(None).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Classify {
            image: image_path,
            model,
            scores,
            runs,
            labels: labels_path,
            max_results,
            threshold,
            save,
            report,
            notes,
            json,
        } => {
            let options = config.classifier_options(max_results, threshold);

            let table = match labels_path {
                Some(path) => labels::read_label_file(&path)?,
                None => labels::load_label_table(&config.labels_path, &config.fallback_labels_path),
            };

            let picture = classifier::load_image(&image_path)?;

            // 記録済み結果の再生は推論しないので計測しない
            let (classifier, measured): (Box<dyn Classifier>, bool) = match scores {
                Some(path) => (Box::new(ReplayClassifier::from_file(&path, options)?), false),
                None => {
                    let model_path = model.unwrap_or_else(|| config.model_path.clone());
                    (Box::new(OnnxClassifier::from_file(&model_path, options)?), true)
                }
            };

            let mut tracker = PerformanceTracker::default();
            let mut detections = Vec::new();
            for _ in 0..runs {
                let (result, elapsed) =
                    classifier::analyze_timed(classifier.as_ref(), &picture, &table, &options);
                if measured {
                    tracker.record(elapsed);
                }
                detections = result;
            }

            let formatted = format_results(&detections);
            if json {
                println!("{}", serde_json::to_string_pretty(&formatted)?);
            } else {
                println!("{}", formatted.summary_text.trim_end());
                if let Some(overlay) = &formatted.overlay_label {
                    debug!("オーバーレイ: {}", overlay);
                }
            }
            if measured {
                info!(
                    "推論 {}回: 平均 {:.1} ms / {:.1} FPS",
                    tracker.sample_count(),
                    tracker.average_inference_ms(),
                    tracker.frames_per_second()
                );
            }

            if save {
                let sink = FolderSink::new(&config.gallery_dir);
                let captured_at = chrono::Local::now().naive_local();
                let quality = config.jpeg_quality;
                let result = tokio::task::spawn_blocking(move || {
                    storage::save_recognized_image(&sink, &picture, &detections, captured_at, quality)
                })
                .await?;

                // 保存失敗は通知のみ
                match result {
                    Ok(saved) => println!("✔ 保存しました: {}", saved.identity),
                    Err(e) => println!("✖ 保存に失敗しました: {}", e),
                }
            }

            if report {
                if !measured {
                    println!("✖ 記録済みの分類結果では性能レポートを出力できません（--model で推論してください）");
                } else {
                    let metrics = tracker.snapshot(&config.model_name);
                    match export::export_report(&metrics, &notes, &config.reports_dir).await {
                        Ok(path) => println!("✔ レポート出力: {}", path.display()),
                        Err(e) => println!("✖ レポート出力に失敗しました: {}", e),
                    }
                }
            }
        }

        Commands::Gallery { action, dir } => {
            let folder = dir.unwrap_or_else(|| config.gallery_dir.clone());
            match action {
                GalleryAction::List => list_gallery(&folder)?,
                GalleryAction::Delete { positions, all, yes } => {
                    delete_from_gallery(&folder, &positions, all, yes)?
                }
            }
        }

        Commands::Report { metrics, notes, output, print } => {
            let metrics = export::read_metrics(&metrics)?;

            if print {
                print!("{}", vision_helper::common::build_report(&metrics, &notes));
            } else {
                let output_dir = output.unwrap_or_else(|| config.reports_dir.clone());
                let path = export::export_report(&metrics, &notes, &output_dir).await?;
                println!("✔ レポート出力: {}", path.display());
            }
        }

        Commands::Config {
            set_gallery_dir,
            set_labels,
            set_reports_dir,
            set_model,
            set_model_name,
            show,
        } => {
            let mut config = config;
            let changed = set_gallery_dir.is_some()
                || set_labels.is_some()
                || set_reports_dir.is_some()
                || set_model.is_some()
                || set_model_name.is_some();

            if let Some(dir) = set_gallery_dir {
                config.gallery_dir = dir;
            }
            if let Some(path) = set_labels {
                config.labels_path = path;
            }
            if let Some(dir) = set_reports_dir {
                config.reports_dir = dir;
            }
            if let Some(path) = set_model {
                config.model_path = path;
            }
            if let Some(name) = set_model_name {
                config.model_name = name;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  ラベル: {}", config.labels_path.display());
                println!("  予備ラベル: {}", config.fallback_labels_path.display());
                println!("  ギャラリー: {}", config.gallery_dir.display());
                println!("  レポート出力先: {}", config.reports_dir.display());
                println!("  モデル: {} ({})", config.model_name, config.model_path.display());
                println!(
                    "  入力: {:?}{}",
                    config.model_layout,
                    if config.model_quantized { " / 量子化" } else { "" }
                );
                println!("  最大件数: {}", config.max_results);
                println!("  閾値: {}", config.score_threshold);
                println!("  JPEG品質: {}", config.jpeg_quality);
            }
        }
    }

    Ok(())
}

fn list_gallery(folder: &Path) -> Result<()> {
    let items = gallery::scan_gallery(folder)?;
    if items.is_empty() {
        println!("保存画像はありません: {}", folder.display());
        return Ok(());
    }

    println!("📷 {}件 ({})", items.len(), folder.display());
    for (i, item) in items.iter().enumerate() {
        println!(
            "  [{}] {}  {}  {}",
            i + 1,
            gallery::display_label(item),
            gallery::display_date(item),
            item.identity
        );
    }
    Ok(())
}

fn delete_from_gallery(folder: &Path, positions: &[usize], all: bool, yes: bool) -> Result<()> {
    let mut items = gallery::scan_gallery(folder)?;
    let mut store = SelectionStore::new(items.len());
    store.subscribe(|count| debug!("選択中: {}件", count));
    store.set_selection_mode(true);

    if all {
        store.select_all();
    } else {
        // 1始まり → 0始まり。範囲外は toggle が無視する
        let unique: BTreeSet<usize> = positions.iter().filter_map(|p| p.checked_sub(1)).collect();
        for index in unique {
            store.toggle(index);
        }
    }

    let selected = store.selected();
    if selected.is_empty() {
        println!("削除対象がありません");
        return Ok(());
    }

    for &index in &selected {
        println!("  - {}", gallery::display_label(&items[index]));
    }
    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("{}件を削除しますか?", selected.len()))
            .default(false)
            .interact()?;
        if !confirmed {
            store.set_selection_mode(false);
            println!("中止しました");
            return Ok(());
        }
    }

    let progress = ProgressBar::new(selected.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let sink = FolderSink::new(folder);
    let summary = gallery::delete_items(&mut items, &mut store, &sink, &selected, |item| {
        progress.set_message(gallery::display_label(item));
        progress.inc(1);
    });
    progress.finish_and_clear();

    println!("{}", summary.message());
    Ok(())
}
