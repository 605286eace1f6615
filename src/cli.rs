use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vision-helper")]
#[command(about = "画像分類結果の整形・ギャラリー管理・性能レポート出力ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力（-vv でデバッグ）
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を分類して結果を表示
    Classify {
        /// 入力画像
        #[arg(required = true)]
        image: PathBuf,

        /// ONNXモデル（省略時は設定値）
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// モデルを使わず記録済みの分類結果JSONを使う（[{"label": "...", "score": 0.9}, ...]）
        #[arg(short, long, conflicts_with = "model")]
        scores: Option<PathBuf>,

        /// 推論の繰り返し回数（性能計測用）
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        runs: u32,

        /// ラベルファイル（省略時は設定値）
        #[arg(short, long)]
        labels: Option<PathBuf>,

        /// 最大表示件数（省略時は設定値）
        #[arg(long)]
        max_results: Option<usize>,

        /// スコア閾値（省略時は設定値）
        #[arg(long)]
        threshold: Option<f32>,

        /// 結果をギャラリーに保存
        #[arg(long)]
        save: bool,

        /// 性能レポートも出力
        #[arg(long)]
        report: bool,

        /// レポートの備考
        #[arg(long, default_value = "")]
        notes: String,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// ギャラリー操作
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,

        /// ギャラリーフォルダ（省略時は設定値）
        #[arg(short, long, global = true)]
        dir: Option<PathBuf>,
    },

    /// 性能レポートを出力
    Report {
        /// メトリクスJSONファイル
        #[arg(short, long, required = true)]
        metrics: PathBuf,

        /// 備考
        #[arg(short, long, default_value = "")]
        notes: String,

        /// 出力フォルダ（省略時は設定値）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ファイルに保存せず表示のみ
        #[arg(long)]
        print: bool,
    },

    /// 設定を表示/編集
    Config {
        /// ギャラリーフォルダを設定
        #[arg(long)]
        set_gallery_dir: Option<PathBuf>,

        /// ラベルファイルを設定
        #[arg(long)]
        set_labels: Option<PathBuf>,

        /// レポート出力先を設定
        #[arg(long)]
        set_reports_dir: Option<PathBuf>,

        /// ONNXモデルを設定
        #[arg(long)]
        set_model: Option<PathBuf>,

        /// モデル名を設定
        #[arg(long)]
        set_model_name: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
pub enum GalleryAction {
    /// 保存画像を一覧表示（新しい順）
    List,

    /// 保存画像を削除
    Delete {
        /// 削除する番号（一覧の番号、1始まり）
        positions: Vec<usize>,

        /// すべて削除
        #[arg(long, conflicts_with = "positions")]
        all: bool,

        /// 確認しない
        #[arg(short, long)]
        yes: bool,
    },
}
