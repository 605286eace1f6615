//! ラベル解決モジュール
//!
//! 分類器が返すカテゴリトークン（数値インデックス / "index: name" / 文字列）を
//! ラベル表を使って表示用ラベルに変換する。
//! 表示用の補助処理なので失敗はしない。解釈できなければ元のトークンを返す。

/// ラベル表（インデックス → ラベル名）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// 改行区切りテキストからラベル表を作成
    ///
    /// 各行をトリムし、空行は除外する。行順がインデックスになる。
    pub fn parse(text: &str) -> Self {
        let labels = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self { labels }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// 符号付きインデックスで引く（範囲外・負数は None）
    fn lookup(&self, index: i64) -> Option<&str> {
        usize::try_from(index).ok().and_then(|i| self.get(i))
    }
}

/// カテゴリトークンを表示用ラベルに解決
///
/// # Examples
/// ```
/// use vision_helper_common::{resolve_label, LabelTable};
///
/// let table = LabelTable::parse("background\ntench\ngoldfish\n");
/// assert_eq!(resolve_label("2", &table), "goldfish");
/// assert_eq!(resolve_label("1: tench", &table), "tench");
/// assert_eq!(resolve_label("7", &table), "Unknown (7)");
/// assert_eq!(resolve_label("tabby cat", &table), "tabby cat");
/// ```
pub fn resolve_label(raw_token: &str, table: &LabelTable) -> String {
    // 数字と空白のみ
    if raw_token.chars().all(|c| c.is_ascii_digit() || c.is_whitespace()) {
        return match raw_token.trim().parse::<usize>() {
            Ok(index) => match table.get(index) {
                Some(label) => label.to_string(),
                None => format!("Unknown ({})", raw_token),
            },
            // 空文字・桁あふれ
            Err(_) => raw_token.to_string(),
        };
    }

    // "0: tench" 形式
    if let Some((left, right)) = raw_token.split_once(':') {
        let Ok(index) = left.trim().parse::<i64>() else {
            return raw_token.to_string();
        };
        if let Some(label) = table.lookup(index) {
            return label.to_string();
        }
        let name = right.trim();
        return if name.is_empty() {
            raw_token.to_string()
        } else {
            name.to_string()
        };
    }

    // 既に文字列ラベル
    raw_token.to_string()
}
