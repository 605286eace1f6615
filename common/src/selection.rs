//! ギャラリーの複数選択管理
//!
//! 外部が所有する順序付きコレクション（長さ N）に対する選択インデックス集合。
//! 表示とは切り離しており、変更は購読者へ選択件数として通知する。
//!
//! 単一スレッドからの呼び出しを前提とし、内部ロックは持たない。
//! 構造変更（削除）時、残りの選択インデックスはずらさない。
//! 複数削除は必ず降順で行うこと（[`remove_selected`] 参照）。

use std::collections::BTreeSet;

type Listener = Box<dyn FnMut(usize)>;

/// 選択状態
pub struct SelectionStore {
    len: usize,
    selected: BTreeSet<usize>,
    selection_mode: bool,
    listeners: Vec<Listener>,
}

impl SelectionStore {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            selected: BTreeSet::new(),
            selection_mode: false,
            listeners: Vec::new(),
        }
    }

    /// 選択件数の変更通知を購読
    pub fn subscribe(&mut self, listener: impl FnMut(usize) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    fn notify(&mut self) {
        let count = self.selected.len();
        for listener in &mut self.listeners {
            listener(count);
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_selection_mode(&self) -> bool {
        self.selection_mode
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// 選択中インデックス（昇順）
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// 選択を反転。範囲外は何もしない
    pub fn toggle(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
        self.notify();
    }

    pub fn select_all(&mut self) {
        self.selected = (0..self.len).collect();
        self.notify();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.notify();
    }

    /// 選択モード切り替え。解除時は選択もクリアする
    pub fn set_selection_mode(&mut self, active: bool) {
        if self.selection_mode == active {
            return;
        }
        self.selection_mode = active;
        if !active {
            self.selected.clear();
        }
        self.notify();
    }

    /// コレクションから `index` が削除された
    ///
    /// 残りのインデックスはずらさない。新しい長さの範囲外になったものだけ落とす。
    pub fn remove_at(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.selected.remove(&index);
        self.len -= 1;
        let len = self.len;
        self.selected.retain(|&i| i < len);
        self.notify();
    }

    /// コレクションが差し替えられた（再読み込みなど）
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        self.selected.retain(|&i| i < len);
        self.notify();
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("len", &self.len)
            .field("selected", &self.selected)
            .field("selection_mode", &self.selection_mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// 一括削除の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub failed: usize,
}

impl DeleteSummary {
    /// ユーザー向け通知メッセージ
    pub fn message(&self) -> String {
        match (self.deleted, self.failed) {
            (d, 0) if d > 0 => format!("{} items deleted", d),
            (d, f) if d > 0 => format!("{} deleted, {} failed", d, f),
            _ => "Failed to delete items".to_string(),
        }
    }
}

/// 選択位置の項目を降順に削除
///
/// `delete` が true を返した項目だけ `items` から取り除く。
/// 降順に処理するので、前の削除で後続の位置がずれることはない。
/// 範囲外の位置は無視する。
pub fn remove_selected<T>(
    items: &mut Vec<T>,
    positions: &[usize],
    mut delete: impl FnMut(&T) -> bool,
) -> DeleteSummary {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted.dedup();

    let mut summary = DeleteSummary::default();
    for position in sorted {
        if position >= items.len() {
            continue;
        }
        if delete(&items[position]) {
            items.remove(position);
            summary.deleted += 1;
        } else {
            summary.failed += 1;
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_store(len: usize) -> (SelectionStore, Rc<RefCell<Vec<usize>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut store = SelectionStore::new(len);
        let sink = Rc::clone(&events);
        store.subscribe(move |count| sink.borrow_mut().push(count));
        (store, events)
    }

    // =============================================
    // SelectionStore テスト
    // =============================================

    #[test]
    fn test_select_all_then_clear() {
        let (mut store, events) = recording_store(5);
        store.select_all();
        assert_eq!(store.selected_count(), 5);
        assert_eq!(store.selected(), vec![0, 1, 2, 3, 4]);
        store.clear();
        assert_eq!(store.selected_count(), 0);
        assert_eq!(*events.borrow(), vec![5, 0]);
    }

    #[test]
    fn test_double_toggle_restores_membership() {
        let (mut store, events) = recording_store(5);
        store.toggle(2);
        assert!(store.is_selected(2));
        store.toggle(2);
        assert!(!store.is_selected(2));
        assert_eq!(*events.borrow(), vec![1, 0]);

        store.select_all();
        store.toggle(2);
        store.toggle(2);
        assert!(store.is_selected(2));
        assert_eq!(store.selected_count(), 5);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let (mut store, events) = recording_store(3);
        store.toggle(3);
        store.toggle(100);
        assert_eq!(store.selected_count(), 0);
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn test_select_all_on_empty_collection() {
        let (mut store, events) = recording_store(0);
        store.select_all();
        assert_eq!(store.selected_count(), 0);
        assert_eq!(*events.borrow(), vec![0]);
    }

    #[test]
    fn test_leaving_selection_mode_clears() {
        let (mut store, events) = recording_store(4);
        store.set_selection_mode(true);
        store.toggle(1);
        store.toggle(3);
        store.set_selection_mode(false);
        assert!(!store.is_selection_mode());
        assert_eq!(store.selected_count(), 0);
        assert_eq!(*events.borrow(), vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_selection_mode_unchanged_does_not_notify() {
        let (mut store, events) = recording_store(4);
        store.set_selection_mode(false);
        store.set_selection_mode(true);
        store.set_selection_mode(true);
        assert_eq!(*events.borrow(), vec![0]);
    }

    #[test]
    fn test_remove_at_does_not_shift_indices() {
        let (mut store, events) = recording_store(5);
        store.toggle(1);
        store.toggle(3);
        store.remove_at(0);
        // 1 と 3 はそのまま（ずらすのは呼び出し側の責務）
        assert_eq!(store.len(), 4);
        assert_eq!(store.selected(), vec![1, 3]);
        assert_eq!(events.borrow().last(), Some(&2));
    }

    #[test]
    fn test_remove_at_drops_indices_past_new_end() {
        let (mut store, _) = recording_store(3);
        store.select_all();
        store.remove_at(1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.selected(), vec![0]);
    }

    #[test]
    fn test_set_len_revalidates() {
        let (mut store, events) = recording_store(5);
        store.select_all();
        store.set_len(2);
        assert_eq!(store.selected(), vec![0, 1]);
        assert_eq!(events.borrow().last(), Some(&2));
    }

    #[test]
    fn test_multiple_listeners_each_notified_once() {
        let (mut store, first) = recording_store(2);
        let second = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&second);
        store.subscribe(move |count| sink.borrow_mut().push(count));

        store.toggle(0);
        assert_eq!(*first.borrow(), vec![1]);
        assert_eq!(*second.borrow(), vec![1]);
    }

    // =============================================
    // remove_selected テスト
    // =============================================

    #[test]
    fn test_remove_selected_descending() {
        let mut items = vec!["a", "b", "c", "d", "e"];
        let summary = remove_selected(&mut items, &[1, 3, 4], |_| true);
        assert_eq!(items, vec!["a", "c"]);
        assert_eq!(summary, DeleteSummary { deleted: 3, failed: 0 });
    }

    #[test]
    fn test_remove_selected_accepts_any_input_order() {
        let mut items = vec!["a", "b", "c", "d", "e"];
        remove_selected(&mut items, &[4, 1, 3, 1], |_| true);
        assert_eq!(items, vec!["a", "c"]);
    }

    #[test]
    fn test_ascending_removal_through_store_deletes_wrong_items() {
        // 昇順に消しながら remove_at で通知すると、位置がずれて別の項目が消える
        let mut items = vec!["a", "b", "c", "d", "e"];
        let (mut store, _) = recording_store(items.len());
        store.set_selection_mode(true);
        for index in [1, 3, 4] {
            store.toggle(index);
        }

        for position in store.selected() {
            if position < items.len() {
                items.remove(position);
                store.remove_at(position);
            }
        }
        assert_eq!(items, vec!["a", "c", "d"]);
        assert_eq!(store.len(), 3);
        assert_eq!(store.selected_count(), 0);
    }

    #[test]
    fn test_descending_removal_through_store() {
        let mut items = vec!["a", "b", "c", "d", "e"];
        let (mut store, _) = recording_store(items.len());
        store.set_selection_mode(true);
        for index in [1, 3, 4] {
            store.toggle(index);
        }

        let summary = remove_selected(&mut items, &store.selected(), |_| true);
        store.set_len(items.len());
        assert_eq!(items, vec!["a", "c"]);
        assert_eq!(summary.deleted, 3);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_selected_counts_failures() {
        let mut items = vec!["a", "b", "locked", "d"];
        let summary = remove_selected(&mut items, &[0, 2, 3], |item| *item != "locked");
        assert_eq!(items, vec!["b", "locked"]);
        assert_eq!(summary, DeleteSummary { deleted: 2, failed: 1 });
    }

    #[test]
    fn test_remove_selected_ignores_out_of_range() {
        let mut items = vec!["a", "b"];
        let summary = remove_selected(&mut items, &[5, 1], |_| true);
        assert_eq!(items, vec!["a"]);
        assert_eq!(summary.deleted, 1);
    }

    #[test]
    fn test_delete_summary_message() {
        assert_eq!(DeleteSummary { deleted: 3, failed: 0 }.message(), "3 items deleted");
        assert_eq!(DeleteSummary { deleted: 2, failed: 1 }.message(), "2 deleted, 1 failed");
        assert_eq!(DeleteSummary { deleted: 0, failed: 2 }.message(), "Failed to delete items");
        assert_eq!(DeleteSummary::default().message(), "Failed to delete items");
    }
}
