use std::io;

use crate::drafts::{DraftMeta, DraftStore};

#[derive(Debug)]
struct HistoryEntry {
    meta: DraftMeta,
    // lowercased once at refresh so filtering stays cheap per keystroke
    content_lc: String,
    name_lc: String,
}

/// Browsing state for the draft history panel: the loaded entries, a
/// live substring filter, and the current selection.
///
/// The filter matches case-insensitively against either the filename or
/// the draft content.
#[derive(Debug, Default)]
pub struct HistoryState {
    entries: Vec<HistoryEntry>,
    pub query: String,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reload the listing from disk. Selection resets; the query is
    /// kept so reopening the panel preserves an in-progress search.
    pub fn refresh(&mut self, store: &DraftStore) -> io::Result<()> {
        self.entries = store
            .list()?
            .into_iter()
            .map(|meta| {
                let content_lc = store.read(&meta.path).unwrap_or_default().to_lowercase();
                let name_lc = meta.file_name.to_lowercase();
                HistoryEntry {
                    meta,
                    content_lc,
                    name_lc,
                }
            })
            .collect();
        self.selected = 0;
        self.scroll_offset = 0;
        Ok(())
    }

    /// Entries matching the current filter, newest first
    pub fn visible(&self) -> Vec<&DraftMeta> {
        let query = self.query.to_lowercase();
        self.entries
            .iter()
            .filter(|e| {
                query.is_empty() || e.name_lc.contains(&query) || e.content_lc.contains(&query)
            })
            .map(|e| &e.meta)
            .collect()
    }

    pub fn selected_draft(&self) -> Option<&DraftMeta> {
        self.visible().into_iter().nth(self.selected)
    }

    pub fn push_query_char(&mut self, c: char) {
        self.query.push(c);
        self.clamp_selection();
    }

    pub fn pop_query_char(&mut self) {
        self.query.pop();
        self.clamp_selection();
    }

    pub fn select_next(&mut self) {
        let len = self.visible().len();
        if len > 0 && self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
        self.scroll_offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tempfile::tempdir;

    fn store_with_drafts() -> (tempfile::TempDir, DraftStore) {
        let dir = tempdir().unwrap();
        let store = DraftStore::new(dir.path());
        let t = |s| Local.with_ymd_and_hms(2026, 1, 10, 9, 0, s).unwrap();
        store.persist_snapshot("the quick brown fox", t(1)).unwrap();
        store.persist_snapshot("slow green turtle", t(2)).unwrap();
        store.persist_snapshot("Quick thoughts again", t(3)).unwrap();
        (dir, store)
    }

    #[test]
    fn refresh_loads_newest_first() {
        let (_dir, store) = store_with_drafts();
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        let visible = hist.visible();
        assert_eq!(visible.len(), 3);
        assert!(visible[0].file_name > visible[2].file_name);
    }

    #[test]
    fn filter_matches_content_case_insensitively() {
        let (_dir, store) = store_with_drafts();
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        for c in "QUICK".chars() {
            hist.push_query_char(c);
        }
        assert_eq!(hist.visible().len(), 2);
    }

    #[test]
    fn filter_matches_filename() {
        let (_dir, store) = store_with_drafts();
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        for c in "20260110-090002".chars() {
            hist.push_query_char(c);
        }
        assert_eq!(hist.visible().len(), 1);
        assert_eq!(hist.visible()[0].word_count, 3);
    }

    #[test]
    fn narrowing_filter_clamps_selection() {
        let (_dir, store) = store_with_drafts();
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        hist.select_next();
        hist.select_next();
        assert_eq!(hist.selected, 2);
        for c in "turtle".chars() {
            hist.push_query_char(c);
        }
        assert_eq!(hist.visible().len(), 1);
        assert_eq!(hist.selected, 0);
    }

    #[test]
    fn selection_is_bounded() {
        let (_dir, store) = store_with_drafts();
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        hist.select_prev();
        assert_eq!(hist.selected, 0);
        for _ in 0..10 {
            hist.select_next();
        }
        assert_eq!(hist.selected, 2);
    }

    #[test]
    fn selected_draft_follows_filter() {
        let (_dir, store) = store_with_drafts();
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        for c in "fox".chars() {
            hist.push_query_char(c);
        }
        let selected = hist.selected_draft().unwrap();
        assert_eq!(selected.word_count, 4);
    }

    #[test]
    fn empty_store_has_no_selection() {
        let dir = tempdir().unwrap();
        let store = DraftStore::new(dir.path());
        let mut hist = HistoryState::new();
        hist.refresh(&store).unwrap();
        assert!(hist.visible().is_empty());
        assert!(hist.selected_draft().is_none());
    }
}
