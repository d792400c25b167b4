use std::ops::Range;

use todo_core::ListState;

use crate::views::render_card;

/// Viewport over the loaded cards.
///
/// Scrolling that reaches the last loaded card asks for the next page; the
/// controller ignores the request while a load is running or when nothing
/// is left to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollContainer {
    offset: usize,
    rows: usize,
}

impl ScrollContainer {
    pub fn new(rows: usize) -> Self {
        Self {
            offset: 0,
            rows: rows.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Returns `true` when the viewport now shows the last loaded card.
    pub fn scroll_down(&mut self, by: usize, loaded: usize) -> bool {
        let max = loaded.saturating_sub(self.rows);
        self.offset = self.offset.saturating_add(by).min(max);
        self.at_bottom(loaded)
    }

    pub fn scroll_up(&mut self, by: usize) {
        self.offset = self.offset.saturating_sub(by);
    }

    pub fn at_bottom(&self, loaded: usize) -> bool {
        self.offset + self.rows >= loaded
    }

    /// Keep the viewport inside a list that may have shrunk.
    pub fn clamp(&mut self, loaded: usize) {
        self.offset = self.offset.min(loaded.saturating_sub(self.rows));
    }

    pub fn visible(&self, loaded: usize) -> Range<usize> {
        let start = self.offset.min(loaded);
        start..(start + self.rows).min(loaded)
    }

    pub fn render(&self, state: &ListState) -> String {
        let tasks = state.tasks();
        let window = self.visible(tasks.len());
        let mut out = String::new();

        for i in window.clone() {
            out.push_str(&render_card(i + 1, &tasks[i]));
        }
        if state.is_loading() {
            out.push_str("Loading...\n");
        } else if tasks.is_empty() {
            out.push_str("No tasks found.\n");
        }
        if !window.is_empty() {
            out.push_str(&format!(
                "-- {}-{} of {} loaded, {} total --\n",
                window.start + 1,
                window.end,
                tasks.len(),
                state.total()
            ));
        }
        out
    }
}
