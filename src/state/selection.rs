//! Selection set for batch downloads
//!
//! The set is always scoped to the list on screen: every replacement of that
//! list goes through `on_list_replaced`, which drops ids that are gone.

use std::collections::HashSet;

/// Externally observable outputs of the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    pub count: usize,
    pub batch_action_enabled: bool,
    pub all_selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<String>,
    scope: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the id if absent, remove it if present.
    ///
    /// Ids outside the current list are ignored.
    pub fn toggle(&mut self, id: &str) {
        if self.selected.remove(id) {
            return;
        }
        if self.scope.iter().any(|s| s == id) {
            self.selected.insert(id.to_string());
        } else {
            tracing::debug!("Ignoring toggle for {} (not on screen)", id);
        }
    }

    /// Replace the selection with the given ids of the current list
    pub fn select_all(&mut self, ids: &[String]) {
        self.selected = ids.iter().cloned().collect();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Rescope to a new list, keeping only ids still present in it
    pub fn on_list_replaced(&mut self, new_ids: Vec<String>) {
        let keep: HashSet<&str> = new_ids.iter().map(String::as_str).collect();
        self.selected.retain(|id| keep.contains(id.as_str()));
        self.scope = new_ids;
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn batch_action_enabled(&self) -> bool {
        self.count() > 0
    }

    pub fn all_selected(&self) -> bool {
        self.count() > 0 && self.count() == self.scope.len()
    }

    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            count: self.count(),
            batch_action_enabled: self.batch_action_enabled(),
            all_selected: self.all_selected(),
        }
    }

    /// Selected ids in on-screen order
    pub fn ordered(&self) -> Vec<&str> {
        self.scope
            .iter()
            .filter(|id| self.selected.contains(id.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn scoped(values: &[&str]) -> Selection {
        let mut selection = Selection::new();
        selection.on_list_replaced(ids(values));
        selection
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let mut selection = scoped(&["a", "b", "c"]);
        selection.toggle("b");
        let before = selection.clone();

        selection.toggle("a");
        selection.toggle("a");
        assert_eq!(selection, before);

        selection.toggle("b");
        selection.toggle("b");
        assert_eq!(selection, before);
    }

    #[test]
    fn test_toggle_outside_scope_is_ignored() {
        let mut selection = scoped(&["a"]);
        selection.toggle("zzz");
        assert_eq!(selection.count(), 0);
    }

    #[test]
    fn test_select_all_then_clear_all() {
        let list = ids(&["a", "b", "c"]);
        let mut selection = scoped(&["a", "b", "c"]);

        selection.select_all(&list);
        assert_eq!(
            selection.summary(),
            SelectionSummary {
                count: 3,
                batch_action_enabled: true,
                all_selected: true
            }
        );

        selection.clear_all();
        assert_eq!(selection.count(), 0);
        assert!(!selection.all_selected());
        assert!(!selection.batch_action_enabled());
    }

    #[test]
    fn test_empty_list_is_never_all_selected() {
        let mut selection = scoped(&[]);
        selection.select_all(&[]);
        assert!(!selection.all_selected());
    }

    #[test]
    fn test_list_replacement_keeps_intersection() {
        let mut selection = scoped(&["a", "b", "c", "d"]);
        selection.toggle("a");
        selection.toggle("b");
        selection.toggle("c");

        selection.on_list_replaced(ids(&["b", "c", "x"]));
        assert!(!selection.contains("a"));
        assert!(selection.contains("b"));
        assert!(selection.contains("c"));
        assert_eq!(selection.count(), 2);
        assert_eq!(selection.ordered(), vec!["b", "c"]);
    }

    #[test]
    fn test_two_of_five_then_replacement_drops_one() {
        let mut selection = scoped(&["1", "2", "3", "4", "5"]);
        selection.toggle("2");
        selection.toggle("4");

        selection.on_list_replaced(ids(&["1", "2", "3", "5", "6"]));
        let summary = selection.summary();
        assert_eq!(summary.count, 1);
        assert!(summary.batch_action_enabled);
        assert!(!summary.all_selected);
    }

    #[test]
    fn test_disjoint_replacement_clears() {
        let mut selection = scoped(&["a", "b"]);
        selection.select_all(&ids(&["a", "b"]));
        selection.on_list_replaced(ids(&["c", "d"]));
        assert_eq!(selection.count(), 0);
    }
}
