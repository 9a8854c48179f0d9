//! Script catalog: ordered script names plus the current selection.

/// Editor language hint derived from a script name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLanguage {
    Python,
    PlainText,
}

impl ScriptLanguage {
    pub fn of(name: &str) -> Self {
        if name.ends_with(".py") {
            Self::Python
        } else {
            Self::PlainText
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::PlainText => "plaintext",
        }
    }
}

/// Invariant: `selected`, when set, is always a member of `names`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptCatalog {
    names: Vec<String>,
    selected: Option<String>,
}

impl ScriptCatalog {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_deref()?;
        self.names.iter().position(|n| n == selected)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Select `name`. Returns true only if the selection changed;
    /// unknown names are refused.
    pub fn select(&mut self, name: &str) -> bool {
        if !self.contains(name) || self.selected.as_deref() == Some(name) {
            return false;
        }
        self.selected = Some(name.to_string());
        true
    }

    /// Replace the name list. The current selection survives if still
    /// listed; otherwise the first name is selected. Returns true if
    /// the selection changed.
    pub fn replace(&mut self, names: Vec<String>) -> bool {
        self.names = names;
        let keep = self
            .selected
            .as_deref()
            .is_some_and(|s| self.names.iter().any(|n| n == s));
        if keep {
            return false;
        }
        let next = self.names.first().cloned();
        let changed = next != self.selected;
        self.selected = next;
        changed
    }

    /// Name `offset` positions away from the selection, clamped to the
    /// ends of the list.
    pub fn neighbor(&self, offset: isize) -> Option<&str> {
        if self.names.is_empty() {
            return None;
        }
        let current = self.selected_index().unwrap_or(0) as isize;
        let last = self.names.len() as isize - 1;
        let target = (current + offset).clamp(0, last) as usize;
        self.names.get(target).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(names: &[&str]) -> ScriptCatalog {
        let mut c = ScriptCatalog::default();
        c.replace(names.iter().map(|s| s.to_string()).collect());
        c
    }

    #[test]
    fn replace_selects_first() {
        let c = catalog(&["a.py", "b.txt"]);
        assert_eq!(c.selected(), Some("a.py"));
    }

    #[test]
    fn replace_empty_leaves_nothing_selected() {
        let c = catalog(&[]);
        assert_eq!(c.selected(), None);
        assert!(c.is_empty());
    }

    #[test]
    fn replace_keeps_surviving_selection() {
        let mut c = catalog(&["a.py", "b.txt"]);
        c.select("b.txt");
        let changed = c.replace(vec!["c.py".into(), "b.txt".into()]);
        assert!(!changed);
        assert_eq!(c.selected(), Some("b.txt"));
    }

    #[test]
    fn replace_drops_vanished_selection() {
        let mut c = catalog(&["a.py", "b.txt"]);
        c.select("b.txt");
        assert!(c.replace(vec!["c.py".into()]));
        assert_eq!(c.selected(), Some("c.py"));
    }

    #[test]
    fn select_refuses_unknown_names() {
        let mut c = catalog(&["a.py"]);
        assert!(!c.select("missing.py"));
        assert_eq!(c.selected(), Some("a.py"));
    }

    #[test]
    fn select_same_name_is_not_a_change() {
        let mut c = catalog(&["a.py", "b.txt"]);
        assert!(!c.select("a.py"));
        assert!(c.select("b.txt"));
    }

    #[test]
    fn neighbor_clamps() {
        let c = catalog(&["a", "b", "c"]);
        assert_eq!(c.neighbor(1), Some("b"));
        assert_eq!(c.neighbor(-1), Some("a"));
        assert_eq!(c.neighbor(10), Some("c"));
        assert_eq!(catalog(&[]).neighbor(1), None);
    }

    #[test]
    fn language_hint() {
        assert_eq!(ScriptLanguage::of("hello.py"), ScriptLanguage::Python);
        assert_eq!(ScriptLanguage::of("example_prompt.txt"), ScriptLanguage::PlainText);
        assert_eq!(ScriptLanguage::Python.label(), "python");
    }
}
