//! # Tag Selector
//!
//! Suggestion filtering and the selected-tag set, with no rendering attached.
//!
//! ```text
//! TagSelector
//! ├── query: String                 // current input text
//! ├── suggestions: Vec<Suggestion>  // static labels + hidden/selected flags
//! ├── selected: SelectedTagSet      // insertion-ordered, de-duplicated
//! ├── expanded: bool                // suggestion list open
//! └── no_results: bool              // zero suggestions match the query
//! ```
//!
//! Every mutation of the selected set returns a [`TagsChanged`] message.
//! The selector never talks to the fetch panel; the reducer in
//! `core::action` delivers the message.

use std::fmt;

use log::debug;

/// A normalized filter keyword: trimmed and lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Normalizes `raw`. Returns `None` when nothing is left after trimming,
    /// or when it contains the `,` tag separator.
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().to_lowercase();
        if value.is_empty() || value.contains(',') {
            None
        } else {
            Some(Self(value))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message emitted after every change to the selected set.
///
/// Carries an owned copy of the tags in insertion order, so later edits to
/// the selector never reach a request that was already built from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagsChanged {
    pub tags: Vec<Tag>,
}

/// Insertion-ordered set of selected tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedTagSet {
    tags: Vec<Tag>,
}

impl SelectedTagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the tag was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Returns false if the tag was not present.
    pub fn remove(&mut self, tag: &Tag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t != tag);
        self.tags.len() != before
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Tag> {
        self.tags.clone()
    }

    /// Comma-joined form used in request paths.
    pub fn joined(&self) -> String {
        join_tags(&self.tags)
    }
}

/// Joins tags with commas, e.g. `grumpy,hat`.
pub fn join_tags(tags: &[Tag]) -> String {
    tags.iter().map(Tag::as_str).collect::<Vec<_>>().join(",")
}

/// One entry of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Label as configured, shown verbatim.
    pub label: String,
    /// Normalized label. `None` for blank labels, which can't be selected.
    pub tag: Option<Tag>,
    pub hidden: bool,
    pub selected: bool,
}

impl Suggestion {
    fn new(label: String) -> Self {
        let tag = Tag::parse(&label);
        Self {
            label,
            tag,
            hidden: false,
            selected: false,
        }
    }

    fn matches(&self, query: &str) -> bool {
        self.label.trim().to_lowercase().starts_with(query)
    }
}

/// Focusable regions of the screen, used to decide whether a blur closes
/// the suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Input,
    Suggestions,
    Chips,
    Results,
}

#[derive(Debug, Clone)]
pub struct TagSelector {
    query: String,
    suggestions: Vec<Suggestion>,
    selected: SelectedTagSet,
    expanded: bool,
    no_results: bool,
}

impl TagSelector {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let suggestions: Vec<Suggestion> = labels
            .into_iter()
            .map(|l| Suggestion::new(l.into()))
            .collect();
        let no_results = suggestions.is_empty();
        Self {
            query: String::new(),
            suggestions,
            selected: SelectedTagSet::new(),
            expanded: false,
            no_results,
        }
    }

    /// Hides every suggestion whose label doesn't start with `query`
    /// (case-insensitive) and recomputes the no-results flag.
    pub fn filter_suggestions(&mut self, query: &str) {
        self.query = query.to_string();
        let needle = query.to_lowercase();
        let mut visible = 0usize;

        for item in &mut self.suggestions {
            item.hidden = !item.matches(&needle);
            if !item.hidden {
                visible += 1;
            }
        }

        self.no_results = visible == 0;
        debug!("Filtered suggestions for {:?}: {} visible", query, visible);
    }

    /// Adds the suggestion at `index` to the selection.
    ///
    /// Selecting an already-selected tag is a no-op and returns `None`.
    pub fn select_suggestion(&mut self, index: usize) -> Option<TagsChanged> {
        let item = self.suggestions.get_mut(index)?;
        let tag = item.tag.clone()?;
        item.selected = true;

        if !self.selected.insert(tag.clone()) {
            debug!("Tag '{}' already selected", tag);
            return None;
        }

        debug!("Selected tag '{}' ({} total)", tag, self.selected.len());
        Some(self.tags_changed())
    }

    /// Removes `tag` from the selection and clears the matching suggestions'
    /// selected flag.
    pub fn remove_tag(&mut self, tag: &Tag) -> Option<TagsChanged> {
        if !self.selected.remove(tag) {
            return None;
        }

        for item in &mut self.suggestions {
            if item.tag.as_ref() == Some(tag) {
                item.selected = false;
            }
        }

        debug!("Removed tag '{}' ({} left)", tag, self.selected.len());
        Some(self.tags_changed())
    }

    pub fn on_input_focus(&mut self) {
        self.expanded = true;
    }

    /// Keeps the list open only if focus moved into it.
    pub fn on_input_blur(&mut self, moved_to: Option<FocusTarget>) {
        if moved_to == Some(FocusTarget::Suggestions) {
            return;
        }
        self.expanded = false;
    }

    /// Keeps the list open if focus went back to the input or stayed inside.
    pub fn on_suggestions_blur(&mut self, moved_to: Option<FocusTarget>) {
        if matches!(
            moved_to,
            Some(FocusTarget::Input) | Some(FocusTarget::Suggestions)
        ) {
            return;
        }
        self.expanded = false;
    }

    /// Routes a focus move to the blur/focus handlers above.
    pub fn on_focus_change(&mut self, from: Option<FocusTarget>, to: Option<FocusTarget>) {
        match from {
            Some(FocusTarget::Input) if to != Some(FocusTarget::Input) => self.on_input_blur(to),
            Some(FocusTarget::Suggestions) => self.on_suggestions_blur(to),
            _ => {}
        }
        if to == Some(FocusTarget::Input) {
            self.on_input_focus();
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Indices of suggestions not hidden by the current query.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.suggestions
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.hidden)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn selected_tags(&self) -> &SelectedTagSet {
        &self.selected
    }

    pub fn is_selection_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    pub fn has_no_results(&self) -> bool {
        self.no_results
    }

    fn tags_changed(&self) -> TagsChanged {
        TagsChanged {
            tags: self.selected.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> Tag {
        Tag::parse(s).unwrap()
    }

    fn selector() -> TagSelector {
        TagSelector::new(["Grumpy", "Hat", "  Cute ", "cuddly", "Orange"])
    }

    #[test]
    fn test_tag_parse_normalizes() {
        assert_eq!(tag("  GrUmPy ").as_str(), "grumpy");
        assert!(Tag::parse("   ").is_none());
        assert!(Tag::parse("grumpy,hat").is_none());
    }

    #[test]
    fn test_selected_set_keeps_insertion_order() {
        let mut set = SelectedTagSet::new();
        assert!(set.insert(tag("hat")));
        assert!(set.insert(tag("grumpy")));
        assert!(!set.insert(tag("hat")));
        assert_eq!(set.joined(), "hat,grumpy");
        assert!(set.remove(&tag("hat")));
        assert!(!set.remove(&tag("hat")));
        assert_eq!(set.joined(), "grumpy");
    }

    #[test]
    fn test_new_selector_defaults() {
        let sel = selector();
        assert!(!sel.is_expanded());
        assert!(!sel.has_no_results());
        assert!(sel.is_selection_empty());
        assert_eq!(sel.visible_indices().len(), 5);
    }

    #[test]
    fn test_empty_suggestion_list_has_no_results() {
        let sel = TagSelector::new(Vec::<String>::new());
        assert!(sel.has_no_results());
    }

    #[test]
    fn test_filter_is_case_insensitive_prefix() {
        let mut sel = selector();
        sel.filter_suggestions("CU");
        assert_eq!(sel.visible_indices(), vec![2, 3]);
        assert!(!sel.has_no_results());

        // Prefix, not substring
        sel.filter_suggestions("rump");
        assert!(sel.visible_indices().is_empty());
    }

    #[test]
    fn test_filter_zero_matches_hides_everything() {
        let mut sel = selector();
        sel.filter_suggestions("zzz");
        assert!(sel.has_no_results());
        assert!(sel.suggestions().iter().all(|s| s.hidden));

        sel.filter_suggestions("");
        assert!(!sel.has_no_results());
        assert!(sel.suggestions().iter().all(|s| !s.hidden));
    }

    #[test]
    fn test_select_emits_normalized_tags() {
        let mut sel = selector();
        let msg = sel.select_suggestion(2).unwrap();
        assert_eq!(msg.tags, vec![tag("cute")]);
        assert!(sel.suggestions()[2].selected);
        assert!(!sel.is_selection_empty());
    }

    #[test]
    fn test_select_twice_is_idempotent() {
        let mut sel = selector();
        assert!(sel.select_suggestion(0).is_some());
        let before = sel.selected_tags().clone();
        assert!(sel.select_suggestion(0).is_none());
        assert_eq!(sel.selected_tags(), &before);
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut sel = selector();
        assert!(sel.select_suggestion(42).is_none());
        assert!(sel.is_selection_empty());
    }

    #[test]
    fn test_blank_suggestion_cannot_be_selected() {
        let mut sel = TagSelector::new(["   "]);
        assert!(sel.select_suggestion(0).is_none());
        assert!(!sel.suggestions()[0].selected);
    }

    #[test]
    fn test_remove_clears_suggestion_selection() {
        let mut sel = selector();
        sel.select_suggestion(0);
        sel.select_suggestion(1);

        let msg = sel.remove_tag(&tag("grumpy")).unwrap();
        assert_eq!(msg.tags, vec![tag("hat")]);
        assert!(!sel.suggestions()[0].selected);
        assert!(sel.suggestions()[1].selected);

        assert!(sel.remove_tag(&tag("grumpy")).is_none());
    }

    #[test]
    fn test_chips_track_selection_across_sequences() {
        let mut sel = selector();
        let ops: [(bool, usize); 8] = [
            (true, 0),
            (true, 1),
            (true, 0),
            (false, 0),
            (true, 4),
            (false, 1),
            (true, 1),
            (false, 4),
        ];
        let mut expected: Vec<Tag> = Vec::new();

        for (add, idx) in ops {
            let t = sel.suggestions()[idx].tag.clone().unwrap();
            let msg = if add {
                sel.select_suggestion(idx)
            } else {
                sel.remove_tag(&t)
            };
            if add && !expected.contains(&t) {
                expected.push(t);
            } else if !add {
                expected.retain(|e| e != &t);
            }
            if let Some(msg) = msg {
                assert_eq!(msg.tags, expected);
            }
            assert_eq!(sel.selected_tags().to_vec(), expected);
            assert_eq!(sel.is_selection_empty(), expected.is_empty());
            for s in sel.suggestions() {
                let in_set = s.tag.as_ref().is_some_and(|t| expected.contains(t));
                assert_eq!(s.selected, in_set, "suggestion {:?}", s.label);
            }
        }
    }

    #[test]
    fn test_focus_opens_and_blur_closes() {
        let mut sel = selector();
        sel.on_input_focus();
        assert!(sel.is_expanded());

        sel.on_input_blur(Some(FocusTarget::Results));
        assert!(!sel.is_expanded());
    }

    #[test]
    fn test_blur_into_suggestions_keeps_list_open() {
        let mut sel = selector();
        sel.on_focus_change(None, Some(FocusTarget::Input));
        sel.on_focus_change(Some(FocusTarget::Input), Some(FocusTarget::Suggestions));
        assert!(sel.is_expanded());

        sel.on_focus_change(Some(FocusTarget::Suggestions), Some(FocusTarget::Input));
        assert!(sel.is_expanded());

        sel.on_focus_change(Some(FocusTarget::Input), Some(FocusTarget::Suggestions));
        sel.on_focus_change(Some(FocusTarget::Suggestions), Some(FocusTarget::Chips));
        assert!(!sel.is_expanded());
    }

    #[test]
    fn test_blur_to_nowhere_closes() {
        let mut sel = selector();
        sel.on_input_focus();
        sel.on_input_blur(None);
        assert!(!sel.is_expanded());
    }
}
