//! In-document literal find with cyclic navigation

use std::ops::Range;

/// A match as a byte offset and byte length into the searched text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindMatch {
    pub offset: usize,
    pub len: usize,
}

impl FindMatch {
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.len
    }

    /// Same match expressed in char indices (what text widgets use)
    pub fn char_range(&self, text: &str) -> Range<usize> {
        let start = text.get(..self.offset).map_or(0, |s| s.chars().count());
        let len = text.get(self.range()).map_or(0, |s| s.chars().count());
        start..start + len
    }
}

/// Left-to-right, non-overlapping literal scan
pub fn collect_matches(text: &str, pattern: &str) -> Vec<FindMatch> {
    if pattern.is_empty() {
        return Vec::new();
    }
    text.match_indices(pattern)
        .map(|(offset, m)| FindMatch {
            offset,
            len: m.len(),
        })
        .collect()
}

/// Observable state of a find session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindState {
    /// No pattern entered
    Empty,
    NoMatches,
    /// Index of the current match
    HasMatches(usize),
}

/// One highlighted span; `current` marks the focused match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub range: FindMatch,
    pub current: bool,
}

/// Find session over text supplied by the caller
///
/// The engine cannot see edits: callers must call [`FindEngine::invalidate`]
/// when the text changes so the next navigation rebuilds the match list.
#[derive(Debug, Clone, Default)]
pub struct FindEngine {
    pattern: String,
    /// Pattern the cached matches were computed for
    cached_pattern: Option<String>,
    matches: Vec<FindMatch>,
    current: usize,
}

impl FindEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute matches for a new pattern and focus the first one
    pub fn submit(&mut self, text: &str, pattern: &str) -> FindState {
        self.pattern = pattern.to_string();
        self.current = 0;
        self.rebuild(text);
        self.state()
    }

    /// Focus the following match, wrapping to the first
    pub fn next(&mut self, text: &str) -> FindState {
        self.ensure_fresh(text);
        let total = self.matches.len();
        if total > 0 {
            self.current = (self.current + 1) % total;
        }
        self.state()
    }

    /// Focus the preceding match, wrapping to the last
    pub fn prev(&mut self, text: &str) -> FindState {
        self.ensure_fresh(text);
        let total = self.matches.len();
        if total > 0 {
            self.current = (self.current % total + total - 1) % total;
        }
        self.state()
    }

    /// Drop the cached matches after the text changed
    ///
    /// Nothing is highlighted until the next `next`/`prev`/`rebuild`; the
    /// current index is kept so navigation resumes near where it was.
    pub fn invalidate(&mut self) {
        self.cached_pattern = None;
        self.matches.clear();
    }

    /// Recompute matches now, keeping the current index in range
    pub fn rebuild(&mut self, text: &str) {
        self.matches = collect_matches(text, &self.pattern);
        self.cached_pattern = Some(self.pattern.clone());
        self.current = self.current.min(self.matches.len().saturating_sub(1));
    }

    fn ensure_fresh(&mut self, text: &str) {
        if self.cached_pattern.as_deref() != Some(self.pattern.as_str()) {
            self.rebuild(text);
        }
    }

    pub fn state(&self) -> FindState {
        if self.pattern.is_empty() {
            FindState::Empty
        } else if self.matches.is_empty() {
            FindState::NoMatches
        } else {
            FindState::HasMatches(self.current)
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self) -> &[FindMatch] {
        &self.matches
    }

    pub fn current_match(&self) -> Option<FindMatch> {
        match self.state() {
            FindState::HasMatches(i) => self.matches.get(i).copied(),
            _ => None,
        }
    }

    /// Every match, with the current one flagged
    pub fn highlights(&self) -> Vec<Highlight> {
        let current = self.current_match();
        self.matches
            .iter()
            .map(|m| Highlight {
                range: *m,
                current: Some(*m) == current,
            })
            .collect()
    }

    /// "current/total", or "0/0" when there is nothing to show
    pub fn counter(&self) -> String {
        match self.state() {
            FindState::HasMatches(i) => format!("{}/{}", i + 1, self.matches.len()),
            _ => "0/0".to_string(),
        }
    }
}
