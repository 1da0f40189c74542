#![forbid(unsafe_code)]

//! The greeting phrase list.

/// A fixed, read-only list of phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseDeck {
    phrases: Vec<String>,
}

impl PhraseDeck {
    /// Build a deck. Returns `None` for an empty list.
    #[must_use]
    pub fn new(phrases: Vec<String>) -> Option<Self> {
        (!phrases.is_empty()).then_some(Self { phrases })
    }

    /// Pick a phrase uniformly at random. Repeats are allowed, including the
    /// phrase currently on screen.
    pub fn pick(&self, rng: &mut fastrand::Rng) -> &str {
        &self.phrases[rng.usize(..self.phrases.len())]
    }

    #[must_use]
    pub fn contains(&self, phrase: &str) -> bool {
        self.phrases.iter().any(|p| p == phrase)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.phrases.iter().map(String::as_str)
    }
}
