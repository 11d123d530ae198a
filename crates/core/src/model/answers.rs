use std::collections::BTreeMap;

/// Sparse record of the options a learner picked, keyed by question index.
///
/// Unanswered questions have no entry. Selecting again overwrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    selections: BTreeMap<usize, usize>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option` for `question`, returning the previous selection.
    pub fn select(&mut self, question: usize, option: usize) -> Option<usize> {
        self.selections.insert(question, option)
    }

    #[must_use]
    pub fn get(&self, question: usize) -> Option<usize> {
        self.selections.get(&question).copied()
    }

    #[must_use]
    pub fn is_answered(&self, question: usize) -> bool {
        self.selections.contains_key(&question)
    }

    /// Number of answered questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}

impl FromIterator<(usize, usize)> for AnswerMap {
    fn from_iter<T: IntoIterator<Item = (usize, usize)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (question, option) in iter {
            map.select(question, option);
        }
        map
    }
}
