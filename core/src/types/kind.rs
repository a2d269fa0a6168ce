use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of a dictionary entry as stored in the full-text index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Headword,
    Phrase,
    Example,
    Definition,
}

/// Set of entry kinds a full-text query is restricted to.
///
/// An empty set places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemKinds(BTreeSet<ItemKind>);

impl ItemKinds {
    pub fn any() -> Self {
        Self::default()
    }

    /// Headword and phrase entries only; used by wildcard and advanced searches.
    pub fn headwords_and_phrases() -> Self {
        [ItemKind::Headword, ItemKind::Phrase].into_iter().collect()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn allows(&self, kind: ItemKind) -> bool {
        self.0.is_empty() || self.0.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<ItemKind> for ItemKinds {
    fn from_iter<I: IntoIterator<Item = ItemKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_allows_everything() {
        let kinds = ItemKinds::any();
        assert!(kinds.is_unrestricted());
        assert!(kinds.allows(ItemKind::Example));
        assert!(kinds.allows(ItemKind::Headword));
    }

    #[test]
    fn test_headwords_and_phrases_rejects_examples() {
        let kinds = ItemKinds::headwords_and_phrases();
        assert!(kinds.allows(ItemKind::Headword));
        assert!(kinds.allows(ItemKind::Phrase));
        assert!(!kinds.allows(ItemKind::Example));
        assert!(!kinds.allows(ItemKind::Definition));
    }
}
