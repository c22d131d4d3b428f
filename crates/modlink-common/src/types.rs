//! Domain types shared across modlink crates
//!
//! A [`Module`] owns an ordered chain of [`Fragment`]s. In memory the chain is
//! a sorted sequence plus a computed successor index; once persisted each
//! fragment row stores the id of its successor instead of a position.

use serde::{Deserialize, Serialize};

/// Subscription plan assigned to a module when none is supplied.
pub const DEFAULT_SUBSCRIPTION_PLAN_ID: i32 = 1;

/// One piece of module content, read from a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Raw file text
    pub content: String,

    /// Base file name including extension, used as the sort key
    pub name: String,
}

impl Fragment {
    pub fn new(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
        }
    }
}

/// Module metadata as read from its descriptor file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub description: String,

    /// Filled in by the caller before the module is persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_plan_id: Option<i32>,

    /// Id of the first persisted fragment, known only after linking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub head_fragment_id: Option<i32>,
}

impl Module {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            subscription_plan_id: None,
            head_fragment_id: None,
        }
    }

    /// Plan id to persist, falling back to [`DEFAULT_SUBSCRIPTION_PLAN_ID`]
    pub fn plan_id(&self) -> i32 {
        self.subscription_plan_id
            .unwrap_or(DEFAULT_SUBSCRIPTION_PLAN_ID)
    }
}

/// Sort fragments by name using byte-wise ascending order.
///
/// The sort is stable, so fragments sharing a name keep their input order.
pub fn order_fragments(mut fragments: Vec<Fragment>) -> Vec<Fragment> {
    fragments.sort_by(|a, b| a.name.cmp(&b.name));
    fragments
}

/// Fragments in chain order (index 0 is the head)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentChain {
    fragments: Vec<Fragment>,
}

impl FragmentChain {
    /// Build a chain from fragments in any order
    pub fn from_unordered(fragments: Vec<Fragment>) -> Self {
        Self {
            fragments: order_fragments(fragments),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn head(&self) -> Option<&Fragment> {
        self.fragments.first()
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    /// Index of the fragment following `index`, or `None` for the tail
    pub fn successor_of(&self, index: usize) -> Option<usize> {
        let next = index.checked_add(1)?;
        (next < self.fragments.len()).then_some(next)
    }

    /// Successor index of every fragment, in chain order
    pub fn successors(&self) -> Vec<Option<usize>> {
        (0..self.fragments.len())
            .map(|index| self.successor_of(index))
            .collect()
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.fragments
    }
}

impl<'a> IntoIterator for &'a FragmentChain {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
