use crate::foundation::core::ElementId;

/// One batch of tree changes, as reported by the document.
///
/// Only subtree roots are listed; handlers look inside them for counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MutationRecord {
    /// Roots of subtrees attached to the document.
    #[serde(default)]
    pub added: Vec<ElementId>,
    /// Roots of subtrees detached from the document.
    #[serde(default)]
    pub removed: Vec<ElementId>,
}

impl MutationRecord {
    /// Batch reporting one attached subtree.
    pub fn added(root: ElementId) -> Self {
        Self {
            added: vec![root],
            removed: Vec::new(),
        }
    }

    /// Batch reporting one detached subtree.
    pub fn removed(root: ElementId) -> Self {
        Self {
            added: Vec::new(),
            removed: vec![root],
        }
    }

    /// Whether the batch reports nothing.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
