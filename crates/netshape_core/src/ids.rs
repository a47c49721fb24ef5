//! Placeholder identity allocation.

use crate::types::{LinkId, NodeId, ResourceAttrId};

/// A strictly decreasing sequence of negative identifiers.
///
/// Starts at -1 and moves down by one per call. Values are never reused.
#[derive(Debug, Clone)]
pub struct PlaceholderSequence {
    next: i64,
}

impl PlaceholderSequence {
    /// Creates a sequence whose first value is -1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: -1 }
    }

    /// Returns the next placeholder.
    pub fn next_id(&mut self) -> i64 {
        let id = self.next;
        self.next -= 1;
        id
    }

    /// Returns the value the following call will produce.
    #[must_use]
    pub const fn peek(&self) -> i64 {
        self.next
    }
}

impl Default for PlaceholderSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Independent placeholder sequences per entity class.
///
/// Owned by exactly one [`crate::Network`]; never shared across threads.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    nodes: PlaceholderSequence,
    links: PlaceholderSequence,
    resource_attrs: PlaceholderSequence,
}

impl IdAllocator {
    /// Creates an allocator with all sequences at -1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a placeholder node identity.
    pub fn next_node(&mut self) -> NodeId {
        NodeId::new(self.nodes.next_id())
    }

    /// Issues a placeholder link identity.
    pub fn next_link(&mut self) -> LinkId {
        LinkId::new(self.links.next_id())
    }

    /// Issues a placeholder resource-attribute identity.
    pub fn next_resource_attr(&mut self) -> ResourceAttrId {
        ResourceAttrId::new(self.resource_attrs.next_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_starts_at_minus_one() {
        let mut seq = PlaceholderSequence::new();
        assert_eq!(seq.next_id(), -1);
        assert_eq!(seq.next_id(), -2);
        assert_eq!(seq.next_id(), -3);
        assert_eq!(seq.peek(), -4);
    }

    #[test]
    fn classes_are_independent() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_node(), NodeId::new(-1));
        assert_eq!(ids.next_node(), NodeId::new(-2));
        assert_eq!(ids.next_link(), LinkId::new(-1));
        assert_eq!(ids.next_resource_attr(), ResourceAttrId::new(-1));
        assert_eq!(ids.next_node(), NodeId::new(-3));
    }
}
