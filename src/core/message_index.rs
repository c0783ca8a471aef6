//! Ordered index of user-authored messages
//!
//! Rebuilt wholesale from a document snapshot; positions are only meaningful
//! until the next rebuild.

use serde::Serialize;

use super::types::{MessageNode, NodeId};

/// Marker appended to truncated previews
pub const ELLIPSIS: &str = "...";

/// One user message in the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedMessage {
    pub id: NodeId,
    /// Position among all messages in the document (0-based)
    pub order: usize,
    pub text: String,
}

/// User messages in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageIndex {
    entries: Vec<IndexedMessage>,
}

impl MessageIndex {
    /// Build the index from a snapshot of every message in the document
    pub fn build(nodes: &[MessageNode]) -> Self {
        let entries = nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.role.is_user())
            .map(|(order, node)| IndexedMessage {
                id: node.id,
                order,
                text: node.text.clone(),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&IndexedMessage> {
        self.entries.get(position)
    }

    /// Position of a message by identity
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedMessage> {
        self.entries.iter()
    }

    pub fn ids(&self) -> Vec<NodeId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }
}

/// Trimmed text cut to `max_chars` characters, with [`ELLIPSIS`] if cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let mut chars = trimmed.char_indices();
    match chars.nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], ELLIPSIS),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn conversation() -> Vec<MessageNode> {
        vec![
            MessageNode::other(10, "Welcome"),
            MessageNode::user(11, "hi"),
            MessageNode::other(12, "Hello! How can I help?"),
            MessageNode::user(13, "how are you"),
            MessageNode::other(14, "Fine."),
        ]
    }

    #[test]
    fn test_build_keeps_user_messages_in_order() {
        let index = MessageIndex::build(&conversation());
        assert_eq!(index.len(), 2);
        assert_eq!(index.ids(), vec![NodeId(11), NodeId(13)]);
        assert_eq!(index.get(0).map(|m| m.order), Some(1));
        assert_eq!(index.get(1).map(|m| m.order), Some(3));
    }

    #[test]
    fn test_build_empty_document() {
        let index = MessageIndex::build(&[]);
        assert!(index.is_empty());
        assert_eq!(index.get(0), None);
    }

    #[test]
    fn test_build_is_idempotent() {
        let nodes = conversation();
        assert_eq!(MessageIndex::build(&nodes), MessageIndex::build(&nodes));
    }

    #[test]
    fn test_position_of() {
        let index = MessageIndex::build(&conversation());
        assert_eq!(index.position_of(NodeId(13)), Some(1));
        assert_eq!(index.position_of(NodeId(12)), None);
    }

    #[test]
    fn test_excerpt_short_text_untouched() {
        assert_eq!(excerpt("  hello  ", 50), "hello");
    }

    #[test]
    fn test_excerpt_exact_length_untouched() {
        assert_eq!(excerpt("abcde", 5), "abcde");
    }

    #[test]
    fn test_excerpt_truncates_long_text() {
        assert_eq!(excerpt("abcdefgh", 5), "abcde...");
    }

    #[test]
    fn test_excerpt_counts_characters_not_bytes() {
        assert_eq!(excerpt("héllo wörld", 4), "héll...");
        assert_eq!(excerpt("日本語のテキスト", 3), "日本語...");
    }

    proptest! {
        #[test]
        fn prop_index_matches_user_messages(roles in prop::collection::vec(any::<bool>(), 0..40)) {
            let nodes: Vec<MessageNode> = roles
                .iter()
                .enumerate()
                .map(|(i, &is_user)| {
                    if is_user {
                        MessageNode::user(i as u64, "q")
                    } else {
                        MessageNode::other(i as u64, "a")
                    }
                })
                .collect();
            let index = MessageIndex::build(&nodes);

            prop_assert_eq!(index.len(), roles.iter().filter(|&&u| u).count());
            let orders: Vec<usize> = index.iter().map(|entry| entry.order).collect();
            prop_assert!(orders.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(orders.iter().all(|&o| roles[o]));
        }
    }
}
