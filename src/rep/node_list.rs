//! Index-linked list of entries
//!
//! Doubly linked list whose nodes live in one growable vector and refer to
//! each other by index. Appends are O(1); nodes are never unlinked.

use std::sync::Arc;

use bytes::Bytes;

/// Stable handle of a node within its list
pub(crate) type NodeId = usize;

struct Node {
    entry: Bytes,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

pub(crate) struct NodeList {
    nodes: Vec<Node>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl NodeList {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    /// Link `entry` after the current tail
    pub(crate) fn push_back(&mut self, entry: Bytes) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            entry,
            prev: self.tail,
            next: None,
        });

        match self.tail {
            Some(tail) => self.nodes[tail].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
        id
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Entries from head to tail (oldest first)
    pub(crate) fn iter(&self) -> Walk<'_> {
        Walk {
            list: self,
            cursor: self.head,
            forward: true,
        }
    }

    /// Entries from tail to head (newest first)
    pub(crate) fn iter_rev(&self) -> Walk<'_> {
        Walk {
            list: self,
            cursor: self.tail,
            forward: false,
        }
    }

    /// Copy of every entry, oldest first
    pub(crate) fn collect_entries(&self) -> Arc<[Bytes]> {
        self.iter().cloned().collect()
    }

    /// Node array + container overhead
    pub(crate) fn approximate_memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.nodes.capacity() * std::mem::size_of::<Node>()
    }
}

/// Walk along `next` or `prev` links
pub(crate) struct Walk<'a> {
    list: &'a NodeList,
    cursor: Option<NodeId>,
    forward: bool,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Bytes;

    fn next(&mut self) -> Option<Self::Item> {
        let node = &self.list.nodes[self.cursor?];
        self.cursor = if self.forward { node.next } else { node.prev };
        Some(&node.entry)
    }
}
