use tracing::warn;

use crate::error::{Error, Result};
use crate::list::node::NodeId;
use crate::list::UnrolledList;

/// An item's place in the chain: its node and its offset inside that node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Position {
    pub(crate) node: NodeId,
    pub(crate) offset: usize,
}

/// End of the chain a lookup starts crawling from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    FromHead,
    FromTail,
}

impl Direction {
    /// Guesses the cheaper end to crawl from, assuming items are spread
    /// evenly over the nodes.
    ///
    /// Only the number of nodes visited depends on this; the lookup result
    /// does not.
    pub(crate) fn choose(len: usize, node_count: usize, index: usize) -> Self {
        let per_node = len / node_count.max(1);
        let mid = (node_count / 2) * per_node;
        if index <= mid {
            Direction::FromHead
        } else {
            Direction::FromTail
        }
    }
}

impl UnrolledList {
    /// Maps a list index to the node holding it and the offset inside that
    /// node.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len`, and [`Error::Internal`]
    /// if the chain does not account for `len` items.
    pub(crate) fn locate(&self, index: usize) -> Result<Position> {
        if index >= self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let found = match Direction::choose(self.len, self.node_count(), index) {
            Direction::FromHead => self.locate_from_head(index),
            Direction::FromTail => self.locate_from_tail(index),
        };
        found.ok_or_else(|| {
            warn!(index, len = self.len, "ulist.locate.broken_chain");
            Error::Internal { index }
        })
    }

    fn locate_from_head(&self, index: usize) -> Option<Position> {
        let mut seen = 0;
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            seen += node.used;
            if seen > index {
                return Some(Position {
                    node: id,
                    offset: index - (seen - node.used),
                });
            }
            cursor = node.next;
        }
        None
    }

    fn locate_from_tail(&self, index: usize) -> Option<Position> {
        let mut before = self.len;
        let mut cursor = Some(self.tail);
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            before = before.checked_sub(node.used)?;
            if before <= index {
                return Some(Position {
                    node: id,
                    offset: index - before,
                });
            }
            cursor = node.prev;
        }
        None
    }
}
