use tracing::trace;

use crate::list::node::{Node, NodeId};
use crate::list::UnrolledList;

/// How many items [`UnrolledList::rebalance`] moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rebalance {
    /// Move just enough to bring `dest` up to half capacity. Used to fill a
    /// freshly allocated node when splitting a full one.
    Split,
    /// Drain `src` completely if everything fits in `dest`, otherwise behave
    /// like [`Rebalance::Split`]. Used to refill an underflowing node.
    Merge,
}

impl Rebalance {
    /// Number of items to move from a node holding `src` items into a node
    /// holding `dest` items.
    pub(crate) fn count(self, dest: usize, src: usize, capacity: usize) -> usize {
        let half = capacity / 2;
        match self {
            Rebalance::Merge if dest + src <= capacity => src,
            Rebalance::Split | Rebalance::Merge => half.saturating_sub(dest).min(src),
        }
    }
}

impl UnrolledList {
    /// Moves a contiguous run of items from `src` into `dest`, two adjacent
    /// linked nodes, and returns how many moved.
    ///
    /// If `src` precedes `dest`, the run is taken from the end of `src` and
    /// prepended to `dest`. If `src` follows `dest`, the run is taken from
    /// the start of `src` and appended to `dest`. Either way list order is
    /// preserved.
    pub(crate) fn rebalance(&mut self, dest: NodeId, src: NodeId, mode: Rebalance) -> usize {
        let size = self.config.item_size;
        let capacity = self.config.items_per_node;
        let (dest_node, src_node) = self.nodes.pair_mut(dest, src);
        let n = mode.count(dest_node.used, src_node.used, capacity);
        if n == 0 {
            return 0;
        }
        debug_assert!(dest_node.used + n <= capacity);

        if dest_node.prev == Some(src) {
            debug_assert_eq!(src_node.next, Some(dest));
            // tail of `src` ++ `dest`
            dest_node
                .data
                .copy_within(Node::span(size, 0..dest_node.used), n * size);
            dest_node.data[Node::span(size, 0..n)].copy_from_slice(
                &src_node.data[Node::span(size, src_node.used - n..src_node.used)],
            );
        } else {
            debug_assert_eq!(dest_node.next, Some(src));
            debug_assert_eq!(src_node.prev, Some(dest));
            // `dest` ++ head of `src`
            dest_node.data[Node::span(size, dest_node.used..dest_node.used + n)]
                .copy_from_slice(&src_node.data[Node::span(size, 0..n)]);
            src_node
                .data
                .copy_within(Node::span(size, n..src_node.used), 0);
        }
        dest_node.used += n;
        src_node.used -= n;

        trace!(
            ?dest,
            ?src,
            ?mode,
            moved = n,
            dest_used = dest_node.used,
            src_used = src_node.used,
            "ulist.rebalance"
        );
        n
    }
}
