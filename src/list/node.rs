use std::mem;
use std::ops::Range;

use crate::error::Result;

/// Handle of a node slot in the [`Arena`].
///
/// A handle stays valid until the node is freed; after that the slot may be
/// reused by a later allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// Storage block for up to `items_per_node` items of `item_size` bytes.
///
/// The node knows nothing about the item size; every method that addresses
/// items takes it as `size`. Items `0..used` are populated, in list order.
#[derive(Clone)]
pub(crate) struct Node {
    pub(crate) next: Option<NodeId>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) used: usize,
    pub(crate) data: Box<[u8]>,
}

impl Node {
    /// Allocates a zeroed node of `bytes` bytes of item storage, reporting
    /// allocation failure instead of aborting.
    pub(crate) fn zeroed(bytes: usize) -> Result<Self> {
        let mut data = Vec::new();
        data.try_reserve_exact(bytes)?;
        data.resize(bytes, 0);
        Ok(Self {
            next: None,
            prev: None,
            used: 0,
            data: data.into_boxed_slice(),
        })
    }

    /// Number of items the node can hold.
    pub(crate) fn capacity(&self, size: usize) -> usize {
        self.data.len() / size
    }

    pub(crate) fn is_full(&self, size: usize) -> bool {
        self.used == self.capacity(size)
    }

    /// Byte range of the items `items` inside `data`.
    pub(crate) fn span(size: usize, items: Range<usize>) -> Range<usize> {
        items.start * size..items.end * size
    }

    pub(crate) fn item(&self, size: usize, offset: usize) -> &[u8] {
        debug_assert!(offset < self.used);
        &self.data[Self::span(size, offset..offset + 1)]
    }

    pub(crate) fn item_mut(&mut self, size: usize, offset: usize) -> &mut [u8] {
        debug_assert!(offset < self.used);
        &mut self.data[Self::span(size, offset..offset + 1)]
    }

    /// Writes `item` at `offset`, shifting the items at and after `offset` up
    /// by one slot. The node must not be full.
    pub(crate) fn insert(&mut self, size: usize, offset: usize, item: &[u8]) {
        debug_assert!(!self.is_full(size));
        debug_assert!(offset <= self.used);
        debug_assert_eq!(item.len(), size);
        if offset < self.used {
            self.data
                .copy_within(Self::span(size, offset..self.used), (offset + 1) * size);
        }
        self.data[Self::span(size, offset..offset + 1)].copy_from_slice(item);
        self.used += 1;
    }

    /// Removes the item at `offset`, optionally copying it into `out`, and
    /// shifts the following items down to close the gap.
    pub(crate) fn remove(&mut self, size: usize, offset: usize, out: Option<&mut [u8]>) {
        debug_assert!(offset < self.used);
        if let Some(out) = out {
            out.copy_from_slice(self.item(size, offset));
        }
        if offset + 1 < self.used {
            self.data
                .copy_within(Self::span(size, offset + 1..self.used), offset * size);
        }
        self.used -= 1;
    }
}

/// Slot arena owning every node of a list.
///
/// Chain links are [`NodeId`]s into the arena instead of pointers, so a
/// freed node can never be reached through a stale link: its slot is `None`
/// until reused.
#[derive(Clone, Default)]
pub(crate) struct Arena {
    slots: Vec<Option<Node>>,
    vacant: Vec<NodeId>,
    live: usize,
    /// makes every `allocate` fail as if memory ran out
    #[cfg(test)]
    pub(crate) fail_allocations: bool,
}

impl Arena {
    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    /// Allocates a zeroed, unlinked node. Nothing is modified when the
    /// allocation fails.
    pub(crate) fn allocate(&mut self, bytes: usize) -> Result<NodeId> {
        #[cfg(test)]
        {
            if self.fail_allocations {
                Node::zeroed(usize::MAX)?;
            }
        }
        let node = Node::zeroed(bytes)?;
        let id = match self.vacant.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.0].is_none());
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.try_reserve(1)?;
                // `release` pushes onto `vacant` and must not allocate.
                self.vacant.try_reserve(self.slots.len() + 1)?;
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };
        self.live += 1;
        Ok(id)
    }

    /// Releases the node in slot `id`. The node must already be unlinked.
    pub(crate) fn release(&mut self, id: NodeId) {
        if self.slots[id.0].take().is_none() {
            unreachable!("double free of node {:?}", id);
        }
        self.vacant.push(id);
        self.live -= 1;
    }

    /// Drops every node.
    pub(crate) fn clear(&mut self) {
        self.slots = Vec::new();
        self.vacant = Vec::new();
        self.live = 0;
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node {
        match &self.slots[id.0] {
            Some(node) => node,
            None => unreachable!("node {:?} is not live", id),
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => unreachable!("node {:?} is not live", id),
        }
    }

    /// Borrows two distinct nodes mutably at once.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node, &mut Node) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");
        let (a_slot, b_slot) = if a.0 < b.0 {
            let (low, high) = self.slots.split_at_mut(b.0);
            (&mut low[a.0], &mut high[0])
        } else {
            let (low, high) = self.slots.split_at_mut(a.0);
            (&mut high[0], &mut low[b.0])
        };
        match (a_slot, b_slot) {
            (Some(a), Some(b)) => (a, b),
            _ => unreachable!("pair_mut on a freed node"),
        }
    }
}

/// Byte size of one node's backing allocation: the node header plus its item
/// storage.
pub(crate) fn alloc_size(node_bytes: usize) -> usize {
    mem::size_of::<Node>() + node_bytes
}
