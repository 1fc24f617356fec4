use tracing::{debug, trace, warn};

use crate::config::ListConfig;
use crate::error::{Error, Result};
use crate::list::balance::Rebalance;
use crate::list::cursor::IterCursor;
use crate::list::locate::Position;
use crate::list::node::{Arena, NodeId};

pub mod iterator;

mod algorithms;
mod balance;
mod cursor;
mod locate;
mod node;

/// An unrolled linked list of fixed-size byte records.
///
/// Items live in a doubly-linked chain of nodes, each holding a contiguous
/// run of up to `items_per_node` items. Inserting shifts items inside one
/// node only; a full node is split in two and an underflowing node is
/// refilled from (or merged with) a neighbour, so every node except the tail
/// stays at least half full.
///
/// Every item is exactly `item_size` bytes, fixed when the list is created.
///
/// The list also carries a stateful iteration cursor, stepped with
/// [`next_item`] and [`previous_item`]. See [`set_iteration_start`] for how
/// it is seated.
///
/// # Lifecycle
///
/// A list is live from creation until [`destroy`] releases its nodes. Every
/// operation on a destroyed list fails with [`Error::InvalidParam`], and a
/// second `destroy` reports [`Error::AlreadyDestroyed`]. Dropping a list
/// releases its nodes without calling `destroy`.
///
/// [`next_item`]: UnrolledList::next_item
/// [`previous_item`]: UnrolledList::previous_item
/// [`set_iteration_start`]: UnrolledList::set_iteration_start
/// [`destroy`]: UnrolledList::destroy
#[derive(Clone)]
pub struct UnrolledList {
    pub(crate) config: ListConfig,
    pub(crate) nodes: Arena,
    pub(crate) head: NodeId,
    pub(crate) tail: NodeId,
    /// the number of items over all nodes
    pub(crate) len: usize,
    pub(crate) cursor: IterCursor,
    destroyed: bool,
}

// private methods
impl UnrolledList {
    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.destroyed {
            return Err(Error::InvalidParam("list is destroyed"));
        }
        Ok(())
    }

    fn check_item(&self, item: &[u8]) -> Result<()> {
        if item.len() != self.config.item_size {
            return Err(Error::InvalidParam("item length differs from item_size"));
        }
        Ok(())
    }

    fn allocate_node(&mut self) -> Result<NodeId> {
        Self::allocate_in(&mut self.nodes, &self.config)
    }

    fn allocate_in(nodes: &mut Arena, config: &ListConfig) -> Result<NodeId> {
        let bytes = config.item_size * config.items_per_node;
        match nodes.allocate(bytes) {
            Ok(id) => {
                trace!(node = ?id, nodes = nodes.live(), "ulist.node.allocate");
                Ok(id)
            }
            Err(err) => {
                warn!(bytes, nodes = nodes.live(), "ulist.node.allocate_failed");
                Err(err)
            }
        }
    }

    /// Links the unlinked node `new` directly after `node`.
    fn link_after(&mut self, node: NodeId, new: NodeId) {
        let next = self.nodes.get(node).next;
        {
            let new_node = self.nodes.get_mut(new);
            new_node.prev = Some(node);
            new_node.next = next;
        }
        self.nodes.get_mut(node).next = Some(new);
        match next {
            Some(next) => self.nodes.get_mut(next).prev = Some(new),
            None => self.tail = new,
        }
    }

    /// Unlinks an empty node from its neighbours and releases it.
    fn free_node(&mut self, id: NodeId) {
        let (prev, next) = {
            let node = self.nodes.get(id);
            debug_assert_eq!(node.used, 0, "freeing a node that still holds items");
            (node.prev, node.next)
        };
        match prev {
            Some(prev) => self.nodes.get_mut(prev).next = next,
            None => self.head = next.unwrap_or(id),
        }
        match next {
            Some(next) => self.nodes.get_mut(next).prev = prev,
            None => self.tail = prev.unwrap_or(id),
        }
        debug_assert!(self.head != id && self.tail != id, "freeing the only node");
        self.nodes.release(id);
        trace!(node = ?id, nodes = self.nodes.live(), "ulist.node.free");
    }

    /// Appends after the last item, growing a new tail if the tail is full.
    fn push_tail(&mut self, item: &[u8]) -> Result<()> {
        let size = self.config.item_size;
        let mut tail = self.tail;
        if self.nodes.get(tail).is_full(size) {
            let new = self.allocate_node()?;
            self.link_after(tail, new);
            tail = new;
        }
        let node = self.nodes.get_mut(tail);
        let offset = node.used;
        node.insert(size, offset, item);
        Ok(())
    }

    /// Picks the node and offset an item inserted at `pos` is written to,
    /// splitting a full node when needed.
    fn make_room(&mut self, pos: Position) -> Result<Position> {
        let size = self.config.item_size;
        let Position { node, offset } = pos;
        if offset == 0 {
            if let Some(prev) = self.nodes.get(node).prev {
                let prev_node = self.nodes.get(prev);
                if !prev_node.is_full(size) {
                    return Ok(Position {
                        node: prev,
                        offset: prev_node.used,
                    });
                }
            }
        }
        if !self.nodes.get(node).is_full(size) {
            return Ok(pos);
        }
        self.split(node, offset)
    }

    /// Splits the full `node` by moving its upper half into a new node linked
    /// after it, and returns where `offset` of the old node now lives.
    fn split(&mut self, node: NodeId, offset: usize) -> Result<Position> {
        let new = self.allocate_node()?;
        self.link_after(node, new);
        let moved = self.rebalance(new, node, Rebalance::Split);
        let kept = self.nodes.get(node).used;
        trace!(node = ?node, new = ?new, moved, kept, "ulist.split");
        if offset >= kept {
            Ok(Position {
                node: new,
                offset: offset - kept,
            })
        } else {
            Ok(Position { node, offset })
        }
    }

    /// Refills `id` from a neighbour if it dropped below half capacity,
    /// freeing the neighbour if it was drained.
    fn refill(&mut self, id: NodeId) {
        if self.nodes.live() == 1 || self.nodes.get(id).used >= self.config.half() {
            return;
        }
        let node = self.nodes.get(id);
        let donor = match node.next.or(node.prev) {
            Some(donor) => donor,
            None => return,
        };
        let moved = self.rebalance(id, donor, Rebalance::Merge);
        let drained = self.nodes.get(donor).used == 0;
        trace!(node = ?id, donor = ?donor, moved, drained, "ulist.merge");
        if drained {
            self.free_node(donor);
        }
    }

    #[cfg(debug_assertions)]
    fn assert_invariants(&self) {
        let half = self.config.half();
        let mut items = 0;
        let mut nodes = 0;
        let mut prev = None;
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            assert_eq!(node.prev, prev, "broken back link at node {:?}", id);
            if id != self.tail {
                assert!(node.used >= half, "node {:?} is below half full", id);
            }
            items += node.used;
            nodes += 1;
            prev = Some(id);
            cursor = node.next;
        }
        assert_eq!(prev, Some(self.tail));
        assert_eq!(items, self.len);
        assert_eq!(nodes, self.nodes.live());
        assert!(nodes == 1 || self.len > 0, "empty node left in the chain");
    }
}

impl UnrolledList {
    /// Creates an empty list of items of `item_size` bytes, with nodes holding
    /// up to `items_per_node` items.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParam`] if `item_size` is zero or `items_per_node` is
    /// less than 2, and [`Error::OutOfMemory`] if the first node cannot be
    /// allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::{Error, UnrolledList};
    ///
    /// let list = UnrolledList::new(4, 16).unwrap();
    /// assert!(list.is_empty());
    /// assert_eq!(list.node_count(), 1);
    ///
    /// assert!(matches!(UnrolledList::new(0, 16), Err(Error::InvalidParam(_))));
    /// assert!(matches!(UnrolledList::new(4, 1), Err(Error::InvalidParam(_))));
    /// ```
    pub fn new(item_size: usize, items_per_node: usize) -> Result<Self> {
        Self::with_config(ListConfig::new(item_size).items_per_node(items_per_node))
    }

    /// Creates an empty list from a [`ListConfig`].
    pub fn with_config(config: ListConfig) -> Result<Self> {
        config.validate()?;
        let mut nodes = Arena::default();
        let head = Self::allocate_in(&mut nodes, &config)?;
        debug!(
            item_size = config.item_size,
            items_per_node = config.items_per_node,
            "ulist.create"
        );
        Ok(Self {
            config,
            nodes,
            head,
            tail: head,
            len: 0,
            cursor: IterCursor::default(),
            destroyed: false,
        })
    }

    /// Releases every node. The list is unusable afterwards.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyDestroyed`] if the list was already destroyed. Nothing
    /// else happens in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::{Error, UnrolledList};
    ///
    /// let mut list = UnrolledList::new(1, 4).unwrap();
    /// list.append(&[7]).unwrap();
    ///
    /// assert_eq!(list.destroy(), Ok(()));
    /// assert_eq!(list.destroy(), Err(Error::AlreadyDestroyed));
    /// assert!(matches!(list.append(&[8]), Err(Error::InvalidParam(_))));
    /// ```
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(Error::AlreadyDestroyed);
        }
        debug!(items = self.len, nodes = self.nodes.live(), "ulist.destroy");
        self.nodes.clear();
        self.len = 0;
        self.cursor.reset();
        self.destroyed = true;
        Ok(())
    }

    /// Returns `true` once [`destroy`](UnrolledList::destroy) has been called.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Returns the number of items.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of live nodes. A live list always has at least one.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.live()
    }

    /// Returns the size of one item in bytes.
    #[inline]
    pub fn item_size(&self) -> usize {
        self.config.item_size
    }

    /// Returns the maximum number of items in one node.
    #[inline]
    pub fn items_per_node(&self) -> usize {
        self.config.items_per_node
    }

    /// Returns the parameters the list was created with.
    #[inline]
    pub fn config(&self) -> ListConfig {
        self.config
    }

    /// Returns the byte size of one node's backing allocation: the node
    /// header plus room for `items_per_node` items.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let small = UnrolledList::new(4, 8).unwrap();
    /// let large = UnrolledList::new(4, 16).unwrap();
    /// assert_eq!(large.node_size().unwrap() - small.node_size().unwrap(), 32);
    /// ```
    pub fn node_size(&self) -> Result<usize> {
        self.ensure_live()?;
        Ok(node::alloc_size(
            self.config.item_size * self.config.items_per_node,
        ))
    }

    /// Returns the number of items in each node, from head to tail.
    ///
    /// Meant for diagnostics: it exposes the node layout, which depends on
    /// the history of insertions and removals.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 4).unwrap();
    /// for i in 0..10 {
    ///     list.append(&[i]).unwrap();
    /// }
    /// assert_eq!(list.node_lens(), vec![4, 4, 2]);
    /// ```
    pub fn node_lens(&self) -> Vec<usize> {
        if self.destroyed {
            return Vec::new();
        }
        let mut lens = Vec::with_capacity(self.nodes.live());
        let mut cursor = Some(self.head);
        while let Some(id) = cursor {
            let node = self.nodes.get(id);
            lens.push(node.used);
            cursor = node.next;
        }
        lens
    }

    /// Inserts `item` so that it ends up at `index`, shifting later items
    /// back by one.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParam`] if `item` is not `item_size` bytes long, or
    ///   the list is destroyed;
    /// - [`Error::IndexOutOfRange`] if `index > len`;
    /// - [`Error::OutOfMemory`] if a node had to be split and the new node
    ///   could not be allocated. The list is unchanged in that case.
    ///
    /// # Complexity
    ///
    /// Finding the node takes time linear in the number of nodes; the
    /// insertion itself moves at most `items_per_node` items.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 2).unwrap();
    /// list.insert(0, &[3]).unwrap();
    /// list.insert(0, &[1]).unwrap();
    /// list.insert(1, &[2]).unwrap();
    /// list.insert(3, &[4]).unwrap();
    ///
    /// let items: Vec<u8> = list.iter().map(|item| item[0]).collect();
    /// assert_eq!(items, vec![1, 2, 3, 4]);
    /// ```
    pub fn insert(&mut self, index: usize, item: &[u8]) -> Result<()> {
        self.ensure_live()?;
        self.check_item(item)?;
        if index > self.len {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        if index == self.len {
            self.push_tail(item)?;
        } else {
            let pos = self.locate(index)?;
            let Position { node, offset } = self.make_room(pos)?;
            self.nodes
                .get_mut(node)
                .insert(self.config.item_size, offset, item);
        }
        self.len += 1;
        self.cursor.reset();
        #[cfg(debug_assertions)]
        self.assert_invariants();
        Ok(())
    }

    /// Appends `item` after the last item.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(2, 4).unwrap();
    /// list.append(&[1, 2]).unwrap();
    /// list.append(&[3, 4]).unwrap();
    /// assert_eq!(list.get(1).unwrap(), &[3, 4]);
    /// ```
    pub fn append(&mut self, item: &[u8]) -> Result<()> {
        self.insert(self.len, item)
    }

    /// Returns the item at `index`, borrowed from node storage.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index >= len`, and
    /// [`Error::InvalidParam`] if the list is destroyed.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::{Error, UnrolledList};
    ///
    /// let mut list = UnrolledList::new(4, 8).unwrap();
    /// list.append(&7u32.to_le_bytes()).unwrap();
    /// assert_eq!(list.get(0).unwrap(), &7u32.to_le_bytes());
    /// assert_eq!(list.get(1), Err(Error::IndexOutOfRange { index: 1, len: 1 }));
    /// ```
    pub fn get(&self, index: usize) -> Result<&[u8]> {
        self.ensure_live()?;
        let Position { node, offset } = self.locate(index)?;
        Ok(self.nodes.get(node).item(self.config.item_size, offset))
    }

    /// Returns the item at `index` for in-place modification.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut [u8]> {
        self.ensure_live()?;
        let Position { node, offset } = self.locate(index)?;
        let size = self.config.item_size;
        Ok(self.nodes.get_mut(node).item_mut(size, offset))
    }

    /// Copies the item at `index` into `out`, which must be `item_size`
    /// bytes long.
    pub fn get_into(&self, index: usize, out: &mut [u8]) -> Result<()> {
        self.check_item(out)?;
        out.copy_from_slice(self.get(index)?);
        Ok(())
    }

    /// Removes the item at `index`, copying it into `out` if one is given.
    ///
    /// When the item's node drops below half capacity it is refilled from
    /// its next node (or previous node, for the tail); a neighbour drained
    /// by that is freed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParam`] if `out` is not `item_size` bytes long, or
    ///   the list is destroyed;
    /// - [`Error::IndexOutOfRange`] if `index >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 4).unwrap();
    /// for i in 0..6 {
    ///     list.append(&[i]).unwrap();
    /// }
    ///
    /// let mut out = [0];
    /// list.pop(0, Some(&mut out)).unwrap();
    /// assert_eq!(out, [0]);
    /// list.pop(0, None).unwrap();
    /// assert_eq!(list.len(), 4);
    /// assert_eq!(list.get(0).unwrap(), &[2]);
    /// ```
    pub fn pop(&mut self, index: usize, out: Option<&mut [u8]>) -> Result<()> {
        self.ensure_live()?;
        if let Some(out) = &out {
            self.check_item(out)?;
        }
        let Position { node, offset } = self.locate(index)?;
        self.nodes
            .get_mut(node)
            .remove(self.config.item_size, offset, out);
        self.len -= 1;
        self.refill(node);
        self.cursor.reset();
        #[cfg(debug_assertions)]
        self.assert_invariants();
        Ok(())
    }

    /// Removes and returns the item at `index`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(2, 4).unwrap();
    /// list.append(&[1, 1]).unwrap();
    /// list.append(&[2, 2]).unwrap();
    /// assert_eq!(list.remove(0).unwrap(), vec![1, 1]);
    /// assert_eq!(list.len(), 1);
    /// ```
    pub fn remove(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut out = vec![0; self.config.item_size];
        self.pop(index, Some(&mut out))?;
        Ok(out)
    }

    /// Removes every item, keeping a single empty node.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;
        while self.tail != self.head {
            let tail = self.tail;
            self.nodes.get_mut(tail).used = 0;
            self.free_node(tail);
        }
        self.nodes.get_mut(self.head).used = 0;
        self.len = 0;
        self.cursor.reset();
        Ok(())
    }
}
