//! This crate provides an unrolled linked list: a doubly-linked chain of
//! fixed-capacity nodes, each holding a contiguous run of fixed-size items.
//!
//! The [`UnrolledList`] keeps array-like locality inside a node while
//! inserting and removing in the middle of the list only shifts items within
//! one node. In compromise, a full node must occasionally be split, and an
//! underflowing node refilled from a neighbour.
//!
//! Items are type-erased byte records: the list is created with an item size,
//! and every item passed in or handed out is a `&[u8]` of exactly that many
//! bytes.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use unrolled_list::UnrolledList;
//!
//! // 4-byte items, at most 3 per node
//! let mut list = UnrolledList::new(4, 3).unwrap();
//! for i in 0..10u32 {
//!     list.append(&i.to_le_bytes()).unwrap();
//! }
//!
//! list.insert(5, &100u32.to_le_bytes()).unwrap();
//! assert_eq!(list.get(5).unwrap(), &100u32.to_le_bytes());
//! assert_eq!(list.get(6).unwrap(), &5u32.to_le_bytes());
//!
//! let mut out = [0; 4];
//! list.pop(0, Some(&mut out)).unwrap();
//! assert_eq!(u32::from_le_bytes(out), 0);
//! assert_eq!(list.len(), 10);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the list is like the following graph:
//! ```text
//!      head                                                tail
//!        ↓                                                   ↓
//!  ╔═══════════╗           ╔═══════════╗           ╔═══════════╗
//!  ║   next    ║ ────────→ ║   next    ║ ────────→ ║ next: -   ║
//!  ╟───────────╢           ╟───────────╢           ╟───────────╢
//!  ║ prev: -   ║ ←──────── ║   prev    ║ ←──────── ║   prev    ║
//!  ╟───────────╢           ╟───────────╢           ╟───────────╢
//!  ║ used: 3   ║           ║ used: 2   ║           ║ used: 1   ║
//!  ╟───┬───┬───╢           ╟───┬───┬───╢           ╟───┬───┬───╢
//!  ║ 0 │ 1 │ 2 ║           ║ 3 │ 4 │   ║           ║ 5 │   │   ║
//!  ╚═══╧═══╧═══╝           ╚═══╧═══╧═══╝           ╚═══╧═══╧═══╝
//!     Node 0                  Node 1                  Node 2
//! ```
//! The `UnrolledList` contains:
//! - an arena owning every node; links between nodes are arena handles, not
//!   pointers;
//! - handles of the `head` and `tail` nodes;
//! - the item count `len`, always the sum of `used` over all nodes;
//! - the state of the stateful iteration cursor.
//!
//! Each node holds:
//! - the `next` and `prev` links (none at the tail and the head);
//! - `used`, the number of populated item slots;
//! - storage for exactly `items_per_node` items.
//!
//! A new list has one empty node, which is both head and tail. Between
//! operations:
//! - every node except the tail holds at least `items_per_node / 2` items;
//! - no empty node is kept, except the single node of an empty list.
//!
//! # Iteration
//!
//! There are two ways to walk a list.
//!
//! [`UnrolledList::iter`] returns a borrowing [`Iter`], a double-ended
//! iterator that works like the iterator of a slice.
//!
//! [`UnrolledList::next_item`] and [`UnrolledList::previous_item`] step a
//! cursor stored in the list itself. Reaching an end yields `None` and resets
//! the cursor, so the next call starts over. [`set_iteration_start`] picks
//! where iteration starts. Any insertion or removal resets the cursor.
//!
//! ## Examples
//!
//! ```
//! use unrolled_list::UnrolledList;
//!
//! let mut list = UnrolledList::new(1, 4).unwrap();
//! list.extend_from_slice(&[1, 2, 3]).unwrap();
//!
//! let mut iter = list.iter();
//! assert_eq!(iter.next(), Some(&[1][..]));
//! assert_eq!(iter.next_back(), Some(&[3][..]));
//!
//! list.set_iteration_start(1).unwrap();
//! assert_eq!(list.next_item().unwrap(), Some(&[2][..]));
//! assert_eq!(list.next_item().unwrap(), Some(&[3][..]));
//! assert_eq!(list.next_item().unwrap(), None);
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`Result`], with the failure described by
//! [`Error`]. Node allocation is fallible: when a node cannot be allocated
//! the operation reports [`Error::OutOfMemory`] and leaves the list as it
//! was.
//!
//! # Logging
//!
//! The list emits [`tracing`] events: `debug` when a list is created or
//! destroyed, `trace` for node allocation, splitting, merging and freeing.
//!
//! [`set_iteration_start`]: UnrolledList::set_iteration_start

#[doc(inline)]
pub use config::ListConfig;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use list::iterator::Iter;
#[doc(inline)]
pub use list::UnrolledList;

pub mod list;

mod config;
mod error;
