use std::fmt;
use std::iter::FusedIterator;
use std::ops::ControlFlow;

use crate::error::Result;
use crate::list::locate::Position;
use crate::list::UnrolledList;

/// An iterator over the items of an `UnrolledList`, as `item_size` byte
/// slices.
///
/// It keeps two gaps, `front` and `back`, with `len` items between them.
/// Unlike [`UnrolledList::next_item`], it borrows the list and leaves the
/// list's own iteration cursor alone.
///
/// # Examples
///
/// ```compile_fail
/// use unrolled_list::UnrolledList;
///
/// let mut list = UnrolledList::new(1, 4).unwrap();
/// list.append(&[1]).unwrap();
/// let mut iter = list.iter();
///
/// // Won't compile, because list is already borrowed immutably.
/// list.append(&[2]).unwrap();
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a> {
    list: &'a UnrolledList,
    front: Position,
    back: Position,
    len: usize,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(list: &'a UnrolledList) -> Self {
        let front = Position {
            node: list.head,
            offset: 0,
        };
        let back = Position {
            node: list.tail,
            offset: list.nodes.get(list.tail).used,
        };
        Self {
            list,
            front,
            back,
            len: list.len,
        }
    }

    fn item(&self, pos: Position) -> &'a [u8] {
        self.list
            .nodes
            .get(pos.node)
            .item(self.list.config.item_size, pos.offset)
    }
}

impl<'a> fmt::Debug for Iter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.len).finish()
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        // `len > 0` guarantees an item lies ahead, so `next` exists whenever
        // the current node is exhausted.
        let nodes = &self.list.nodes;
        while self.front.offset == nodes.get(self.front.node).used {
            self.front = Position {
                node: nodes.get(self.front.node).next?,
                offset: 0,
            };
        }
        let current = self.front;
        self.front.offset += 1;
        self.len -= 1;
        Some(self.item(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    fn last(mut self) -> Option<Self::Item>
    where
        Self: Sized,
    {
        self.next_back()
    }
}

impl<'a> DoubleEndedIterator for Iter<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }
        let nodes = &self.list.nodes;
        while self.back.offset == 0 {
            let prev = nodes.get(self.back.node).prev?;
            self.back = Position {
                node: prev,
                offset: nodes.get(prev).used,
            };
        }
        self.back.offset -= 1;
        self.len -= 1;
        Some(self.item(self.back))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}

impl<'a> FusedIterator for Iter<'a> {}

impl<'a> IntoIterator for &'a UnrolledList {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl UnrolledList {
    /// Provides a double-ended iterator over the items.
    ///
    /// A destroyed list yields nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 2).unwrap();
    /// for i in 0..5 {
    ///     list.append(&[i]).unwrap();
    /// }
    ///
    /// let mut iter = list.iter();
    /// assert_eq!(iter.next(), Some(&[0][..]));
    /// assert_eq!(iter.next_back(), Some(&[4][..]));
    /// assert_eq!(iter.len(), 3);
    /// assert_eq!(iter.map(|item| item[0]).collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        if self.is_destroyed() {
            // no live nodes: `len == 0` keeps the positions from being read
            let end = Position {
                node: self.head,
                offset: 0,
            };
            return Iter {
                list: self,
                front: end,
                back: end,
                len: 0,
            };
        }
        Iter::new(self)
    }

    /// Calls `handler` with each index and item, from the last item to the
    /// first, until it returns [`ControlFlow::Break`].
    ///
    /// The list's iteration cursor is not used or changed.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParam`](crate::Error::InvalidParam) if the list is
    /// destroyed.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::ops::ControlFlow;
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 4).unwrap();
    /// for i in 0..10 {
    ///     list.append(&[i]).unwrap();
    /// }
    ///
    /// let mut seen = Vec::new();
    /// list.iterate_backwards(|index, item| {
    ///     seen.push((index, item[0]));
    ///     if index == 7 {
    ///         ControlFlow::Break(())
    ///     } else {
    ///         ControlFlow::Continue(())
    ///     }
    /// })
    /// .unwrap();
    /// assert_eq!(seen, vec![(9, 9), (8, 8), (7, 7)]);
    /// ```
    pub fn iterate_backwards<F>(&self, mut handler: F) -> Result<()>
    where
        F: FnMut(usize, &[u8]) -> ControlFlow<()>,
    {
        self.ensure_live()?;
        for (index, item) in self.iter().enumerate().rev() {
            if handler(index, item).is_break() {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, UnrolledList};
    use std::ops::ControlFlow;

    fn list_of(items_per_node: usize, n: u32) -> UnrolledList {
        let mut list = UnrolledList::new(4, items_per_node).unwrap();
        for i in 0..n {
            list.append(&i.to_le_bytes()).unwrap();
        }
        list
    }

    fn decode(item: &[u8]) -> u32 {
        let mut out = [0; 4];
        out.copy_from_slice(item);
        u32::from_le_bytes(out)
    }

    #[test]
    fn iter_forward_and_back() {
        let list = list_of(3, 100);
        assert_eq!(list.iter().len(), 100);
        assert_eq!(
            list.iter().map(decode).collect::<Vec<_>>(),
            (0..100).collect::<Vec<_>>()
        );
        assert_eq!(
            list.iter().rev().map(decode).collect::<Vec<_>>(),
            (0..100).rev().collect::<Vec<_>>()
        );
        assert_eq!(list.iter().last().map(decode), Some(99));
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let list = list_of(4, 9);
        let mut iter = list.iter();
        let mut front = Vec::new();
        let mut back = Vec::new();
        loop {
            match iter.next() {
                Some(item) => front.push(decode(item)),
                None => break,
            }
            match iter.next_back() {
                Some(item) => back.push(decode(item)),
                None => break,
            }
        }
        assert_eq!(front, vec![0, 1, 2, 3, 4]);
        assert_eq!(back, vec![8, 7, 6, 5]);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn iter_empty_and_destroyed() {
        let mut list = list_of(4, 0);
        assert_eq!(list.iter().next(), None);
        list.append(&1u32.to_le_bytes()).unwrap();
        list.destroy().unwrap();
        assert_eq!(list.iter().next(), None);
        assert_eq!((&list).into_iter().len(), 0);
    }

    #[test]
    fn iterate_backwards_all() {
        let list = list_of(5, 1000);
        let mut invocations = 0;
        list.iterate_backwards(|index, item| {
            invocations += 1;
            assert_eq!(decode(item) as usize, index);
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(invocations, 1000);
    }

    #[test]
    fn iterate_backwards_stops_early() {
        let list = list_of(5, 1000);
        let mut invocations = 0;
        list.iterate_backwards(|index, _| {
            invocations += 1;
            if index == 211 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();
        assert_eq!(invocations, 1000 - 211);
    }

    #[test]
    fn iterate_backwards_empty_and_destroyed() {
        let mut list = list_of(5, 0);
        let mut invocations = 0;
        list.iterate_backwards(|_, _| {
            invocations += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
        assert_eq!(invocations, 0);

        list.destroy().unwrap();
        assert!(matches!(
            list.iterate_backwards(|_, _| ControlFlow::Continue(())),
            Err(Error::InvalidParam(_))
        ));
    }
}
