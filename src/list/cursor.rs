use crate::error::Result;
use crate::list::locate::Position;
use crate::list::UnrolledList;

/// Iteration state stored in each list.
///
/// The cursor sits in a gap between two items: a forward step returns the
/// item after the gap, a backward step the item before it. `at` is `None`
/// when no iteration is in progress, in which case the next step seats the
/// cursor at `start` (if set) or at the matching end of the list.
///
/// Every mutation of the list resets the whole state, since node handles and
/// offsets may no longer point where they did.
#[derive(Debug, Clone, Default)]
pub(crate) struct IterCursor {
    at: Option<Position>,
    /// where the item of an explicit start index lives
    start: Option<Position>,
}

impl IterCursor {
    pub(crate) fn reset(&mut self) {
        self.at = None;
        self.start = None;
    }
}

impl UnrolledList {
    /// Returns the next item of the stateful forward iteration, or `None`
    /// once the end of the list is reached.
    ///
    /// The first call returns the first item, or the item at the index given
    /// to [`set_iteration_start`]. After `None` the cursor is reset, so the
    /// following call starts over the same way.
    ///
    /// Unlike [`get`], each step is *O*(1): the cursor remembers its node.
    /// Inserting or popping resets the iteration.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 2).unwrap();
    /// for i in 0..3 {
    ///     list.append(&[i]).unwrap();
    /// }
    ///
    /// assert_eq!(list.next_item().unwrap(), Some(&[0][..]));
    /// assert_eq!(list.next_item().unwrap(), Some(&[1][..]));
    /// assert_eq!(list.next_item().unwrap(), Some(&[2][..]));
    /// assert_eq!(list.next_item().unwrap(), None);
    /// // starts over
    /// assert_eq!(list.next_item().unwrap(), Some(&[0][..]));
    /// ```
    ///
    /// [`set_iteration_start`]: UnrolledList::set_iteration_start
    /// [`get`]: UnrolledList::get
    pub fn next_item(&mut self) -> Result<Option<&[u8]>> {
        self.ensure_live()?;
        let mut pos = match self.cursor.at.or(self.cursor.start) {
            Some(pos) => pos,
            None => Position {
                node: self.head,
                offset: 0,
            },
        };
        loop {
            let node = self.nodes.get(pos.node);
            if pos.offset < node.used {
                break;
            }
            match node.next {
                Some(next) => pos = Position { node: next, offset: 0 },
                None => {
                    self.cursor.at = None;
                    return Ok(None);
                }
            }
        }
        self.cursor.at = Some(Position {
            node: pos.node,
            offset: pos.offset + 1,
        });
        Ok(Some(
            self.nodes
                .get(pos.node)
                .item(self.config.item_size, pos.offset),
        ))
    }

    /// Returns the previous item of the stateful backward iteration, or
    /// `None` once the start of the list is passed.
    ///
    /// The first call returns the last item, or the item at the index given
    /// to [`set_iteration_start`]. After `None` the cursor is reset, so the
    /// following call starts over the same way.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(1, 2).unwrap();
    /// for i in 0..3 {
    ///     list.append(&[i]).unwrap();
    /// }
    ///
    /// assert_eq!(list.previous_item().unwrap(), Some(&[2][..]));
    /// assert_eq!(list.previous_item().unwrap(), Some(&[1][..]));
    /// assert_eq!(list.previous_item().unwrap(), Some(&[0][..]));
    /// assert_eq!(list.previous_item().unwrap(), None);
    /// assert_eq!(list.previous_item().unwrap(), Some(&[2][..]));
    /// ```
    ///
    /// [`set_iteration_start`]: UnrolledList::set_iteration_start
    pub fn previous_item(&mut self) -> Result<Option<&[u8]>> {
        self.ensure_live()?;
        let mut pos = match (self.cursor.at, self.cursor.start) {
            (Some(pos), _) => pos,
            (None, Some(start)) => Position {
                node: start.node,
                offset: start.offset + 1,
            },
            (None, None) => Position {
                node: self.tail,
                offset: self.nodes.get(self.tail).used,
            },
        };
        while pos.offset == 0 {
            match self.nodes.get(pos.node).prev {
                Some(prev) => {
                    pos = Position {
                        node: prev,
                        offset: self.nodes.get(prev).used,
                    }
                }
                None => {
                    self.cursor.at = None;
                    return Ok(None);
                }
            }
        }
        pos.offset -= 1;
        self.cursor.at = Some(pos);
        Ok(Some(
            self.nodes
                .get(pos.node)
                .item(self.config.item_size, pos.offset),
        ))
    }

    /// Makes the item at `index` the first one returned by the next
    /// [`next_item`] or [`previous_item`] call, and by every call that
    /// starts over after reaching an end.
    ///
    /// The start index is forgotten when the list is modified or
    /// [`reset_iteration`] is called.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) if
    /// `index >= len`.
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
    ///
    /// list.set_iteration_start(8).unwrap();
    /// assert_eq!(list.next_item().unwrap(), Some(&[8][..]));
    /// assert_eq!(list.next_item().unwrap(), Some(&[9][..]));
    /// assert_eq!(list.next_item().unwrap(), None);
    /// assert_eq!(list.previous_item().unwrap(), Some(&[8][..]));
    /// assert_eq!(list.previous_item().unwrap(), Some(&[7][..]));
    /// ```
    ///
    /// [`next_item`]: UnrolledList::next_item
    /// [`previous_item`]: UnrolledList::previous_item
    /// [`reset_iteration`]: UnrolledList::reset_iteration
    pub fn set_iteration_start(&mut self, index: usize) -> Result<()> {
        self.ensure_live()?;
        let pos = self.locate(index)?;
        self.cursor.start = Some(pos);
        self.cursor.at = None;
        Ok(())
    }

    /// Abandons the current iteration and forgets the start index.
    pub fn reset_iteration(&mut self) {
        self.cursor.reset();
    }
}
