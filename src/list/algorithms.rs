use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};
use crate::list::UnrolledList;

/// Lists are equal when they hold items of the same size with the same
/// bytes in the same order. Node layout is not compared.
impl PartialEq for UnrolledList {
    fn eq(&self, other: &Self) -> bool {
        self.item_size() == other.item_size() && self.iter().eq(other.iter())
    }
}

impl Eq for UnrolledList {}

impl Hash for UnrolledList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item_size().hash(state);
        let mut len = 0_usize;
        for item in self {
            item.hash(state);
            len += 1;
        }
        len.hash(state);
    }
}

impl fmt::Debug for UnrolledList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_destroyed() {
            return f.write_str("UnrolledList(destroyed)");
        }
        f.debug_list().entries(self.iter()).finish()
    }
}

impl UnrolledList {
    /// Returns `true` if some item equals `item`.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(2, 4).unwrap();
    /// list.append(&[0, 1]).unwrap();
    /// list.append(&[2, 3]).unwrap();
    ///
    /// assert!(list.contains(&[2, 3]));
    /// assert!(!list.contains(&[1, 2]));
    /// ```
    pub fn contains(&self, item: &[u8]) -> bool {
        self.iter().any(|e| e == item)
    }

    /// Appends every item of `items`, a concatenation of `item_size` byte
    /// records.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParam`] if the length of `items` is not a multiple of
    /// `item_size`; nothing is appended in that case. On
    /// [`Error::OutOfMemory`] the items before the failing one stay appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::UnrolledList;
    ///
    /// let mut list = UnrolledList::new(2, 2).unwrap();
    /// list.extend_from_slice(&[1, 1, 2, 2, 3, 3]).unwrap();
    /// assert_eq!(list.len(), 3);
    /// assert_eq!(list.get(2).unwrap(), &[3, 3]);
    /// assert!(list.extend_from_slice(&[4]).is_err());
    /// ```
    pub fn extend_from_slice(&mut self, items: &[u8]) -> Result<()> {
        self.ensure_live()?;
        let size = self.item_size();
        if items.len() % size != 0 {
            return Err(Error::InvalidParam(
                "items length is not a multiple of item_size",
            ));
        }
        for item in items.chunks_exact(size) {
            self.append(item)?;
        }
        Ok(())
    }
}
