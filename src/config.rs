use crate::error::{Error, Result};

/// Creation parameters of an [`UnrolledList`](crate::UnrolledList).
///
/// Both values are fixed for the lifetime of the list.
///
/// # Examples
///
/// ```
/// use unrolled_list::{ListConfig, UnrolledList};
///
/// let config = ListConfig::new(8).items_per_node(4);
/// assert_eq!(config.node_bytes(), Some(32));
///
/// let list = UnrolledList::with_config(config).unwrap();
/// assert_eq!(list.items_per_node(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListConfig {
    /// Size of one item in bytes.
    pub item_size: usize,
    /// Maximum number of items held by one node.
    pub items_per_node: usize,
}

impl ListConfig {
    /// Smallest accepted node capacity. A node of one item could never be
    /// split into two non-empty halves.
    pub const MIN_ITEMS_PER_NODE: usize = 2;

    pub const DEFAULT_ITEMS_PER_NODE: usize = 32;

    /// Config for items of `item_size` bytes, with the default node capacity.
    pub fn new(item_size: usize) -> Self {
        Self {
            item_size,
            items_per_node: Self::DEFAULT_ITEMS_PER_NODE,
        }
    }

    /// Sets the node capacity.
    pub fn items_per_node(mut self, items_per_node: usize) -> Self {
        self.items_per_node = items_per_node;
        self
    }

    /// Bytes of item storage in one node, or `None` on overflow.
    pub fn node_bytes(&self) -> Option<usize> {
        self.item_size.checked_mul(self.items_per_node)
    }

    /// Checks the parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use unrolled_list::{Error, ListConfig};
    ///
    /// assert!(ListConfig::new(4).validate().is_ok());
    /// assert!(matches!(ListConfig::new(0).validate(), Err(Error::InvalidParam(_))));
    /// assert!(matches!(
    ///     ListConfig::new(4).items_per_node(1).validate(),
    ///     Err(Error::InvalidParam(_))
    /// ));
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.item_size == 0 {
            return Err(Error::InvalidParam("item_size must be non-zero"));
        }
        if self.items_per_node < Self::MIN_ITEMS_PER_NODE {
            return Err(Error::InvalidParam("items_per_node must be at least 2"));
        }
        if self.node_bytes().is_none() {
            return Err(Error::InvalidParam("node size overflows usize"));
        }
        Ok(())
    }

    /// The half-full threshold every node but the tail must reach.
    pub(crate) fn half(&self) -> usize {
        self.items_per_node / 2
    }
}
