/// One bounded response of the remote API together with the server's count of
/// all items in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u32) -> Self {
        Self { items, total }
    }

    pub fn len(&self) -> u32 {
        self.items.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Position of a running traversal. Lives only as long as its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCursor {
    pub key: String,
    pub offset: u32,
    pub limit: u32,
    /// Last total reported by the server, `None` until the first page arrives.
    pub total: Option<u32>,
}

impl FetchCursor {
    pub fn start(key: impl Into<String>, limit: u32) -> Self {
        Self {
            key: key.into(),
            offset: 0,
            limit: limit.max(1),
            total: None,
        }
    }

    pub fn advance(&mut self) {
        self.offset = self.offset.saturating_add(self.limit);
    }

    pub fn rewind(&mut self) {
        self.offset = 0;
    }

    /// True once the cursor points past the last reported item.
    pub fn exhausted(&self) -> bool {
        self.total.is_some_and(|total| self.offset >= total)
    }
}
