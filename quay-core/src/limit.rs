/// `LIMIT count` or `LIMIT offset,count`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(u64),
    Range { offset: u64, count: u64 },
}

impl Limit {
    pub fn new(count: u64) -> Self {
        Limit::Count(count)
    }
    pub fn range(offset: u64, count: u64) -> Self {
        Limit::Range { offset, count }
    }
    /// Skip `offset` rows and select to the end.
    pub fn offset(offset: u64) -> Self {
        Limit::Range {
            offset,
            count: u64::MAX,
        }
    }
}
