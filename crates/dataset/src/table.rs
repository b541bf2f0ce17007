use core_types::{Column, Kline};

/// An immutable, ordered table of klines.
///
/// There are no mutating methods: once built, a `Dataset` is only ever read.
/// Callers that need derived columns build their own scratch vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Kline>,
}

impl Dataset {
    pub fn new(records: Vec<Kline>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Kline] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Kline> {
        self.records.iter()
    }

    /// Copies one numeric column out of the table, in row order.
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.records.iter().map(|k| k.value(column)).collect()
    }
}

impl FromIterator<Kline> for Dataset {
    fn from_iter<I: IntoIterator<Item = Kline>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Kline;
    type IntoIter = std::slice::Iter<'a, Kline>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
