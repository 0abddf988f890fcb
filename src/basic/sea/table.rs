//! Tables.
//!
//! The `Table` is a collection geared toward tracking one-to-one
//! relationships keyed by dense indices, with O(1) memory allocations.
//!
//! In exchange for the efficiency, it only offers a limited interface.

use std::marker;

//
//  Public Types
//

/// TableIndex.
///
/// The keys in `Table` must implement the `TableIndex` trait.
pub trait TableIndex {
    /// Creates an instance of the type from an index.
    fn from_index(index: usize) -> Self;

    /// Returns the index in a `Table` of this key.
    fn index(&self) -> usize;
}

/// Table.
///
/// An append-only container mapping a key to a single value.
#[derive(Clone, Debug)]
pub struct Table<K: TableIndex, V> {
    //  Pool of all values, in order of insertion.
    values: Vec<V>,
    //  Marker for ownership reasons.
    _marker: marker::PhantomData<*const K>,
}

//
//  Public Methods
//

impl<K: TableIndex, V> Table<K, V> {
    /// Creates an instance.
    pub fn new() -> Self { Default::default() }

    /// Returns the number of values in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn len(&self) -> usize { self.values.len() }

    /// Returns the value associated to a key.
    ///
    /// # Complexity
    ///
    /// O(1)
    ///
    /// # Panics
    ///
    /// Panics if the key does not exist.
    pub fn at<'a>(&'a self, key: &K) -> &'a V {
        self.get(key).expect("Invalid key")
    }

    /// Returns the value associated to a key.
    ///
    /// If there is no such key, returns `None`.
    ///
    /// # Complexity
    ///
    /// O(1)
    pub fn get<'a>(&'a self, key: &K) -> Option<&'a V> {
        self.values.get(key.index())
    }

    /// Appends a value, returning the key it is associated to.
    ///
    /// # Complexity
    ///
    /// Amortized O(1)
    pub fn extend(&mut self, value: V) -> K {
        let key = K::from_index(self.len());
        self.values.push(value);
        key
    }
}

impl<K: TableIndex, V: Clone + Default> Table<K, V> {
    /// Returns the value associated to a key, inserting default values up to
    /// and including the key if necessary.
    ///
    /// # Complexity
    ///
    /// Amortized O(1) if the key exists, O(key.index() - self.len()) otherwise.
    pub fn entry<'a>(&'a mut self, key: &K) -> &'a mut V {
        let index = key.index();

        if index >= self.len() {
            self.values.resize(index + 1, Default::default());
        }

        &mut self.values[index]
    }
}

//
//  Trait Implementations
//

impl<K: TableIndex, V> Default for Table<K, V> {
    fn default() -> Self {
       Table {
            values: Default::default(),
            _marker: marker::PhantomData,
        }
    }
}

//
//  Tests
//
#[cfg(test)]
mod tests {
    use super::{Table, TableIndex};

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Key(usize);

    impl TableIndex for Key {
        fn from_index(index: usize) -> Self { Key(index) }

        fn index(&self) -> usize { self.0 }
    }

    #[test]
    fn table_extend_hands_out_dense_keys() {
        let mut table: Table<Key, &'static str> = Table::new();

        assert_eq!(table.extend("zero"), Key(0));
        assert_eq!(table.extend("one"), Key(1));

        assert_eq!(table.len(), 2);
        assert_eq!(*table.at(&Key(1)), "one");
        assert_eq!(table.get(&Key(2)), None);
    }

    #[test]
    fn table_entry_grows_on_demand() {
        let mut table: Table<Key, Option<u32>> = Table::new();

        *table.entry(&Key(1)) = Some(3);
        assert_eq!(table.len(), 2);

        *table.entry(&Key(1)) = Some(4);
        assert_eq!(table.len(), 2);
        assert_eq!(*table.at(&Key(1)), Some(4));
    }
}
