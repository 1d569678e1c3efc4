//! Using `Vec` as a map for typed index keys.

use std::marker::PhantomData;

/// Wrapper for `Vec` when using it as a map with a key type that has a
/// canonical mapping to indices.
///
/// Items can only be added or removed at the end, so the set of present
/// keys always maps to `0..n` for some `n`.
#[repr(transparent)]
pub struct VecMap<Key, Value>(Vec<Value>, PhantomData<Key>);

impl<Key, Value> VecMap<Key, Value> {
    /// Returns an iterator over the keys for which values are present.
    pub fn keys(&self) -> Keys<Key> {
        Keys(0..self.len(), PhantomData)
    }
}

/// Iterator over the present keys of a [`VecMap`].
pub struct Keys<Key>(std::ops::Range<usize>, PhantomData<Key>);

impl<Key: VecMapKey> Iterator for Keys<Key> {
    type Item = Key;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(Key::vec_map_key_from_index)
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// Type that can be used as key for [`VecMap`].
pub trait VecMapKey: VecMapIndex + Sized {
    /// Constructs a key from the array index.
    fn vec_map_key_from_index(index: usize) -> Self;
}

/// Type that can be used to access an item in a [`VecMap`].
///
/// This allows multiple types to index the same map when there is a
/// canonical conversion, e.g. from literals to variables.
pub trait VecMapIndex<Key = Self> {
    /// Returns the corresponding index for a key.
    fn vec_map_index(&self) -> usize;
}

impl<Key, Value> Default for VecMap<Key, Value> {
    #[inline(always)]
    fn default() -> Self {
        VecMap(vec![], PhantomData)
    }
}

impl<Key, Value> std::fmt::Debug for VecMap<Key, Value>
where
    Value: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(&self.0, f)
    }
}

impl<Key, Value> From<Vec<Value>> for VecMap<Key, Value> {
    #[inline(always)]
    fn from(vec: Vec<Value>) -> Self {
        VecMap(vec, PhantomData)
    }
}

impl<Key, Value> std::ops::Deref for VecMap<Key, Value> {
    type Target = Vec<Value>;

    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<Key, Value> std::ops::DerefMut for VecMap<Key, Value> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<Key, Value, I: VecMapIndex<Key>> std::ops::Index<I> for VecMap<Key, Value> {
    type Output = Value;

    #[inline(always)]
    fn index(&self, index: I) -> &Self::Output {
        self.0.index(index.vec_map_index())
    }
}

impl<Key, Value, I: VecMapIndex<Key>> std::ops::IndexMut<I> for VecMap<Key, Value> {
    #[inline(always)]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        self.0.index_mut(index.vec_map_index())
    }
}

impl<'a, Key, Value> IntoIterator for &'a VecMap<Key, Value> {
    type Item = &'a Value;

    type IntoIter = <&'a Vec<Value> as IntoIterator>::IntoIter;

    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
