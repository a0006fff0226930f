//! Element-typed view over [`HeaderVec`].
//!
//! Every operation converts element counts to byte counts with
//! `size_of::<T>()` and forwards to the byte-level engine. Errors are
//! reported in elements rather than bytes.

use std::marker::PhantomData;
use std::mem::{align_of, size_of};

use bytemuck::Pod;
use hvec_alloc::{ByteAllocator, MIN_ALIGN};
use hvec_common::{Error, ErrorKind, Result};

use crate::vec::HeaderVec;

/// A growable vector of plain-old-data elements stored in a [`HeaderVec`].
///
/// `T` must be non-zero-sized and aligned to no more than [`MIN_ALIGN`]
/// bytes; both are checked at compile time.
pub struct TypedVec<'a, T> {
    bytes: HeaderVec<'a>,
    _marker: PhantomData<T>,
}

impl<'a, T: Pod> TypedVec<'a, T> {
    const ELEM: usize = size_of::<T>();

    const LAYOUT_OK: () = {
        assert!(size_of::<T>() != 0, "zero-sized elements are not supported");
        assert!(
            align_of::<T>() <= MIN_ALIGN,
            "element alignment exceeds the vector data alignment"
        );
    };

    /// Creates an empty vector that owns no memory yet.
    pub const fn new() -> TypedVec<'a, T> {
        let () = Self::LAYOUT_OK;
        TypedVec {
            bytes: HeaderVec::new(),
            _marker: PhantomData,
        }
    }

    /// Creates a vector bound to the default allocator, with room for
    /// `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<TypedVec<'a, T>> {
        let () = Self::LAYOUT_OK;
        let bytes = HeaderVec::with_capacity(Self::byte_count(0, capacity)?)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Creates a vector bound to `allocator`, with room for `capacity`
    /// elements.
    pub fn with_capacity_in(
        capacity: usize,
        allocator: &'a dyn ByteAllocator,
    ) -> Result<TypedVec<'a, T>> {
        let () = Self::LAYOUT_OK;
        let bytes = HeaderVec::with_capacity_in(Self::byte_count(0, capacity)?, allocator)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Creates a vector bound to the default allocator holding a copy of
    /// `items`, with no spare capacity.
    pub fn from_slice(items: &[T]) -> Result<TypedVec<'a, T>> {
        let mut vec = Self::with_capacity(items.len())?;
        vec.extend_from_slice(items)?;
        Ok(vec)
    }

    /// Returns the number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len() / Self::ELEM
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of elements the vector can hold without
    /// reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity() / Self::ELEM
    }

    #[inline]
    pub fn allocator(&self) -> Option<&'a dyn ByteAllocator> {
        self.bytes.allocator()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        if self.bytes.is_empty() {
            return &[];
        }
        bytemuck::cast_slice(self.bytes.as_slice())
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        if self.bytes.is_empty() {
            return &mut [];
        }
        bytemuck::cast_slice_mut(self.bytes.as_mut_slice())
    }

    /// Returns the underlying bytes.
    #[inline]
    pub fn as_bytes(&self) -> &HeaderVec<'a> {
        &self.bytes
    }

    /// Consumes the typed view, returning the underlying byte vector.
    pub fn into_bytes(self) -> HeaderVec<'a> {
        self.bytes
    }

    /// Ensures room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let additional_bytes = Self::byte_count(self.len(), additional)?;
        self.bytes.reserve(additional_bytes).map_err(Self::in_elements)
    }

    /// Appends `item` to the end of the vector.
    pub fn push(&mut self, item: T) -> Result<()> {
        self.bytes
            .append(bytemuck::bytes_of(&item))
            .map_err(Self::in_elements)
    }

    /// Appends a copy of `items`.
    pub fn extend_from_slice(&mut self, items: &[T]) -> Result<()> {
        self.bytes
            .append(bytemuck::cast_slice(items))
            .map_err(Self::in_elements)
    }

    /// Removes and returns the last element.
    ///
    /// # Errors
    ///
    /// `NullBuffer` on an unallocated vector, `SizeOutOfRange` on an empty one.
    pub fn pop(&mut self) -> Result<T> {
        let Some(&last) = self.as_slice().last() else {
            return Err(if self.bytes.is_allocated() {
                Error::size_out_of_range(1, 0)
            } else {
                Error::null_buffer("pop")
            });
        };
        self.bytes.truncate_by(Self::ELEM)?;
        Ok(last)
    }

    /// Inserts `item` at `index`, with the same past-the-end policy as
    /// [`HeaderVec::insert`].
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.bytes
            .insert(
                index.saturating_mul(Self::ELEM),
                bytemuck::bytes_of(&item),
            )
            .map_err(|e| Self::at_index(e, index))
    }

    /// Removes the element at `index`, with the same past-the-end policy as
    /// [`HeaderVec::remove`].
    pub fn remove(&mut self, index: usize) -> Result<()> {
        self.bytes
            .remove(index.saturating_mul(Self::ELEM), Self::ELEM)
            .map_err(|e| Self::at_index(e, index))
    }

    #[inline]
    fn from_bytes(bytes: HeaderVec<'a>) -> TypedVec<'a, T> {
        TypedVec {
            bytes,
            _marker: PhantomData,
        }
    }

    /// Byte size of `count` elements, for a vector currently holding `len`.
    fn byte_count(len: usize, count: usize) -> Result<usize> {
        count
            .checked_mul(Self::ELEM)
            .ok_or_else(|| Error::capacity_overflow(len, count))
    }

    /// Like [`Self::in_elements`], but reports the caller's element `index`
    /// rather than the (possibly saturated) byte offset derived from it.
    fn at_index(error: Error, index: usize) -> Error {
        match error.into_kind() {
            ErrorKind::IndexOutOfRange { len, .. } => {
                Error::index_out_of_range(index, len / Self::ELEM)
            }
            kind => Self::in_elements(kind.into()),
        }
    }

    /// Rescales the byte quantities carried by `error` to elements.
    fn in_elements(error: Error) -> Error {
        let n = Self::ELEM;
        match error.into_kind() {
            ErrorKind::CapacityOverflow { len, additional } => {
                Error::capacity_overflow(len / n, additional / n)
            }
            ErrorKind::SizeOutOfRange { amount, len } => {
                Error::size_out_of_range(amount / n, len / n)
            }
            ErrorKind::IndexOutOfRange { index, len } => {
                Error::index_out_of_range(index / n, len / n)
            }
            kind => kind.into(),
        }
    }
}

impl<T: Pod> Default for TypedVec<'_, T> {
    fn default() -> Self {
        TypedVec::new()
    }
}

impl<T: Pod> std::ops::Deref for TypedVec<'_, T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<T: Pod> std::ops::DerefMut for TypedVec<'_, T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl<T: Pod + std::fmt::Debug> std::fmt::Debug for TypedVec<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};
    use hvec_alloc::SizeHintAllocator;
    use hvec_common::Status;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn test_push_pop() {
        let mut vec = TypedVec::<u32>::new();
        for i in 0..100 {
            vec.push(i).unwrap();
        }
        assert_eq!(vec.len(), 100);
        assert_eq!(vec.as_slice()[42], 42);
        assert_eq!(vec.pop().unwrap(), 99);
        assert_eq!(vec.len(), 99);
    }

    #[test]
    fn test_pop_empty() {
        let mut vec = TypedVec::<u64>::new();
        let err = vec.pop().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::NullBuffer { operation: "pop" });

        let mut vec = TypedVec::<u64>::with_capacity_in(4, &SizeHintAllocator).unwrap();
        let err = vec.pop().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::SizeOutOfRange { amount: 1, len: 0 });
    }

    #[test]
    fn test_capacity_in_elements() {
        let vec = TypedVec::<u64>::with_capacity_in(10, &SizeHintAllocator).unwrap();
        assert_eq!(vec.capacity(), 10);
        assert_eq!(vec.as_bytes().capacity(), 80);
        assert!(vec.is_empty());
        assert!(vec.as_slice().is_empty());
    }

    #[test]
    fn test_insert_remove() {
        let mut vec = TypedVec::from_slice(&[1u16, 2, 4, 5]).unwrap();
        vec.insert(2, 3).unwrap();
        assert_eq!(vec.as_slice(), &[1, 2, 3, 4, 5]);
        vec.remove(0).unwrap();
        assert_eq!(vec.as_slice(), &[2, 3, 4, 5]);

        let err = vec.insert(7, 6).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::IndexOutOfRange { index: 7, len: 4 });
        assert_eq!(vec.as_slice(), &[2, 3, 4, 5, 6]);

        let err = vec.remove(9).unwrap_err();
        assert_eq!(Status::from(&err), Status::OutOfRange);
        assert_eq!(vec.as_slice(), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_huge_index_reported_in_elements() {
        let mut vec = TypedVec::<u64>::with_capacity_in(4, &SizeHintAllocator).unwrap();
        vec.push(1).unwrap();

        let err = vec.insert(usize::MAX / 2, 2).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::IndexOutOfRange { index: usize::MAX / 2, len: 1 }
        );
        assert_eq!(vec.as_slice(), &[1, 2]);

        let err = vec.remove(usize::MAX).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::IndexOutOfRange { index: usize::MAX, len: 2 }
        );
        assert_eq!(vec.as_slice(), &[1]);
    }

    #[test]
    fn test_struct_elements() {
        let mut vec = TypedVec::<Point>::with_capacity_in(1, &SizeHintAllocator).unwrap();
        vec.push(Point { x: 1, y: 2 }).unwrap();
        vec.push(Point { x: 3, y: 4 }).unwrap();
        vec.as_mut_slice()[0].x = 10;
        assert_eq!(vec[0], Point { x: 10, y: 2 });
        assert_eq!(vec.capacity(), 2);
        assert_eq!(vec.pop().unwrap(), Point { x: 3, y: 4 });
    }

    #[test]
    fn test_reserve_overflow_in_elements() {
        let mut vec = TypedVec::<u64>::with_capacity_in(2, &SizeHintAllocator).unwrap();
        vec.push(1).unwrap();
        let err = vec.reserve(usize::MAX / 4).unwrap_err();
        assert_eq!(err.status().code(), 2);
        assert_eq!(vec.as_slice(), &[1]);
    }

    #[test]
    fn test_into_bytes() {
        let vec = TypedVec::from_slice(&[0x0102_0304u32]).unwrap();
        let bytes = vec.into_bytes();
        assert_eq!(bytes.as_slice(), &0x0102_0304u32.to_ne_bytes());
    }

    #[test]
    fn test_debug_lists_elements() {
        let vec = TypedVec::from_slice(&[1u8, 2, 3]).unwrap();
        assert_eq!(format!("{vec:?}"), "[1, 2, 3]");
    }
}
