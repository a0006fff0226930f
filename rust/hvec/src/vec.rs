use std::marker::PhantomData;

use hvec_alloc::{ByteAllocator, default_allocator};
use hvec_common::Result;

use crate::header::{Header, HeaderPtr};

/// A growable byte vector whose size and allocator live in a header stored
/// immediately ahead of the data.
///
/// The handle itself is a single (nullable) pointer. An empty handle created
/// by [`HeaderVec::new`] owns no memory; the first reservation allocates a
/// block through the process-wide default allocator. A handle created with
/// [`HeaderVec::with_capacity_in`] is bound to the given allocator for its
/// entire lifetime, and the borrow of that allocator (`'a`) keeps it alive
/// for as long as the vector exists.
///
/// Growth may relocate the block; the handle is updated in place, so the
/// borrow checker rules out stale aliases of the old location.
pub struct HeaderVec<'a> {
    header: Option<HeaderPtr<'a>>,
    _marker: PhantomData<Header<'a>>,
}

impl<'a> HeaderVec<'a> {
    /// Creates an empty vector that owns no memory yet.
    pub const fn new() -> HeaderVec<'a> {
        HeaderVec {
            header: None,
            _marker: PhantomData,
        }
    }

    /// Creates a vector bound to the default allocator, with room for exactly
    /// `capacity` bytes (or more, if the allocator over-provisions).
    pub fn with_capacity(capacity: usize) -> Result<HeaderVec<'a>> {
        Self::with_capacity_in(capacity, default_allocator())
    }

    /// Creates a vector bound to `allocator`, with room for at least
    /// `capacity` bytes.
    pub fn with_capacity_in(
        capacity: usize,
        allocator: &'a dyn ByteAllocator,
    ) -> Result<HeaderVec<'a>> {
        let header = HeaderPtr::allocate(capacity, allocator)?;
        Ok(HeaderVec::from_header(header))
    }

    /// Creates a vector bound to the default allocator, containing a copy of
    /// `data` and no spare capacity.
    pub fn from_slice(data: &[u8]) -> Result<HeaderVec<'a>> {
        let mut vec = Self::with_capacity(data.len())?;
        vec.append(data)?;
        Ok(vec)
    }

    /// Returns `true` once the vector owns a block.
    #[inline]
    pub fn is_allocated(&self) -> bool {
        self.header.is_some()
    }

    /// Returns the number of bytes in the vector.
    #[inline]
    pub fn len(&self) -> usize {
        self.header.map_or(0, HeaderPtr::len)
    }

    /// Returns `true` if the vector contains no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes the vector can hold without reallocating.
    ///
    /// This is the allocator's usable size of the block minus the header.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.header.map_or(0, HeaderPtr::capacity)
    }

    /// Returns the allocator the vector is bound to, if it owns a block.
    #[inline]
    pub fn allocator(&self) -> Option<&'a dyn ByteAllocator> {
        self.header.map(HeaderPtr::allocator)
    }

    /// Returns a raw pointer to the first data byte, or null for an
    /// unallocated vector.
    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.header
            .map_or(std::ptr::null(), |h| h.data().as_ptr().cast_const())
    }

    /// Returns a mutable raw pointer to the first data byte, or null for an
    /// unallocated vector.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.header
            .map_or(std::ptr::null_mut(), |h| h.data().as_ptr())
    }

    /// Returns a slice containing the entire vector.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        match self.header {
            Some(h) => unsafe { std::slice::from_raw_parts(h.data().as_ptr(), h.len()) },
            None => &[],
        }
    }

    /// Returns a mutable slice containing the entire vector.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self.header {
            Some(h) => unsafe { std::slice::from_raw_parts_mut(h.data().as_ptr(), h.len()) },
            None => &mut [],
        }
    }

    /// Releases the block through the bound allocator.
    ///
    /// Equivalent to dropping the vector; a no-op for an unallocated vector.
    pub fn destroy(self) {
        drop(self)
    }

    #[inline]
    fn from_header(header: HeaderPtr<'a>) -> HeaderVec<'a> {
        HeaderVec {
            header: Some(header),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub(crate) fn header(&self) -> Option<HeaderPtr<'a>> {
        self.header
    }

    #[inline]
    pub(crate) fn set_header(&mut self, header: HeaderPtr<'a>) {
        self.header = Some(header);
    }
}

impl Drop for HeaderVec<'_> {
    fn drop(&mut self) {
        if let Some(header) = self.header.take() {
            unsafe { header.release() }
        }
    }
}

impl Default for HeaderVec<'_> {
    fn default() -> Self {
        HeaderVec::new()
    }
}

impl std::ops::Deref for HeaderVec<'_> {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl std::ops::DerefMut for HeaderVec<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_mut_slice()
    }
}

impl AsRef<[u8]> for HeaderVec<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for HeaderVec<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for HeaderVec<'_> {}

impl std::fmt::Debug for HeaderVec<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderVec")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("allocator", &self.allocator().map(|a| a.name()))
            .finish()
    }
}
