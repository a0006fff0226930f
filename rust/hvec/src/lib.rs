//! Growable byte vectors with their bookkeeping stored in a header ahead of
//! the data.
//!
//! A [`HeaderVec`] is a single pointer at the call site. The block it points
//! to starts with a header holding the logical size and the allocator the
//! vector was bound to at creation, followed by the data bytes:
//!
//! ```
//! use hvec::HeaderVec;
//! use hvec_alloc::SizeHintAllocator;
//!
//! let mut vec = HeaderVec::with_capacity_in(4, &SizeHintAllocator)?;
//! vec.append(b"abcd")?;
//! vec.insert(2, b"XY")?;
//! assert_eq!(vec.as_slice(), b"abXYcd");
//! vec.remove(0, 2)?;
//! assert_eq!(vec.as_slice(), b"XYcd");
//! assert_eq!(vec.capacity(), 8);
//! # Ok::<(), hvec_common::Error>(())
//! ```
//!
//! Every mutating operation returns a [`Result`]; [`Status`] maps an outcome
//! to the closed set of status codes (`0` success, `1` unavailable, `2`
//! overflow, `3` out of range). Out-of-range splices still complete, and say
//! so through [`Error::is_completed`].
//!
//! [`TypedVec`] layers element types on top of the byte operations.

mod growth;
mod header;
mod splice;
mod typed;
mod vec;

pub use header::{DATA_OFFSET, MAX_CAPACITY};
pub use hvec_common::{Error, ErrorKind, Result, Status};
pub use typed::TypedVec;
pub use vec::HeaderVec;
