use thiserror::Error;

/// Error returned by the vector and allocator operations.
///
/// Some errors are advisory: the operation that produced them still ran to
/// completion and left the buffer in a valid, mutated state (see
/// [`Error::is_completed`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }

    pub fn into_kind(self) -> ErrorKind {
        self.0
    }

    pub fn null_buffer(operation: &'static str) -> Error {
        Error(ErrorKind::NullBuffer { operation })
    }

    pub fn allocation_failed(requested: usize) -> Error {
        Error(ErrorKind::AllocationFailed { requested })
    }

    pub fn capacity_overflow(len: usize, additional: usize) -> Error {
        Error(ErrorKind::CapacityOverflow { len, additional })
    }

    pub fn size_out_of_range(amount: usize, len: usize) -> Error {
        Error(ErrorKind::SizeOutOfRange { amount, len })
    }

    pub fn index_out_of_range(index: usize, len: usize) -> Error {
        Error(ErrorKind::IndexOutOfRange { index, len })
    }

    pub fn default_already_bound() -> Error {
        Error(ErrorKind::DefaultAlreadyBound)
    }

    /// Status code reported for this error.
    pub fn status(&self) -> Status {
        match self.0 {
            ErrorKind::NullBuffer { .. }
            | ErrorKind::AllocationFailed { .. }
            | ErrorKind::SizeOutOfRange { .. }
            | ErrorKind::DefaultAlreadyBound => Status::Unavailable,
            ErrorKind::CapacityOverflow { .. } => Status::Overflow,
            ErrorKind::IndexOutOfRange { .. } => Status::OutOfRange,
        }
    }

    /// Returns `true` if the failing operation nevertheless mutated the buffer.
    ///
    /// Oversized truncations and removals clamp the logical size, and splices
    /// past the end still place (or drop) bytes at the end. Allocation failures
    /// and overflows never touch the buffer.
    pub fn is_completed(&self) -> bool {
        matches!(
            self.0,
            ErrorKind::SizeOutOfRange { .. } | ErrorKind::IndexOutOfRange { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("{operation} requires an allocated buffer")]
    NullBuffer { operation: &'static str },

    #[error("allocator failed to provide {requested} bytes")]
    AllocationFailed { requested: usize },

    #[error("capacity overflow: {len} + {additional} bytes exceeds the maximum capacity")]
    CapacityOverflow { len: usize, additional: usize },

    #[error("{amount} bytes requested from a buffer of {len} bytes")]
    SizeOutOfRange { amount: usize, len: usize },

    #[error("index {index} is past the end of a buffer of {len} bytes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("the default allocator is already bound")]
    DefaultAlreadyBound,
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind)
    }
}

/// Closed set of status codes reported by the mutating operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// The operation succeeded.
    Ok = 0,
    /// No buffer to operate on, the allocator failed, or a size exceeded the
    /// logical size.
    Unavailable = 1,
    /// The requested growth overflows the maximum capacity.
    Overflow = 2,
    /// A splice index exceeded the logical size; the operation still completed.
    OutOfRange = 3,
}

impl Status {
    /// Status of an operation result.
    pub fn of<T>(result: &std::result::Result<T, Error>) -> Status {
        match result {
            Ok(_) => Status::Ok,
            Err(e) => e.status(),
        }
    }

    #[inline]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<&Error> for Status {
    fn from(e: &Error) -> Self {
        e.status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Ok.code(), 0);
        assert_eq!(Error::null_buffer("truncate").status().code(), 1);
        assert_eq!(Error::allocation_failed(64).status().code(), 1);
        assert_eq!(Error::size_out_of_range(5, 2).status().code(), 1);
        assert_eq!(Error::capacity_overflow(10, usize::MAX).status().code(), 2);
        assert_eq!(Error::index_out_of_range(15, 10).status().code(), 3);
    }

    #[test]
    fn test_status_of_result() {
        let ok: std::result::Result<(), Error> = Ok(());
        assert_eq!(Status::of(&ok), Status::Ok);
        let err: std::result::Result<(), Error> = Err(Error::index_out_of_range(3, 1));
        assert_eq!(Status::of(&err), Status::OutOfRange);
    }

    #[test]
    fn test_completed_errors() {
        assert!(Error::index_out_of_range(3, 1).is_completed());
        assert!(Error::size_out_of_range(3, 1).is_completed());
        assert!(!Error::allocation_failed(1).is_completed());
        assert!(!Error::capacity_overflow(1, usize::MAX).is_completed());
        assert!(!Error::null_buffer("remove").is_completed());
    }

    #[test]
    fn test_display() {
        let e = Error::index_out_of_range(15, 10);
        assert_eq!(
            e.to_string(),
            "index 15 is past the end of a buffer of 10 bytes"
        );
        assert_eq!(
            Error::null_buffer("truncate").to_string(),
            "truncate requires an allocated buffer"
        );
    }
}
