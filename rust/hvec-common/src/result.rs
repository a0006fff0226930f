pub type Result<T> = std::result::Result<T, crate::error::Error>;

/// Returns `Ok(())` when `predicate` holds, or `err()` otherwise.
#[inline]
pub fn verify(predicate: bool, err: impl FnOnce() -> crate::error::Error) -> Result<()> {
    if predicate { Ok(()) } else { Err(err()) }
}
