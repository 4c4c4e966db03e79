//! Identifier chunking

use super::{FetcherError, FetcherResult};

/// Split `items` into consecutive chunks of `size` elements
///
/// Every chunk but the last has exactly `size` elements, the last one holds
/// the remainder. Concatenating the chunks yields `items` again. An empty
/// input produces no chunks.
///
/// # Errors
///
/// Returns [`FetcherError::InvalidArgument`] when `size` is zero.
pub fn split_chunks<T>(items: &[T], size: usize) -> FetcherResult<Vec<&[T]>> {
    if size == 0 {
        return Err(FetcherError::InvalidArgument(
            "chunk size must be at least 1".to_string(),
        ));
    }
    Ok(items.chunks(size).collect())
}
