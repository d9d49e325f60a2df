/// Errors reported by the fallible [`BitStore`](crate::BitStore) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The allocator could not provide the backing buffer of an owned store.
    #[error("failed to allocate {bytes} bytes for bit storage")]
    OutOfMemory {
        /// Number of bytes that were requested.
        bytes: usize,
    },
    /// A checked accessor was called with `index >= size`.
    #[error("bit index {index} out of bounds for size {size}")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// The size of the store.
        size: usize,
    },
}
