use crate::Error;
#[cfg(feature = "alloc")]
use alloc::{vec, vec::Vec};
use core::fmt::{Debug, Formatter};
use core::iter::{FusedIterator, Iterator};
use core::ptr::NonNull;

/// Computes the number of bytes needed to store `size` bits.
///
/// # Examples
/// ```
/// use light_bitstore::byte_count;
///
/// assert_eq!(byte_count(1), 1);
/// assert_eq!(byte_count(13), 2);
/// assert_eq!(byte_count(16), 2);
/// assert_eq!(byte_count(17), 3);
/// ```
pub const fn byte_count(size: usize) -> usize {
    size.div_ceil(8)
}

pub(crate) fn assert_size(size: usize) {
    assert_ne!(size, 0, "size must be greater than zero.");
}

pub(crate) const fn fill_byte(default_value: bool) -> u8 {
    if default_value { !0u8 } else { 0u8 }
}

enum Storage<'a> {
    #[cfg(feature = "alloc")]
    Owned(Vec<u8>),
    Borrowed(&'a mut [u8]),
}

impl Storage<'_> {
    #[inline]
    fn bytes(&self) -> &[u8] {
        match self {
            #[cfg(feature = "alloc")]
            Storage::Owned(bytes) => bytes.as_slice(),
            Storage::Borrowed(bytes) => &bytes[..],
        }
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        match self {
            #[cfg(feature = "alloc")]
            Storage::Owned(bytes) => bytes.as_mut_slice(),
            Storage::Borrowed(bytes) => &mut bytes[..],
        }
    }
}

/// A fixed-size array of bits packed into bytes.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8`, least significant bit
/// first. The backing buffer is either owned by the store (see [`new`] and
/// [`try_new`]) or borrowed from the caller (see [`wrap`]). An owned buffer
/// is released exactly once when the store is dropped; dropping a borrowed
/// store leaves the caller's bytes untouched.
///
/// The size is fixed at construction and is never zero.
///
/// [`new`]: BitStore::new
/// [`try_new`]: BitStore::try_new
/// [`wrap`]: BitStore::wrap
pub struct BitStore<'a> {
    storage: Storage<'a>,
    size: usize,
}

#[cfg(feature = "alloc")]
impl BitStore<'static> {
    /// Allocates a new store of `size` bits, all set to `default_value`.
    ///
    /// Allocation failure aborts, like any other `Vec` allocation. Use
    /// [`try_new`] to handle it instead.
    ///
    /// # Panics
    /// Panics if `size == 0`.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let store = BitStore::new(10, true);
    /// assert_eq!(store.size(), 10);
    /// assert!(store.get(9));
    /// assert!(store.is_owned());
    /// ```
    ///
    /// [`try_new`]: BitStore::try_new
    pub fn new(size: usize, default_value: bool) -> Self {
        assert_size(size);
        let bytes = byte_count(size);
        log::trace!("allocating owned bit store: {size} bits in {bytes} bytes");
        Self {
            storage: Storage::Owned(vec![fill_byte(default_value); bytes]),
            size,
        }
    }

    /// Allocates a new store of `size` bits, all set to `default_value`,
    /// reporting allocation failure instead of aborting.
    ///
    /// Nothing is allocated or leaked if this returns an error.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the allocator cannot provide
    /// [`byte_count(size)`] bytes.
    ///
    /// # Panics
    /// Panics if `size == 0`.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::{BitStore, Error};
    ///
    /// let store = BitStore::try_new(13, false)?;
    /// assert_eq!(store.data(), &[0, 0]);
    /// # Ok::<(), Error>(())
    /// ```
    ///
    /// [`byte_count(size)`]: crate::byte_count
    pub fn try_new(size: usize, default_value: bool) -> Result<Self, Error> {
        assert_size(size);
        let bytes = byte_count(size);
        let mut buffer: Vec<u8> = Vec::new();
        if buffer.try_reserve_exact(bytes).is_err() {
            log::warn!("failed to allocate {bytes} bytes for a {size} bit store");
            return Err(Error::OutOfMemory { bytes });
        }
        // capacity is already reserved, so this never reallocates
        buffer.resize(bytes, fill_byte(default_value));
        log::trace!("allocated owned bit store: {size} bits in {bytes} bytes");
        Ok(Self {
            storage: Storage::Owned(buffer),
            size,
        })
    }
}

impl<'a> BitStore<'a> {
    /// Creates a view of `size` bits over caller-owned bytes.
    ///
    /// Nothing is allocated, copied or filled: the bits read back whatever
    /// `data` already holds. Only the first [`byte_count(size)`] bytes of
    /// `data` belong to the view. The borrow keeps `data` alive and
    /// unaliased for as long as the view exists.
    ///
    /// # Panics
    /// Panics if `size == 0` or if `data` is shorter than
    /// [`byte_count(size)`].
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let mut frames = [0b0000_0101u8, 0];
    /// let mut store = BitStore::wrap(&mut frames, 12);
    /// assert!(store.get(0));
    /// assert!(!store.get(1));
    /// store.set(11, true);
    /// drop(store);
    /// assert_eq!(frames, [0b0000_0101, 0b0000_1000]);
    /// ```
    ///
    /// A view cannot outlive the bytes it wraps:
    /// ```compile_fail
    /// use light_bitstore::BitStore;
    ///
    /// let store = {
    ///     let mut bytes = [0u8; 2];
    ///     BitStore::wrap(&mut bytes, 16)
    /// };
    /// store.get(0);
    /// ```
    ///
    /// [`byte_count(size)`]: crate::byte_count
    pub fn wrap(data: &'a mut [u8], size: usize) -> Self {
        assert_size(size);
        let bytes = byte_count(size);
        assert!(
            data.len() >= bytes,
            "buffer of {} bytes too small for {size} bits",
            data.len()
        );
        log::trace!("wrapping borrowed bit store: {size} bits in {bytes} bytes");
        Self {
            storage: Storage::Borrowed(&mut data[..bytes]),
            size,
        }
    }

    /// Creates a view of `size` bits over the bytes starting at `data`.
    ///
    /// This is [`wrap`] for memory that is only reachable through a pointer,
    /// such as a memory-mapped region or a frame handed over by a boot
    /// loader.
    ///
    /// # Safety
    /// The length of the buffer cannot be verified here. The caller must
    /// guarantee that, for the whole lifetime `'a`:
    /// - `data` is valid for reads and writes of [`byte_count(size)`] bytes,
    /// - those bytes are initialized,
    /// - no other reference or pointer accesses those bytes while the view
    ///   exists.
    ///
    /// # Panics
    /// Panics if `size == 0`.
    ///
    /// # Examples
    /// ```
    /// use core::ptr::NonNull;
    /// use light_bitstore::BitStore;
    ///
    /// let mut bytes = [0u8; 4];
    /// let ptr = NonNull::from(&mut bytes[..]).cast::<u8>();
    /// // SAFETY: `bytes` holds 4 bytes, enough for 32 bits, and is not
    /// // touched until the view is dropped.
    /// let mut store = unsafe { BitStore::wrap_raw(ptr, 32) };
    /// store.set(31, true);
    /// drop(store);
    /// assert_eq!(bytes[3], 0x80);
    /// ```
    ///
    /// [`wrap`]: BitStore::wrap
    /// [`byte_count(size)`]: crate::byte_count
    #[allow(unsafe_code)]
    pub unsafe fn wrap_raw(data: NonNull<u8>, size: usize) -> Self {
        assert_size(size);
        // SAFETY: validity, initialization and exclusivity of the bytes for
        // `'a` are guaranteed by the caller.
        let bytes = unsafe { core::slice::from_raw_parts_mut(data.as_ptr(), byte_count(size)) };
        Self::wrap(bytes, size)
    }

    /// Returns the value of the bit at `index`.
    ///
    /// # Panics
    /// Panics if `index >= size`.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let mut store = BitStore::new(16, false);
    /// store.set(8, true);
    /// assert!(!store.get(7));
    /// assert!(store.get(8));
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.size, "Bit index {index} out of bounds");
        let (byte_idx, bit_idx) = Self::idxs(index);
        self.storage.bytes()[byte_idx] & 1 << bit_idx != 0
    }

    /// Sets the bit at `index` to `value`, leaving every other bit untouched.
    ///
    /// # Panics
    /// Panics if `index >= size`.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let mut store = BitStore::new(16, false);
    /// store.set(0, true);
    /// store.set(8, true);
    /// store.set(15, true);
    /// assert_eq!(store.data(), &[0x01, 0x81]);
    /// store.set(15, false);
    /// assert_eq!(store.data(), &[0x01, 0x01]);
    /// ```
    ///
    /// Writing requires exclusive access:
    /// ```compile_fail
    /// use light_bitstore::BitStore;
    ///
    /// let store = BitStore::new(8, false);
    /// store.set(0, true);
    /// ```
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) {
        assert!(index < self.size, "Bit index {index} out of bounds");
        let (byte_idx, bit_idx) = Self::idxs(index);
        let byte = &mut self.storage.bytes_mut()[byte_idx];
        if value {
            *byte |= 1 << bit_idx;
        } else {
            *byte &= !(1 << bit_idx);
        }
    }

    /// Returns the value of the bit at `index`, or an error if `index` is out
    /// of bounds.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= size`.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::{BitStore, Error};
    ///
    /// let store = BitStore::new(1, true);
    /// assert_eq!(store.try_get(0), Ok(true));
    /// assert_eq!(store.try_get(1), Err(Error::IndexOutOfBounds { index: 1, size: 1 }));
    /// ```
    #[inline]
    pub fn try_get(&self, index: usize) -> Result<bool, Error> {
        self.check_index(index)?;
        Ok(self.get(index))
    }

    /// Sets the bit at `index` to `value`, or returns an error without
    /// touching the store if `index` is out of bounds.
    ///
    /// # Errors
    /// Returns [`Error::IndexOutOfBounds`] if `index >= size`.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::{BitStore, Error};
    ///
    /// let mut store = BitStore::new(4, false);
    /// assert_eq!(store.try_set(3, true), Ok(()));
    /// assert_eq!(store.try_set(4, true), Err(Error::IndexOutOfBounds { index: 4, size: 4 }));
    /// assert_eq!(store.data(), &[0b1000]);
    /// ```
    #[inline]
    pub fn try_set(&mut self, index: usize, value: bool) -> Result<(), Error> {
        self.check_index(index)?;
        self.set(index, value);
        Ok(())
    }

    /// Returns the number of addressable bits.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the number of bytes backing the store, `byte_count(size)`.
    #[inline]
    pub fn byte_len(&self) -> usize {
        byte_count(self.size)
    }

    /// Returns `true` if the store allocated its buffer itself.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let mut bytes = [0u8; 1];
    /// assert!(!BitStore::wrap(&mut bytes, 8).is_owned());
    /// assert!(BitStore::new(8, false).is_owned());
    /// ```
    #[inline]
    pub fn is_owned(&self) -> bool {
        match self.storage {
            #[cfg(feature = "alloc")]
            Storage::Owned(_) => true,
            Storage::Borrowed(_) => false,
        }
    }

    /// Returns the packed bytes.
    ///
    /// The slice is exactly [`byte_len`] bytes long. Bits past `size` in the
    /// last byte are padding with unspecified content: an owned store fills
    /// them like every other bit, a borrowed one leaves whatever the caller
    /// put there. Mask them out before relying on them.
    ///
    /// [`byte_len`]: BitStore::byte_len
    #[inline]
    pub fn data(&self) -> &[u8] {
        self.storage.bytes()
    }

    /// Returns the packed bytes for bulk writes.
    ///
    /// See [`data`] for the padding caveat.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let mut store = BitStore::new(12, false);
    /// store.data_mut().copy_from_slice(&[0xff, 0x01]);
    /// assert!(store.get(7));
    /// assert!(store.get(8));
    /// assert!(!store.get(9));
    /// ```
    ///
    /// [`data`]: BitStore::data
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        self.storage.bytes_mut()
    }

    /// Returns an iterator over all `size` bits as `bool`, from index 0
    /// upwards.
    ///
    /// # Examples
    /// ```
    /// use light_bitstore::BitStore;
    ///
    /// let mut bytes = [0b0000_0101u8];
    /// let store = BitStore::wrap(&mut bytes, 4);
    /// let mut iter = store.iter();
    /// assert_eq!(iter.next(), Some(true));
    /// assert_eq!(iter.next(), Some(false));
    /// assert_eq!(iter.next(), Some(true));
    /// assert_eq!(iter.next(), Some(false));
    /// assert_eq!(iter.next(), None);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            bytes: self.storage.bytes(),
            idx: 0,
            size: self.size,
        }
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<(), Error> {
        if index < self.size {
            Ok(())
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                size: self.size,
            })
        }
    }

    #[inline]
    fn idxs(idx: usize) -> (usize, usize) {
        (idx / 8, idx % 8)
    }
}

impl PartialEq for BitStore<'_> {
    /// Two stores are equal if they have the same size and the same logical
    /// bits. Padding bits and ownership are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl Eq for BitStore<'_> {}

impl<'store> IntoIterator for &'store BitStore<'_> {
    type Item = bool;
    type IntoIter = Iter<'store>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Debug for BitStore<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        let mode = if self.is_owned() { "owned" } else { "borrowed" };
        write!(f, "BitStore({mode}, LSB -> ")?;
        for (i, bit) in self.iter().enumerate() {
            if i % 8 == 0 {
                write!(f, "{i}: ")?;
            }
            write!(f, "{}", if bit { '1' } else { '0' })?;
            if i % 8 == 7 && i < self.size - 1 {
                write!(f, " ")?;
            }
        }
        write!(f, " <- MSB)")
    }
}

/// Iterator over all bits of a [`BitStore`] as `bool` values.
///
/// Returned by [`BitStore::iter()`].
#[derive(Clone)]
pub struct Iter<'store> {
    bytes: &'store [u8],
    idx: usize,
    size: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= self.size {
            return None;
        }
        let bit = self.bytes[self.idx / 8] & 1 << (self.idx % 8);
        self.idx += 1;
        Some(bit != 0)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size - self.idx;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
