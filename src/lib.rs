//! A minimal, fixed-size bit store written in pure Rust.
//! `no_std`, optional `alloc`, a single `unsafe` entry point for raw memory.
//!
//! Designed for low-level bookkeeping such as free-space tracking, flag
//! arrays and page or frame allocators.
//!
//! [`BitStore`] is the main struct in this library. Its [features](#features)
//! are listed below.
//!
//! # Examples
//! ```
//! use light_bitstore::BitStore;
//!
//! let mut frames = BitStore::new(13, false);
//! assert_eq!(frames.byte_len(), 2);
//! assert!(!frames.get(3));
//! frames.set(3, true);
//! assert!(frames.get(3));
//! ```
//!
//! Tracking bits inside memory someone else owns:
//! ```
//! use light_bitstore::BitStore;
//!
//! let mut header = [0u8; 4];
//! {
//!     let mut used = BitStore::wrap(&mut header, 32);
//!     used.set(9, true);
//! }
//! assert_eq!(header, [0, 0b10, 0, 0]);
//! ```
//!
//! # Use Cases
//!
//! - Kernel and embedded development
//! - Allocators that keep one bit per page, frame or block
//! - Views over bitmaps that live in memory-mapped regions or on-disk headers
//!
//! # Features
//!
//! - `#![no_std]` compatible
//! - Two ownership modes behind one type:
//!   - owned: [`BitStore::new`], [`BitStore::try_new`] (fallible allocation)
//!   - borrowed: [`BitStore::wrap`], [`BitStore::wrap_raw`]
//! - O(1) single-bit `get` / `set` with fail-fast bounds checks
//! - Checked accessors: `try_get`, `try_set`
//! - Raw byte access for bulk I/O: `data`, `data_mut`
//! - Iteration over all bits as `bool`: `iter()`
//!
//! # Cargo features
//!
//! - `alloc` (default): enables the owned constructors. Without it only
//!   borrowed views are available.
//!
//! # Logging
//!
//! Construction is reported through the [`log`](https://docs.rs/log) facade
//! at `trace` level, failed allocations at `warn` level. Bit accesses never
//! log.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

mod bitstore;
mod error;

pub use bitstore::{BitStore, Iter, byte_count};
pub use error::Error;
