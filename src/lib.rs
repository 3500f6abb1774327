//! # Wormhole filter
//!
//! An approximate set-membership filter over 64-bit keys. Like a Bloom or
//! cuckoo filter it answers "have I seen this key?" in a fraction of the
//! space of the key set, with a bounded false-positive rate and no false
//! negatives, and like a cuckoo filter it supports deletion.
//!
//! The table stores a 12-bit fingerprint per key, packed four to a 64-bit
//! bucket word together with a 4-bit probe distance. An item always sits
//! within 16 buckets of its home bucket, so a lookup touches at most 16
//! cache lines and compares four slots at a time with plain 64-bit bitwise
//! arithmetic. When an insert finds its probe window full, it shifts
//! already-stored fingerprints outward (hopscotch style) to free a slot near
//! the home bucket, and reports `false` once no such shift is possible.
//!
//! Keys are taken as already hashed: the low 32 bits choose the home bucket
//! and the high 32 bits feed the fingerprint. For keys that are not well
//! mixed, construct the filter with [`MultiplyShift`].
//!
//! ```rust
//! use wormhole_filter::WormholeFilter;
//!
//! let mut filter = WormholeFilter::new(1024).unwrap();
//!
//! let key = 0x9E37_79B9_7F4A_7C15;
//! assert!(filter.insert(key));
//! assert!(filter.contains(key));
//!
//! // a miss is definitive, a hit may be a false positive
//! assert!(!filter.contains(0x0123_4567_89AB_CDEF));
//!
//! assert!(filter.remove(key));
//! assert!(!filter.contains(key));
//! ```
//!
//! Inserts can fail before the table is full when many keys collide on one
//! home bucket; a `false` from [`WormholeFilter::insert`] means the filter
//! needs to be rebuilt with more capacity.

mod bucket;
mod filter;
mod hash;

pub use filter::{BuildError, WormholeFilter};
pub use hash::{Identity, KeyMixer, MultiplyShift};
