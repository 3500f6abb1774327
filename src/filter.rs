//! Hopscotch-style approximate membership filter.
//!
//! - Fixed-capacity table of bit-packed tag buckets
//! - Insert scans forward for a hole, then drags it back into the probe window
//! - Query SWAR-probes one bucket word per probe distance
//! - Remove clears one matching tag

use std::fmt;
use std::mem;

use crate::bucket::{
    distance_of, pack_tag, with_distance, Bucket, PROBE_WINDOW, SLOTS_PER_BUCKET,
};
use crate::hash::{fingerprint_of, Identity, KeyMixer};

/// Largest supported bucket count; bucket arithmetic is 32-bit.
const MAX_BUCKETS: u64 = 1 << 32;

/// Error returned when a filter cannot be constructed.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BuildError {
    /// The requested capacity would need more than 2^32 buckets.
    #[error("requested capacity exceeds the supported 2^32 buckets")]
    CapacityTooLarge,
}

/// An approximate set-membership filter over 64-bit keys.
///
/// Stores a 12-bit fingerprint per key in a bucket within 16 positions of the
/// key's home bucket. Lookups may report false positives at a rate of roughly
/// 2^-12 per probe position, but never false negatives for keys that were
/// inserted and not removed.
///
/// Keys are expected to be pre-hashed; see [`crate::MultiplyShift`] for
/// inputs that are not.
#[derive(Clone)]
pub struct WormholeFilter<M = Identity> {
    buckets: Vec<Bucket>,
    bucket_mask: u64,
    items: u64,
    mixer: M,
}

impl WormholeFilter<Identity> {
    /// Create a filter sized for `capacity` keys, taking keys as-is.
    pub fn new(capacity: u64) -> Result<Self, BuildError> {
        Self::with_mixer(capacity, Identity)
    }
}

impl<M: KeyMixer> WormholeFilter<M> {
    /// Create a filter sized for `capacity` keys, mixing every key through
    /// `mixer` first.
    ///
    /// The bucket count is the next power of two covering `capacity` slots,
    /// with four slots per bucket.
    pub fn with_mixer(capacity: u64, mixer: M) -> Result<Self, BuildError> {
        let wanted = capacity.div_ceil(SLOTS_PER_BUCKET as u64).max(1);
        if wanted > MAX_BUCKETS {
            return Err(BuildError::CapacityTooLarge);
        }
        let num_buckets = wanted.next_power_of_two();

        Ok(Self {
            buckets: vec![Bucket::empty(); num_buckets as usize],
            bucket_mask: num_buckets - 1,
            items: 0,
            mixer,
        })
    }

    /// Number of stored keys.
    #[inline]
    pub fn len(&self) -> u64 {
        self.items
    }

    /// Returns `true` if no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items == 0
    }

    /// Number of buckets in the table.
    #[inline]
    pub fn num_buckets(&self) -> u64 {
        self.buckets.len() as u64
    }

    /// Total slot capacity.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.num_buckets() * SLOTS_PER_BUCKET as u64
    }

    /// Fraction of slots in use (0.0 to 1.0).
    #[inline]
    pub fn load_factor(&self) -> f64 {
        self.items as f64 / self.capacity() as f64
    }

    /// Size of the tag table in bytes.
    #[inline]
    pub fn size_in_bytes(&self) -> u64 {
        self.num_buckets() * mem::size_of::<Bucket>() as u64
    }

    /// Remove all stored keys.
    pub fn clear(&mut self) {
        self.buckets.fill(Bucket::empty());
        self.items = 0;
    }

    /// Insert a key.
    ///
    /// Returns `false` when no slot within the probe window of the key's home
    /// bucket can be freed; the filter is unchanged in that case. Heavy
    /// fingerprint collisions on one home bucket can exhaust the window well
    /// before the table itself is full. Duplicate inserts each take a slot.
    pub fn insert(&mut self, key: u64) -> bool {
        let mixed = self.mixer.mix(key);
        let home = mixed & self.bucket_mask;
        let fingerprint = fingerprint_of(mixed);

        // Bucket indices stay unwrapped from here on so probe distances
        // survive the wrap; they are reduced modulo the table on access.
        let Some((mut hole_bucket, mut hole_slot)) = self.find_hole(home) else {
            return false;
        };

        if hole_bucket - home >= PROBE_WINDOW as u64 {
            match self.displace(home, hole_bucket, hole_slot) {
                Some((bucket, slot)) => {
                    hole_bucket = bucket;
                    hole_slot = slot;
                }
                None => return false,
            }
        }

        let distance = (hole_bucket - home) as u16;
        self.write_tag(hole_bucket, hole_slot, pack_tag(fingerprint, distance));
        self.items += 1;
        true
    }

    /// Returns `true` if the key may have been inserted; `false` means it
    /// definitely was not.
    pub fn contains(&self, key: u64) -> bool {
        let mixed = self.mixer.mix(key);
        let home = mixed & self.bucket_mask;
        let fingerprint = fingerprint_of(mixed);

        for probe in 0..PROBE_WINDOW {
            let needle = pack_tag(fingerprint, probe);
            if self.bucket_at(home + probe as u64).contains_tag(needle) {
                return true;
            }
        }
        false
    }

    /// Remove one stored occurrence of the key.
    ///
    /// Returns `false` if no matching tag is found, leaving the filter
    /// unchanged.
    pub fn remove(&mut self, key: u64) -> bool {
        let mixed = self.mixer.mix(key);
        let home = mixed & self.bucket_mask;
        let fingerprint = fingerprint_of(mixed);

        for probe in 0..PROBE_WINDOW {
            let bucket = home + probe as u64;
            if let Some(slot) = self.bucket_at(bucket).find_tag(pack_tag(fingerprint, probe)) {
                self.write_tag(bucket, slot, 0);
                self.items -= 1;
                return true;
            }
        }
        false
    }

    /// Scan forward from `home` for the first empty slot, covering the whole
    /// table at most once.
    fn find_hole(&self, home: u64) -> Option<(u64, usize)> {
        for bucket in home..home + self.num_buckets() {
            if let Some(slot) = self.bucket_at(bucket).find_empty() {
                return Some((bucket, slot));
            }
        }
        None
    }

    /// Drag the hole back until it sits inside the probe window of `home`.
    ///
    /// Walks backward from the hole looking for a tag whose encoded distance
    /// can grow by the backshift and still fit the window, then moves that
    /// tag into the hole. Largest backshift first, so each step covers as
    /// much ground as possible. Moves are staged and only written once the
    /// whole chain is viable; a dead end leaves the table untouched.
    fn displace(
        &mut self,
        home: u64,
        mut hole_bucket: u64,
        mut hole_slot: usize,
    ) -> Option<(u64, usize)> {
        let mut staged: Vec<(u64, usize, u16)> = Vec::new();

        // The hole never crosses back over `home`: the loop only runs while
        // the gap is at least the probe window and each backshift is smaller.
        while hole_bucket - home >= PROBE_WINDOW as u64 {
            let mut candidate = None;
            'search: for shift in (1..PROBE_WINDOW).rev() {
                let bucket = hole_bucket - shift as u64;
                for slot in 0..SLOTS_PER_BUCKET {
                    let tag = self.bucket_at(bucket).tag(slot);
                    // Every bucket behind the hole is full, but a zero tag
                    // must never acquire a distance, so skip them anyway.
                    if tag != 0 && distance_of(tag) + shift < PROBE_WINDOW {
                        candidate = Some((bucket, slot, tag, shift));
                        break 'search;
                    }
                }
            }

            let (bucket, slot, tag, shift) = candidate?;
            staged.push((hole_bucket, hole_slot, with_distance(tag, distance_of(tag) + shift)));
            hole_bucket = bucket;
            hole_slot = slot;
        }

        for (bucket, slot, tag) in staged {
            self.write_tag(bucket, slot, tag);
        }
        Some((hole_bucket, hole_slot))
    }

    #[inline]
    fn bucket_at(&self, index: u64) -> Bucket {
        self.buckets[(index & self.bucket_mask) as usize]
    }

    #[inline]
    fn write_tag(&mut self, index: u64, slot: usize, tag: u16) {
        self.buckets[(index & self.bucket_mask) as usize].set_tag(slot, tag);
    }

    #[cfg(test)]
    fn occupied_slots(&self) -> u64 {
        self.buckets.iter().map(|b| b.occupied() as u64).sum()
    }
}

impl<M: KeyMixer> fmt::Debug for WormholeFilter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WormholeFilter")
            .field("num_buckets", &self.buckets.len())
            .field("items", &self.items)
            .field("load_factor", &self.load_factor())
            .finish()
    }
}
