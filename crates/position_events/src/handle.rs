//! Identifiers for regions, owners and subjects

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use serde::{Deserialize, Serialize};

/// Game map identifier carried by every position
pub type MapId = u32;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw value
            #[inline]
            pub const fn to_bits(self) -> u64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u64> for $name {
            fn from(bits: u64) -> Self {
                Self(bits)
            }
        }
    };
}

define_id!(
    /// Handle returned by region registration
    RegionHandle,
    "region"
);

define_id!(
    /// Opaque identity of whoever registered a region
    OwnerId,
    "owner"
);

define_id!(
    /// A tracked moving point (usually a player character)
    SubjectId,
    "subject"
);

impl SubjectId {
    /// The local player, for hosts that only ever track one subject
    pub const LOCAL_PLAYER: Self = Self(0);
}

/// Thread-safe monotonically increasing id source. Ids are never reused.
pub(crate) struct IdGenerator {
    next: AtomicU64,
}

impl IdGenerator {
    pub(crate) const fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub(crate) fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
