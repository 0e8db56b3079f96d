//! Identifier generation and newtype wrappers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use ulid::Ulid;

/// Define a newtype ID wrapper around `String`.
///
/// Generates `new()`, `as_str()`, `Display`, `From<String>`, `From<&str>`,
/// `PartialEq<str>`, `PartialEq<&str>`, and `Borrow<str>` implementations.
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// A workspace identifier.
    pub struct WorkspaceId;
}

define_id! {
    /// A component identifier: a 26-character Crockford base32 ULID.
    pub struct ComponentId;
}

define_id! {
    /// A log event identifier: a ULID used as a pagination cursor.
    pub struct EventId;
}

define_id! {
    /// A task/job identifier pollable by callers.
    pub struct JobId;
}

/// Generates component and workspace identifiers.
///
/// Backed by ULIDs so identifiers sort lexicographically by creation time,
/// matching the teacher's `gensym.RandomBase32`-style component IDs from
/// the original implementation (26-char Crockford base32).
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Monotonic ULID generator for production use.
///
/// Guards against two IDs minted within the same millisecond colliding or
/// sorting out of order by forcing strict increase of the random part when
/// the millisecond component repeats.
#[derive(Clone, Default)]
pub struct UlidIdGen {
    last: Arc<parking_lot::Mutex<Option<Ulid>>>,
}

impl UlidIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a strictly-increasing ULID, even within the same millisecond.
    pub fn next_ulid(&self) -> Ulid {
        let mut last = self.last.lock();
        let candidate = Ulid::new();
        let next = match *last {
            Some(prev) if candidate <= prev => prev
                .increment()
                .unwrap_or_else(Ulid::new),
            _ => candidate,
        };
        *last = Some(next);
        next
    }
}

impl IdGen for UlidIdGen {
    fn next(&self) -> String {
        self.next_ulid().to_string()
    }
}

/// Sequential ID generator for deterministic tests.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}{:026}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
