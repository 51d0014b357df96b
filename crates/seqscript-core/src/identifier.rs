//! Identifier management using string interning
//!
//! Actor names are referenced many times across a diagram, so they are
//! interned once and compared by symbol afterwards.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by every [`Id`].
///
/// Names are never removed, so an `Id` stays valid for the life of the
/// process and memory grows with the number of distinct names seen across
/// all parses.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier of an actor.
///
/// Two identifiers are equal exactly when their source names are equal,
/// byte for byte. Identifiers are case-sensitive. They live for the whole
/// process and can be compared across diagrams.
///
/// # Examples
///
/// ```
/// use seqscript_core::identifier::Id;
///
/// let client = Id::new("Client");
/// assert_eq!(client, "Client");
/// assert_ne!(client, Id::new("client"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from a name, interning it on first use.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let name = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f.write_str(name)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_interning(a: &str, b: &str) -> Result<(), TestCaseError> {
        let (id_a, id_b) = (Id::new(a), Id::new(b));
        prop_assert_eq!(id_a.to_string(), a);
        prop_assert_eq!(id_a == id_b, a == b);
        prop_assert!(id_a == a);
        Ok(())
    }

    proptest! {
        #[test]
        fn interning_is_injective(a in "\\PC{0,12}", b in "\\PC{0,12}") {
            check_interning(&a, &b)?;
        }
    }
}
