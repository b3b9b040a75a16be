use std::ops::Deref;

use arrayvec::{ArrayVec, CapacityError};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

pub type Prefix = CompactString;

const PREFIXES_LEN: usize = Prefixes::LEN;
type PrefixesInner = ArrayVec<Prefix, PREFIXES_LEN>;

/// A guild's own prefixes. Empty means the global default prefixes apply.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefixes {
    inner: PrefixesInner,
}

impl Prefixes {
    pub const LEN: usize = 5;

    #[inline]
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Removes all but the first occurence of each prefix.
    pub fn dedup(&mut self) {
        for i in (1..self.inner.len()).rev() {
            if self.inner[..i].contains(&self.inner[i]) {
                self.inner.remove(i);
            }
        }
    }

    /// Fails if there are already [`Prefixes::LEN`] many prefixes contained
    #[inline]
    pub fn try_push(&mut self, prefix: Prefix) -> Result<(), CapacityError<Prefix>> {
        self.inner.try_push(prefix)
    }
}

impl Deref for Prefixes {
    type Target = [Prefix];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'p> FromIterator<&'p str> for Prefixes {
    /// Collects at most [`Prefixes::LEN`] non-empty prefixes, dropping the rest.
    fn from_iter<I: IntoIterator<Item = &'p str>>(iter: I) -> Self {
        let inner = iter
            .into_iter()
            .filter(|prefix| !prefix.is_empty())
            .map(Prefix::from)
            .take(Self::LEN)
            .collect();

        let mut prefixes = Self { inner };
        prefixes.dedup();

        prefixes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dedup() {
        let mut prefixes = Prefixes::default();

        prefixes.dedup();

        assert!(prefixes.is_empty());
    }

    #[test]
    fn noop_dedup() {
        let mut prefixes = Prefixes::default();
        prefixes.try_push("a".into()).unwrap();
        prefixes.try_push("b".into()).unwrap();

        let orig = prefixes.clone();
        prefixes.dedup();

        assert_eq!(prefixes, orig);
    }

    #[test]
    fn do_dedup() {
        let mut prefixes = Prefixes::default();
        prefixes.try_push("a".into()).unwrap();
        prefixes.try_push("b".into()).unwrap();
        prefixes.try_push("a".into()).unwrap();
        prefixes.try_push("b".into()).unwrap();

        prefixes.dedup();

        assert_eq!(&*prefixes, &["a", "b"]);
    }

    #[test]
    fn capacity() {
        let mut prefixes: Prefixes = ["1", "2", "3", "4", "5", "6"].into_iter().collect();

        assert_eq!(prefixes.len(), Prefixes::LEN);
        assert!(prefixes.try_push("7".into()).is_err());
    }
}
