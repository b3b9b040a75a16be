use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
    num::{NonZeroU64, ParseIntError},
    str::FromStr,
};

use serde::{
    de::{Error as DeError, Visitor},
    Deserialize, Deserializer, Serialize, Serializer,
};

pub mod marker {
    #[derive(Copy, Clone, Debug)]
    pub struct UserMarker;

    #[derive(Copy, Clone, Debug)]
    pub struct GuildMarker;

    #[derive(Copy, Clone, Debug)]
    pub struct ChannelMarker;

    #[derive(Copy, Clone, Debug)]
    pub struct RoleMarker;

    #[derive(Copy, Clone, Debug)]
    pub struct MessageMarker;
}

/// Non-zero snowflake id, typed by what it identifies.
pub struct Id<T> {
    value: NonZeroU64,
    phantom: PhantomData<fn(T) -> T>,
}

impl<T> Id<T> {
    /// Returns `None` if `n` is zero.
    pub const fn new_checked(n: u64) -> Option<Self> {
        match NonZeroU64::new(n) {
            Some(value) => Some(Self::from_nonzero(value)),
            None => None,
        }
    }

    /// # Panics
    ///
    /// Panics if `n` is zero.
    #[track_caller]
    pub const fn new(n: u64) -> Self {
        match Self::new_checked(n) {
            Some(id) => id,
            None => panic!("id must be non-zero"),
        }
    }

    pub const fn from_nonzero(value: NonZeroU64) -> Self {
        Self {
            value,
            phantom: PhantomData,
        }
    }

    pub const fn get(self) -> u64 {
        self.value.get()
    }

    /// Reinterpret the id with a different marker, e.g. a guild id as its `@everyone` role id.
    pub const fn cast<U>(self) -> Id<U> {
        Id::from_nonzero(self.value)
    }
}

impl<T> Clone for Id<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl<T> Hash for Id<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.value.get());
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "Id({})", self.value)
    }
}

impl<T> Display for Id<T> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.value, f)
    }
}

impl<T> FromStr for Id<T> {
    type Err = ParseIntError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self::from_nonzero)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&self.value)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct IdVisitor<T>(PhantomData<fn(T) -> T>);

        impl<'de, T> Visitor<'de> for IdVisitor<T> {
            type Value = Id<T>;

            fn expecting(&self, f: &mut Formatter<'_>) -> FmtResult {
                f.write_str("a non-zero integer or a string containing one")
            }

            fn visit_u64<E: DeError>(self, v: u64) -> Result<Self::Value, E> {
                Id::new_checked(v).ok_or_else(|| DeError::custom("id must be non-zero"))
            }

            fn visit_i64<E: DeError>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map_err(|_| DeError::custom("id must be positive"))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(DeError::custom)
            }
        }

        d.deserialize_any(IdVisitor(PhantomData))
    }
}
