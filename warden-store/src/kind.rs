use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Which backend to persist guild configs with, picked once at startup.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StoreKind {
    #[default]
    Memory,
    Json,
}

impl FromStr for StoreKind {
    type Err = ParseStoreKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            s if s.eq_ignore_ascii_case("memory") => Ok(Self::Memory),
            s if s.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(ParseStoreKindError),
        }
    }
}

impl Display for StoreKind {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug)]
pub struct ParseStoreKindError;

impl Display for ParseStoreKindError {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("expected `memory` or `json`")
    }
}

impl std::error::Error for ParseStoreKindError {}
