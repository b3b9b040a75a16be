mod cow;
mod hasher;

pub mod datetime;
pub mod matcher;

pub use self::{
    cow::CowUtils,
    hasher::{IntHash, IntHasher},
};
