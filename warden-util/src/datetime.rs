use std::fmt::{Display, Formatter, Result as FmtResult};

use time::{format_description::FormatItem, macros::format_description};

pub const NAIVE_DATETIME_FORMAT: &[FormatItem<'_>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Displays milliseconds as seconds with one decimal, e.g. `2.5`
#[derive(Copy, Clone, Debug)]
pub struct SecondsLeft(pub u64);

impl Display for SecondsLeft {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let tenths = (self.0 + 99) / 100;

        write!(f, "{}.{}", tenths / 10, tenths % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_round_up() {
        assert_eq!(SecondsLeft(2000).to_string(), "2.0");
        assert_eq!(SecondsLeft(1501).to_string(), "1.6");
        assert_eq!(SecondsLeft(1).to_string(), "0.1");
        assert_eq!(SecondsLeft(0).to_string(), "0.0");
    }
}
