use std::borrow::Cow;

pub trait CowUtils {
    /// Lowercases ascii characters, only allocating if there is an uppercase one.
    fn cow_to_ascii_lowercase(&self) -> Cow<'_, str>;
}

impl CowUtils for str {
    #[inline]
    fn cow_to_ascii_lowercase(&self) -> Cow<'_, str> {
        if self.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(self.to_ascii_lowercase())
        } else {
            Cow::Borrowed(self)
        }
    }
}
