use std::hash::{BuildHasherDefault, Hasher};

/// Hasher for keys that are already well distributed integers, i.e. ids.
pub type IntHasher = BuildHasherDefault<IntHash>;

#[derive(Default)]
pub struct IntHash(u64);

impl Hasher for IntHash {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        // Only reached for non-integer keys; fold the bytes so it's still usable
        for &byte in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(byte);
        }
    }

    #[inline]
    fn write_u8(&mut self, n: u8) {
        self.0 = u64::from(n);
    }

    #[inline]
    fn write_u16(&mut self, n: u16) {
        self.0 = u64::from(n);
    }

    #[inline]
    fn write_u32(&mut self, n: u32) {
        self.0 = u64::from(n);
    }

    #[inline]
    fn write_u64(&mut self, n: u64) {
        self.0 = n;
    }

    #[inline]
    fn write_usize(&mut self, n: usize) {
        self.0 = n as u64;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn int_keys() {
        let mut map = HashMap::with_hasher(IntHasher::default());
        map.insert(1_u64, "a");
        map.insert(u64::MAX, "b");

        assert_eq!(map.get(&1), Some(&"a"));
        assert_eq!(map.get(&u64::MAX), Some(&"b"));
        assert_eq!(map.get(&2), None);
    }
}
