//! A forward-only reader over a byte slice.
//!
//! Replaces manual offset arithmetic when walking length-delimited and
//! null-delimited framing (tree entries in particular).

/// Forward-only cursor over borrowed bytes.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Read up to (not including) the next `delim`, consuming the delimiter.
    ///
    /// Returns `None` without moving if `delim` does not occur in the rest of the input.
    pub fn read_until(&mut self, delim: u8) -> Option<&'a [u8]> {
        let rest = &self.data[self.pos..];
        let idx = rest.iter().position(|&b| b == delim)?;
        self.pos += idx + 1;
        Some(&rest[..idx])
    }

    /// Read exactly `n` bytes.
    ///
    /// Returns `None` without moving if fewer than `n` bytes remain.
    pub fn read_exact(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.remaining() < n {
            return None;
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_until_consumes_delimiter() {
        let mut cur = ByteCursor::new(b"100644 a\0rest");
        assert_eq!(cur.read_until(0), Some(&b"100644 a"[..]));
        assert_eq!(cur.position(), 9);
        assert_eq!(cur.remaining(), 4);
    }

    #[test]
    fn read_until_missing_delimiter_does_not_move() {
        let mut cur = ByteCursor::new(b"no null here");
        assert_eq!(cur.read_until(0), None);
        assert_eq!(cur.position(), 0);
    }

    #[test]
    fn read_exact_bounds() {
        let mut cur = ByteCursor::new(b"abcdef");
        assert_eq!(cur.read_exact(4), Some(&b"abcd"[..]));
        assert_eq!(cur.read_exact(3), None);
        assert_eq!(cur.read_exact(2), Some(&b"ef"[..]));
        assert!(cur.is_empty());
    }

    #[test]
    fn empty_input() {
        let mut cur = ByteCursor::new(b"");
        assert!(cur.is_empty());
        assert_eq!(cur.read_exact(0), Some(&b""[..]));
        assert_eq!(cur.read_until(b' '), None);
    }
}
