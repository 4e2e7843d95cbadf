/// A cursor for character-by-character scanning with position tracking.
///
/// Operates over a string slice while tracking the absolute byte position in
/// the content (via `base` offset). Unlike a byte cursor it always advances by
/// whole `char`s, so every position it reports is a valid slice boundary.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The string being scanned.
    pub s: &'a str,
    /// Base offset in the content (added to local index for absolute positions).
    pub base: usize,
    /// Current local byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a new cursor at the start of `s` with the given base offset.
    pub fn new(s: &'a str, base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Returns the current absolute byte position (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current char without advancing.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        self.s.get(self.i..).unwrap_or("")
    }

    /// Advances by one char, returning the consumed char.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += c.len_utf8();
        Some(c)
    }

    /// Advances by `n` bytes. `n` must land on a char boundary.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Consumes chars while `pred` holds, returning how many bytes were consumed.
    pub fn bump_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let start = self.i;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.i += c.len_utf8();
        }
        self.i - start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello", 10);
        assert_eq!(cur.pos(), 10);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.pos(), 11);
        assert_eq!(cur.rest(), "ello");
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("", 0);
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.rest(), "");
    }

    #[test]
    fn bump_is_char_aware() {
        let mut cur = Cursor::new("שלום x", 0);
        assert_eq!(cur.bump(), Some('ש'));
        assert_eq!(cur.pos(), 2);
        let n = cur.bump_while(|c| !c.is_whitespace());
        assert_eq!(n, 6);
        assert_eq!(cur.peek(), Some(' '));
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x", 0);
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
    }

    #[test]
    fn rest_past_end_is_empty() {
        let mut cur = Cursor::new("hi", 0);
        cur.bump_n(10);
        assert!(cur.eof());
        assert_eq!(cur.rest(), "");
        assert_eq!(cur.peek(), None);
    }
}
