pub struct Punctuation;

impl Punctuation {
    /// Characters split off the end of a token into its `extra`.
    pub const TRAILING: &'static str = ".,;!?)]}>\"'’”…。、，";
    /// Only trailing when it ends the word or is followed by other punctuation.
    pub const COLON: char = ':';
    /// Characters skipped as plain text before a token.
    pub const OPENERS: &'static str = "([{<\"'“‘«";

    pub fn is_trailing(c: char) -> bool {
        Self::TRAILING.contains(c)
    }

    pub fn is_opener(c: char) -> bool {
        Self::OPENERS.contains(c)
    }

    /// Length in bytes of the trailing-punctuation run at the start of `s`.
    pub fn trailing_run(s: &str) -> usize {
        let mut len = 0;
        let mut chars = s.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            let accepted = if c == Self::COLON {
                match chars.peek() {
                    None => true,
                    Some((_, next)) => Self::is_trailing(*next) || *next == Self::COLON,
                }
            } else {
                Self::is_trailing(c)
            };
            if !accepted {
                break;
            }
            len = i + c.len_utf8();
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_run_lengths() {
        assert_eq!(Punctuation::trailing_run(".)"), 2);
        assert_eq!(Punctuation::trailing_run(".foo"), 1);
        assert_eq!(Punctuation::trailing_run(":"), 1);
        assert_eq!(Punctuation::trailing_run(":x"), 0);
        assert_eq!(Punctuation::trailing_run("…"), "…".len());
        assert_eq!(Punctuation::trailing_run("abc"), 0);
    }
}
