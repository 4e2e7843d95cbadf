pub struct Shortcode;

impl Shortcode {
    pub const DELIM: char = ':';

    pub fn is_name_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')
    }
}
