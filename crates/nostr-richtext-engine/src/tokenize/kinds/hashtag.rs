pub struct Hashtag;

impl Hashtag {
    pub const MARK: char = '#';
    /// Characters that end a hashtag name.
    pub const STOP: &'static str = "!@#$%^&*()=+./,[{]};:'\"?><";

    pub fn is_name_char(c: char) -> bool {
        !c.is_whitespace() && !Self::STOP.contains(c)
    }
}

/// Legacy `#[n]` references into the event's tag list.
pub struct TagIndex;

impl TagIndex {
    pub const OPEN: &'static str = "#[";
    pub const CLOSE: char = ']';
}
