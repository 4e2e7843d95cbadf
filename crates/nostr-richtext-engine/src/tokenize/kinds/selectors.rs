/// Unicode variation selectors used to hide bytes behind a visible carrier.
///
/// Byte `b < 16` maps to `U+FE00 + b`; any other byte maps to
/// `U+E0100 + (b - 16)`.
pub struct Selectors;

impl Selectors {
    pub const BASIC_START: u32 = 0xFE00;
    pub const BASIC_END: u32 = 0xFE0F;
    pub const SUPPLEMENT_START: u32 = 0xE0100;
    pub const SUPPLEMENT_END: u32 = 0xE01EF;
    /// Emoji presentation selector; may legitimately follow a carrier emoji.
    pub const EMOJI_PRESENTATION: char = '\u{FE0F}';
    /// Longest visible carrier, in chars, before the selector run starts.
    pub const MAX_CARRIER_CHARS: usize = 16;

    pub fn is_selector(c: char) -> bool {
        let cp = c as u32;
        (Self::BASIC_START..=Self::BASIC_END).contains(&cp)
            || (Self::SUPPLEMENT_START..=Self::SUPPLEMENT_END).contains(&cp)
    }

    /// Only supplementary selectors mark a word as coded: the basic block is
    /// common in ordinary emoji sequences.
    pub fn is_supplement(c: char) -> bool {
        (Self::SUPPLEMENT_START..=Self::SUPPLEMENT_END).contains(&(c as u32))
    }

    pub fn to_byte(c: char) -> Option<u8> {
        let cp = c as u32;
        if (Self::BASIC_START..=Self::BASIC_END).contains(&cp) {
            u8::try_from(cp - Self::BASIC_START).ok()
        } else if (Self::SUPPLEMENT_START..=Self::SUPPLEMENT_END).contains(&cp) {
            u8::try_from(cp - Self::SUPPLEMENT_START + 16).ok()
        } else {
            None
        }
    }

    pub fn from_byte(b: u8) -> char {
        let cp = if b < 16 {
            Self::BASIC_START + u32::from(b)
        } else {
            Self::SUPPLEMENT_START + u32::from(b) - 16
        };
        // Both ranges are valid scalar values.
        char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}
