pub struct Link;

impl Link {
    pub const SCHEMES: [&'static str; 2] = ["https://", "http://"];
    pub const IMAGE_EXTENSIONS: [&'static str; 8] =
        ["png", "jpg", "gif", "bmp", "jpeg", "webp", "svg", "avif"];
    pub const PORT: char = ':';
    pub const PATH: char = '/';
    pub const LABEL_SEP: char = '.';
    /// A top-level domain must have at least this many letters.
    pub const MIN_TLD_LEN: usize = 2;

    /// True when `path` (query and fragment already removed) names an image file.
    pub fn has_image_extension(path: &str) -> bool {
        let Some((_, ext)) = path.rsplit_once('.') else {
            return false;
        };
        Self::IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known))
    }
}

pub struct InlineData;

impl InlineData {
    pub const PREFIX: &'static str = "data:image/";
    pub const BASE64_MARK: &'static str = ";base64,";

    pub fn is_subtype_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-')
    }

    pub fn is_payload_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=')
    }
}
