pub struct Lightning;

impl Lightning {
    pub const SCHEME: &'static str = "lightning:";
    /// Mainnet and testnet invoice prefixes.
    pub const INVOICE_PREFIXES: [&'static str; 2] = ["lnbc", "lntb"];
    pub const WITHDRAW_PREFIX: &'static str = "lnurl";
    /// Shortest body accepted after a prefix.
    pub const MIN_BODY_LEN: usize = 16;
}

pub struct Cashu;

impl Cashu {
    pub const PREFIXES: [&'static str; 2] = ["cashuA", "cashuB"];
    pub const MIN_BODY_LEN: usize = 8;

    /// Tokens are url-safe base64, sometimes padded.
    pub fn is_body_char(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=' | '+' | '/')
    }
}
