use crate::segment::MentionKind;

/// Bech32-encoded entity references (`npub1...`, `nevent1...`).
pub struct Entity;

impl Entity {
    pub const URI_SCHEME: &'static str = "nostr:";
    pub const AT: char = '@';
    pub const SEPARATOR: char = '1';

    /// Human-readable parts, each paired with the kind it decodes to.
    pub const PREFIXES: [(&'static str, MentionKind); 7] = [
        ("npub", MentionKind::User),
        ("nprofile", MentionKind::User),
        ("note", MentionKind::Note),
        ("nevent", MentionKind::Event),
        ("naddr", MentionKind::Address),
        ("nrelay", MentionKind::Relay),
        ("nsec", MentionKind::SecretKey),
    ];

    /// Length of a bech32 string wrapping a bare 32-byte key or id.
    pub const KEY_ENCODED_LEN: usize = 63;

    /// TLV record types.
    pub const TLV_SPECIAL: u8 = 0;
    pub const TLV_RELAY: u8 = 1;
    pub const TLV_AUTHOR: u8 = 2;
    pub const TLV_KIND: u8 = 3;
}
