//! Decoding of bech32 entity references into canonical identifiers.
//!
//! Only the parts the renderer needs are read: the 32-byte key or id, the
//! relay URL of `nrelay`, and the `kind:author:identifier` coordinate of
//! `naddr`. Anything malformed decodes to `None` and the word stays text.

use crate::segment::MentionKind;

use super::kinds::Entity;

/// A decoded entity: its kind and canonical id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEntity {
    pub kind: MentionKind,
    pub canonical_id: String,
}

/// Decodes a complete bech32 entity such as `npub1...`.
pub fn decode(encoded: &str) -> Option<DecodedEntity> {
    let (hrp, data) = bech32::decode(encoded).ok()?;
    let hrp = hrp.to_lowercase();
    let canonical_id = match hrp.as_str() {
        "npub" | "note" | "nsec" => key_hex(&data)?,
        "nprofile" | "nevent" => key_hex(tlv_first(&data, Entity::TLV_SPECIAL)?)?,
        "naddr" => address_coordinate(&data)?,
        "nrelay" => String::from_utf8(tlv_first(&data, Entity::TLV_SPECIAL)?.to_vec()).ok()?,
        _ => return None,
    };
    let kind = Entity::PREFIXES
        .iter()
        .find(|(prefix, _)| *prefix == hrp)
        .map(|(_, kind)| *kind)?;
    Some(DecodedEntity { kind, canonical_id })
}

fn key_hex(bytes: &[u8]) -> Option<String> {
    (bytes.len() == 32).then(|| hex::encode(bytes))
}

/// Walks `type, length, value` records and returns the first value of `ty`.
fn tlv_first(data: &[u8], ty: u8) -> Option<&[u8]> {
    tlv_records(data).find(|(t, _)| *t == ty).map(|(_, v)| v)
}

fn tlv_records(data: &[u8]) -> impl Iterator<Item = (u8, &[u8])> {
    let mut rest = data;
    std::iter::from_fn(move || {
        let (&ty, tail) = rest.split_first()?;
        let (&len, tail) = tail.split_first()?;
        let len = usize::from(len);
        if tail.len() < len {
            rest = &[];
            return None;
        }
        let (value, tail) = tail.split_at(len);
        rest = tail;
        Some((ty, value))
    })
}

fn address_coordinate(data: &[u8]) -> Option<String> {
    let identifier = String::from_utf8(tlv_first(data, Entity::TLV_SPECIAL)?.to_vec()).ok()?;
    let author = key_hex(tlv_first(data, Entity::TLV_AUTHOR)?)?;
    let kind_bytes: [u8; 4] = tlv_first(data, Entity::TLV_KIND)?.try_into().ok()?;
    let kind = u32::from_be_bytes(kind_bytes);
    Some(format!("{kind}:{author}:{identifier}"))
}

#[cfg(test)]
pub(crate) mod test_support {
    use bech32::{Bech32, Hrp};

    pub fn encode(hrp: &str, data: &[u8]) -> String {
        bech32::encode::<Bech32>(Hrp::parse(hrp).unwrap(), data).unwrap()
    }

    pub fn tlv(records: &[(u8, &[u8])]) -> Vec<u8> {
        let mut out = vec![];
        for (ty, value) in records {
            out.push(*ty);
            out.push(value.len() as u8);
            out.extend_from_slice(value);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{encode, tlv};
    use super::*;
    use pretty_assertions::assert_eq;

    const KEY: [u8; 32] = [0xab; 32];

    #[test]
    fn npub_decodes_to_hex() {
        let npub = encode("npub", &KEY);
        assert_eq!(npub.len(), Entity::KEY_ENCODED_LEN);
        let decoded = decode(&npub).unwrap();
        assert_eq!(decoded.kind, MentionKind::User);
        assert_eq!(decoded.canonical_id, "ab".repeat(32));
    }

    #[test]
    fn nevent_uses_special_record() {
        let data = tlv(&[
            (Entity::TLV_RELAY, b"wss://relay.example"),
            (Entity::TLV_SPECIAL, &KEY),
        ]);
        let decoded = decode(&encode("nevent", &data)).unwrap();
        assert_eq!(decoded.kind, MentionKind::Event);
        assert_eq!(decoded.canonical_id, "ab".repeat(32));
    }

    #[test]
    fn naddr_builds_coordinate() {
        let data = tlv(&[
            (Entity::TLV_SPECIAL, b"my-article"),
            (Entity::TLV_AUTHOR, &KEY),
            (Entity::TLV_KIND, &30023u32.to_be_bytes()),
        ]);
        let decoded = decode(&encode("naddr", &data)).unwrap();
        assert_eq!(decoded.kind, MentionKind::Address);
        assert_eq!(
            decoded.canonical_id,
            format!("30023:{}:my-article", "ab".repeat(32))
        );
    }

    #[test]
    fn nrelay_is_url() {
        let data = tlv(&[(Entity::TLV_SPECIAL, b"wss://relay.example")]);
        let decoded = decode(&encode("nrelay", &data)).unwrap();
        assert_eq!(decoded.kind, MentionKind::Relay);
        assert_eq!(decoded.canonical_id, "wss://relay.example");
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        assert_eq!(decode("npub1notreallyvalid"), None);
        assert_eq!(decode(&encode("npub", &[1, 2, 3])), None);
        assert_eq!(decode(&encode("nfoo", &KEY)), None);
        // truncated TLV
        assert_eq!(decode(&encode("nprofile", &[0, 32, 1, 2])), None);
    }
}
