//! Lexical matchers, one per token kind.
//!
//! Each matcher looks at a single word (the input up to the next whitespace,
//! cut to at most [`super::MAX_TOKEN_LEN`] bytes) and reports how many leading
//! bytes it would classify. Trailing punctuation
//! is left for the scanner to split into `extra`. Matchers are tried in
//! [`PRIORITY`] order; the longest match wins and ties go to the earlier entry.

use std::sync::OnceLock;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use crate::segment::SegmentKind;

use super::RawKind;
use super::entity;
use super::kinds::{
    Cashu, Entity, Hashtag, InlineData, Lightning, Link, Punctuation, Selectors, Shortcode,
    TagIndex,
};

/// A successful match: `len` bytes from the start of the word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub len: usize,
    pub kind: RawKind,
}

impl Match {
    fn new(len: usize, kind: SegmentKind) -> Self {
        Self {
            len,
            kind: RawKind::Final(kind),
        }
    }
}

pub type Matcher = fn(&str) -> Option<Match>;

/// Matchers from highest to lowest precedence.
pub const PRIORITY: [(&str, Matcher); 13] = [
    ("inline_data", inline_data),
    ("scheme_url", scheme_url),
    ("mention", mention),
    ("lightning_invoice", lightning_invoice),
    ("lightning_withdraw", lightning_withdraw),
    ("cashu", cashu),
    ("secret", secret),
    ("tag_index", tag_index),
    ("hashtag", hashtag),
    ("emoji", emoji),
    ("email", email),
    ("phone", phone),
    ("schemeless_url", schemeless_url),
];

/// Runs every matcher on `word` and returns the winner, if any.
pub fn best_match(word: &str) -> Option<Match> {
    let mut best: Option<Match> = None;
    for (_, matcher) in PRIORITY {
        let Some(m) = matcher(word) else { continue };
        if m.len == 0 || m.len > word.len() {
            continue;
        }
        if best.as_ref().is_none_or(|b| m.len > b.len) {
            best = Some(m);
        }
    }
    best
}

/// Length in bytes of the leading run of chars satisfying `pred`.
pub(crate) fn run_len(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|(_, c)| !pred(*c))
        .map_or(s.len(), |(i, _)| i)
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

/// Length of a link once trailing punctuation is trimmed. A `)` is kept when
/// it closes a `(` inside the link.
fn trim_link_end(link: &str) -> usize {
    let open = link.matches('(').count();
    let mut close = link.matches(')').count();
    let mut end = link.len();
    while let Some(last) = link[..end].chars().next_back() {
        let trim = match last {
            ')' => close > open,
            Punctuation::COLON => true,
            c => Punctuation::is_trailing(c),
        };
        if !trim {
            break;
        }
        if last == ')' {
            close -= 1;
        }
        end -= last.len_utf8();
    }
    end
}

pub fn inline_data(word: &str) -> Option<Match> {
    let rest = strip_prefix_ignore_case(word, InlineData::PREFIX)?;
    let subtype_len = run_len(rest, InlineData::is_subtype_char);
    if subtype_len == 0 {
        return None;
    }
    let rest = strip_prefix_ignore_case(&rest[subtype_len..], InlineData::BASE64_MARK)?;
    let payload_len = run_len(rest, InlineData::is_payload_char);
    let payload = &rest[..payload_len];
    if payload.is_empty() || STANDARD.decode(payload).is_err() {
        return None;
    }
    let len = word.len() - rest.len() + payload_len;
    Some(Match::new(
        len,
        SegmentKind::InlineImageData {
            payload: payload.to_string(),
        },
    ))
}

pub fn scheme_url(word: &str) -> Option<Match> {
    let scheme = Link::SCHEMES
        .iter()
        .find(|scheme| strip_prefix_ignore_case(word, scheme).is_some())?;
    let len = trim_link_end(word);
    if len <= scheme.len() {
        return None;
    }
    let candidate = &word[..len];
    let parsed = url::Url::parse(candidate).ok()?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return None;
    }
    let kind = if Link::has_image_extension(parsed.path()) {
        SegmentKind::ImageReference {
            url: candidate.to_string(),
        }
    } else {
        SegmentKind::Url { has_scheme: true }
    };
    Some(Match::new(len, kind))
}

pub fn mention(word: &str) -> Option<Match> {
    let body = strip_prefix_ignore_case(word, Entity::URI_SCHEME)
        .or_else(|| word.strip_prefix(Entity::AT))
        .unwrap_or(word);
    let prefix_len = word.len() - body.len();
    let run = &body[..run_len(body, |c| c.is_ascii_alphanumeric())];

    let lower = run.to_ascii_lowercase();
    Entity::PREFIXES.iter().find(|(hrp, _)| {
        lower
            .strip_prefix(hrp)
            .is_some_and(|tail| tail.starts_with(Entity::SEPARATOR))
    })?;

    let (used, decoded) = match entity::decode(run) {
        Some(decoded) => (run.len(), decoded),
        // keys pasted without a following space: npub1...abc
        None if run.len() > Entity::KEY_ENCODED_LEN => {
            let head = &run[..Entity::KEY_ENCODED_LEN];
            (head.len(), entity::decode(head)?)
        }
        None => return None,
    };
    Some(Match::new(
        prefix_len + used,
        SegmentKind::Mention {
            kind: decoded.kind,
            canonical_id: decoded.canonical_id,
        },
    ))
}

fn prefixed_payment(word: &str, prefixes: &[&str], kind: SegmentKind) -> Option<Match> {
    let body = strip_prefix_ignore_case(word, Lightning::SCHEME).unwrap_or(word);
    let prefix = prefixes
        .iter()
        .find(|prefix| strip_prefix_ignore_case(body, prefix).is_some())?;
    let len = run_len(body, |c| c.is_ascii_alphanumeric());
    if len < prefix.len() + Lightning::MIN_BODY_LEN {
        return None;
    }
    Some(Match::new(word.len() - body.len() + len, kind))
}

pub fn lightning_invoice(word: &str) -> Option<Match> {
    prefixed_payment(
        word,
        &Lightning::INVOICE_PREFIXES,
        SegmentKind::LightningInvoice,
    )
}

pub fn lightning_withdraw(word: &str) -> Option<Match> {
    prefixed_payment(
        word,
        &[Lightning::WITHDRAW_PREFIX],
        SegmentKind::LightningWithdrawRequest,
    )
}

pub fn cashu(word: &str) -> Option<Match> {
    let prefix = Cashu::PREFIXES
        .iter()
        .find(|prefix| strip_prefix_ignore_case(word, prefix).is_some())?;
    let body_len = run_len(&word[prefix.len()..], Cashu::is_body_char);
    (body_len >= Cashu::MIN_BODY_LEN)
        .then(|| Match::new(prefix.len() + body_len, SegmentKind::CashuToken))
}

/// A short visible carrier followed by a run of variation selectors, at least
/// one of them supplementary. The match ends with the run.
pub fn secret(word: &str) -> Option<Match> {
    let carrier = word
        .char_indices()
        .take(Selectors::MAX_CARRIER_CHARS + 1)
        .find(|(_, c)| Selectors::is_selector(*c))
        .map(|(i, _)| i)?;
    let run = run_len(&word[carrier..], Selectors::is_selector);
    word[carrier..carrier + run]
        .chars()
        .any(Selectors::is_supplement)
        .then(|| Match::new(carrier + run, SegmentKind::SecretBlock))
}

pub fn tag_index(word: &str) -> Option<Match> {
    let rest = word.strip_prefix(TagIndex::OPEN)?;
    let digits = run_len(rest, |c| c.is_ascii_digit());
    if digits == 0 || !rest[digits..].starts_with(TagIndex::CLOSE) {
        return None;
    }
    let index = rest[..digits].parse::<usize>().ok()?;
    Some(Match {
        len: TagIndex::OPEN.len() + digits + TagIndex::CLOSE.len_utf8(),
        kind: RawKind::TagIndex { index },
    })
}

pub fn hashtag(word: &str) -> Option<Match> {
    let rest = word.strip_prefix(Hashtag::MARK)?;
    let name_len = run_len(rest, Hashtag::is_name_char);
    if name_len == 0 {
        return None;
    }
    Some(Match::new(
        Hashtag::MARK.len_utf8() + name_len,
        SegmentKind::Hashtag {
            name: rest[..name_len].to_string(),
        },
    ))
}

pub fn emoji(word: &str) -> Option<Match> {
    let rest = word.strip_prefix(Shortcode::DELIM)?;
    let name_len = run_len(rest, Shortcode::is_name_char);
    if name_len == 0 || !rest[name_len..].starts_with(Shortcode::DELIM) {
        return None;
    }
    Some(Match {
        len: name_len + 2 * Shortcode::DELIM.len_utf8(),
        kind: RawKind::EmojiCandidate {
            name: rest[..name_len].to_string(),
        },
    })
}

pub fn email(word: &str) -> Option<Match> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let email_regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}")
            .expect("Invalid email regex")
    });
    let m = email_regex.find(word)?;
    Some(Match::new(m.end(), SegmentKind::Email))
}

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

pub fn phone(word: &str) -> Option<Match> {
    static DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    static GROUPED_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    let date_regex = DATE_REGEX.get_or_init(|| {
        Regex::new(r"^(?:\d{4}[-./]\d{1,2}[-./]\d{1,2}|\d{1,2}[-./]\d{1,2}[-./]\d{2,4})$")
            .expect("Invalid date regex")
    });
    let grouped_number_regex = GROUPED_NUMBER_REGEX
        .get_or_init(|| Regex::new(r"^\d{1,3}(?:\.\d{3})+$").expect("Invalid number regex"));

    let plus = word.starts_with('+');
    let body = &word[usize::from(plus)..];
    if !body.starts_with(|c: char| c.is_ascii_digit() || c == '(') {
        return None;
    }
    let run = run_len(body, |c| c.is_ascii_digit() || matches!(c, '(' | ')' | '-' | '.'));
    let candidate = body[..run].trim_end_matches(|c: char| !c.is_ascii_digit());

    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return None;
    }
    let has_separator = candidate.contains(['(', ')', '-', '.']);
    if !plus && !has_separator {
        return None;
    }
    if candidate.matches('(').count() != candidate.matches(')').count() {
        return None;
    }
    if candidate.matches('.').count() == 1 {
        return None;
    }
    if date_regex.is_match(candidate) || grouped_number_regex.is_match(candidate) {
        return None;
    }
    Some(Match::new(
        usize::from(plus) + candidate.len(),
        SegmentKind::Phone,
    ))
}

fn is_label_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '-' | '_')
}

/// Length of the longest dotted-label prefix that ends in an alphabetic TLD.
fn domain_len(word: &str) -> Option<usize> {
    if !word.starts_with(char::is_alphanumeric) {
        return None;
    }
    let mut best = None;
    let mut pos = 0;
    let mut labels = 0;
    loop {
        let label_len = run_len(&word[pos..], is_label_char);
        if label_len == 0 {
            break;
        }
        let label = &word[pos..pos + label_len];
        labels += 1;
        pos += label_len;
        if labels >= 2
            && label.chars().count() >= Link::MIN_TLD_LEN
            && label.chars().all(char::is_alphabetic)
        {
            best = Some(pos);
        }
        match word[pos..].strip_prefix(Link::LABEL_SEP) {
            Some(_) => pos += Link::LABEL_SEP.len_utf8(),
            None => break,
        }
    }
    best
}

pub fn schemeless_url(word: &str) -> Option<Match> {
    let domain = domain_len(word)?;
    let mut end = domain;
    if let Some(port) = word[end..].strip_prefix(Link::PORT) {
        let digits = run_len(port, |c| c.is_ascii_digit());
        if digits > 0 {
            end += Link::PORT.len_utf8() + digits;
        }
    }
    if word[end..].starts_with(Link::PATH) {
        end = word.len();
    }
    let len = trim_link_end(&word[..end]).max(domain);
    if word[..len].contains(Entity::AT) {
        return None;
    }
    Some(Match::new(len, SegmentKind::Url { has_scheme: false }))
}
