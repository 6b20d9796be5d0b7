//! Programmatic validation for matches that a regex alone over-approximates.
//!
//! Pattern matching gets the shape right; these checks cut false positives by
//! applying structural rules (HMRC NINO allocation, Luhn checksums) and by
//! trimming non-name words off candidate person names.
//!
//! License: MIT OR Apache-2.0

use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashSet;

static INVALID_NINO_PREFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend(["BF", "BG", "EH", "GB", "JE", "NK", "KN", "LI", "NT", "TN", "ZZ"]);
    set
});

static INVALID_NINO_PREFIX_CHARS: Lazy<HashSet<char>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend(['D', 'F', 'I', 'Q', 'U', 'V', 'O']);
    set
});

static VALID_NINO_SUFFIX_CHARS: Lazy<HashSet<char>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend(['A', 'B', 'C', 'D']);
    set
});

/// Validates a UK National Insurance number against HMRC structural rules.
///
/// Accepts the spaced ("AB 12 34 56 C") and compact ("AB123456C") layouts.
/// Returns `true` only when the prefix pair is allocatable, the middle six
/// characters are digits, and the suffix letter is in the issued A-D range.
pub fn is_valid_uk_nino(nino: &str) -> bool {
    const NINO_LENGTH: usize = 9;

    let normalized: Cow<str> = if nino.chars().any(|c| c.is_ascii_lowercase()) {
        Cow::Owned(nino.to_uppercase())
    } else {
        Cow::Borrowed(nino)
    };
    let compact: String = normalized.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.len() != NINO_LENGTH {
        return false;
    }

    let mut chars = compact.chars();
    let (Some(first), Some(second)) = (chars.next(), chars.next()) else {
        return false;
    };
    if !first.is_ascii_alphabetic() || !second.is_ascii_alphabetic() {
        return false;
    }
    if INVALID_NINO_PREFIXES.contains(&compact[0..2]) {
        return false;
    }
    if INVALID_NINO_PREFIX_CHARS.contains(&first) || INVALID_NINO_PREFIX_CHARS.contains(&second) {
        return false;
    }

    if !chars.by_ref().take(6).all(|c| c.is_ascii_digit()) {
        return false;
    }

    match chars.next() {
        Some(suffix) if VALID_NINO_SUFFIX_CHARS.contains(&suffix) => chars.next().is_none(),
        _ => false,
    }
}

/// Validates a digit string with the Luhn (mod 10) checksum.
pub fn is_valid_luhn(digits: &str) -> bool {
    let mut sum = 0u32;
    let mut alternate = false;
    for c in digits.chars().rev() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if alternate {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        alternate = !alternate;
    }
    sum % 10 == 0
}

/// Validates a card-number candidate: strips separators, then applies Luhn.
pub fn is_valid_card_number(candidate: &str) -> bool {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return false;
    }
    is_valid_luhn(&digits)
}

// Capitalized words that start or end a match but are not part of a name.
// A heuristic list, not a resolved algorithm: it shrinks the obvious false
// positives ("Contact John Smith", "Dear Jane Doe") and nothing more.
static NON_NAME_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    let mut set = HashSet::new();
    set.extend([
        "contact", "dear", "hello", "regards", "sincerely", "thanks", "subject",
        "attention", "reference", "office", "client", "account", "street", "road",
        "house", "court", "from", "sent", "date",
    ]);
    set
});

/// Trims non-name words off both ends of a capitalized-word run.
///
/// Returns the byte range of the surviving span within `candidate`, or `None`
/// when fewer than two words remain; a single capitalized word is too weak a
/// signal to redact.
pub fn refine_person_name(candidate: &str) -> Option<(usize, usize)> {
    let mut words: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0usize;
    for word in candidate.split(' ') {
        if !word.is_empty() {
            words.push((offset, word));
        }
        offset += word.len() + 1;
    }

    let mut lo = 0usize;
    let mut hi = words.len();
    while lo < hi && NON_NAME_WORDS.contains(words[lo].1.to_ascii_lowercase().as_str()) {
        lo += 1;
    }
    while hi > lo && NON_NAME_WORDS.contains(words[hi - 1].1.to_ascii_lowercase().as_str()) {
        hi -= 1;
    }
    if hi - lo < 2 {
        return None;
    }
    let start = words[lo].0;
    let end = words[hi - 1].0 + words[hi - 1].1.len();
    Some((start, end))
}
