//! String shaping helpers
//!
//! Every index in this module counts grapheme clusters (user-perceived
//! characters), not bytes or code points, so slicing never splits an
//! emoji or a combining sequence.

use crate::error::{KitError, KitResult};
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use unicode_segmentation::UnicodeSegmentation;

static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("valid regex"));

/// Characters counted by [`count_symbols`]
const SYMBOLS: &str = "`~!?@#$€£¥§%^&*()_+-={}[]:\";.,<>'•\\|/";

const RANDOM_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Strips leading and trailing Unicode whitespace, newlines included
pub fn trimmed(s: &str) -> String {
    s.trim().to_owned()
}

/// Number of grapheme clusters
pub fn length(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Uppercases the first grapheme cluster, leaving the rest untouched
pub fn uppercase_first(s: &str) -> String {
    map_first(s, str::to_uppercase)
}

/// Lowercases the first grapheme cluster, leaving the rest untouched
pub fn lowercase_first(s: &str) -> String {
    map_first(s, str::to_lowercase)
}

fn map_first(s: &str, f: impl Fn(&str) -> String) -> String {
    match s.graphemes(true).next() {
        Some(first) => f(first) + &s[first.len()..],
        None => String::new(),
    }
}

/// Byte range covering graphemes `range.start..range.end`
fn byte_range(s: &str, range: Range<usize>) -> KitResult<Range<usize>> {
    let offsets: Vec<usize> = s
        .grapheme_indices(true)
        .map(|(offset, _)| offset)
        .chain(std::iter::once(s.len()))
        .collect();
    let len = offsets.len() - 1;

    if range.start > range.end || range.end > len {
        return Err(KitError::Range {
            start: range.start,
            end: range.end,
            len,
        });
    }
    Ok(offsets[range.start]..offsets[range.end])
}

/// Half-open, 0-based grapheme slice
///
/// # Errors
/// `Range` if `start > end` or `end` is past the last grapheme.
pub fn substring(s: &str, range: Range<usize>) -> KitResult<String> {
    let bytes = byte_range(s, range)?;
    Ok(s[bytes].to_owned())
}

/// Graphemes from `index` to the end
pub fn substring_from(s: &str, index: usize) -> KitResult<String> {
    substring(s, index..length(s))
}

/// Graphemes before `index`; empty if `index` is past the end
pub fn substring_to(s: &str, index: usize) -> String {
    substring(s, 0..index).unwrap_or_default()
}

/// Everything after the first occurrence of `needle`, or empty if absent
pub fn substring_after(s: &str, needle: &str) -> String {
    match s.grapheme_indices(true).find(|(_, g)| *g == needle) {
        Some((offset, g)) => s[offset + g.len()..].to_owned(),
        None => String::new(),
    }
}

/// The grapheme at `index`
pub fn char_at(s: &str, index: usize) -> KitResult<&str> {
    let end = index.checked_add(1).ok_or_else(|| KitError::Range {
        start: index,
        end: index,
        len: length(s),
    })?;
    let bytes = byte_range(s, index..end)?;
    Ok(&s[bytes])
}

/// Grapheme index of the first occurrence of `needle`
pub fn index_of(s: &str, needle: &str) -> Option<usize> {
    s.graphemes(true).position(|g| g == needle)
}

/// Collapses runs of spaces into one and trims the ends
pub fn remove_extra_spaces(s: &str) -> String {
    SPACE_RUN_RE.replace_all(s, " ").trim().to_owned()
}

/// Reverses the grapheme order
///
/// Runs of spaces are collapsed first. With `preserve_format`, each
/// reversed word is lowercased and, if it now ends in an uppercase
/// letter, its first character is uppercased instead:
/// `"Let's try this function?"` becomes `"?noitcnuf siht yrt S'tel"`.
pub fn reversed(s: &str, preserve_format: bool) -> String {
    let reversed: String = remove_extra_spaces(s).graphemes(true).rev().collect();
    if !preserve_format {
        return reversed;
    }

    reversed
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lowered = word.to_lowercase();
            match word.chars().last() {
                Some(last) if last.is_uppercase() => uppercase_first(&lowered),
                _ => lowered,
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lines split on `\n` or `\r\n`
pub fn lines(s: &str) -> Vec<String> {
    s.lines().map(str::to_owned).collect()
}

/// `"true"`/`"1"` and `"false"`/`"0"`, case-insensitive and trimmed
pub fn to_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

pub fn to_uint(s: &str) -> Option<u64> {
    s.parse().ok()
}

/// Case-insensitive palindrome check ignoring spaces
pub fn is_palindrome(s: &str) -> bool {
    let normalized = s.to_lowercase().replace(' ', "");
    normalized
        .graphemes(true)
        .eq(normalized.graphemes(true).rev())
}

/// Number of characters from the fixed ASCII/currency symbol set
pub fn count_symbols(s: &str) -> usize {
    s.chars().filter(|c| SYMBOLS.contains(*c)).count()
}

/// Number of ASCII digits
pub fn count_numbers(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

/// Non-overlapping occurrences of `needle`
pub fn occurrences(s: &str, needle: &str, case_sensitive: bool) -> usize {
    if needle.is_empty() {
        return 0;
    }
    if case_sensitive {
        s.matches(needle).count()
    } else {
        s.to_lowercase().matches(&needle.to_lowercase()).count()
    }
}

/// Whether `needle` occurs in `s`
pub fn has(s: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        s.contains(needle)
    } else {
        s.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Strips `<`/`>` from the ends and removes spaces and dashes
///
/// Turns `"<a1b2 c3d4-e5>"` into `"a1b2c3d4e5"`, the shape push
/// services expect for device tokens.
pub fn readable_uuid(s: &str) -> String {
    s.trim_matches(|c| c == '<' || c == '>')
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect()
}

pub fn base64_encoded(s: &str) -> String {
    B64.encode(s.as_bytes())
}

/// Decodes standard base64, skipping characters outside the alphabet
///
/// Returns `None` if the payload is not valid base64 or not UTF-8.
pub fn base64_decoded(s: &str) -> Option<String> {
    let filtered: String = s
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
        .collect();
    let bytes = B64.decode(filtered).ok()?;
    String::from_utf8(bytes).ok()
}

/// Random string of ASCII letters and digits
pub fn random_alphanumeric(len: usize) -> String {
    (0..len)
        .map(|_| RANDOM_ALPHABET[rand::random_range(0..RANDOM_ALPHABET.len())] as char)
        .collect()
}
