//! Input validation and filename sanitization
//!
//! Fixed regular-expression rules for e-mail addresses, mainland-China
//! mobile numbers, identity card numbers, passwords and user names, plus
//! the filename sanitizer used when saving log files.
//!
//! Rules are compiled once and never change at runtime. Matching never
//! fails: ill-formed input simply does not match.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Mobile network operator for carrier-specific number checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Carrier {
    /// China Mobile: 134-139, 147, 150-152, 157-159, 178, 182-184, 187, 188, 1705
    Mobile,
    /// China Unicom: 130-132, 145, 155, 156, 176, 185, 186, 1709
    Unicom,
    /// China Telecom: 133, 153, 177, 180, 181, 189, 1700
    Telecom,
}

/// A named validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationRule {
    Email,
    /// Eleven digits starting with `1`
    PhoneNumber,
    /// Any known mobile number segment, regardless of carrier
    MobileNumberGeneric,
    MobileNumberCarrierSpecific(Carrier),
    /// 15 or 18 character identity card number, last character may be `X`
    IdentityCard,
    /// 6-18 ASCII letters and digits mixing both kinds
    ///
    /// Only the start is anchored, so trailing characters are accepted.
    Password,
    /// 1-50 ASCII alphanumerics, start-anchored only
    Url,
    /// 1-20 Latin letters or CJK ideographs, start-anchored only
    Username,
    /// `word:digits:word;`
    ColonTriple,
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Z0-9a-z._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,6})$").expect("valid regex")
});
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^1[0-9]{10}$").expect("valid regex"));
static MOBILE_ANY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^1((3[0-9]|4[57]|5[0-35-9]|7[0678]|8[0-9])[0-9]{8}$)").expect("valid regex")
});
static CHINA_MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^1(3[4-9]|4[7]|5[0-27-9]|7[8]|8[2-478])[0-9]{8}$)|(^1705[0-9]{7}$)")
        .expect("valid regex")
});
static CHINA_UNICOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^1(3[0-2]|4[5]|5[56]|7[6]|8[56])[0-9]{8}$)|(^1709[0-9]{7}$)")
        .expect("valid regex")
});
static CHINA_TELECOM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^1(33|53|77|8[019])[0-9]{8}$)|(^1700[0-9]{7}$)").expect("valid regex")
});
static IDENTITY_CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{14}|[0-9]{17})([0-9]|[xX])$").expect("valid regex"));
static PASSWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{6,18}").expect("valid regex"));
static ALL_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid regex"));
static ALL_LETTERS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").expect("valid regex"));
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Za-z]{1,50}").expect("valid regex"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\x{4E00}-\x{9FA5}]{1,20}").expect("valid regex"));
static COLON_TRIPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+:[0-9]+:\w+;$").expect("valid regex"));

/// Characters counted by [`contains_special_character`]
const SPECIAL_CHARACTERS: &str =
    "@／:;（）¥「」!,.?<>£＂、[]{}#%-*+=_\\|~＜＞$€^•'&()\"/";

/// Tests `input` against a validation rule
///
/// # Arguments
/// - `input` - Arbitrary text, may be empty
/// - `rule` - The rule to apply
///
/// # Returns
/// `true` if the input satisfies the rule
pub fn matches(input: &str, rule: ValidationRule) -> bool {
    match rule {
        ValidationRule::Email => EMAIL_RE.is_match(input),
        ValidationRule::PhoneNumber => PHONE_RE.is_match(input),
        ValidationRule::MobileNumberGeneric => {
            MOBILE_ANY_RE.is_match(input)
                || [Carrier::Mobile, Carrier::Unicom, Carrier::Telecom]
                    .into_iter()
                    .any(|carrier| carrier_regex(carrier).is_match(input))
        }
        ValidationRule::MobileNumberCarrierSpecific(carrier) => {
            carrier_regex(carrier).is_match(input)
        }
        ValidationRule::IdentityCard => IDENTITY_CARD_RE.is_match(input),
        ValidationRule::Password => {
            // Stands in for the lookaheads `(?![0-9]+$)(?![a-zA-Z]+$)`
            !ALL_DIGITS_RE.is_match(input)
                && !ALL_LETTERS_RE.is_match(input)
                && PASSWORD_RE.is_match(input)
        }
        ValidationRule::Url => URL_RE.is_match(input),
        ValidationRule::Username => USERNAME_RE.is_match(input),
        ValidationRule::ColonTriple => COLON_TRIPLE_RE.is_match(input),
    }
}

fn carrier_regex(carrier: Carrier) -> &'static Regex {
    match carrier {
        Carrier::Mobile => &CHINA_MOBILE_RE,
        Carrier::Unicom => &CHINA_UNICOM_RE,
        Carrier::Telecom => &CHINA_TELECOM_RE,
    }
}

/// Returns `true` if `input` contains at least one ASCII digit
pub fn contains_digit(input: &str) -> bool {
    input.chars().any(|c| c.is_ascii_digit())
}

/// Returns `true` if `input` contains any punctuation from a fixed set
///
/// The set mixes ASCII punctuation with common full-width forms
/// (`／`, `（`, `）`, `「`, `」`, `、`, `＜`, `＞`) and currency signs.
pub fn contains_special_character(input: &str) -> bool {
    input.chars().any(|c| SPECIAL_CHARACTERS.contains(c))
}

/// Sanitizes a string to be safe for use as a filename
///
/// Replaces dangerous characters (slashes, colons, wildcards, etc.)
/// with underscores to prevent path traversal and invalid filenames.
///
/// # Arguments
/// - `input` - The unsanitized filename
///
/// # Returns
/// A safe filename with dangerous characters replaced
pub fn sanitize_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Builds a safe file path within a directory
///
/// Combines a directory path with a sanitized filename.
pub fn build_safe_filepath(dir: &Path, filename: &str) -> PathBuf {
    dir.join(sanitize_filename(filename))
}
