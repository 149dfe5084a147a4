//! Named Validation Patterns
//!
//! Compiled-once regexes shared by the rule evaluator.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Basic email shape: something@something.tld, no whitespace.
    pub static ref EMAIL: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern");

    /// Philippine mobile number: 11 digits with the local 09 prefix.
    pub static ref MOBILE_NUMBER: Regex =
        Regex::new(r"^09\d{9}$").expect("mobile pattern");

    /// Digits only (zip codes, quantities, id numbers).
    pub static ref NUMERIC: Regex =
        Regex::new(r"^[0-9]+$").expect("numeric pattern");

    /// Letters plus the punctuation that appears in real names.
    pub static ref ALPHA: Regex =
        Regex::new(r"^[A-Za-z\u{00C0}-\u{00FF} .'\-]+$").expect("alpha pattern");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape() {
        assert!(EMAIL.is_match("juan@example.com"));
        assert!(!EMAIL.is_match("juan@example"));
        assert!(!EMAIL.is_match("juan example.com"));
    }

    #[test]
    fn test_mobile_number() {
        assert!(MOBILE_NUMBER.is_match("09171234567"));
        assert!(!MOBILE_NUMBER.is_match("9171234567"));
        assert!(!MOBILE_NUMBER.is_match("091712345678"));
        assert!(!MOBILE_NUMBER.is_match("08171234567"));
    }

    #[test]
    fn test_alpha_accepts_name_punctuation() {
        assert!(ALPHA.is_match("Ma. Lourdes Dela-Cruz"));
        assert!(ALPHA.is_match("O'Brien"));
        assert!(!ALPHA.is_match("Juan2"));
    }
}
