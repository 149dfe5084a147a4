//! Name Masking
//!
//! Display masking for household-head names: each word keeps its first
//! letter, the rest is starred out.

pub fn mask_name(full_name: &str) -> String {
    full_name
        .split_whitespace()
        .map(mask_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn mask_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let stars = chars.count();
            format!("{}{}", first, "*".repeat(stars))
        }
        None => String::new(),
    }
}
