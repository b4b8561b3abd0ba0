//! Heuristic English pluralization.
//!
//! Rules, first match wins (suffix checks ignore case):
//!
//! | ending                          | result           | example            |
//! |---------------------------------|------------------|--------------------|
//! | empty                           | empty            |                    |
//! | `s`, `x`, `z`, `ch`, `sh`       | append `es`      | `Push` → `Pushes`  |
//! | consonant + `y`                 | `y` → `ies`      | `Copy` → `Copies`  |
//! | consonant + `o`                 | append `es`      | `Echo` → `Echoes`  |
//! | anything else                   | append `s`       | `Show` → `Shows`   |
//!
//! The `es`/`ies` suffixes follow the case of the last letter (`BOX` → `BOXES`);
//! a bare `s` is always lowercase (`ID` → `IDs`). Irregular nouns (`Child`,
//! `Person`) and words that are already plural are not recognised.

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Converts a singular noun or verb fragment to its plural (or third-person) form.
pub fn pluralize(word: &str) -> String {
    let Some(last) = word.chars().last() else {
        return String::new();
    };

    let lower = word.to_lowercase();
    let shout = last.is_uppercase();

    if lower.ends_with(['s', 'x', 'z']) || lower.ends_with("ch") || lower.ends_with("sh") {
        return format!("{word}{}", if shout { "ES" } else { "es" });
    }

    if let Some(stem) = consonant_before(word, &lower, 'y') {
        return format!("{stem}{}", if shout { "IES" } else { "ies" });
    }

    if consonant_before(word, &lower, 'o').is_some() {
        return format!("{word}{}", if shout { "ES" } else { "es" });
    }

    format!("{word}s")
}

/// Returns the word without its last letter when it ends in a consonant followed by `letter`.
fn consonant_before<'a>(word: &'a str, lower: &str, letter: char) -> Option<&'a str> {
    let mut chars = lower.chars().rev();
    if chars.next() != Some(letter) {
        return None;
    }
    let previous = chars.next()?;
    if !previous.is_alphabetic() || VOWELS.contains(&previous) {
        return None;
    }
    let cut = word.char_indices().last().map(|(index, _)| index)?;
    Some(&word[..cut])
}
