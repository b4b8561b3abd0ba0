//! Identifier tokenization on case boundaries.

/// Splits an identifier into case-delimited word fragments.
///
/// A new fragment starts at every uppercase letter once the current fragment is
/// non-empty, so the first character always belongs to the first fragment.
/// Concatenating the fragments reproduces the input exactly.
///
/// ```
/// use quill_docs::tokenize::split;
///
/// assert_eq!(split("ShowBasicMethodTester"), ["Show", "Basic", "Method", "Tester"]);
/// ```
pub fn split(identifier: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();

    for ch in identifier.chars() {
        if ch.is_uppercase() && !current.is_empty() {
            fragments.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }

    if !current.is_empty() {
        fragments.push(current);
    }

    fragments
}

/// Lowercases every fragment, leaving the first one untouched when `keep_first_case` is set.
pub fn to_lowercase(fragments: &[String], keep_first_case: bool) -> Vec<String> {
    fragments
        .iter()
        .enumerate()
        .map(|(index, fragment)| {
            if index == 0 && keep_first_case {
                fragment.clone()
            } else {
                fragment.to_lowercase()
            }
        })
        .collect()
}

/// Splits and lowercases an identifier in one step.
pub fn lowercase_words(identifier: &str) -> Vec<String> {
    to_lowercase(&split(identifier), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_pascal_case() {
        assert_eq!(
            split("ShowBasicMethodTester"),
            vec!["Show", "Basic", "Method", "Tester"]
        );
    }

    #[test]
    fn keeps_leading_lowercase_run_together() {
        assert_eq!(split("isRed"), vec!["is", "Red"]);
        assert_eq!(split("param1"), vec!["param1"]);
    }

    #[test]
    fn splits_every_uppercase_letter_of_acronyms() {
        assert_eq!(split("IWidget"), vec!["I", "Widget"]);
        assert_eq!(split("ID"), vec!["I", "D"]);
    }

    #[test]
    fn split_is_lossless() {
        for input in [
            "SuperDuperClassTester",
            "_privateField",
            "HTTPServer2Go",
            "already_snake_case",
            "Ünïcödé",
            "x",
            "",
        ] {
            assert_eq!(split(input).concat(), input, "lossless split of {input:?}");
            assert!(split(input).iter().all(|fragment| !fragment.is_empty()));
        }
    }

    #[test]
    fn lowercases_with_optional_first_fragment() {
        let fragments = split("ShowWidget");
        assert_eq!(to_lowercase(&fragments, false), vec!["show", "widget"]);
        assert_eq!(to_lowercase(&fragments, true), vec!["Show", "widget"]);
    }

    #[test]
    fn empty_identifier_yields_no_fragments() {
        assert!(split("").is_empty());
        assert!(lowercase_words("").is_empty());
    }
}
