// LaTeX escaping of text runs.
//
// The rules are plain regex substitutions applied in a fixed order; later
// rules see the output of earlier ones, so the order below is load-bearing.

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

struct Rule {
    name: &'static str,
    pattern: Regex,
    replacement: &'static str,
}

fn rule(name: &'static str, pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        name,
        pattern: Regex::new(pattern).unwrap(),
        replacement,
    }
}

lazy_static! {
    static ref RULES: Vec<Rule> = vec![
        rule("punctuation", r"([&$%#_{}])", r"\${1}"),
        // A backslash that does not introduce one of the escapes above.
        rule("backslash", r"\\([^_&%#$\{\}])", r"$$\backslash$$${1}"),
        rule("circumflex", r"\^", r"\^{}^"),
        rule("quotes", r#""(.*?)""#, r"``${1}''"),
        rule("rarrow", r"-+?>", r"$$\rightarrow$$"),
        // Same pattern as rarrow, so it never matches anything left over.
        rule("larrow", r"-+?>", r"$$\leftarrow$$"),
        rule("Rarrow", r"=+?>", r"$$\Rightarrow$$"),
        rule("Larrow", r"=+?>", r"$$\Leftarrow$$"),
        // Must come after the arrows.
        rule("math_in_text", r"([<>])", r"$$${1}$$"),
    ];
}

/// Replace special characters by their LaTeX escapes.
///
/// Empty and whitespace-only input yields an empty string.
pub fn latex_escape(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut out = text.to_string();
    let mut changed = false;
    for r in RULES.iter() {
        if let Cow::Owned(s) = r.pattern.replace_all(&out, r.replacement) {
            log::trace!("escape rule {} applied", r.name);
            out = s;
            changed = true;
        }
    }
    if changed {
        log::debug!("escaped {:?} -> {:?}", text, out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(latex_escape(""), "");
        assert_eq!(latex_escape("   "), "");
        assert_eq!(latex_escape("\n\t "), "");
    }

    #[test]
    fn reserved_characters_get_a_backslash() {
        assert_eq!(latex_escape("50% & 10_2"), r"50\% \& 10\_2");
        assert_eq!(latex_escape("{#x $y}"), r"\{\#x \$y\}");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(latex_escape("Hello, world."), "Hello, world.");
        assert_eq!(latex_escape("  padded  "), "  padded  ");
    }

    #[test]
    fn literal_backslash_becomes_math_symbol() {
        assert_eq!(latex_escape(r"C:\dir"), r"C:$\backslash$dir");
        // The escape markers inserted by the first rule survive.
        assert_eq!(latex_escape("a_b"), r"a\_b");
    }

    #[test]
    fn circumflex_is_anchored() {
        assert_eq!(latex_escape("x^2"), r"x\^{}^2");
    }

    #[test]
    fn straight_quotes_become_typographic() {
        assert_eq!(
            latex_escape(r#"say "hi" and "bye""#),
            "say ``hi'' and ``bye''"
        );
        // Unbalanced quote is left alone.
        assert_eq!(latex_escape(r#"5" long"#), r#"5" long"#);
    }

    #[test]
    fn arrows() {
        assert_eq!(latex_escape("a --> b"), r"a $\rightarrow$ b");
        assert_eq!(latex_escape("a -> b"), r"a $\rightarrow$ b");
        assert_eq!(latex_escape("a ==> b"), r"a $\Rightarrow$ b");
    }

    #[test]
    fn left_arrows_fall_through_to_math_mode() {
        assert_eq!(latex_escape("a <-- b"), "a $<$-- b");
        assert_eq!(latex_escape("a <== b"), "a $<$== b");
    }

    #[test]
    fn angle_brackets_in_math_mode() {
        assert_eq!(latex_escape("a < b > c"), "a $<$ b $>$ c");
    }
}
