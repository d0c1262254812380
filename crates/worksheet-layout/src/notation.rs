//! Local reformatting of simple math notation in problem text
//!
//! Problems arrive as plain text such as `3/4 + 1/2 =` or `x^2 * 3`. The
//! drawing backend gets a glyph-level rewrite; the typesetting backend gets
//! TeX with math mode for fractions, exponents and operators.

use regex::{Captures, Regex};
use std::sync::LazyLock;

static EXPONENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\^(\d+)").unwrap());

static MATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<num>\d+)/(?P<den>\d+)|(?P<base>[A-Za-z0-9]+)\^(?P<exp>\d+|[A-Za-z])|(?P<sym>[×÷≤≥*])",
    )
    .unwrap()
});

/// Plain-text rendering for builtin PDF fonts
///
/// Only exponents made of 1, 2 and 3 have superscript glyphs in the
/// standard encoding; anything else keeps the caret.
pub fn to_plain(text: &str) -> String {
    let text = text.replace('*', "\u{00D7}");
    EXPONENT
        .replace_all(&text, |caps: &Captures| {
            let digits = &caps[1];
            let superscript: Option<String> = digits
                .chars()
                .map(|c| match c {
                    '1' => Some('\u{00B9}'),
                    '2' => Some('\u{00B2}'),
                    '3' => Some('\u{00B3}'),
                    _ => None,
                })
                .collect();
            superscript.unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// TeX rendering with math mode for recognised notation
pub fn to_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;

    for caps in MATH_TOKEN.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&escape_latex(&text[last..whole.start()]));
        last = whole.end();

        if let (Some(num), Some(den)) = (caps.name("num"), caps.name("den")) {
            out.push_str(&format!("$\\frac{{{}}}{{{}}}$", num.as_str(), den.as_str()));
        } else if let (Some(base), Some(exp)) = (caps.name("base"), caps.name("exp")) {
            out.push_str(&format!("${}^{{{}}}$", base.as_str(), exp.as_str()));
        } else if let Some(sym) = caps.name("sym") {
            out.push_str(match sym.as_str() {
                "÷" => "$\\div$",
                "≤" => "$\\leq$",
                "≥" => "$\\geq$",
                _ => "$\\times$",
            });
        }
    }
    out.push_str(&escape_latex(&text[last..]));
    out
}

/// Escape TeX special characters in running text
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '&' | '%' | '$' | '#' | '_' => {
                out.push('\\');
                out.push(ch);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_operators_and_exponents() {
        assert_eq!(to_plain("3 * 4"), "3 × 4");
        assert_eq!(to_plain("x^2 + y^3"), "x² + y³");
        assert_eq!(to_plain("2^10"), "2^10");
    }

    #[test]
    fn test_plain_keeps_fractions() {
        assert_eq!(to_plain("3/4 + 1/2 ="), "3/4 + 1/2 =");
    }

    #[test]
    fn test_latex_fractions_and_exponents() {
        assert_eq!(to_latex("3/4 + 1/2 ="), "$\\frac{3}{4}$ + $\\frac{1}{2}$ =");
        assert_eq!(to_latex("x^2 = 9"), "$x^{2}$ = 9");
    }

    #[test]
    fn test_latex_symbols() {
        assert_eq!(to_latex("6 ÷ 2"), "6 $\\div$ 2");
        assert_eq!(to_latex("3 × 4"), "3 $\\times$ 4");
        assert_eq!(to_latex("a ≤ b"), "a $\\leq$ b");
    }

    #[test]
    fn test_latex_escapes_specials() {
        assert_eq!(to_latex("50% of $10"), "50\\% of \\$10");
        assert_eq!(escape_latex("a_b {c}"), "a\\_b \\{c\\}");
        assert_eq!(escape_latex("\\"), "\\textbackslash{}");
    }
}
