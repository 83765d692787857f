// Heading level normalization on raw markup.
//
// Authors often start a page at <h2> or <h3> because the default <h1> looks
// too big. LaTeX only has three numbered section levels, so we shift the
// headings until the shallowest one present becomes <h1>.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref HEADING_TAG: Regex = Regex::new(r"(?i)<(/?)h([1-6])").unwrap();
}

/// Lowest heading level (1..=6) whose opening tag occurs in `input`.
pub fn top_level(input: &str) -> Option<u8> {
    let lower = input.to_ascii_lowercase();
    (1..=6u8).find(|i| lower.contains(&format!("<h{i}")))
}

/// Shift headings so the shallowest one present becomes level 1.
pub fn normalize_headings(input: &str) -> String {
    fix_headings(input, 0)
}

/// Like [`normalize_headings`], with `shift` extra levels added to every
/// heading. Levels pushed past 6 are turned into `<strong>`.
pub fn fix_headings(input: &str, shift: u8) -> String {
    let top = top_level(input).unwrap_or(1);
    if top == 1 && shift == 0 {
        return input.to_string();
    }

    HEADING_TAG
        .replace_all(input, |caps: &Captures| {
            let slash = &caps[1];
            let level: u8 = caps[2].parse().unwrap_or(1);
            if level < top {
                return caps[0].to_string();
            }
            let new_level = u16::from(level - top) + 1 + u16::from(shift);
            log::debug!("replacing h{level} with h{new_level}");
            if new_level > 6 {
                format!("<{slash}strong")
            } else {
                format!("<{slash}h{new_level}")
            }
        })
        .into_owned()
}
