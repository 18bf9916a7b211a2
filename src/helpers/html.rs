//! HTML helper functions

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref ENTITY: Regex =
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|amp|lt|gt|quot|apos|nbsp);").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

/// Decode the named and numeric character references found in rendered markup
///
/// Unknown references are left as they are.
pub fn decode_entities(s: &str) -> String {
    ENTITY
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => {
                    let hex = entity
                        .strip_prefix("#x")
                        .or_else(|| entity.strip_prefix("#X"));
                    let code = match hex {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => entity[1..].parse().ok(),
                    };
                    code.and_then(char::from_u32)
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Plain-text summary of rendered HTML, cut at a word boundary
///
/// The result is unescaped text; escape it again before putting it in markup.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = decode_entities(&strip_html(html));

    let mut result = String::new();
    for word in text.split_whitespace() {
        let extra = if result.is_empty() { 0 } else { 1 };
        if result.chars().count() + extra + word.chars().count() > max_chars {
            if result.is_empty() {
                result.extend(word.chars().take(max_chars));
            }
            result.push_str("...");
            break;
        }
        if extra == 1 {
            result.push(' ');
        }
        result.push_str(word);
    }
    result
}
