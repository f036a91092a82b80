//! Shortcode expansion: `:smile:` becomes 😄

use crate::error::EmojizeResult;

/// Longest shortcode name the scanner will consider
pub const MAX_SHORTCODE_LEN: usize = 64;

/// Turns `:name:` shortcodes into Unicode emoji
///
/// Implementations must leave unknown shortcodes and everything around them
/// untouched, and must never return a string that expands further.
pub trait ShortcodeExpander {
    fn expand(&self, text: &str) -> EmojizeResult<String>;
}

/// Expander backed by the gemoji table shipped with the `emojis` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct GemojiExpander;

impl ShortcodeExpander for GemojiExpander {
    fn expand(&self, text: &str) -> EmojizeResult<String> {
        Ok(parse_emoji_shortcodes(text))
    }
}

fn is_shortcode_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '+' | '-')
}

/// Whether `text` is a single `:name:` token the scanner would consider
pub fn is_shortcode(text: &str) -> bool {
    text.strip_prefix(':')
        .and_then(|rest| rest.strip_suffix(':'))
        .is_some_and(|name| {
            !name.is_empty() && name.len() <= MAX_SHORTCODE_LEN && name.chars().all(is_shortcode_char)
        })
}

/// Parse emoji shortcodes (e.g., :smile:) and replace them with actual emojis
pub fn parse_emoji_shortcodes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != ':' {
            result.push(ch);
            continue;
        }

        let mut shortcode = String::new();
        let mut closed = false;

        while let Some(&next_ch) = chars.peek() {
            if next_ch == ':' {
                closed = true;
                break;
            }
            if !is_shortcode_char(next_ch) || shortcode.len() >= MAX_SHORTCODE_LEN {
                break;
            }
            shortcode.push(next_ch);
            chars.next();
        }

        match emojis::get_by_shortcode(&shortcode) {
            Some(emoji) if closed && !shortcode.is_empty() => {
                chars.next(); // closing colon
                result.push_str(emoji.as_str());
            }
            // The closing colon stays unread so it can open the next shortcode
            _ => {
                result.push(':');
                result.push_str(&shortcode);
            }
        }
    }

    result
}
