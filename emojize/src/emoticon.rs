//! Emoticon to shortcode normalization, `:)` becomes `:slightly_smiling_face:`
//!
//! An emoticon only counts when it is a whole token: preceded by the start
//! of the message or whitespace, and followed by whitespace or the end of the
//! message. `hello:)` and `:)hello` are left alone. When several aliases
//! match at the same position the longest one wins, so `:-)` is never read as
//! `:` followed by something else.

use std::collections::BTreeMap;

use regex::Regex;

use crate::emoji::is_shortcode;
use crate::error::{EmojizeError, EmojizeResult};

/// Slack style emoticon aliases
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("<3", ":heart:"),
    ("</3", ":broken_heart:"),
    ("8)", ":sunglasses:"),
    ("8-)", ":sunglasses:"),
    ("D:", ":anguished:"),
    (":'(", ":cry:"),
    (":o)", ":monkey_face:"),
    (":*", ":kissing_heart:"),
    (":-*", ":kissing_heart:"),
    ("=)", ":smiley:"),
    ("=-)", ":smiley:"),
    (":D", ":smile:"),
    (":-D", ":smile:"),
    (";)", ":wink:"),
    (";-)", ":wink:"),
    (":>", ":laughing:"),
    (":->", ":laughing:"),
    (":|", ":neutral_face:"),
    (":-|", ":neutral_face:"),
    (":o", ":open_mouth:"),
    (":-o", ":open_mouth:"),
    (">:(", ":angry:"),
    (">:-(", ":angry:"),
    (":)", ":slightly_smiling_face:"),
    ("(:", ":slightly_smiling_face:"),
    (":-)", ":slightly_smiling_face:"),
    (":(", ":disappointed:"),
    ("):", ":disappointed:"),
    (":-(", ":disappointed:"),
    (":-/", ":confused:"),
    (":\\", ":confused:"),
    (":-\\", ":confused:"),
    (":P", ":stuck_out_tongue:"),
    (":p", ":stuck_out_tongue:"),
    (":-p", ":stuck_out_tongue:"),
    (":b", ":stuck_out_tongue:"),
    (":-b", ":stuck_out_tongue:"),
    (";P", ":stuck_out_tongue_winking_eye:"),
    (";p", ":stuck_out_tongue_winking_eye:"),
    (";-p", ":stuck_out_tongue_winking_eye:"),
    (";b", ":stuck_out_tongue_winking_eye:"),
    (";-b", ":stuck_out_tongue_winking_eye:"),
];

/// Emoticon → shortcode mapping, keys are matched literally and case-sensitively
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, String>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Add or replace entries
    pub fn extend<I, K, V>(&mut self, pairs: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.aliases
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    pub fn get(&self, emoticon: &str) -> Option<&str> {
        self.aliases.get(emoticon).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn validate(&self) -> EmojizeResult<()> {
        for (emoticon, shortcode) in self.iter() {
            let reason = if emoticon.is_empty() {
                "emoticon is empty"
            } else if emoticon.chars().any(char::is_whitespace) {
                "emoticon contains whitespace and can never be a whole token"
            } else if emojis::get(emoticon).is_some() {
                "emoticon is already an emoji"
            } else if !is_shortcode(shortcode) {
                "shortcode must look like :name:"
            } else if self.aliases.contains_key(shortcode) {
                "shortcode is itself an emoticon and would be rewritten again"
            } else {
                continue;
            };
            return Err(EmojizeError::InvalidAlias {
                alias: emoticon.to_string(),
                reason: reason.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_ALIASES.iter().copied())
    }
}

/// Compiled form of an [`AliasTable`], built once and read-only afterwards
#[derive(Debug, Clone)]
pub struct EmoticonMatcher {
    aliases: AliasTable,
    /// `None` for an empty table, nothing can match
    pattern: Option<Regex>,
}

impl EmoticonMatcher {
    pub fn new(aliases: AliasTable) -> EmojizeResult<Self> {
        aliases.validate()?;

        if aliases.is_empty() {
            return Ok(Self {
                aliases,
                pattern: None,
            });
        }

        // Alternation is leftmost-first, so longer aliases go first
        let mut emoticons: Vec<&str> = aliases.iter().map(|(k, _)| k).collect();
        emoticons.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        let alternation = emoticons
            .iter()
            .map(|e| regex::escape(e))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\A(?:{})", alternation))?;

        log::debug!(
            "Compiled emoticon matcher with {} aliases",
            aliases.len()
        );

        Ok(Self {
            aliases,
            pattern: Some(pattern),
        })
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Replace every whole-token emoticon in `message` with its shortcode
    pub fn normalize(&self, message: &str) -> String {
        let Some(pattern) = &self.pattern else {
            return message.to_string();
        };

        let mut result = String::with_capacity(message.len());
        let mut copied = 0;
        let mut at_boundary = true;

        for (idx, ch) in message.char_indices() {
            if idx < copied {
                continue;
            }

            if at_boundary {
                if let Some(found) = pattern.find(&message[idx..]) {
                    let end = idx + found.end();
                    let closes_token = message[end..]
                        .chars()
                        .next()
                        .map_or(true, char::is_whitespace);

                    let shortcode = self.aliases.get(found.as_str());
                    if let Some(shortcode) = shortcode.filter(|_| closes_token) {
                        result.push_str(&message[copied..idx]);
                        result.push_str(shortcode);
                        copied = end;
                        at_boundary = false;
                        continue;
                    }
                }
            }

            at_boundary = ch.is_whitespace();
        }

        result.push_str(&message[copied..]);
        result
    }
}
