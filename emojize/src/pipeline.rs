use emojize_types::Rewrite;

use crate::emoji::{GemojiExpander, ShortcodeExpander};
use crate::emoticon::{AliasTable, EmoticonMatcher};
use crate::error::EmojizeResult;
use crate::logging::TARGET_REWRITES;

/// Normalizer followed by expander, the single entry point handlers call
pub struct Emojizer {
    /// `None` when emoticon conversion is switched off
    matcher: Option<EmoticonMatcher>,
    expander: Box<dyn ShortcodeExpander>,
}

impl Emojizer {
    pub fn new(matcher: Option<EmoticonMatcher>, expander: Box<dyn ShortcodeExpander>) -> Self {
        Self { matcher, expander }
    }

    /// Default alias table with gemoji expansion
    pub fn with_defaults() -> EmojizeResult<Self> {
        let matcher = EmoticonMatcher::new(AliasTable::default())?;
        Ok(Self::new(Some(matcher), Box::new(GemojiExpander)))
    }

    /// Shortcode expansion only, emoticons are left as typed
    pub fn shortcodes_only() -> Self {
        Self::new(None, Box::new(GemojiExpander))
    }

    pub fn converts_emoticons(&self) -> bool {
        self.matcher.is_some()
    }

    pub fn emojize(&self, message: &str) -> EmojizeResult<String> {
        match &self.matcher {
            Some(matcher) => {
                let normalized = matcher.normalize(message);
                self.expander.expand(&normalized)
            }
            None => self.expander.expand(message),
        }
    }

    pub fn rewrite(&self, message: &str) -> EmojizeResult<Rewrite> {
        let transformed = self.emojize(message)?;
        if transformed != message {
            log::debug!(target: TARGET_REWRITES, "Rewrote {:?} -> {:?}", message, transformed);
        }
        Ok(Rewrite::new(message, transformed))
    }
}

impl std::fmt::Debug for Emojizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emojizer")
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EmojizeError;
    use proptest::prelude::*;
    use std::sync::Mutex;

    static CAPTURED: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl log::Log for CaptureLogger {
        fn enabled(&self, _metadata: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if let Ok(mut captured) = CAPTURED.lock() {
                captured.push((record.target().to_string(), record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    struct FailingExpander;

    impl ShortcodeExpander for FailingExpander {
        fn expand(&self, _text: &str) -> EmojizeResult<String> {
            Err(EmojizeError::Expansion("table unavailable".to_string()))
        }
    }

    #[test]
    fn test_end_to_end_love_message() {
        let emojizer = Emojizer::with_defaults().unwrap();
        let matcher = EmoticonMatcher::new(AliasTable::default()).unwrap();
        assert_eq!(
            matcher.normalize("I love you <3 :D"),
            "I love you :heart: :smile:"
        );
        assert_eq!(
            emojizer.emojize("I love you <3 :D").unwrap(),
            "I love you ❤️ 😄"
        );
    }

    #[test]
    fn test_shortcodes_and_emoticons_expand_in_one_pass() {
        let emojizer = Emojizer::with_defaults().unwrap();
        assert_eq!(emojizer.emojize(":wink: ;)").unwrap(), "😉 😉");
    }

    #[test]
    fn test_emoticon_conversion_disabled() {
        let emojizer = Emojizer::shortcodes_only();
        assert!(!emojizer.converts_emoticons());
        assert_eq!(emojizer.emojize("hi :) :smile:").unwrap(), "hi :) 😄");
    }

    #[test]
    fn test_rewrite_reports_change() {
        let emojizer = Emojizer::with_defaults().unwrap();
        let unchanged = emojizer.rewrite("plain text").unwrap();
        assert!(!unchanged.changed());
        let changed = emojizer.rewrite("plain <3").unwrap();
        assert!(changed.changed());
        assert_eq!(changed.original, "plain <3");
        assert_eq!(changed.transformed, "plain ❤️");
    }

    #[test]
    fn test_rewrite_logs_under_rewrites_target() {
        log::set_boxed_logger(Box::new(CaptureLogger)).unwrap();
        log::set_max_level(log::LevelFilter::Trace);

        let emojizer = Emojizer::with_defaults().unwrap();
        emojizer.rewrite("logged <3 here").unwrap();

        let captured = CAPTURED.lock().unwrap();
        let rewrote: Vec<_> = captured
            .iter()
            .filter(|(_, message)| message.contains("logged <3 here"))
            .collect();
        assert!(!rewrote.is_empty());
        assert!(rewrote.iter().all(|(target, _)| target == TARGET_REWRITES));
    }

    #[test]
    fn test_expander_failure_propagates() {
        let emojizer = Emojizer::new(None, Box::new(FailingExpander));
        assert!(matches!(
            emojizer.emojize("hi"),
            Err(EmojizeError::Expansion(_))
        ));
    }

    fn message_strategy() -> impl Strategy<Value = String> {
        let token = prop_oneof![
            "[a-zA-Z0-9]{1,8}",
            prop::sample::select(
                crate::emoticon::DEFAULT_ALIASES
                    .iter()
                    .map(|(k, _)| k.to_string())
                    .collect::<Vec<_>>()
            ),
            Just(":smile:".to_string()),
            Just(":not_an_emoji:".to_string()),
            Just(":".to_string()),
        ];
        prop::collection::vec((token, prop_oneof![Just(" "), Just(""), Just("\t")]), 0..12)
            .prop_map(|parts| parts.into_iter().map(|(t, sep)| format!("{}{}", t, sep)).collect::<String>())
    }

    proptest! {
        #[test]
        fn prop_emojize_is_a_fixed_point(message in message_strategy()) {
            let emojizer = Emojizer::with_defaults().unwrap();
            let once = emojizer.emojize(&message).unwrap();
            let twice = emojizer.emojize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_plain_words_pass_through(message in "[a-zA-Z0-9 ,.!?]{0,64}") {
            let emojizer = Emojizer::with_defaults().unwrap();
            prop_assert_eq!(emojizer.emojize(&message).unwrap(), message);
        }
    }
}
