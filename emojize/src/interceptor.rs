//! Outgoing command interception
//!
//! Each handler takes the message body out of its command, emojizes it and
//! either lets the original command through untouched (nothing changed) or
//! submits the rewritten text as a new command and eats the original so the
//! message is not sent twice. Re-issued `say` lines come back through the
//! `SAY` hook, where the already emojized text is left alone.

use std::rc::Rc;

use emojize_types::{Action, Disposition, HookArgs};

use crate::error::EmojizeResult;
use crate::host::{CommandSink, PluginHost, DEFAULT_INPUT_HOOK};
use crate::logging::TARGET_REWRITES;
use crate::pipeline::Emojizer;

pub const EM_COMMAND: &str = "EM";
pub const EM_HELP: &str = "Usage: EM <text>, converts emoji alias into unicode encoded text";

/// Command line shown when a handler is invoked without text
const HELP_COMMAND: &str = "help em";

/// Which commands get intercepted and where `/em` sends its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterceptorConfig {
    /// Rewrite plain input lines and `/say`
    pub override_say: bool,
    /// Rewrite `/me`
    pub override_me: bool,
    /// Action `/em` re-issues its text through
    pub em_target: Action,
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            override_say: true,
            override_me: true,
            em_target: Action::Say,
        }
    }
}

#[derive(Debug)]
pub struct Interceptor {
    emojizer: Emojizer,
    config: InterceptorConfig,
}

impl Interceptor {
    pub fn new(emojizer: Emojizer, config: InterceptorConfig) -> Self {
        Self { emojizer, config }
    }

    /// Plain input line, the whole line is the message
    pub fn on_input(&self, args: &HookArgs, sink: &mut dyn CommandSink) -> EmojizeResult<Disposition> {
        match args.line() {
            Some(text) => self.rewrite_through(text, Action::Say, sink),
            None => Ok(Disposition::NotHandled),
        }
    }

    /// `/say <text>`
    pub fn on_say(&self, args: &HookArgs, sink: &mut dyn CommandSink) -> EmojizeResult<Disposition> {
        match args.tail() {
            Some(text) => self.rewrite_through(text, Action::Say, sink),
            None => Ok(show_help(sink)),
        }
    }

    /// `/me <action>`
    pub fn on_me(&self, args: &HookArgs, sink: &mut dyn CommandSink) -> EmojizeResult<Disposition> {
        match args.tail() {
            Some(text) => self.rewrite_through(text, Action::Me, sink),
            None => Ok(show_help(sink)),
        }
    }

    /// `/em <text>`, always re-issued even when nothing was converted
    pub fn on_em(&self, args: &HookArgs, sink: &mut dyn CommandSink) -> EmojizeResult<Disposition> {
        let Some(text) = args.tail() else {
            return Ok(show_help(sink));
        };

        let emojized = self.emojizer.emojize(text)?;
        log::debug!(
            target: TARGET_REWRITES,
            "EM re-issuing through {}: {:?}",
            self.config.em_target.as_str(),
            emojized
        );
        sink.command(&self.config.em_target.command_line(&emojized));
        Ok(Disposition::Handled)
    }

    fn rewrite_through(
        &self,
        text: &str,
        action: Action,
        sink: &mut dyn CommandSink,
    ) -> EmojizeResult<Disposition> {
        let rewrite = self.emojizer.rewrite(text)?;
        if !rewrite.changed() {
            return Ok(Disposition::NotHandled);
        }

        log::debug!(
            target: TARGET_REWRITES,
            "Re-issuing through {}: {:?} -> {:?}",
            action.as_str(),
            rewrite.original,
            rewrite.transformed
        );
        sink.command(&action.command_line(&rewrite.transformed));
        Ok(Disposition::Handled)
    }

    /// Hook the configured commands on `host`
    pub fn register(self, host: &mut dyn PluginHost) {
        let interceptor = Rc::new(self);

        if interceptor.config.override_say {
            let on_input = interceptor.clone();
            host.hook_command(
                DEFAULT_INPUT_HOOK,
                None,
                Box::new(move |args, sink| on_input.on_input(args, sink)),
            );
            let on_say = interceptor.clone();
            host.hook_command("SAY", None, Box::new(move |args, sink| on_say.on_say(args, sink)));
        }

        if interceptor.config.override_me {
            let on_me = interceptor.clone();
            host.hook_command("ME", None, Box::new(move |args, sink| on_me.on_me(args, sink)));
        }

        let on_em = interceptor;
        host.hook_command(
            EM_COMMAND,
            Some(EM_HELP),
            Box::new(move |args, sink| on_em.on_em(args, sink)),
        );
    }
}

fn show_help(sink: &mut dyn CommandSink) -> Disposition {
    sink.command(HELP_COMMAND);
    Disposition::HandledStop
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        lines: Vec<String>,
    }

    impl CommandSink for RecordingSink {
        fn command(&mut self, line: &str) {
            self.lines.push(line.to_string());
        }
    }

    fn interceptor(em_target: Action) -> Interceptor {
        Interceptor::new(
            Emojizer::with_defaults().unwrap(),
            InterceptorConfig {
                em_target,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_input_without_emoji_passes_through() {
        let mut sink = RecordingSink::default();
        let result = interceptor(Action::Say)
            .on_input(&HookArgs::from_line("just words"), &mut sink)
            .unwrap();
        assert_eq!(result, Disposition::NotHandled);
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn test_input_with_emoticons_is_reissued() {
        let mut sink = RecordingSink::default();
        let result = interceptor(Action::Say)
            .on_input(&HookArgs::from_line("I love you <3 :D"), &mut sink)
            .unwrap();
        assert_eq!(result, Disposition::Handled);
        assert_eq!(sink.lines, vec!["say I love you ❤️ 😄"]);
    }

    #[test]
    fn test_empty_input_is_not_handled() {
        let mut sink = RecordingSink::default();
        let result = interceptor(Action::Say)
            .on_input(&HookArgs::from_line(""), &mut sink)
            .unwrap();
        assert_eq!(result, Disposition::NotHandled);
        assert!(sink.lines.is_empty());
    }

    #[test]
    fn test_say_reissues_only_on_change() {
        let interceptor = interceptor(Action::Say);
        let mut sink = RecordingSink::default();
        assert_eq!(
            interceptor.on_say(&HookArgs::from_line("say hi :)"), &mut sink).unwrap(),
            Disposition::Handled
        );
        assert_eq!(
            interceptor.on_say(&HookArgs::from_line("say hi 🙂"), &mut sink).unwrap(),
            Disposition::NotHandled
        );
        assert_eq!(sink.lines, vec!["say hi 🙂"]);
    }

    #[test]
    fn test_me_reissues_as_action() {
        let mut sink = RecordingSink::default();
        let result = interceptor(Action::Say)
            .on_me(&HookArgs::from_line("me hugs :heart:"), &mut sink)
            .unwrap();
        assert_eq!(result, Disposition::Handled);
        assert_eq!(sink.lines, vec!["me hugs ❤️"]);
    }

    #[test]
    fn test_missing_text_shows_help_once() {
        let interceptor = interceptor(Action::Say);
        for line in ["say", "me", "em"] {
            let args = HookArgs::from_line(line);
            let mut sink = RecordingSink::default();
            let result = match line {
                "say" => interceptor.on_say(&args, &mut sink),
                "me" => interceptor.on_me(&args, &mut sink),
                _ => interceptor.on_em(&args, &mut sink),
            }
            .unwrap();
            assert_eq!(result, Disposition::HandledStop, "{}", line);
            assert_eq!(sink.lines, vec![HELP_COMMAND], "{}", line);
        }
    }

    #[test]
    fn test_em_always_reissues() {
        let mut sink = RecordingSink::default();
        let result = interceptor(Action::Say)
            .on_em(&HookArgs::from_line("em nothing to convert"), &mut sink)
            .unwrap();
        assert_eq!(result, Disposition::Handled);
        assert_eq!(sink.lines, vec!["say nothing to convert"]);
    }

    #[test]
    fn test_em_uses_configured_target() {
        let mut sink = RecordingSink::default();
        interceptor(Action::Me)
            .on_em(&HookArgs::from_line("em dances :tada:"), &mut sink)
            .unwrap();
        assert_eq!(sink.lines, vec!["me dances 🎉"]);
    }
}
