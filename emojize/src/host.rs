//! Host side of the plugin: hook registration and an in-memory console host
//!
//! The filter never talks to a network. It registers command hooks with a
//! [`PluginHost`] and submits command lines through a [`CommandSink`]; the
//! host decides what actually gets sent. [`ConsoleHost`] is a small
//! HexChat-like host that records what would have been sent, used by the
//! binary and the integration tests.

use std::rc::Rc;

use emojize_types::{Disposition, HookArgs};
use serde::Serialize;

use crate::error::{EmojizeError, EmojizeResult};
use crate::logging::TARGET_DISPATCH;

/// Name of the hook that receives plain input lines
pub const DEFAULT_INPUT_HOOK: &str = "";

/// Nested command depth at which the console host gives up
pub const MAX_COMMAND_DEPTH: usize = 8;

/// Somewhere to submit command lines, e.g. `say hello`
pub trait CommandSink {
    fn command(&mut self, line: &str);
}

pub type HookCallback = Box<dyn Fn(&HookArgs, &mut dyn CommandSink) -> EmojizeResult<Disposition>>;

pub type UnloadCallback = Box<dyn FnOnce()>;

/// Hook registration capability of a chat client
pub trait PluginHost {
    /// Hook `name` (case-insensitive). `""` hooks plain input lines.
    fn hook_command(&mut self, name: &str, help: Option<&str>, callback: HookCallback);

    fn hook_unload(&mut self, callback: UnloadCallback);
}

/// Something the console host would have sent or shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Outgoing {
    Message(String),
    Action(String),
    Help(String),
    UnknownCommand(String),
}

impl std::fmt::Display for Outgoing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outgoing::Message(text) => write!(f, "<me> {}", text),
            Outgoing::Action(text) => write!(f, "* me {}", text),
            Outgoing::Help(text) => write!(f, "{}", text),
            Outgoing::UnknownCommand(name) => write!(f, "Unknown command {}. Try /help", name),
        }
    }
}

struct CommandHook {
    name: String,
    help: Option<String>,
    callback: HookCallback,
}

/// Collects lines a hook submits so the host can run them once the hook returns
#[derive(Debug, Default)]
struct CommandQueue {
    lines: Vec<String>,
}

impl CommandSink for CommandQueue {
    fn command(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// In-memory chat client
#[derive(Default)]
pub struct ConsoleHost {
    hooks: Vec<Rc<CommandHook>>,
    unload_hooks: Vec<UnloadCallback>,
    pending: Vec<Outgoing>,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of hooked commands in registration order, uppercase
    pub fn hooked_commands(&self) -> Vec<&str> {
        self.hooks.iter().map(|hook| hook.name.as_str()).collect()
    }

    /// Handle a line typed into the input box
    ///
    /// `/cmd args` runs a command, `//text` sends `/text` literally and
    /// anything else is plain input. Nothing is returned for a line whose
    /// processing failed.
    pub fn input(&mut self, line: &str) -> EmojizeResult<Vec<Outgoing>> {
        let result = if let Some(literal) = line.strip_prefix("//") {
            let text = format!("/{}", literal);
            self.dispatch(DEFAULT_INPUT_HOOK, &HookArgs::from_line(&text), 0)
        } else if let Some(command) = line.strip_prefix('/') {
            self.run_command(command, 0)
        } else {
            self.dispatch(DEFAULT_INPUT_HOOK, &HookArgs::from_line(line), 0)
        };
        self.finish(result)
    }

    /// Execute a command line such as `say hi`
    pub fn command(&mut self, line: &str) -> EmojizeResult<Vec<Outgoing>> {
        let result = self.run_command(line, 0);
        self.finish(result)
    }

    /// Run every unload hook once
    pub fn unload(&mut self) {
        for callback in self.unload_hooks.drain(..) {
            callback();
        }
    }

    fn finish(&mut self, result: EmojizeResult<()>) -> EmojizeResult<Vec<Outgoing>> {
        let produced = std::mem::take(&mut self.pending);
        result.map(|()| produced)
    }

    fn run_command(&mut self, line: &str, depth: usize) -> EmojizeResult<()> {
        let args = HookArgs::from_line(line);
        let Some(name) = args.name().map(str::to_uppercase) else {
            return Ok(());
        };
        self.dispatch(&name, &args, depth)
    }

    fn dispatch(&mut self, name: &str, args: &HookArgs, depth: usize) -> EmojizeResult<()> {
        if depth >= MAX_COMMAND_DEPTH {
            log::warn!(target: TARGET_DISPATCH, "Dropping {:?}, nested too deep", args.line());
            return Err(EmojizeError::RecursionLimit(MAX_COMMAND_DEPTH));
        }

        let hooks: Vec<Rc<CommandHook>> = self
            .hooks
            .iter()
            .filter(|hook| hook.name == name)
            .cloned()
            .collect();

        let mut disposition = Disposition::NotHandled;
        for hook in hooks {
            let mut queue = CommandQueue::default();
            let result = (hook.callback)(args, &mut queue)?;
            log::debug!(
                target: TARGET_DISPATCH,
                "Hook {:?} returned {} with {} queued commands",
                name,
                result.as_str(),
                queue.lines.len()
            );

            for line in &queue.lines {
                self.run_command(line, depth + 1)?;
            }

            if result.suppresses_default() {
                disposition = result;
            }
            if result.stops_hooks() {
                break;
            }
        }

        if !disposition.suppresses_default() {
            self.builtin(name, args);
        }
        Ok(())
    }

    fn builtin(&mut self, name: &str, args: &HookArgs) {
        let record = match name {
            DEFAULT_INPUT_HOOK => args.line().map(|line| Outgoing::Message(line.to_string())),
            "SAY" => args.tail().map(|text| Outgoing::Message(text.to_string())),
            "ME" => args.tail().map(|text| Outgoing::Action(text.to_string())),
            "HELP" => Some(Outgoing::Help(self.help_for(args.words.get(1).map(String::as_str)))),
            other => Some(Outgoing::UnknownCommand(other.to_string())),
        };
        if let Some(record) = record {
            self.pending.push(record);
        }
    }

    fn help_for(&self, topic: Option<&str>) -> String {
        let Some(topic) = topic.map(str::to_uppercase) else {
            return "Commands: SAY ME HELP".to_string();
        };

        let hooked = self
            .hooks
            .iter()
            .find(|hook| hook.name == topic)
            .and_then(|hook| hook.help.clone());

        match (hooked, topic.as_str()) {
            (Some(help), _) => help,
            (None, "SAY") => "Usage: SAY <text>, sends text to the current window".to_string(),
            (None, "ME") => "Usage: ME <action>, sends an action to the current window".to_string(),
            (None, _) => format!("No help available on that command: {}", topic),
        }
    }
}

impl PluginHost for ConsoleHost {
    fn hook_command(&mut self, name: &str, help: Option<&str>, callback: HookCallback) {
        log::debug!(target: TARGET_DISPATCH, "Hooking command {:?}", name);
        self.hooks.push(Rc::new(CommandHook {
            name: name.to_uppercase(),
            help: help.map(str::to_string),
            callback,
        }));
    }

    fn hook_unload(&mut self, callback: UnloadCallback) {
        self.unload_hooks.push(callback);
    }
}
