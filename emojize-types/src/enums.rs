use serde::{Deserialize, Deserializer, Serialize};

/// What a command hook tells the host about the event it just saw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// Let the host run its own handling of the command
    #[default]
    NotHandled,
    /// Suppress the host's built-in handling, other hooks still run
    Handled,
    /// Suppress the host's built-in handling and every hook after this one
    HandledStop,
}

impl Disposition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Disposition::NotHandled => "not_handled",
            Disposition::Handled => "handled",
            Disposition::HandledStop => "handled_stop",
        }
    }

    /// True when the host must not run its built-in handler
    pub fn suppresses_default(&self) -> bool {
        !matches!(self, Disposition::NotHandled)
    }

    /// True when no further hooks may see the event
    pub fn stops_hooks(&self) -> bool {
        matches!(self, Disposition::HandledStop)
    }
}

/// Outgoing chat action a rewritten message is re-issued through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Plain channel message
    #[default]
    Say,
    /// CTCP ACTION, `/me waves`
    Me,
}

impl Action {
    /// Command name as typed by the user, without the slash
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Say => "say",
            Action::Me => "me",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "say" => Some(Action::Say),
            "me" => Some(Action::Me),
            _ => None,
        }
    }

    /// Build the command line that performs this action with `text`
    pub fn command_line(&self, text: &str) -> String {
        format!("{} {}", self.as_str(), text)
    }
}

/// Accepts the same spellings as [`Action::parse`]
impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Action::parse(&s).ok_or_else(|| serde::de::Error::unknown_variant(&s, &["say", "me"]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_is_case_insensitive() {
        assert_eq!(Action::parse("say"), Some(Action::Say));
        assert_eq!(Action::parse("ME"), Some(Action::Me));
        assert_eq!(Action::parse("em"), None);
    }

    #[test]
    fn test_action_command_line() {
        assert_eq!(Action::Say.command_line("hi ❤️"), "say hi ❤️");
        assert_eq!(Action::Me.command_line("waves"), "me waves");
    }

    #[test]
    fn test_disposition_flags() {
        assert!(!Disposition::NotHandled.suppresses_default());
        assert!(Disposition::Handled.suppresses_default());
        assert!(!Disposition::Handled.stops_hooks());
        assert!(Disposition::HandledStop.stops_hooks());
    }

    #[test]
    fn test_action_serde_lowercase() {
        let json = serde_json::to_string(&Action::Me).unwrap();
        assert_eq!(json, "\"me\"");
        let parsed: Action = serde_json::from_str("\"say\"").unwrap();
        assert_eq!(parsed, Action::Say);
    }

    #[test]
    fn test_action_deserialize_matches_parse() {
        let parsed: Action = serde_json::from_str("\"SAY\"").unwrap();
        assert_eq!(parsed, Action::Say);
        let parsed: Action = serde_json::from_str("\"Me\"").unwrap();
        assert_eq!(parsed, Action::Me);
        assert!(serde_json::from_str::<Action>("\"em\"").is_err());
    }
}
