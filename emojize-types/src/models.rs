use serde::{Deserialize, Serialize};

/// Arguments handed to a command hook
///
/// `words` are the space separated tokens of the invocation, `word_eol[i]`
/// is the raw text from the start of `words[i]` to the end of the line.
/// `word_eol[0]` is always the full line as typed, including any leading
/// whitespace, so the default input hook sees exactly what the user wrote.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HookArgs {
    pub words: Vec<String>,
    pub word_eol: Vec<String>,
}

impl HookArgs {
    /// Split a raw line the way the host presents it to hooks
    pub fn from_line(line: &str) -> Self {
        let mut words = Vec::new();
        let mut word_eol = Vec::new();

        for (start, word) in split_words(line) {
            if words.is_empty() {
                word_eol.push(line.to_string());
            } else {
                word_eol.push(line[start..].to_string());
            }
            words.push(word.to_string());
        }

        Self { words, word_eol }
    }

    /// Command name, the first word
    pub fn name(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    /// Everything after the command name, if anything was given
    pub fn tail(&self) -> Option<&str> {
        self.word_eol.get(1).map(String::as_str)
    }

    /// The whole line
    pub fn line(&self) -> Option<&str> {
        self.word_eol.first().map(String::as_str)
    }
}

fn split_words(line: &str) -> impl Iterator<Item = (usize, &str)> {
    line.split(' ')
        .scan(0usize, |offset, word| {
            let start = *offset;
            *offset += word.len() + 1;
            Some((start, word))
        })
        .filter(|(_, word)| !word.is_empty())
}

/// A message before and after emojizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    pub original: String,
    pub transformed: String,
}

impl Rewrite {
    pub fn new(original: impl Into<String>, transformed: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            transformed: transformed.into(),
        }
    }

    /// Whether emojizing produced anything to send instead of the original
    pub fn changed(&self) -> bool {
        self.original != self.transformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_args_command_line() {
        let args = HookArgs::from_line("say hello  world");
        assert_eq!(args.words, vec!["say", "hello", "world"]);
        assert_eq!(args.name(), Some("say"));
        assert_eq!(args.tail(), Some("hello  world"));
        assert_eq!(args.word_eol[2], "world");
    }

    #[test]
    fn test_hook_args_keeps_full_line_in_first_tail() {
        let args = HookArgs::from_line("  hi there ");
        assert_eq!(args.line(), Some("  hi there "));
        assert_eq!(args.tail(), Some("there "));
    }

    #[test]
    fn test_hook_args_without_tail() {
        let args = HookArgs::from_line("me");
        assert_eq!(args.name(), Some("me"));
        assert_eq!(args.tail(), None);

        let trailing = HookArgs::from_line("me   ");
        assert_eq!(trailing.tail(), None);
    }

    #[test]
    fn test_hook_args_empty_line() {
        let args = HookArgs::from_line("");
        assert!(args.words.is_empty());
        assert_eq!(args.line(), None);
    }

    #[test]
    fn test_rewrite_changed() {
        assert!(!Rewrite::new("hi", "hi").changed());
        assert!(Rewrite::new("<3", "❤️").changed());
    }
}
