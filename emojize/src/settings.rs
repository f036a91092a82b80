use config::{Config, File};
use emojize_types::Action;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::emoji::GemojiExpander;
use crate::emoticon::{AliasTable, EmoticonMatcher};
use crate::error::EmojizeResult;
use crate::interceptor::InterceptorConfig;
use crate::pipeline::Emojizer;

pub const SETTINGS_FILE_NAME: &str = "emojize.toml";

/// One emoticon → shortcode entry, `{ emoticon = ":D", shortcode = ":smile:" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasEntry {
    pub emoticon: String,
    pub shortcode: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Rewrite plain input and `/say`
    pub override_say: bool,
    /// Rewrite `/me`
    pub override_me: bool,
    /// Where `/em` sends its result
    pub em_target: Action,
    /// Convert emoticons before expanding shortcodes
    pub emoticon_to_emoji: bool,
    /// Replaces the built-in alias table when present
    #[serde(default)]
    pub aliases: Option<Vec<AliasEntry>>,
    /// Added on top of the active alias table
    #[serde(default)]
    pub extra_aliases: Vec<AliasEntry>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            override_say: true,
            override_me: true,
            em_target: Action::Say,
            emoticon_to_emoji: true,
            aliases: None,
            extra_aliases: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, `emojize.toml`, `config_file` and the environment
    pub fn load(config_file: Option<&Path>) -> EmojizeResult<Self> {
        Self::load_with_env(config_file, |key| std::env::var(key).ok())
    }

    pub fn load_with_env<F>(config_file: Option<&Path>, env: F) -> EmojizeResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Config::builder()
            .set_default("override_say", true)?
            .set_default("override_me", true)?
            .set_default("em_target", Action::Say.as_str())?
            .set_default("emoticon_to_emoji", true)?;

        // 1. Optional settings file in the current directory
        let current_dir_path = PathBuf::from(SETTINGS_FILE_NAME);
        if current_dir_path.exists() {
            builder = builder.add_source(File::from(current_dir_path).required(false));
        }

        // 2. Explicitly requested file must exist
        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()).required(true));
        }

        // 3. Environment variables (highest priority)
        for (var, key) in [
            ("EMOJIZE_OVERRIDE_SAY", "override_say"),
            ("EMOJIZE_OVERRIDE_ME", "override_me"),
            ("EMOJIZE_EM_TARGET", "em_target"),
            ("EMOJIZE_EMOTICON_TO_EMOJI", "emoticon_to_emoji"),
        ] {
            if let Some(value) = env(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        let s = builder.build()?;
        Ok(s.try_deserialize()?)
    }

    /// Alias table these settings select
    pub fn alias_table(&self) -> AliasTable {
        let mut table = match &self.aliases {
            Some(entries) => AliasTable::from_pairs(
                entries
                    .iter()
                    .map(|entry| (entry.emoticon.clone(), entry.shortcode.clone())),
            ),
            None => AliasTable::default(),
        };
        table.extend(
            self.extra_aliases
                .iter()
                .map(|entry| (entry.emoticon.clone(), entry.shortcode.clone())),
        );
        table
    }

    pub fn interceptor_config(&self) -> InterceptorConfig {
        InterceptorConfig {
            override_say: self.override_say,
            override_me: self.override_me,
            em_target: self.em_target,
        }
    }

    /// Build the pipeline, failing on a bad alias table
    pub fn build_emojizer(&self) -> EmojizeResult<Emojizer> {
        let matcher = if self.emoticon_to_emoji {
            Some(EmoticonMatcher::new(self.alias_table())?)
        } else {
            None
        };
        Ok(Emojizer::new(matcher, Box::new(GemojiExpander)))
    }
}
