//! Feature flag resolution from raw command-line tokens.
//!
//! Flags are bare words in paired affirmative/negative form (`jupyter` /
//! `no-jupyter`). Matching ignores case, `-` and `_`, so `--no-jupyter`,
//! `nojupyter` and `No_Jupyter` are the same token.

use crate::error::Result;
use crate::prompt::{LineSource, Prompter};
use tracing::debug;

/// Normalize a raw argument for flag matching
pub fn normalize_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// What happens when neither form of a flag is present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagDefault {
    /// Use a fixed value
    Value(bool),
    /// Ask the user with this question
    Ask(&'static str),
}

/// Recognized feature flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Jupyter,
    PreCommit,
    Requirements,
    Git,
    Help,
}

impl Feature {
    /// All recognized features
    pub const ALL: [Feature; 5] = [
        Feature::Jupyter,
        Feature::PreCommit,
        Feature::Requirements,
        Feature::Git,
        Feature::Help,
    ];

    /// Normalized affirmative token
    pub fn affirmative(&self) -> &'static str {
        match self {
            Self::Jupyter => "jupyter",
            Self::PreCommit => "precommit",
            Self::Requirements => "requirements",
            Self::Git => "git",
            Self::Help => "help",
        }
    }

    /// Normalized negative token
    pub fn negative(&self) -> &'static str {
        match self {
            Self::Jupyter => "nojupyter",
            Self::PreCommit => "noprecommit",
            Self::Requirements => "norequirements",
            Self::Git => "nogit",
            Self::Help => "nohelp",
        }
    }

    /// Fallback when the flag is absent
    pub fn fallback(&self) -> FlagDefault {
        match self {
            Self::Jupyter => FlagDefault::Ask("Install jupyter?"),
            Self::PreCommit => FlagDefault::Ask("Install pre-commit?"),
            Self::Requirements => FlagDefault::Value(true),
            Self::Git => FlagDefault::Value(true),
            Self::Help => FlagDefault::Value(false),
        }
    }

    /// Whether a normalized token is either form of this flag
    fn matches(&self, normalized: &str) -> bool {
        normalized == self.affirmative() || normalized == self.negative()
    }
}

/// Outcome of looking a flag up in the argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Given on the command line
    Explicit(bool),
    /// Absent, fixed default applies
    Default(bool),
    /// Absent, the user has to be asked
    NeedsPrompt(&'static str),
}

/// Resolve a single feature against the argument list.
///
/// The affirmative form wins when both forms are present.
pub fn resolve_flag<S: AsRef<str>>(args: &[S], feature: Feature) -> Resolution {
    let normalized: Vec<String> = args.iter().map(|a| normalize_token(a.as_ref())).collect();

    if normalized.iter().any(|t| t == feature.affirmative()) {
        Resolution::Explicit(true)
    } else if normalized.iter().any(|t| t == feature.negative()) {
        Resolution::Explicit(false)
    } else {
        match feature.fallback() {
            FlagDefault::Value(v) => Resolution::Default(v),
            FlagDefault::Ask(question) => Resolution::NeedsPrompt(question),
        }
    }
}

/// Whether the arguments ask for usage text
pub fn wants_help<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter().any(|a| a.as_ref() == "-h")
        || matches!(
            resolve_flag(args, Feature::Help),
            Resolution::Explicit(true)
        )
}

/// Whether a raw token is one of the recognized flag words
pub fn is_flag_token(raw: &str) -> bool {
    let normalized = normalize_token(raw);
    Feature::ALL.iter().any(|f| f.matches(&normalized))
}

/// Positional tokens: everything that is not a flag word and not an option
pub fn positionals<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    args.iter()
        .map(|a| a.as_ref())
        .filter(|a| !a.starts_with('-') && !is_flag_token(a))
        .map(str::to_string)
        .collect()
}

/// Interpreter selector from the positional list.
///
/// Only the second positional counts, and only when it names a python binary.
pub fn interpreter_selector(positionals: &[String]) -> Option<String> {
    positionals
        .get(1)
        .filter(|p| p.contains("python"))
        .cloned()
}

/// Feature switches held for the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub jupyter: bool,
    pub pre_commit: bool,
    pub requirements: bool,
    pub git: bool,
}

impl FeatureFlags {
    /// Resolve every feature once, prompting for the ones without a default.
    ///
    /// Prompts are asked in a fixed order: jupyter, then pre-commit.
    pub fn resolve<S, L>(args: &[S], prompter: &mut Prompter<L>) -> Result<Self>
    where
        S: AsRef<str>,
        L: LineSource,
    {
        let mut value = |feature: Feature| -> Result<bool> {
            let resolved = match resolve_flag(args, feature) {
                Resolution::Explicit(v) | Resolution::Default(v) => v,
                Resolution::NeedsPrompt(question) => prompter.confirm(question)?,
            };
            debug!("Flag {:?} resolved to {}", feature, resolved);
            Ok(resolved)
        };

        Ok(Self {
            jupyter: value(Feature::Jupyter)?,
            pre_commit: value(Feature::PreCommit)?,
            requirements: value(Feature::Requirements)?,
            git: value(Feature::Git)?,
        })
    }
}
