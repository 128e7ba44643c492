use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How a compiler treats the case of field names (and, for the matcher,
/// values). Each compiler has its own default: the in-process matcher folds,
/// while the builders preserve case and leave insensitivity to the target
/// (`git log -i`, the database collation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    Fold,
    #[default]
    Preserve,
}

impl CaseMode {
    pub fn apply<'a>(self, text: &'a str) -> Cow<'a, str> {
        match self {
            CaseMode::Fold => Cow::Owned(text.to_lowercase()),
            CaseMode::Preserve => Cow::Borrowed(text),
        }
    }

    pub fn is_fold(self) -> bool {
        matches!(self, CaseMode::Fold)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub case: CaseMode,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case: CaseMode::Fold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryQueryOptions {
    /// Applied to field names before they are dispatched.
    pub case: CaseMode,
    /// Emit `-i` so git matches every pattern case-insensitively.
    pub case_insensitive_flag: bool,
}

impl Default for HistoryQueryOptions {
    fn default() -> Self {
        Self {
            case: CaseMode::Preserve,
            case_insensitive_flag: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestrictionOptions {
    /// Applied to column names.
    pub case: CaseMode,
}

/// Options for all three compilers, as loaded from a config file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    pub matcher: MatchOptions,
    pub history: HistoryQueryOptions,
    pub restriction: RestrictionOptions,
}
