//! Natural-Language Rewriter
//!
//! An ordered list of [`PatternRule`]s tried top to bottom against the
//! trimmed input; the first match is expanded into canonical command syntax.
//! Matching is case-insensitive but captured names keep the user's case.

use regex::Regex;
use std::sync::LazyLock;

/// What a rule rewrites into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// `mkdir <name>`
    CreateFolder,
    /// `mv <src> <dst>` (real filesystem only)
    MoveFile,
    /// `ls`
    List,
    /// `cd <name>`
    ChangeDirectory,
    /// `monitor`
    SystemInfo,
}

/// One `(matcher, template)` pair
#[derive(Debug)]
pub struct PatternRule {
    /// Rule family, also the priority group
    pub kind: RuleKind,
    /// Matcher tested against the trimmed input
    pub pattern: Regex,
    /// Expansion template, `${n}` refers to capture group `n`
    pub template: &'static str,
}

impl PatternRule {
    fn new(kind: RuleKind, pattern: &str, template: &'static str) -> Self {
        Self {
            kind,
            pattern: Regex::new(pattern).expect("rewrite pattern is a compile-time constant"),
            template,
        }
    }
}

const NAME: &str = r"([\w.-]+)";

/// Rules in priority order: create, move, list, change directory, system info
static RULES: LazyLock<Vec<PatternRule>> = LazyLock::new(|| {
    vec![
        PatternRule::new(
            RuleKind::CreateFolder,
            &format!(
                r"(?i)\b(?:create|make)\s+(?:a\s+)?(?:new\s+)?(?:folder|directory)\s+(?:called\s+|named\s+)?{NAME}"
            ),
            "mkdir ${1}",
        ),
        PatternRule::new(RuleKind::CreateFolder, &format!(r"(?i)^mkdir\s+{NAME}$"), "mkdir ${1}"),
        PatternRule::new(
            RuleKind::MoveFile,
            &format!(r"(?i)\bmove\s+(?:file\s+)?{NAME}\s+to\s+{NAME}"),
            "mv ${1} ${2}",
        ),
        PatternRule::new(RuleKind::MoveFile, &format!(r"(?i)^mv\s+{NAME}\s+{NAME}$"), "mv ${1} ${2}"),
        PatternRule::new(
            RuleKind::List,
            r"(?i)\b(?:list|show)\s+(?:all\s+)?(?:files|directory|contents|folders)\b",
            "ls",
        ),
        PatternRule::new(RuleKind::List, r"(?i)^ls$", "ls"),
        PatternRule::new(
            RuleKind::ChangeDirectory,
            &format!(r"(?i)\b(?:go|change)\s+to\s+{NAME}"),
            "cd ${1}",
        ),
        PatternRule::new(
            RuleKind::ChangeDirectory,
            &format!(r"(?i)\benter\s+(?:directory|folder)\s+{NAME}"),
            "cd ${1}",
        ),
        PatternRule::new(RuleKind::ChangeDirectory, &format!(r"(?i)^cd\s+{NAME}$"), "cd ${1}"),
        PatternRule::new(
            RuleKind::SystemInfo,
            r"(?i)\bshow\s+system\s+(?:info|monitor|status)\b",
            "monitor",
        ),
        PatternRule::new(RuleKind::SystemInfo, r"(?i)^system\s+(?:monitor|info)$", "monitor"),
    ]
});

/// Phrase-to-command rewriter
#[derive(Debug, Clone, Copy)]
pub struct Rewriter {
    allow_move: bool,
}

impl Rewriter {
    /// Create a rewriter; move rules only apply when `allow_move` is set
    #[must_use]
    pub fn new(allow_move: bool) -> Self {
        Self { allow_move }
    }

    /// The active rules in priority order
    pub fn rules(&self) -> impl Iterator<Item = &'static PatternRule> + '_ {
        RULES
            .iter()
            .filter(move |rule| self.allow_move || rule.kind != RuleKind::MoveFile)
    }

    /// Rewrite `raw` with the first matching rule; `None` when nothing matches
    #[must_use]
    pub fn rewrite(&self, raw: &str) -> Option<String> {
        let input = raw.trim();
        self.rules().find_map(|rule| {
            rule.pattern.captures(input).map(|caps| {
                let mut out = String::new();
                caps.expand(rule.template, &mut out);
                out
            })
        })
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new(true)
    }
}
