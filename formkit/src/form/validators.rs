use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

const ALPHANUMERIC_PATTERN: &str = r"^[a-zA-Z0-9]+$";
const EMAIL_MAX_LENGTH: usize = 254;
const EMAIL_LOCAL_PART_MAX_LENGTH: usize = 64;

lazy_static! {
    static ref ALPHANUMERIC_REGEX: Regex = Regex::new(ALPHANUMERIC_PATTERN)
        .expect("ALPHANUMERIC_REGEX: invalid regex pattern");
    // dot-atom local part, hostname labels of at most 63 characters
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    )
    .expect("EMAIL_REGEX: invalid regex pattern");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RuleKind {
    Required,
    Pattern,
    Email,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Required => write!(f, "required"),
            RuleKind::Pattern => write!(f, "pattern"),
            RuleKind::Email => write!(f, "email"),
        }
    }
}

/// A single validation rule attached to a control. Rules are evaluated
/// independently; a control is invalid when any of its rules fails.
#[derive(Debug, Clone)]
pub enum Rule {
    Required,
    Pattern(Regex),
    Email,
}

impl Rule {
    /// Letters and digits only, at least one character.
    pub fn alphanumeric() -> Self {
        Rule::Pattern(ALPHANUMERIC_REGEX.clone())
    }

    /// Compiles a pattern rule. The pattern always has to match the whole
    /// value, so it is anchored as a group.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Rule::Pattern(Regex::new(&format!("^(?:{})$", pattern))?))
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Required => RuleKind::Required,
            Rule::Pattern(_) => RuleKind::Pattern,
            Rule::Email => RuleKind::Email,
        }
    }

    /// Empty values only ever fail `Required`; pattern and email checks
    /// leave them alone.
    pub fn validate(&self, value: Option<&str>) -> Result<(), RuleKind> {
        let value = value.unwrap_or_default();
        let passed = match self {
            Rule::Required => !value.is_empty(),
            Rule::Pattern(regex) => value.is_empty() || regex.is_match(value),
            Rule::Email => value.is_empty() || is_email(value),
        };
        if passed {
            Ok(())
        } else {
            Err(self.kind())
        }
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Rule::Pattern(a), Rule::Pattern(b)) => a.as_str() == b.as_str(),
            _ => self.kind() == other.kind(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Pattern(regex) => write!(f, "pattern({})", regex.as_str()),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

fn is_email(value: &str) -> bool {
    if value.len() > EMAIL_MAX_LENGTH {
        return false;
    }
    match value.split_once('@') {
        Some((local, _)) if local.len() <= EMAIL_LOCAL_PART_MAX_LENGTH => {
            EMAIL_REGEX.is_match(value)
        }
        _ => false,
    }
}

/// Runs every rule and collects the kinds that failed, in rule order.
pub fn validate_all(rules: &[Rule], value: Option<&str>) -> Vec<RuleKind> {
    rules
        .iter()
        .filter_map(|rule| rule.validate(value).err())
        .collect()
}
