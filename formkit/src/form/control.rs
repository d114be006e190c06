use time::macros::format_description;
use time::Date;

use super::validators::{validate_all, Rule, RuleKind};

/// When user input is committed to the control value and revalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateOn {
    #[default]
    Change,
    Blur,
}

/// What kind of values user input may carry into the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlKind {
    #[default]
    Text,
    Date,
    // one of the offered options; free text while there are none
    Choice,
}

/// Live state of a single form field.
#[derive(Debug, Clone)]
pub struct Control {
    value: Option<String>,
    pending: Option<String>,
    rules: Vec<Rule>,
    update_on: UpdateOn,
    kind: ControlKind,
    touched: bool,
    options: Vec<Option<String>>,
}

impl Control {
    pub fn new(
        value: Option<String>,
        rules: Vec<Rule>,
        update_on: UpdateOn,
    ) -> Self {
        Self {
            value,
            pending: None,
            rules,
            update_on,
            kind: ControlKind::Text,
            touched: false,
            options: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ControlKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_options(mut self, options: Vec<Option<String>>) -> Self {
        self.options = options;
        self
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Input typed but not yet committed (blur-triggered controls only).
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn update_on(&self) -> UpdateOn {
        self.update_on
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn options(&self) -> &[Option<String>] {
        &self.options
    }

    pub fn set_options(&mut self, options: Vec<Option<String>>) {
        self.options = options;
    }

    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().flatten().any(|option| option == value)
    }

    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Rejects input the matching widget could not have produced.
    pub fn check_input(&self, value: &str) -> Result<(), String> {
        match self.kind {
            ControlKind::Text => Ok(()),
            ControlKind::Date => {
                let format = format_description!("[year]-[month]-[day]");
                Date::parse(value, &format).map(|_| ()).map_err(|_| {
                    format!("'{}' is not a YYYY-MM-DD date", value)
                })
            }
            ControlKind::Choice => {
                if self.options.is_empty() || self.has_option(value) {
                    Ok(())
                } else {
                    Err(format!("'{}' is not one of the options", value))
                }
            }
        }
    }

    /// User input. Committed right away on change-triggered controls, held
    /// back until blur otherwise.
    pub fn input<S: Into<String>>(&mut self, value: S) {
        match self.update_on {
            UpdateOn::Change => {
                self.pending = None;
                self.value = Some(value.into());
            }
            UpdateOn::Blur => self.pending = Some(value.into()),
        }
    }

    /// Focus leaves the control.
    pub fn blur(&mut self) {
        self.touched = true;
        if let Some(pending) = self.pending.take() {
            self.value = Some(pending);
        }
    }

    /// Programmatic update, committed regardless of the update trigger.
    pub fn set_value(&mut self, value: Option<String>) {
        self.pending = None;
        self.value = value;
    }

    pub fn errors(&self) -> Vec<RuleKind> {
        validate_all(&self.rules, self.value())
    }

    pub fn is_valid(&self) -> bool {
        self.rules.iter().all(|rule| rule.validate(self.value()).is_ok())
    }

    /// Messages to show under the field. Only touched and invalid controls
    /// show anything, and email failures have no message of their own.
    pub fn messages(&self, name: &str) -> Vec<String> {
        if !self.touched {
            return Vec::new();
        }
        self.errors()
            .into_iter()
            .filter_map(|kind| match kind {
                RuleKind::Required => Some(format!("{} is required", name)),
                RuleKind::Pattern => {
                    Some(format!("{} does not match the pattern", name))
                }
                RuleKind::Email => None,
            })
            .collect()
    }
}
