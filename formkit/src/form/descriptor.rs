use std::fmt;

use super::path::PropertyPath;
use super::validators::Rule;

#[derive(Debug, Clone, PartialEq)]
pub enum OptionSource {
    Static(Vec<String>),
    Remote {
        url: String,
        // without a path the record itself is the label
        label_path: Option<PropertyPath>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    TextArea,
    Date,
    Radio { options: Vec<String> },
    Select(OptionSource),
}

impl FieldKind {
    pub fn is_remote(&self) -> bool {
        matches!(self, FieldKind::Select(OptionSource::Remote { .. }))
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, FieldKind::Radio { .. } | FieldKind::Select(_))
    }

    pub fn is_date(&self) -> bool {
        matches!(self, FieldKind::Date)
    }

    /// Options known without fetching anything.
    pub fn static_options(&self) -> Vec<String> {
        match self {
            FieldKind::Radio { options }
            | FieldKind::Select(OptionSource::Static(options)) => {
                options.clone()
            }
            _ => Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::TextArea => "textarea",
            FieldKind::Date => "date",
            FieldKind::Radio { .. } => "radio",
            FieldKind::Select(_) => "select",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    label: Option<String>,
    kind: FieldKind,
    rules: Vec<Rule>,
}

impl FieldDescriptor {
    pub fn new<S: Into<String>>(name: S, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            kind,
            rules: Vec::new(),
        }
    }

    pub fn text<S: Into<String>>(name: S) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn text_area<S: Into<String>>(name: S) -> Self {
        Self::new(name, FieldKind::TextArea)
    }

    pub fn date<S: Into<String>>(name: S) -> Self {
        Self::new(name, FieldKind::Date)
    }

    pub fn radio<S: Into<String>>(name: S, options: Vec<String>) -> Self {
        Self::new(name, FieldKind::Radio { options })
    }

    pub fn select<S: Into<String>>(name: S, options: Vec<String>) -> Self {
        Self::new(name, FieldKind::Select(OptionSource::Static(options)))
    }

    pub fn remote_select<S: Into<String>>(
        name: S,
        url: S,
        label_path: Option<&str>,
    ) -> Self {
        Self::new(
            name,
            FieldKind::Select(OptionSource::Remote {
                url: url.into(),
                label_path: label_path.map(PropertyPath::parse),
            }),
        )
    }

    pub fn with_label<S: Into<String>>(mut self, label: S) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label, falling back to the field name.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn remote_source(&self) -> Option<(&str, Option<&PropertyPath>)> {
        match &self.kind {
            FieldKind::Select(OptionSource::Remote { url, label_path }) => {
                Some((url.as_str(), label_path.as_ref()))
            }
            _ => None,
        }
    }
}
