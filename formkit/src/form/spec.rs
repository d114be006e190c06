use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::builder::{ControlCreation, FormBuilder};
use super::descriptor::{FieldDescriptor, FieldKind, OptionSource};
use super::path::PropertyPath;
use super::prefill::{RecordPrefill, UserRecord};
use super::validators::Rule;
use crate::FormkitError;

const DEFAULT_FORM: &str = include_str!("../../config/profile_form.yaml");
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
pub struct FormSpec {
    form: YamlForm,
    http: Option<YamlHttp>,
    #[serde(default)]
    users: Vec<UserRecord>,
}

impl FormSpec {
    /// The built-in profile form.
    pub fn default_form() -> Result<Self, FormkitError> {
        parse_yaml_to_spec(DEFAULT_FORM)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FormkitError> {
        let path = path.as_ref();
        log::debug!("Loading form specification from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        parse_yaml_to_spec(&content)
    }

    pub fn id(&self) -> &str {
        &self.form.id
    }

    pub fn title(&self) -> &str {
        self.form.title.as_deref().unwrap_or(&self.form.id)
    }

    pub fn creation(&self) -> Result<ControlCreation, FormkitError> {
        match self.form.creation.as_deref() {
            None => Ok(ControlCreation::default()),
            Some(value) => ControlCreation::parse(value).ok_or_else(|| {
                FormkitError::ConfigError(format!(
                    "Unknown control creation mode: {}",
                    value
                ))
            }),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(
            self.http
                .as_ref()
                .and_then(|http| http.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn prefill(&self) -> RecordPrefill {
        RecordPrefill::new(self.users.clone())
    }

    pub fn descriptors(&self) -> Result<Vec<FieldDescriptor>, FormkitError> {
        let mut seen = HashSet::new();
        self.form
            .fields
            .iter()
            .map(|field| {
                if !seen.insert(field.name.as_str()) {
                    return Err(FormkitError::ConfigError(format!(
                        "Duplicate field name: {}",
                        field.name
                    )));
                }
                field.to_descriptor()
            })
            .collect()
    }

    pub fn form_builder(&self) -> Result<FormBuilder, FormkitError> {
        Ok(FormBuilder::new(self.descriptors()?)
            .with_creation(self.creation()?))
    }
}

#[derive(Debug, Deserialize)]
struct YamlForm {
    id: String,
    title: Option<String>,
    creation: Option<String>,
    fields: Vec<YamlField>,
}

#[derive(Debug, Deserialize)]
struct YamlHttp {
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct YamlField {
    name: String,
    #[serde(rename = "type")]
    r#type: String,
    label: Option<String>,
    #[serde(default)]
    validators: Vec<YamlValidation>,
    options: Option<Vec<String>>,
    options_url: Option<String>,
    object_prop: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YamlValidation {
    rule: String,
    pattern: Option<String>,
}

impl YamlValidation {
    fn to_rule(&self, field: &str) -> Result<Rule, FormkitError> {
        match self.rule.as_str() {
            "required" => Ok(Rule::Required),
            "email" => Ok(Rule::Email),
            "alphanumeric" => Ok(Rule::alphanumeric()),
            "pattern" => {
                let pattern = self.pattern.as_deref().ok_or_else(|| {
                    config_error(field, "pattern rule without a pattern")
                })?;
                Rule::pattern(pattern).map_err(|e| {
                    config_error(field, &format!("invalid pattern: {}", e))
                })
            }
            other => {
                Err(config_error(field, &format!("unknown rule {}", other)))
            }
        }
    }
}

fn config_error(field: &str, reason: &str) -> FormkitError {
    FormkitError::ConfigError(format!("field {}: {}", field, reason))
}

impl YamlField {
    fn to_descriptor(&self) -> Result<FieldDescriptor, FormkitError> {
        let name = self.name.as_str();
        if name.is_empty() {
            return Err(FormkitError::ConfigError(
                "field without a name".to_string(),
            ));
        }
        let kind = match self.r#type.as_str() {
            "text" | "textarea" | "date" => {
                if self.options.is_some() || self.options_url.is_some() {
                    log::warn!(
                        "Field {}: options are ignored for type {}",
                        name,
                        self.r#type
                    );
                }
                match self.r#type.as_str() {
                    "text" => FieldKind::Text,
                    "textarea" => FieldKind::TextArea,
                    _ => FieldKind::Date,
                }
            }
            "radio" => match (&self.options, &self.options_url) {
                (Some(options), None) => FieldKind::Radio {
                    options: options.clone(),
                },
                _ => {
                    return Err(config_error(
                        name,
                        "radio needs a static options list",
                    ))
                }
            },
            "select" => match (&self.options, &self.options_url) {
                (Some(options), None) => {
                    FieldKind::Select(OptionSource::Static(options.clone()))
                }
                (None, Some(url)) => {
                    Url::parse(url).map_err(|e| {
                        let reason = format!("invalid options_url: {}", e);
                        config_error(name, &reason)
                    })?;
                    FieldKind::Select(OptionSource::Remote {
                        url: url.clone(),
                        label_path: self
                            .object_prop
                            .as_deref()
                            .map(PropertyPath::parse),
                    })
                }
                _ => {
                    return Err(config_error(
                        name,
                        "select needs exactly one of options, options_url",
                    ))
                }
            },
            other => {
                let reason = format!("unknown type {}", other);
                return Err(config_error(name, &reason));
            }
        };

        let rules = self
            .validators
            .iter()
            .map(|validation| validation.to_rule(name))
            .collect::<Result<Vec<_>, _>>()?;

        let mut descriptor =
            FieldDescriptor::new(name, kind).with_rules(rules);
        if let Some(label) = &self.label {
            descriptor = descriptor.with_label(label.clone());
        }
        Ok(descriptor)
    }
}

pub fn parse_yaml_to_spec(content: &str) -> Result<FormSpec, FormkitError> {
    let spec = serde_yaml::from_str::<FormSpec>(content)?;
    // surface field errors at load time rather than at build time
    spec.descriptors()?;
    spec.creation()?;
    Ok(spec)
}
