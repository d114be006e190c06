use std::sync::Arc;

use serde_json::Value;

use super::control::{Control, ControlKind, UpdateOn};
use super::descriptor::{FieldDescriptor, FieldKind};
use super::form_state::FormState;
use super::path::{label_of, PropertyPath};
use super::validators::Rule;
use crate::FormkitError;

/// How controls of remote-backed selects come into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlCreation {
    /// Created right away with an empty value; a successful fetch only
    /// fills in the options.
    #[default]
    Placeholder,
    /// Created once the fetch succeeds, seeded with the first option.
    Deferred,
}

impl ControlCreation {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "placeholder" => Some(ControlCreation::Placeholder),
            "deferred" => Some(ControlCreation::Deferred),
            _ => None,
        }
    }
}

/// A fetch the form needs before a remote-backed select is complete.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    pub field: String,
    pub url: String,
    pub label_path: Option<PropertyPath>,
}

pub type OptionsResult = Result<Vec<Value>, FormkitError>;

pub struct FormBuilder {
    descriptors: Arc<Vec<FieldDescriptor>>,
    creation: ControlCreation,
}

impl FormBuilder {
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Self {
        Self {
            descriptors: Arc::new(descriptors),
            creation: ControlCreation::default(),
        }
    }

    pub fn with_creation(mut self, creation: ControlCreation) -> Self {
        self.creation = creation;
        self
    }

    pub fn creation(&self) -> ControlCreation {
        self.creation
    }

    pub fn descriptors(&self) -> Arc<Vec<FieldDescriptor>> {
        Arc::clone(&self.descriptors)
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.name() == name)
    }

    /// Builds every control that does not wait on a fetch.
    pub fn build(&self) -> FormState {
        let mut state = FormState::new();
        for descriptor in self.descriptors.iter() {
            if let Some(control) = initial_control(descriptor, self.creation) {
                state.add_control(descriptor.name(), control);
            }
        }
        state
    }

    pub fn remote_requests(&self) -> Vec<RemoteRequest> {
        self.descriptors
            .iter()
            .filter_map(|descriptor| {
                descriptor.remote_source().map(|(url, label_path)| {
                    RemoteRequest {
                        field: descriptor.name().to_string(),
                        url: url.to_string(),
                        label_path: label_path.cloned(),
                    }
                })
            })
            .collect()
    }
}

fn control_kind(kind: &FieldKind) -> ControlKind {
    match kind {
        FieldKind::Date => ControlKind::Date,
        FieldKind::Radio { .. } | FieldKind::Select(_) => ControlKind::Choice,
        FieldKind::Text | FieldKind::TextArea => ControlKind::Text,
    }
}

fn initial_control(
    descriptor: &FieldDescriptor,
    creation: ControlCreation,
) -> Option<Control> {
    let kind = descriptor.kind();
    if kind.is_remote() {
        return match creation {
            ControlCreation::Placeholder => Some(
                Control::new(
                    Some(String::new()),
                    descriptor.rules().to_vec(),
                    UpdateOn::Change,
                )
                .with_kind(ControlKind::Choice),
            ),
            ControlCreation::Deferred => None,
        };
    }
    let options = kind.static_options().into_iter().map(Some).collect();
    Some(
        Control::new(None, descriptor.rules().to_vec(), UpdateOn::Blur)
            .with_kind(control_kind(kind))
            .with_options(options),
    )
}

/// Turns fetched records into option labels. Records without a value at
/// the path keep their place as an absent label.
pub fn extract_labels(
    records: &[Value],
    label_path: Option<&PropertyPath>,
) -> Vec<Option<String>> {
    records
        .iter()
        .map(|record| match label_path {
            Some(path) => path.label(record),
            None => label_of(record),
        })
        .collect()
}

/// Applies the outcome of a remote option fetch to the form. This is the
/// only place fetch results reach the form state.
pub fn apply_options(
    state: &mut FormState,
    descriptor: &FieldDescriptor,
    label_path: Option<&PropertyPath>,
    creation: ControlCreation,
    result: OptionsResult,
) {
    let name = descriptor.name();
    match result {
        Ok(records) => {
            let options = extract_labels(&records, label_path);
            log::debug!("Loaded {} options for {}", options.len(), name);
            let placeholder = creation == ControlCreation::Placeholder
                && state.contains(name);
            if placeholder {
                if let Some(control) = state.get_mut(name) {
                    control.set_options(options);
                }
            } else {
                let first = options.first().cloned().flatten();
                let control = Control::new(
                    first,
                    descriptor.rules().to_vec(),
                    UpdateOn::Change,
                )
                .with_kind(ControlKind::Choice)
                .with_options(options);
                state.add_control(name, control);
            }
        }
        Err(e) => {
            log::warn!(
                "Failed to load options for {}: {}. Field degrades to a \
                 required stub.",
                name,
                e
            );
            let stub = Control::new(
                Some(String::new()),
                vec![Rule::Required],
                UpdateOn::Change,
            );
            state.add_control(name, stub);
        }
    }
}
