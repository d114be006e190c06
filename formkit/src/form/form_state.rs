use std::collections::HashMap;

use super::control::Control;
use crate::FormkitError;

pub type FormValues = HashMap<String, Option<String>>;

/// Receives the value map of a valid form on submission.
pub trait SubmitSink {
    fn submit(&self, values: &FormValues);
}

impl<F> SubmitSink for F
where
    F: Fn(&FormValues),
{
    fn submit(&self, values: &FormValues) {
        self(values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Rejected { invalid: Vec<String> },
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

/// Controls keyed by field name, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    order: Vec<String>,
    controls: HashMap<String, Control>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a control. An existing control of the same name is replaced and
    /// keeps its position.
    pub fn add_control<S: Into<String>>(&mut self, name: S, control: Control) {
        let name = name.into();
        if self.controls.insert(name.clone(), control).is_some() {
            log::debug!("Replacing control: {}", name);
        } else {
            log::debug!("Adding control: {}", name);
            self.order.push(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.controls.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Control> {
        self.controls.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.controls.get_mut(name)
    }

    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn controls(&self) -> impl Iterator<Item = (&str, &Control)> {
        self.order.iter().filter_map(move |name| {
            self.controls
                .get(name)
                .map(|control| (name.as_str(), control))
        })
    }

    fn control_mut(
        &mut self,
        name: &str,
    ) -> Result<&mut Control, FormkitError> {
        self.controls
            .get_mut(name)
            .ok_or_else(|| FormkitError::UnknownField(name.to_string()))
    }

    /// User input into a field, checked against what the field's widget
    /// could produce.
    pub fn input(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<(), FormkitError> {
        let control = self.control_mut(name)?;
        control.check_input(value).map_err(|reason| {
            FormkitError::InvalidInput(name.to_string(), reason)
        })?;
        control.input(value);
        Ok(())
    }

    pub fn blur(&mut self, name: &str) -> Result<(), FormkitError> {
        self.control_mut(name)?.blur();
        Ok(())
    }

    /// Input followed by focus loss, as when a user fills in a field and
    /// moves on.
    pub fn enter(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<(), FormkitError> {
        self.input(name, value)?;
        self.blur(name)
    }

    pub fn set_value(
        &mut self,
        name: &str,
        value: Option<String>,
    ) -> Result<(), FormkitError> {
        self.control_mut(name)?.set_value(value);
        Ok(())
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.controls.get(name).and_then(|control| control.value())
    }

    pub fn is_valid(&self) -> bool {
        self.controls.values().all(|control| control.is_valid())
    }

    pub fn invalid_fields(&self) -> Vec<String> {
        self.controls()
            .filter(|(_, control)| !control.is_valid())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Messages of all touched, invalid controls in field order.
    pub fn messages(&self) -> Vec<(String, Vec<String>)> {
        self.controls()
            .map(|(name, control)| (name.to_string(), control.messages(name)))
            .filter(|(_, messages)| !messages.is_empty())
            .collect()
    }

    pub fn values(&self) -> FormValues {
        self.controls
            .iter()
            .map(|(name, control)| {
                (name.clone(), control.value().map(|v| v.to_string()))
            })
            .collect()
    }

    /// Hands the value map to the sink if, and only if, every control is
    /// valid.
    pub fn submit(&self, sink: &dyn SubmitSink) -> SubmitOutcome {
        let invalid = self.invalid_fields();
        if !invalid.is_empty() {
            log::debug!("Submit rejected, invalid fields: {:?}", invalid);
            return SubmitOutcome::Rejected { invalid };
        }
        let values = self.values();
        log::info!("Submitting form with {} fields", values.len());
        sink.submit(&values);
        SubmitOutcome::Submitted
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::form::control::UpdateOn;
    use crate::form::validators::Rule;

    fn required(update_on: UpdateOn) -> Control {
        Control::new(None, vec![Rule::Required], update_on)
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut state = FormState::new();
        state.add_control("a", required(UpdateOn::Blur));
        state.add_control("b", required(UpdateOn::Blur));
        state.add_control("a", Control::new(None, vec![], UpdateOn::Change));

        assert_eq!(state.names(), &["a".to_string(), "b".to_string()]);
        assert!(state.get("a").unwrap().rules().is_empty());
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_unknown_field() {
        let mut state = FormState::new();
        assert!(matches!(
            state.enter("missing", "x"),
            Err(FormkitError::UnknownField(_))
        ));
    }

    #[test]
    fn test_submit_gated_on_validity() {
        let mut state = FormState::new();
        state.add_control("a", required(UpdateOn::Blur));
        state.add_control("b", Control::new(None, vec![], UpdateOn::Blur));

        let received = RefCell::new(Vec::new());
        let sink = |values: &FormValues| {
            received.borrow_mut().push(values.clone());
        };

        assert_eq!(
            state.submit(&sink),
            SubmitOutcome::Rejected {
                invalid: vec!["a".to_string()]
            }
        );
        assert!(received.borrow().is_empty());

        state.enter("a", "value").unwrap();
        assert!(state.submit(&sink).is_submitted());

        let received = received.into_inner();
        assert_eq!(received.len(), 1);
        let mut expected = FormValues::new();
        expected.insert("a".to_string(), Some("value".to_string()));
        expected.insert("b".to_string(), None);
        assert_eq!(received[0], expected);
    }

    #[test]
    fn test_messages_in_field_order() {
        let mut state = FormState::new();
        state.add_control("first", required(UpdateOn::Blur));
        state.add_control("second", required(UpdateOn::Blur));
        state.blur("second").unwrap();
        state.blur("first").unwrap();

        let messages = state.messages();
        assert_eq!(messages[0].0, "first");
        assert_eq!(messages[1].1, vec!["second is required".to_string()]);
    }
}
