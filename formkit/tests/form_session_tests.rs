use std::collections::{HashMap, HashSet};
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use formkit::{
    ControlCreation, ControlKind, FieldDescriptor, FormBuilder, FormSession,
    FormSpec, FormValues, FormkitError, OptionsMessage, RecordSource, Rule,
    RuleKind, SubmitOutcome, UpdateOn,
};
use serde_json::{json, Value};
use tempfile::tempdir;
use tokio::sync::Notify;

const COUNTRIES_URL: &str = "https://example.com/countries";

/// Serves canned records per URL; unknown URLs fail.
struct StaticSource {
    records: HashMap<String, Vec<Value>>,
}

impl StaticSource {
    fn countries() -> Arc<dyn RecordSource> {
        let mut records = HashMap::new();
        records.insert(
            COUNTRIES_URL.to_string(),
            vec![
                json!({"name": {"official": "New Zealand"}}),
                json!({"name": {"official": "Iceland"}}),
                json!({"name": {}}),
            ],
        );
        Arc::new(StaticSource { records })
    }

    fn failing() -> Arc<dyn RecordSource> {
        Arc::new(StaticSource {
            records: HashMap::new(),
        })
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<Vec<Value>, FormkitError> {
        self.records
            .get(url)
            .cloned()
            .ok_or_else(|| FormkitError::String(format!("404: {}", url)))
    }
}

/// Never answers until released.
struct StalledSource {
    release: Arc<Notify>,
}

#[async_trait]
impl RecordSource for StalledSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<Value>, FormkitError> {
        self.release.notified().await;
        Ok(vec![json!({"name": {"official": "Late"}})])
    }
}

/// Answers after a short delay and counts completed fetches.
struct CountingSource {
    completed: Arc<AtomicUsize>,
}

#[async_trait]
impl RecordSource for CountingSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<Value>, FormkitError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(vec![json!({"name": {"official": "Iceland"}})])
    }
}

struct PanickingSource;

#[async_trait]
impl RecordSource for PanickingSource {
    async fn fetch(&self, _url: &str) -> Result<Vec<Value>, FormkitError> {
        panic!("fetch task died");
    }
}

fn profile_descriptors() -> Vec<FieldDescriptor> {
    vec![
        FieldDescriptor::text("username")
            .with_rules(vec![Rule::Required, Rule::alphanumeric()]),
        FieldDescriptor::text("email")
            .with_rules(vec![Rule::Required, Rule::Email]),
        FieldDescriptor::remote_select(
            "country",
            COUNTRIES_URL,
            Some("name.official"),
        )
        .with_rule(Rule::Required),
    ]
}

#[tokio::test]
async fn test_placeholder_session_loads_options() {
    let builder = FormBuilder::new(profile_descriptors());
    let mut session = FormSession::start(builder, StaticSource::countries());

    // the placeholder exists before any fetch completes
    let country = session.state().get("country").unwrap();
    assert_eq!(country.value(), Some(""));
    assert!(country.options().is_empty());
    assert_eq!(session.pending(), vec!["country".to_string()]);

    assert_eq!(session.next_update().await, Some("country".to_string()));
    assert!(session.pending().is_empty());
    assert_eq!(session.next_update().await, None);

    let country = session.state().get("country").unwrap();
    assert_eq!(country.value(), Some(""));
    assert_eq!(
        country.options(),
        &[Some("New Zealand".to_string()), Some("Iceland".to_string()), None]
    );
    assert_eq!(country.rules().len(), 1);
    assert_eq!(country.kind(), ControlKind::Choice);
    assert!(!country.is_valid());
}

#[tokio::test]
async fn test_deferred_session_creates_control_on_success() {
    let builder = FormBuilder::new(profile_descriptors())
        .with_creation(ControlCreation::Deferred);
    let mut session = FormSession::start(builder, StaticSource::countries());
    assert!(!session.state().contains("country"));

    session.settle().await;

    let country = session.state().get("country").unwrap();
    assert_eq!(country.value(), Some("New Zealand"));
    assert_eq!(country.options().len(), 3);
    assert_eq!(country.update_on(), UpdateOn::Change);
    assert!(country.is_valid());
    assert_eq!(
        session.state().names(),
        &["username", "email", "country"].map(String::from)
    );
}

#[tokio::test]
async fn test_failed_fetch_degrades_to_stub() {
    for creation in [ControlCreation::Placeholder, ControlCreation::Deferred] {
        let builder =
            FormBuilder::new(profile_descriptors()).with_creation(creation);
        let mut session = FormSession::start(builder, StaticSource::failing());
        session.settle().await;

        let country = session.state().get("country").unwrap();
        assert_eq!(country.value(), Some(""));
        assert_eq!(country.rules(), &[Rule::Required]);
        assert!(country.options().is_empty());
        assert_eq!(country.kind(), ControlKind::Text);
        assert_eq!(country.errors(), vec![RuleKind::Required]);

        // the rest of the form stays usable
        let state = session.state_mut();
        state.enter("username", "user1").unwrap();
        state.enter("email", "user1@email.com").unwrap();
        state.enter("country", "Atlantis").unwrap();
        assert!(state.is_valid());
    }
}

#[tokio::test]
async fn test_dead_fetch_task_degrades_to_stub() {
    let builder = FormBuilder::new(profile_descriptors());
    let mut session = FormSession::start(builder, Arc::new(PanickingSource));
    session.settle().await;

    assert!(session.pending().is_empty());
    let country = session.state().get("country").unwrap();
    assert_eq!(country.rules(), &[Rule::Required]);
    assert_eq!(country.kind(), ControlKind::Text);
}

#[tokio::test]
async fn test_close_ignores_late_results() {
    let release = Arc::new(Notify::new());
    let source = Arc::new(StalledSource {
        release: Arc::clone(&release),
    });
    let builder = FormBuilder::new(profile_descriptors());
    let mut session = FormSession::start(builder, source);
    assert_eq!(session.pending().len(), 1);

    session.close();
    release.notify_waiters();
    assert!(session.is_closed());
    assert!(session.pending().is_empty());
    assert_eq!(session.next_update().await, None);

    let late = OptionsMessage {
        field: "country".to_string(),
        result: Ok(vec![json!({"name": {"official": "Late"}})]),
    };
    assert_eq!(session.apply(late), None);

    let country = session.state().get("country").unwrap();
    assert!(country.options().is_empty());
    assert_eq!(country.value(), Some(""));
}

#[tokio::test]
async fn test_duplicate_remote_field_keeps_one_fetch() {
    let completed = Arc::new(AtomicUsize::new(0));
    let source = Arc::new(CountingSource {
        completed: Arc::clone(&completed),
    });
    let mut descriptors = profile_descriptors();
    descriptors.push(FieldDescriptor::remote_select(
        "country",
        COUNTRIES_URL,
        Some("name.official"),
    ));
    let mut session = FormSession::start(FormBuilder::new(descriptors), source);
    assert_eq!(session.pending(), vec!["country".to_string()]);

    session.close();
    tokio::time::sleep(Duration::from_millis(200)).await;
    // no fetch outlives the session
    assert_eq!(completed.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_apply_ignores_unrequested_fields() {
    let builder = FormBuilder::new(profile_descriptors());
    let mut session = FormSession::start(builder, StaticSource::countries());
    let message = OptionsMessage {
        field: "username".to_string(),
        result: Ok(vec![json!("x")]),
    };
    assert_eq!(session.apply(message), None);
    assert_eq!(session.state().get("username").unwrap().value(), None);
    session.close();
}

#[tokio::test]
async fn test_submit_only_when_valid() {
    let builder = FormBuilder::new(profile_descriptors())
        .with_creation(ControlCreation::Deferred);
    let mut session = FormSession::start(builder, StaticSource::countries());
    session.settle().await;

    let submitted: Mutex<Vec<FormValues>> = Mutex::new(Vec::new());
    let sink = |values: &FormValues| {
        submitted.lock().unwrap().push(values.clone());
    };

    let outcome = session.submit(&sink);
    assert_eq!(
        outcome,
        SubmitOutcome::Rejected {
            invalid: vec!["username".to_string(), "email".to_string()],
        }
    );
    assert!(submitted.lock().unwrap().is_empty());

    let state = session.state_mut();
    state.enter("username", "user1").unwrap();
    // invalid email shows no message but still blocks submission
    state.enter("email", "not-an-email").unwrap();
    assert!(state.messages().is_empty());
    assert!(!session.submit(&sink).is_submitted());

    session.state_mut().enter("email", "user1@email.com").unwrap();
    assert!(session.submit(&sink).is_submitted());

    let submitted = submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    let values = &submitted[0];
    assert_eq!(values.len(), 3);
    assert_eq!(values["username"].as_deref(), Some("user1"));
    assert_eq!(values["email"].as_deref(), Some("user1@email.com"));
    assert_eq!(values["country"].as_deref(), Some("New Zealand"));
}

#[tokio::test]
async fn test_prefill_after_options_loaded() {
    let spec = FormSpec::default_form().unwrap();
    let builder = spec.form_builder().unwrap();
    let mut session = FormSession::start(builder, StaticSource::failing());
    session.settle().await;

    let prefill = spec.prefill();
    assert!(!prefill.apply("nonexistent", session.state_mut()));
    assert_eq!(session.state().value("email"), None);

    assert!(prefill.apply("user1", session.state_mut()));
    let state = session.state();
    assert_eq!(state.value("email"), Some("user1@email.com"));
    assert_eq!(state.value("country"), Some("New Zealand"));
    assert_eq!(state.value("dob"), Some("1990-01-01"));
    // prefill does not mark fields as visited
    assert!(state.messages().is_empty());
    assert!(state.is_valid());
}

#[tokio::test]
async fn test_form_from_yaml_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("signup.yaml");
    fs::write(
        &path,
        "form:
  id: signup
  creation: deferred
  fields:
    - name: nickname
      type: text
      validators:
        - rule: pattern
          pattern: \"[a-z]+\"
    - name: country
      type: select
      options_url: https://example.com/countries
      object_prop: name.official
users:
  - username: ann
",
    )
    .unwrap();

    let spec = FormSpec::from_file(&path).unwrap();
    assert_eq!(spec.title(), "signup");
    assert_eq!(spec.users().len(), 1);

    let builder = spec.form_builder().unwrap();
    let mut session = FormSession::start(builder, StaticSource::countries());
    session.settle().await;

    let state = session.state_mut();
    assert_eq!(state.value("country"), Some("New Zealand"));
    // an empty optional value passes the pattern
    assert!(state.is_valid());
    state.enter("nickname", "Ann1").unwrap();
    let messages: HashSet<String> = state
        .messages()
        .into_iter()
        .flat_map(|(_, messages)| messages)
        .collect();
    assert!(messages.contains("nickname does not match the pattern"));
}

#[test]
fn test_missing_yaml_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let result = FormSpec::from_file(temp_dir.path().join("missing.yaml"));
    assert!(matches!(result, Err(FormkitError::Io(_))));
}
