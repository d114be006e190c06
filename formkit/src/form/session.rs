use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::builder::{apply_options, FormBuilder, OptionsResult};
use super::form_state::{FormState, SubmitOutcome, SubmitSink};
use super::options::RecordSource;
use crate::FormkitError;

/// Outcome of one remote option fetch, sent from the fetch task to the
/// session.
#[derive(Debug)]
pub struct OptionsMessage {
    pub field: String,
    pub result: OptionsResult,
}

/// A built form together with the option fetches it is waiting on.
///
/// Fetch tasks never touch the form state. They report back over a channel
/// and the session applies their results, so all updates happen through the
/// session's owner. Closing (or dropping) the session aborts outstanding
/// fetches; results that still arrive are ignored.
pub struct FormSession {
    builder: FormBuilder,
    state: FormState,
    tasks: HashMap<String, JoinHandle<()>>,
    rx: mpsc::UnboundedReceiver<OptionsMessage>,
    closed: bool,
}

impl FormSession {
    /// Builds the form and spawns one fetch per remote-backed select. Must
    /// be called from within a tokio runtime.
    pub fn start(
        builder: FormBuilder,
        source: Arc<dyn RecordSource>,
    ) -> Self {
        let state = builder.build();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut tasks = HashMap::new();

        for request in builder.remote_requests() {
            let tx = tx.clone();
            let source = Arc::clone(&source);
            let field = request.field.clone();
            log::debug!(
                "Fetching options for {} from {}",
                field,
                request.url
            );
            let handle = tokio::spawn(async move {
                let result = source.fetch(&request.url).await;
                // a closed receiver means the session is gone
                let _ = tx.send(OptionsMessage {
                    field: request.field,
                    result,
                });
            });
            if let Some(displaced) = tasks.insert(field.clone(), handle) {
                // a repeated field name keeps only its last fetch
                log::warn!("Duplicate remote field {}, fetch replaced", field);
                displaced.abort();
            }
        }

        Self {
            builder,
            state,
            tasks,
            rx,
            closed: false,
        }
    }

    pub fn builder(&self) -> &FormBuilder {
        &self.builder
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Fields whose options are still being fetched, in descriptor order.
    pub fn pending(&self) -> Vec<String> {
        let mut pending: Vec<String> = Vec::new();
        for descriptor in self.builder.descriptors().iter() {
            let name = descriptor.name();
            if self.tasks.contains_key(name)
                && !pending.iter().any(|field| field == name)
            {
                pending.push(name.to_string());
            }
        }
        pending
    }

    /// Applies a fetch result. Returns the affected field name, or `None`
    /// when the message was ignored (session closed, or no fetch pending
    /// for that field).
    pub fn apply(&mut self, message: OptionsMessage) -> Option<String> {
        if self.closed {
            log::debug!(
                "Session closed, ignoring options for {}",
                message.field
            );
            return None;
        }
        if self.tasks.remove(&message.field).is_none() {
            log::debug!("No fetch pending for {}, ignoring", message.field);
            return None;
        }
        let descriptor = self.builder.descriptor(&message.field)?;
        let label_path =
            descriptor.remote_source().and_then(|(_, path)| path);
        apply_options(
            &mut self.state,
            descriptor,
            label_path,
            self.builder.creation(),
            message.result,
        );
        Some(message.field)
    }

    /// Waits for the next fetch to settle and applies it. Returns the
    /// updated field, or `None` once nothing is pending.
    pub async fn next_update(&mut self) -> Option<String> {
        while !self.closed && !self.tasks.is_empty() {
            match self.rx.recv().await {
                Some(message) => {
                    if let Some(field) = self.apply(message) {
                        return Some(field);
                    }
                }
                None => self.fail_pending(),
            }
        }
        None
    }

    /// Applies results until every fetch has settled.
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    // every sender is gone without reporting, so the fetch tasks died
    fn fail_pending(&mut self) {
        for field in self.pending() {
            let message = OptionsMessage {
                result: Err(FormkitError::String(format!(
                    "Fetch for {} ended without a result",
                    field
                ))),
                field,
            };
            self.apply(message);
        }
    }

    pub fn submit(&self, sink: &dyn SubmitSink) -> SubmitOutcome {
        self.state.submit(sink)
    }

    /// Tears the session down. Outstanding fetches are aborted.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        for (field, handle) in self.tasks.drain() {
            log::debug!("Aborting options fetch for {}", field);
            handle.abort();
        }
        self.rx.close();
        self.closed = true;
    }

    pub fn into_state(mut self) -> FormState {
        self.close();
        std::mem::take(&mut self.state)
    }
}

impl Drop for FormSession {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}
