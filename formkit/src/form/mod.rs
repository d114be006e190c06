mod builder;
mod control;
mod descriptor;
mod form_state;
mod options;
mod path;
mod prefill;
mod session;
mod spec;
mod validators;

pub use builder::{
    apply_options, extract_labels, ControlCreation, FormBuilder,
    OptionsResult, RemoteRequest,
};
pub use control::{Control, ControlKind, UpdateOn};
pub use descriptor::{FieldDescriptor, FieldKind, OptionSource};
pub use form_state::{FormState, FormValues, SubmitOutcome, SubmitSink};
#[cfg(feature = "http_client")]
pub use options::HttpRecordSource;
pub use options::{parse_records, OfflineSource, RecordSource};
pub use path::{label_of, PropertyPath};
pub use prefill::{RecordPrefill, UserRecord};
pub use session::{FormSession, OptionsMessage};
pub use spec::{parse_yaml_to_spec, FormSpec};
pub use validators::{validate_all, Rule, RuleKind};
