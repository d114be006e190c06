pub(crate) mod error;
pub(crate) mod form;
#[cfg(feature = "http_client")]
pub(crate) mod http;

pub use error::FormkitError;
pub use form::{
    apply_options, extract_labels, label_of, parse_records,
    parse_yaml_to_spec, validate_all, Control, ControlCreation, ControlKind,
    FieldDescriptor, FieldKind, FormBuilder, FormSession, FormSpec, FormState,
    FormValues, OfflineSource, OptionSource, OptionsMessage, OptionsResult,
    PropertyPath, RecordPrefill, RecordSource, RemoteRequest, Rule, RuleKind,
    SubmitOutcome, SubmitSink, UpdateOn, UserRecord,
};

// meant for external use by third-party apps or libraries
pub mod external {
    #[cfg(feature = "http_client")]
    pub use crate::form::HttpRecordSource;
    #[cfg(feature = "http_client")]
    pub use crate::http::{
        HttpClient, HttpClientError, HttpClientResponse, HttpClientResult,
    };
}
pub use external::*;
