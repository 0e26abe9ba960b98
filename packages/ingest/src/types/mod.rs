//! Data types flowing through the pipeline.

pub mod record;
pub mod source;

pub use record::{CandidateRecord, CaseRecord, FeedRecord, SinkRecord};
pub use source::{sanitize_section, ExternalSource, HeaderProfile, Language, SourceKind};
