pub mod types;

pub use types::{PipelineState, ProgressEvent, TokenRecord, TranslateTask, TranslationRequest};
