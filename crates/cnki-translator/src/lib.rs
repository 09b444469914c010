pub mod api;
pub mod chunker;
pub mod clock;
pub mod encoder;
pub mod error;
pub mod observer;
pub mod pipeline;
pub mod result;
pub mod sanitizer;
pub mod token;

pub use api::{CnkiApi, HttpApi, TokenResponse, TranslateData, TranslateResponse};
pub use clock::{Clock, SystemClock};
pub use encoder::TextEncoder;
pub use error::{BAN_MESSAGE, TranslateError};
pub use observer::{NoopObserver, ProgressObserver};
pub use pipeline::TranslationPipeline;
pub use result::TranslationResult;
pub use sanitizer::{AD_PAYLOAD, Sanitizer};
pub use token::{TOKEN_TTL_MILLIS, TokenStore};
