pub mod url_validation;
pub use url_validation::{UrlValidationError, is_private_or_local_host, parse_audio_url};
