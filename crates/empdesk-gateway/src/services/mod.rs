pub mod backend;
pub mod translator;

pub use backend::{ApiClient, ApiOutcome, ApiRequest, ApiResponse, Backend};
pub use translator::{ErrorDetail, ErrorOutcome};
