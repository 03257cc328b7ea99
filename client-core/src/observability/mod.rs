pub mod logging;
pub mod request_context;

pub use logging::init_tracing;
pub use request_context::{
    REQUEST_ID_HEADER, TracedClientExt, TracedRequest, extract_request_id, inject_request_id,
    new_request_id,
};
