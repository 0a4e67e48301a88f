//! Per-request context carried in request extensions.

/// Per-request context, inserted by [`crate::middleware::request_context`].
///
/// Immutable for the lifetime of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}
