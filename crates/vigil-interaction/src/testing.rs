//! Test doubles for the transport seam.
//!
//! Shared by unit tests here and by the application layer's state
//! machine tests, which drive whole sessions against canned backends.
//! Compiled into dependents only through the `testing` feature.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vigil_core::error::{Result, VigilError};
use vigil_core::transport::{GenerationRequest, GenerationTransport};

/// Transport that records every request and answers each one with the
/// next canned response, repeating the last one when the script runs
/// out.
#[derive(Clone)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    responses: Arc<Mutex<Vec<String>>>,
}

impl RecordingTransport {
    /// A transport that always answers with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self::scripted(vec![response.into()])
    }

    /// A transport that answers with the given responses in order.
    pub fn scripted(responses: Vec<String>) -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses)),
        }
    }

    /// The most recent request, if any call was made.
    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.requests.lock().unwrap().last().cloned()
    }

    /// Every request seen so far.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of calls made.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationTransport for RecordingTransport {
    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            Ok(responses.remove(0))
        } else {
            responses
                .first()
                .cloned()
                .ok_or_else(|| VigilError::generation_failed("scripted transport exhausted"))
        }
    }
}

/// Transport that fails every call with a clone of the given error.
pub struct FailingTransport {
    error: VigilError,
    calls: Arc<Mutex<usize>>,
}

impl FailingTransport {
    pub fn new(error: VigilError) -> Self {
        Self {
            error,
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl GenerationTransport for FailingTransport {
    async fn generate(&self, _request: GenerationRequest) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        Err(self.error.clone())
    }
}
