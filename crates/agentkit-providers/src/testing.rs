//! In-crate test double for [`AzureOpenAiApi`].

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::fmt::MakeWriter;

use crate::client::{
    AzureOpenAiApi, EmbeddingData, EmbeddingRequest, EmbeddingResponse, ResponseObject,
    ResponseRequest, VendorError,
};

/// Records every request, optionally sleeps (blocking the thread), then
/// answers with a canned reply or a canned failure.
#[derive(Default)]
pub(crate) struct FakeClient {
    pub reply_text: String,
    pub reply_embedding: Vec<f64>,
    pub fail_with_status: Option<u16>,
    pub delay: Option<Duration>,
    pub response_requests: Mutex<Vec<ResponseRequest>>,
    pub embedding_requests: Mutex<Vec<EmbeddingRequest>>,
}

impl FakeClient {
    pub fn replying(text: &str) -> Self {
        Self {
            reply_text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn embedding(vector: Vec<f64>) -> Self {
        Self {
            reply_embedding: vector,
            ..Default::default()
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_with_status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn last_response_request(&self) -> ResponseRequest {
        self.response_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no response request recorded")
    }

    pub fn last_embedding_request(&self) -> EmbeddingRequest {
        self.embedding_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no embedding request recorded")
    }

    fn pause_and_check(&self) -> Result<(), VendorError> {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        match self.fail_with_status {
            Some(status) => Err(VendorError::Api {
                status,
                body: "simulated failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl AzureOpenAiApi for FakeClient {
    fn create_response(&self, request: &ResponseRequest) -> Result<ResponseObject, VendorError> {
        self.response_requests.lock().unwrap().push(request.clone());
        self.pause_and_check()?;
        Ok(ResponseObject::with_output_text(self.reply_text.clone()))
    }

    fn create_embedding(
        &self,
        request: &EmbeddingRequest,
    ) -> Result<EmbeddingResponse, VendorError> {
        self.embedding_requests.lock().unwrap().push(request.clone());
        self.pause_and_check()?;
        Ok(EmbeddingResponse {
            data: vec![EmbeddingData {
                embedding: self.reply_embedding.clone(),
            }],
        })
    }
}

/// Captures formatted `tracing` output for assertions.
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// A subscriber writing into this buffer, for `tracing::subscriber::set_default`.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync + 'static {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
