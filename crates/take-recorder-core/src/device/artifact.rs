use std::{fmt, sync::Arc};

/// Immutable binary recording payload.
///
/// Cloning shares the bytes; the payload itself never changes after
/// assembly.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    payload: Arc<[u8]>,
    mime: String,
}

impl Artifact {
    /// Wraps already-encoded bytes.
    pub fn new(payload: impl Into<Arc<[u8]>>, mime: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            mime: mime.into(),
        }
    }

    /// Concatenates recorder chunks in arrival order.
    pub fn assemble(chunks: Vec<Vec<u8>>, mime: impl Into<String>) -> Self {
        let total = chunks.iter().map(Vec::len).sum();
        let mut payload = Vec::with_capacity(total);
        for chunk in chunks {
            payload.extend_from_slice(&chunk);
        }
        Self::new(payload, mime)
    }

    /// The encoded bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Shared handle to the encoded bytes.
    pub fn shared_payload(&self) -> Arc<[u8]> {
        Arc::clone(&self.payload)
    }

    /// MIME type the recorder produced.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// Whether the recorder produced no data.
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Whether two artifacts share the same underlying bytes.
    pub fn shares_payload_with(&self, other: &Artifact) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("mime", &self.mime)
            .field("bytes", &self.payload.len())
            .finish()
    }
}
