use async_trait::async_trait;
use bytes::Bytes;

use aclgate_core::error::{GatewayError, Result};

use crate::context::Caller;
use crate::dispatch::UnaryService;

/// Protected business methods. Bodies are placeholders; the gateway only
/// exists to guard them.
#[derive(Default)]
pub struct BizService;

impl BizService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UnaryService for BizService {
    fn service(&self) -> &'static str {
        "Biz"
    }

    fn methods(&self) -> &'static [&'static str] {
        &["Check", "Add", "Test"]
    }

    async fn call(&self, caller: Caller, _body: Bytes) -> Result<Bytes> {
        match caller.method().method() {
            "Check" | "Add" | "Test" => {
                tracing::trace!(consumer = %caller.consumer(), method = %caller.method(), "biz call");
                Ok(Bytes::new())
            }
            _ => Err(GatewayError::UnknownMethod(caller.method().to_string())),
        }
    }
}
