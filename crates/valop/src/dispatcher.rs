//! Name-based operation dispatch.

use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::DispatchError;
use crate::registry::{OperationDescriptor, OperationRegistry};
use crate::shape::type_label;
use crate::transport::{HttpTransport, Transport};

/// Resolves operation names and performs the request/decode for each call.
///
/// Cloning is cheap; clones share the registry and the transport.
#[derive(Clone)]
pub struct Dispatcher {
    registry: OperationRegistry,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(registry: OperationRegistry, transport: impl Transport + 'static) -> Self {
        Self::with_shared_transport(registry, Arc::new(transport))
    }

    pub fn with_shared_transport(registry: OperationRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry,
            transport,
        }
    }

    /// Dispatcher posting to `base_url` over HTTP.
    pub fn http(registry: OperationRegistry, base_url: &str) -> Self {
        Self::new(registry, HttpTransport::new(base_url))
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    /// Execute `name` and decode the response as `R`.
    ///
    /// `R` must be the shape `name` was registered with; otherwise the call
    /// fails with [`DispatchError::ShapeMismatch`] before anything is sent.
    ///
    /// ```rust,ignore
    /// let page: ValOperationPaged = dispatcher
    ///     .execute(Operation::ValOperations, &json!({"page": 1}))
    ///     .await?;
    /// ```
    pub async fn execute<R, F>(&self, name: impl AsRef<str>, filter: &F) -> Result<R, DispatchError>
    where
        R: DeserializeOwned + 'static,
        F: Serialize + ?Sized,
    {
        let name = name.as_ref();
        let descriptor = self.registry.resolve(name)?;

        if !descriptor.shape().is::<R>() {
            return Err(DispatchError::ShapeMismatch {
                operation: name.to_string(),
                registered: descriptor.shape().name(),
                requested: type_label::<R>(),
            });
        }

        let body = self.send(descriptor, filter).await?;

        serde_json::from_slice(&body).map_err(|source| {
            tracing::warn!(operation = %name, error = %source, "response did not match shape");
            DispatchError::Decode {
                operation: name.to_string(),
                shape: descriptor.shape().name(),
                source,
            }
        })
    }

    /// Execute `name` and decode through its registered shape, returning
    /// the decoded value as JSON.
    ///
    /// For callers that cannot name the result type at compile time. The
    /// body is still validated against the registered shape.
    pub async fn execute_value<F>(&self, name: impl AsRef<str>, filter: &F) -> Result<Value, DispatchError>
    where
        F: Serialize + ?Sized,
    {
        let name = name.as_ref();
        let descriptor = self.registry.resolve(name)?;
        let body = self.send(descriptor, filter).await?;

        descriptor.shape().decode_value(&body).map_err(|source| {
            tracing::warn!(operation = %name, error = %source, "response did not match shape");
            DispatchError::Decode {
                operation: name.to_string(),
                shape: descriptor.shape().name(),
                source,
            }
        })
    }

    /// Encode the filter and issue the single POST for this call.
    #[tracing::instrument(
        skip(self, descriptor, filter),
        fields(
            operation = %descriptor.name(),
            path = %descriptor.path(),
            shape = %descriptor.shape(),
        )
    )]
    async fn send<F>(&self, descriptor: &OperationDescriptor, filter: &F) -> Result<Bytes, DispatchError>
    where
        F: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(filter).map_err(|source| DispatchError::Encode {
            operation: descriptor.name().to_string(),
            source,
        })?;

        tracing::debug!(bytes = body.len(), "posting filter");

        let response = self
            .transport
            .post(descriptor.path(), Bytes::from(body))
            .await
            .map_err(|source| {
                tracing::warn!(error = %source, "operation failed");
                DispatchError::Transport {
                    operation: descriptor.name().to_string(),
                    source,
                }
            })?;

        tracing::info!(bytes = response.len(), "operation completed");

        Ok(response)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("operations", &self.registry.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::operation::Operation;
    use crate::registry::RegistryBuilder;
    use crate::types::{OtherType3, ValOperationPaged};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every POST and answers with a canned body.
    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<(String, Value)>>,
        reply: Mutex<Option<Result<Bytes, u16>>>,
    }

    impl RecordingTransport {
        fn replying(body: &str) -> Self {
            let transport = Self::default();
            *transport.reply.lock().unwrap() = Some(Ok(Bytes::from(body.to_string())));
            transport
        }

        fn failing(status: u16) -> Self {
            let transport = Self::default();
            *transport.reply.lock().unwrap() = Some(Err(status));
            transport
        }

        fn calls(&self) -> Vec<(String, Value)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn post(&self, path: &str, body: Bytes) -> Result<Bytes, TransportError> {
            let parsed: Value = serde_json::from_slice(&body).unwrap();
            self.calls.lock().unwrap().push((path.to_string(), parsed));
            match self.reply.lock().unwrap().clone() {
                Some(Ok(bytes)) => Ok(bytes),
                Some(Err(status)) => Err(TransportError::Http {
                    status,
                    body: "backend error".to_string(),
                }),
                None => Ok(Bytes::from_static(b"null")),
            }
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct PingResult {
        ok: bool,
    }

    fn ping_registry() -> OperationRegistry {
        let mut builder = RegistryBuilder::new();
        builder.register::<PingResult>("Ping", "api/ping").unwrap();
        builder.build()
    }

    #[tokio::test]
    async fn test_ping_scenario() {
        let transport = Arc::new(RecordingTransport::replying(r#"{"ok": true}"#));
        let dispatcher = Dispatcher::with_shared_transport(ping_registry(), transport.clone());

        let result: PingResult = dispatcher.execute("Ping", &json!({})).await.unwrap();

        assert_eq!(result, PingResult { ok: true });
        assert_eq!(transport.calls(), vec![("api/ping".to_string(), json!({}))]);
    }

    #[tokio::test]
    async fn test_unknown_operation_sends_nothing() {
        let transport = Arc::new(RecordingTransport::replying(r#"{"ok": true}"#));
        let dispatcher = Dispatcher::with_shared_transport(ping_registry(), transport.clone());

        let err = dispatcher
            .execute::<PingResult, _>("Missing", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnknownOperation { ref name } if name == "Missing"));

        let err = dispatcher.execute_value("Missing", &json!({})).await.unwrap_err();
        assert!(matches!(err, DispatchError::UnknownOperation { .. }));

        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_shape_mismatch_sends_nothing() {
        let transport = Arc::new(RecordingTransport::replying("{}"));
        let dispatcher = Dispatcher::with_shared_transport(OperationRegistry::standard(), transport.clone());

        let err = dispatcher
            .execute::<OtherType3, _>(Operation::ValOperations, &json!({}))
            .await
            .unwrap_err();

        match err {
            DispatchError::ShapeMismatch {
                operation,
                registered,
                requested,
            } => {
                assert_eq!(operation, "ValOperations");
                assert_eq!(registered, "ValOperationPaged");
                assert_eq!(requested, "OtherType3");
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_every_standard_operation_posts_once_to_its_path() {
        let transport = Arc::new(RecordingTransport::replying(
            r#"{"items": [], "totalCount": 0, "page": 1, "pageSize": 10}"#,
        ));
        let dispatcher = Dispatcher::with_shared_transport(OperationRegistry::standard(), transport.clone());

        for op in Operation::ALL {
            dispatcher.execute_value(op, &json!({"op": op.as_str()})).await.unwrap();
        }

        let expected: Vec<_> = Operation::ALL
            .iter()
            .map(|op| (op.path().to_string(), json!({"op": op.as_str()})))
            .collect();
        assert_eq!(transport.calls(), expected);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let transport = RecordingTransport::replying(r#"{"items": "nope"}"#);
        let dispatcher = Dispatcher::new(OperationRegistry::standard(), transport);

        let err = dispatcher
            .execute::<ValOperationPaged, _>(Operation::ValOperations, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Decode { shape: "ValOperationPaged", .. }));

        let err = dispatcher
            .execute_value(Operation::ValOperations, &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let dispatcher = Dispatcher::new(ping_registry(), RecordingTransport::failing(500));

        let err = dispatcher
            .execute::<PingResult, _>("Ping", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.operation(), "Ping");
    }

    #[tokio::test]
    async fn test_unserializable_filter_is_encode_error() {
        let transport = Arc::new(RecordingTransport::replying(r#"{"ok": true}"#));
        let dispatcher = Dispatcher::with_shared_transport(ping_registry(), transport.clone());

        // JSON object keys must be strings
        let mut filter = std::collections::HashMap::new();
        filter.insert(vec![1u8], "x");

        let err = dispatcher
            .execute::<PingResult, _>("Ping", &filter)
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Encode { .. }));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_calls_resolve_identically() {
        let transport = Arc::new(RecordingTransport::replying(r#"{"ok": false}"#));
        let dispatcher = Dispatcher::with_shared_transport(ping_registry(), transport.clone());

        for _ in 0..3 {
            let result: PingResult = dispatcher.execute("Ping", &json!({"n": 1})).await.unwrap();
            assert_eq!(result, PingResult { ok: false });
        }

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(path, _)| path == "api/ping"));
    }
}
