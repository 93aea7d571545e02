//! Named remote operations over HTTP.
//!
//! An [`OperationRegistry`] maps an operation name to a request path and the
//! shape its response decodes into. A [`Dispatcher`] executes an operation
//! by name: it POSTs a JSON filter to the registered path and decodes the
//! body into that shape.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use valop::{Dispatcher, Operation, OperationRegistry, ValOperationPaged};
//!
//! # async fn run() -> Result<(), valop::DispatchError> {
//! let dispatcher = Dispatcher::http(OperationRegistry::standard(), "http://127.0.0.1:5000");
//!
//! let page: ValOperationPaged = dispatcher
//!     .execute(Operation::ValOperations, &json!({"page": 1, "pageSize": 50}))
//!     .await?;
//! println!("{} of {}", page.items.len(), page.total_count);
//! # Ok(())
//! # }
//! ```
//!
//! Registries are built once and never change:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use valop::RegistryBuilder;
//!
//! #[derive(Serialize, Deserialize)]
//! struct PingResult {
//!     ok: bool,
//! }
//!
//! let mut builder = RegistryBuilder::standard();
//! builder.register::<PingResult>("Ping", "api/ping").unwrap();
//! assert!(builder.register::<PingResult>("Ping", "api/ping").is_err());
//!
//! let registry = builder.build();
//! assert_eq!(registry.len(), 6);
//! ```

pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod operation;
pub mod registry;
pub mod shape;
pub mod transport;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::{DispatchError, TransportError};
pub use operation::Operation;
pub use registry::{OperationDescriptor, OperationRegistry, RegistryBuilder};
pub use shape::ResultShape;
pub use transport::{HttpTransport, Transport};
pub use types::{OtherType1, OtherType2, OtherType3, OtherType4, ValOperationPaged};
