//! Operation registry.
//!
//! Built once with [`RegistryBuilder`], then frozen into an
//! [`OperationRegistry`]. The frozen registry has no mutating methods and
//! clones share one table, so any number of tasks can read it without
//! locking.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::DispatchError;
use crate::operation::Operation;
use crate::shape::ResultShape;

/// Immutable record for one registered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    name: String,
    path: String,
    shape: ResultShape,
}

impl OperationDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request target relative to the transport's base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn shape(&self) -> ResultShape {
        self.shape
    }
}

/// Collects operations before the registry is frozen.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    descriptors: Vec<OperationDescriptor>,
    index: HashMap<String, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-loaded with every [`Operation`].
    pub fn standard() -> Self {
        let mut builder = Self::new();
        for op in Operation::ALL {
            builder.insert(op.as_str().to_string(), op.path().to_string(), op.shape());
        }
        builder
    }

    /// Register `name` at `path`, decoding responses as `T`.
    pub fn register<T>(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<&mut Self, DispatchError>
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        self.register_shape(name, path, ResultShape::of::<T>())
    }

    /// Register `name` at `path` with an explicit shape.
    ///
    /// Fails with [`DispatchError::DuplicateOperation`] if `name` is taken;
    /// the existing entry is left untouched.
    pub fn register_shape(
        &mut self,
        name: impl Into<String>,
        path: impl Into<String>,
        shape: ResultShape,
    ) -> Result<&mut Self, DispatchError> {
        let name = name.into();
        if self.index.contains_key(&name) {
            return Err(DispatchError::DuplicateOperation { name });
        }
        self.insert(name, path.into(), shape);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn insert(&mut self, name: String, path: String, shape: ResultShape) {
        self.index.insert(name.clone(), self.descriptors.len());
        self.descriptors.push(OperationDescriptor { name, path, shape });
    }

    /// Freeze the table.
    pub fn build(self) -> OperationRegistry {
        OperationRegistry {
            inner: Arc::new(Inner {
                descriptors: self.descriptors,
                index: self.index,
            }),
        }
    }
}

#[derive(Debug)]
struct Inner {
    descriptors: Vec<OperationDescriptor>,
    index: HashMap<String, usize>,
}

/// Read-only operation table. Cloning is cheap and shares the table.
#[derive(Debug, Clone)]
pub struct OperationRegistry {
    inner: Arc<Inner>,
}

impl OperationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding exactly the standard operations.
    pub fn standard() -> Self {
        RegistryBuilder::standard().build()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&OperationDescriptor> {
        self.inner
            .index
            .get(name)
            .map(|&i| &self.inner.descriptors[i])
    }

    /// Like [`get`](Self::get), but fails with `UnknownOperation`.
    pub fn resolve(&self, name: &str) -> Result<&OperationDescriptor, DispatchError> {
        self.get(name).ok_or_else(|| DispatchError::UnknownOperation {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    /// Descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &OperationDescriptor> {
        self.inner.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.descriptors.is_empty()
    }
}
