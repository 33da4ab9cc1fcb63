//! `PropertySet` for pass communication.
//!
//! Each property is stored under its own type, so passes agree on what they
//! exchange by sharing a type rather than a string key.
//!
//! ```
//! use qbox_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct PackingStats {
//!     slots: usize,
//! }
//!
//! let mut props = PropertySet::new();
//! props.insert(PackingStats { slots: 3 });
//!
//! assert_eq!(props.get::<PackingStats>().unwrap().slots, 3);
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

use crate::error::{CompileError, CompileResult};

/// Type-keyed storage shared by the passes of one run.
#[derive(Debug, Default)]
pub struct PropertySet {
    properties: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a property, replacing any previous value of the same type.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.properties.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.properties
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.properties
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.properties
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Check whether a property is present.
    pub fn contains<T: Any>(&self) -> bool {
        self.properties.contains_key(&TypeId::of::<T>())
    }

    /// Get a property another pass must have provided.
    pub fn require<T: Any>(&self, pass: &'static str, property: &'static str) -> CompileResult<&T> {
        self.get::<T>()
            .ok_or(CompileError::MissingProperty { pass, property })
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties are stored.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
