//! Schema and field definitions.
//!
//! A [`Schema`] is an ordered, immutable set of named fields, each bound to
//! one codec. It is the single source of truth for which logical keys are
//! valid and how their values are stored. Cloning a schema is cheap; clones
//! share the same field table.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::codec::{Codec, ErasedCodec};
use crate::error::{Result, StoreError};

/// A named field bound to a codec.
pub struct Field {
    name: String,
    codec: Arc<dyn ErasedCodec>,
    value_type_id: TypeId,
    default_raw: Option<String>,
}

impl Field {
    /// Logical field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the codec bound to this field (e.g. "number").
    pub fn codec_name(&self) -> &'static str {
        self.codec.name()
    }

    /// Rust type name of the field's value.
    pub fn value_type(&self) -> &'static str {
        self.codec.value_type()
    }

    /// Encoded form of the declared default value, if any.
    pub fn default_raw(&self) -> Option<&str> {
        self.default_raw.as_deref()
    }

    pub(crate) fn check_type<T: 'static>(&self) -> Result<()> {
        if self.value_type_id == TypeId::of::<T>() {
            Ok(())
        } else {
            Err(StoreError::TypeMismatch {
                key: self.name.clone(),
                expected: self.value_type(),
            })
        }
    }

    pub(crate) fn encode<T: 'static>(&self, value: &T) -> Result<String> {
        self.check_type::<T>()?;
        self.codec
            .encode_any(value as &dyn Any)
            .map_err(|e| e.with_key(&self.name))
    }

    pub(crate) fn decode<T: 'static>(&self, raw: Option<&str>) -> Result<Option<T>> {
        self.check_type::<T>()?;
        let decoded = self
            .codec
            .decode_any(raw)
            .map_err(|e| e.with_key(&self.name))?;
        match decoded {
            Some(boxed) => boxed
                .downcast::<T>()
                .map(|value| Some(*value))
                .map_err(|_| StoreError::TypeMismatch {
                    key: self.name.clone(),
                    expected: self.value_type(),
                }),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("codec", &self.codec_name())
            .field("default", &self.default_raw)
            .finish()
    }
}

struct SchemaInner {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

/// Immutable, shareable mapping from field name to [`Field`].
#[derive(Clone)]
pub struct Schema {
    inner: Arc<SchemaInner>,
}

impl Schema {
    /// Start declaring a schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Look up a field by logical name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.inner
            .index
            .get(name)
            .map(|&pos| &self.inner.fields[pos])
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.index.contains_key(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.inner.fields.iter().map(|f| f.name.as_str())
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.inner.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.fields.is_empty()
    }

    /// Look up a field, failing with `UnknownKey` when it is not declared.
    pub(crate) fn require(&self, name: &str) -> Result<&Field> {
        self.field(name)
            .ok_or_else(|| StoreError::UnknownKey(name.to_string()))
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.fields.iter()).finish()
    }
}

/// Builder for [`Schema`].
///
/// Field names are not validated; any string is accepted. Declaring the
/// same name twice fails at [`SchemaBuilder::build`].
#[derive(Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
    errors: Vec<String>,
}

impl SchemaBuilder {
    /// Declare a field using `codec`.
    pub fn field<C: Codec>(self, name: impl Into<String>, codec: C) -> Self {
        self.shared_field(name, Arc::new(codec))
    }

    /// Declare a field using a codec instance shared with other fields.
    pub fn shared_field<C: Codec>(mut self, name: impl Into<String>, codec: Arc<C>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            codec,
            value_type_id: TypeId::of::<C::Value>(),
            default_raw: None,
        });
        self
    }

    /// Declare a field with a default value, used by `get_or_default`.
    pub fn field_with_default<C: Codec>(
        mut self,
        name: impl Into<String>,
        codec: C,
        default: C::Value,
    ) -> Self {
        let name = name.into();
        match codec.encode(&default) {
            Ok(raw) => {
                self = self.field(name, codec);
                if let Some(field) = self.fields.last_mut() {
                    field.default_raw = Some(raw);
                }
            }
            Err(err) => self
                .errors
                .push(format!("default for '{}': {}", name, err)),
        }
        self
    }

    /// Finish the schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Schema` if a name was declared twice or a default
    /// value could not be encoded.
    pub fn build(self) -> Result<Schema> {
        if let Some(message) = self.errors.into_iter().next() {
            return Err(StoreError::Schema(message));
        }
        let mut index = HashMap::with_capacity(self.fields.len());
        for (pos, field) in self.fields.iter().enumerate() {
            if index.insert(field.name.clone(), pos).is_some() {
                return Err(StoreError::Schema(format!(
                    "Duplicate field name: {}",
                    field.name
                )));
            }
        }
        Ok(Schema {
            inner: Arc::new(SchemaInner {
                fields: self.fields,
                index,
            }),
        })
    }
}
