//! Declared output schema passed alongside each prompt.
//!
//! Serializes to the OpenAPI subset the Gemini `responseSchema` field accepts:
//! upper-case type names, ordered `properties`, and a `required` list.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    String,
    Integer,
    Boolean,
    Array(Box<Schema>),
    Object(ObjectSchema),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSchema {
    properties: Vec<(String, Schema)>,
    required: Vec<String>,
}

impl Schema {
    /// Starts an empty object schema.
    #[must_use]
    pub fn object() -> ObjectSchema {
        ObjectSchema::default()
    }

    #[must_use]
    pub fn array_of(items: impl Into<Schema>) -> Schema {
        Schema::Array(Box::new(items.into()))
    }

    fn type_name(&self) -> &'static str {
        match self {
            Schema::String => "STRING",
            Schema::Integer => "INTEGER",
            Schema::Boolean => "BOOLEAN",
            Schema::Array(_) => "ARRAY",
            Schema::Object(_) => "OBJECT",
        }
    }
}

impl ObjectSchema {
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: impl Into<Schema>) -> Self {
        self.properties.push((name.into(), schema.into()));
        self
    }

    /// Marks already-declared properties as required.
    #[must_use]
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(name, _)| name.as_str())
    }

    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }
}

impl From<ObjectSchema> for Schema {
    fn from(object: ObjectSchema) -> Self {
        Schema::Object(object)
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Schema::String | Schema::Integer | Schema::Boolean => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", self.type_name())?;
                map.end()
            }
            Schema::Array(items) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", self.type_name())?;
                map.serialize_entry("items", items.as_ref())?;
                map.end()
            }
            Schema::Object(object) => {
                let len = if object.required.is_empty() { 2 } else { 3 };
                let mut map = serializer.serialize_map(Some(len))?;
                map.serialize_entry("type", self.type_name())?;
                map.serialize_entry("properties", &Properties(&object.properties))?;
                if !object.required.is_empty() {
                    map.serialize_entry("required", &object.required)?;
                }
                map.end()
            }
        }
    }
}

struct Properties<'a>(&'a [(String, Schema)]);

impl Serialize for Properties<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}
