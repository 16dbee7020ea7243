/// Tool Parameter Schemas
///
/// Tools describe their parameters with a small, composable `Schema`
/// descriptor. `compile` turns a descriptor into the JSON Schema document that
/// `tools/list` advertises. Compilation is pure and total: every descriptor
/// produces a schema, and the same descriptor always produces the same bytes.

use indexmap::IndexMap;
use serde::Serialize;

/// Declarative description of one parameter shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub shape: Shape,
    pub description: Option<String>,
}

/// The closed set of shapes a parameter can take.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    String,
    Number,
    Boolean,
    /// Free-form object with no declared properties.
    Record,
    /// Named fields in declaration order.
    Object(Vec<Field>),
    /// Marks a field as not required.
    Optional(Box<Schema>),
    /// Any one of the listed shapes.
    Union(Vec<Schema>),
}

/// A named field of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Schema {
    fn of(shape: Shape) -> Self {
        Self {
            shape,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(Shape::String)
    }

    pub fn number() -> Self {
        Self::of(Shape::Number)
    }

    pub fn boolean() -> Self {
        Self::of(Shape::Boolean)
    }

    pub fn record() -> Self {
        Self::of(Shape::Record)
    }

    /// Object with fields in the given order.
    pub fn object<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        Self::of(Shape::Object(
            fields
                .into_iter()
                .map(|(name, schema)| Field {
                    name: name.into(),
                    schema,
                })
                .collect(),
        ))
    }

    pub fn union(variants: impl IntoIterator<Item = Schema>) -> Self {
        Self::of(Shape::Union(variants.into_iter().collect()))
    }

    /// Wrap this schema so the field holding it is not required.
    ///
    /// Descriptions set before or after wrapping both land on the inner schema.
    pub fn optional(self) -> Self {
        Self::of(Shape::Optional(Box::new(self)))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        match &mut self.shape {
            Shape::Optional(inner) => inner.description = Some(description.into()),
            _ => self.description = Some(description.into()),
        }
        self
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.shape, Shape::Optional(_))
    }
}

/// JSON Schema primitive type names.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Object,
}

/// A compiled JSON Schema document.
///
/// Either a typed schema (`type`, and for objects `properties`/`required`) or
/// a union (`oneOf`). Absent parts are omitted when serialized.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct JsonSchema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, JsonSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    #[serde(rename = "oneOf", skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<JsonSchema>>,
}

impl JsonSchema {
    fn typed(kind: SchemaType, description: Option<String>) -> Self {
        Self {
            kind: Some(kind),
            description,
            ..Self::default()
        }
    }

    /// The generic `{"type": "object"}` schema.
    pub fn any_object() -> Self {
        Self::typed(SchemaType::Object, None)
    }
}

/// Compile a descriptor into its JSON Schema document.
pub fn compile(schema: &Schema) -> JsonSchema {
    let description = schema.description.clone();
    match &schema.shape {
        Shape::String => JsonSchema::typed(SchemaType::String, description),
        Shape::Number => JsonSchema::typed(SchemaType::Number, description),
        Shape::Boolean => JsonSchema::typed(SchemaType::Boolean, description),
        Shape::Record => JsonSchema::typed(SchemaType::Object, description),
        Shape::Union(variants) => JsonSchema {
            description,
            one_of: Some(variants.iter().map(compile).collect()),
            ..JsonSchema::default()
        },
        Shape::Object(fields) => {
            let mut properties = IndexMap::with_capacity(fields.len());
            let mut required = Vec::new();
            for field in fields {
                let compiled = match &field.schema.shape {
                    Shape::Optional(inner) => compile(inner),
                    _ => {
                        required.push(field.name.clone());
                        compile(&field.schema)
                    }
                };
                properties.insert(field.name.clone(), compiled);
            }
            JsonSchema {
                kind: Some(SchemaType::Object),
                description,
                properties: Some(properties),
                required: Some(required),
                one_of: None,
            }
        }
        // Optional only has meaning in field position.
        Shape::Optional(_) => JsonSchema::any_object(),
    }
}
