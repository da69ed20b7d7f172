//! Target field schemas, one per supported language.
//!
//! Each schema is a typed record whose serialized form is the exact JSON
//! template the model is asked to fill. Both records, and plain JSON objects,
//! expose their fields through [`FieldTree`] so completeness is computed by
//! one traversal.
//!
//! # Leniency
//!
//! Records are built from whatever object the model returned: unknown keys
//! are dropped, missing keys stay empty, non-zero numbers and `true` are
//! stringified, and falsy scalars (`null`, `false`, `0`) or a composite that
//! arrives as a scalar are left empty. A typed record therefore validates
//! the same as the raw object would, and always carries exactly the schema's
//! keys.

use std::sync::OnceLock;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::language::Language;

/// Completeness view of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldNode {
    /// Scalar value; `filled` is false for empty or falsy values.
    Leaf { filled: bool },
    /// Composite value with nested fields.
    Group(Vec<FieldNode>),
}

impl FieldNode {
    /// True when any leaf below this node is empty.
    pub fn has_empty_leaf(&self) -> bool {
        match self {
            FieldNode::Leaf { filled } => !filled,
            FieldNode::Group(children) => children.iter().any(FieldNode::has_empty_leaf),
        }
    }

    /// Build the node for an untyped JSON value.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => FieldNode::Group(map.values().map(FieldNode::from_json).collect()),
            Value::Null => FieldNode::Leaf { filled: false },
            Value::Bool(b) => FieldNode::Leaf { filled: *b },
            Value::Number(n) => FieldNode::Leaf {
                filled: n.as_f64().map_or(true, |f| f != 0.0),
            },
            Value::String(s) => FieldNode::Leaf {
                filled: !s.is_empty(),
            },
            Value::Array(items) => FieldNode::Leaf {
                filled: !items.is_empty(),
            },
        }
    }
}

/// Anything whose top-level fields can be checked for completeness.
pub trait FieldTree {
    /// Top-level fields in schema order.
    fn top_level_fields(&self) -> Vec<(&str, FieldNode)>;
}

impl FieldTree for Map<String, Value> {
    fn top_level_fields(&self) -> Vec<(&str, FieldNode)> {
        self.iter()
            .map(|(key, value)| (key.as_str(), FieldNode::from_json(value)))
            .collect()
    }
}

/// One field of a typed record.
pub trait FormField: Default {
    /// Build the field from the model's value for its key, if any.
    fn from_json(value: Option<&Value>) -> Self;

    /// Completeness view of this field.
    fn node(&self) -> FieldNode;
}

/// Scalar text field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Text(pub String);

impl Text {
    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for Text {
    fn from(s: &str) -> Self {
        Text(s.to_string())
    }
}

impl FormField for Text {
    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Text(s.clone()),
            // Falsy scalars stay empty, matching `FieldNode::from_json`
            Some(Value::Number(n)) if n.as_f64().map_or(false, |f| f == 0.0) => Text::default(),
            Some(Value::Number(n)) => Text(n.to_string()),
            Some(Value::Bool(true)) => Text("true".to_string()),
            _ => Text::default(),
        }
    }

    fn node(&self) -> FieldNode {
        FieldNode::Leaf {
            filled: !self.0.is_empty(),
        }
    }
}

/// Declare a composite field made of text leaves.
macro_rules! field_group {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
        pub struct $name {
            $(
                #[serde(rename = $key)]
                pub $field: $crate::schema::Text,
            )+
        }

        impl $name {
            /// Keys of this group in schema order.
            pub const KEYS: &'static [&'static str] = &[$($key),+];
        }

        impl $crate::schema::FormField for $name {
            fn from_json(value: Option<&serde_json::Value>) -> Self {
                match value {
                    Some(serde_json::Value::Object(map)) => Self {
                        $(
                            $field: $crate::schema::FormField::from_json(map.get($key)),
                        )+
                    },
                    _ => Self::default(),
                }
            }

            fn node(&self) -> $crate::schema::FieldNode {
                $crate::schema::FieldNode::Group(vec![
                    $( $crate::schema::FormField::node(&self.$field), )+
                ])
            }
        }
    };
}

/// Declare a top-level form record.
macro_rules! form_record {
    (
        $(#[$meta:meta])*
        $name:ident { $($field:ident : $ty:ty => $key:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
        pub struct $name {
            $(
                #[serde(rename = $key)]
                pub $field: $ty,
            )+
        }

        impl $name {
            /// Top-level keys in schema order.
            pub const FIELD_NAMES: &'static [&'static str] = &[$($key),+];

            /// Project a model-produced object onto this record.
            pub fn from_object(map: &serde_json::Map<String, serde_json::Value>) -> Self {
                Self {
                    $(
                        $field: <$ty as $crate::schema::FormField>::from_json(map.get($key)),
                    )+
                }
            }
        }

        impl $crate::schema::FieldTree for $name {
            fn top_level_fields(&self) -> Vec<(&str, $crate::schema::FieldNode)> {
                vec![
                    $( ($key, $crate::schema::FormField::node(&self.$field)), )+
                ]
            }
        }
    };
}

mod english;
mod hebrew;

pub use english::{EnglishAddress, EnglishDate, EnglishMedicalFields, EnglishRecord};
pub use hebrew::{HebrewAddress, HebrewDate, HebrewMedicalFields, HebrewRecord};

static ENGLISH_TEMPLATE: OnceLock<String> = OnceLock::new();
static HEBREW_TEMPLATE: OnceLock<String> = OnceLock::new();

/// The target schema selected for a document.
///
/// Holds a fresh, empty record; the canonical template is never shared
/// mutably.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSchema {
    English(EnglishRecord),
    Hebrew(HebrewRecord),
}

impl FieldSchema {
    /// Select the schema for a language.
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => FieldSchema::English(EnglishRecord::default()),
            Language::Hebrew => FieldSchema::Hebrew(HebrewRecord::default()),
        }
    }

    /// Language this schema belongs to.
    pub fn language(&self) -> Language {
        match self {
            FieldSchema::English(_) => Language::English,
            FieldSchema::Hebrew(_) => Language::Hebrew,
        }
    }

    /// Top-level keys in schema order.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            FieldSchema::English(_) => EnglishRecord::FIELD_NAMES,
            FieldSchema::Hebrew(_) => HebrewRecord::FIELD_NAMES,
        }
    }

    /// Pretty-printed empty JSON template, as embedded in the extraction prompt.
    pub fn render(&self) -> &'static str {
        match self {
            FieldSchema::English(_) => ENGLISH_TEMPLATE.get_or_init(|| {
                serde_json::to_string_pretty(&EnglishRecord::default())
                    .expect("english template must serialize")
            }),
            FieldSchema::Hebrew(_) => HEBREW_TEMPLATE.get_or_init(|| {
                serde_json::to_string_pretty(&HebrewRecord::default())
                    .expect("hebrew template must serialize")
            }),
        }
    }
}
