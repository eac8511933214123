use serde::Serialize;

/// Type syntax: the values of `type x = ...` declarations, `<...>` type
/// literals, casts and `explode ... by <type>`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Type {
    /// Built-in scalar type
    ///
    /// # Example
    /// ```text
    /// int64
    /// ```
    TypePrimitive { name: String },

    /// # Example
    /// ```text
    /// {a:int64,b:string}
    /// ```
    TypeRecord { fields: Vec<TypeField> },

    /// # Example
    /// ```text
    /// [ip]
    /// ```
    TypeArray {
        #[serde(rename = "type")]
        typ: Box<Type>,
    },

    /// # Example
    /// ```text
    /// |[string]|
    /// ```
    TypeSet {
        #[serde(rename = "type")]
        typ: Box<Type>,
    },

    /// # Example
    /// ```text
    /// |{string:int64}|
    /// ```
    TypeMap {
        key_type: Box<Type>,
        val_type: Box<Type>,
    },

    /// # Example
    /// ```text
    /// (int64,string)
    /// ```
    TypeUnion { types: Vec<Type> },

    /// Reference to a named type
    TypeName { name: String },

    /// Inline named type definition
    ///
    /// # Example
    /// ```text
    /// port=(uint16)
    /// ```
    TypeDef {
        name: String,
        #[serde(rename = "type")]
        typ: Box<Type>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeField {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: Type,
}

/// Names accepted as primitive types.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "uint8", "uint16", "uint32", "uint64", "int8", "int16", "int32", "int64", "float16",
    "float32", "float64", "bool", "string", "bstring", "bytes", "ip", "net", "type", "error",
    "time", "duration", "null",
];

impl Type {
    pub fn primitive(name: impl Into<String>) -> Self {
        Type::TypePrimitive { name: name.into() }
    }
}
