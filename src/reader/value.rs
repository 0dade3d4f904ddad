use std::{
    any::Any,
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

/// Descriptor for a type that command arguments can be converted into.
///
/// A type is identified by its name. The declared supertypes form the
/// is-subtype-of relation the reader registry falls back on when no reader
/// is registered for the exact type.
#[derive(Clone, Copy)]
pub struct ValueType {
    name: &'static str,
    supertypes: &'static [ValueType],
}

impl ValueType {
    /// 8 bit signed integer.
    pub const BYTE: ValueType = ValueType::new("byte");
    /// 16 bit signed integer.
    pub const SHORT: ValueType = ValueType::new("short");
    /// 32 bit signed integer.
    pub const INT: ValueType = ValueType::new("int");
    /// 64 bit signed integer.
    pub const LONG: ValueType = ValueType::new("long");
    /// Single precision floating point.
    pub const FLOAT: ValueType = ValueType::new("float");
    /// Double precision floating point.
    pub const DOUBLE: ValueType = ValueType::new("double");
    /// Raw text.
    pub const STRING: ValueType = ValueType::new("string");

    /// Creates a type without supertypes.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            supertypes: &[],
        }
    }

    /// Creates a type that is a subtype of every type in `supertypes`.
    pub const fn with_supertypes(name: &'static str, supertypes: &'static [ValueType]) -> Self {
        Self { name, supertypes }
    }

    /// The type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Directly declared supertypes.
    pub fn supertypes(&self) -> &'static [ValueType] {
        self.supertypes
    }

    /// Whether `self` is `other` or transitively declares it as supertype.
    pub fn is_subtype_of(&self, other: &ValueType) -> bool {
        self == other || self.supertypes.iter().any(|s| s.is_subtype_of(other))
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ValueType {}

impl Hash for ValueType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueType({})", self.name)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A converted argument value.
#[derive(Clone)]
pub enum Value {
    /// `i8`
    Byte(i8),
    /// `i16`
    Short(i16),
    /// `i32`
    Int(i32),
    /// `i64`
    Long(i64),
    /// `f32`
    Float(f32),
    /// `f64`
    Double(f64),
    /// Raw text.
    String(String),
    /// An enumeration constant, stored by its canonical name.
    Enum(String),
    /// Anything produced by a pluggable reader.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Integer view of any integral variant.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Byte(v) => Some(i64::from(*v)),
            Value::Short(v) => Some(i64::from(*v)),
            Value::Int(v) => Some(i64::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Floating point view of any numeric variant.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(f64::from(*v)),
            Value::Double(v) => Some(*v),
            other => other.as_i64().map(|v| v as f64),
        }
    }

    /// Text of a `String` or `Enum` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Downcasts a `Custom` value.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "Byte({v})"),
            Value::Short(v) => write!(f, "Short({v})"),
            Value::Int(v) => write!(f, "Int({v})"),
            Value::Long(v) => write!(f, "Long({v})"),
            Value::Float(v) => write!(f, "Float({v})"),
            Value::Double(v) => write!(f, "Double({v})"),
            Value::String(v) => write!(f, "String({v:?})"),
            Value::Enum(v) => write!(f, "Enum({v})"),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Byte(a), Value::Byte(b)) => a == b,
            (Value::Short(a), Value::Short(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Long(a), Value::Long(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::String(a), Value::String(b)) | (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Byte(v) => write!(f, "{v}"),
            Value::Short(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) | Value::Enum(v) => f.write_str(v),
            Value::Custom(_) => f.write_str("<custom>"),
        }
    }
}
