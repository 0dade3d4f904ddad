use std::{fmt::Debug, str::FromStr};

use crate::command::Locale;

use super::{ReaderError, Value};

/// Converts a raw token into a typed [`Value`].
pub trait ArgumentReader: Send + Sync + Debug {
    /// Reads `input`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReaderError`] carrying `input` when it cannot be converted.
    fn read(&self, input: &str, locale: &Locale) -> Result<Value, ReaderError>;

    /// Statically known values this reader accepts, offered during completion.
    fn suggestions(&self) -> Vec<String> {
        Vec::new()
    }
}

fn parse_number<T: FromStr>(input: &str, type_name: &str) -> Result<T, ReaderError> {
    input
        .parse::<T>()
        .map_err(|_| ReaderError::new(format!("Could not parse {{input}} to {type_name}!"), input))
}

/// Reads `i8` values.
#[derive(Debug, Default)]
pub struct ByteReader;

impl ArgumentReader for ByteReader {
    fn read(&self, input: &str, _locale: &Locale) -> Result<Value, ReaderError> {
        parse_number(input, "byte").map(Value::Byte)
    }
}

/// Reads `i16` values.
#[derive(Debug, Default)]
pub struct ShortReader;

impl ArgumentReader for ShortReader {
    fn read(&self, input: &str, _locale: &Locale) -> Result<Value, ReaderError> {
        parse_number(input, "short").map(Value::Short)
    }
}

/// Reads `i32` values.
#[derive(Debug, Default)]
pub struct IntReader;

impl ArgumentReader for IntReader {
    fn read(&self, input: &str, _locale: &Locale) -> Result<Value, ReaderError> {
        parse_number(input, "int").map(Value::Int)
    }
}

/// Reads `i64` values.
#[derive(Debug, Default)]
pub struct LongReader;

impl ArgumentReader for LongReader {
    fn read(&self, input: &str, _locale: &Locale) -> Result<Value, ReaderError> {
        parse_number(input, "long").map(Value::Long)
    }
}

/// Reads `f32` values. A decimal comma is accepted for locales that write one.
#[derive(Debug, Default)]
pub struct FloatReader;

impl ArgumentReader for FloatReader {
    fn read(&self, input: &str, locale: &Locale) -> Result<Value, ReaderError> {
        let normalized = locale.normalize_decimal(input);
        parse_number(&normalized, "float")
            .map(Value::Float)
            .map_err(|e| ReaderError::new(e.template, input))
    }
}

/// Reads `f64` values. A decimal comma is accepted for locales that write one.
#[derive(Debug, Default)]
pub struct DoubleReader;

impl ArgumentReader for DoubleReader {
    fn read(&self, input: &str, locale: &Locale) -> Result<Value, ReaderError> {
        let normalized = locale.normalize_decimal(input);
        parse_number(&normalized, "double")
            .map(Value::Double)
            .map_err(|e| ReaderError::new(e.template, input))
    }
}

/// Passes the token through unchanged.
#[derive(Debug, Default)]
pub struct StringReader;

impl ArgumentReader for StringReader {
    fn read(&self, input: &str, _locale: &Locale) -> Result<Value, ReaderError> {
        Ok(Value::String(input.to_string()))
    }
}

/// Reads one constant of an enumeration.
///
/// Constants are declared in their canonical upper snake case form. Input is
/// matched case-insensitively with spaces standing in for `_`, so
/// `"game mode"` reads `GAME_MODE`.
#[derive(Debug, Clone)]
pub struct EnumReader {
    name: &'static str,
    constants: Vec<String>,
}

impl EnumReader {
    /// Creates a reader for the enumeration `name` with the given constants.
    pub fn new(name: &'static str, constants: &[&str]) -> Self {
        Self {
            name,
            constants: constants.iter().map(|c| c.to_uppercase()).collect(),
        }
    }

    /// The canonical constant names.
    pub fn constants(&self) -> &[String] {
        &self.constants
    }
}

impl ArgumentReader for EnumReader {
    fn read(&self, input: &str, _locale: &Locale) -> Result<Value, ReaderError> {
        let wanted = input.replace(' ', "_").to_uppercase();
        self.constants
            .iter()
            .find(|constant| **constant == wanted)
            .map(|constant| Value::Enum(constant.clone()))
            .ok_or_else(|| {
                ReaderError::new(format!("Could not find {{input}} in {}!", self.name), input)
            })
    }

    fn suggestions(&self) -> Vec<String> {
        self.constants.iter().map(|c| c.to_lowercase()).collect()
    }
}
