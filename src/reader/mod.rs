//! Typed value readers.
//!
//! Arguments arrive as text and are converted by readers registered per
//! [`ValueType`]. Lookups fall back to a registered supertype and remember
//! the answer.

mod error;
mod readers;
mod registry;
mod value;

#[cfg(test)]
mod tests;

pub use error::ReaderError;
pub use readers::{
    ArgumentReader, ByteReader, DoubleReader, EnumReader, FloatReader, IntReader, LongReader,
    ShortReader, StringReader,
};
pub use registry::{ReaderEntry, ReaderRegistry};
pub use value::{Value, ValueType};
