use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use tracing::{debug, trace};

use crate::command::Locale;

use super::{
    ArgumentReader, ReaderError, Value, ValueType,
    readers::{
        ByteReader, DoubleReader, FloatReader, IntReader, LongReader, ShortReader, StringReader,
    },
};

/// A registered converter together with the identity of its concrete type.
#[derive(Debug, Clone)]
pub struct ReaderEntry {
    id: TypeId,
    reader: Arc<dyn ArgumentReader>,
}

impl ReaderEntry {
    /// The converter.
    pub fn reader(&self) -> &Arc<dyn ArgumentReader> {
        &self.reader
    }

    /// Identity of the converter's concrete type.
    pub fn id(&self) -> TypeId {
        self.id
    }
}

#[derive(Debug, Default)]
struct ReaderTable {
    by_type: HashMap<ValueType, ReaderEntry>,
    by_reader: HashMap<TypeId, ReaderEntry>,
}

/// Registry mapping value types to the readers that produce them.
///
/// One instance is built at startup and shared by `Arc` with everything that
/// parses arguments. Reads vastly outnumber writes; the only write after
/// startup is the memoization of a subtype lookup.
#[derive(Debug, Default)]
pub struct ReaderRegistry {
    table: RwLock<ReaderTable>,
}

impl ReaderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in integer, floating point and
    /// string readers.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(ByteReader, &[ValueType::BYTE]);
        registry.register(ShortReader, &[ValueType::SHORT]);
        registry.register(IntReader, &[ValueType::INT]);
        registry.register(LongReader, &[ValueType::LONG]);
        registry.register(FloatReader, &[ValueType::FLOAT]);
        registry.register(DoubleReader, &[ValueType::DOUBLE]);
        registry.register(StringReader, &[ValueType::STRING]);
        registry
    }

    /// Registers `reader` for every type in `types`.
    ///
    /// The reader is also recorded under its own identity so it can be looked
    /// up or removed by concrete reader type.
    pub fn register<R: ArgumentReader + 'static>(&self, reader: R, types: &[ValueType]) {
        let entry = ReaderEntry {
            id: TypeId::of::<R>(),
            reader: Arc::new(reader),
        };

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        for ty in types {
            debug!(value_type = ty.name(), "Registering argument reader");
            table.by_type.insert(*ty, entry.clone());
        }
        table.by_reader.insert(entry.id, entry);
    }

    /// The reader registered exactly for `ty`, without subtype fallback.
    pub fn get(&self, ty: &ValueType) -> Option<Arc<dyn ArgumentReader>> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table.by_type.get(ty).map(|entry| entry.reader.clone())
    }

    /// The reader registered under the concrete reader type `R`.
    pub fn get_by_reader<R: ArgumentReader + 'static>(&self) -> Option<Arc<dyn ArgumentReader>> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .by_reader
            .get(&TypeId::of::<R>())
            .map(|entry| entry.reader.clone())
    }

    /// Resolves the reader for `ty`.
    ///
    /// On a miss the registered types are scanned for a supertype of `ty`; a
    /// hit is stored under `ty` so the scan runs at most once per type.
    pub fn resolve(&self, ty: &ValueType) -> Option<Arc<dyn ArgumentReader>> {
        if let Some(reader) = self.get(ty) {
            return Some(reader);
        }

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = table.by_type.get(ty) {
            return Some(entry.reader.clone());
        }

        let inherited = table
            .by_type
            .iter()
            .find(|(registered, _)| ty.is_subtype_of(registered))
            .map(|(registered, entry)| (*registered, entry.clone()))?;

        trace!(
            value_type = ty.name(),
            supertype = inherited.0.name(),
            "Memoizing reader resolved through supertype"
        );
        let reader = inherited.1.reader.clone();
        table.by_type.insert(*ty, inherited.1);
        Some(reader)
    }

    /// Whether some reader can handle `ty`.
    pub fn has_reader(&self, ty: &ValueType) -> bool {
        self.resolve(ty).is_some()
    }

    /// Removes the entry for `ty` only. The reader stays registered for its
    /// other types.
    pub fn remove_type(&self, ty: &ValueType) {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.by_type.remove(ty);
    }

    /// Removes the reader of concrete type `R`: its identity entry and every
    /// type entry it serves, memoized ones included.
    pub fn remove_reader<R: ArgumentReader + 'static>(&self) {
        let id = TypeId::of::<R>();
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        table.by_type.retain(|_, entry| entry.id != id);
        table.by_reader.remove(&id);
    }

    /// Converts `input` into a value of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns a [`ReaderError`] if no reader handles `ty` or the reader
    /// rejects the input.
    pub fn read(&self, ty: &ValueType, input: &str, locale: &Locale) -> Result<Value, ReaderError> {
        let reader = self.resolve(ty).ok_or_else(|| {
            ReaderError::new(format!("No reader found for {}!", ty.name()), input)
        })?;
        reader.read(input, locale)
    }

    /// Static suggestions of the reader handling `ty`.
    pub fn suggestions(&self, ty: &ValueType) -> Vec<String> {
        self.resolve(ty)
            .map(|reader| reader.suggestions())
            .unwrap_or_default()
    }
}
