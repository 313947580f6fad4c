use super::definition::{FilterFieldDefinition, FilterInputKind, FilterInputTypeDefinition};

/// Read-only view of the filter input type a handler is being probed for.
/// It only exists for sealed definitions, so it has nothing to mutate.
#[derive(Debug, Clone, Copy)]
pub struct TypeDiscoveryContext<'a> {
    type_def: &'a FilterInputTypeDefinition,
}

impl<'a> TypeDiscoveryContext<'a> {
    pub fn new(type_def: &'a FilterInputTypeDefinition) -> Self {
        Self { type_def }
    }

    pub fn type_definition(&self) -> &'a FilterInputTypeDefinition {
        self.type_def
    }

    pub fn type_name(&self) -> &'a str {
        self.type_def.name()
    }

    pub fn kind(&self) -> FilterInputKind {
        self.type_def.kind()
    }

    pub fn fields(&self) -> &'a [FilterFieldDefinition] {
        self.type_def.fields()
    }

    pub fn field(&self, name: &str) -> Option<&'a FilterFieldDefinition> {
        self.type_def.field(name)
    }
}
