pub mod builder;
pub mod context;
pub mod convention;
pub mod definition;

use crate::{
    compiler::FilterCompiler,
    error::{CompileError, CompileResult},
    handlers::FilterHandler,
    registry::{HandlerId, OperationRegistry},
    settings::CompilerSettings,
};
use context::TypeDiscoveryContext;
use definition::FilterInputTypeDefinition;
use std::collections::HashMap;

/// Handler resolutions keyed by type name, then field name.
pub(crate) type Resolutions = HashMap<String, HashMap<String, HandlerId>>;

/// Frozen filter schema: the type graph, the registry and the per-field handler
/// resolutions computed at build time. Read-only and shareable across threads.
#[derive(Debug)]
pub struct FilterSchema {
    types: HashMap<String, FilterInputTypeDefinition>,
    registry: OperationRegistry,
    resolutions: Resolutions,
    settings: CompilerSettings,
}

impl FilterSchema {
    pub(crate) fn new(
        types: HashMap<String, FilterInputTypeDefinition>,
        registry: OperationRegistry,
        resolutions: Resolutions,
        settings: CompilerSettings,
    ) -> Self {
        Self {
            types,
            registry,
            resolutions,
            settings,
        }
    }

    pub fn type_definition(&self, name: &str) -> Option<&FilterInputTypeDefinition> {
        self.types.get(name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn context(&self, name: &str) -> Option<TypeDiscoveryContext<'_>> {
        self.type_definition(name).map(TypeDiscoveryContext::new)
    }

    pub fn settings(&self) -> &CompilerSettings {
        &self.settings
    }

    /// Handler resolved for `field` of `type_name` when the schema was built.
    pub fn handler_for(&self, type_name: &str, field: &str) -> Option<&FilterHandler> {
        self.resolutions
            .get(type_name)
            .and_then(|fields| fields.get(field))
            .map(|id| self.registry.handler(*id))
    }

    /// A compiler for arguments of the named root filter type.
    pub fn compiler(&self, type_name: &str) -> CompileResult<FilterCompiler<'_>> {
        let root = self
            .type_definition(type_name)
            .ok_or_else(|| CompileError::UnknownType(type_name.to_string()))?;
        Ok(FilterCompiler::new(self, root))
    }
}
