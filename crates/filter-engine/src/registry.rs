use crate::{
    error::{SchemaError, SchemaResult},
    handlers::{FilterHandler, HandlerDescriptor, HandlerTarget},
    operation::OperationId,
    schema::{context::TypeDiscoveryContext, convention, definition::FilterFieldDefinition},
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Index of a handler inside a frozen [`OperationRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(usize);

/// Collects handlers during schema build.
#[derive(Debug, Default)]
pub struct OperationRegistryBuilder {
    handlers: Vec<FilterHandler>,
}

impl OperationRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder pre-populated with the default convention's handlers.
    pub fn with_defaults() -> Self {
        let mut builder = Self::new();
        for handler in convention::default_handlers() {
            builder.register(handler);
        }
        builder
    }

    pub fn register(&mut self, handler: impl Into<FilterHandler>) -> &mut Self {
        let handler = handler.into();
        debug!(%handler, "Registered filter handler");
        self.handlers.push(handler);
        self
    }

    /// Registers the handler that serves `operation` on `target`.
    pub fn register_operation(
        &mut self,
        operation: OperationId,
        target: HandlerTarget,
    ) -> SchemaResult<&mut Self> {
        let descriptor = HandlerDescriptor {
            target,
            operation: Some(operation),
        };
        let handler = FilterHandler::from_descriptor(descriptor).ok_or_else(|| {
            SchemaError::UnsupportedOperation {
                type_name: descriptor.to_string(),
                field: operation.field_name().to_string(),
            }
        })?;
        Ok(self.register(handler))
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Freezes the registry. Two handlers registered under the same descriptor
    /// can never both be resolvable, so they fail here rather than on first use.
    pub fn freeze(self) -> SchemaResult<OperationRegistry> {
        let mut seen: HashMap<HandlerDescriptor, &FilterHandler> = HashMap::new();
        for handler in &self.handlers {
            let descriptor = handler.descriptor();
            if let Some(existing) = seen.insert(descriptor, handler) {
                warn!(%descriptor, "Duplicate filter handler registration");
                return Err(SchemaError::RegistrationConflict {
                    type_name: target_name(descriptor.target),
                    field: descriptor
                        .operation
                        .map(|op| op.field_name().to_string())
                        .unwrap_or_default(),
                    handlers: vec![existing.to_string(), handler.to_string()],
                });
            }
        }

        debug!(handlers = self.handlers.len(), "Operation registry frozen");
        Ok(OperationRegistry {
            handlers: self.handlers,
        })
    }
}

/// Immutable handler table, shared by every compilation once the schema is built.
#[derive(Debug)]
pub struct OperationRegistry {
    handlers: Vec<FilterHandler>,
}

impl OperationRegistry {
    /// Returns the one handler whose capability check accepts `field` in `ctx`.
    pub fn resolve(
        &self,
        ctx: &TypeDiscoveryContext<'_>,
        field: &FilterFieldDefinition,
    ) -> SchemaResult<HandlerId> {
        let matches = self
            .handlers
            .iter()
            .enumerate()
            .filter(|(_, handler)| handler.can_handle(ctx, field))
            .map(|(index, _)| index)
            .collect::<Vec<_>>();

        match matches.as_slice() {
            [index] => {
                debug!(
                    type_name = ctx.type_name(),
                    field = field.name(),
                    handler = %self.handlers[*index],
                    "Resolved filter handler"
                );
                Ok(HandlerId(*index))
            }
            [] => {
                warn!(
                    type_name = ctx.type_name(),
                    field = field.name(),
                    "No filter handler supports field"
                );
                Err(SchemaError::UnsupportedOperation {
                    type_name: ctx.type_name().to_string(),
                    field: field.name().to_string(),
                })
            }
            many => {
                let handlers = many
                    .iter()
                    .map(|index| self.handlers[*index].to_string())
                    .collect::<Vec<_>>();
                warn!(
                    type_name = ctx.type_name(),
                    field = field.name(),
                    ?handlers,
                    "Several filter handlers claim field"
                );
                Err(SchemaError::RegistrationConflict {
                    type_name: ctx.type_name().to_string(),
                    field: field.name().to_string(),
                    handlers,
                })
            }
        }
    }

    pub fn handler(&self, id: HandlerId) -> &FilterHandler {
        &self.handlers[id.0]
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

fn target_name(target: HandlerTarget) -> String {
    match target {
        HandlerTarget::Boolean => "BooleanFilterInput".to_string(),
        HandlerTarget::Scalar(data_type) => convention::operation_type_name(data_type),
        HandlerTarget::Member => "ObjectFilterInput".to_string(),
        HandlerTarget::List => "ListFilterInput".to_string(),
    }
}
