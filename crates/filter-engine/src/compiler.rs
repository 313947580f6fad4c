use crate::{
    argument::FilterArgumentValue,
    error::{CompileError, CompileResult},
    handlers::FilterHandler,
    operation::{OperationId, Quantifier},
    predicate::{FieldAccessor, Predicate},
    schema::{
        FilterSchema,
        definition::{FilterFieldDefinition, FilterInputTypeDefinition},
    },
};
use tracing::{debug, trace};

/// Compiles filter arguments of one root filter type into [`Predicate`]s.
///
/// Cheap to create; all handler lookups go through the resolutions cached on
/// the frozen [`FilterSchema`].
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'s> {
    schema: &'s FilterSchema,
    root: &'s FilterInputTypeDefinition,
}

impl<'s> FilterCompiler<'s> {
    pub(crate) fn new(schema: &'s FilterSchema, root: &'s FilterInputTypeDefinition) -> Self {
        Self { schema, root }
    }

    pub fn root_type(&self) -> &'s str {
        self.root.name()
    }

    /// Compiles one argument value. Either the whole argument compiles or the
    /// first error is returned; there is no partial predicate.
    pub fn compile(&self, argument: &FilterArgumentValue) -> CompileResult<Predicate> {
        debug!(root = self.root.name(), "Compiling filter argument");
        let predicate = self.compile_object(self.root, argument, &FieldAccessor::root(), 1)?;
        debug!(
            root = self.root.name(),
            nodes = predicate.size(),
            "Compiled filter argument"
        );
        Ok(predicate)
    }

    pub fn compile_json(&self, argument: &serde_json::Value) -> CompileResult<Predicate> {
        self.compile(&FilterArgumentValue::from_json(argument))
    }

    /// Compiles every field of an object and joins them with implicit AND.
    fn compile_object(
        &self,
        type_def: &'s FilterInputTypeDefinition,
        argument: &FilterArgumentValue,
        scope: &FieldAccessor,
        depth: usize,
    ) -> CompileResult<Predicate> {
        let max_depth = self.schema.settings().max_depth();
        if depth > max_depth {
            return Err(CompileError::MaxDepthExceeded(max_depth));
        }

        let FilterArgumentValue::Object(fields) = argument else {
            return Err(CompileError::InvalidArgument {
                field: type_def.name().to_string(),
                message: format!("expected an object, got {}", argument.shape()),
            });
        };

        let mut children = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            let unknown = || CompileError::UnknownField {
                type_name: type_def.name().to_string(),
                field: name.clone(),
            };
            let field = type_def.field(name).ok_or_else(unknown)?;
            let handler = self
                .schema
                .handler_for(type_def.name(), name)
                .ok_or_else(unknown)?;

            trace!(type_name = type_def.name(), field = %name, %scope, depth, "Compiling filter field");
            children.push(self.compile_field(type_def, field, handler, value, scope, depth)?);
        }

        Ok(Predicate::and(children))
    }

    fn compile_field(
        &self,
        type_def: &'s FilterInputTypeDefinition,
        field: &FilterFieldDefinition,
        handler: &FilterHandler,
        value: &FilterArgumentValue,
        scope: &FieldAccessor,
        depth: usize,
    ) -> CompileResult<Predicate> {
        match handler {
            FilterHandler::Comparison(h) => h.handle(
                field,
                scope,
                value,
                self.schema.settings().case_insensitive_strings(),
            ),

            // Explicit nulls on structural fields contribute nothing.
            _ if value.is_null() => Ok(Predicate::True),

            FilterHandler::Combinator(h) => {
                let items = match (h.operation(), value) {
                    (OperationId::Not, _) => std::slice::from_ref(value),
                    (_, FilterArgumentValue::List(items)) => items.as_slice(),
                    // A single object stands for a one-element list.
                    (_, single @ FilterArgumentValue::Object(_)) => std::slice::from_ref(single),
                    (_, other) => {
                        return Err(CompileError::InvalidArgument {
                            field: field.name().to_string(),
                            message: format!("expected a list of objects, got {}", other.shape()),
                        });
                    }
                };
                let children = items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| self.compile_object(type_def, item, scope, depth + 1))
                    .collect::<CompileResult<Vec<_>>>()?;
                Ok(h.handle(children))
            }

            FilterHandler::Member(h) => {
                let target = self.referenced_type(field)?;
                self.compile_object(target, value, &h.handle(scope, field), depth + 1)
            }

            FilterHandler::Quantifier(h) if h.quantifier() == Quantifier::Any => {
                let expected = match value {
                    FilterArgumentValue::Scalar(literal) => literal.as_bool(),
                    _ => None,
                };
                expected
                    .map(|expected| h.handle_any(scope, expected))
                    .ok_or_else(|| CompileError::OperandTypeMismatch {
                        field: field.name().to_string(),
                        expected: "Boolean".to_string(),
                        found: value.shape().to_string(),
                    })
            }

            FilterHandler::Quantifier(h) => {
                let element_type = self.referenced_type(field)?;
                let element =
                    self.compile_object(element_type, value, &FieldAccessor::root(), depth + 1)?;
                Ok(h.handle(scope, element))
            }
        }
    }

    fn referenced_type(
        &self,
        field: &FilterFieldDefinition,
    ) -> CompileResult<&'s FilterInputTypeDefinition> {
        let name = field
            .field_type()
            .filter_type()
            .ok_or_else(|| CompileError::InvalidArgument {
                field: field.name().to_string(),
                message: format!("field of type {} has no nested filter", field.field_type()),
            })?;
        self.schema
            .type_definition(name)
            .ok_or_else(|| CompileError::UnknownType(name.to_string()))
    }
}
