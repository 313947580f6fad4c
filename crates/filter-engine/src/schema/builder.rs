use super::{
    FilterSchema, Resolutions,
    context::TypeDiscoveryContext,
    convention,
    definition::{FieldType, FilterFieldDefinition, FilterInputKind, FilterInputTypeDefinition},
};
use crate::{
    error::{SchemaError, SchemaResult},
    operation::OperationId,
    registry::OperationRegistryBuilder,
    settings::CompilerSettings,
};
use model::core::data_type::DataType;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Mutable definition of one filter input type during schema build.
#[derive(Debug, Clone)]
pub struct FilterInputTypeBuilder {
    name: String,
    kind: FilterInputKind,
    fields: Vec<FilterFieldDefinition>,
    error: Option<SchemaError>,
}

impl FilterInputTypeBuilder {
    pub fn new(name: &str, kind: FilterInputKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            fields: Vec::new(),
            error: None,
        }
    }

    /// A record filter with `and`/`or`/`not` already declared.
    pub fn object(name: &str) -> Self {
        Self::new(name, FilterInputKind::Object).combinators()
    }

    pub fn scalar(name: &str, data_type: DataType) -> Self {
        Self::new(name, FilterInputKind::Scalar(data_type))
    }

    pub fn list(name: &str) -> Self {
        Self::new(name, FilterInputKind::List)
    }

    /// A list filter whose `some`/`all`/`none` apply `element_type` to each element.
    pub fn list_of(name: &str, element_type: &str) -> Self {
        Self::list(name).quantifiers(element_type)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn combinators(self) -> Self {
        let own = self.name.clone();
        self.operation(OperationId::And, FieldType::FilterList(own.clone()))
            .operation(OperationId::Or, FieldType::FilterList(own.clone()))
            .operation(OperationId::Not, FieldType::Filter(own))
    }

    pub fn quantifiers(self, element_type: &str) -> Self {
        self.operation(OperationId::Some, FieldType::Filter(element_type.to_string()))
            .operation(OperationId::All, FieldType::Filter(element_type.to_string()))
            .operation(OperationId::None, FieldType::Filter(element_type.to_string()))
            .operation(OperationId::Any, FieldType::Scalar(DataType::Boolean))
    }

    pub fn operation(self, operation: OperationId, field_type: FieldType) -> Self {
        self.field(FilterFieldDefinition::operation(operation, field_type))
    }

    pub fn member(self, name: &str, filter_type: &str) -> Self {
        self.field(FilterFieldDefinition::member(name, filter_type))
    }

    pub fn member_as(self, name: &str, member: &str, filter_type: &str) -> Self {
        self.field(FilterFieldDefinition::member_as(name, member, filter_type))
    }

    /// Adds a field; a duplicate name is reported by [`Self::build`].
    pub fn field(mut self, field: FilterFieldDefinition) -> Self {
        if let Err(e) = self.add_field(field) {
            self.error.get_or_insert(e);
        }
        self
    }

    pub fn add_field(&mut self, field: FilterFieldDefinition) -> SchemaResult<()> {
        if self.fields.iter().any(|f| f.name() == field.name()) {
            return Err(SchemaError::DuplicateField {
                type_name: self.name.clone(),
                field: field.name().to_string(),
            });
        }
        self.fields.push(field);
        Ok(())
    }

    pub fn build(self) -> SchemaResult<FilterInputTypeDefinition> {
        if let Some(e) = self.error {
            return Err(e);
        }
        Ok(FilterInputTypeDefinition::new(self.name, self.kind, self.fields))
    }
}

#[derive(Debug)]
enum TypeSlot {
    Open(FilterInputTypeBuilder),
    Sealed(FilterInputTypeDefinition),
}

/// Owns the filter type graph while the schema is being built. Consumed by
/// [`FilterSchemaBuilder::build`], after which only the frozen [`FilterSchema`]
/// remains.
#[derive(Debug, Default)]
pub struct FilterSchemaBuilder {
    types: Vec<TypeSlot>,
    settings: CompilerSettings,
}

impl FilterSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&mut self, settings: CompilerSettings) -> &mut Self {
        self.settings = settings;
        self
    }

    pub fn add_type(&mut self, ty: FilterInputTypeBuilder) -> SchemaResult<&mut Self> {
        if self.position(ty.name()).is_some() {
            return Err(SchemaError::DuplicateType(ty.name().to_string()));
        }
        debug!(type_name = ty.name(), "Declared filter input type");
        self.types.push(TypeSlot::Open(ty));
        Ok(self)
    }

    /// Declares the operation and list filter input types of the default
    /// convention for every [`DataType`].
    pub fn with_default_operation_types(&mut self) -> SchemaResult<&mut Self> {
        for data_type in DataType::ALL {
            self.add_type(convention::operation_type(data_type))?;
            self.add_type(convention::list_type(data_type))?;
        }
        Ok(self)
    }

    /// Adds a field to a type that has not been sealed yet.
    pub fn extend_type(
        &mut self,
        type_name: &str,
        field: FilterFieldDefinition,
    ) -> SchemaResult<&mut Self> {
        let index = self
            .position(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))?;

        match &mut self.types[index] {
            TypeSlot::Open(builder) => builder.add_field(field)?,
            TypeSlot::Sealed(_) => {
                warn!(
                    type_name = type_name,
                    field = field.name(),
                    "Attempt to extend a sealed type"
                );
                return Err(SchemaError::SchemaFrozen(type_name.to_string()));
            }
        }
        Ok(self)
    }

    /// Seals a type. Sealing twice is a no-op.
    pub fn seal_type(&mut self, type_name: &str) -> SchemaResult<&mut Self> {
        let index = self
            .position(type_name)
            .ok_or_else(|| SchemaError::UnknownType(type_name.to_string()))?;
        Self::seal_slot(&mut self.types[index])?;
        Ok(self)
    }

    /// Seals the remaining types, validates type references, freezes the
    /// registry and resolves every field to exactly one handler.
    pub fn build(mut self, registry: OperationRegistryBuilder) -> SchemaResult<FilterSchema> {
        for slot in &mut self.types {
            Self::seal_slot(slot)?;
        }

        let types = self
            .types
            .into_iter()
            .filter_map(|slot| match slot {
                TypeSlot::Sealed(def) => Some((def.name().to_string(), def)),
                TypeSlot::Open(_) => None,
            })
            .collect::<HashMap<_, _>>();

        for def in types.values() {
            for field in def.fields() {
                if let Some(referenced) = field.field_type().filter_type()
                    && !types.contains_key(referenced)
                {
                    warn!(
                        type_name = def.name(),
                        field = field.name(),
                        referenced = referenced,
                        "Field refers to an undeclared filter input type"
                    );
                    return Err(SchemaError::UnknownType(referenced.to_string()));
                }
            }
        }

        let registry = registry.freeze()?;

        let mut resolutions = Resolutions::new();
        for def in types.values() {
            let ctx = TypeDiscoveryContext::new(def);
            let fields = def
                .fields()
                .iter()
                .map(|field| {
                    registry
                        .resolve(&ctx, field)
                        .map(|id| (field.name().to_string(), id))
                })
                .collect::<SchemaResult<HashMap<_, _>>>()?;
            resolutions.insert(def.name().to_string(), fields);
        }

        debug!(
            types = types.len(),
            handlers = registry.len(),
            resolutions = resolutions.values().map(HashMap::len).sum::<usize>(),
            "Filter schema built"
        );

        Ok(FilterSchema::new(types, registry, resolutions, self.settings))
    }

    fn position(&self, type_name: &str) -> Option<usize> {
        self.types.iter().position(|slot| match slot {
            TypeSlot::Open(builder) => builder.name() == type_name,
            TypeSlot::Sealed(def) => def.name() == type_name,
        })
    }

    fn seal_slot(slot: &mut TypeSlot) -> SchemaResult<()> {
        if let TypeSlot::Open(builder) = slot {
            let def = builder.clone().build()?;
            debug!(type_name = def.name(), fields = def.fields().len(), "Sealed filter input type");
            *slot = TypeSlot::Sealed(def);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_type() -> FilterInputTypeBuilder {
        FilterInputTypeBuilder::object("PersonFilterInput")
            .member("age", "IntOperationFilterInput")
            .member("name", "StringOperationFilterInput")
    }

    #[test]
    fn test_object_builder_declares_combinators() {
        let def = person_type().build().unwrap();
        assert_eq!(def.kind(), FilterInputKind::Object);
        let names: Vec<_> = def.fields().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["and", "or", "not", "age", "name"]);
        assert_eq!(
            def.field("and").map(|f| f.field_type().clone()),
            Some(FieldType::FilterList("PersonFilterInput".to_string()))
        );
    }

    #[test]
    fn test_duplicate_field_is_rejected() {
        let result = person_type().member("age", "IntOperationFilterInput").build();
        assert_eq!(
            result,
            Err(SchemaError::DuplicateField {
                type_name: "PersonFilterInput".to_string(),
                field: "age".to_string(),
            })
        );
    }

    #[test]
    fn test_sealing_reports_duplicate_field() {
        let mut builder = FilterSchemaBuilder::new();
        builder
            .add_type(person_type().member("name", "StringOperationFilterInput"))
            .unwrap();
        assert_eq!(
            builder.seal_type("PersonFilterInput").err(),
            Some(SchemaError::DuplicateField {
                type_name: "PersonFilterInput".to_string(),
                field: "name".to_string(),
            })
        );
    }

    #[test]
    fn test_duplicate_type_is_rejected() {
        let mut builder = FilterSchemaBuilder::new();
        builder.add_type(person_type()).unwrap();
        let result = builder.add_type(person_type());
        assert!(matches!(result, Err(SchemaError::DuplicateType(_))));
    }

    #[test]
    fn test_extend_open_type() {
        let mut builder = FilterSchemaBuilder::new();
        builder.add_type(person_type()).unwrap();
        builder
            .extend_type(
                "PersonFilterInput",
                FilterFieldDefinition::member("email", "StringOperationFilterInput"),
            )
            .unwrap();
        builder.with_default_operation_types().unwrap();

        let schema = builder.build(OperationRegistryBuilder::with_defaults()).unwrap();
        let def = schema.type_definition("PersonFilterInput").unwrap();
        assert!(def.field("email").is_some());
    }

    #[test]
    fn test_extend_sealed_type_fails() {
        let mut builder = FilterSchemaBuilder::new();
        builder.add_type(person_type()).unwrap();
        builder.seal_type("PersonFilterInput").unwrap();

        let result = builder.extend_type(
            "PersonFilterInput",
            FilterFieldDefinition::member("email", "StringOperationFilterInput"),
        );
        assert_eq!(
            result.err(),
            Some(SchemaError::SchemaFrozen("PersonFilterInput".to_string()))
        );
    }

    #[test]
    fn test_extend_unknown_type_fails() {
        let mut builder = FilterSchemaBuilder::new();
        let result = builder.extend_type(
            "Missing",
            FilterFieldDefinition::member("x", "IntOperationFilterInput"),
        );
        assert!(matches!(result, Err(SchemaError::UnknownType(_))));
    }

    #[test]
    fn test_dangling_reference_fails_build() {
        let mut builder = FilterSchemaBuilder::new();
        builder.add_type(person_type()).unwrap();
        let result = builder.build(OperationRegistryBuilder::with_defaults());
        assert!(matches!(result, Err(SchemaError::UnknownType(_))));
    }
}
