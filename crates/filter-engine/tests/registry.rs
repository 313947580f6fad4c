mod common;

use filter_engine::{
    CompilerSettingsBuilder, FilterHandler, FilterInputTypeBuilder, FilterSchemaBuilder,
    HandlerTarget, OperationId, OperationRegistryBuilder, SchemaError,
    handlers::{combinator::CombinatorHandler, comparison::ComparisonHandler},
    schema::definition::FilterFieldDefinition,
};
use model::core::data_type::DataType;
use tracing_test::traced_test;

fn person_type() -> FilterInputTypeBuilder {
    FilterInputTypeBuilder::object(common::PERSON).member("age", "IntOperationFilterInput")
}

#[test]
#[traced_test]
fn test_two_and_handlers_fail_schema_build() {
    let mut registry = OperationRegistryBuilder::with_defaults();
    registry.register(CombinatorHandler::AND);

    let mut builder = FilterSchemaBuilder::new();
    builder.with_default_operation_types().unwrap();
    builder.add_type(person_type()).unwrap();

    let Err(SchemaError::RegistrationConflict { handlers, .. }) = builder.build(registry) else {
        panic!("expected a registration conflict");
    };
    assert!(handlers.iter().all(|h| h == "Combinator(Boolean.and)"));
    assert!(logs_contain("Duplicate filter handler registration"));
}

#[test]
fn test_field_without_handler_fails_schema_build() {
    let mut registry = OperationRegistryBuilder::new();
    registry
        .register(CombinatorHandler::AND)
        .register(CombinatorHandler::OR)
        .register(CombinatorHandler::NOT);

    let mut builder = FilterSchemaBuilder::new();
    builder
        .add_type(
            FilterInputTypeBuilder::scalar("IntOperationFilterInput", DataType::Int)
                .combinators()
                .operation(OperationId::Gt, filter_engine::FieldType::Scalar(DataType::Int)),
        )
        .unwrap();

    assert_eq!(
        builder.build(registry).err(),
        Some(SchemaError::UnsupportedOperation {
            type_name: "IntOperationFilterInput".to_string(),
            field: "gt".to_string(),
        })
    );
}

#[test]
fn test_misdeclared_operand_type_fails_schema_build() {
    let mut builder = FilterSchemaBuilder::new();
    builder
        .add_type(
            FilterInputTypeBuilder::scalar("IntOperationFilterInput", DataType::Int)
                .combinators()
                .operation(OperationId::Eq, filter_engine::FieldType::Scalar(DataType::String)),
        )
        .unwrap();

    assert_eq!(
        builder.build(OperationRegistryBuilder::with_defaults()).err(),
        Some(SchemaError::UnsupportedOperation {
            type_name: "IntOperationFilterInput".to_string(),
            field: "eq".to_string(),
        })
    );
}

#[test]
fn test_extension_operator_through_registration_contract() {
    // A Boolean filter that also orders values: neither the type nor the
    // handler exist in the default convention.
    let mut registry = OperationRegistryBuilder::new();
    registry
        .register_operation(OperationId::Gt, HandlerTarget::scalar("Boolean").unwrap())
        .unwrap()
        .register_operation(OperationId::Eq, HandlerTarget::Scalar(DataType::Boolean))
        .unwrap();

    let mut builder = FilterSchemaBuilder::new();
    builder
        .add_type(
            FilterInputTypeBuilder::scalar("OrderedBooleanFilterInput", DataType::Boolean)
                .operation(OperationId::Eq, filter_engine::FieldType::Scalar(DataType::Boolean))
                .operation(OperationId::Gt, filter_engine::FieldType::Scalar(DataType::Boolean)),
        )
        .unwrap();
    let schema = builder.build(registry).unwrap();

    assert_eq!(
        schema.handler_for("OrderedBooleanFilterInput", "gt"),
        Some(&FilterHandler::from(
            ComparisonHandler::new(OperationId::Gt, DataType::Boolean).unwrap()
        ))
    );
    let predicate = schema
        .compiler("OrderedBooleanFilterInput")
        .unwrap()
        .compile_json(&serde_json::json!({ "gt": false }))
        .unwrap();
    assert!(predicate.matches_value(&model::core::value::Value::Boolean(true)));
    assert!(!predicate.matches_value(&model::core::value::Value::Boolean(false)));
}

#[test]
#[traced_test]
fn test_sealed_type_rejects_new_fields() {
    let mut builder = FilterSchemaBuilder::new();
    builder.with_default_operation_types().unwrap();
    builder.add_type(person_type()).unwrap();
    builder
        .extend_type(common::PERSON, FilterFieldDefinition::member("name", "StringOperationFilterInput"))
        .unwrap();
    builder.seal_type(common::PERSON).unwrap();

    let result = builder.extend_type(
        common::PERSON,
        FilterFieldDefinition::member("email", "StringOperationFilterInput"),
    );
    assert_eq!(
        result.err(),
        Some(SchemaError::SchemaFrozen(common::PERSON.to_string()))
    );
    assert!(logs_contain("Attempt to extend a sealed type"));

    let schema = builder.build(OperationRegistryBuilder::with_defaults()).unwrap();
    assert!(schema.handler_for(common::PERSON, "name").is_some());
    assert!(schema.handler_for(common::PERSON, "email").is_none());
}

#[test]
fn test_settings_are_fixed_on_the_schema() {
    let settings = CompilerSettingsBuilder::new().max_depth(4).build().unwrap();
    let schema = common::person_schema_with(settings.clone());
    assert_eq!(schema.settings(), &settings);

    assert!(matches!(
        CompilerSettingsBuilder::new().max_depth(0).build(),
        Err(SchemaError::InvalidSettings(_))
    ));
}

#[test]
fn test_schema_compiles_concurrently() {
    let schema = common::person_schema();
    std::thread::scope(|scope| {
        for age in [17, 18, 25] {
            let schema = &schema;
            scope.spawn(move || {
                let predicate = common::compile(schema, serde_json::json!({ "age": { "eq": age } }));
                assert_eq!(common::matching_ages(&predicate, &common::people()), vec![age]);
            });
        }
    });
}
