#![allow(dead_code)]

use filter_engine::{
    CompilerSettings, FilterInputTypeBuilder, FilterSchema, FilterSchemaBuilder,
    OperationRegistryBuilder, Predicate,
};
use model::records::row::RowData;
use serde_json::{Value as Json, json};

pub const PERSON: &str = "PersonFilterInput";

pub const ANN_ID: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

/// `Person { age: Int, name: String, email: String, score: Decimal,
/// born: Date, id: UUID, joined: DateTime, address: Address { city: String },
/// tags: [String], homes: [Address] }`
pub fn person_schema_with(settings: CompilerSettings) -> FilterSchema {
    let mut builder = FilterSchemaBuilder::new();
    builder.settings(settings);
    builder.with_default_operation_types().unwrap();
    builder
        .add_type(
            FilterInputTypeBuilder::object("AddressFilterInput")
                .member("city", "StringOperationFilterInput"),
        )
        .unwrap()
        .add_type(FilterInputTypeBuilder::list_of(
            "ListAddressFilterInput",
            "AddressFilterInput",
        ))
        .unwrap()
        .add_type(
            FilterInputTypeBuilder::object(PERSON)
                .member("age", "IntOperationFilterInput")
                .member("name", "StringOperationFilterInput")
                .member("email", "StringOperationFilterInput")
                .member("score", "DecimalOperationFilterInput")
                .member("born", "DateOperationFilterInput")
                .member("id", "UUIDOperationFilterInput")
                .member("joined", "DateTimeOperationFilterInput")
                .member("address", "AddressFilterInput")
                .member("tags", "ListStringOperationFilterInput")
                .member("homes", "ListAddressFilterInput"),
        )
        .unwrap();
    builder.build(OperationRegistryBuilder::with_defaults()).unwrap()
}

pub fn person_schema() -> FilterSchema {
    person_schema_with(CompilerSettings::default())
}

pub fn compile(schema: &FilterSchema, filter: Json) -> Predicate {
    schema
        .compiler(PERSON)
        .unwrap()
        .compile_json(&filter)
        .unwrap()
}

pub fn people() -> Vec<RowData> {
    [
        json!({ "age": 17, "name": "Ann", "tags": ["student"], "address": { "city": "Oslo" },
                "homes": [{ "city": "Oslo" }, { "city": "Bergen" }], "born": "2008-03-01",
                "id": ANN_ID, "joined": "2024-01-01T10:00:00Z" }),
        json!({ "age": 18, "name": "Bob", "email": "bob@example.com", "tags": [] }),
        json!({ "age": 25, "name": "Cecile", "email": null, "born": "2000-01-01", "score": 9.5, "tags": ["admin", "staff"],
                "address": { "city": "Paris" }, "homes": [{ "city": "Paris" }] }),
    ]
    .iter()
    .map(|json| RowData::from_json("person", json))
    .collect()
}

/// Ages of the records the predicate keeps, in input order.
pub fn matching_ages(predicate: &Predicate, rows: &[RowData]) -> Vec<i64> {
    predicate
        .filter_rows(rows)
        .into_iter()
        .filter_map(|row| match row.get_value("age") {
            model::core::value::Value::Int(age) => Some(age),
            _ => None,
        })
        .collect()
}
