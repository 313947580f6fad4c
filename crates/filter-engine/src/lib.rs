pub mod argument;
pub mod compiler;
pub mod error;
pub mod handlers;
pub mod operation;
pub mod predicate;
pub mod registry;
pub mod schema;
pub mod settings;

pub use argument::FilterArgumentValue;
pub use compiler::FilterCompiler;
pub use error::{CompileError, CompileResult, LowerError, SchemaError, SchemaResult};
pub use handlers::{FilterHandler, HandlerDescriptor, HandlerTarget};
pub use operation::{ComparisonOp, OperationFamily, OperationId, Quantifier};
pub use predicate::{
    FieldAccessor, Predicate, PredicateLowering,
    sql::{Dialect, MySql, Postgres, SqlFilter, SqlLowering},
};
pub use registry::{HandlerId, OperationRegistry, OperationRegistryBuilder};
pub use schema::{
    FilterSchema,
    builder::{FilterInputTypeBuilder, FilterSchemaBuilder},
    context::TypeDiscoveryContext,
    definition::{FieldType, FilterFieldDefinition, FilterInputKind, FilterInputTypeDefinition},
};
pub use settings::{CompilerSettings, CompilerSettingsBuilder};
