use crate::operation::OperationId;
use model::core::data_type::DataType;
use std::fmt;

/// Shape of a filter input type, used by handlers to decide what they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterInputKind {
    /// Filters a record through its members; carries `and`/`or`/`not`.
    Object,
    /// Operators over a single runtime type, e.g. `IntOperationFilterInput`.
    Scalar(DataType),
    /// Quantifiers over a list member.
    List,
}

impl FilterInputKind {
    pub fn accepts_combinators(&self) -> bool {
        matches!(self, FilterInputKind::Object | FilterInputKind::Scalar(_))
    }
}

impl fmt::Display for FilterInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterInputKind::Object => f.write_str("Object"),
            FilterInputKind::Scalar(data_type) => write!(f, "Scalar({data_type})"),
            FilterInputKind::List => f.write_str("List"),
        }
    }
}

/// Declared type of the value a filter field accepts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    Scalar(DataType),
    ScalarList(DataType),
    /// A nested filter object of the named input type.
    Filter(String),
    /// A list of filter objects of the named input type.
    FilterList(String),
}

impl FieldType {
    /// Name of the filter input type this field refers to, if any.
    pub fn filter_type(&self) -> Option<&str> {
        match self {
            FieldType::Filter(name) | FieldType::FilterList(name) => Some(name),
            FieldType::Scalar(_) | FieldType::ScalarList(_) => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(data_type) => write!(f, "{data_type}"),
            FieldType::ScalarList(data_type) => write!(f, "[{data_type}]"),
            FieldType::Filter(name) => f.write_str(name),
            FieldType::FilterList(name) => write!(f, "[{name}]"),
        }
    }
}

/// One field of a filter input type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterFieldDefinition {
    name: String,
    operation: Option<OperationId>,
    field_type: FieldType,
    member: Option<String>,
}

impl FilterFieldDefinition {
    /// An operation field, named after its operation (`eq`, `and`, `some`, ...).
    pub fn operation(operation: OperationId, field_type: FieldType) -> Self {
        Self {
            name: operation.field_name().to_string(),
            operation: Some(operation),
            field_type,
            member: None,
        }
    }

    /// A field that filters the record member of the same name.
    pub fn member(name: &str, filter_type: &str) -> Self {
        Self::member_as(name, name, filter_type)
    }

    /// A field exposed as `name` that reads the record member `member`.
    pub fn member_as(name: &str, member: &str, filter_type: &str) -> Self {
        Self {
            name: name.to_string(),
            operation: None,
            field_type: FieldType::Filter(filter_type.to_string()),
            member: Some(member.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation_id(&self) -> Option<OperationId> {
        self.operation
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn member_name(&self) -> Option<&str> {
        self.member.as_deref()
    }
}

/// Schema-level shape of a filter argument type. Immutable once built and
/// shared read-only by every compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterInputTypeDefinition {
    name: String,
    kind: FilterInputKind,
    fields: Vec<FilterFieldDefinition>,
}

impl FilterInputTypeDefinition {
    pub(crate) fn new(name: String, kind: FilterInputKind, fields: Vec<FilterFieldDefinition>) -> Self {
        Self { name, kind, fields }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FilterInputKind {
        self.kind
    }

    pub fn fields(&self) -> &[FilterFieldDefinition] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FilterFieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}
