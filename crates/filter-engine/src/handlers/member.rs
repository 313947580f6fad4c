use crate::{
    predicate::FieldAccessor,
    schema::{
        context::TypeDiscoveryContext,
        definition::{FieldType, FilterFieldDefinition, FilterInputKind},
    },
};

/// Handles fields that step into a record member, e.g. `age` in
/// `{ age: { gt: 18 } }`. The nested object is compiled against the member's
/// filter type with the member appended to the accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MemberHandler;

impl MemberHandler {
    pub fn can_handle(&self, ctx: &TypeDiscoveryContext<'_>, field: &FilterFieldDefinition) -> bool {
        ctx.kind() == FilterInputKind::Object
            && field.operation_id().is_none()
            && field.member_name().is_some()
            && matches!(field.field_type(), FieldType::Filter(_))
    }

    pub fn handle(&self, scope: &FieldAccessor, field: &FilterFieldDefinition) -> FieldAccessor {
        match field.member_name() {
            Some(member) => scope.child(member),
            None => scope.child(field.name()),
        }
    }
}
