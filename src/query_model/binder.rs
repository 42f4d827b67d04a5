use crate::edm_model::{EdmModel, EdmPropertyType, EntityType, PrimitiveKind};
use crate::odata_parser::ast::{
    ExpandItem, Expression, Literal, OrderByItem, SelectItem as RawSelectItem,
};
use crate::odata_parser::ODataParseError;

use super::ast::{FilterNode, OrderByClause, SelectClause, SelectItem};

/// Resolves raw AST names against the model and types the result.
pub(crate) struct Binder<'m> {
    model: &'m EdmModel,
    entity_type: &'m EntityType,
}

impl<'m> Binder<'m> {
    pub(crate) fn new(model: &'m EdmModel, entity_type: &'m EntityType) -> Self {
        Self { model, entity_type }
    }

    pub(crate) fn bind_filter(&self, expression: &Expression<'_>) -> Result<FilterNode, ODataParseError> {
        let (node, _) = self.bind_expression(expression)?;
        Ok(node)
    }

    pub(crate) fn bind_select(
        &self,
        select: Option<&[RawSelectItem<'_>]>,
        expand: Option<&[ExpandItem<'_>]>,
    ) -> Result<SelectClause, ODataParseError> {
        // No `$select` (expand alone) keeps everything selected, as does `*`.
        let all_selected = match select {
            None => true,
            Some(items) => items.iter().any(|item| matches!(item, RawSelectItem::Star)),
        };

        let mut items = Vec::new();
        for item in select.into_iter().flatten() {
            if let RawSelectItem::Path(segments) = item {
                let (path, _) = self.resolve_path(segments)?;
                items.push(SelectItem::Path(path));
            }
        }
        for item in expand.into_iter().flatten() {
            let (path, _) = self.resolve_path(&item.path)?;
            items.push(SelectItem::Expand { path });
        }

        Ok(SelectClause {
            all_selected,
            items,
        })
    }

    pub(crate) fn bind_order_by(
        &self,
        items: &[OrderByItem<'_>],
    ) -> Result<Option<OrderByClause>, ODataParseError> {
        let mut clause: Option<OrderByClause> = None;
        for item in items.iter().rev() {
            let (path, _) = self.resolve_path(&item.path)?;
            clause = Some(OrderByClause {
                property: path.join("."),
                direction: item.direction,
                then_by: clause.map(Box::new),
            });
        }
        Ok(clause)
    }

    fn bind_expression(
        &self,
        expression: &Expression<'_>,
    ) -> Result<(FilterNode, Option<PrimitiveKind>), ODataParseError> {
        match expression {
            Expression::Binary {
                operator,
                left,
                right,
            } => {
                let (mut left_node, left_kind) = self.bind_expression(left)?;
                let (mut right_node, right_kind) = self.bind_expression(right)?;
                if operator.is_comparison() {
                    right_node = promote(right_node, left_kind);
                    left_node = promote(left_node, right_kind);
                }
                Ok((
                    FilterNode::BinaryOperator {
                        operator: *operator,
                        left: Box::new(left_node),
                        right: Box::new(right_node),
                    },
                    None,
                ))
            }
            Expression::PropertyPath(segments) => {
                let (path, kind) = self.resolve_path(segments)?;
                Ok((
                    FilterNode::PropertyAccess {
                        property: path.join("."),
                    },
                    kind,
                ))
            }
            Expression::Literal(literal) => {
                let kind = literal.primitive_kind();
                Ok((
                    FilterNode::Constant {
                        value: literal.clone(),
                        edm_type: kind,
                    },
                    kind,
                ))
            }
            Expression::FunctionCall { name, arguments } => {
                let arguments = arguments
                    .iter()
                    .map(|argument| self.bind_expression(argument).map(|(node, _)| node))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((
                    FilterNode::FunctionCall {
                        name: name.to_string(),
                        arguments,
                    },
                    None,
                ))
            }
        }
    }

    /// Resolve a raw property path against the entity type, climbing base
    /// chains per segment and traversing entity-typed properties for nested
    /// segments. Returns the post-policy segments and, when the path ends in
    /// a primitive property, its kind.
    fn resolve_path(
        &self,
        segments: &[&str],
    ) -> Result<(Vec<String>, Option<PrimitiveKind>), ODataParseError> {
        let mut current = self.entity_type;
        let mut resolved = Vec::with_capacity(segments.len());
        let mut kind = None;

        for (index, segment) in segments.iter().enumerate() {
            let property = self.model.resolve_property(current, segment).ok_or_else(|| {
                ODataParseError::UnknownProperty {
                    property: segment.to_string(),
                    entity_type: current.qualified_name(),
                }
            })?;
            resolved.push(property.name.clone());

            let last = index + 1 == segments.len();
            match &property.property_type {
                EdmPropertyType::Primitive(primitive) => {
                    if !last {
                        return Err(ODataParseError::InvalidPropertyPath {
                            path: segments.join("/"),
                        });
                    }
                    kind = Some(*primitive);
                }
                EdmPropertyType::Entity(qualified) => {
                    if !last {
                        current = self.model.find_entity_type(qualified).ok_or_else(|| {
                            ODataParseError::UnknownProperty {
                                property: segment.to_string(),
                                entity_type: qualified.clone(),
                            }
                        })?;
                    }
                }
            }
        }

        Ok((resolved, kind))
    }
}

/// Wrap a constant in a conversion node when its literal needs promotion to
/// the compared property's primitive kind.
fn promote(node: FilterNode, target: Option<PrimitiveKind>) -> FilterNode {
    let Some(target) = target else {
        return node;
    };
    let needs_convert = match &node {
        FilterNode::Constant {
            value: Literal::Date(_),
            ..
        } => target == PrimitiveKind::DateTimeOffset,
        FilterNode::Constant {
            value: Literal::Integer(_),
            ..
        } => matches!(
            target,
            PrimitiveKind::Single | PrimitiveKind::Double | PrimitiveKind::Decimal
        ),
        _ => false,
    };
    if needs_convert {
        FilterNode::Convert {
            source: Box::new(node),
        }
    } else {
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edm_model::{
        EdmModelBuilder, EdmModelBuilderOptions, PropertyNamingPolicy, ScalarKind, TypeDescription,
    };
    use crate::odata_parser::parse_filter_expression;

    fn model() -> EdmModel {
        let person = TypeDescription::build("Tests", "Person")
            .property("Id", ScalarKind::Guid)
            .property("FirstName", ScalarKind::String)
            .property("DateOfBirth", ScalarKind::DateTime)
            .property("Salary", ScalarKind::F64)
            .finish();
        let employee = TypeDescription::build("Tests", "Employee")
            .base(&person)
            .complex_property("Manager", &person)
            .finish();
        EdmModelBuilder::with_options(EdmModelBuilderOptions {
            naming_policy: PropertyNamingPolicy::CamelCase,
        })
        .add_keyed_entity_type(&person, "Id", "persons")
        .add_keyed_entity_type(&employee, "Id", "employees")
        .build()
        .unwrap()
    }

    fn binder_for<'m>(model: &'m EdmModel, set: &str) -> Binder<'m> {
        Binder::new(model, model.find_entity_set(set).unwrap())
    }

    #[test]
    fn binds_date_comparison_with_convert_wrapper() {
        let model = model();
        let binder = binder_for(&model, "persons");
        let raw = parse_filter_expression("dateOfBirth lt 1980-01-01").unwrap();
        let bound = binder.bind_filter(&raw).unwrap();

        let FilterNode::BinaryOperator { right, .. } = bound else {
            panic!("expected binary node");
        };
        assert!(matches!(*right, FilterNode::Convert { .. }));
    }

    #[test]
    fn integer_literal_promotes_against_double_property() {
        let model = model();
        let binder = binder_for(&model, "persons");
        let raw = parse_filter_expression("salary gt 1000").unwrap();
        let bound = binder.bind_filter(&raw).unwrap();

        let FilterNode::BinaryOperator { right, .. } = bound else {
            panic!("expected binary node");
        };
        assert!(matches!(*right, FilterNode::Convert { .. }));
    }

    #[test]
    fn string_literal_binds_without_conversion() {
        let model = model();
        let binder = binder_for(&model, "persons");
        let raw = parse_filter_expression("firstName eq 'Jane'").unwrap();
        let bound = binder.bind_filter(&raw).unwrap();

        let FilterNode::BinaryOperator { right, .. } = bound else {
            panic!("expected binary node");
        };
        assert!(matches!(*right, FilterNode::Constant { .. }));
    }

    #[test]
    fn unknown_property_fails() {
        let model = model();
        let binder = binder_for(&model, "persons");
        let raw = parse_filter_expression("nickname eq 'x'").unwrap();
        assert!(matches!(
            binder.bind_filter(&raw),
            Err(ODataParseError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn inherited_property_resolves_on_derived_set() {
        let model = model();
        let binder = binder_for(&model, "employees");
        let raw = parse_filter_expression("firstName eq 'Jane'").unwrap();
        assert!(binder.bind_filter(&raw).is_ok());
    }

    #[test]
    fn nested_path_resolves_through_entity_property() {
        let model = model();
        let binder = binder_for(&model, "employees");
        let raw = parse_filter_expression("manager/firstName eq 'Jane'").unwrap();
        let bound = binder.bind_filter(&raw).unwrap();
        let FilterNode::BinaryOperator { left, .. } = bound else {
            panic!("expected binary node");
        };
        assert_eq!(
            *left,
            FilterNode::PropertyAccess {
                property: "manager.firstName".to_string()
            }
        );
    }

    #[test]
    fn path_through_primitive_fails() {
        let model = model();
        let binder = binder_for(&model, "persons");
        let raw = parse_filter_expression("firstName/length eq 3").unwrap();
        assert!(matches!(
            binder.bind_filter(&raw),
            Err(ODataParseError::InvalidPropertyPath { .. })
        ));
    }

    #[test]
    fn order_by_chain_preserves_source_order() {
        let model = model();
        let binder = binder_for(&model, "persons");
        let raw = crate::odata_parser::parse_order_by_clause("firstName,dateOfBirth desc").unwrap();
        let clause = binder.bind_order_by(&raw).unwrap().unwrap();

        let flattened: Vec<&str> = clause.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(flattened, vec!["firstName", "dateOfBirth"]);
    }
}
