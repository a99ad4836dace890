use super::*;
use crate::compiler_frontend::expressions::expression::Expression;
use crate::compiler_frontend::expressions::node_visitor::NodeVisitor;

// Counts identifiers through the visitor protocol instead of the helper on the node
struct IdentifierCounter;

impl NodeVisitor for IdentifierCounter {
    type Output = usize;

    fn visit_string_constant(&mut self, _: &ExpressionNode, _: &str) -> usize {
        0
    }

    fn visit_numeric_constant(&mut self, _: &ExpressionNode, _: Number) -> usize {
        0
    }

    fn visit_boolean_constant(&mut self, _: &ExpressionNode, _: bool) -> usize {
        0
    }

    fn visit_null_literal(&mut self, _: &ExpressionNode) -> usize {
        0
    }

    fn visit_identifier(&mut self, _: &ExpressionNode, _: &str) -> usize {
        1
    }

    fn visit_property_access(
        &mut self,
        _: &ExpressionNode,
        target: &ExpressionNode,
        property: &ExpressionNode,
    ) -> usize {
        target.accept(self) + property.accept(self)
    }

    fn visit_binary_operation(
        &mut self,
        _: &ExpressionNode,
        _: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> usize {
        left.accept(self) + right.accept(self)
    }

    fn visit_unary_operation(
        &mut self,
        _: &ExpressionNode,
        _: UnaryOperator,
        target: &ExpressionNode,
    ) -> usize {
        target.accept(self)
    }

    fn visit_ternary_operator(
        &mut self,
        _: &ExpressionNode,
        condition: &ExpressionNode,
        then_branch: &ExpressionNode,
        else_branch: &ExpressionNode,
    ) -> usize {
        condition.accept(self) + then_branch.accept(self) + else_branch.accept(self)
    }

    fn visit_runtime_call(
        &mut self,
        _: &ExpressionNode,
        _: &str,
        arguments: &[ExpressionNode],
    ) -> usize {
        arguments.iter().map(|argument| argument.accept(self)).sum()
    }

    fn visit_map_literal(&mut self, _: &ExpressionNode, entries: &[(String, ExpressionNode)]) -> usize {
        entries.iter().map(|(_, value)| value.accept(self)).sum()
    }

    fn visit_array_literal(&mut self, _: &ExpressionNode, items: &[ExpressionNode]) -> usize {
        items.iter().map(|item| item.accept(self)).sum()
    }
}

fn sample_tree() -> ExpressionNode {
    ExpressionNode::ternary(
        ExpressionNode::binary(
            BinaryOperator::And,
            ExpressionNode::identifier("showTitle"),
            ExpressionNode::unary(UnaryOperator::Not, ExpressionNode::identifier("hidden")),
        ),
        ExpressionNode::property_access(
            ExpressionNode::identifier("page"),
            ExpressionNode::string("title"),
        ),
        ExpressionNode::runtime_call(
            "join",
            vec![
                ExpressionNode::ArrayLiteral(vec![ExpressionNode::long(1), ExpressionNode::double(2.5)]),
                ExpressionNode::MapLiteral(vec![("separator".to_string(), ExpressionNode::NullLiteral)]),
            ],
        ),
    )
}

#[test]
fn literal_truth_follows_runtime_coercion() {
    let cases = [
        (ExpressionNode::NullLiteral, false),
        (ExpressionNode::boolean(true), true),
        (ExpressionNode::boolean(false), false),
        (ExpressionNode::long(0), false),
        (ExpressionNode::long(-3), true),
        (ExpressionNode::double(0.0), false),
        (ExpressionNode::double(0.1), true),
        (ExpressionNode::string(""), false),
        (ExpressionNode::string("   "), false),
        (ExpressionNode::string("a"), true),
        (ExpressionNode::string(" FALSE "), false),
        (ExpressionNode::string("True"), true),
        (ExpressionNode::string("0"), true),
    ];

    for (node, expected) in cases {
        assert_eq!(node.literal_truth(), Some(expected), "truth of {node}");
    }
}

#[test]
fn non_literals_have_unknown_truth() {
    assert_eq!(ExpressionNode::identifier("x").literal_truth(), None);
    assert_eq!(ExpressionNode::MapLiteral(Vec::new()).literal_truth(), None);
    assert_eq!(ExpressionNode::ArrayLiteral(Vec::new()).literal_truth(), None);
    assert!(!ExpressionNode::ArrayLiteral(Vec::new()).is_literal());
}

#[test]
fn identifiers_are_collected_in_evaluation_order() {
    let tree = sample_tree();

    assert_eq!(tree.referenced_identifiers(), vec!["showTitle", "hidden", "page"]);
    assert_eq!(tree.accept(&mut IdentifierCounter), 3);
}

#[test]
fn node_count_includes_every_node() {
    // ternary, and, showTitle, not, hidden, access, page, 'title',
    // call, array, 1, 2.5, map, null
    assert_eq!(sample_tree().node_count(), 14);
    assert_eq!(ExpressionNode::NullLiteral.node_count(), 1);
}

#[test]
fn nodes_display_as_htl_syntax() {
    assert_eq!(
        sample_tree().to_string(),
        "((showTitle && !hidden) ? page['title'] : join([1, 2.5], {separator: null}))"
    );
    assert_eq!(ExpressionNode::string("it's").to_string(), "'it\\'s'");
    assert_eq!(ExpressionNode::double(1.0).to_string(), "1.0");
}

#[test]
fn expression_display_sorts_options() {
    let expression = Expression::new(ExpressionNode::identifier("items"))
        .with_option("join", ExpressionNode::string(", "))
        .with_option("context", ExpressionNode::string("html"));

    assert_eq!(
        expression.to_string(),
        "${items @ context='html', join=', '}"
    );
}

#[test]
fn option_removal_returns_a_new_expression() {
    let expression = Expression::new(ExpressionNode::identifier("items"))
        .with_option("join", ExpressionNode::string(", "))
        .with_option("context", ExpressionNode::string("html"));

    let (without_join, removed) = expression.clone().remove_option("join");
    assert_eq!(removed, Some(ExpressionNode::string(", ")));
    assert!(!without_join.contains_option("join"));
    assert!(expression.contains_option("join"));
    assert_eq!(expression.get_option("context"), Some(&ExpressionNode::string("html")));
    assert_eq!(without_join.get_option("join"), None);

    let bare = expression.clone().without_options(&["join", "context", "missing"]);
    assert!(bare.options.is_empty());
    assert_eq!(bare.root, expression.root);

    let replaced = expression.clone().with_node(ExpressionNode::long(1));
    assert_eq!(replaced.options, expression.options);
    assert_eq!(replaced.root, ExpressionNode::long(1));
}

#[test]
fn nodes_deserialize_from_parser_json() {
    let json = r#"{
        "BinaryOperation": {
            "operator": "Concatenate",
            "left": { "Identifier": "first" },
            "right": { "NumericConstant": { "Long": 2 } }
        }
    }"#;

    let node: ExpressionNode = serde_json::from_str(json).unwrap();

    assert_eq!(
        node,
        ExpressionNode::binary(
            BinaryOperator::Concatenate,
            ExpressionNode::identifier("first"),
            ExpressionNode::long(2),
        )
    );
}
