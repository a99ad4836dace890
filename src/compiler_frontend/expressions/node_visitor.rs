use crate::compiler_frontend::expressions::expression_nodes::{
    BinaryOperator, ExpressionNode, Number, UnaryOperator,
};

/// Double dispatch over the expression tree.
/// One method per node variant, each returning the visitor's output for that node.
/// Visitors recurse into children themselves by calling `accept` on them.
pub trait NodeVisitor {
    type Output;

    fn visit_string_constant(&mut self, node: &ExpressionNode, text: &str) -> Self::Output;
    fn visit_numeric_constant(&mut self, node: &ExpressionNode, number: Number) -> Self::Output;
    fn visit_boolean_constant(&mut self, node: &ExpressionNode, value: bool) -> Self::Output;
    fn visit_null_literal(&mut self, node: &ExpressionNode) -> Self::Output;
    fn visit_identifier(&mut self, node: &ExpressionNode, name: &str) -> Self::Output;

    fn visit_property_access(
        &mut self,
        node: &ExpressionNode,
        target: &ExpressionNode,
        property: &ExpressionNode,
    ) -> Self::Output;

    fn visit_binary_operation(
        &mut self,
        node: &ExpressionNode,
        operator: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Self::Output;

    fn visit_unary_operation(
        &mut self,
        node: &ExpressionNode,
        operator: UnaryOperator,
        target: &ExpressionNode,
    ) -> Self::Output;

    fn visit_ternary_operator(
        &mut self,
        node: &ExpressionNode,
        condition: &ExpressionNode,
        then_branch: &ExpressionNode,
        else_branch: &ExpressionNode,
    ) -> Self::Output;

    fn visit_runtime_call(
        &mut self,
        node: &ExpressionNode,
        function_name: &str,
        arguments: &[ExpressionNode],
    ) -> Self::Output;

    fn visit_map_literal(
        &mut self,
        node: &ExpressionNode,
        entries: &[(String, ExpressionNode)],
    ) -> Self::Output;

    fn visit_array_literal(&mut self, node: &ExpressionNode, items: &[ExpressionNode])
    -> Self::Output;
}

impl ExpressionNode {
    pub fn accept<V: NodeVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            ExpressionNode::StringConstant(text) => visitor.visit_string_constant(self, text),
            ExpressionNode::NumericConstant(number) => visitor.visit_numeric_constant(self, *number),
            ExpressionNode::BooleanConstant(value) => visitor.visit_boolean_constant(self, *value),
            ExpressionNode::NullLiteral => visitor.visit_null_literal(self),
            ExpressionNode::Identifier(name) => visitor.visit_identifier(self, name),
            ExpressionNode::PropertyAccess { target, property } => {
                visitor.visit_property_access(self, target, property)
            }
            ExpressionNode::BinaryOperation {
                operator,
                left,
                right,
            } => visitor.visit_binary_operation(self, *operator, left, right),
            ExpressionNode::UnaryOperation { operator, target } => {
                visitor.visit_unary_operation(self, *operator, target)
            }
            ExpressionNode::TernaryOperator {
                condition,
                then_branch,
                else_branch,
            } => visitor.visit_ternary_operator(self, condition, then_branch, else_branch),
            ExpressionNode::RuntimeCall {
                function_name,
                arguments,
            } => visitor.visit_runtime_call(self, function_name, arguments),
            ExpressionNode::MapLiteral(entries) => visitor.visit_map_literal(self, entries),
            ExpressionNode::ArrayLiteral(items) => visitor.visit_array_literal(self, items),
        }
    }
}
