use crate::compiler_frontend::expressions::expression::Expression;
use crate::compiler_frontend::expressions::expression_nodes::{
    BinaryOperator, ExpressionNode, Number, UnaryOperator,
};
use crate::compiler_frontend::expressions::node_visitor::NodeVisitor;
use std::fmt;

// Renders nodes back into HTL-like expression syntax for logs and the CLI
struct NodePrinter;

impl NodeVisitor for NodePrinter {
    type Output = String;

    fn visit_string_constant(&mut self, _: &ExpressionNode, text: &str) -> String {
        format!("'{}'", text.replace('\'', "\\'"))
    }

    fn visit_numeric_constant(&mut self, _: &ExpressionNode, number: Number) -> String {
        number.to_string()
    }

    fn visit_boolean_constant(&mut self, _: &ExpressionNode, value: bool) -> String {
        value.to_string()
    }

    fn visit_null_literal(&mut self, _: &ExpressionNode) -> String {
        String::from("null")
    }

    fn visit_identifier(&mut self, _: &ExpressionNode, name: &str) -> String {
        name.to_owned()
    }

    fn visit_property_access(
        &mut self,
        _: &ExpressionNode,
        target: &ExpressionNode,
        property: &ExpressionNode,
    ) -> String {
        format!("{}[{}]", target.accept(self), property.accept(self))
    }

    fn visit_binary_operation(
        &mut self,
        _: &ExpressionNode,
        operator: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> String {
        format!(
            "({} {} {})",
            left.accept(self),
            operator.to_str(),
            right.accept(self)
        )
    }

    fn visit_unary_operation(
        &mut self,
        _: &ExpressionNode,
        operator: UnaryOperator,
        target: &ExpressionNode,
    ) -> String {
        match operator {
            UnaryOperator::Not => format!("!{}", target.accept(self)),
            _ => format!("{}({})", operator.to_str(), target.accept(self)),
        }
    }

    fn visit_ternary_operator(
        &mut self,
        _: &ExpressionNode,
        condition: &ExpressionNode,
        then_branch: &ExpressionNode,
        else_branch: &ExpressionNode,
    ) -> String {
        format!(
            "({} ? {} : {})",
            condition.accept(self),
            then_branch.accept(self),
            else_branch.accept(self)
        )
    }

    fn visit_runtime_call(
        &mut self,
        _: &ExpressionNode,
        function_name: &str,
        arguments: &[ExpressionNode],
    ) -> String {
        let arguments: Vec<String> = arguments.iter().map(|arg| arg.accept(self)).collect();
        format!("{}({})", function_name, arguments.join(", "))
    }

    fn visit_map_literal(
        &mut self,
        _: &ExpressionNode,
        entries: &[(String, ExpressionNode)],
    ) -> String {
        let entries: Vec<String> = entries
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value.accept(self)))
            .collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn visit_array_literal(&mut self, _: &ExpressionNode, items: &[ExpressionNode]) -> String {
        let items: Vec<String> = items.iter().map(|item| item.accept(self)).collect();
        format!("[{}]", items.join(", "))
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Long(value) => write!(f, "{value}"),
            Number::Double(value) => write!(f, "{value:?}"),
        }
    }
}

impl fmt::Display for ExpressionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.accept(&mut NodePrinter))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}", self.root)?;

        if !self.options.is_empty() {
            // Sorted so the output is stable between runs
            let mut options: Vec<_> = self.options.iter().collect();
            options.sort_by(|(a, _), (b, _)| a.cmp(b));

            let options: Vec<String> = options
                .into_iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            write!(f, " @ {}", options.join(", "))?;
        }

        write!(f, "}}")
    }
}
