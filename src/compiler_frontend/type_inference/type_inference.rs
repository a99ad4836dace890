//! # Type Inference
//!
//! Annotates every node of an expression tree with its static type, without rewriting the tree.
//! Children are inferred before their parent and each node gets exactly one entry,
//! including the children of nodes whose own type is Unknown.
//! Inference can't fail: missing information always degrades to Unknown.

use crate::compiler_frontend::expressions::expression_nodes::{
    BinaryOperator, ExpressionNode, Number, UnaryOperator,
};
use crate::compiler_frontend::expressions::node_visitor::NodeVisitor;
use crate::compiler_frontend::type_inference::type_rules::{binary_type, unary_type};
use crate::compiler_frontend::type_inference::types::Type;
use crate::compiler_frontend::type_inference::variable_analyzer::VariableAnalyzer;
use crate::type_log;
use rustc_hash::FxHashMap;
use std::marker::PhantomData;

/// Inferred types keyed by node identity within one borrowed tree.
/// Two structurally equal sub-trees in different positions have separate entries.
#[derive(Debug)]
pub struct TypeInfo<'a> {
    types: FxHashMap<*const ExpressionNode, Type>,
    root: *const ExpressionNode,
    tree: PhantomData<&'a ExpressionNode>,
}

impl<'a> TypeInfo<'a> {
    /// None if the node is not part of the tree this was built from
    pub fn get(&self, node: &'a ExpressionNode) -> Option<Type> {
        self.types.get(&(node as *const ExpressionNode)).copied()
    }

    pub fn root_type(&self) -> Type {
        self.types.get(&self.root).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

pub fn infer_types<'a>(root: &'a ExpressionNode, analyzer: &dyn VariableAnalyzer) -> TypeInfo<'a> {
    let mut inference = TypeInference {
        analyzer,
        types: FxHashMap::default(),
    };
    let root_type = root.accept(&mut inference);

    type_log!("Inferred ", Bright { root_type.to_str() }, " for ", { root.to_string() });

    TypeInfo {
        types: inference.types,
        root: root as *const ExpressionNode,
        tree: PhantomData,
    }
}

struct TypeInference<'b> {
    analyzer: &'b dyn VariableAnalyzer,
    types: FxHashMap<*const ExpressionNode, Type>,
}

impl TypeInference<'_> {
    fn record(&mut self, node: &ExpressionNode, node_type: Type) -> Type {
        self.types.insert(node as *const ExpressionNode, node_type);
        node_type
    }
}

impl NodeVisitor for TypeInference<'_> {
    type Output = Type;

    fn visit_string_constant(&mut self, node: &ExpressionNode, _: &str) -> Type {
        self.record(node, Type::String)
    }

    fn visit_numeric_constant(&mut self, node: &ExpressionNode, number: Number) -> Type {
        let numeric_type = match number {
            Number::Long(_) => Type::Long,
            Number::Double(_) => Type::Double,
        };
        self.record(node, numeric_type)
    }

    fn visit_boolean_constant(&mut self, node: &ExpressionNode, _: bool) -> Type {
        self.record(node, Type::Boolean)
    }

    fn visit_null_literal(&mut self, node: &ExpressionNode) -> Type {
        self.record(node, Type::Unknown)
    }

    fn visit_identifier(&mut self, node: &ExpressionNode, name: &str) -> Type {
        let identifier_type = self
            .analyzer
            .descriptor(name)
            .map_or(Type::Unknown, |descriptor| descriptor.var_type);
        self.record(node, identifier_type)
    }

    fn visit_property_access(
        &mut self,
        node: &ExpressionNode,
        target: &ExpressionNode,
        property: &ExpressionNode,
    ) -> Type {
        target.accept(self);
        property.accept(self);
        self.record(node, Type::Unknown)
    }

    fn visit_binary_operation(
        &mut self,
        node: &ExpressionNode,
        operator: BinaryOperator,
        left: &ExpressionNode,
        right: &ExpressionNode,
    ) -> Type {
        let left_type = left.accept(self);
        let right_type = right.accept(self);
        self.record(node, binary_type(operator, left_type, right_type))
    }

    fn visit_unary_operation(
        &mut self,
        node: &ExpressionNode,
        operator: UnaryOperator,
        target: &ExpressionNode,
    ) -> Type {
        let target_type = target.accept(self);
        self.record(node, unary_type(operator, target_type))
    }

    fn visit_ternary_operator(
        &mut self,
        node: &ExpressionNode,
        condition: &ExpressionNode,
        then_branch: &ExpressionNode,
        else_branch: &ExpressionNode,
    ) -> Type {
        condition.accept(self);
        let then_type = then_branch.accept(self);
        let else_type = else_branch.accept(self);

        let ternary_type = if then_type == else_type {
            then_type
        } else {
            Type::Unknown
        };
        self.record(node, ternary_type)
    }

    fn visit_runtime_call(
        &mut self,
        node: &ExpressionNode,
        _: &str,
        arguments: &[ExpressionNode],
    ) -> Type {
        for argument in arguments {
            argument.accept(self);
        }
        self.record(node, Type::Unknown)
    }

    fn visit_map_literal(&mut self, node: &ExpressionNode, entries: &[(String, ExpressionNode)]) -> Type {
        for (_, value) in entries {
            value.accept(self);
        }
        self.record(node, Type::Map)
    }

    fn visit_array_literal(&mut self, node: &ExpressionNode, items: &[ExpressionNode]) -> Type {
        for item in items {
            item.accept(self);
        }
        self.record(node, Type::Unknown)
    }
}

#[cfg(test)]
#[path = "tests/type_inference_tests.rs"]
mod type_inference_tests;
