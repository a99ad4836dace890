use super::*;
use crate::compiler_frontend::expressions::expression_nodes::{BinaryOperator, ExpressionNode};

fn types_of(bindings: &[BindingType]) -> Vec<(&str, Type)> {
    bindings
        .iter()
        .map(|binding| (binding.variable.as_str(), binding.binding_type))
        .collect()
}

#[test]
fn bindings_see_earlier_bindings() {
    let commands = vec![
        Command::bind("count", ExpressionNode::long(2)),
        Command::bind(
            "double",
            ExpressionNode::binary(BinaryOperator::Mul, ExpressionNode::identifier("count"), ExpressionNode::long(2)),
        ),
        Command::output("double"),
        Command::VariableBindingEnd,
        Command::VariableBindingEnd,
        Command::bind("after", ExpressionNode::identifier("count")),
        Command::VariableBindingEnd,
    ];

    let bindings = annotate_bindings(&commands);

    assert_eq!(
        types_of(&bindings),
        vec![
            ("count", Type::Long),
            ("double", Type::Long),
            ("after", Type::Unknown),
        ]
    );
}

#[test]
fn globals_are_marked_and_merge_their_types() {
    let commands = vec![
        Command::global("g", ExpressionNode::string("a")),
        Command::global("g", ExpressionNode::long(1)),
        Command::bind("copy", ExpressionNode::identifier("g")),
        Command::VariableBindingEnd,
    ];

    let bindings = annotate_bindings(&commands);

    assert_eq!(bindings[0].scope, VariableScope::Global);
    assert_eq!(bindings[2].scope, VariableScope::Local);
    assert_eq!(bindings[2].binding_type, Type::Unknown);
}

#[test]
fn loop_variables_are_unknown_and_end_with_the_loop() {
    let commands = vec![
        Command::bind("item", ExpressionNode::string("outer")),
        Command::loop_over("list", "item", "itemList"),
        Command::bind("inside", ExpressionNode::identifier("item")),
        Command::VariableBindingEnd,
        Command::LoopEnd,
        Command::bind("outside", ExpressionNode::identifier("item")),
        Command::VariableBindingEnd,
        Command::VariableBindingEnd,
    ];

    let bindings = annotate_bindings(&commands);

    assert_eq!(
        types_of(&bindings),
        vec![
            ("item", Type::String),
            ("inside", Type::Unknown),
            ("outside", Type::String),
        ]
    );
}

#[test]
fn procedure_bodies_cannot_see_outer_types() {
    let commands = vec![
        Command::bind("title", ExpressionNode::string("Hello")),
        Command::ProcedureStart {
            name: String::from("card"),
            parameters: vec![String::from("size")],
        },
        Command::bind("copy", ExpressionNode::identifier("title")),
        Command::VariableBindingEnd,
        Command::ProcedureEnd,
        Command::VariableBindingEnd,
    ];

    let bindings = annotate_bindings(&commands);

    assert_eq!(bindings[1].binding_type, Type::Unknown);
}

#[test]
fn globals_reassigned_in_a_loop_body_are_unknown_inside_and_after_it() {
    let commands = vec![
        Command::global("x", ExpressionNode::long(1)),
        Command::bind(
            "list",
            ExpressionNode::ArrayLiteral(vec![ExpressionNode::long(1), ExpressionNode::long(2)]),
        ),
        Command::loop_over("list", "item", "index"),
        Command::bind("y", ExpressionNode::identifier("x")),
        Command::output("y"),
        Command::VariableBindingEnd,
        Command::global("x", ExpressionNode::string("a")),
        Command::LoopEnd,
        Command::bind("after", ExpressionNode::identifier("x")),
        Command::VariableBindingEnd,
        Command::VariableBindingEnd,
    ];

    let bindings = annotate_bindings(&commands);

    // The second iteration reads the string assigned by the first
    assert_eq!(bindings[2].variable, "y");
    assert_eq!(bindings[2].binding_type, Type::Unknown);
    assert_eq!(bindings[3].binding_type, Type::String);
    assert_eq!(bindings[4].variable, "after");
    assert_eq!(bindings[4].binding_type, Type::Unknown);
}

#[test]
fn loops_without_global_assignments_keep_outer_types() {
    let commands = vec![
        Command::global("x", ExpressionNode::long(1)),
        Command::loop_over("list", "item", "index"),
        Command::bind("y", ExpressionNode::identifier("x")),
        Command::VariableBindingEnd,
        Command::LoopEnd,
    ];

    let bindings = annotate_bindings(&commands);

    assert_eq!(bindings[1].binding_type, Type::Long);
}
