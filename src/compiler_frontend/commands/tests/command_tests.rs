use super::*;
use crate::compiler_frontend::commands::command_display::display_commands;
use crate::compiler_frontend::expressions::expression_nodes::BinaryOperator;

#[test]
fn starts_and_ends_share_a_kind() {
    let pairs = [
        (Command::test("v", true), Command::ConditionalEnd),
        (Command::bind("v", ExpressionNode::long(1)), Command::VariableBindingEnd),
        (Command::loop_over("list", "item", "index"), Command::LoopEnd),
        (
            Command::ProcedureStart {
                name: String::from("card"),
                parameters: Vec::new(),
            },
            Command::ProcedureEnd,
        ),
    ];

    for (start, end) in pairs {
        assert_eq!(start.boundary(), Boundary::Start);
        assert_eq!(end.boundary(), Boundary::End);
        assert_eq!(start.kind(), end.kind());
    }

    assert_eq!(Command::global("v", ExpressionNode::NullLiteral).boundary(), Boundary::Leaf);
    assert_eq!(Command::text("hi").kind(), CommandKind::Output);
}

#[test]
fn read_variables_covers_expressions_and_references() {
    let binding = Command::bind(
        "var_0",
        ExpressionNode::binary(
            BinaryOperator::Add,
            ExpressionNode::identifier("a"),
            ExpressionNode::identifier("b"),
        ),
    );
    assert_eq!(binding.read_variables(), vec!["a", "b"]);

    let call = Command::ProcedureCall {
        template_variable: String::from("var_template0"),
        arguments_variable: String::from("var_arguments1"),
    };
    assert_eq!(call.read_variables(), vec!["var_template0", "var_arguments1"]);

    assert_eq!(Command::loop_over("list", "item", "index").read_variables(), vec!["list"]);
    assert!(Command::text("plain").read_variables().is_empty());
}

#[test]
fn listing_indents_block_bodies() {
    let commands = vec![
        Command::bind("var_0", ExpressionNode::identifier("items")),
        Command::test("var_0", true),
        Command::loop_over("var_0", "item", "itemList"),
        Command::output("item"),
        Command::LoopEnd,
        Command::ConditionalEnd,
        Command::VariableBindingEnd,
    ];

    let expected = "\
let var_0 = items
  if var_0
    for item, itemList in var_0
      out item
    end for
  end if
end let
";

    assert_eq!(display_commands(&commands), expected);
}

#[test]
fn commands_serialize_with_a_tag() {
    let json = serde_json::to_string(&Command::test("var_0", false)).unwrap();
    assert_eq!(
        json,
        r#"{"command":"conditional_start","variable":"var_0","expected_truth":false}"#
    );

    let parsed: Command = serde_json::from_str(r#"{"command":"loop_end"}"#).unwrap();
    assert_eq!(parsed, Command::LoopEnd);
}
