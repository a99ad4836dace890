use super::*;
use crate::compiler_frontend::commands::command_nodes::{Boundary, CommandKind};
use crate::compiler_frontend::compiler_errors::ErrorType;
use crate::compiler_frontend::expressions::expression_nodes::ExpressionNode;
use crate::compiler_frontend::optimizers::stateful_replay::block_body;
use proptest::prelude::*;
use rustc_hash::FxHashMap;

fn remove_dead_code(input: &[Command]) -> Result<Vec<Command>, CompilerError> {
    let mut output = CommandStream::new();
    DeadCodeRemoval.transform(input, &mut output)?;
    Ok(output.into_parts().0)
}

#[test]
fn literal_conditions_are_resolved() {
    let input = vec![
        Command::bind("v", ExpressionNode::string("a")),
        Command::test("v", true),
        Command::text("X"),
        Command::ConditionalEnd,
        Command::bind("v", ExpressionNode::boolean(true)),
        Command::test("v", true),
        Command::text("Y"),
        Command::ConditionalEnd,
    ];

    // The bindings are left open on purpose, the pass doesn't check they close
    let output = remove_dead_code(&input).unwrap();

    assert_eq!(
        output,
        vec![
            Command::bind("v", ExpressionNode::string("a")),
            Command::text("X"),
            Command::bind("v", ExpressionNode::boolean(true)),
            Command::text("Y"),
        ]
    );
}

#[test]
fn never_passing_conditions_drop_their_whole_body() {
    let input = vec![
        Command::bind("v", ExpressionNode::boolean(false)),
        Command::test("v", true),
        Command::test("x", true),
        Command::text("A"),
        Command::ConditionalEnd,
        Command::text("B"),
        Command::ConditionalEnd,
        Command::text("C"),
        Command::VariableBindingEnd,
    ];

    let output = remove_dead_code(&input).unwrap();

    assert_eq!(
        output,
        vec![
            Command::bind("v", ExpressionNode::boolean(false)),
            Command::text("C"),
            Command::VariableBindingEnd,
        ]
    );
}

#[test]
fn negated_tests_use_the_expected_truth() {
    let input = vec![
        Command::bind("empty", ExpressionNode::string("  ")),
        Command::test("empty", false),
        Command::text("shown"),
        Command::ConditionalEnd,
        Command::test("empty", true),
        Command::text("hidden"),
        Command::ConditionalEnd,
        Command::VariableBindingEnd,
    ];

    let output = remove_dead_code(&input).unwrap();

    assert_eq!(
        output,
        vec![
            Command::bind("empty", ExpressionNode::string("  ")),
            Command::text("shown"),
            Command::VariableBindingEnd,
        ]
    );
}

#[test]
fn unknown_conditions_pass_through() {
    let input = vec![
        Command::bind("v", ExpressionNode::identifier("properties")),
        Command::test("v", true),
        Command::output("v"),
        Command::ConditionalEnd,
        Command::test("missing", false),
        Command::text("fallback"),
        Command::ConditionalEnd,
        Command::VariableBindingEnd,
    ];

    assert_eq!(remove_dead_code(&input).unwrap(), input);
}

#[test]
fn binding_end_restores_the_shadowed_value() {
    let input = vec![
        Command::bind("v", ExpressionNode::boolean(true)),
        Command::bind("v", ExpressionNode::identifier("page")),
        Command::VariableBindingEnd,
        Command::test("v", true),
        Command::text("X"),
        Command::ConditionalEnd,
        Command::VariableBindingEnd,
    ];

    let output = remove_dead_code(&input).unwrap();

    assert_eq!(
        output,
        vec![
            Command::bind("v", ExpressionNode::boolean(true)),
            Command::bind("v", ExpressionNode::identifier("page")),
            Command::VariableBindingEnd,
            Command::text("X"),
            Command::VariableBindingEnd,
        ]
    );
}

#[test]
fn globals_assigned_in_an_unknown_branch_become_unknown() {
    let input = vec![
        Command::global("g", ExpressionNode::boolean(true)),
        Command::test("x", true),
        Command::global("g", ExpressionNode::boolean(false)),
        Command::ConditionalEnd,
        Command::test("g", true),
        Command::text("maybe"),
        Command::ConditionalEnd,
    ];

    assert_eq!(remove_dead_code(&input).unwrap(), input);
}

#[test]
fn globals_assigned_later_in_a_loop_are_unknown_at_the_top() {
    let input = vec![
        Command::global("g", ExpressionNode::boolean(false)),
        Command::loop_over("list", "item", "itemList"),
        Command::test("g", true),
        Command::text("after the first item"),
        Command::ConditionalEnd,
        Command::global("g", ExpressionNode::boolean(true)),
        Command::LoopEnd,
    ];

    assert_eq!(remove_dead_code(&input).unwrap(), input);
}

#[test]
fn procedures_do_not_see_outer_bindings() {
    let input = vec![
        Command::bind("v", ExpressionNode::boolean(true)),
        Command::ProcedureStart {
            name: String::from("card"),
            parameters: vec![String::from("v")],
        },
        Command::test("v", true),
        Command::text("X"),
        Command::ConditionalEnd,
        Command::ProcedureEnd,
        Command::VariableBindingEnd,
    ];

    assert_eq!(remove_dead_code(&input).unwrap(), input);
}

#[test]
fn globals_known_inside_a_procedure_are_used() {
    let input = vec![
        Command::ProcedureStart {
            name: String::from("card"),
            parameters: Vec::new(),
        },
        Command::global("g", ExpressionNode::long(0)),
        Command::test("g", true),
        Command::text("never"),
        Command::ConditionalEnd,
        Command::ProcedureEnd,
    ];

    let output = remove_dead_code(&input).unwrap();

    assert_eq!(
        output,
        vec![
            Command::ProcedureStart {
                name: String::from("card"),
                parameters: Vec::new(),
            },
            Command::global("g", ExpressionNode::long(0)),
            Command::ProcedureEnd,
        ]
    );
}

#[test]
fn unmatched_conditional_end_is_a_compiler_error() {
    let error = remove_dead_code(&[Command::ConditionalEnd]).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);
    assert!(error.msg.contains("never started"));
}

#[test]
fn open_conditional_at_the_end_is_a_compiler_error() {
    let error = remove_dead_code(&[Command::test("x", true), Command::text("X")]).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);
    assert!(error.msg.contains("still open"));
}

#[test]
fn interleaved_block_ends_are_compiler_errors() {
    // The conditional is kept, its End arrives while the loop is still open
    let kept = vec![
        Command::test("unknown", true),
        Command::loop_over("list", "item", "index"),
        Command::ConditionalEnd,
        Command::LoopEnd,
    ];
    let error = remove_dead_code(&kept).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);
    assert!(error.msg.contains("loop block was still open"));

    // An always passing conditional leaves no scope but is still checked
    let removed = vec![
        Command::bind("v", ExpressionNode::boolean(true)),
        Command::test("v", true),
        Command::loop_over("list", "item", "index"),
        Command::ConditionalEnd,
        Command::LoopEnd,
        Command::VariableBindingEnd,
    ];
    let error = remove_dead_code(&removed).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);

    let wrong_end = vec![Command::test("unknown", true), Command::LoopEnd];
    let error = remove_dead_code(&wrong_end).unwrap_err();
    assert!(error.msg.contains("conditional block was still open"));
}

#[test]
fn stream_ending_inside_a_removed_range_is_a_compiler_error() {
    let input = vec![
        Command::bind("v", ExpressionNode::NullLiteral),
        Command::test("v", true),
        Command::text("X"),
    ];

    let error = remove_dead_code(&input).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);
    assert!(error.msg.contains("skipped"));
}

// Random block structures, rendered by a small interpreter before and after the pass

#[derive(Debug, Clone)]
enum Block {
    Text(String),
    Global(&'static str, ExpressionNode),
    Bind(&'static str, ExpressionNode, Vec<Block>),
    Test(&'static str, bool, Vec<Block>),
    Loop(Vec<Block>),
}

fn value() -> impl Strategy<Value = ExpressionNode> {
    prop_oneof![
        any::<bool>().prop_map(ExpressionNode::boolean),
        (0i64..2).prop_map(ExpressionNode::long),
        prop_oneof![Just(""), Just("a"), Just("false")].prop_map(|text| ExpressionNode::string(text)),
        Just(ExpressionNode::NullLiteral),
        prop_oneof![Just("u0"), Just("u1")].prop_map(|name| ExpressionNode::identifier(name)),
    ]
}

fn tested_variable() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("b0"),
        Just("b1"),
        Just("g0"),
        Just("g1"),
        Just("u0"),
        Just("u1"),
    ]
}

fn block() -> impl Strategy<Value = Block> {
    let leaf = prop_oneof![
        "[a-z]".prop_map(Block::Text),
        (prop_oneof![Just("g0"), Just("g1")], value())
            .prop_map(|(name, value)| Block::Global(name, value)),
    ];

    leaf.prop_recursive(4, 48, 4, |inner| {
        let body = prop::collection::vec(inner, 0..4);
        prop_oneof![
            (prop_oneof![Just("b0"), Just("b1")], value(), body.clone())
                .prop_map(|(name, value, body)| Block::Bind(name, value, body)),
            (tested_variable(), any::<bool>(), body.clone())
                .prop_map(|(name, truth, body)| Block::Test(name, truth, body)),
            body.prop_map(Block::Loop),
        ]
    })
}

fn flatten(blocks: &[Block], commands: &mut Vec<Command>) {
    for block in blocks {
        match block {
            Block::Text(text) => commands.push(Command::text(text.as_str())),
            Block::Global(name, value) => commands.push(Command::global(*name, value.to_owned())),
            Block::Bind(name, value, body) => {
                commands.push(Command::bind(*name, value.to_owned()));
                flatten(body, commands);
                commands.push(Command::VariableBindingEnd);
            }
            Block::Test(name, truth, body) => {
                commands.push(Command::test(*name, *truth));
                flatten(body, commands);
                commands.push(Command::ConditionalEnd);
            }
            Block::Loop(body) => {
                commands.push(Command::loop_over("l0", "item", "itemList"));
                flatten(body, commands);
                commands.push(Command::LoopEnd);
            }
        }
    }
}

struct Interpreter {
    inputs: [bool; 2],
    iterations: usize,
    bindings: Vec<(String, bool)>,
    globals: FxHashMap<String, bool>,
    rendered: String,
}

impl Interpreter {
    fn render(commands: &[Command], inputs: [bool; 2], iterations: usize) -> String {
        let mut interpreter = Interpreter {
            inputs,
            iterations,
            bindings: Vec::new(),
            globals: FxHashMap::default(),
            rendered: String::new(),
        };
        interpreter.run(commands);
        interpreter.rendered
    }

    fn lookup(&self, name: &str) -> bool {
        match name {
            "u0" => self.inputs[0],
            "u1" => self.inputs[1],
            _ => self
                .bindings
                .iter()
                .rev()
                .find(|(bound, _)| bound == name)
                .map(|(_, truth)| *truth)
                .or_else(|| self.globals.get(name).copied())
                .unwrap_or(false),
        }
    }

    fn truth(&self, expression: &ExpressionNode) -> bool {
        match expression {
            ExpressionNode::Identifier(name) => self.lookup(name),
            literal => literal.literal_truth().unwrap_or(false),
        }
    }

    fn run(&mut self, commands: &[Command]) {
        let mut index = 0;
        while index < commands.len() {
            let command = &commands[index];
            match command {
                Command::OutText { text } => self.rendered.push_str(text),
                Command::VariableBindingGlobal {
                    variable,
                    expression,
                } => {
                    let truth = self.truth(expression);
                    self.globals.insert(variable.to_owned(), truth);
                }
                Command::VariableBindingStart { .. }
                | Command::ConditionalStart { .. }
                | Command::LoopStart { .. } => {
                    let body = block_body(command.kind(), &commands[index + 1..]);
                    match command {
                        Command::VariableBindingStart {
                            variable,
                            expression,
                        } => {
                            let truth = self.truth(expression);
                            self.bindings.push((variable.to_owned(), truth));
                            self.run(body);
                            self.bindings.pop();
                        }
                        Command::ConditionalStart {
                            variable,
                            expected_truth,
                        } => {
                            if self.lookup(variable) == *expected_truth {
                                self.run(body);
                            }
                        }
                        _ => {
                            for _ in 0..self.iterations {
                                self.run(body);
                            }
                        }
                    }
                    // Skip the body and its End
                    index += body.len() + 1;
                }
                _ => {}
            }
            index += 1;
        }
    }
}

fn is_balanced(commands: &[Command]) -> bool {
    let mut open: Vec<CommandKind> = Vec::new();
    for command in commands {
        match command.boundary() {
            Boundary::Start => open.push(command.kind()),
            Boundary::End => {
                if open.pop() != Some(command.kind()) {
                    return false;
                }
            }
            Boundary::Leaf => {}
        }
    }
    open.is_empty()
}

proptest! {
    #[test]
    fn prop_rendering_is_unchanged(
        blocks in prop::collection::vec(block(), 0..6),
        inputs in any::<[bool; 2]>(),
        iterations in 0usize..3,
    ) {
        let mut input = Vec::new();
        flatten(&blocks, &mut input);

        let output = remove_dead_code(&input).unwrap();

        prop_assert_eq!(
            Interpreter::render(&input, inputs, iterations),
            Interpreter::render(&output, inputs, iterations)
        );
    }

    #[test]
    fn prop_output_stays_balanced_and_never_grows(blocks in prop::collection::vec(block(), 0..6)) {
        let mut input = Vec::new();
        flatten(&blocks, &mut input);

        let output = remove_dead_code(&input).unwrap();

        prop_assert!(is_balanced(&output));
        prop_assert!(output.len() <= input.len());
    }
}
