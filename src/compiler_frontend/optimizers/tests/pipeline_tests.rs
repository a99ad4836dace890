use super::*;
use crate::compiler_frontend::commands::command_stream::StreamWarning;
use crate::compiler_frontend::compiler_errors::{ErrorMetaDataKey, ErrorType};
use crate::compiler_frontend::expressions::expression_nodes::{BinaryOperator, ExpressionNode};
use std::cell::RefCell;
use std::rc::Rc;

fn settings(enabled: bool, passes: &[&str]) -> OptimizationSettings {
    OptimizationSettings {
        enabled,
        passes: passes.iter().map(|name| name.to_string()).collect(),
    }
}

fn known_condition_template() -> Vec<Command> {
    vec![
        Command::bind(
            "var_0",
            ExpressionNode::binary(BinaryOperator::Eq, ExpressionNode::long(1), ExpressionNode::long(1)),
        ),
        Command::test("var_0", true),
        Command::text("<p>"),
        Command::text("Hi"),
        Command::text("</p>"),
        Command::ConditionalEnd,
        Command::VariableBindingEnd,
        Command::text("!"),
    ]
}

#[test]
fn default_passes_run_in_order() {
    let pipeline = OptimizationPipeline::default();
    assert_eq!(pipeline.pass_names(), DEFAULT_PASSES.to_vec());
}

#[test]
fn passes_are_picked_from_settings() {
    let pipeline = OptimizationPipeline::from_settings(&settings(
        true,
        &["coalescing_writes", "dead_code_removal"],
    ))
    .unwrap();

    assert_eq!(pipeline.pass_names(), vec!["coalescing_writes", "dead_code_removal"]);
}

#[test]
fn disabled_optimizations_give_an_empty_pipeline() {
    let pipeline = OptimizationPipeline::from_settings(&settings(false, &DEFAULT_PASSES)).unwrap();
    assert!(pipeline.is_empty());
}

#[test]
fn unknown_pass_is_a_config_error() {
    let error = match OptimizationPipeline::from_settings(&settings(true, &["inline_everything"])) {
        Ok(_) => panic!("expected an unknown pass to be rejected"),
        Err(error) => error,
    };

    assert_eq!(error.error_type, ErrorType::Config);
    assert!(error.msg.contains("inline_everything"));
    assert_eq!(
        error.metadata.get(&ErrorMetaDataKey::ConfigKey),
        Some(&"optimizations.passes")
    );
}

#[test]
fn full_pipeline_reduces_a_known_condition_to_one_write() {
    let input = CommandStream::from_commands(known_condition_template());
    let mut output = CommandStream::new();

    OptimizationPipeline::default().run(&input, &mut output).unwrap();

    assert!(output.is_closed());
    assert_eq!(output.commands(), &[Command::text("<p>Hi</p>!")]);
}

#[test]
fn empty_pipeline_copies_the_input() {
    let input = CommandStream::from_commands(known_condition_template());
    let mut output = CommandStream::new();

    OptimizationPipeline::new().run(&input, &mut output).unwrap();

    assert!(output.is_closed());
    assert_eq!(output.commands(), input.commands());
}

#[test]
fn unused_bindings_are_removed_but_their_bodies_kept() {
    let input = CommandStream::from_commands(vec![
        Command::bind("unused", ExpressionNode::identifier("page")),
        Command::bind("used", ExpressionNode::identifier("title")),
        Command::output("used"),
        Command::VariableBindingEnd,
        Command::VariableBindingEnd,
    ]);
    let mut output = CommandStream::new();

    let mut pipeline = OptimizationPipeline::new();
    pipeline.add(Box::new(UnusedVariableRemoval));
    pipeline.run(&input, &mut output).unwrap();

    assert_eq!(
        output.commands(),
        &[
            Command::bind("used", ExpressionNode::identifier("title")),
            Command::output("used"),
            Command::VariableBindingEnd,
        ]
    );
}

#[test]
fn coalescing_stops_at_other_commands() {
    let input = CommandStream::from_commands(vec![
        Command::text("a"),
        Command::text("b"),
        Command::output("x"),
        Command::text("c"),
    ]);
    let mut output = CommandStream::new();

    let mut pipeline = OptimizationPipeline::new();
    pipeline.add(Box::new(CoalescingWrites));
    pipeline.run(&input, &mut output).unwrap();

    assert_eq!(
        output.commands(),
        &[Command::text("ab"), Command::output("x"), Command::text("c")]
    );
}

#[test]
fn input_warnings_are_forwarded() {
    let mut input = CommandStream::new();
    input.write(Command::text("x")).unwrap();
    input
        .warn(StreamWarning::new("Unclosed tag", "<div"))
        .unwrap();
    input.close();

    let mut output = CommandStream::new();
    OptimizationPipeline::default().run(&input, &mut output).unwrap();

    assert_eq!(output.warnings(), input.warnings());
}

#[test]
fn output_handlers_only_see_the_final_commands() {
    let seen = Rc::new(RefCell::new(Vec::new()));

    let mut output = CommandStream::new();
    let recorder = Rc::clone(&seen);
    output.add_handler(Box::new(move |command: &Command| {
        recorder.borrow_mut().push(command.clone())
    }));

    let input = CommandStream::from_commands(known_condition_template());
    OptimizationPipeline::default().run(&input, &mut output).unwrap();

    assert_eq!(*seen.borrow(), vec![Command::text("<p>Hi</p>!")]);
}

#[test]
fn pass_errors_stop_the_pipeline() {
    let input = CommandStream::from_commands(vec![Command::ConditionalEnd]);
    let mut output = CommandStream::new();

    let error = OptimizationPipeline::default()
        .run(&input, &mut output)
        .unwrap_err();

    assert_eq!(error.error_type, ErrorType::Compiler);
    assert!(!output.is_closed());
}
