use super::*;
use crate::compiler_frontend::compiler_errors::ErrorType;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct Recording {
    commands: Vec<Command>,
    warnings: Vec<StreamWarning>,
    done_calls: usize,
}

struct RecordingHandler {
    recording: Rc<RefCell<Recording>>,
}

impl CommandHandler for RecordingHandler {
    fn on_emit(&mut self, command: &Command) {
        self.recording.borrow_mut().commands.push(command.clone());
    }

    fn on_warning(&mut self, warning: &StreamWarning) {
        self.recording.borrow_mut().warnings.push(warning.clone());
    }

    fn on_done(&mut self) {
        self.recording.borrow_mut().done_calls += 1;
    }
}

fn recorded_stream() -> (CommandStream, Rc<RefCell<Recording>>) {
    let recording = Rc::new(RefCell::new(Recording::default()));
    let mut stream = CommandStream::new();
    stream.add_handler(Box::new(RecordingHandler {
        recording: Rc::clone(&recording),
    }));
    (stream, recording)
}

#[test]
fn push_and_replay_see_the_same_sequence() {
    let (mut stream, recording) = recorded_stream();

    stream.write(Command::text("<p>")).unwrap();
    stream.write(Command::output("var_0")).unwrap();
    stream.write(Command::text("</p>")).unwrap();
    stream.close();

    assert_eq!(recording.borrow().commands, stream.commands());
    assert_eq!(stream.len(), 3);
}

#[test]
fn handlers_run_in_registration_order() {
    let order = Rc::new(RefCell::new(Vec::new()));

    let mut stream = CommandStream::new();
    let first = Rc::clone(&order);
    stream.add_handler(Box::new(move |_: &Command| first.borrow_mut().push("first")));
    let second = Rc::clone(&order);
    stream.add_handler(Box::new(move |_: &Command| second.borrow_mut().push("second")));

    stream.write(Command::text("a")).unwrap();
    stream.write(Command::text("b")).unwrap();

    assert_eq!(*order.borrow(), vec!["first", "second", "first", "second"]);
}

#[test]
fn handler_sees_a_command_before_the_producer_continues() {
    let seen = Rc::new(RefCell::new(0usize));
    let counter = Rc::clone(&seen);

    let mut stream = CommandStream::new();
    stream.add_handler(Box::new(move |_: &Command| *counter.borrow_mut() += 1));

    stream.write(Command::text("a")).unwrap();
    assert_eq!(*seen.borrow(), 1);
    stream.write(Command::text("b")).unwrap();
    assert_eq!(*seen.borrow(), 2);
}

#[test]
fn close_notifies_handlers_once() {
    let (mut stream, recording) = recorded_stream();

    stream.close();
    stream.close();

    assert!(stream.is_closed());
    assert_eq!(recording.borrow().done_calls, 1);
}

#[test]
fn writing_after_close_is_a_compiler_error() {
    let (mut stream, recording) = recorded_stream();
    stream.close();

    let error = stream.write(Command::text("late")).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);

    let error = stream.warn(StreamWarning::new("late", "")).unwrap_err();
    assert_eq!(error.error_type, ErrorType::Compiler);

    assert!(stream.is_empty());
    assert!(recording.borrow().commands.is_empty());
}

#[test]
fn warnings_reach_handlers_and_replay() {
    let (mut stream, recording) = recorded_stream();

    let warning = StreamWarning::new("Unknown option 'foo'", "${x @ foo}");
    stream.warn(warning.clone()).unwrap();

    assert_eq!(recording.borrow().warnings, vec![warning.clone()]);
    assert_eq!(stream.warnings(), &[warning.clone()]);

    let compiler_warning = warning.to_compiler_warning();
    assert_eq!(compiler_warning.code, "${x @ foo}");
    assert_eq!(compiler_warning.warning_kind, WarningKind::Template);
}

#[test]
fn prebuilt_streams_are_closed() {
    let mut stream = CommandStream::from_commands(vec![Command::text("x")]);

    assert!(stream.is_closed());
    assert!(stream.write(Command::text("y")).is_err());

    let (commands, warnings) = stream.into_parts();
    assert_eq!(commands, vec![Command::text("x")]);
    assert!(warnings.is_empty());
}
