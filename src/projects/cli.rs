//! Command-line entrypoints for the sightly compiler.
//!
//! The markup parser lives elsewhere, so `compile` reads its output as JSON:
//! either a whole `{ "script_path": ..., "events": [...] }` object or a bare event array
//! with the script path given by `--script`.

use crate::compiler_frontend::commands::command_display::display_commands;
use crate::compiler_frontend::commands::template_events::TemplateEvent;
use crate::compiler_frontend::compiler_errors::{CompilerError, CompilerMessages};
use crate::compiler_frontend::display_messages::print_compiler_messages;
use crate::compiler_frontend::source_identifier::source_identifier::SourceIdentifier;
use crate::compiler_frontend::{CompilerFrontend, Flag, TemplateSource};
use crate::projects::settings::Config;
use saying::say;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Compile {
        events_path: String,
        script_path: Option<String>,
        config_path: Option<String>,
        json: bool,
    },

    // Script path to fully qualified class name
    Class(String),

    // Fully qualified class name back to its script path
    Script(String),

    Help,
}

pub fn start_cli() {
    let compiler_args: Vec<String> = env::args().collect();

    if compiler_args.len() < 2 {
        print_help(false);
        return;
    }

    let command = match get_command(&compiler_args[1..]) {
        Ok(command) => command,
        Err(e) => {
            say!(Red e);
            print_help(true);
            return;
        }
    };

    let flags = get_flags(&compiler_args);

    match command {
        Command::Help => print_help(false),

        Command::Compile {
            events_path,
            script_path,
            config_path,
            json,
        } => {
            let unit = load_config(config_path.as_deref())
                .and_then(|config| CompilerFrontend::new(&config, &flags))
                .map_err(CompilerMessages::from_error)
                .and_then(|frontend| {
                    let source = read_template_source(Path::new(&events_path), script_path)
                        .map_err(CompilerMessages::from_error)?;
                    frontend.compile(source)
                });

            let unit = match unit {
                Ok(unit) => unit,
                Err(messages) => {
                    print_compiler_messages(messages);
                    return;
                }
            };

            if json {
                match serde_json::to_string_pretty(&unit) {
                    Ok(output) => println!("{output}"),
                    Err(e) => {
                        say!(Red "Couldn't write the compiled template as JSON: ", { e.to_string() });
                    }
                }
                return;
            }

            let class_name = &unit.class_identity.fully_qualified_name;
            say!(Green class_name);
            print!("{}", display_commands(&unit.commands));
            print_compiler_messages(CompilerMessages::new().with_warnings(unit.compiler_warnings()));
        }

        Command::Class(script_path) => {
            let identifier = match load_config(None) {
                Ok(config) => SourceIdentifier::from_config(&config),
                Err(e) => {
                    print_compiler_messages(CompilerMessages::from_error(e));
                    return;
                }
            };

            match identifier.for_script(&script_path) {
                Ok(identity) => {
                    say!(identity.fully_qualified_name);
                }
                Err(e) => print_compiler_messages(CompilerMessages::from_error(e)),
            }
        }

        Command::Script(class_name) => {
            let identifier = match load_config(None) {
                Ok(config) => SourceIdentifier::from_config(&config),
                Err(e) => {
                    print_compiler_messages(CompilerMessages::from_error(e));
                    return;
                }
            };

            match identifier.script_path_for(&class_name) {
                Some(script_path) => {
                    say!(script_path);
                }
                None => {
                    say!(Red "'", class_name, "' is not a class name this namespace can produce");
                }
            }
        }
    }
}

fn get_command(args: &[String]) -> Result<Command, String> {
    let command = args.first().map(String::as_str);

    match command {
        Some("help") => Ok(Command::Help),
        Some("compile") => parse_compile_command(args),

        Some("class") => match args.get(1) {
            Some(path) if !path.starts_with("--") => Ok(Command::Class(path.to_owned())),
            _ => Err(String::from("Missing script path (try 'sly class /apps/site/page.html')")),
        },

        Some("script") => match args.get(1) {
            Some(name) if !name.starts_with("--") => Ok(Command::Script(name.to_owned())),
            _ => Err(String::from("Missing class name (try 'sly script htl_generated.apps.page__002e__html')")),
        },

        Some(other) => Err(format!("Invalid command: '{other}'")),
        None => Err(String::from("No command given")),
    }
}

fn get_flags(args: &[String]) -> Vec<Flag> {
    let mut flags = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--no-optimize" => flags.push(Flag::DisableOptimizations),
            "--hide-warnings" => flags.push(Flag::DisableWarnings),
            "--hide-timers" => flags.push(Flag::DisableTimers),
            _ => {}
        }
    }

    flags
}

fn parse_compile_command(args: &[String]) -> Result<Command, String> {
    let mut events_path = String::new();
    let mut script_path = None;
    let mut config_path = None;
    let mut json = false;
    let mut index = 1usize;

    while let Some(arg) = args.get(index) {
        match arg.as_str() {
            "--script" | "--config" => {
                let Some(value) = args.get(index + 1) else {
                    return Err(format!("Missing value for {arg}"));
                };
                if value.starts_with("--") {
                    return Err(format!("Missing value for {arg}"));
                }

                if arg == "--script" {
                    script_path = Some(value.to_owned());
                } else {
                    config_path = Some(value.to_owned());
                }
                index += 2;
            }
            "--json" => {
                json = true;
                index += 1;
            }
            "--no-optimize" | "--hide-warnings" | "--hide-timers" => {
                index += 1;
            }
            _ if arg.starts_with("--") => {
                return Err(format!(
                    "Unknown compile flag: '{arg}'. Supported compile flags are --script, --config, --json, --no-optimize."
                ));
            }
            _ => {
                if events_path.is_empty() {
                    events_path = arg.to_owned();
                    index += 1;
                } else {
                    return Err(String::from(
                        "Compile command accepts exactly one events file.",
                    ));
                }
            }
        }
    }

    if events_path.is_empty() {
        return Err(String::from(
            "Missing events file (try 'sly compile page.json --script /apps/site/page.html')",
        ));
    }

    Ok(Command::Compile {
        events_path,
        script_path,
        config_path,
        json,
    })
}

fn load_config(config_path: Option<&str>) -> Result<Config, CompilerError> {
    match config_path {
        Some(path) => Config::load(Path::new(path)),
        None => {
            let dir = match env::current_dir() {
                Ok(dir) => dir,
                Err(e) => {
                    return Err(CompilerError::file_error(
                        Path::new("."),
                        format!("Couldn't read the current directory: {e}"),
                    ));
                }
            };
            Config::discover(&dir)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EventsFile {
    Source(TemplateSource),
    Events(Vec<TemplateEvent>),
}

fn read_template_source(
    path: &Path,
    script_path: Option<String>,
) -> Result<TemplateSource, CompilerError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return Err(CompilerError::file_error(
                path,
                format!("Couldn't read the events file: {e}"),
            ));
        }
    };

    parse_template_source(&content, script_path)
}

/// `--script` wins over a script path inside the file
fn parse_template_source(
    content: &str,
    script_path: Option<String>,
) -> Result<TemplateSource, CompilerError> {
    let events_file: EventsFile = match serde_json::from_str(content) {
        Ok(events_file) => events_file,
        Err(e) => {
            return Err(CompilerError::new_template_error(format!(
                "The events file is not valid parser output: {e}"
            )));
        }
    };

    match (events_file, script_path) {
        (EventsFile::Source(source), None) => Ok(source),
        (EventsFile::Source(source), Some(script_path)) => Ok(TemplateSource {
            script_path,
            events: source.events,
        }),
        (EventsFile::Events(events), Some(script_path)) => Ok(TemplateSource {
            script_path,
            events,
        }),
        (EventsFile::Events(_), None) => Err(CompilerError::new_template_error(
            "The events file has no script path, pass one with --script",
        )),
    }
}

fn print_help(commands_only: bool) {
    if !commands_only {
        say!(Bright Black "------------------------------------");
        say!(Green Bold "The sightly HTL template compiler");
        say!("Usage: ", Bold "<command>", Italic " <args>");
    }
    say!(Green Bold "\nCommands:");
    say!("  compile <events.json>  - Compiles parser output into an optimized command stream");
    say!("  class <script path>    - Prints the class name generated for a script");
    say!("  script <class name>    - Prints the script a class name was generated from");
    say!("  help                   - Shows this message");

    say!(Green Bold "\nCompile options:");
    say!("  --script <path>    (script path of the template, required for bare event arrays)");
    say!("  --config <file>    (default: ./sightly.toml if present)");
    say!("  --json             (print the compiled template as JSON)");

    say!(Green Bold "\nFlags:");
    say!("  --no-optimize");
    say!("  --hide-warnings");
    say!("  --hide-timers");
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
