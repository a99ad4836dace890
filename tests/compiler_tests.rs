use sightly::compiler_frontend::commands::command_display::display_commands;
use sightly::{CompilerFrontend, Config, TemplateSource};
use std::fs;

// Each case is parser output as JSON, with the expected class name and
// command listing in a sibling `.expected` file
#[test]
fn test_all_cases_in_folder() {
    let frontend = CompilerFrontend::new(&Config::default(), &[]).unwrap();
    let mut errors = Vec::new();
    let mut case_count = 0;

    for entry in fs::read_dir("tests/cases").unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        case_count += 1;

        let source: TemplateSource =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let expected = fs::read_to_string(path.with_extension("expected")).unwrap();

        let unit = match frontend.compile(source) {
            Ok(unit) => unit,
            Err(messages) => {
                let reasons: Vec<String> = messages.errors.iter().map(|e| e.msg.to_owned()).collect();
                errors.push(format!("{}: failed to compile: {}", path.display(), reasons.join(", ")));
                continue;
            }
        };

        let got = format!(
            "class {}\n{}",
            unit.class_identity.fully_qualified_name,
            display_commands(&unit.commands)
        );

        if got.trim_end() != expected.trim_end() {
            errors.push(format!(
                "{}:\n--- got ---\n{}\n--- expected ---\n{}",
                path.display(),
                got,
                expected
            ));
        }
    }

    assert!(case_count > 0, "no cases found in tests/cases");

    if !errors.is_empty() {
        panic!("Some cases failed:\n{}", errors.join("\n"));
    }
}

#[test]
fn cases_compile_the_same_in_parallel() {
    let frontend = CompilerFrontend::new(&Config::default(), &[]).unwrap();
    let mut sources = Vec::new();

    for entry in fs::read_dir("tests/cases").unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            let source: TemplateSource =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            sources.push(source);
        }
    }

    let sequential: Vec<_> = sources
        .iter()
        .map(|source| frontend.compile(source.to_owned()).unwrap())
        .collect();
    let parallel: Vec<_> = frontend
        .compile_units(sources)
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    assert_eq!(sequential, parallel);
}
