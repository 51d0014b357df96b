use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use seqscript_cli::{Args, OutputFormat, run};

/// Collects all .seq files from a directory
fn collect_seq_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("seq")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demos are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &Path, output: PathBuf, format: OutputFormat) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        format: Some(format),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let valid_demos = collect_seq_files(demos_path());
    assert!(!valid_demos.is_empty(), "No valid demos found in demos/");

    let mut failed_demos = Vec::new();

    for demo_path in &valid_demos {
        let stem = demo_path.file_stem().unwrap().to_string_lossy().to_string();

        for (format, extension) in [(OutputFormat::Outline, "seq"), (OutputFormat::Json, "json")] {
            let output_path = temp_dir.path().join(format!("{stem}.{extension}"));
            let args = args_for(demo_path, output_path.clone(), format);

            match run(&args) {
                Ok(()) => {
                    let written = fs::read_to_string(&output_path).expect("Output file missing");
                    assert!(!written.is_empty(), "{} produced empty output", demo_path.display());
                }
                Err(e) => failed_demos.push((demo_path.clone(), e)),
            }
        }
    }

    if !failed_demos.is_empty() {
        eprintln!("\nValid demos that failed:");
        for (path, err) in &failed_demos {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid demo run(s) failed unexpectedly", failed_demos.len());
    }

    println!("All {} valid demos passed", valid_demos.len());
}

#[test]
fn e2e_outline_output_parses_again() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    for demo_path in collect_seq_files(demos_path()) {
        let first = temp_dir.path().join("first.seq");
        let second = temp_dir.path().join("second.seq");

        run(&args_for(&demo_path, first.clone(), OutputFormat::Outline))
            .unwrap_or_else(|e| panic!("{}: {e}", demo_path.display()));
        run(&args_for(&first, second.clone(), OutputFormat::Outline))
            .unwrap_or_else(|e| panic!("outline of {}: {e}", demo_path.display()));

        assert_eq!(
            fs::read_to_string(&first).expect("Failed to read outline"),
            fs::read_to_string(&second).expect("Failed to read outline"),
            "outline of {} is not stable",
            demo_path.display()
        );
    }
}

#[test]
fn e2e_json_output_is_valid() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = demos_path().join("login.seq");
    let output = temp_dir.path().join("login.json");

    run(&args_for(&input, output.clone(), OutputFormat::Json)).expect("Failed to run");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).expect("Failed to read JSON"))
            .expect("Output is not valid JSON");
    assert_eq!(json["title"], "Login");
    assert_eq!(json["actors"][0]["id"], "browser");
    assert_eq!(json["actors"][0]["display_name"], "Web Browser");
    assert_eq!(json["items"][0]["type"], "action");
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let error_demos = collect_seq_files(demos_path().join("errors"));
    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo_path in &error_demos {
        let output_path = temp_dir.path().join(format!(
            "error_{}.seq",
            demo_path.file_stem().unwrap().to_string_lossy()
        ));
        let args = args_for(demo_path, output_path.clone(), OutputFormat::Outline);

        match run(&args) {
            Ok(()) => unexpectedly_succeeded.push(demo_path.clone()),
            Err(err) => {
                let message = err.to_string();
                assert!(
                    message.starts_with(&*demo_path.to_string_lossy()),
                    "error for {} lacks the source label: {message}",
                    demo_path.display()
                );
                assert!(!output_path.exists(), "failed run wrote output");
            }
        }
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }

    println!("All {} error demos failed as expected", error_demos.len());
}

#[test]
fn e2e_missing_input_is_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = args_for(
        &temp_dir.path().join("absent.seq"),
        temp_dir.path().join("out.seq"),
        OutputFormat::Outline,
    );

    assert!(matches!(run(&args), Err(seqscript_cli::CliError::Io(_))));
}
