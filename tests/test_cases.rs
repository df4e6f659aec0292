use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use excel_csv::{ExcelCsvInput, RewriteMode, RewriteOptions, error::RewriteErrorKind, process_csv};

fn options(mode: RewriteMode) -> RewriteOptions {
    RewriteOptions {
        mode,
        chunk_size_kb: 1,
        ..Default::default()
    }
}

fn run_test_case(test_dir_path: &Path, mode: RewriteMode) {
    let test_dir = std::fs::read_dir(test_dir_path).unwrap();

    let mut input = None;
    let mut output = None;

    for test_entry in test_dir {
        let test_entry = test_entry.unwrap();
        if !test_entry.file_type().unwrap().is_file() {
            continue;
        }

        match test_entry.file_name().to_str().unwrap() {
            "input.csv" => {
                input = Some(test_entry.path());
            }
            "output.csv" => {
                output = Some(test_entry.path());
            }
            _ => {}
        }
    }

    let input_file = input.expect("input file not found");
    let original = std::fs::read(&input_file).unwrap();

    // the output lands next to the input, so work on a copy
    let sandbox = tempfile::tempdir().unwrap();
    let file = sandbox.path().join("input.csv");
    std::fs::copy(&input_file, &file).unwrap();

    let summary = process_csv(&ExcelCsvInput {
        file: file.clone(),
        rewrite_options: options(mode),
    })
    .unwrap();

    assert_eq!(summary.output_path, sandbox.path().join("input_excel.csv"));
    let res = std::fs::read(&summary.output_path).unwrap();

    let output = output.expect("output file not found but csv was successfully produced");
    let v = std::fs::read(output).unwrap();

    assert_eq!(
        res,
        v,
        "\n{}\n!=\n{}",
        String::from_utf8_lossy(&res),
        String::from_utf8_lossy(&v)
    );
    assert_eq!(summary.bytes_written, v.len() as u64);
    assert_eq!(std::fs::read(&file).unwrap(), original, "input was modified");
}

fn run_test_case_all_modes(name: &str) {
    let path = PathBuf::from_str("tests/test_cases").unwrap().join(name);
    run_test_case(&path, RewriteMode::WholeFile);
    run_test_case(&path, RewriteMode::Streaming);
}

#[test]
fn test_simple_case() {
    run_test_case_all_modes("simple")
}

#[test]
fn test_no_commas_case() {
    run_test_case_all_modes("no_commas")
}

#[test]
fn test_quoted_fields_case() {
    run_test_case_all_modes("quoted_fields")
}

#[test]
fn test_semicolons_case() {
    run_test_case_all_modes("semicolons")
}

#[test]
fn test_crlf_case() {
    run_test_case_all_modes("crlf")
}

#[test]
fn test_empty_case() {
    run_test_case_all_modes("empty")
}

#[test]
fn test_unicode_case() {
    run_test_case_all_modes("unicode")
}

#[test]
fn test_missing_input_creates_nothing() {
    for mode in [RewriteMode::WholeFile, RewriteMode::Streaming] {
        let sandbox = tempfile::tempdir().unwrap();
        let file = sandbox.path().join("missing.csv");

        let err = process_csv(&ExcelCsvInput {
            file,
            rewrite_options: options(mode),
        })
        .unwrap_err();

        assert_eq!(err.kind(), RewriteErrorKind::InputNotFound);
        assert_eq!(std::fs::read_dir(sandbox.path()).unwrap().count(), 0);
    }
}

#[test]
fn test_second_pass_is_noop() {
    let sandbox = tempfile::tempdir().unwrap();
    let file = sandbox.path().join("data.csv");
    std::fs::write(&file, "a,b,c\n1,2,3\n").unwrap();

    let first = process_csv(&ExcelCsvInput {
        file,
        rewrite_options: Default::default(),
    })
    .unwrap();
    let first_content = std::fs::read(&first.output_path).unwrap();

    let renamed = sandbox.path().join("again.csv");
    std::fs::rename(&first.output_path, &renamed).unwrap();

    let second = process_csv(&ExcelCsvInput {
        file: renamed,
        rewrite_options: Default::default(),
    })
    .unwrap();

    assert_eq!(second.output_path, sandbox.path().join("again_excel.csv"));
    assert_eq!(second.delimiters_replaced, 0);
    assert_eq!(std::fs::read(&second.output_path).unwrap(), first_content);
}

#[test]
fn test_extension_is_not_checked() {
    let sandbox = tempfile::tempdir().unwrap();
    let file = sandbox.path().join("report.text");
    std::fs::write(&file, "x,y\n").unwrap();

    let summary = process_csv(&ExcelCsvInput {
        file,
        rewrite_options: Default::default(),
    })
    .unwrap();

    assert_eq!(summary.output_path, sandbox.path().join("report._excel.csv"));
    assert_eq!(std::fs::read_to_string(&summary.output_path).unwrap(), "x;y\n");
}

#[test]
fn test_huge_chunk_size_streams_small_file() {
    let sandbox = tempfile::tempdir().unwrap();
    let file = sandbox.path().join("data.csv");
    std::fs::write(&file, "a,b\n").unwrap();

    let summary = process_csv(&ExcelCsvInput {
        file,
        rewrite_options: RewriteOptions {
            mode: RewriteMode::Streaming,
            chunk_size_kb: u32::MAX,
            ..Default::default()
        },
    })
    .unwrap();

    assert_eq!(std::fs::read_to_string(&summary.output_path).unwrap(), "a;b\n");
}
