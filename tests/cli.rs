// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Integration tests for the lamdef command

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

mod helpers;
use helpers::{fixture_path, load_fixture};

fn lamdef() -> Command {
    let mut command = Command::cargo_bin("lamdef").unwrap();
    command.arg("--no-color");
    command
}

#[test]
fn test_expand_file_to_stdout() {
    lamdef()
        .arg("expand")
        .arg(fixture_path("multiline_lambda.py"))
        .assert()
        .success()
        .stdout(load_fixture("multiline_lambda.expanded.py"));
}

#[test]
fn test_expand_from_stdin() {
    lamdef()
        .arg("expand")
        .write_stdin("x = f(lamdef(a):\n    return a\n)\n")
        .assert()
        .success()
        .stdout("def _lamdef_1(a):\n    return a\nx = f(_lamdef_1)\n");
}

#[test]
fn test_expand_single_line() {
    lamdef()
        .args(["expand", "--line", "67"])
        .arg(fixture_path("multiline_lambda.py"))
        .assert()
        .success()
        .stdout(predicate::str::contains("    def add_one(x):"))
        .stdout(predicate::str::contains("key=lamdef(user):"));
}

#[test]
fn test_expand_in_place() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", load_fixture("multiline_lambda.py")).unwrap();

    lamdef()
        .args(["expand", "--in-place"])
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let rewritten = std::fs::read_to_string(file.path()).unwrap();
    assert_eq!(rewritten, load_fixture("multiline_lambda.expanded.py"));
}

#[test]
fn test_expand_to_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("expanded.py");

    lamdef()
        .args(["expand", "--indent", "tabs", "--prefix", "_fn", "-o"])
        .arg(&output)
        .write_stdin("x = f(lamdef(a):\n    return a\n)\n")
        .assert()
        .success();

    let rewritten = std::fs::read_to_string(&output).unwrap();
    assert_eq!(rewritten, "def _fn1(a):\n\treturn a\nx = f(_fn1)\n");
}

#[test]
fn test_expand_reports_malformed_block() {
    lamdef()
        .arg("expand")
        .write_stdin("x = f(lamdef(a):\n)\n")
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("[L101]"))
        .stderr(predicate::str::contains("<stdin>"));
}

#[test]
fn test_expand_warns_about_inline_header() {
    lamdef()
        .arg("expand")
        .write_stdin("a = {lamdef(x): 1}\nb = f(lamdef(y):\n    return y\n)\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("a = {lamdef(x): 1}\n"))
        .stdout(predicate::str::contains("b = f(_lamdef_1)\n"))
        .stderr(predicate::str::contains("[W001]"));
}

#[test]
fn test_check_clean_file() {
    lamdef()
        .arg("check")
        .arg(fixture_path("multiline_lambda.py"))
        .assert()
        .success();
}

#[test]
fn test_check_json() {
    let output = lamdef()
        .args(["check", "--format", "json"])
        .write_stdin("a = {lamdef(x): 1}\nb = f(lamdef(y):\n)\n")
        .assert()
        .failure()
        .get_output()
        .stdout
        .clone();

    let diagnostics: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let diagnostics = diagnostics.as_array().unwrap();
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics[0]["severity"], "warning");
    assert_eq!(diagnostics[1]["severity"], "error");
}

#[test]
fn test_list_json() {
    let output = lamdef()
        .args(["list", "--format", "json"])
        .arg(fixture_path("multiline_lambda.py"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let listing: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let blocks = listing["blocks"].as_array().unwrap();
    assert_eq!(blocks.len(), 5);
    assert_eq!(blocks[3]["direct_assignment"], "add_one");
    assert_eq!(blocks[0]["line"], 38);
}

#[test]
fn test_list_text() {
    lamdef()
        .arg("list")
        .write_stdin("add_one = lamdef(x):\n    return x + 1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<stdin>:1:11: lamdef(x) [1 body lines] -> def add_one",
        ));
}

#[test]
fn test_config_file() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "name_prefix = \"_cb\"\ndirect_assignment = false").unwrap();

    lamdef()
        .arg("--config")
        .arg(config.path())
        .arg("expand")
        .write_stdin("add_one = lamdef(x):\n    return x + 1\n")
        .assert()
        .success()
        .stdout("def _cb1(x):\n    return x + 1\nadd_one = _cb1\n");
}

#[test]
fn test_sample_config() {
    lamdef()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("name_prefix = \"_lamdef_\""));
}

#[test]
fn test_in_place_requires_file() {
    lamdef().args(["expand", "--in-place"]).assert().failure();
}
