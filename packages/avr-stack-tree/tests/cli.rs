use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::path::PathBuf;

const LISTING: &str = concat!(
    "\n",
    "firmware.elf:     file format elf32-avr\n",
    "\n",
    "Disassembly of section .text:\n",
    "\n",
    "00000100 <main>:\n",
    " 100:\tcf 93       \tpush\tr28\n",
    " 102:\tdf 93       \tpush\tr29\n",
    " 104:\tcd b7       \tin\tr28, 0x3d\t; 61\n",
    " 106:\tde b7       \tin\tr29, 0x3e\t; 62\n",
    " 108:\t2e 97       \tsbiw\tr28, 0x0e\t; 14\n",
    " 10a:\t0e 94 90 00 \tcall\t0x120\t; 0x120 <helper>\n",
    " 10e:\tff cf       \trjmp\t.-2      \t; 0x10e <main+0xe>\n",
    "\n",
    "00000120 <helper>:\n",
    " 120:\t0f 93       \tpush\tr16\n",
    " 122:\t0c 94 50 00 \tjmp\t0xa0\t; 0xa0 <printf>\n",
);

fn write_listing(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("firmware.lss");
    std::fs::write(&path, LISTING).expect("failed to write listing");
    path
}

fn cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_avr-stack-tree"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn prints_tree_and_deepest_size() {
    let dir = tempfile::tempdir().unwrap();
    let lss = write_listing(&dir);

    cmd()
        .arg(&lss)
        .arg("main")
        .assert()
        .success()
        .stdout(contains(" 16  16 main\n"))
        .stdout(contains(" 17   1   helper\n"))
        .stdout(contains(" 17   0     printf\n"))
        .stdout(contains("Deepest stacksize: 17\n"));
}

#[test]
fn missing_root_warns_and_still_walks() {
    let dir = tempfile::tempdir().unwrap();
    let lss = write_listing(&dir);

    cmd()
        .arg(&lss)
        .arg("nosuch")
        .assert()
        .success()
        .stdout(contains("  0   0 nosuch\n"))
        .stdout(contains("Deepest stacksize: 0"))
        .stderr(contains("Function \"nosuch\" not found"));
}

#[test]
fn dump_lists_functions_before_the_tree() {
    let dir = tempfile::tempdir().unwrap();
    let lss = write_listing(&dir);

    cmd()
        .arg(&lss)
        .arg("helper")
        .arg("--dump")
        .assert()
        .success()
        .stdout(contains("<Function name=main addr=0x0100>\n>>\thelper\n"))
        .stdout(contains("<Function name=helper addr=0x0120>\n>>\tprintf\n"))
        .stdout(contains("  1   1 helper\n"));
}

#[test]
fn json_output_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let lss = write_listing(&dir);

    let output = cmd()
        .arg(&lss)
        .arg("main")
        .arg("--json")
        .output()
        .expect("failed to run");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["deepest"], 17);
    assert_eq!(value["root"]["own"], 16);
}

#[test]
fn max_depth_cuts_the_tree() {
    let dir = tempfile::tempdir().unwrap();
    let lss = write_listing(&dir);

    cmd()
        .arg(&lss)
        .arg("main")
        .args(["--max-depth", "0"])
        .assert()
        .success()
        .stdout(contains(" 17   1   helper\n"))
        .stdout(contains("!!!! Nested too deeply"))
        .stdout(contains("Deepest stacksize: 16\n"));
}

#[test]
fn crlf_listing_is_split_into_functions() {
    let dir = tempfile::tempdir().unwrap();
    let lss = dir.path().join("firmware.lss");
    std::fs::write(&lss, LISTING.replace('\n', "\r\n")).unwrap();

    cmd()
        .arg(&lss)
        .arg("main")
        .assert()
        .success()
        .stdout(contains(" 17   1   helper\n"))
        .stdout(contains("Deepest stacksize: 17\n"));
}

#[test]
fn unreadable_file_fails() {
    cmd()
        .arg("/nonexistent/firmware.lss")
        .arg("main")
        .assert()
        .failure()
        .stderr(contains("failed to read /nonexistent/firmware.lss"));
}

#[test]
fn requires_both_arguments() {
    cmd()
        .arg("firmware.lss")
        .assert()
        .failure()
        .stderr(contains("FUNC").and(contains("Usage")));
}
