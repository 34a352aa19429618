use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

fn secassess_cmd(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_secassess"));
    cmd.env("HOME", home);
    cmd.env_remove("SECASSESS_CONFIG");
    cmd.env_remove("SECASSESS_UI_COLOR");
    cmd.env_remove("SECASSESS_UI_MAX_TABLE_ROWS");
    cmd.env_remove("SECASSESS_RULES_DISABLED");
    cmd.env_remove("SECASSESS_ASSESS_EXCLUDE");
    cmd.env_remove("SECASSESS_REPORT_INCLUDE_REMEDIATION");
    cmd
}

fn run(home: &Path, args: &[&str]) -> Output {
    secassess_cmd(home).args(args).output().expect("run secassess")
}

fn make_temp_home() -> PathBuf {
    static HOME_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = HOME_SEQ.fetch_add(1, Ordering::Relaxed);
    let home =
        std::env::temp_dir().join(format!("secassess-exit-test-{}-{seq}", std::process::id()));
    let _ = std::fs::remove_dir_all(&home);
    std::fs::create_dir_all(&home).expect("create home");
    home
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdirs");
    }
    std::fs::write(path, bytes).expect("write");
}

#[test]
fn completion_unknown_shell_exits_2() {
    let home = make_temp_home();
    let out = run(&home, &["completion", "nope"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn missing_input_file_exits_2() {
    let home = make_temp_home();
    let missing = home.join("does-not-exist.json");
    let out = run(&home, &["assess", missing.to_str().expect("utf8 path")]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn unknown_rule_id_exits_2() {
    let home = make_temp_home();
    let input = home.join("inv.json");
    write_file(&input, br#"{"resources":[]}"#);
    let out = run(
        &home,
        &["assess", input.to_str().expect("utf8 path"), "--disable", "firewall"],
    );
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("firewall"), "stderr={stderr}");
    assert!(stderr.contains("next:"), "stderr={stderr}");
    assert!(stderr.contains("secassess rules"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn invalid_exclude_glob_exits_2() {
    let home = make_temp_home();
    let input = home.join("inv.json");
    write_file(&input, br#"{"resources":[]}"#);
    let out = run(
        &home,
        &["assess", input.to_str().expect("utf8 path"), "--exclude", "["],
    );
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn json_and_markdown_together_exit_2() {
    let home = make_temp_home();
    let input = home.join("inv.json");
    write_file(&input, br#"{"resources":[]}"#);
    let out = run(
        &home,
        &["assess", input.to_str().expect("utf8 path"), "--json", "--markdown"],
    );
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn invalid_config_toml_exits_2() {
    let home = make_temp_home();
    write_file(
        home.join(".config/secassess/config.toml").as_path(),
        b"[ui\ncolor = ",
    );
    let out = run(&home, &["rules"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn fail_on_findings_exits_1_only_when_something_is_found() {
    let home = make_temp_home();
    let flagged = home.join("flagged.json");
    let clean = home.join("clean.json");
    write_file(&flagged, br#"{"resources":[{"name":"x","password":"p"}]}"#);
    write_file(&clean, br#"{"resources":[{"name":"y"}]}"#);

    let out = run(
        &home,
        &["assess", flagged.to_str().expect("utf8 path"), "--fail-on-findings", "--quiet"],
    );
    assert_eq!(out.status.code(), Some(1));

    let out = run(
        &home,
        &["assess", clean.to_str().expect("utf8 path"), "--fail-on-findings", "--quiet"],
    );
    assert_eq!(out.status.code(), Some(0));

    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn malformed_input_still_exits_0() {
    let home = make_temp_home();
    let input = home.join("broken.json");
    write_file(&input, b"{ this is not json");
    let out = run(
        &home,
        &["assess", input.to_str().expect("utf8 path"), "--fail-on-findings"],
    );
    assert_eq!(out.status.code(), Some(0));
    let _ = std::fs::remove_dir_all(&home);
}

#[test]
fn non_utf8_input_is_an_empty_report_and_exits_0() {
    let home = make_temp_home();
    let input = home.join("latin1.json");
    write_file(&input, b"{\"resources\":[{\"name\":\"\xff\xfe\"}]}");
    let out = run(
        &home,
        &["assess", "--json", input.to_str().expect("utf8 path"), "--fail-on-findings"],
    );
    assert_eq!(out.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json report");
    assert_eq!(v["results"], serde_json::json!([]));
    assert_eq!(v["summary"]["notes"].as_array().map(Vec::len), Some(1));
    let _ = std::fs::remove_dir_all(&home);
}
