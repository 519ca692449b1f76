use std::process::Command;

#[test]
fn help_displays_overview() {
    let binary = env!("CARGO_BIN_EXE_quote-ticker");
    let output = Command::new(binary)
        .arg("--help")
        .output()
        .expect("invoke quote-ticker --help");

    assert!(output.status.success(), "help command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Scrolling stock quote ticker"),
        "expected overview text in help output"
    );
}

#[test]
fn watch_once_prints_duplicated_strip_for_snapshot_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot = dir.path().join("stock_data.json");
    std::fs::write(
        &snapshot,
        r#"{"AAPL": {"data": [150.5, 2.3, 1.55], "logo": "a.png"}}"#,
    )
    .expect("write snapshot");

    let binary = env!("CARGO_BIN_EXE_quote-ticker");
    let output = Command::new(binary)
        .args(["watch", "--once", "--snapshot"])
        .arg(&snapshot)
        .output()
        .expect("invoke quote-ticker watch");

    assert!(output.status.success(), "watch --once should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.matches("AAPL: 150.50").count(), 2);
    assert!(stdout.contains("<span class='positive'>+2.30 (+1.55%)</span>"));
}

#[test]
fn watch_once_fails_on_malformed_snapshot() {
    let dir = tempfile::tempdir().expect("tempdir");
    let snapshot = dir.path().join("stock_data.json");
    std::fs::write(&snapshot, "not json").expect("write snapshot");

    let binary = env!("CARGO_BIN_EXE_quote-ticker");
    let output = Command::new(binary)
        .args(["watch", "--once", "--snapshot"])
        .arg(&snapshot)
        .output()
        .expect("invoke quote-ticker watch");

    assert!(!output.status.success(), "malformed snapshot should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("app.exit"));
}
