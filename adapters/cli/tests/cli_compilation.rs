use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "grid-tactics"])
        .status()
        .expect("failed to invoke cargo check for grid-tactics CLI binary");

    assert!(status.success(), "cargo check --bin grid-tactics should succeed");
}

#[test]
fn help_lists_game_flags_only() {
    let output = Command::new(env!("CARGO_BIN_EXE_grid-tactics"))
        .arg("--help")
        .output()
        .expect("failed to run grid-tactics --help");

    assert!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    for flag in ["--config", "--seed", "--grid-size", "--move-radius", "--no-animate", "--plain"] {
        assert!(help.contains(flag), "help should mention {flag}");
    }
    assert!(!help.contains("--load"));
}

#[test]
fn invalid_configuration_fails_before_taking_over_the_terminal() {
    let output = Command::new(env!("CARGO_BIN_EXE_grid-tactics"))
        .args(["--move-radius", "0"])
        .stdin(std::process::Stdio::null())
        .output()
        .expect("failed to run grid-tactics");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid game configuration"));
    assert!(output.stdout.is_empty());
}
