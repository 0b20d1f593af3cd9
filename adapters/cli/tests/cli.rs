use std::process::Command;

fn hex_defence() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_hex-defence"));
    let _ = command
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .env("RUST_LOG", "warn");
    command
}

#[test]
fn short_game_prints_the_summary() {
    let output = hex_defence()
        .args(["--waves", "2", "--seed", "3", "--max-ticks", "20000"])
        .output()
        .expect("failed to run the hex-defence binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Hex Defence."), "{stdout}");
    assert!(stdout.contains("Waves survived: "), "{stdout}");
    assert!(stdout.contains("Money left: "), "{stdout}");
    assert!(stdout.contains("Lives left: "), "{stdout}");
}

#[test]
fn example_settings_are_accepted() {
    let output = hex_defence()
        .args(["--settings", "settings.example.toml", "--max-ticks", "200"])
        .output()
        .expect("failed to run the hex-defence binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("/30"), "{stdout}");
}

#[test]
fn missing_settings_file_is_reported() {
    let output = hex_defence()
        .args(["--settings", "does-not-exist.toml"])
        .output()
        .expect("failed to run the hex-defence binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.toml"), "{stderr}");
}
