// Minimal integration test that drives the compiled binary through a PTY.
// This exercises the real event loop and crossterm input handling across
// the main boundaries without relying on internal modules.
//
// Notes:
// - Requires a TTY; uses expectrl which allocates a pseudo terminal.
// - Marked Unix-only and ignored by default to avoid CI/platform issues.
// - Run manually via: `cargo test --test integration_min_session -- --ignored`.

#![cfg(unix)]

use std::time::Duration;

use expectrl::{spawn, Eof};

#[test]
#[ignore]
fn empty_session_quits_without_prompting() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("skriv");
    let cmd = format!("{} -d {}", bin.display(), dir.path().display());

    let mut p = spawn(cmd)?;

    // Give the app a moment to initialize the terminal/alternate screen
    std::thread::sleep(Duration::from_millis(200));

    // Nothing typed, so ctrl+q exits immediately
    p.send("\x11")?;

    p.expect(Eof)?;
    Ok(())
}

#[test]
#[ignore]
fn typed_words_require_discard_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let bin = assert_cmd::cargo::cargo_bin("skriv");
    let cmd = format!("{} -d {}", bin.display(), dir.path().display());

    let mut p = spawn(cmd)?;

    std::thread::sleep(Duration::from_millis(200));

    p.send("some words")?;
    std::thread::sleep(Duration::from_millis(200));

    // ctrl+q raises the unsaved-words prompt; n discards and quits
    p.send("\x11")?;
    std::thread::sleep(Duration::from_millis(200));
    p.send("n")?;

    p.expect(Eof)?;
    Ok(())
}
