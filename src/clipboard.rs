//! System clipboard through whichever copy tool is installed.

use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
];

/// Copy text without blocking the UI for more than ~100ms.
///
/// The copy runs on a helper thread. A tool still running when the wait
/// elapses is reported as success.
pub fn copy(content: &str) -> Result<(), String> {
    let (tx, rx) = mpsc::channel();
    let content = content.to_string();

    thread::spawn(move || {
        let _ = tx.send(copy_sync(&content));
    });

    match rx.recv_timeout(Duration::from_millis(100)) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => Ok(()),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err("clipboard thread terminated unexpectedly".to_string())
        }
    }
}

fn copy_sync(content: &str) -> Result<(), String> {
    for (cmd, args) in COMMANDS {
        let Ok(mut child) = Command::new(cmd)
            .args(*args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        else {
            continue;
        };

        let Some(mut stdin) = child.stdin.take() else {
            continue;
        };
        if stdin.write_all(content.as_bytes()).is_err() {
            let _ = child.kill();
            continue;
        }
        drop(stdin);

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) if status.success() => return Ok(()),
                Ok(Some(_)) | Err(_) => break,
                Ok(None) if started.elapsed() > Duration::from_secs(5) => {
                    let _ = child.kill();
                    break;
                }
                Ok(None) => thread::sleep(Duration::from_millis(50)),
            }
        }
    }

    let tried: Vec<&str> = COMMANDS.iter().map(|(c, _)| *c).collect();
    Err(format!("no clipboard command available (tried {})", tried.join(", ")))
}
