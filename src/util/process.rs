use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{DepvizError, Result};
use crate::util::output;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Runs `program` to completion and returns its stdout.
///
/// `input` is fed to stdin when given. A child still running at `timeout` is killed.
/// Spawn failures, timeouts and non-zero exits are reported as collaborator errors
/// tagged with `program`.
pub fn run_command(
    program: &str,
    args: &[String],
    input: Option<&str>,
    timeout: Duration,
) -> Result<String> {
    output::step(program, &args.join(" "));

    let mut child = Command::new(program)
        .args(args)
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|err| DepvizError::collaborator(program, format!("failed to spawn: {err}")))?;

    let writer = match (input, child.stdin.take()) {
        (Some(input), Some(mut stdin)) => {
            let input = input.to_string();
            Some(thread::spawn(move || stdin.write_all(input.as_bytes())))
        }
        _ => None,
    };
    let stdout = child.stdout.take().map(spawn_reader);
    let stderr = child.stderr.take().map(spawn_reader);

    let status = wait_with_deadline(program, &mut child, timeout)?;

    if let Some(writer) = writer {
        if let Ok(Err(err)) = writer.join() {
            output::debug(&format!("{program}: stdin closed early: {err}"));
        }
    }
    let stdout = collect(program, stdout)?;
    let stderr = collect(program, stderr)?;

    if !status.success() {
        let code = status
            .code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "signal".to_string());
        return Err(DepvizError::collaborator(
            program,
            format!(
                "exited with status {code}: {}",
                String::from_utf8_lossy(&stderr).trim()
            ),
        ));
    }

    String::from_utf8(stdout)
        .map_err(|err| DepvizError::collaborator(program, format!("emitted invalid UTF-8: {err}")))
}

fn wait_with_deadline(program: &str, child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(err) => return Err(terminate(program, child, format!("failed to wait: {err}"))),
        }
        if Instant::now() >= deadline {
            return Err(terminate(
                program,
                child,
                format!("timed out after {}s", timeout.as_secs_f64()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Kills and reaps `child`, returning the collaborator error to report.
fn terminate(program: &str, child: &mut Child, message: String) -> DepvizError {
    let _ = child.kill();
    let _ = child.wait();
    DepvizError::collaborator(program, message)
}

fn spawn_reader<R>(mut source: R) -> JoinHandle<std::io::Result<Vec<u8>>>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        source.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(
    program: &str,
    handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
) -> Result<Vec<u8>> {
    match handle {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| DepvizError::collaborator(program, "output reader panicked"))??;
            Ok(bytes)
        }
        None => Ok(Vec::new()),
    }
}
