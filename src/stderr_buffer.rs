use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

fn lock() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Activate buffering. While active, log lines are stored
/// instead of printed to stderr (the dashboard owns the terminal).
pub fn activate() {
    *lock() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages.
pub fn drain() -> Vec<String> {
    lock().take().unwrap_or_default()
}

/// Store a message if buffering is active, otherwise print it to stderr immediately.
pub fn write_line(msg: &str) {
    let mut guard = lock();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg.to_string());
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// `io::Write` handle routed through the buffer. Used as the tracing writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedStderr;

/// Writer factory for `tracing_subscriber::fmt().with_writer(...)`.
pub fn writer() -> BufferedStderr {
    BufferedStderr
}

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let mut guard = lock();
        match guard.as_mut() {
            Some(lines) => {
                lines.extend(
                    text.lines()
                        .filter(|l| !l.trim().is_empty())
                        .map(str::to_string),
                );
                Ok(buf.len())
            }
            None => {
                drop(guard);
                io::stderr().write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so the shared buffer isn't raced by parallel tests.
    #[test]
    fn test_buffering_lifecycle() {
        activate();
        write_line("first");
        writer().write_all(b"second\nthird\n").unwrap();
        let lines = drain();
        assert_eq!(lines, vec!["first", "second", "third"]);

        // Drained: nothing left, and buffering is off.
        assert!(drain().is_empty());
    }
}
