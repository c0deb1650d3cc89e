//! The "press ENTER" prompt shown before the browser closes.
//!
//! The read happens on a detached thread: a blocked stdin read must not keep
//! the runtime (and so the process) alive once an interrupt has ended the
//! wait.
use std::io::{self, BufRead, Write};
use std::thread;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Why the pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseEnd {
    Confirmed,
    Interrupted,
    /// Input closed or unreadable.
    NoInput,
}

pub fn prompt() {
    print!("\nPress ENTER to close browser...");
    let _ = io::stdout().flush();
}

/// Wait for one line on `input`, or for `cancel`.
pub async fn wait_for_enter<R>(input: R, cancel: &CancellationToken) -> PauseEnd
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let reader = thread::Builder::new()
        .name("trawl-pause".into())
        .spawn(move || {
            let mut input = input;
            let mut line = String::new();
            let _ = tx.send(input.read_line(&mut line));
        });
    if let Err(e) = reader {
        warn!(target: "trawl", error = %e, "cannot start stdin reader");
        return PauseEnd::NoInput;
    }

    tokio::select! {
        _ = cancel.cancelled() => PauseEnd::Interrupted,
        read = rx => match read {
            Ok(Ok(n)) if n > 0 => PauseEnd::Confirmed,
            Ok(Ok(_)) => PauseEnd::NoInput,
            Ok(Err(e)) => {
                warn!(target: "trawl", error = %e, "could not read from stdin");
                PauseEnd::NoInput
            }
            Err(_) => PauseEnd::NoInput,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufReader, Cursor, Read};
    use std::sync::mpsc;
    use std::time::Duration;

    /// Blocks every read until its sender is dropped.
    struct Stalled(mpsc::Receiver<()>);

    impl Read for Stalled {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            let _ = self.0.recv();
            Ok(0)
        }
    }

    #[tokio::test]
    async fn enter_confirms() {
        let cancel = CancellationToken::new();
        let end = wait_for_enter(Cursor::new(b"\n".to_vec()), &cancel).await;
        assert_eq!(end, PauseEnd::Confirmed);
    }

    #[tokio::test]
    async fn closed_input_does_not_wait() {
        let cancel = CancellationToken::new();
        let end = wait_for_enter(Cursor::new(Vec::new()), &cancel).await;
        assert_eq!(end, PauseEnd::NoInput);
    }

    #[tokio::test]
    async fn interrupt_ends_a_blocked_read() {
        let (_hold, rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let end = tokio::time::timeout(
            Duration::from_secs(5),
            wait_for_enter(BufReader::new(Stalled(rx)), &cancel),
        )
        .await
        .expect("pause should end on interrupt");
        assert_eq!(end, PauseEnd::Interrupted);
    }

    #[test]
    fn runtime_shutdown_does_not_wait_for_stdin() {
        let (hold, rx) = mpsc::channel::<()>();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let end = runtime.block_on(wait_for_enter(BufReader::new(Stalled(rx)), &cancel));
        assert_eq!(end, PauseEnd::Interrupted);

        let (done_tx, done_rx) = mpsc::channel();
        thread::spawn(move || {
            drop(runtime);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
        drop(hold);
    }
}
