//! Temp-run cleanup on interruption, ported from `sort.c`'s
//! `sighandler`/`cleanup`: on `SIGINT`/`SIGHUP`/`SIGPIPE`/`SIGTERM`,
//! remove the working temp directory before the process dies instead
//! of leaking spooled runs.

use std::path::PathBuf;
use std::sync::Arc;

use signal_hook::consts::{SIGHUP, SIGINT, SIGPIPE, SIGTERM};
use signal_hook::iterator::Signals;

/// Spawn a background thread that waits for a terminating signal, then
/// removes `tmp_dir` and re-raises the signal against the default
/// handler so the process exits with the conventional 128+signal
/// status, matching the source re-dispatching to `SIG_DFL`.
pub fn install_temp_cleanup(tmp_dir: Arc<PathBuf>) -> std::io::Result<()> {
    let mut signals = Signals::new([SIGINT, SIGHUP, SIGPIPE, SIGTERM])?;
    std::thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            let _ = std::fs::remove_dir_all(tmp_dir.as_path());
            // SAFETY: raise() is async-signal-safe; the default
            // disposition for each of these signals terminates the
            // process, so control does not return here.
            unsafe {
                libc::raise(sig);
            }
        }
    });
    Ok(())
}
