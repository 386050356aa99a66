//! Terminal input when the document arrives on stdin.
//!
//! `cat notes.md | mdseek` leaves stdin attached to the pipe, so keyboard
//! events have to come from `/dev/tty`. crossterm reads fd 0; while it works
//! we point fd 0 at the terminal and put the pipe back afterwards.

use crossterm::event::{self, Event};
use std::io;
use std::time::Duration;

#[cfg(unix)]
mod redirect {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::{AsRawFd, RawFd};

    pub fn stdin_is_tty() -> bool {
        // SAFETY: isatty accepts any descriptor
        unsafe { libc::isatty(io::stdin().as_raw_fd()) == 1 }
    }

    /// fd 0 redirected to `/dev/tty` until dropped.
    pub struct TtyStdin {
        saved: RawFd,
    }

    impl TtyStdin {
        pub fn open() -> io::Result<Self> {
            let tty = File::options()
                .read(true)
                .write(true)
                .open("/dev/tty")
                .map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("cannot open /dev/tty: {e}; interactive mode needs a terminal"),
                    )
                })?;

            // SAFETY: dup/dup2 on descriptors we own; every failure path
            // closes what was opened
            unsafe {
                let saved = libc::dup(0);
                if saved < 0 {
                    return Err(io::Error::last_os_error());
                }
                if libc::dup2(tty.as_raw_fd(), 0) < 0 {
                    let err = io::Error::last_os_error();
                    libc::close(saved);
                    return Err(err);
                }
                Ok(Self { saved })
            }
        }
    }

    impl Drop for TtyStdin {
        fn drop(&mut self) {
            // SAFETY: `saved` came from dup and is closed exactly once
            unsafe {
                libc::dup2(self.saved, 0);
                libc::close(self.saved);
            }
        }
    }
}

/// Run `f` with fd 0 on the terminal.
#[cfg(unix)]
fn on_tty<T>(f: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
    if redirect::stdin_is_tty() {
        return f();
    }
    let _guard = redirect::TtyStdin::open()?;
    f()
}

#[cfg(not(unix))]
fn on_tty<T>(f: impl FnOnce() -> io::Result<T>) -> io::Result<T> {
    f()
}

/// Raw mode is a property of the terminal device, so it sticks after fd 0
/// goes back to the pipe.
pub fn enable_raw_mode() -> io::Result<()> {
    on_tty(crossterm::terminal::enable_raw_mode)
}

pub fn disable_raw_mode() -> io::Result<()> {
    on_tty(crossterm::terminal::disable_raw_mode)
}

/// Whether an event is ready within `timeout`.
pub fn poll_event(timeout: Duration) -> io::Result<bool> {
    on_tty(|| event::poll(timeout))
}

pub fn read_event() -> io::Result<Event> {
    on_tty(event::read)
}
