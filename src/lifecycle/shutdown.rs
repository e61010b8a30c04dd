//! Stop flag shared between the signal handler and the scheduler.
//!
//! The flag is sticky: a [`ShutdownListener`] created after [`Shutdown::trigger`]
//! still observes the stop request.

use tokio::sync::watch;

pub struct Shutdown {
    stopped: watch::Sender<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (stopped, _) = watch::channel(false);
        Self { stopped }
    }

    pub fn listener(&self) -> ShutdownListener {
        ShutdownListener {
            stopped: self.stopped.subscribe(),
        }
    }

    /// Request a stop. Calling it again is harmless.
    pub fn trigger(&self) {
        self.stopped.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.stopped.borrow()
    }

    pub fn listeners(&self) -> usize {
        self.stopped.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving half handed to long-running tasks.
pub struct ShutdownListener {
    stopped: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolve once a stop is requested, or once the [`Shutdown`] is dropped.
    ///
    /// Cancel safe, so it can sit in a `select!` loop.
    pub async fn wait(&mut self) {
        let _ = self.stopped.wait_for(|stopped| *stopped).await;
    }
}
