use tokio::sync::watch;

/// Why the session is stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    Interrupt,
    Terminate,
}

#[derive(Clone)]
pub struct Shutdown {
    sender: watch::Sender<Option<StopSignal>>,
}

#[derive(Clone)]
pub struct ShutdownListener {
    receiver: watch::Receiver<Option<StopSignal>>,
}

impl Shutdown {
    pub fn new() -> (Self, ShutdownListener) {
        let (sender, receiver) = watch::channel(None);
        (Self { sender }, ShutdownListener { receiver })
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            receiver: self.sender.subscribe(),
        }
    }

    /// Only the first signal is kept.
    pub fn trigger(&self, signal: StopSignal) {
        self.sender.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(signal);
            true
        });
    }
}

impl ShutdownListener {
    /// Resolves once a signal has been raised, including one raised before
    /// the call. `None` means every `Shutdown` handle is gone.
    pub async fn notified(&mut self) -> Option<StopSignal> {
        match self.receiver.wait_for(Option::is_some).await {
            Ok(signal) => *signal,
            Err(_) => None,
        }
    }
}

pub fn install_signal_handlers(shutdown: Shutdown) {
    let interrupt = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!(target: "app", "interrupt received");
            interrupt.trigger(StopSignal::Interrupt);
        }
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut sig) => {
                    sig.recv().await;
                    tracing::info!(target: "app", "terminate received");
                    shutdown.trigger(StopSignal::Terminate);
                }
                Err(err) => {
                    tracing::warn!(target: "app", error = %err, "cannot listen for SIGTERM");
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn late_listeners_see_earlier_signal() {
        let (shutdown, mut early) = Shutdown::new();
        shutdown.trigger(StopSignal::Interrupt);
        let mut late = shutdown.subscribe();
        assert_eq!(early.notified().await, Some(StopSignal::Interrupt));
        assert_eq!(late.notified().await, Some(StopSignal::Interrupt));
    }

    #[tokio::test]
    async fn first_signal_wins() {
        let (shutdown, mut listener) = Shutdown::new();
        shutdown.trigger(StopSignal::Terminate);
        shutdown.trigger(StopSignal::Interrupt);
        assert_eq!(listener.notified().await, Some(StopSignal::Terminate));
    }

    #[tokio::test]
    async fn dropped_handle_releases_listeners() {
        let (shutdown, mut listener) = Shutdown::new();
        drop(shutdown);
        assert_eq!(listener.notified().await, None);
    }
}
