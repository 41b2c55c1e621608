use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Exit status used when a second signal arrives before the loop has wound down
const FORCED_EXIT_CODE: i32 = 130;

/// Shared quit flag checked by the frame loop at every frame boundary
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Turn process termination signals into a shutdown request.
    ///
    /// Unix: SIGINT, SIGTERM and SIGHUP. Windows: Ctrl-C, Ctrl-Break and console
    /// close. Handlers are registered before this returns. The listener keeps
    /// running; a second signal while shutdown is already pending exits the
    /// process at once, for a source stuck inside a blocking read.
    pub fn install_signal_handlers(&self) -> std::io::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let mut listener = {
            let _guard = runtime.enter();
            SignalListener::new()?
        };
        let signal = self.clone();

        std::thread::Builder::new()
            .name("signals".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(kind) = listener.recv().await {
                        if signal.is_requested() {
                            warn!("{} received again, exiting immediately", kind);
                            std::process::exit(FORCED_EXIT_CODE);
                        }
                        info!("{} received, releasing keys and shutting down", kind);
                        signal.request();
                    }
                    warn!("Signal listener stopped");
                });
            })?;

        Ok(())
    }
}

#[cfg(unix)]
struct SignalListener {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalListener {
    fn new() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            s = self.interrupt.recv() => s.map(|_| "SIGINT"),
            s = self.terminate.recv() => s.map(|_| "SIGTERM"),
            s = self.hangup.recv() => s.map(|_| "SIGHUP"),
        }
    }
}

#[cfg(windows)]
struct SignalListener {
    ctrl_c: tokio::signal::windows::CtrlC,
    ctrl_break: tokio::signal::windows::CtrlBreak,
    ctrl_close: tokio::signal::windows::CtrlClose,
}

#[cfg(windows)]
impl SignalListener {
    fn new() -> std::io::Result<Self> {
        use tokio::signal::windows::{ctrl_break, ctrl_c, ctrl_close};

        Ok(Self {
            ctrl_c: ctrl_c()?,
            ctrl_break: ctrl_break()?,
            ctrl_close: ctrl_close()?,
        })
    }

    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            s = self.ctrl_c.recv() => s.map(|_| "Ctrl-C"),
            s = self.ctrl_break.recv() => s.map(|_| "Ctrl-Break"),
            s = self.ctrl_close.recv() => s.map(|_| "Console close"),
        }
    }
}
