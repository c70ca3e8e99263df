use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

#[cfg(unix)]
use tokio::sync::Notify;
#[cfg(unix)]
use tokio::sync::mpsc::{self, UnboundedSender};
#[cfg(unix)]
use tokio::task::JoinHandle;
#[cfg(unix)]
use tracing::debug;

use crate::config::Config;
use crate::fifo::dispatch::CommandDispatcher;
#[cfg(unix)]
use crate::fifo::lifecycle;
#[cfg(unix)]
use crate::fifo::reader::FifoReader;

/// User-facing error presentation, provided by the UI layer.
pub trait Notifier: Send + Sync {
    fn error(&self, message: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Uninitialized,
    Active,
    ShuttingDown,
    Closed,
}

/// Owns the command channel for the lifetime of the process: creates the
/// pipe, runs the reader and dispatch tasks, tears everything down on stop.
///
/// On platforms without named pipes the whole channel is disabled: `start`
/// and `stop` walk the state machine without touching any resources.
#[cfg_attr(not(unix), allow(dead_code))]
pub struct ChannelSupervisor {
    state: ChannelState,
    fifo_path: PathBuf,
    dispatcher: Arc<CommandDispatcher>,
    notifier: Arc<dyn Notifier>,
    #[cfg(unix)]
    shutdown: Arc<Notify>,
    #[cfg(unix)]
    line_tx: Option<UnboundedSender<String>>,
    #[cfg(unix)]
    reader_task: Option<JoinHandle<FifoReader>>,
    #[cfg(unix)]
    dispatch_task: Option<JoinHandle<()>>,
}

impl ChannelSupervisor {
    /// `runtime_dir` comes from the platform's writable runtime-directory
    /// lookup; the pipe name inside it comes from config.
    pub fn new(
        runtime_dir: &Path,
        config: &Arc<RwLock<Config>>,
        dispatcher: CommandDispatcher,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let fifo_name = config
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .fifo_name
            .clone();
        Self {
            state: ChannelState::Uninitialized,
            fifo_path: runtime_dir.join(fifo_name),
            dispatcher: Arc::new(dispatcher),
            notifier,
            #[cfg(unix)]
            shutdown: Arc::new(Notify::new()),
            #[cfg(unix)]
            line_tx: None,
            #[cfg(unix)]
            reader_task: None,
            #[cfg(unix)]
            dispatch_task: None,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn fifo_path(&self) -> &Path {
        &self.fifo_path
    }

    /// Bring the channel up. A pipe-creation failure is reported and leaves
    /// the supervisor Active but inert (no reader attached); it never fails
    /// process startup. Restarting after `stop` is not supported.
    pub fn start(&mut self) {
        if self.state != ChannelState::Uninitialized {
            return;
        }
        self.state = ChannelState::Active;
        #[cfg(unix)]
        self.start_channel();
    }

    #[cfg(unix)]
    fn start_channel(&mut self) {
        // A stale pipe left over from a crash is removed first; if that
        // fails, report it and attempt creation anyway.
        if let Err(e) = lifecycle::remove_fifo(&self.fifo_path) {
            self.notifier.error(e.to_string());
        }
        if let Err(e) = lifecycle::create_fifo(&self.fifo_path) {
            self.notifier.error(e.to_string());
            return;
        }

        let mut reader = match FifoReader::open(&self.fifo_path) {
            Ok(reader) => reader,
            Err(e) => {
                self.notifier.error(format!(
                    "couldn't open FIFO at {}: {}",
                    self.fifo_path.display(),
                    e
                ));
                return;
            }
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        let shutdown = self.shutdown.clone();
        let line_tx = tx.clone();
        self.reader_task = Some(tokio::spawn(async move {
            loop {
                let ready = tokio::select! {
                    _ = shutdown.notified() => break,
                    ready = reader.readable() => ready,
                };
                if ready.is_err() {
                    break;
                }
                if let Err(e) = reader.drain(&line_tx) {
                    debug!("FIFO drain failed: {}", e);
                }
            }
            reader
        }));

        let dispatcher = self.dispatcher.clone();
        let notifier = self.notifier.clone();
        self.dispatch_task = Some(tokio::spawn(async move {
            while let Some(line) = rx.recv().await {
                debug!("Got FIFO command: {}", line);
                if let Err(e) = dispatcher.dispatch(&line) {
                    notifier.error(e.to_string());
                }
            }
        }));
        self.line_tx = Some(tx);
    }

    /// Tear the channel down: stop the reader, flush anything still buffered
    /// through the dispatcher, remove the pipe object. Safe to call again
    /// after `Closed` (a no-op).
    pub async fn stop(&mut self) {
        match self.state {
            ChannelState::Closed | ChannelState::ShuttingDown => return,
            ChannelState::Uninitialized => {
                self.state = ChannelState::Closed;
                return;
            }
            ChannelState::Active => {}
        }
        self.state = ChannelState::ShuttingDown;
        #[cfg(unix)]
        self.stop_channel().await;
        self.state = ChannelState::Closed;
    }

    #[cfg(unix)]
    async fn stop_channel(&mut self) {
        self.shutdown.notify_one();
        if let Some(task) = self.reader_task.take() {
            if let Ok(reader) = task.await {
                if let Some(tx) = self.line_tx.as_ref() {
                    reader.cleanup(tx);
                }
            }
        }

        // Closing the line channel lets the dispatch task drain what's left
        // and exit on its own.
        self.line_tx = None;
        if let Some(task) = self.dispatch_task.take() {
            let _ = task.await;
        }

        if let Err(e) = lifecycle::remove_fifo(&self.fifo_path) {
            debug!("FIFO cleanup: {}", e);
        }
    }
}
