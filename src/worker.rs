//! Off-thread simulation driver
//!
//! Spawns a thread that owns a [`SimHost`] and exchanges copied message
//! payloads over mpsc channels. The spawning side keeps only a read-only
//! mirrored snapshot, refreshed as replies are drained; no state is shared
//! across the boundary.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::host::{Command, Reply, SimHost, Snapshot};
use crate::sim::SimEvent;

/// Handle to a simulation running on its own thread
pub struct WorkerHandle {
    tx: Sender<Command>,
    rx: Receiver<Reply>,
    join: Option<JoinHandle<()>>,
    mirror: Option<Snapshot>,
}

impl WorkerHandle {
    /// Spawn the worker thread. It exits when the handle is dropped.
    pub fn spawn() -> Self {
        let (tx, command_rx) = mpsc::channel::<Command>();
        let (reply_tx, rx) = mpsc::channel::<Reply>();

        let join = std::thread::Builder::new()
            .name("graviscore-sim".into())
            .spawn(move || {
                let mut host = SimHost::new();
                let mut replies = Vec::new();
                while let Ok(command) = command_rx.recv() {
                    host.handle(command, &mut replies);
                    for reply in replies.drain(..) {
                        if reply_tx.send(reply).is_err() {
                            return;
                        }
                    }
                }
                log::debug!("sim worker shutting down");
            })
            .expect("failed to spawn sim worker thread");

        Self {
            tx,
            rx,
            join: Some(join),
            mirror: None,
        }
    }

    /// Queue a command; the worker applies commands strictly in order
    pub fn send(&self, command: Command) {
        if self.tx.send(command).is_err() {
            log::error!("sim worker is gone; command dropped");
        }
    }

    /// Drain pending replies: refresh the mirrored snapshot and collect
    /// events. Non-blocking.
    pub fn poll(&mut self) -> Vec<SimEvent> {
        let mut events = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            match reply {
                Reply::State { state } => self.mirror = Some(state),
                Reply::Event { event } => events.push(event),
            }
        }
        events
    }

    /// Block until the next snapshot arrives, collecting events seen on the
    /// way. Test and lockstep-driver convenience.
    pub fn wait_for_snapshot(&mut self, events: &mut Vec<SimEvent>) -> Option<Snapshot> {
        while let Ok(reply) = self.rx.recv() {
            match reply {
                Reply::State { state } => {
                    self.mirror = Some(state);
                    return Some(state);
                }
                Reply::Event { event } => events.push(event),
            }
        }
        None
    }

    /// Last snapshot received, if any
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.mirror.as_ref()
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // Closing the command channel ends the worker loop
        let (dead_tx, _) = mpsc::channel();
        self.tx = dead_tx;
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}
