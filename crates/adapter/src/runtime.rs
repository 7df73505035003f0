//! Adapter runtime integration.
//!
//! Bridges the sync engine loop with the async TCP server: the server runs
//! on its own tokio runtime and talks to the loop over channels, so the
//! engine itself never suspends.

use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::protocol::{AssignedRole, CommandMessage, CommandName};
use crate::server::{run_server, ServerConfig};

/// Command payload delivered to the engine loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    RotateLeft,
    RotateRight,
    Tap { col: u8, row: u8 },
    NewBoard,
    State,
    Ack,
}

impl ClientCommand {
    /// Validate a wire command. Tap requires both coordinates.
    pub fn from_message(msg: &CommandMessage) -> Result<Self, String> {
        match msg.command {
            CommandName::RotateLeft => Ok(Self::RotateLeft),
            CommandName::RotateRight => Ok(Self::RotateRight),
            CommandName::NewBoard => Ok(Self::NewBoard),
            CommandName::State => Ok(Self::State),
            CommandName::Ack => Ok(Self::Ack),
            CommandName::Tap => match (msg.col, msg.row) {
                (Some(col), Some(row)) => Ok(Self::Tap { col, row }),
                _ => Err("tap requires col and row".to_string()),
            },
        }
    }
}

/// Event delivered to the engine loop.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    Connected {
        client_id: usize,
        seq: u64,
        role: AssignedRole,
    },
    Command {
        client_id: usize,
        seq: u64,
        command: ClientCommand,
    },
    Disconnected {
        client_id: usize,
    },
}

/// Outbound line to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClient { client_id: usize, line: String },
    Broadcast { line: String },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundEvent>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the server with the given configuration.
    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundEvent>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();

        let rt = Runtime::new()?;
        rt.spawn(async move {
            let _ = run_server(config, cmd_tx, out_rx).await;
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
        })
    }

    /// Start the adapter from environment variables.
    ///
    /// Returns `None` if `GRIDSPIN_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            return Ok(None);
        }
        Ok(Some(Self::start(ServerConfig::from_env())?))
    }

    /// Block the engine loop until the next inbound event.
    /// Returns `None` once the server side has shut down.
    pub fn recv(&mut self) -> Option<InboundEvent> {
        self.cmd_rx.blocking_recv()
    }

    pub fn try_recv(&mut self) -> Option<InboundEvent> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
