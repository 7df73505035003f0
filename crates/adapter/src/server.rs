//! TCP server for the control adapter
//!
//! Handles incoming connections and manages client lifecycle. The first
//! client to complete a hello becomes the controller; later clients are
//! observers and may only request state. Transport-level rejections (bad
//! lines, missing hello, observer commands) are answered directly here;
//! everything valid is forwarded to the engine loop over the command
//! channel.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, Mutex, RwLock};

use crate::protocol::{
    create_rejection, parse_client_line, to_line, AssignedRole, ClientMessage,
};
use crate::runtime::{ClientCommand, InboundEvent, OutboundMessage};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_pending_commands: usize,
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7171,
            max_pending_commands: 10,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        use std::env;

        let host = env::var("GRIDSPIN_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("GRIDSPIN_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7171);

        let max_pending_commands = env::var("GRIDSPIN_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        let log_path = env::var("GRIDSPIN_LOG_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        Self {
            host,
            port,
            max_pending_commands,
            log_path,
        }
    }

    pub fn is_disabled() -> bool {
        std::env::var("GRIDSPIN_DISABLED")
            .map(|v| !v.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Best-effort extraction of a `seq` field from an unparseable line, so the
/// rejection can still echo it.
fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let mut end = 0usize;
    for b in rest.as_bytes() {
        if b.is_ascii_digit() {
            end += 1;
        } else {
            break;
        }
    }
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Append-only protocol log (one prefixed wire line per entry).
struct ProtocolLog {
    file: std::sync::Mutex<std::fs::File>,
}

impl ProtocolLog {
    fn open(path: &str) -> Option<Self> {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .ok()
            .map(|file| Self {
                file: std::sync::Mutex::new(file),
            })
    }

    fn log(&self, direction: &str, client_id: usize, line: &str) {
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{} {} {}", direction, client_id, line);
        }
    }
}

struct ClientHandle {
    tx: mpsc::UnboundedSender<String>,
}

type Clients = Arc<RwLock<HashMap<usize, ClientHandle>>>;

/// Accept connections and shuttle lines until the listener fails or the
/// engine loop goes away.
pub async fn run_server(
    config: ServerConfig,
    cmd_tx: mpsc::Sender<InboundEvent>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let clients: Clients = Arc::new(RwLock::new(HashMap::new()));
    let controller: Arc<Mutex<Option<usize>>> = Arc::new(Mutex::new(None));
    let log = config
        .log_path
        .as_deref()
        .and_then(ProtocolLog::open)
        .map(Arc::new);

    // Outbound dispatcher: engine loop -> client writer queues.
    {
        let clients = Arc::clone(&clients);
        let log = log.clone();
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClient { client_id, line } => {
                        if let Some(handle) = clients.read().await.get(&client_id) {
                            if let Some(log) = &log {
                                log.log(">", client_id, &line);
                            }
                            let _ = handle.tx.send(line);
                        }
                    }
                    OutboundMessage::Broadcast { line } => {
                        for (client_id, handle) in clients.read().await.iter() {
                            if let Some(log) = &log {
                                log.log(">", *client_id, &line);
                            }
                            let _ = handle.tx.send(line.clone());
                        }
                    }
                }
            }
        });
    }

    let mut next_id = 1usize;
    loop {
        let (stream, _addr) = listener.accept().await?;
        let _ = stream.set_nodelay(true);

        let client_id = next_id;
        next_id += 1;

        tokio::spawn(handle_client(
            stream,
            client_id,
            Arc::clone(&clients),
            Arc::clone(&controller),
            cmd_tx.clone(),
            log.clone(),
        ));
    }
}

async fn handle_client(
    stream: TcpStream,
    client_id: usize,
    clients: Clients,
    controller: Arc<Mutex<Option<usize>>>,
    cmd_tx: mpsc::Sender<InboundEvent>,
    log: Option<Arc<ProtocolLog>>,
) {
    let (reader, mut writer) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        while let Some(line) = rx.recv().await {
            if writer.write_all(line.as_bytes()).await.is_err() {
                break;
            }
            if writer.write_all(b"\n").await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(reader).lines();

    // The first line must be a hello; anything else closes the connection.
    let hello = loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => {
                if let Some(log) = &log {
                    log.log("<", client_id, &line);
                }
                match parse_client_line(&line) {
                    Ok(ClientMessage::Hello(hello)) => break hello,
                    Ok(ClientMessage::Command(msg)) => {
                        send_line(
                            &tx,
                            &create_rejection(msg.seq, "expected_hello", "say hello first"),
                        );
                        // Closing the queue lets the writer drain the rejection.
                        drop(tx);
                        let _ = writer_task.await;
                        return;
                    }
                    Err(err) => {
                        let seq = extract_seq_best_effort(&line).unwrap_or(0);
                        send_line(&tx, &create_rejection(seq, "parse_error", &err.to_string()));
                        drop(tx);
                        let _ = writer_task.await;
                        return;
                    }
                }
            }
            _ => {
                drop(tx);
                let _ = writer_task.await;
                return;
            }
        }
    };

    // First complete hello takes the controller role.
    let role = {
        let mut ctl = controller.lock().await;
        if ctl.is_none() {
            *ctl = Some(client_id);
            AssignedRole::Controller
        } else {
            AssignedRole::Observer
        }
    };
    clients
        .write()
        .await
        .insert(client_id, ClientHandle { tx: tx.clone() });
    if cmd_tx
        .send(InboundEvent::Connected {
            client_id,
            seq: hello.seq,
            role,
        })
        .await
        .is_err()
    {
        // Engine loop is gone; nothing left to serve.
        clients.write().await.remove(&client_id);
        drop(tx);
        let _ = writer_task.await;
        return;
    }

    while let Ok(Some(line)) = lines.next_line().await {
        if line.trim().is_empty() {
            continue;
        }
        if let Some(log) = &log {
            log.log("<", client_id, &line);
        }

        match parse_client_line(&line) {
            Ok(ClientMessage::Command(msg)) => {
                let is_state = msg.command == crate::protocol::CommandName::State;
                if role == AssignedRole::Observer && !is_state {
                    send_line(
                        &tx,
                        &create_rejection(msg.seq, "not_controller", "observers may only request state"),
                    );
                    continue;
                }
                match ClientCommand::from_message(&msg) {
                    Ok(command) => {
                        if cmd_tx
                            .send(InboundEvent::Command {
                                client_id,
                                seq: msg.seq,
                                command,
                            })
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Err(reason) => {
                        send_line(&tx, &create_rejection(msg.seq, "bad_command", &reason));
                    }
                }
            }
            Ok(ClientMessage::Hello(msg)) => {
                send_line(
                    &tx,
                    &create_rejection(msg.seq, "unexpected_hello", "already connected"),
                );
            }
            Err(err) => {
                let seq = extract_seq_best_effort(&line).unwrap_or(0);
                send_line(&tx, &create_rejection(seq, "parse_error", &err.to_string()));
            }
        }
    }

    clients.write().await.remove(&client_id);
    {
        let mut ctl = controller.lock().await;
        if *ctl == Some(client_id) {
            *ctl = None;
        }
    }
    let _ = cmd_tx.send(InboundEvent::Disconnected { client_id }).await;
    drop(tx);
    let _ = writer_task.await;
}

fn send_line<T: serde::Serialize>(tx: &mpsc::UnboundedSender<String>, message: &T) {
    if let Ok(line) = to_line(message) {
        let _ = tx.send(line);
    }
}
