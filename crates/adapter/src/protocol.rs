//! Protocol module - JSON message types for the control adapter
//!
//! Implements a line-delimited JSON protocol. All messages have: type,
//! seq (sequence number), ts (timestamp in ms). Clients send `hello` then
//! `command` lines; the engine answers with `welcome`, per-command `result`
//! lines carrying the wire-encoded step log, and `state` snapshots.
//! Rejections reuse the `result` shape with `ok: false` and an error code.

use serde::{Deserialize, Serialize};

use gridspin_core::BoardSnapshot;
use gridspin_engine::EngineError;
use gridspin_types::{BoardConfig, MutationStep, Position};

/// Milliseconds since the Unix epoch, for message timestamps.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ============== Client -> Engine Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

/// Build a hello line for a connecting client.
pub fn create_hello(seq: u64, name: &str, version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: now_ms(),
        client: ClientInfo {
            name: name.to_string(),
            version: version.to_string(),
        },
        protocol_version: PROTOCOL_VERSION.to_string(),
    }
}

pub const PROTOCOL_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    RotateLeft,
    RotateRight,
    Tap,
    NewBoard,
    State,
    Ack,
}

impl<'de> Deserialize<'de> for CommandName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("rotateLeft") {
            Ok(Self::RotateLeft)
        } else if s.eq_ignore_ascii_case("rotateRight") {
            Ok(Self::RotateRight)
        } else if s.eq_ignore_ascii_case("tap") {
            Ok(Self::Tap)
        } else if s.eq_ignore_ascii_case("newBoard") {
            Ok(Self::NewBoard)
        } else if s.eq_ignore_ascii_case("state") {
            Ok(Self::State)
        } else if s.eq_ignore_ascii_case("ack") {
            Ok(Self::Ack)
        } else {
            Err(serde::de::Error::custom("invalid command name"))
        }
    }
}

impl Serialize for CommandName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(match self {
            CommandName::RotateLeft => "rotateLeft",
            CommandName::RotateRight => "rotateRight",
            CommandName::Tap => "tap",
            CommandName::NewBoard => "newBoard",
            CommandName::State => "state",
            CommandName::Ack => "ack",
        })
    }
}

/// Command message. `col`/`row` are required for `tap` and ignored otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub command: CommandName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<u8>,
}

/// Any line a client may send.
#[derive(Debug, Clone)]
pub enum ClientMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
}

/// Parse one client line, dispatching on the `type` field.
pub fn parse_client_line(line: &str) -> anyhow::Result<ClientMessage> {
    #[derive(Deserialize)]
    struct TypeProbe<'a> {
        #[serde(rename = "type")]
        msg_type: &'a str,
    }

    let probe: TypeProbe = serde_json::from_str(line)?;
    match probe.msg_type {
        "hello" => Ok(ClientMessage::Hello(serde_json::from_str(line)?)),
        "command" => Ok(ClientMessage::Command(serde_json::from_str(line)?)),
        other => Err(anyhow::anyhow!("unknown message type: {}", other)),
    }
}

// ============== Engine -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

impl Default for WelcomeType {
    fn default() -> Self {
        Self::Welcome
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    #[serde(rename = "result")]
    Result,
}

impl Default for ResultType {
    fn default() -> Self {
        Self::Result
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateType {
    #[serde(rename = "state")]
    State,
}

impl Default for StateType {
    fn default() -> Self {
        Self::State
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// First reply on a connection: assigned role plus the board parameters the
/// client needs to set up rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub role: AssignedRole,
    pub width: u8,
    pub height: u8,
    pub palette_size: u8,
    pub min_match_len: u8,
    pub seed: u32,
}

pub fn create_welcome(seq: u64, role: AssignedRole, config: &BoardConfig, seed: u32) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: now_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        role,
        width: config.width,
        height: config.height,
        palette_size: config.palette_size,
        min_match_len: config.min_match_len,
        seed,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl From<EngineError> for ErrorInfo {
    fn from(err: EngineError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message().to_string(),
        }
    }
}

/// Per-command reply: echoes the command seq, carries either the ordered
/// step log (ok) or the rejection (error). Never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ResultType,
    pub seq: u64,
    pub ts: u64,
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepWire>,
}

pub fn create_result(seq: u64, outcome: Result<&[MutationStep], EngineError>) -> ResultMessage {
    match outcome {
        Ok(steps) => ResultMessage {
            msg_type: ResultType::Result,
            seq,
            ts: now_ms(),
            ok: true,
            error: None,
            steps: encode_steps(steps),
        },
        Err(err) => ResultMessage {
            msg_type: ResultType::Result,
            seq,
            ts: now_ms(),
            ok: false,
            error: Some(err.into()),
            steps: Vec::new(),
        },
    }
}

pub fn create_rejection(seq: u64, code: &str, message: &str) -> ResultMessage {
    ResultMessage {
        msg_type: ResultType::Result,
        seq,
        ts: now_ms(),
        ok: false,
        error: Some(ErrorInfo {
            code: code.to_string(),
            message: message.to_string(),
        }),
        steps: Vec::new(),
    }
}

/// Full board snapshot: rows bottom to top, cells left to right;
/// 0 = empty, k + 1 = palette color k.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: StateType,
    pub seq: u64,
    pub ts: u64,
    pub width: u8,
    pub height: u8,
    pub rows: Vec<Vec<u8>>,
}

impl StateMessage {
    pub fn from_snapshot(seq: u64, snapshot: &BoardSnapshot) -> Self {
        let rows = (0..snapshot.height)
            .map(|row| {
                (0..snapshot.width)
                    .map(|col| snapshot.cell_code(col, row))
                    .collect()
            })
            .collect();
        Self {
            msg_type: StateType::State,
            seq,
            ts: now_ms(),
            width: snapshot.width,
            height: snapshot.height,
            rows,
        }
    }
}

// ============== Step wire encoding ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosWire {
    pub col: u8,
    pub row: u8,
}

impl From<Position> for PosWire {
    fn from(pos: Position) -> Self {
        Self {
            col: pos.col,
            row: pos.row,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveWire {
    pub from: PosWire,
    pub to: PosWire,
}

/// Wire form of one mutation step, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepWire {
    Rotated { moves: Vec<MoveWire> },
    Cleared { positions: Vec<PosWire> },
    Shifted { from: PosWire, to: PosWire },
    Spawned { at: PosWire, color: String },
}

impl From<&MutationStep> for StepWire {
    fn from(step: &MutationStep) -> Self {
        match step {
            MutationStep::Rotated(moves) => StepWire::Rotated {
                moves: moves
                    .iter()
                    .map(|&(from, to)| MoveWire {
                        from: from.into(),
                        to: to.into(),
                    })
                    .collect(),
            },
            MutationStep::Cleared(positions) => StepWire::Cleared {
                positions: positions.iter().map(|&pos| pos.into()).collect(),
            },
            MutationStep::Shifted { from, to } => StepWire::Shifted {
                from: (*from).into(),
                to: (*to).into(),
            },
            MutationStep::Spawned { at, color } => StepWire::Spawned {
                at: (*at).into(),
                color: color.as_str().to_string(),
            },
        }
    }
}

pub fn encode_steps(steps: &[MutationStep]) -> Vec<StepWire> {
    steps.iter().map(StepWire::from).collect()
}

/// Serialize any protocol message as one wire line (no trailing newline).
pub fn to_line<T: Serialize>(message: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// One headless demo report: the issued command and its step log.
pub fn demo_report(command: &str, steps: &[MutationStep]) -> anyhow::Result<String> {
    #[derive(Serialize)]
    struct DemoLine<'a> {
        command: &'a str,
        steps: Vec<StepWire>,
    }
    to_line(&DemoLine {
        command,
        steps: encode_steps(steps),
    })
}
