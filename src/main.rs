//! Headless gridspin runner (default binary).
//!
//! Two modes:
//! - `serve` (default): owns the engine and bridges it to the TCP adapter;
//!   external clients drive the board and replay the returned step logs.
//! - `demo`: issues a scripted pseudo-random command sequence and prints one
//!   JSON report line per command, for eyeballing the engine without a
//!   client.

use anyhow::{anyhow, Result};

use gridspin::adapter::{
    create_rejection, create_result, create_welcome, demo_report, to_line, Adapter,
    ClientCommand, InboundEvent, OutboundMessage, StateMessage,
};
use gridspin::core::SimpleRng;
use gridspin::engine::BoardEngine;
use gridspin::types::{BoardConfig, Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Serve,
    Demo,
}

#[derive(Debug, Clone)]
struct CliOptions {
    mode: Mode,
    config: BoardConfig,
    seed: u32,
    commands: u32,
}

fn parse_args(args: &[String]) -> Result<CliOptions> {
    let mut opts = CliOptions {
        mode: Mode::Serve,
        config: BoardConfig::default(),
        seed: 1,
        commands: 16,
    };

    let mut i = 0usize;
    if let Some(first) = args.first() {
        match first.as_str() {
            "demo" => {
                opts.mode = Mode::Demo;
                i = 1;
            }
            "serve" => {
                opts.mode = Mode::Serve;
                i = 1;
            }
            _ => {}
        }
    }

    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let value = args
            .get(i)
            .ok_or_else(|| anyhow!("missing value for {}", flag))?;
        match flag {
            "--width" => {
                opts.config.width = value
                    .parse()
                    .map_err(|_| anyhow!("invalid --width value: {}", value))?;
            }
            "--height" => {
                opts.config.height = value
                    .parse()
                    .map_err(|_| anyhow!("invalid --height value: {}", value))?;
            }
            "--colors" => {
                opts.config.palette_size = value
                    .parse()
                    .map_err(|_| anyhow!("invalid --colors value: {}", value))?;
            }
            "--min-run" => {
                opts.config.min_match_len = value
                    .parse()
                    .map_err(|_| anyhow!("invalid --min-run value: {}", value))?;
            }
            "--seed" => {
                opts.seed = value
                    .parse()
                    .map_err(|_| anyhow!("invalid --seed value: {}", value))?;
            }
            "--commands" => {
                opts.commands = value
                    .parse()
                    .map_err(|_| anyhow!("invalid --commands value: {}", value))?;
            }
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }

    Ok(opts)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args)?;

    match opts.mode {
        Mode::Demo => run_demo(&opts),
        Mode::Serve => run_serve(&opts),
    }
}

fn run_demo(opts: &CliOptions) -> Result<()> {
    let mut engine =
        BoardEngine::new(opts.config, opts.seed).map_err(|e| anyhow!("engine: {}", e))?;
    let mut rng = SimpleRng::new(opts.seed);

    println!(
        "{}",
        to_line(&StateMessage::from_snapshot(0, &engine.current_state()))?
    );

    for _ in 0..opts.commands {
        let (name, outcome) = match rng.next_range(4) {
            0 => ("rotateLeft", engine.rotate(Direction::Left)),
            1 => ("rotateRight", engine.rotate(Direction::Right)),
            _ => {
                let col = rng.next_range(opts.config.width as u32) as u8;
                let row = rng.next_range(opts.config.height as u32) as u8;
                ("tap", engine.tap(Position::new(col, row)))
            }
        };

        let steps = outcome.map_err(|e| anyhow!("{}: {}", name, e))?;
        println!("{}", demo_report(name, &steps)?);
        // Strictly sequential consumer: acknowledge right away.
        engine.command_completed();
    }

    println!(
        "{}",
        to_line(&StateMessage::from_snapshot(
            opts.commands as u64 + 1,
            &engine.current_state()
        ))?
    );
    Ok(())
}

fn run_serve(opts: &CliOptions) -> Result<()> {
    let mut engine =
        BoardEngine::new(opts.config, opts.seed).map_err(|e| anyhow!("engine: {}", e))?;
    let Some(mut adapter) = Adapter::start_from_env()? else {
        return Err(anyhow!("adapter disabled via GRIDSPIN_DISABLED"));
    };

    eprintln!(
        "gridspin: serving a {}x{} board, {} colors, seed {}",
        opts.config.width, opts.config.height, opts.config.palette_size, opts.seed
    );

    while let Some(event) = adapter.recv() {
        match event {
            InboundEvent::Connected {
                client_id,
                seq,
                role,
            } => {
                let welcome = create_welcome(seq, role, &engine.config(), engine.seed());
                adapter.send(OutboundMessage::ToClient {
                    client_id,
                    line: to_line(&welcome)?,
                });
                let state = StateMessage::from_snapshot(seq, &engine.current_state());
                adapter.send(OutboundMessage::ToClient {
                    client_id,
                    line: to_line(&state)?,
                });
            }
            InboundEvent::Command {
                client_id,
                seq,
                command,
            } => {
                let line = handle_command(&mut engine, seq, command)?;
                adapter.send(OutboundMessage::ToClient { client_id, line });
                // Observers track board changes through state broadcasts.
                if matches!(command, ClientCommand::NewBoard) {
                    let state = StateMessage::from_snapshot(seq, &engine.current_state());
                    adapter.send(OutboundMessage::Broadcast {
                        line: to_line(&state)?,
                    });
                }
            }
            InboundEvent::Disconnected { .. } => {}
        }
    }

    Ok(())
}

fn handle_command(engine: &mut BoardEngine, seq: u64, command: ClientCommand) -> Result<String> {
    let message = match command {
        ClientCommand::RotateLeft => {
            let outcome = engine.rotate(Direction::Left);
            create_result(seq, outcome.as_deref().map_err(|e| *e))
        }
        ClientCommand::RotateRight => {
            let outcome = engine.rotate(Direction::Right);
            create_result(seq, outcome.as_deref().map_err(|e| *e))
        }
        ClientCommand::Tap { col, row } => {
            let outcome = engine.tap(Position::new(col, row));
            create_result(seq, outcome.as_deref().map_err(|e| *e))
        }
        ClientCommand::Ack => {
            engine.command_completed();
            create_result(seq, Ok(&[]))
        }
        ClientCommand::NewBoard => match engine.new_board() {
            Ok(()) => create_result(seq, Ok(&[])),
            Err(err) => create_rejection(seq, err.code(), err.message()),
        },
        ClientCommand::State => {
            return to_line(&StateMessage::from_snapshot(seq, &engine.current_state()));
        }
    };
    to_line(&message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_without_arguments() {
        let opts = parse_args(&[]).unwrap();
        assert_eq!(opts.mode, Mode::Serve);
        assert_eq!(opts.config, BoardConfig::default());
        assert_eq!(opts.seed, 1);
    }

    #[test]
    fn demo_mode_with_overrides() {
        let opts = parse_args(&strings(&[
            "demo", "--width", "5", "--height", "7", "--colors", "4", "--seed", "99",
            "--commands", "3",
        ]))
        .unwrap();
        assert_eq!(opts.mode, Mode::Demo);
        assert_eq!(opts.config.width, 5);
        assert_eq!(opts.config.height, 7);
        assert_eq!(opts.config.palette_size, 4);
        assert_eq!(opts.seed, 99);
        assert_eq!(opts.commands, 3);
    }

    #[test]
    fn unknown_and_valueless_flags_are_rejected() {
        assert!(parse_args(&strings(&["--sideways", "1"])).is_err());
        assert!(parse_args(&strings(&["--width"])).is_err());
        assert!(parse_args(&strings(&["--width", "lots"])).is_err());
    }
}
