use std::path::PathBuf;

use seatclock::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

struct Args {
    data_dir: PathBuf,
    fallback: ClockConfig,
}

fn parse_args() -> Result<Args, SeatclockError> {
    let mut data_dir = PathBuf::from("./seatclock-data");
    let mut fallback = ClockConfig::default();

    for arg in std::env::args().skip(1) {
        if let Some(dir) = arg.strip_prefix("--data=") {
            data_dir = PathBuf::from(dir);
        } else if let Some(seats) = arg.strip_prefix("--seats=") {
            fallback.seat_count = parse_seats(seats)?;
        } else if let Some(time) = arg.strip_prefix("--time=") {
            fallback.seconds_per_seat = parse_clock(time)?;
        } else if let Some(inc) = arg.strip_prefix("--increment=") {
            fallback.increment_seconds = parse_clock(inc)?;
        } else {
            tracing::warn!(%arg, "ignoring unknown argument");
        }
    }

    Ok(Args {
        data_dir,
        fallback: fallback.validated()?,
    })
}

// ---------------------------------------------------------------------------
// Wake lock
// ---------------------------------------------------------------------------

/// A terminal has no screen to keep awake; just say what would happen.
struct LoggedWakeLock;

impl WakeLock for LoggedWakeLock {
    fn acquire(&mut self) {
        tracing::info!("keeping display awake");
    }

    fn release(&mut self) {
        tracing::info!("display may sleep");
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

const HELP: &str = "\
commands:
  <seat>                 tap a seat (pass the turn / resume)
  s                      start or pause
  a <seat> <+/-time>     add or remove time, e.g. `a 1 +30` or `a 0 -1:00`
  e <seat>               eliminate or revive
  m <from> <to>          move a seat
  n <seat> <name>        rename a seat
  u                      undo
  new                    new game, same table
  config <seats> <time> [increment]
  exit                   forget this game and quit
  q                      quit, keep the game for next time";

enum Command {
    Tap(usize),
    Toggle,
    AddTime { seat: usize, delta: i64 },
    Eliminate(usize),
    Move { from: usize, to: usize },
    Rename { seat: usize, name: String },
    Undo,
    NewGame,
    Configure(ClockConfig),
    Exit,
    Quit,
    Help,
}

fn parse_seats(input: &str) -> Result<usize, ConfigError> {
    input
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidSeatCount(input.to_string()))
}

fn parse_delta(input: &str) -> Result<i64, ConfigError> {
    let (sign, magnitude) = match input.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, input.strip_prefix('+').unwrap_or(input)),
    };
    Ok(sign * i64::from(parse_clock(magnitude)?))
}

fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Help);
    };
    let seat = |word: Option<&str>| -> Result<usize, String> {
        word.ok_or("missing seat")?
            .parse()
            .map_err(|_| "seat must be a number".to_string())
    };

    match head {
        "s" => Ok(Command::Toggle),
        "a" => {
            let seat = seat(words.next())?;
            let delta = parse_delta(words.next().ok_or("missing time")?).map_err(|e| e.to_string())?;
            Ok(Command::AddTime { seat, delta })
        }
        "e" => Ok(Command::Eliminate(seat(words.next())?)),
        "m" => Ok(Command::Move {
            from: seat(words.next())?,
            to: seat(words.next())?,
        }),
        "n" => {
            let seat = seat(words.next())?;
            let name = words.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err("missing name".into());
            }
            Ok(Command::Rename { seat, name })
        }
        "u" => Ok(Command::Undo),
        "new" => Ok(Command::NewGame),
        "config" => {
            let seats = seat(words.next())?;
            let time = parse_clock(words.next().ok_or("missing time")?).map_err(|e| e.to_string())?;
            let increment = match words.next() {
                Some(inc) => parse_clock(inc).map_err(|e| e.to_string())?,
                None => 0,
            };
            Ok(Command::Configure(ClockConfig::new(seats, time, increment)))
        }
        "exit" => Ok(Command::Exit),
        "q" | "quit" => Ok(Command::Quit),
        "h" | "help" | "?" => Ok(Command::Help),
        other => other
            .parse()
            .map(Command::Tap)
            .map_err(|_| format!("unknown command {other:?}")),
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(state: &GameState) {
    let mut line = String::new();
    for (seat, player) in state.players.iter().enumerate() {
        let marker = if seat == state.current_player_index {
            if state.running { ">" } else { "|" }
        } else {
            " "
        };
        let status = match player.status {
            PlayerStatus::Active => String::new(),
            other => format!(" ({other})"),
        };
        line.push_str(&format!(
            "{marker}{seat}:{} {}{status}  ",
            player.name,
            format_clock(player.time_left)
        ));
    }
    println!("{}", line.trim_end());
}

fn announce(notice: Notice, state: Option<&GameState>) {
    match notice {
        Notice::OutOfTime(id) => {
            let name = state
                .and_then(|s| s.player(id))
                .map(|p| p.name.as_str())
                .unwrap_or("a player");
            println!("*** {name} is out of time ***");
        }
        Notice::NoActivePlayersLeft => println!("*** no active players left ***"),
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

async fn run_command(clock: &ClockHandle, command: Command) -> Result<bool, SeatclockError> {
    let state = clock.state().await?;
    let id_at = |seat: usize| state.players.get(seat).map(|p| p.id);

    match command {
        Command::Tap(seat) => {
            clock.press_seat(seat).await?;
        }
        Command::Toggle => {
            clock.toggle_running().await?;
        }
        Command::AddTime { seat, delta } => match id_at(seat) {
            Some(id) => {
                clock.add_time(id, delta).await?;
            }
            None => println!("no seat {seat}"),
        },
        Command::Eliminate(seat) => match id_at(seat) {
            Some(id) => {
                clock.toggle_elimination(id).await?;
            }
            None => println!("no seat {seat}"),
        },
        Command::Move { from, to } => {
            clock.reorder(from, to).await?;
        }
        Command::Rename { seat, name } => match id_at(seat) {
            Some(id) => {
                let mut draft = clock.rename_draft().await?;
                draft.set(id, name);
                clock.rename_all(draft).await?;
            }
            None => println!("no seat {seat}"),
        },
        Command::Undo => {
            if !clock.undo().await?.changed {
                println!("nothing to undo");
            }
        }
        Command::NewGame => {
            clock.new_game().await?;
        }
        Command::Configure(config) => {
            if let Err(e) = clock.reconfigure(config).await {
                println!("{e}");
            }
        }
        Command::Exit => {
            clock.exit().await?;
            return Ok(false);
        }
        Command::Quit => {
            clock.shutdown().await?;
            return Ok(false);
        }
        Command::Help => println!("{HELP}"),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<(), SeatclockError> {
    seatclock::telemetry::init();

    let args = parse_args()?;
    let store = FileStore::open(&args.data_dir)?;
    let clock = ClockSession::open(
        store,
        TickScheduler::every_second(),
        LoggedWakeLock,
        SessionConfig::default(),
        Some(args.fallback),
    )?;

    tracing::info!(dir = %args.data_dir.display(), "table clock ready");
    println!("{HELP}");

    let mut events = clock.subscribe().await?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_state: Option<GameState> = None;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(ClockEvent::State(state)) => {
                    render(&state);
                    last_state = Some(state);
                }
                Some(ClockEvent::Notice(notice)) => announce(notice, last_state.as_ref()),
                None => break,
            },
            line = lines.next_line() => {
                let Some(line) = line.map_err(StoreError::from)? else {
                    clock.shutdown().await?;
                    break;
                };
                match parse_command(line.trim()) {
                    Ok(command) => {
                        if !run_command(&clock, command).await? {
                            break;
                        }
                    }
                    Err(msg) => println!("{msg} (h for help)"),
                }
            }
        }
    }

    Ok(())
}
