use std::fmt;
use std::str::FromStr;

use geocoin_core::{
    Cell, CellKeyError, Direction, Game, KeyValueStore, LatLng, LocationSource, MAX_LAT, MAX_LNG,
    Tracker, Transfer, WorldConfig,
};

use crate::{format_coin_list, format_location, format_status};

pub const HELP_LINES: [&str; 11] = [
    "n | s | e | w        step one cell north, south, east or west",
    "goto <lat> <lng>     jump to a coordinate",
    "look                 list the caches in view",
    "collect <i,j>        take the top coin from a cache",
    "deposit <i,j>        drop your latest coin into a cache",
    "inv                  list the coins you carry",
    "track on | off       follow the location source",
    "save                 save now",
    "reset                return every coin to its cache (asks for confirmation)",
    "help                 show this list",
    "quit                 save and exit",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Move(Direction),
    Goto(LatLng),
    Look,
    Collect(Cell),
    Deposit(Cell),
    Inventory,
    Track(bool),
    Save,
    Reset,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    Usage(&'static str),
    Cell(CellKeyError),
    Coordinate(String),
    OffGlobe { lat: String, lng: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no command given"),
            Self::Unknown(line) => write!(f, "unknown command `{line}`"),
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::Cell(e) => write!(f, "{e}"),
            Self::Coordinate(raw) => write!(f, "`{raw}` is not a finite coordinate"),
            Self::OffGlobe { lat, lng } => write!(
                f,
                "({lat}, {lng}) is off the globe (limits ±{MAX_LAT} lat, ±{MAX_LNG} lng)"
            ),
        }
    }
}

impl From<CellKeyError> for CommandError {
    fn from(err: CellKeyError) -> Self {
        Self::Cell(err)
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, CommandError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| CommandError::Coordinate(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();
        let verb = verb.to_ascii_lowercase();

        let command = match (verb.as_str(), args.as_slice()) {
            ("n" | "north", []) => Self::Move(Direction::North),
            ("s" | "south", []) => Self::Move(Direction::South),
            ("e" | "east", []) => Self::Move(Direction::East),
            ("w" | "west", []) => Self::Move(Direction::West),
            ("goto", [lat, lng]) => {
                let point = LatLng::new(parse_coordinate(lat)?, parse_coordinate(lng)?);
                if !point.is_on_globe() {
                    return Err(CommandError::OffGlobe {
                        lat: lat.to_string(),
                        lng: lng.to_string(),
                    });
                }
                Self::Goto(point)
            }
            ("goto", _) => return Err(CommandError::Usage("goto <lat> <lng>")),
            ("look", []) => Self::Look,
            ("collect", [cell]) => Self::Collect(cell.parse()?),
            ("collect", _) => return Err(CommandError::Usage("collect <i,j>")),
            ("deposit", [cell]) => Self::Deposit(cell.parse()?),
            ("deposit", _) => return Err(CommandError::Usage("deposit <i,j>")),
            ("inv" | "inventory", []) => Self::Inventory,
            ("track", ["on"]) => Self::Track(true),
            ("track", ["off"]) => Self::Track(false),
            ("track", _) => return Err(CommandError::Usage("track on|off")),
            ("save", []) => Self::Save,
            ("reset", []) => Self::Reset,
            ("help" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppMode {
    #[default]
    Playing,
    /// The next line answers the reset prompt.
    ConfirmingReset,
    Finished,
}

pub struct AppState {
    pub mode: AppMode,
    tracker: Tracker,
    location_source: Option<Box<dyn LocationSource>>,
}

impl AppState {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            mode: AppMode::default(),
            tracker: Tracker::new(config.tracking_interval_ms),
            location_source: None,
        }
    }

    pub fn with_location_source(mut self, source: Box<dyn LocationSource>) -> Self {
        self.location_source = Some(source);
        self
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_active()
    }

    /// How long the caller may block before the next tracking poll is due.
    pub fn next_poll_in(&self, now_ms: u64) -> Option<u64> {
        self.tracker.time_until_due(now_ms)
    }

    /// Handles one line of input and returns the lines to show.
    pub fn handle_line(
        &mut self,
        game: &mut Game,
        store: &mut dyn KeyValueStore,
        line: &str,
        now_ms: u64,
    ) -> Vec<String> {
        let mut out = Vec::new();
        match self.mode {
            AppMode::Finished => {}
            AppMode::ConfirmingReset => {
                self.mode = AppMode::Playing;
                match game.reset(line) {
                    Ok(coins_returned) => {
                        out.push(format!("World reset; {coins_returned} coins returned."));
                        out.push(format_status(game.points()));
                        save_game(game, store, &mut out);
                    }
                    Err(_) => out.push("Reset cancelled.".to_string()),
                }
            }
            AppMode::Playing => match line.parse::<Command>() {
                Ok(command) => {
                    log::debug!("command {command:?}");
                    self.run(command, game, store, now_ms, &mut out);
                }
                Err(CommandError::Empty) => {}
                Err(e) => out.push(format!("{e}. Type `help` for commands.")),
            },
        }
        out
    }

    fn run(
        &mut self,
        command: Command,
        game: &mut Game,
        store: &mut dyn KeyValueStore,
        now_ms: u64,
        out: &mut Vec<String>,
    ) {
        match command {
            Command::Move(direction) => {
                game.step(direction);
                describe_position(game, out);
                save_game(game, store, out);
            }
            Command::Goto(point) => {
                game.move_to(point);
                describe_position(game, out);
                save_game(game, store, out);
            }
            Command::Look => describe_view(game, out),
            Command::Collect(cell) => match game.collect(cell) {
                Transfer::Moved(coin) => {
                    out.push(format!("Collected coin {coin} from cache {cell}."));
                    out.push(format_status(game.points()));
                    save_game(game, store, out);
                }
                Transfer::Skipped(reason) => out.push(format!("Nothing collected: {reason}.")),
            },
            Command::Deposit(cell) => match game.deposit(cell) {
                Transfer::Moved(coin) => {
                    out.push(format!("Deposited coin {coin} into cache {cell}."));
                    out.push(format_status(game.points()));
                    save_game(game, store, out);
                }
                Transfer::Skipped(reason) => out.push(format!("Nothing deposited: {reason}.")),
            },
            Command::Inventory => {
                if game.inventory().is_empty() {
                    out.push("Your inventory is empty.".to_string());
                } else {
                    out.push(format!(
                        "Carrying {} coins: {}",
                        game.inventory().len(),
                        format_coin_list(game.inventory().coins())
                    ));
                }
            }
            Command::Track(true) => {
                if self.location_source.is_none() {
                    out.push("No location source; start with --route <file>.".to_string());
                } else {
                    self.tracker.start(now_ms);
                    out.push(format!("Tracking on, every {} ms.", self.tracker.interval_ms()));
                }
            }
            Command::Track(false) => {
                if self.tracker.stop() {
                    out.push("Tracking off.".to_string());
                } else {
                    out.push("Tracking was not on.".to_string());
                }
            }
            Command::Save => {
                if save_game(game, store, out) {
                    out.push("Game saved.".to_string());
                }
            }
            Command::Reset => {
                self.mode = AppMode::ConfirmingReset;
                out.push(
                    "Type `yes` to return every coin to its cache and restart at the start point."
                        .to_string(),
                );
            }
            Command::Help => out.extend(HELP_LINES.iter().map(|line| line.to_string())),
            Command::Quit => {
                self.tracker.stop();
                save_game(game, store, out);
                self.mode = AppMode::Finished;
                out.push("Goodbye.".to_string());
            }
        }
    }

    /// Moves the player to a fresh sample when a tracking tick is due.
    pub fn poll_tracking(
        &mut self,
        game: &mut Game,
        store: &mut dyn KeyValueStore,
        now_ms: u64,
    ) -> Vec<String> {
        let mut out = Vec::new();
        let Some(handle) = self.tracker.poll(now_ms) else {
            return out;
        };
        if self.mode != AppMode::Playing {
            // Tick is spent; no sample while a prompt is open
            log::trace!("tick {handle:?} skipped in {:?}", self.mode);
            return out;
        }
        let Some(source) = self.location_source.as_mut() else {
            self.tracker.stop();
            return out;
        };
        match source.sample() {
            Some(point) => {
                log::trace!("tick {handle:?} sampled ({}, {})", point.lat, point.lng);
                let before = game.current_cell();
                game.move_to(point);
                if game.current_cell() != before {
                    describe_position(game, &mut out);
                }
                save_game(game, store, &mut out);
            }
            None => log::debug!("tick {handle:?} had no location fix"),
        }
        out
    }
}

fn save_game(game: &Game, store: &mut dyn KeyValueStore, out: &mut Vec<String>) -> bool {
    match game.save(store) {
        Ok(()) => true,
        Err(e) => {
            log::error!("saving failed: {e}");
            out.push(format!("Warning: the game could not be saved ({e})."));
            false
        }
    }
}

fn describe_position(game: &Game, out: &mut Vec<String>) {
    out.push(format!(
        "You are in cell {} at {}.",
        game.current_cell(),
        format_location(game.location())
    ));
}

pub fn describe_view(game: &Game, out: &mut Vec<String>) {
    describe_position(game, out);
    let mut any = false;
    for cache in game.visible_caches() {
        any = true;
        match cache.coins().last() {
            Some(top) => out.push(format!(
                "  cache {}: {} coins, top {top}",
                cache.cell(),
                cache.len()
            )),
            None => out.push(format!("  cache {}: empty", cache.cell())),
        }
    }
    if !any {
        out.push("  No caches in view.".to_string());
    }
    out.push(format_status(game.points()));
}
