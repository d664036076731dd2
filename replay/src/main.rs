use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use camstate::{
    init_logging, CameraMode, CameraState, Config, Enchantment, EquippedItem, FrameState,
    GameState, GameStateSource, Hand, LogInitError, SpellDescriptor,
};
use log::{info, LevelFilter};
use serde::Deserialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "camstate.toml";
const LOG_PATH: &str = "camstate-replay.log";

#[derive(Debug, Error)]
enum ReplayError {
    #[error("{0}")]
    Usage(String),

    #[error("IO error reading {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Trace parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Frame {frame} has unmapped camera mode {id}")]
    UnmappedCameraMode { frame: usize, id: u32 },

    #[error("Logger setup failed: {0}")]
    Log(#[from] LogInitError),

    #[error("Console error: {0}")]
    Console(#[from] io::Error),
}

type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Clone, Deserialize)]
struct ItemRecord {
    #[serde(default)]
    form_id: u32,
    weapon_type: Option<u32>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct SpellRecord {
    kind: u32,
    cast_type: u32,
    delivery: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct HandRecord {
    item: Option<ItemRecord>,
    enchantment: Option<u32>,
    spell: Option<SpellRecord>,
}

fn default_process_context() -> bool {
    true
}

/// Raw engine values for one recorded frame.
#[derive(Debug, Clone, Deserialize)]
struct Frame {
    time: f32,
    camera_mode: u32,
    #[serde(default)]
    movement: u32,
    #[serde(default)]
    action: u32,
    #[serde(default = "default_process_context")]
    process_context: bool,
    #[serde(default)]
    right: HandRecord,
    #[serde(default)]
    left: HandRecord,
    face_node_flags: Option<u32>,
    race: Option<String>,
    #[serde(default)]
    pov_slide: bool,
}

impl Frame {
    fn hand(&self, hand: Hand) -> &HandRecord {
        match hand {
            Hand::Right => &self.right,
            Hand::Left => &self.left,
        }
    }
}

impl GameStateSource for Frame {
    fn movement_flags(&self) -> u32 {
        self.movement
    }

    fn action_flags(&self) -> u32 {
        self.action
    }

    fn camera_mode(&self) -> u32 {
        self.camera_mode
    }

    fn has_process_context(&self) -> bool {
        self.process_context
    }

    fn equipped_item(&self, hand: Hand) -> Option<EquippedItem> {
        self.hand(hand).item.as_ref().map(|item| EquippedItem {
            form_id: item.form_id,
            weapon_type: item.weapon_type,
        })
    }

    fn hand_enchantment(&self, hand: Hand) -> Option<Enchantment> {
        self.hand(hand).enchantment.map(|form_id| Enchantment { form_id })
    }

    fn hand_spell(&self, hand: Hand) -> Option<SpellDescriptor> {
        self.hand(hand)
            .spell
            .map(|s| SpellDescriptor::from_codes(s.kind, s.cast_type, s.delivery))
    }

    fn face_node_flags(&self) -> Option<u32> {
        self.face_node_flags
    }

    fn race_name(&self) -> Option<&str> {
        self.race.as_deref()
    }

    fn now_seconds(&self) -> f32 {
        self.time
    }

    fn pov_slide_mode(&self) -> bool {
        self.pov_slide
    }
}

#[derive(Debug, Deserialize)]
struct Trace {
    #[serde(rename = "frame", default)]
    frames: Vec<Frame>,
}

impl Trace {
    fn parse(content: &str) -> Result<Self> {
        let trace: Trace = toml::from_str(content)?;

        // Unmapped modes trip the resolver's debug assertion, reject them up front
        for (index, frame) in trace.frames.iter().enumerate() {
            if let CameraMode::Unmapped(id) = CameraMode::from_id(frame.camera_mode) {
                return Err(ReplayError::UnmappedCameraMode { frame: index, id });
            }
        }
        Ok(trace)
    }

    fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }
}

struct Args {
    debug: bool,
    config_path: PathBuf,
    trace_path: PathBuf,
}

impl Args {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Self> {
        let mut debug = false;
        let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
        let mut trace_path = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" | "-d" => debug = true,
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| ReplayError::Usage("--config needs a path".into()))?;
                    config_path = PathBuf::from(path);
                }
                _ if trace_path.is_none() => trace_path = Some(PathBuf::from(arg)),
                _ => return Err(ReplayError::Usage(format!("unexpected argument '{}'", arg))),
            }
        }

        let trace_path = trace_path.ok_or_else(|| {
            ReplayError::Usage("usage: camstate-replay [--debug] [--config <path>] <trace.toml>".into())
        })?;

        Ok(Self { debug, config_path, trace_path })
    }
}

// Colored output utilities
struct Console {
    stdout: StandardStream,
}

impl Console {
    fn new() -> Self {
        Self { stdout: StandardStream::stdout(ColorChoice::Auto) }
    }

    fn write_colored(&mut self, color: Color, text: &str) -> io::Result<()> {
        self.stdout.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(&mut self.stdout, "{}", text)?;
        self.stdout.reset()
    }

    fn header(&mut self, trace_path: &Path, frames: usize) -> io::Result<()> {
        self.write_colored(Color::Cyan, &format!("Replaying {} ({} frames)\n\n", trace_path.display(), frames))
    }

    fn frame(&mut self, index: usize, frame: &Frame, state: &FrameState) -> io::Result<()> {
        write!(&mut self.stdout, "{:>4}  {:>8.3}s  ", index, frame.time)?;
        self.write_colored(state_color(state.camera), &format!("{:<18}", state.camera.to_string()))?;
        writeln!(&mut self.stdout, "  {}", active_predicates(state).join(" "))
    }

    fn error(&mut self, msg: &str) -> io::Result<()> {
        self.write_colored(Color::Red, &format!("ERROR: {}\n", msg))
    }
}

fn state_color(state: CameraState) -> Color {
    match state {
        CameraState::ThirdPersonCombat | CameraState::KillMove | CameraState::Bleedout => Color::Red,
        CameraState::FirstPerson | CameraState::IronSights => Color::Cyan,
        CameraState::Horseback | CameraState::Dragon => Color::Yellow,
        CameraState::Unknown => Color::Magenta,
        _ => Color::Green,
    }
}

fn active_predicates(state: &FrameState) -> Vec<&'static str> {
    let snap = &state.snapshot;
    [
        ("sneaking", snap.is_sneaking()),
        ("sprinting", snap.is_sprinting()),
        ("running", snap.is_running()),
        ("walking", snap.is_walking()),
        ("swimming", snap.is_swimming()),
        ("sitting", snap.is_sitting()),
        ("sleeping", snap.is_sleeping()),
        ("mounting", snap.is_mounting_horse()),
        ("dismounting", snap.is_dismounting_horse()),
        ("weapon_drawn", snap.is_weapon_drawn()),
        ("melee", snap.is_melee_weapon_drawn()),
        ("ranged", snap.is_ranged_weapon_drawn()),
        ("bow", snap.is_using_bow()),
        ("crossbow", snap.is_using_crossbow()),
        ("magic", snap.is_magic_drawn()),
        ("bow_drawn", state.bow_drawn),
        ("werewolf", snap.is_werewolf()),
        ("vampire_lord", snap.is_vampire_lord()),
        ("pov_slide", snap.in_pov_slide_mode()),
    ]
    .into_iter()
    .filter_map(|(name, active)| active.then_some(name))
    .collect()
}

fn replay(trace: &Trace, config: &Config) -> Vec<FrameState> {
    let mut state = GameState::new(config);
    trace.frames.iter().map(|frame| state.update(frame)).collect()
}

fn run(console: &mut Console) -> Result<()> {
    let args = Args::parse(std::env::args().skip(1))?;

    let level = if args.debug { LevelFilter::Debug } else { LevelFilter::Info };
    init_logging(LOG_PATH, level)?;

    let config = Config::load_or_create(&args.config_path);
    info!("[REPLAY] Compat modes: {:?}", config.compat);

    let trace = Trace::load(&args.trace_path)?;
    console.header(&args.trace_path, trace.frames.len())?;

    for (index, (frame, state)) in trace.frames.iter().zip(replay(&trace, &config)).enumerate() {
        console.frame(index, frame, &state)?;
    }
    Ok(())
}

fn main() {
    let mut console = Console::new();
    if let Err(e) = run(&mut console) {
        let _ = console.error(&e.to_string());
        std::process::exit(1);
    }
}
