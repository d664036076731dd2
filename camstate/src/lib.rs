//! Player state classification for a third-person camera mod.
//!
//! The engine exposes the player's state as two undocumented 32-bit flag
//! words, a raw camera state, and whatever is in the player's hands. This
//! crate turns those into named predicates (sneaking, sprinting, bow drawn,
//! ...) and a single [`CameraState`] the camera code can switch on.
//!
//! Everything is read through [`GameStateSource`]; the crate never touches
//! engine memory itself. A [`GameState`] owns the only state that survives
//! between frames (bow draw smoothing), so keep one per tracked actor.

use std::fs::File;
use std::path::{Path, PathBuf};

use log::{info, LevelFilter};
use simplelog::{CombinedLogger, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use thiserror::Error;

pub mod bow;
pub mod camera;
pub mod config;
pub mod equipment;
pub mod flags;
pub mod snapshot;
pub mod source;
pub mod state;

#[cfg(test)]
mod testing;

pub use bow::BowDrawTracker;
pub use camera::{CameraMode, CameraState};
pub use config::{CompatConfig, Config, ConfigError};
pub use equipment::{HandState, Loadout, SpellDescriptor, WeaponKind};
pub use flags::{ActionFlags, FlagWord, MovementFlags};
pub use snapshot::{RaceIdentity, Snapshot};
pub use source::{Enchantment, EquippedItem, GameStateSource, Hand};
pub use state::{FrameState, GameState};

const LOG_FILE_NAME: &str = "camstate.log";

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("could not create a log file at {primary:?} or in the temp directory: {source}")]
    NoLogFile {
        primary: PathBuf,
        source: std::io::Error,
    },

    #[error("logger already initialized: {0}")]
    AlreadySet(#[from] log::SetLoggerError),
}

fn create_log_file(primary: &Path) -> Result<(File, PathBuf), LogInitError> {
    match File::create(primary) {
        Ok(f) => Ok((f, primary.to_path_buf())),
        Err(_) => {
            let fallback = std::env::temp_dir().join(LOG_FILE_NAME);
            File::create(&fallback)
                .map(|f| (f, fallback))
                .map_err(|source| LogInitError::NoLogFile { primary: primary.to_path_buf(), source })
        }
    }
}

/// Logs to the terminal and to `log_path` (or the temp directory if that
/// can't be created). Returns the path actually written to.
pub fn init_logging<P: AsRef<Path>>(log_path: P, level: LevelFilter) -> Result<PathBuf, LogInitError> {
    let (log_file, final_log_path) = create_log_file(log_path.as_ref())?;

    let config = ConfigBuilder::new()
        .set_time_to_local(true)
        .build();

    CombinedLogger::init(vec![
        TermLogger::new(level, config.clone(), TerminalMode::Mixed),
        WriteLogger::new(level, config, log_file),
    ])?;

    info!("[LOG] Logging to {}", final_log_path.display());
    Ok(final_log_path)
}
