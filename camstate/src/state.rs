use log::{debug, error, warn};

use crate::bow::{self, BowDrawTracker};
use crate::camera::{self, CameraState};
use crate::config::{CompatConfig, Config};
use crate::flags::FlagWord;
use crate::snapshot::Snapshot;
use crate::source::GameStateSource;

/// Called with the word and bit index of every set bit that has no name yet.
pub type UnknownBitHook = Box<dyn Fn(FlagWord, u32)>;

/// Result of one full frame evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    pub camera: CameraState,
    pub bow_drawn: bool,
    pub snapshot: Snapshot,
}

/// Per-player classifier: compat settings, the bow tracker, and diagnostics.
///
/// Meant to be driven from the game thread once per frame. The bow tracker
/// belongs to whichever actor the source describes, so keep one `GameState`
/// per tracked actor.
pub struct GameState {
    compat: CompatConfig,
    warn_unknown_bits: bool,
    bow: BowDrawTracker,
    unknown_bit_hook: Option<UnknownBitHook>,
    last_camera_state: CameraState,
    last_unknown: (u32, u32),
}

impl GameState {
    pub fn new(config: &Config) -> Self {
        Self {
            compat: config.compat,
            warn_unknown_bits: config.diagnostics.warn_unknown_bits,
            bow: BowDrawTracker::new(config.bow.arm_delay_secs),
            unknown_bit_hook: None,
            last_camera_state: CameraState::Unknown,
            last_unknown: (0, 0),
        }
    }

    /// Picks up a reloaded config. Bow tracking state is kept.
    pub fn apply_config(&mut self, config: &Config) {
        if self.compat != config.compat {
            debug!("[STATE] Compat modes changed: {:?} -> {:?}", self.compat, config.compat);
        }
        self.compat = config.compat;
        self.warn_unknown_bits = config.diagnostics.warn_unknown_bits;
        self.bow.set_arm_delay(config.bow.arm_delay_secs);
    }

    pub fn compat(&self) -> CompatConfig {
        self.compat
    }

    pub fn set_unknown_bit_hook<F>(&mut self, hook: F)
    where
        F: Fn(FlagWord, u32) + 'static,
    {
        self.unknown_bit_hook = Some(Box::new(hook));
    }

    pub fn clear_unknown_bit_hook(&mut self) {
        self.unknown_bit_hook = None;
    }

    pub fn bow_tracker(&self) -> &BowDrawTracker {
        &self.bow
    }

    pub fn last_camera_state(&self) -> CameraState {
        self.last_camera_state
    }

    /// Reads the source once and runs unknown-bit diagnostics on the result.
    pub fn snapshot<S: GameStateSource + ?Sized>(&mut self, source: &S) -> Snapshot {
        let snapshot = Snapshot::sample(source, self.compat);
        self.report_unknown_bits(&snapshot);
        snapshot
    }

    fn report_unknown_bits(&mut self, snapshot: &Snapshot) {
        if let Some(hook) = &self.unknown_bit_hook {
            for index in snapshot.movement.unknown_bits() {
                hook(FlagWord::Movement, index);
            }
            for index in snapshot.action.unknown_bits() {
                hook(FlagWord::Action, index);
            }
        }

        if !self.warn_unknown_bits {
            return;
        }

        // Only log when the set of unexplained bits changes, not every frame
        let movement_unknown = snapshot.movement.unknown_bits().fold(0u32, |m, i| m | 1 << i);
        let action_unknown = snapshot.action.unknown_bits().fold(0u32, |m, i| m | 1 << i);
        if (movement_unknown, action_unknown) == self.last_unknown {
            return;
        }
        self.last_unknown = (movement_unknown, action_unknown);

        if movement_unknown != 0 {
            warn!(
                "[FLAGS] Unknown {} bits set: {:?} (word {:#010x})",
                FlagWord::Movement,
                snapshot.movement.unknown_bits().collect::<Vec<_>>(),
                snapshot.movement.bits()
            );
        }
        if action_unknown != 0 {
            warn!(
                "[FLAGS] Unknown {} bits set: {:?} (word {:#010x})",
                FlagWord::Action,
                snapshot.action.unknown_bits().collect::<Vec<_>>(),
                snapshot.action.bits()
            );
        }
    }

    pub fn camera_state<S: GameStateSource + ?Sized>(&mut self, source: &S) -> CameraState {
        let snapshot = self.snapshot(source);
        self.camera_state_of(&snapshot)
    }

    /// Resolves an already sampled frame.
    pub fn camera_state_of(&mut self, snapshot: &Snapshot) -> CameraState {
        let rule = camera::matching_rule(snapshot);
        let state = rule.map_or(CameraState::Unknown, |r| r.state);

        if state == CameraState::Unknown {
            error!("[STATE] No camera rule matched raw mode {:?}", snapshot.camera_mode);
        }
        debug_assert_ne!(
            state,
            CameraState::Unknown,
            "unmapped camera mode {:?}",
            snapshot.camera_mode
        );

        if state != self.last_camera_state {
            debug!(
                "[STATE] Camera state {} -> {} (rule: {})",
                self.last_camera_state,
                state,
                rule.map_or("none", |r| r.name)
            );
            self.last_camera_state = state;
        }
        state
    }

    pub fn is_bow_drawn<S: GameStateSource + ?Sized>(&mut self, source: &S) -> bool {
        let snapshot = self.snapshot(source);
        self.is_bow_drawn_of(&snapshot)
    }

    pub fn is_bow_drawn_of(&mut self, snapshot: &Snapshot) -> bool {
        let crossbow = snapshot.is_using_crossbow();
        if snapshot.compat.ago && !crossbow {
            self.bow.update(snapshot.movement, snapshot.now)
        } else {
            bow::is_bow_drawn_raw(snapshot.movement, crossbow)
        }
    }

    /// Samples once and evaluates everything the camera needs for a frame.
    pub fn update<S: GameStateSource + ?Sized>(&mut self, source: &S) -> FrameState {
        let snapshot = self.snapshot(source);
        let camera = self.camera_state_of(&snapshot);
        let bow_drawn = self.is_bow_drawn_of(&snapshot);
        FrameState { camera, bow_drawn, snapshot }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::camera::CameraMode;
    use crate::equipment::weapon_type;
    use crate::testing::FakeSource;

    const NOCKED: u32 = 1 << 31;
    const MIDPOINT: u32 = 1 << 29;
    const DRAWN: u32 = 1 << 6;

    fn ago_config() -> Config {
        let mut config = Config::default();
        config.compat.ago = true;
        config
    }

    #[test]
    fn test_third_person_combat_end_to_end() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource { action: DRAWN, ..FakeSource::default() }.with_right_weapon(1);
        assert_eq!(state.camera_state(&source), CameraState::ThirdPersonCombat);
        assert_eq!(state.last_camera_state(), CameraState::ThirdPersonCombat);

        let source = FakeSource { action: 1 << 5, ..FakeSource::default() };
        assert_eq!(state.camera_state(&source), CameraState::ThirdPerson);
    }

    #[test]
    fn test_werewolf_identity() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource { race: Some("Werewolf".into()), ..FakeSource::default() };
        assert!(state.snapshot(&source).is_werewolf());

        let source = FakeSource { race: Some("werewolf".into()), ..FakeSource::default() };
        assert!(!state.snapshot(&source).is_werewolf());
    }

    #[test]
    fn test_bow_uses_tracker_under_ago() {
        let mut state = GameState::new(&ago_config());
        let mut source = FakeSource { action: DRAWN, movement: NOCKED, ..FakeSource::default() }
            .with_right_weapon(weapon_type::BOW);

        assert!(!state.is_bow_drawn(&source));

        source.movement = NOCKED | MIDPOINT;
        assert!(!state.is_bow_drawn(&source));
        assert!(state.bow_tracker().objective());

        source.now = 0.11;
        assert!(state.is_bow_drawn(&source));

        source.movement = 0;
        assert!(!state.is_bow_drawn(&source));
        assert!(!state.bow_tracker().objective());
    }

    #[test]
    fn test_nan_arm_delay_still_reports_draw() {
        let config: Config = toml::from_str("[compat]\nago = true\n[bow]\narm_delay_secs = nan\n").unwrap();
        assert!(config.bow.arm_delay_secs.is_nan());

        let mut state = GameState::new(&config);
        let mut source = FakeSource { action: DRAWN, movement: NOCKED | MIDPOINT, ..FakeSource::default() }
            .with_right_weapon(weapon_type::BOW);

        let drawn: Vec<bool> = (0..5)
            .map(|t| {
                source.now = t as f32;
                state.is_bow_drawn(&source)
            })
            .collect();
        assert_eq!(drawn, [false, true, true, true, true]);
    }

    #[test]
    fn test_bow_without_ago_reads_nock_bit() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource { action: DRAWN, movement: NOCKED, ..FakeSource::default() }
            .with_right_weapon(weapon_type::BOW);
        assert!(state.is_bow_drawn(&source));
        assert!(!state.bow_tracker().objective());
    }

    #[test]
    fn test_crossbow_bypasses_tracker() {
        let mut state = GameState::new(&ago_config());
        let mut source = FakeSource { action: DRAWN, movement: NOCKED, ..FakeSource::default() }
            .with_right_weapon(weapon_type::CROSSBOW);
        assert!(!state.is_bow_drawn(&source));

        source.movement = NOCKED | MIDPOINT;
        assert!(state.is_bow_drawn(&source));
        assert!(!state.bow_tracker().objective());
    }

    #[test]
    fn test_unknown_bit_hook_sees_each_bit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut state = GameState::new(&Config::default());
        state.set_unknown_bit_hook(move |word, bit| sink.borrow_mut().push((word, bit)));

        let source = FakeSource { movement: (1 << 4) | (1 << 9), action: (1 << 0) | DRAWN, ..FakeSource::default() };
        state.snapshot(&source);

        assert_eq!(
            *seen.borrow(),
            vec![(FlagWord::Movement, 4), (FlagWord::Action, 0)]
        );

        state.clear_unknown_bit_hook();
        state.snapshot(&source);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_apply_config_switches_override() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource { face_node_flags: Some(1), ..FakeSource::default() };
        assert_eq!(state.camera_state(&source), CameraState::ThirdPerson);

        let mut config = Config::default();
        config.compat.ifpv = true;
        state.apply_config(&config);
        assert!(state.compat().ifpv);
        assert_eq!(state.camera_state(&source), CameraState::FirstPerson);
    }

    #[test]
    fn test_update_evaluates_whole_frame() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource {
            camera_mode: CameraMode::IronSights.id(),
            action: DRAWN,
            movement: NOCKED,
            ..FakeSource::default()
        }
        .with_right_weapon(weapon_type::BOW);

        let frame = state.update(&source);
        assert_eq!(frame.camera, CameraState::IronSights);
        assert!(frame.bow_drawn);
        assert!(frame.snapshot.is_using_bow());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "unmapped camera mode")]
    fn test_unmapped_mode_asserts_in_debug() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource { camera_mode: 42, ..FakeSource::default() };
        state.camera_state(&source);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_unmapped_mode_is_unknown_in_release() {
        let mut state = GameState::new(&Config::default());
        let source = FakeSource { camera_mode: 42, ..FakeSource::default() };
        assert_eq!(state.camera_state(&source), CameraState::Unknown);
    }
}
