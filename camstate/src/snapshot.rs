use crate::config::CompatConfig;
use crate::equipment::Loadout;
use crate::flags::{self, ActionFlags, MovementFlags};
use crate::camera::CameraMode;
use crate::source::GameStateSource;

pub const WEREWOLF_RACE: &str = "Werewolf";
pub const VAMPIRE_LORD_RACE: &str = "Vampire Lord";

// Immersive First Person View sets this on the face node while in first person
const FACE_NODE_IFPV_FIRST_PERSON: u32 = 1 << 0;
// Improved Camera clears this while the head is shown in first person
const FACE_NODE_IC_HIDDEN: u32 = 1 << 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaceIdentity {
    #[default]
    Unknown,
    Werewolf,
    VampireLord,
    Other,
}

impl RaceIdentity {
    /// Exact, case-sensitive match on the race's display name.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None => RaceIdentity::Unknown,
            Some(WEREWOLF_RACE) => RaceIdentity::Werewolf,
            Some(VAMPIRE_LORD_RACE) => RaceIdentity::VampireLord,
            Some(_) => RaceIdentity::Other,
        }
    }
}

/// Every raw value the classifier needs for one frame, read once.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub movement: MovementFlags,
    pub action: ActionFlags,
    pub camera_mode: CameraMode,
    pub loadout: Loadout,
    pub face_node_flags: Option<u32>,
    pub race: RaceIdentity,
    pub now: f32,
    pub pov_slide: bool,
    pub compat: CompatConfig,
}

impl Snapshot {
    /// Empty frame in the given camera mode.
    pub fn new(camera_mode: CameraMode) -> Self {
        Self {
            movement: MovementFlags::default(),
            action: ActionFlags::default(),
            camera_mode,
            loadout: Loadout::default(),
            face_node_flags: None,
            race: RaceIdentity::Unknown,
            now: 0.0,
            pov_slide: false,
            compat: CompatConfig::default(),
        }
    }

    pub fn sample<S: GameStateSource + ?Sized>(source: &S, compat: CompatConfig) -> Self {
        Self {
            movement: MovementFlags(source.movement_flags()),
            action: ActionFlags(source.action_flags()),
            camera_mode: CameraMode::from_id(source.camera_mode()),
            loadout: Loadout::sample(source),
            face_node_flags: source.face_node_flags(),
            race: RaceIdentity::from_name(source.race_name()),
            now: source.now_seconds(),
            pov_slide: source.pov_slide_mode(),
            compat,
        }
    }

    pub fn is_sneaking(&self) -> bool {
        self.movement.is_sneaking()
    }

    pub fn is_sprinting(&self) -> bool {
        self.movement.is_sprinting()
    }

    pub fn is_running(&self) -> bool {
        self.movement.is_running()
    }

    pub fn is_walking(&self) -> bool {
        self.movement.is_walking()
    }

    pub fn is_swimming(&self) -> bool {
        self.movement.is_swimming()
    }

    pub fn is_sitting(&self) -> bool {
        self.movement.is_sitting()
    }

    pub fn is_sleeping(&self) -> bool {
        self.movement.is_sleeping()
    }

    pub fn is_mounting_horse(&self) -> bool {
        flags::is_mounting_horse(self.movement, self.action)
    }

    pub fn is_dismounting_horse(&self) -> bool {
        flags::is_dismounting_horse(self.movement, self.action)
    }

    pub fn is_weapon_drawn(&self) -> bool {
        self.action.is_weapon_drawn()
    }

    pub fn is_melee_weapon_drawn(&self) -> bool {
        self.loadout.is_melee_weapon_drawn(self.is_weapon_drawn())
    }

    pub fn is_ranged_weapon_drawn(&self) -> bool {
        self.loadout.is_ranged_weapon_drawn(self.is_weapon_drawn())
    }

    pub fn is_using_bow(&self) -> bool {
        self.loadout.is_using_bow(self.is_weapon_drawn())
    }

    pub fn is_using_crossbow(&self) -> bool {
        self.loadout.is_using_crossbow(self.is_weapon_drawn())
    }

    pub fn is_magic_drawn(&self) -> bool {
        self.loadout.is_magic_drawn(self.is_weapon_drawn())
    }

    pub fn is_werewolf(&self) -> bool {
        self.race == RaceIdentity::Werewolf
    }

    pub fn is_vampire_lord(&self) -> bool {
        self.race == RaceIdentity::VampireLord
    }

    pub fn in_pov_slide_mode(&self) -> bool {
        self.pov_slide
    }

    /// A first-person mod has swapped the head mesh while the engine still
    /// reports a third-person camera. Only checked for enabled compat modes.
    pub fn first_person_override(&self) -> bool {
        let Some(node_flags) = self.face_node_flags else {
            return false;
        };

        let ifpv = self.compat.ifpv && node_flags & FACE_NODE_IFPV_FIRST_PERSON != 0;
        let improved_camera = self.compat.improved_camera && node_flags & FACE_NODE_IC_HIDDEN == 0;
        ifpv || improved_camera
    }
}
