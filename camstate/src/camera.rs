use std::fmt;

use crate::snapshot::Snapshot;

/// The engine's own camera state, by index into its camera state table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMode {
    FirstPerson,
    AutoVanity,
    TweenMenu,
    Transition,
    /// Third person while using an object (crafting stations and the like)
    ThirdPerson1,
    Furniture,
    /// Regular third person
    ThirdPerson2,
    Horse,
    Bleedout,
    Dragon,
    /// Kill moves
    Vats,
    Free,
    IronSights,
    Unmapped(u32),
}

impl CameraMode {
    pub fn from_id(id: u32) -> Self {
        match id {
            0 => CameraMode::FirstPerson,
            1 => CameraMode::AutoVanity,
            2 => CameraMode::TweenMenu,
            3 => CameraMode::Transition,
            4 => CameraMode::ThirdPerson1,
            5 => CameraMode::Furniture,
            6 => CameraMode::ThirdPerson2,
            7 => CameraMode::Horse,
            8 => CameraMode::Bleedout,
            9 => CameraMode::Dragon,
            10 => CameraMode::Vats,
            11 => CameraMode::Free,
            12 => CameraMode::IronSights,
            other => CameraMode::Unmapped(other),
        }
    }

    pub fn id(self) -> u32 {
        match self {
            CameraMode::FirstPerson => 0,
            CameraMode::AutoVanity => 1,
            CameraMode::TweenMenu => 2,
            CameraMode::Transition => 3,
            CameraMode::ThirdPerson1 => 4,
            CameraMode::Furniture => 5,
            CameraMode::ThirdPerson2 => 6,
            CameraMode::Horse => 7,
            CameraMode::Bleedout => 8,
            CameraMode::Dragon => 9,
            CameraMode::Vats => 10,
            CameraMode::Free => 11,
            CameraMode::IronSights => 12,
            CameraMode::Unmapped(id) => id,
        }
    }
}

/// What the camera should be doing this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CameraState {
    #[default]
    Unknown,
    FirstPerson,
    ThirdPerson,
    ThirdPersonCombat,
    Vanity,
    Tweening,
    Transitioning,
    UsingObject,
    KillMove,
    Bleedout,
    Free,
    IronSights,
    Furniture,
    Horseback,
    Dragon,
}

impl fmt::Display for CameraState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// Raw camera checks
impl Snapshot {
    pub fn is_in_auto_vanity_camera(&self) -> bool {
        self.camera_mode == CameraMode::AutoVanity
    }

    pub fn is_in_tween_camera(&self) -> bool {
        self.camera_mode == CameraMode::TweenMenu
    }

    pub fn is_in_camera_transition(&self) -> bool {
        self.camera_mode == CameraMode::Transition
    }

    pub fn is_in_using_object_camera(&self) -> bool {
        self.camera_mode == CameraMode::ThirdPerson1
    }

    pub fn is_in_kill_move(&self) -> bool {
        self.camera_mode == CameraMode::Vats
    }

    pub fn is_in_bleedout_camera(&self) -> bool {
        self.camera_mode == CameraMode::Bleedout
    }

    pub fn is_in_free_camera(&self) -> bool {
        self.camera_mode == CameraMode::Free
    }

    pub fn is_in_aiming_camera(&self) -> bool {
        self.camera_mode == CameraMode::IronSights
    }

    pub fn is_in_furniture_camera(&self) -> bool {
        self.camera_mode == CameraMode::Furniture
    }

    pub fn is_in_dragon_camera(&self) -> bool {
        self.camera_mode == CameraMode::Dragon
    }

    /// Engine first person, or a first-person mod hiding behind third person.
    pub fn is_first_person(&self) -> bool {
        self.camera_mode == CameraMode::FirstPerson || self.first_person_override()
    }

    pub fn is_in_horse_camera(&self) -> bool {
        self.camera_mode == CameraMode::Horse && !self.first_person_override()
    }

    pub fn is_third_person(&self) -> bool {
        self.camera_mode == CameraMode::ThirdPerson2 && !self.first_person_override()
    }

    pub fn is_third_person_combat(&self) -> bool {
        self.is_third_person() && self.is_weapon_drawn()
    }
}

/// One row of the camera decision table.
pub struct CameraRule {
    pub name: &'static str,
    pub applies: fn(&Snapshot) -> bool,
    pub state: CameraState,
}

impl fmt::Debug for CameraRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraRule")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}

/// Evaluated top to bottom, first match wins. Sleeping overrides everything
/// because the bed camera reports whatever mode the player entered with.
///
/// The first-person, horse and both third-person rows go through
/// [`Snapshot::first_person_override`]. Its Improved Camera half is newer than
/// the rest of this table, which only ever honoured IFPV; with
/// `compat.improved_camera` off (the default) the table behaves as before.
pub static CAMERA_RULES: &[CameraRule] = &[
    CameraRule { name: "sleeping", applies: Snapshot::is_sleeping, state: CameraState::FirstPerson },
    CameraRule { name: "auto_vanity", applies: Snapshot::is_in_auto_vanity_camera, state: CameraState::Vanity },
    CameraRule { name: "tween", applies: Snapshot::is_in_tween_camera, state: CameraState::Tweening },
    CameraRule { name: "transition", applies: Snapshot::is_in_camera_transition, state: CameraState::Transitioning },
    CameraRule { name: "using_object", applies: Snapshot::is_in_using_object_camera, state: CameraState::UsingObject },
    CameraRule { name: "kill_move", applies: Snapshot::is_in_kill_move, state: CameraState::KillMove },
    CameraRule { name: "bleedout", applies: Snapshot::is_in_bleedout_camera, state: CameraState::Bleedout },
    CameraRule { name: "free", applies: Snapshot::is_in_free_camera, state: CameraState::Free },
    CameraRule { name: "aiming", applies: Snapshot::is_in_aiming_camera, state: CameraState::IronSights },
    CameraRule { name: "furniture", applies: Snapshot::is_in_furniture_camera, state: CameraState::Furniture },
    CameraRule { name: "first_person", applies: Snapshot::is_first_person, state: CameraState::FirstPerson },
    CameraRule { name: "horse", applies: Snapshot::is_in_horse_camera, state: CameraState::Horseback },
    CameraRule { name: "dragon", applies: Snapshot::is_in_dragon_camera, state: CameraState::Dragon },
    CameraRule { name: "third_person_combat", applies: Snapshot::is_third_person_combat, state: CameraState::ThirdPersonCombat },
    CameraRule { name: "third_person", applies: Snapshot::is_third_person, state: CameraState::ThirdPerson },
];

pub fn matching_rule(snapshot: &Snapshot) -> Option<&'static CameraRule> {
    CAMERA_RULES.iter().find(|rule| (rule.applies)(snapshot))
}

/// `Unknown` only when no rule matched, i.e. the raw mode is unmapped.
pub fn resolve(snapshot: &Snapshot) -> CameraState {
    matching_rule(snapshot).map_or(CameraState::Unknown, |rule| rule.state)
}
