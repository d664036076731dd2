// Decoders for the two actor-state flag words.
//
// Bit meanings were worked out by watching the words change in game, so the
// names below are provisional. The positions and the boolean logic are what
// the rest of the crate relies on.

use std::fmt;

/// Movement word bit positions.
pub mod movement {
    // One of 0/1 and one of 2/3 are set together while the player moves.
    pub const MOTION_0: u32 = 0;
    pub const MOTION_1: u32 = 1;
    pub const MOTION_2: u32 = 2;
    pub const MOTION_3: u32 = 3;

    pub const WALKING: u32 = 6;
    pub const RUNNING: u32 = 7;
    pub const SPRINTING: u32 = 8;
    pub const SNEAKING: u32 = 9;
    pub const SWIMMING: u32 = 10;

    // Furniture and bed interaction
    pub const SEATED: u32 = 14;
    pub const IN_FURNITURE: u32 = 15;
    pub const IN_BED: u32 = 16;
    pub const LEAVING_BED: u32 = 17;

    // Bow draw. 28 and 29 flip around while drawing, only 29 is used.
    pub const BOW_UNSTABLE: u32 = 28;
    pub const BOW_MIDPOINT: u32 = 29;
    pub const BOW_RELEASED: u32 = 30;
    pub const BOW_NOCKED: u32 = 31;

    pub const KNOWN: &[u32] = &[
        MOTION_0, MOTION_1, MOTION_2, MOTION_3,
        WALKING, RUNNING, SPRINTING, SNEAKING, SWIMMING,
        SEATED, IN_FURNITURE, IN_BED, LEAVING_BED,
        BOW_UNSTABLE, BOW_MIDPOINT, BOW_RELEASED, BOW_NOCKED,
    ];
}

/// Action word bit positions.
pub mod action {
    pub const MOUNT_ACTION: u32 = 3;
    // Flips while switching weapons or spells. Never read as "drawn".
    pub const WEAPON_SWITCHING: u32 = 5;
    pub const WEAPON_DRAWN: u32 = 6;
    pub const ON_MOUNT: u32 = 12;

    pub const KNOWN: &[u32] = &[MOUNT_ACTION, WEAPON_SWITCHING, WEAPON_DRAWN, ON_MOUNT];
}

const fn mask_of(bits: &[u32]) -> u32 {
    let mut mask = 0u32;
    let mut i = 0;
    while i < bits.len() {
        mask |= 1 << bits[i];
        i += 1;
    }
    mask
}

const KNOWN_MOVEMENT_MASK: u32 = mask_of(movement::KNOWN);
const KNOWN_ACTION_MASK: u32 = mask_of(action::KNOWN);

/// Which of the two words a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagWord {
    Movement,
    Action,
}

impl fmt::Display for FlagWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagWord::Movement => write!(f, "movement"),
            FlagWord::Action => write!(f, "action"),
        }
    }
}

#[inline]
fn bit(word: u32, index: u32) -> bool {
    (word >> index) & 1 == 1
}

/// Set bits of `word` that are not covered by `known_mask`, lowest first.
fn unknown_bits(word: u32, known_mask: u32) -> impl Iterator<Item = u32> {
    let unknown = word & !known_mask;
    (0..32).filter(move |i| bit(unknown, *i))
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MovementFlags(pub u32);

impl fmt::Debug for MovementFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MovementFlags({:#010x})", self.0)
    }
}

impl MovementFlags {
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn bit(self, index: u32) -> bool {
        bit(self.0, index)
    }

    pub fn unknown_bits(self) -> impl Iterator<Item = u32> {
        unknown_bits(self.0, KNOWN_MOVEMENT_MASK)
    }

    // Shared gate for walk/run/sprint
    fn is_moving(self) -> bool {
        (self.bit(movement::MOTION_0) || self.bit(movement::MOTION_1))
            && (self.bit(movement::MOTION_2) || self.bit(movement::MOTION_3))
    }

    pub fn is_sneaking(self) -> bool {
        self.bit(movement::SNEAKING)
    }

    pub fn is_sprinting(self) -> bool {
        self.is_moving() && self.bit(movement::SPRINTING)
    }

    pub fn is_running(self) -> bool {
        self.is_moving() && self.bit(movement::RUNNING)
    }

    pub fn is_walking(self) -> bool {
        self.is_moving() && self.bit(movement::WALKING)
    }

    pub fn is_swimming(self) -> bool {
        self.bit(movement::SWIMMING)
    }

    pub fn is_sitting(self) -> bool {
        self.bit(movement::SEATED) && self.bit(movement::IN_FURNITURE)
    }

    /// In bed, getting into bed, or getting out of bed.
    pub fn is_sleeping(self) -> bool {
        (self.is_sitting() && self.bit(movement::IN_BED))
            || (self.bit(movement::IN_FURNITURE) && self.bit(movement::IN_BED))
            || self.bit(movement::LEAVING_BED)
    }

    pub fn is_bow_nocked(self) -> bool {
        self.bit(movement::BOW_NOCKED)
    }

    pub fn is_bow_released(self) -> bool {
        self.bit(movement::BOW_RELEASED)
    }

    pub fn is_bow_midpoint(self) -> bool {
        self.bit(movement::BOW_MIDPOINT)
    }
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ActionFlags(pub u32);

impl fmt::Debug for ActionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionFlags({:#010x})", self.0)
    }
}

impl ActionFlags {
    pub fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn bit(self, index: u32) -> bool {
        bit(self.0, index)
    }

    pub fn unknown_bits(self) -> impl Iterator<Item = u32> {
        unknown_bits(self.0, KNOWN_ACTION_MASK)
    }

    pub fn is_weapon_drawn(self) -> bool {
        self.bit(action::WEAPON_DRAWN)
    }
}

/// Getting onto a horse. The first clause is a subset of the second and is
/// kept as observed.
pub fn is_mounting_horse(moves: MovementFlags, actions: ActionFlags) -> bool {
    let on_mount = actions.bit(action::ON_MOUNT) && moves.bit(movement::IN_FURNITURE);
    ((actions.bit(action::MOUNT_ACTION) && on_mount) || on_mount)
        && !moves.bit(movement::SEATED)
}

pub fn is_dismounting_horse(moves: MovementFlags, actions: ActionFlags) -> bool {
    actions.bit(action::MOUNT_ACTION)
        && actions.bit(action::ON_MOUNT)
        && moves.bit(movement::IN_BED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(bits: &[u32]) -> MovementFlags {
        MovementFlags(mask_of(bits))
    }

    fn act(bits: &[u32]) -> ActionFlags {
        ActionFlags(mask_of(bits))
    }

    #[test]
    fn test_gait_needs_both_motion_pairs() {
        assert!(mv(&[0, 2, 8]).is_sprinting());
        assert!(mv(&[1, 3, 7]).is_running());
        assert!(mv(&[0, 3, 6]).is_walking());

        // Gait bit alone is not enough
        assert!(!mv(&[8]).is_sprinting());
        assert!(!mv(&[0, 1, 8]).is_sprinting());
        assert!(!mv(&[2, 3, 7]).is_running());
    }

    #[test]
    fn test_single_bit_predicates() {
        assert!(mv(&[9]).is_sneaking());
        assert!(mv(&[10]).is_swimming());
        assert!(!MovementFlags(0).is_sneaking());
        assert!(!MovementFlags(0).is_swimming());
    }

    #[test]
    fn test_sitting_and_sleeping() {
        assert!(mv(&[14, 15]).is_sitting());
        assert!(!mv(&[14]).is_sitting());
        assert!(!mv(&[14, 15]).is_sleeping());

        assert!(mv(&[14, 15, 16]).is_sleeping()); // in bed
        assert!(mv(&[15, 16]).is_sleeping()); // getting in
        assert!(mv(&[17]).is_sleeping()); // getting out
        assert!(!mv(&[14, 16]).is_sleeping());
    }

    #[test]
    fn test_weapon_drawn_ignores_switch_bit() {
        assert!(act(&[6]).is_weapon_drawn());
        assert!(act(&[5, 6]).is_weapon_drawn());
        assert!(!act(&[5]).is_weapon_drawn());
        assert!(!ActionFlags(0).is_weapon_drawn());
    }

    #[test]
    fn test_mounting_reduces_to_mount_and_furniture() {
        assert!(is_mounting_horse(mv(&[15]), act(&[12])));
        assert!(is_mounting_horse(mv(&[15]), act(&[3, 12])));
        assert!(!is_mounting_horse(mv(&[14, 15]), act(&[3, 12])));
        assert!(!is_mounting_horse(mv(&[15]), act(&[3])));
        assert!(!is_mounting_horse(MovementFlags(0), act(&[12])));
    }

    #[test]
    fn test_dismounting() {
        assert!(is_dismounting_horse(mv(&[16]), act(&[3, 12])));
        assert!(!is_dismounting_horse(mv(&[16]), act(&[12])));
        assert!(!is_dismounting_horse(mv(&[15]), act(&[3, 12])));
    }

    #[test]
    fn test_bow_bits() {
        let flags = mv(&[29, 31]);
        assert!(flags.is_bow_nocked());
        assert!(flags.is_bow_midpoint());
        assert!(!flags.is_bow_released());
    }

    #[test]
    fn test_unknown_bits_reported_lowest_first() {
        let flags = MovementFlags(mask_of(&[0, 4, 9, 20]));
        assert_eq!(flags.unknown_bits().collect::<Vec<_>>(), vec![4, 20]);

        let flags = ActionFlags(mask_of(&[0, 6, 12, 31]));
        assert_eq!(flags.unknown_bits().collect::<Vec<_>>(), vec![0, 31]);

        assert_eq!(MovementFlags(KNOWN_MOVEMENT_MASK).unknown_bits().count(), 0);
    }
}
