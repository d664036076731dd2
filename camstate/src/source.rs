// Read-only view of the engine state the classifier consumes.

use crate::equipment::SpellDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Right,
    Left,
}

/// Item in a hand slot. `weapon_type` is the engine weapon-type code, or
/// `None` when the item is not a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquippedItem {
    pub form_id: u32,
    pub weapon_type: Option<u32>,
}

/// Enchantment bound to a hand (staves and enchanted weapons).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enchantment {
    pub form_id: u32,
}

/// Raw values for one tracked actor and its camera.
///
/// Implementations read live engine memory (or a recording) and never cache;
/// every call reflects the current frame. Missing data is reported as `None`
/// or `false`, never as an error.
pub trait GameStateSource {
    fn movement_flags(&self) -> u32;

    fn action_flags(&self) -> u32;

    /// Raw camera state id, see [`crate::camera::CameraMode::from_id`].
    fn camera_mode(&self) -> u32;

    /// False while the actor has no process manager (loading, disabled).
    fn has_process_context(&self) -> bool;

    fn equipped_item(&self, hand: Hand) -> Option<EquippedItem>;

    fn hand_enchantment(&self, hand: Hand) -> Option<Enchantment>;

    fn hand_spell(&self, hand: Hand) -> Option<SpellDescriptor>;

    /// Flags of the `BSFaceGenNiNodeSkinned` node, `None` if the node isn't loaded.
    fn face_node_flags(&self) -> Option<u32>;

    fn race_name(&self) -> Option<&str>;

    /// Monotonic game clock in seconds.
    fn now_seconds(&self) -> f32;

    fn pov_slide_mode(&self) -> bool {
        false
    }
}
