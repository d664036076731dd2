// In-memory source for unit tests.

use crate::camera::CameraMode;
use crate::equipment::SpellDescriptor;
use crate::source::{Enchantment, EquippedItem, GameStateSource, Hand};

#[derive(Debug, Clone)]
pub struct FakeSource {
    pub movement: u32,
    pub action: u32,
    pub camera_mode: u32,
    pub process_context: bool,
    pub right_item: Option<EquippedItem>,
    pub left_item: Option<EquippedItem>,
    pub right_enchantment: Option<Enchantment>,
    pub left_enchantment: Option<Enchantment>,
    pub right_spell: Option<SpellDescriptor>,
    pub left_spell: Option<SpellDescriptor>,
    pub face_node_flags: Option<u32>,
    pub race: Option<String>,
    pub now: f32,
    pub pov_slide: bool,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self {
            movement: 0,
            action: 0,
            camera_mode: CameraMode::ThirdPerson2.id(),
            process_context: true,
            right_item: None,
            left_item: None,
            right_enchantment: None,
            left_enchantment: None,
            right_spell: None,
            left_spell: None,
            face_node_flags: None,
            race: None,
            now: 0.0,
            pov_slide: false,
        }
    }
}

impl FakeSource {
    pub fn with_right_weapon(mut self, weapon_type: u32) -> Self {
        self.right_item = Some(EquippedItem { form_id: 0x12eb7, weapon_type: Some(weapon_type) });
        self
    }
}

impl GameStateSource for FakeSource {
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
        match hand {
            Hand::Right => self.right_item,
            Hand::Left => self.left_item,
        }
    }

    fn hand_enchantment(&self, hand: Hand) -> Option<Enchantment> {
        match hand {
            Hand::Right => self.right_enchantment,
            Hand::Left => self.left_enchantment,
        }
    }

    fn hand_spell(&self, hand: Hand) -> Option<SpellDescriptor> {
        match hand {
            Hand::Right => self.right_spell,
            Hand::Left => self.left_spell,
        }
    }

    fn face_node_flags(&self) -> Option<u32> {
        self.face_node_flags
    }

    fn race_name(&self) -> Option<&str> {
        self.race.as_deref()
    }

    fn now_seconds(&self) -> f32 {
        self.now
    }

    fn pov_slide_mode(&self) -> bool {
        self.pov_slide
    }
}
