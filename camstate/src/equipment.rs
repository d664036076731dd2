use crate::source::{GameStateSource, Hand};

// Engine weapon-type codes. The second set are the duplicated entries the
// engine keeps at the end of its type table.
pub mod weapon_type {
    pub const BOW: u32 = 7;
    pub const STAFF: u32 = 8;
    pub const CROSSBOW: u32 = 9;
    pub const BOW_2: u32 = 17;
    pub const STAFF_2: u32 = 18;
    pub const CROSSBOW_2: u32 = 19;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeaponKind {
    #[default]
    None,
    Melee,
    Bow,
    Crossbow,
    Staff,
}

impl WeaponKind {
    pub fn from_type_code(code: u32) -> Self {
        match code {
            weapon_type::BOW | weapon_type::BOW_2 => WeaponKind::Bow,
            weapon_type::CROSSBOW | weapon_type::CROSSBOW_2 => WeaponKind::Crossbow,
            weapon_type::STAFF | weapon_type::STAFF_2 => WeaponKind::Staff,
            _ => WeaponKind::Melee,
        }
    }

    pub fn is_weapon(self) -> bool {
        self != WeaponKind::None
    }

    pub fn is_ranged(self) -> bool {
        matches!(self, WeaponKind::Bow | WeaponKind::Crossbow)
    }

    /// Anything held that isn't a bow or crossbow. Unenchanted staves count.
    pub fn is_melee(self) -> bool {
        self.is_weapon() && !self.is_ranged()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpellKind {
    Spell,
    LeveledSpell,
    Scroll,
    Other(u32),
}

impl SpellKind {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => SpellKind::Spell,
            9 => SpellKind::LeveledSpell,
            13 => SpellKind::Scroll,
            other => SpellKind::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastType {
    ConstantEffect,
    Other(u32),
}

impl CastType {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => CastType::ConstantEffect,
            other => CastType::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delivery {
    OnSelf,
    Other(u32),
}

impl Delivery {
    pub fn from_code(code: u32) -> Self {
        match code {
            0 => Delivery::OnSelf,
            other => Delivery::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpellDescriptor {
    pub kind: SpellKind,
    pub cast_type: CastType,
    pub delivery: Delivery,
}

impl SpellDescriptor {
    pub fn from_codes(kind: u32, cast_type: u32, delivery: u32) -> Self {
        Self {
            kind: SpellKind::from_code(kind),
            cast_type: CastType::from_code(cast_type),
            delivery: Delivery::from_code(delivery),
        }
    }
}

/// Whether a spell is something you'd fight with: a spell, leveled spell or
/// scroll that is aimed at something else and isn't a constant effect.
pub fn is_combat_magic(spell: Option<&SpellDescriptor>) -> bool {
    let Some(spell) = spell else { return false };

    if matches!(spell.kind, SpellKind::Other(_)) {
        return false;
    }
    if spell.delivery == Delivery::OnSelf {
        return false;
    }
    if spell.cast_type == CastType::ConstantEffect {
        return false;
    }
    true
}

/// Weapon category held in `hand`.
pub fn equipped_weapon<S: GameStateSource + ?Sized>(source: &S, hand: Hand) -> WeaponKind {
    if !source.has_process_context() {
        return WeaponKind::None;
    }

    source
        .equipped_item(hand)
        .and_then(|item| item.weapon_type)
        .map_or(WeaponKind::None, WeaponKind::from_type_code)
}

/// One hand's contents, sampled once per frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandState {
    pub weapon: WeaponKind,
    pub enchanted: bool,
    pub spell: Option<SpellDescriptor>,
}

impl HandState {
    pub fn sample<S: GameStateSource + ?Sized>(source: &S, hand: Hand) -> Self {
        Self {
            weapon: equipped_weapon(source, hand),
            enchanted: source.hand_enchantment(hand).is_some(),
            spell: source.hand_spell(hand),
        }
    }

    /// Staves are the only weapons treated as delivering magic.
    pub fn is_using_magic_item(&self) -> bool {
        self.enchanted && self.weapon == WeaponKind::Staff
    }

    /// Combat spell in an otherwise empty hand.
    pub fn is_casting_hand(&self) -> bool {
        is_combat_magic(self.spell.as_ref()) && !self.weapon.is_weapon()
    }
}

/// Both hands. Every check ORs the two hands together.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loadout {
    pub right: HandState,
    pub left: HandState,
}

impl Loadout {
    pub fn sample<S: GameStateSource + ?Sized>(source: &S) -> Self {
        Self {
            right: HandState::sample(source, Hand::Right),
            left: HandState::sample(source, Hand::Left),
        }
    }

    pub fn hand(&self, hand: Hand) -> &HandState {
        match hand {
            Hand::Right => &self.right,
            Hand::Left => &self.left,
        }
    }

    fn any(&self, check: impl Fn(&HandState) -> bool) -> bool {
        check(&self.right) || check(&self.left)
    }

    pub fn is_melee_weapon_drawn(&self, weapon_drawn: bool) -> bool {
        weapon_drawn && self.any(|h| h.weapon.is_melee())
    }

    pub fn is_ranged_weapon_drawn(&self, weapon_drawn: bool) -> bool {
        weapon_drawn && self.any(|h| h.weapon.is_ranged())
    }

    pub fn is_using_bow(&self, weapon_drawn: bool) -> bool {
        weapon_drawn && self.any(|h| h.weapon == WeaponKind::Bow)
    }

    pub fn is_using_crossbow(&self, weapon_drawn: bool) -> bool {
        weapon_drawn && self.any(|h| h.weapon == WeaponKind::Crossbow)
    }

    pub fn is_magic_drawn(&self, weapon_drawn: bool) -> bool {
        if !weapon_drawn {
            return false;
        }
        self.any(HandState::is_using_magic_item) || self.any(HandState::is_casting_hand)
    }
}
