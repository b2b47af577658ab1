// @generated by charm-tables from charms.json. DO NOT EDIT.

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum CharmEffect {
    CRIT_CHANCE,
    ARMOR,
    FIRE_RESIST,
    ABILITY_COUNT,
}

pub const ABILITY_COUNT: usize = CharmEffect::ABILITY_COUNT as usize;

pub const EFFECT_CAPS: [f64; ABILITY_COUNT] = [
    50.0,
    200.0,
    12.5,
];

pub const EFFECT_NAMES: [&str; ABILITY_COUNT] = [
    "crit_chance",
    "armor",
    "fire_resist",
];

pub const EFFECT_DISPLAY_NAMES: [&str; ABILITY_COUNT] = [
    "Crit Chance",
    "Armor",
    "Fire Resist",
];

pub const EFFECT_IS_PERCENT: [bool; ABILITY_COUNT] = [
    true,
    false,
    true,
];

pub const EFFECT_ROUND_TO_INTEGER: [bool; ABILITY_COUNT] = [
    false,
    true,
    true,
];

impl CharmEffect {
    /// 全部效果（不含哨兵），按表顺序排列
    pub const ALL: [Self; ABILITY_COUNT] = [
        Self::CRIT_CHANCE,
        Self::ARMOR,
        Self::FIRE_RESIST,
    ];

    /// 在各常量表中的下标
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 按标识符查找效果
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "crit_chance" => Some(Self::CRIT_CHANCE),
            "armor" => Some(Self::ARMOR),
            "fire_resist" => Some(Self::FIRE_RESIST),
            _ => None,
        }
    }
}
