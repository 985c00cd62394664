//! Clear condition codes.
//!
//! Clear conditions are keyed by sparse, hash-like 32-bit codes. The table is
//! kept sorted by code and searched with a binary search. Code 0 means the
//! course has no clear condition.
//!
//! Descriptions containing `(n)` take the header's
//! `clear_condition_magnitude`; see [`ClearCondition::describe`].

use serde::{Deserialize, Serialize};

use super::Name;

/// A course clear condition, stored as its raw code.
///
/// # Example
///
/// ```
/// use course_codec::enums::{ClearCondition, Name};
///
/// assert_eq!(ClearCondition::NONE.name(), Name::Known("None"));
/// assert_eq!(
///     ClearCondition(4_293_354_249).describe(3),
///     "Reach the goal after defeating at least/all 3 Banzai Bill(s)."
/// );
/// assert_eq!(ClearCondition(12).name(), Name::Unknown(12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClearCondition(pub u32);

impl ClearCondition {
    /// No clear condition.
    pub const NONE: ClearCondition = ClearCondition(0);

    /// Returns the raw code.
    #[must_use]
    pub const fn code(self) -> u32 {
        self.0
    }

    /// Returns the condition text, or `Name::Unknown` for unmapped codes.
    #[must_use]
    pub fn name(self) -> Name {
        CLEAR_CONDITIONS
            .binary_search_by_key(&self.0, |&(code, _)| code)
            .map_or(Name::Unknown(self.0), |i| Name::Known(CLEAR_CONDITIONS[i].1))
    }

    /// Returns the condition text with `(n)` replaced by `magnitude`.
    #[must_use]
    pub fn describe(self, magnitude: i16) -> String {
        self.name().to_string().replace("(n)", &magnitude.to_string())
    }

    /// Returns every mapped condition, sorted by code.
    #[must_use]
    pub fn table() -> &'static [(u32, &'static str)] {
        CLEAR_CONDITIONS
    }
}

impl From<u32> for ClearCondition {
    fn from(code: u32) -> Self {
        ClearCondition(code)
    }
}

impl std::fmt::Display for ClearCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.name(), f)
    }
}

/// Sorted by code. `binary_search` depends on it.
static CLEAR_CONDITIONS: &[(u32, &str)] = &[
    (0, "None"),
    (137_525_990, "Reach the goal without landing after leaving the ground."),
    (199_585_683, "Reach the goal after defeating at least/all (n) Mechakoopa(s)."),
    (272_349_836, "Reach the goal after defeating at least/all (n) Cheep Cheep(s)."),
    (375_673_178, "Reach the goal without taking damage."),
    (426_197_923, "Reach the goal as Boomerang Mario."),
    (436_833_616, "Reach the goal while wearing a Shoe."),
    (713_979_835, "Reach the goal as Fire Mario."),
    (744_927_294, "Reach the goal as Frog Mario."),
    (751_004_331, "Reach the goal after defeating at least/all (n) Larry(s)."),
    (900_050_759, "Reach the goal as Raccoon Mario."),
    (947_659_466, "Reach the goal after defeating at least/all (n) Blooper(s)."),
    (976_173_462, "Reach the goal as Propeller Mario."),
    (994_686_866, "Reach the goal while wearing a Propeller Box."),
    (998_904_081, "Reach the goal after defeating at least/all (n) Spike(s)."),
    (1_008_094_897, "Reach the goal after defeating at least/all (n) Boom Boom(s)."),
    (1_051_433_633, "Reach the goal while holding a Koopa Shell."),
    (1_061_233_896, "Reach the goal after defeating at least/all (n) Porcupuffer(s)."),
    (1_062_253_843, "Reach the goal after defeating at least/all (n) Charvaargh(s)."),
    (1_079_889_509, "Reach the goal after defeating at least/all (n) Bullet Bill(s)."),
    (1_080_535_886, "Reach the goal after defeating at least/all (n) Bully/Bullies."),
    (1_151_250_770, "Reach the goal while wearing a Goomba Mask."),
    (1_182_464_856, "Reach the goal after defeating at least/all (n) Hop-Chops."),
    (1_219_761_531, "Reach the goal while holding a Red POW Block. OR Reach the goal after activating at least/all (n) Red POW Block(s)."),
    (1_221_661_152, "Reach the goal after defeating at least/all (n) Bob-omb(s)."),
    (1_259_427_138, "Reach the goal after defeating at least/all (n) Spiny/Spinies."),
    (1_268_255_615, "Reach the goal after defeating at least/all (n) Bowser(s)/Meowser(s)."),
    (1_279_580_818, "Reach the goal after defeating at least/all (n) Ant Trooper(s)."),
    (1_283_945_123, "Reach the goal on a Lakitu's Cloud."),
    (1_344_044_032, "Reach the goal after defeating at least/all (n) Boo(s)."),
    (1_425_973_877, "Reach the goal after defeating at least/all (n) Roy(s)."),
    (1_429_902_736, "Reach the goal while holding a Trampoline."),
    (1_431_944_825, "Reach the goal after defeating at least/all (n) Morton(s)."),
    (1_446_467_058, "Reach the goal after defeating at least/all (n) Fish Bone(s)."),
    (1_510_495_760, "Reach the goal after defeating at least/all (n) Monty Mole(s)."),
    (1_656_179_347, "Reach the goal after picking up at least/all (n) 1-Up Mushroom(s)."),
    (1_665_820_273, "Reach the goal after defeating at least/all (n) Hammer Bro(s.)."),
    (1_676_924_210, "Reach the goal after hitting at least/all (n) P Switch(es). OR Reach the goal while holding a P Switch."),
    (1_715_960_804, "Reach the goal after activating at least/all (n) POW Block(s). OR Reach the goal while holding a POW Block."),
    (1_724_036_958, "Reach the goal after defeating at least/all (n) Angry Sun(s)."),
    (1_730_095_541, "Reach the goal after defeating at least/all (n) Pokey(s)."),
    (1_780_278_293, "Reach the goal as Superball Mario."),
    (1_839_897_151, "Reach the goal after defeating at least/all (n) Pom Pom(s)."),
    (1_969_299_694, "Reach the goal after defeating at least/all (n) Peepa(s)."),
    (2_035_052_211, "Reach the goal after defeating at least/all (n) Lakitu(s)."),
    (2_038_503_215, "Reach the goal after defeating at least/all (n) Lemmy(s)."),
    (2_048_033_177, "Reach the goal after defeating at least/all (n) Lava Bubble(s)."),
    (2_076_496_776, "Reach the goal while wearing a Bullet Bill Mask."),
    (2_089_161_429, "Reach the goal as Big Mario."),
    (2_111_528_319, "Reach the goal as Cat Mario."),
    (2_131_209_407, "Reach the goal after defeating at least/all (n) Goomba(s)/Galoomba(s)."),
    (2_139_645_066, "Reach the goal after defeating at least/all (n) Thwomp(s)."),
    (2_259_346_429, "Reach the goal after defeating at least/all (n) Iggy(s)."),
    (2_549_654_281, "Reach the goal while wearing a Dry Bones Shell."),
    (2_694_559_007, "Reach the goal after defeating at least/all (n) Sledge Bro(s.)."),
    (2_746_139_466, "Reach the goal after defeating at least/all (n) Rocky Wrench(es)."),
    (2_749_601_092, "Reach the goal after grabbing at least/all (n) 50-Coin(s)."),
    (2_855_236_681, "Reach the goal as Flying Squirrel Mario."),
    (3_036_298_571, "Reach the goal as Buzzy Mario."),
    (3_074_433_106, "Reach the goal as Builder Mario."),
    (3_146_932_243, "Reach the goal as Cape Mario."),
    (3_174_413_484, "Reach the goal after defeating at least/all (n) Wendy(s)."),
    (3_206_222_275, "Reach the goal while wearing a Cannon Box."),
    (3_314_955_857, "Reach the goal as Link."),
    (3_342_591_980, "Reach the goal while you have Super Star invincibility."),
    (3_346_433_512, "Reach the goal after defeating at least/all (n) Goombrat(s)/Goombud(s)."),
    (3_348_058_176, "Reach the goal after grabbing at least/all (n) 10-Coin(s)."),
    (3_353_006_607, "Reach the goal after defeating at least/all (n) Buzzy Beetle(s)."),
    (3_392_229_961, "Reach the goal after defeating at least/all (n) Bowser Jr.(s)."),
    (3_437_308_486, "Reach the goal after defeating at least/all (n) Koopa Troopa(s)."),
    (3_459_144_213, "Reach the goal after defeating at least/all (n) Chain Chomp(s)."),
    (3_466_227_835, "Reach the goal after defeating at least/all (n) Muncher(s)."),
    (3_481_362_698, "Reach the goal after defeating at least/all (n) Wiggler(s)."),
    (3_513_732_174, "Reach the goal as SMB2 Mario."),
    (3_649_647_177, "Reach the goal in a Koopa Clown Car/Junior Clown Car."),
    (3_725_246_406, "Reach the goal as Spiny Mario."),
    (3_730_243_509, "Reach the goal in a Koopa Troopa Car."),
    (3_748_075_486, "Reach the goal after defeating at least/all (n) Piranha Plant(s)/Jumping Piranha Plant(s)."),
    (3_797_704_544, "Reach the goal after defeating at least/all (n) Dry Bones."),
    (3_824_561_269, "Reach the goal after defeating at least/all (n) Stingby/Stingbies."),
    (3_833_342_952, "Reach the goal after defeating at least/all (n) Piranha Creeper(s)."),
    (3_842_179_831, "Reach the goal after defeating at least/all (n) Fire Piranha Plant(s)."),
    (3_874_680_510, "Reach the goal after breaking at least/all (n) Crates(s)."),
    (3_974_581_191, "Reach the goal after defeating at least/all (n) Ludwig(s)."),
    (3_977_257_962, "Reach the goal as Super Mario."),
    (4_042_480_826, "Reach the goal after defeating at least/all (n) Skipsqueak(s)."),
    (4_116_396_131, "Reach the goal after grabbing at least/all (n) Coin(s)."),
    (4_117_878_280, "Reach the goal after defeating at least/all (n) Magikoopa(s)."),
    (4_122_555_074, "Reach the goal after grabbing at least/all (n) 30-Coin(s)."),
    (4_153_835_197, "Reach the goal as Balloon Mario."),
    (4_172_105_156, "Reach the goal while wearing a Red POW Box."),
    (4_209_535_561, "Reach the goal while riding Yoshi."),
    (4_269_094_462, "Reach the goal after defeating at least/all (n) Spike Top(s)."),
    (4_293_354_249, "Reach the goal after defeating at least/all (n) Banzai Bill(s)."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        assert!(CLEAR_CONDITIONS.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_table_size() {
        assert!(CLEAR_CONDITIONS.len() > 90);
    }

    #[test]
    fn test_zero_is_none() {
        assert_eq!(ClearCondition(0).name(), Name::Known("None"));
        assert_eq!(ClearCondition::default(), ClearCondition::NONE);
    }

    #[test]
    fn test_table_edges() {
        assert_eq!(
            ClearCondition(4_293_354_249).name(),
            Name::Known("Reach the goal after defeating at least/all (n) Banzai Bill(s).")
        );
        assert_eq!(
            ClearCondition(137_525_990).name(),
            Name::Known("Reach the goal without landing after leaving the ground.")
        );
    }

    #[test]
    fn test_unmapped_codes() {
        for code in [1, 137_525_989, 4_293_354_250, u32::MAX] {
            assert_eq!(ClearCondition(code).name(), Name::Unknown(code));
        }
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            ClearCondition(4_116_396_131).describe(50),
            "Reach the goal after grabbing at least/all 50 Coin(s)."
        );
        assert_eq!(
            ClearCondition(375_673_178).describe(0),
            "Reach the goal without taking damage."
        );
        assert_eq!(ClearCondition(5).describe(1), "Unknown(5)");
    }

    #[test]
    fn test_serde_transparent() {
        assert_eq!(serde_json::to_string(&ClearCondition(7)).unwrap(), "7");
        assert_eq!(
            serde_json::from_str::<ClearCondition>("375673178").unwrap(),
            ClearCondition(375_673_178)
        );
    }
}
