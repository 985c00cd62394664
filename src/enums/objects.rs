//! Object kind codes.
//!
//! Object kinds are sequential `u16` codes starting at zero. Codes past the
//! end of the table (added by later game versions) decode as
//! [`ObjectKind::Unknown`].

code_enum! {
    /// Kind of a placed course object.
    ObjectKind: u16 {
        Goomba = 0 => "Goomba",
        Koopa = 1 => "Koopa",
        PiranhaFlower = 2 => "Piranha Flower",
        HammerBro = 3 => "Hammer Bro",
        Block = 4 => "Block",
        QuestionBlock = 5 => "? Block",
        HardBlock = 6 => "Hard Block",
        Ground = 7 => "Ground",
        Coin = 8 => "Coin",
        Pipe = 9 => "Pipe",
        Spring = 10 => "Spring",
        Lift = 11 => "Lift",
        Thwomp = 12 => "Thwomp",
        BulletBillBlaster = 13 => "Bullet Bill Blaster",
        MushroomPlatform = 14 => "Mushroom Platform",
        BobOmb = 15 => "Bob-omb",
        SemisolidPlatform = 16 => "Semisolid Platform",
        Bridge = 17 => "Bridge",
        PSwitch = 18 => "P Switch",
        Pow = 19 => "POW Block",
        SuperMushroom = 20 => "Super Mushroom",
        DonutBlock = 21 => "Donut Block",
        Cloud = 22 => "Cloud",
        NoteBlock = 23 => "Note Block",
        FireBar = 24 => "Fire Bar",
        Spiny = 25 => "Spiny",
        GoalGround = 26 => "Goal Ground",
        Goal = 27 => "Goal",
        BuzzyBeetle = 28 => "Buzzy Beetle",
        HiddenBlock = 29 => "Hidden Block",
        Lakitu = 30 => "Lakitu",
        LakituCloud = 31 => "Lakitu Cloud",
        BanzaiBill = 32 => "Banzai Bill",
        OneUp = 33 => "1-Up Mushroom",
        FireFlower = 34 => "Fire Flower",
        SuperStar = 35 => "Super Star",
        LavaLift = 36 => "Lava Lift",
        StartingBrick = 37 => "Starting Brick",
        StartingArrow = 38 => "Starting Arrow",
        Magikoopa = 39 => "Magikoopa",
        SpikeTop = 40 => "Spike Top",
        Boo = 41 => "Boo",
        ClownCar = 42 => "Clown Car",
        Spikes = 43 => "Spikes",
        BigMushroom = 44 => "Big Mushroom",
        ShoeGoomba = 45 => "Shoe Goomba",
        DryBones = 46 => "Dry Bones",
        Cannon = 47 => "Cannon",
        Blooper = 48 => "Blooper",
        CastleBridge = 49 => "Castle Bridge",
        JumpingMachine = 50 => "Jumping Machine",
        Skipsqueak = 51 => "Skipsqueak",
        Wiggler = 52 => "Wiggler",
        FastConveyorBelt = 53 => "Fast Conveyor Belt",
        Burner = 54 => "Burner",
        Door = 55 => "Door",
        CheepCheep = 56 => "Cheep Cheep",
        Muncher = 57 => "Muncher",
        RockyWrench = 58 => "Rocky Wrench",
        Track = 59 => "Track",
        LavaBubble = 60 => "Lava Bubble",
        ChainChomp = 61 => "Chain Chomp",
        Bowser = 62 => "Bowser",
        IceBlock = 63 => "Ice Block",
        Vine = 64 => "Vine",
        Stingby = 65 => "Stingby",
        Arrow = 66 => "Arrow",
        OneWay = 67 => "One-Way Wall",
        Saw = 68 => "Saw",
        Player = 69 => "Player",
        BigCoin = 70 => "Big Coin",
        HalfCollisionPlatform = 71 => "Half Collision Platform",
        KoopaCar = 72 => "Koopa Car",
        Cinobio = 73 => "Cinobio",
        SpikeBall = 74 => "Spike Ball",
        Stone = 75 => "Stone",
        Twister = 76 => "Twister",
        BoomBoom = 77 => "Boom Boom",
        Pokey = 78 => "Pokey",
        PBlock = 79 => "P Block",
        SprintPlatform = 80 => "Sprint Platform",
        Smb2Mushroom = 81 => "SMB2 Mushroom",
        Donut = 82 => "Donut",
        Skewer = 83 => "Skewer",
        SnakeBlock = 84 => "Snake Block",
        TrackBlock = 85 => "Track Block",
        Charvaargh = 86 => "Charvaargh",
        SlightSlope = 87 => "Slight Slope",
        SteepSlope = 88 => "Steep Slope",
        ReelCamera = 89 => "Reel Camera",
        CheckpointFlag = 90 => "Checkpoint Flag",
        Seesaw = 91 => "Seesaw",
        RedCoin = 92 => "Red Coin",
        ClearPipe = 93 => "Clear Pipe",
        ConveyorBelt = 94 => "Conveyor Belt",
        Key = 95 => "Key",
        AntTrooper = 96 => "Ant Trooper",
        WarpBox = 97 => "Warp Box",
        BowserJr = 98 => "Bowser Jr.",
        OnOffBlock = 99 => "ON/OFF Switch",
        DottedLineBlock = 100 => "Dotted-Line Block",
        WaterMarker = 101 => "Water Marker",
        MontyMole = 102 => "Monty Mole",
        FishBone = 103 => "Fish Bone",
        AngrySun = 104 => "Angry Sun",
        SwingingClaw = 105 => "Swinging Claw",
        Tree = 106 => "Tree",
        PiranhaCreeper = 107 => "Piranha Creeper",
        BlinkingBlock = 108 => "Blinking Block",
        SoundEffect = 109 => "Sound Effect",
        SpikeBlock = 110 => "Spike Block",
        Mechakoopa = 111 => "Mechakoopa",
        Crate = 112 => "Crate",
        MushroomTrampoline = 113 => "Mushroom Trampoline",
        Porkupuffer = 114 => "Porkupuffer",
        Cinobic = 115 => "Cinobic",
        SuperHammer = 116 => "Super Hammer",
        Bully = 117 => "Bully",
        Icicle = 118 => "Icicle",
        ExclamationBlock = 119 => "! Block",
        Lemmy = 120 => "Lemmy",
        Morton = 121 => "Morton",
        Larry = 122 => "Larry",
        Wendy = 123 => "Wendy",
        Iggy = 124 => "Iggy",
        Roy = 125 => "Roy",
        Ludwig = 126 => "Ludwig",
        CannonBox = 127 => "Cannon Box",
        PropellerBox = 128 => "Propeller Box",
        GoombaMask = 129 => "Goomba Mask",
        BulletBillMask = 130 => "Bullet Bill Mask",
        RedPowBox = 131 => "Red POW Box",
        OnOffTrampoline = 132 => "ON/OFF Trampoline",
    }
}

impl ObjectKind {
    /// Returns whether this kind occupies terrain tiles rather than acting
    /// as an entity.
    #[must_use]
    pub const fn is_terrain(self) -> bool {
        matches!(
            self,
            ObjectKind::Block
                | ObjectKind::HardBlock
                | ObjectKind::Ground
                | ObjectKind::Pipe
                | ObjectKind::SemisolidPlatform
                | ObjectKind::Bridge
                | ObjectKind::MushroomPlatform
                | ObjectKind::GoalGround
                | ObjectKind::CastleBridge
                | ObjectKind::SlightSlope
                | ObjectKind::SteepSlope
                | ObjectKind::ClearPipe
                | ObjectKind::Tree
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Name;

    #[test]
    fn test_codes_are_sequential() {
        for (code, kind) in ObjectKind::KNOWN.iter().enumerate() {
            assert_eq!(usize::from(kind.code()), code, "{kind}");
        }
    }

    #[test]
    fn test_table_bounds() {
        assert_eq!(ObjectKind::from_code(0), ObjectKind::Goomba);
        assert_eq!(ObjectKind::from_code(132), ObjectKind::OnOffTrampoline);
        assert_eq!(ObjectKind::from_code(133), ObjectKind::Unknown(133));
        assert_eq!(ObjectKind::from_code(133).name(), Name::Unknown(133));
    }

    #[test]
    fn test_names() {
        assert_eq!(ObjectKind::Goomba.to_string(), "Goomba");
        assert_eq!(ObjectKind::SnakeBlock.to_string(), "Snake Block");
        assert_eq!(ObjectKind::OneUp.to_string(), "1-Up Mushroom");
    }

    #[test]
    fn test_is_terrain() {
        assert!(ObjectKind::Ground.is_terrain());
        assert!(ObjectKind::Pipe.is_terrain());
        assert!(!ObjectKind::Goomba.is_terrain());
        assert!(!ObjectKind::Unknown(500).is_terrain());
    }
}
