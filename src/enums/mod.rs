//! Numeric code to name tables for every categorical course field.
//!
//! Every lookup is total. A code with no entry does not abort decoding; it
//! comes back as [`Name::Unknown`] carrying the raw value, and the typed
//! enums keep it in an `Unknown` variant so the code round-trips unchanged.
//!
//! Small sequential domains (themes, liquid modes, ...) are generated with
//! `code_enum!`. The large domains live in their own modules:
//!
//! - [`objects`] - object kinds (sequential, ~130 entries)
//! - [`clear_conditions`] - clear conditions (sparse 32-bit codes)
//!
//! # Example
//!
//! ```
//! use course_codec::enums::{EnumDomain, Name, Theme};
//!
//! assert_eq!(Theme::from_code(5), Theme::GhostHouse);
//! assert_eq!(Theme::from_code(5).name(), Name::Known("Ghost House"));
//! assert_eq!(Theme::from_code(42), Theme::Unknown(42));
//! assert_eq!(EnumDomain::Theme.lookup(4_000_000), Name::Unknown(4_000_000));
//! ```

use std::fmt;
use std::str::FromStr;

/// Generates a code-backed enum with an `Unknown` fallback variant.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident: $repr:ty {
            $($variant:ident = $code:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = $label]
                $variant,
            )+
            /// A code with no entry in the table.
            Unknown($repr),
        }

        impl $name {
            /// Every named variant, in code order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// Maps a raw code to its variant. Never fails.
            #[must_use]
            pub const fn from_code(code: $repr) -> Self {
                match code {
                    $($code => $name::$variant,)+
                    other => $name::Unknown(other),
                }
            }

            /// Returns the raw code stored in course data.
            #[must_use]
            pub const fn code(self) -> $repr {
                match self {
                    $($name::$variant => $code,)+
                    $name::Unknown(code) => code,
                }
            }

            /// Returns the display name, or `Name::Unknown` for unmapped codes.
            #[must_use]
            #[allow(clippy::cast_lossless, clippy::unnecessary_cast)]
            pub const fn name(self) -> $crate::enums::Name {
                match self {
                    $($name::$variant => $crate::enums::Name::Known($label),)+
                    $name::Unknown(code) => $crate::enums::Name::Unknown(code as u32),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::from_code(0)
            }
        }

        impl From<$repr> for $name {
            fn from(code: $repr) -> Self {
                Self::from_code(code)
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                value.code()
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.name(), f)
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(
                &self,
                serializer: S,
            ) -> ::std::result::Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(&self.code(), serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(
                deserializer: D,
            ) -> ::std::result::Result<Self, D::Error> {
                <$repr as ::serde::Deserialize>::deserialize(deserializer).map(Self::from_code)
            }
        }
    };
}

pub mod clear_conditions;
pub mod objects;

pub use clear_conditions::ClearCondition;
pub use objects::ObjectKind;

/// The result of looking up a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Name {
    /// The code has an entry in its table.
    Known(&'static str),

    /// The code has no entry; the raw value is kept.
    Unknown(u32),
}

impl Name {
    /// Returns the name if the code is mapped.
    #[must_use]
    pub const fn known(self) -> Option<&'static str> {
        match self {
            Name::Known(name) => Some(name),
            Name::Unknown(_) => None,
        }
    }

    /// Returns whether the code is mapped.
    #[must_use]
    pub const fn is_known(self) -> bool {
        matches!(self, Name::Known(_))
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Name::Known(name) => f.write_str(name),
            Name::Unknown(code) => write!(f, "Unknown({code})"),
        }
    }
}

code_enum! {
    /// Visual theme of an area.
    Theme: u8 {
        Overworld = 0 => "Overworld",
        Underground = 1 => "Underground",
        Castle = 2 => "Castle",
        Airship = 3 => "Airship",
        Underwater = 4 => "Underwater",
        GhostHouse = 5 => "Ghost House",
        Snow = 6 => "Snow",
        Desert = 7 => "Desert",
        Sky = 8 => "Sky",
        Forest = 9 => "Forest",
    }
}

code_enum! {
    /// Game style of a course, stored as two ASCII bytes (e.g. `M1`).
    GameStyle: u16 {
        Smb1 = 12621 => "SMB1",
        Smb3 = 13133 => "SMB3",
        Smw = 22349 => "SMW",
        Nsmbu = 21847 => "NSMBU",
        Sm3dw = 22323 => "SM3DW",
    }
}

code_enum! {
    /// Autoscroll mode of an area.
    AutoscrollType: u8 {
        None = 0 => "None",
        Slow = 1 => "Slow",
        Normal = 2 => "Normal",
        Fast = 3 => "Fast",
        Custom = 4 => "Custom",
    }
}

code_enum! {
    /// Course-wide autoscroll speed.
    AutoscrollSpeed: u8 {
        Slow = 0 => "Slow",
        Normal = 1 => "Normal",
        Fast = 2 => "Fast",
    }
}

code_enum! {
    /// Which side of the boundary line the area is built on.
    BoundaryType: u8 {
        BuiltAboveLine = 0 => "Built Above Line",
        BuiltBelowLine = 1 => "Built Below Line",
    }
}

code_enum! {
    /// Scrolling direction of an area.
    Orientation: u8 {
        Horizontal = 0 => "Horizontal",
        Vertical = 1 => "Vertical",
    }
}

code_enum! {
    /// How the water or lava level moves.
    LiquidMode: u8 {
        Static = 0 => "Static",
        RisingOrFalling = 1 => "Rising or Falling",
        RisingAndFalling = 2 => "Rising and Falling",
    }
}

code_enum! {
    /// How fast the water or lava level moves.
    LiquidSpeed: u8 {
        None = 0 => "None",
        Slow = 1 => "Slow",
        Medium = 2 => "Medium",
        Fast = 3 => "Fast",
    }
}

code_enum! {
    /// Broad category of a clear condition.
    ClearConditionCategory: u8 {
        None = 0 => "None",
        Parts = 1 => "Parts",
        Status = 2 => "Status",
        Actions = 3 => "Actions",
    }
}

code_enum! {
    /// Game version that last saved the course.
    GameVersion: u32 {
        V100 = 0 => "1.0.0",
        V101 = 1 => "1.0.1",
        V110 = 2 => "1.1.0",
        V200 = 3 => "2.0.0",
        V300 = 4 => "3.0.0",
        V301 = 5 => "3.0.1",
    }
}

code_enum! {
    /// Behaviour of an icicle.
    IcicleKind: u8 {
        Falling = 0 => "Falling",
        Fixed = 1 => "Fixed",
    }
}

/// Every categorical domain, for lookups by raw `u32` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumDomain {
    /// [`Theme`]
    Theme,
    /// [`GameStyle`]
    GameStyle,
    /// [`AutoscrollType`]
    AutoscrollType,
    /// [`AutoscrollSpeed`]
    AutoscrollSpeed,
    /// [`BoundaryType`]
    BoundaryType,
    /// [`Orientation`]
    Orientation,
    /// [`LiquidMode`]
    LiquidMode,
    /// [`LiquidSpeed`]
    LiquidSpeed,
    /// [`ClearConditionCategory`]
    ClearConditionCategory,
    /// [`ClearCondition`]
    ClearCondition,
    /// [`GameVersion`]
    GameVersion,
    /// [`ObjectKind`]
    ObjectKind,
    /// [`IcicleKind`]
    IcicleKind,
}

impl EnumDomain {
    /// All domains.
    pub const ALL: [EnumDomain; 13] = [
        EnumDomain::Theme,
        EnumDomain::GameStyle,
        EnumDomain::AutoscrollType,
        EnumDomain::AutoscrollSpeed,
        EnumDomain::BoundaryType,
        EnumDomain::Orientation,
        EnumDomain::LiquidMode,
        EnumDomain::LiquidSpeed,
        EnumDomain::ClearConditionCategory,
        EnumDomain::ClearCondition,
        EnumDomain::GameVersion,
        EnumDomain::ObjectKind,
        EnumDomain::IcicleKind,
    ];

    /// Looks up any `u32` code in this domain. Never panics.
    ///
    /// Codes wider than the domain's on-disk width are reported as unknown.
    #[must_use]
    pub fn lookup(self, code: u32) -> Name {
        fn narrow<T: TryFrom<u32>>(code: u32, name: impl FnOnce(T) -> Name) -> Name {
            T::try_from(code).map_or(Name::Unknown(code), name)
        }

        match self {
            EnumDomain::Theme => narrow(code, |c: u8| Theme::from_code(c).name()),
            EnumDomain::GameStyle => narrow(code, |c: u16| GameStyle::from_code(c).name()),
            EnumDomain::AutoscrollType => narrow(code, |c: u8| AutoscrollType::from_code(c).name()),
            EnumDomain::AutoscrollSpeed => {
                narrow(code, |c: u8| AutoscrollSpeed::from_code(c).name())
            }
            EnumDomain::BoundaryType => narrow(code, |c: u8| BoundaryType::from_code(c).name()),
            EnumDomain::Orientation => narrow(code, |c: u8| Orientation::from_code(c).name()),
            EnumDomain::LiquidMode => narrow(code, |c: u8| LiquidMode::from_code(c).name()),
            EnumDomain::LiquidSpeed => narrow(code, |c: u8| LiquidSpeed::from_code(c).name()),
            EnumDomain::ClearConditionCategory => {
                narrow(code, |c: u8| ClearConditionCategory::from_code(c).name())
            }
            EnumDomain::ClearCondition => ClearCondition(code).name(),
            EnumDomain::GameVersion => GameVersion::from_code(code).name(),
            EnumDomain::ObjectKind => narrow(code, |c: u16| ObjectKind::from_code(c).name()),
            EnumDomain::IcicleKind => narrow(code, |c: u8| IcicleKind::from_code(c).name()),
        }
    }

    /// Returns every mapped `(code, name)` pair of this domain, in code order.
    #[must_use]
    pub fn entries(self) -> Vec<(u32, &'static str)> {
        fn known<T: Copy>(table: &[T], entry: impl Fn(T) -> (u32, Name)) -> Vec<(u32, &'static str)> {
            table
                .iter()
                .map(|&value| entry(value))
                .filter_map(|(code, name)| name.known().map(|name| (code, name)))
                .collect()
        }

        let mut entries = match self {
            EnumDomain::Theme => known(Theme::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::GameStyle => known(GameStyle::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::AutoscrollType => {
                known(AutoscrollType::KNOWN, |v| (v.code().into(), v.name()))
            }
            EnumDomain::AutoscrollSpeed => {
                known(AutoscrollSpeed::KNOWN, |v| (v.code().into(), v.name()))
            }
            EnumDomain::BoundaryType => known(BoundaryType::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::Orientation => known(Orientation::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::LiquidMode => known(LiquidMode::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::LiquidSpeed => known(LiquidSpeed::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::ClearConditionCategory => {
                known(ClearConditionCategory::KNOWN, |v| (v.code().into(), v.name()))
            }
            EnumDomain::ClearCondition => ClearCondition::table().to_vec(),
            EnumDomain::GameVersion => known(GameVersion::KNOWN, |v| (v.code(), v.name())),
            EnumDomain::ObjectKind => known(ObjectKind::KNOWN, |v| (v.code().into(), v.name())),
            EnumDomain::IcicleKind => known(IcicleKind::KNOWN, |v| (v.code().into(), v.name())),
        };
        entries.sort_unstable_by_key(|&(code, _)| code);
        entries
    }

    /// Returns the kebab-case name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EnumDomain::Theme => "theme",
            EnumDomain::GameStyle => "game-style",
            EnumDomain::AutoscrollType => "autoscroll-type",
            EnumDomain::AutoscrollSpeed => "autoscroll-speed",
            EnumDomain::BoundaryType => "boundary-type",
            EnumDomain::Orientation => "orientation",
            EnumDomain::LiquidMode => "liquid-mode",
            EnumDomain::LiquidSpeed => "liquid-speed",
            EnumDomain::ClearConditionCategory => "clear-condition-category",
            EnumDomain::ClearCondition => "clear-condition",
            EnumDomain::GameVersion => "game-version",
            EnumDomain::ObjectKind => "object-kind",
            EnumDomain::IcicleKind => "icicle-kind",
        }
    }
}

impl fmt::Display for EnumDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnumDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnumDomain::ALL
            .into_iter()
            .find(|domain| domain.as_str() == s)
            .ok_or_else(|| format!("unknown enumeration domain '{s}'"))
    }
}
