use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Peritoneum {
    P1 => "P1",
    P2 => "P2",
    P3 => "P3",
});

str_enum!(Ovary {
    O1 => "O1",
    O2 => "O2",
    O3 => "O3",
});

str_enum!(Tube {
    T1 => "T1",
    T2 => "T2",
    T3 => "T3",
});

str_enum!(DeepEndometriosis {
    A => "A",
    B => "B",
    C => "C",
});

/// Lesion size bucket, the Σ value attached to each axis on the form.
str_enum!(SizeBucket {
    Under3Cm => "<3cm",
    From3To7Cm => "3-7cm",
    Over7Cm => ">7cm",
});

// The highest grade of each axis is the "severe marker" that feeds the
// severity tier count (P3, O3, T3, C).

impl Peritoneum {
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::P3)
    }
}

impl Ovary {
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::O3)
    }
}

impl Tube {
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::T3)
    }
}

impl DeepEndometriosis {
    pub fn is_severe(&self) -> bool {
        matches!(self, Self::C)
    }
}
