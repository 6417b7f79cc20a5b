//! Closed label sets used by the quiz. Each variant serializes to the exact
//! label the quiz app displays, and parsing a label outside the set fails.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Returned by `FromStr` when a label is not part of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label {0:?}")]
pub struct UnknownLabel(pub String);

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in bucket order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($label => Ok($name::$variant),)+
                    other => Err(UnknownLabel(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

label_enum! {
    /// Sung language of the piece.
    Language {
        Chinese => "中文",
        English => "英文",
        European => "歐洲",
        Other => "其他語言",
    }
}

label_enum! {
    Category {
        ClassicalSacred => "古典宗教作品",
        PopArrangement => "流行編曲",
        FolkTraditional => "民謠與傳統歌謠",
        ArtSongContemporary => "藝術歌曲或現代合唱作品",
        StageAndScreen => "音樂劇或動畫或電影配樂",
    }
}

label_enum! {
    Atmosphere {
        Gentle => "溫柔安靜或抒情",
        Lively => "熱鬧快樂或輕快",
        Solemn => "莊嚴神聖或神秘壯闊",
        Inventive => "創意或新體驗",
    }
}

label_enum! {
    /// Local language for Chinese-language pieces; `NotApplicable` otherwise.
    RegionalLanguage {
        Mandarin => "華語",
        Taiwanese => "台語",
        Hakka => "客語",
        NotApplicable => "無",
    }
}

label_enum! {
    /// Derived from the cleaned description. Order is significant: it is the
    /// bucket index.
    Polygon {
        Circle => "圓形",
        Triangle => "三角形",
        Diamond => "菱形",
        Rectangle => "長方形",
        Heptagram => "七角星",
        Cloud => "雲朵",
    }
}

label_enum! {
    /// Derived from the title. Order is significant: it is the bucket index.
    Sorcerer {
        MindReading => "讀心術",
        EmotionControl => "情緒操控術",
        Illusion => "幻術",
        MindShield => "心靈護盾",
    }
}
