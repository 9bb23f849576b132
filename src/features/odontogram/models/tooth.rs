use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

const UPPER_RIGHT: [u8; 8] = [18, 17, 16, 15, 14, 13, 12, 11];
const UPPER_LEFT: [u8; 8] = [21, 22, 23, 24, 25, 26, 27, 28];
const LOWER_LEFT: [u8; 8] = [31, 32, 33, 34, 35, 36, 37, 38];
const LOWER_RIGHT: [u8; 8] = [41, 42, 43, 44, 45, 46, 47, 48];

/// Color of a tooth with no recorded condition
pub const BLANK_TOOTH_COLOR: &str = "#f8f9fa";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToothEditError {
    #[error("Invalid tooth number {0}: expected an adult FDI code (11-18, 21-28, 31-38, 41-48)")]
    InvalidToothNumber(i64),

    #[error("Unknown tooth condition '{0}'")]
    UnknownCondition(String),
}

/// Chart quadrant, in rendering order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::UpperRight,
        Quadrant::UpperLeft,
        Quadrant::LowerLeft,
        Quadrant::LowerRight,
    ];

    /// Tooth codes as drawn from left to right
    pub fn teeth(self) -> [ToothNumber; 8] {
        let codes = match self {
            Quadrant::UpperRight => UPPER_RIGHT,
            Quadrant::UpperLeft => UPPER_LEFT,
            Quadrant::LowerLeft => LOWER_LEFT,
            Quadrant::LowerRight => LOWER_RIGHT,
        };
        codes.map(ToothNumber)
    }

    pub fn name(self) -> &'static str {
        match self {
            Quadrant::UpperRight => "Superior Direito",
            Quadrant::UpperLeft => "Superior Esquerdo",
            Quadrant::LowerLeft => "Inferior Esquerdo",
            Quadrant::LowerRight => "Inferior Direito",
        }
    }
}

/// One of the 32 adult FDI tooth codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ToothNumber(u8);

impl ToothNumber {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn quadrant(self) -> Quadrant {
        match self.0 / 10 {
            1 => Quadrant::UpperRight,
            2 => Quadrant::UpperLeft,
            3 => Quadrant::LowerLeft,
            _ => Quadrant::LowerRight,
        }
    }
}

impl TryFrom<u8> for ToothNumber {
    type Error = ToothEditError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let valid = Quadrant::ALL
            .iter()
            .any(|q| q.teeth().iter().any(|t| t.0 == value));
        if valid {
            Ok(ToothNumber(value))
        } else {
            Err(ToothEditError::InvalidToothNumber(i64::from(value)))
        }
    }
}

impl TryFrom<i64> for ToothNumber {
    type Error = ToothEditError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ToothEditError::InvalidToothNumber(value))
            .and_then(ToothNumber::try_from)
    }
}

impl fmt::Display for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Condition vocabulary; declaration order is the display priority
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ToothCondition {
    Present,
    Absent,
    Decayed,
    Restored,
    Fractured,
    Prosthesis,
    Implant,
    RootCanalTreatment,
}

impl ToothCondition {
    pub const ALL: [ToothCondition; 8] = [
        ToothCondition::Present,
        ToothCondition::Absent,
        ToothCondition::Decayed,
        ToothCondition::Restored,
        ToothCondition::Fractured,
        ToothCondition::Prosthesis,
        ToothCondition::Implant,
        ToothCondition::RootCanalTreatment,
    ];

    /// API tag, as serialized
    pub fn tag(self) -> &'static str {
        match self {
            ToothCondition::Present => "present",
            ToothCondition::Absent => "absent",
            ToothCondition::Decayed => "decayed",
            ToothCondition::Restored => "restored",
            ToothCondition::Fractured => "fractured",
            ToothCondition::Prosthesis => "prosthesis",
            ToothCondition::Implant => "implant",
            ToothCondition::RootCanalTreatment => "root_canal_treatment",
        }
    }

    /// Tag stored by the case API
    pub fn wire_tag(self) -> &'static str {
        match self {
            ToothCondition::Present => "presente",
            ToothCondition::Absent => "ausente",
            ToothCondition::Decayed => "cariado",
            ToothCondition::Restored => "restaurado",
            ToothCondition::Fractured => "fraturado",
            ToothCondition::Prosthesis => "protese",
            ToothCondition::Implant => "implante",
            ToothCondition::RootCanalTreatment => "tratamento_endodontico",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ToothCondition::Present => "Presente",
            ToothCondition::Absent => "Ausente",
            ToothCondition::Decayed => "Cariado",
            ToothCondition::Restored => "Restaurado",
            ToothCondition::Fractured => "Fraturado",
            ToothCondition::Prosthesis => "Prótese",
            ToothCondition::Implant => "Implante",
            ToothCondition::RootCanalTreatment => "Tratamento Endodôntico",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ToothCondition::Present => "#27ae60",
            ToothCondition::Absent => "#e74c3c",
            ToothCondition::Decayed => "#e67e22",
            ToothCondition::Restored => "#3498db",
            ToothCondition::Fractured => "#9b59b6",
            ToothCondition::Prosthesis => "#f39c12",
            ToothCondition::Implant => "#1abc9c",
            ToothCondition::RootCanalTreatment => "#34495e",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, ToothEditError> {
        Self::ALL
            .into_iter()
            .find(|c| c.tag() == tag)
            .ok_or_else(|| ToothEditError::UnknownCondition(tag.to_string()))
    }

    pub fn from_wire_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.wire_tag() == tag)
    }
}
