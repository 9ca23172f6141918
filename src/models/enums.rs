use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Variants are declared in ascending order, so the derived `Ord` is the
/// domain ordering wherever one exists (severity, urgency).
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(EngineError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(
    /// Symptom severity, lowest first.
    Severity {
        None => "none",
        Mild => "mild",
        Moderate => "moderate",
        Severe => "severe",
        Critical => "critical",
    }
);

impl Severity {
    /// Ordinal rank: none=0 .. critical=4.
    pub fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Mild => 1,
            Self::Moderate => 2,
            Self::Severe => 3,
            Self::Critical => 4,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::None
    }
}

str_enum!(SymptomCategory {
    Pain => "pain",
    Bleeding => "bleeding",
    Mood => "mood",
    Digestive => "digestive",
    Other => "other",
});

str_enum!(
    /// What the user should do about a red flag, least urgent first.
    RecommendedAction {
        Monitor => "monitor",
        Consult => "consult",
        Urgent => "urgent",
        Emergency => "emergency",
    }
);

str_enum!(DisclaimerType {
    Medical => "medical",
    DataPrivacy => "data_privacy",
    AiLimitation => "ai_limitation",
    Emergency => "emergency",
});

str_enum!(UserAction {
    Acknowledged => "acknowledged",
    Dismissed => "dismissed",
    SoughtCare => "sought_care",
    EmergencyContacted => "emergency_contacted",
});

str_enum!(AiResponse {
    Appropriate => "appropriate",
    Inappropriate => "inappropriate",
    Missing => "missing",
});

str_enum!(PrivacyAction {
    DataEncrypted => "data_encrypted",
    DataShared => "data_shared",
    ConsentGranted => "consent_granted",
    ConsentRevoked => "consent_revoked",
    AuditAccessed => "audit_accessed",
});

str_enum!(DataSensitivity {
    Low => "low",
    Medium => "medium",
    High => "high",
    Phi => "phi",
});

str_enum!(EthicalMetricKind {
    BiasCheck => "bias_check",
    Transparency => "transparency",
    UserAutonomy => "user_autonomy",
    Fairness => "fairness",
});
