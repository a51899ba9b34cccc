use serde::{Deserialize, Serialize};

/// One of the parallel realities a level can be viewed through. Each
/// dimension carries its own settings file and tile-set, both keyed by
/// [`Dimension::value`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    #[default]
    #[serde(rename = "dimension_one")]
    Parallel,
    #[serde(rename = "dimension_two")]
    Inverted,
}

impl Dimension {
    /// All dimensions in unlock order.
    pub const ALL: &'static [Dimension] = &[Dimension::Parallel, Dimension::Inverted];

    /// Content identifier used for settings files and tile-set asset keys.
    pub fn value(self) -> &'static str {
        match self {
            Self::Parallel => "dimension_one",
            Self::Inverted => "dimension_two",
        }
    }

    /// Title-cased form of [`Dimension::value`], shown to the player.
    pub fn label(self) -> &'static str {
        match self {
            Self::Parallel => "Dimension One",
            Self::Inverted => "Dimension Two",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.value() == value)
    }

    /// Cycle to the next dimension (wraps around).
    pub fn next(self) -> Self {
        match self {
            Self::Parallel => Self::Inverted,
            Self::Inverted => Self::Parallel,
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
