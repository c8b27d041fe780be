use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a dragged block or page lands relative to its drop target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropPosition {
    Before,
    After,
    Inside,
}

impl DropPosition {
    /// Map a pointer offset inside a target of height `height`: top quarter
    /// is `Before`, bottom quarter is `After`, the middle is `Inside`
    pub fn from_offset(y: f32, height: f32) -> Self {
        if y < height * 0.25 {
            DropPosition::Before
        } else if y > height * 0.75 {
            DropPosition::After
        } else {
            DropPosition::Inside
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DropPosition::Before => "before",
            DropPosition::After => "after",
            DropPosition::Inside => "inside",
        }
    }
}

impl fmt::Display for DropPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DropPosition {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "before" => Ok(DropPosition::Before),
            "after" => Ok(DropPosition::After),
            "inside" => Ok(DropPosition::Inside),
            _ => Err(ModelError::UnknownPosition(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_offset_thresholds() {
        assert_eq!(DropPosition::from_offset(5.0, 100.0), DropPosition::Before);
        assert_eq!(DropPosition::from_offset(50.0, 100.0), DropPosition::Inside);
        assert_eq!(DropPosition::from_offset(75.0, 100.0), DropPosition::Inside);
        assert_eq!(DropPosition::from_offset(90.0, 100.0), DropPosition::After);
    }

    #[test]
    fn test_parse() {
        assert_eq!("Inside".parse::<DropPosition>().unwrap(), DropPosition::Inside);
        assert!("above".parse::<DropPosition>().is_err());
    }
}
