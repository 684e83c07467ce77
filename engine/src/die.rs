use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{EngineError, Result};

/// Immutable, non-empty sequence of faces. Equality is structural and
/// order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct Die {
    faces: Vec<i64>,
}

impl Die {
    pub fn new(faces: &[i64]) -> Result<Self> {
        if faces.is_empty() {
            return Err(EngineError::EmptyDie);
        }
        Ok(Self { faces: faces.to_vec() })
    }

    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always false; kept for the `len`/`is_empty` pair.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face at `index`. Panics when `index >= len()`.
    pub fn face(&self, index: usize) -> i64 {
        self.faces[index]
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    /// Largest value a throw on this die can draw, i.e. `len() - 1`.
    pub fn max_index(&self) -> i64 {
        debug_assert!(!self.faces.is_empty());
        self.faces.len() as i64 - 1
    }
}

impl TryFrom<Vec<i64>> for Die {
    type Error = EngineError;

    fn try_from(faces: Vec<i64>) -> Result<Self> {
        if faces.is_empty() {
            return Err(EngineError::EmptyDie);
        }
        Ok(Self { faces })
    }
}

impl From<Die> for Vec<i64> {
    fn from(die: Die) -> Self {
        die.faces
    }
}

/// Parses the `2,2,4,4,9,9` command-line form.
impl FromStr for Die {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EngineError::EmptyDie);
        }
        let faces = s
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| EngineError::InvalidFaces(s.to_string()))?;
        Die::try_from(faces)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, face) in self.faces.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", face)?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_die_is_rejected() {
        assert_eq!(Die::new(&[]), Err(EngineError::EmptyDie));
        assert_eq!("".parse::<Die>(), Err(EngineError::EmptyDie));
    }

    #[test]
    fn construction_copies_input() {
        let mut faces = vec![1, 2, 3];
        let die = Die::new(&faces).unwrap();
        faces[0] = 99;
        assert_eq!(die.face(0), 1);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = Die::new(&[1, 2, 3]).unwrap();
        let b = Die::new(&[1, 2, 3]).unwrap();
        let c = Die::new(&[3, 2, 1]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn parses_comma_separated_faces() {
        let die: Die = "2, 2,4,4,9,-9".parse().unwrap();
        assert_eq!(die.faces(), &[2, 2, 4, 4, 9, -9]);
        assert_eq!(die.len(), 6);
        assert_eq!(die.max_index(), 5);
        assert_eq!(die.to_string(), "[2,2,4,4,9,-9]");
    }

    #[test]
    fn rejects_non_numeric_faces() {
        assert!(matches!(
            "1,two,3".parse::<Die>(),
            Err(EngineError::InvalidFaces(_))
        ));
        assert!(matches!(
            "1,,3".parse::<Die>(),
            Err(EngineError::InvalidFaces(_))
        ));
    }

    #[test]
    fn single_face_die_is_valid() {
        let die = Die::new(&[5]).unwrap();
        assert_eq!(die.max_index(), 0);
        assert_eq!(die.face(0), 5);
    }

    #[test]
    fn deserialize_rejects_empty() {
        assert!(serde_json::from_str::<Die>("[]").is_err());
        let die: Die = serde_json::from_str("[1,6]").unwrap();
        assert_eq!(serde_json::to_string(&die).unwrap(), "[1,6]");
    }
}
