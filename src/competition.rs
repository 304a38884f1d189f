use crate::error::ValidationError;

/// The three club competitions this tool renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Competition {
    Ucl,
    Uel,
    Uecl,
}

impl Competition {
    pub fn from_code(code: &str) -> Result<Self, ValidationError> {
        match code {
            "ucl" => Ok(Competition::Ucl),
            "uel" => Ok(Competition::Uel),
            "uecl" => Ok(Competition::Uecl),
            other => Err(ValidationError::UnknownCompetition(other.to_string())),
        }
    }

    /// Lowercase code used in file names, data paths, and metadata.
    pub fn code(self) -> &'static str {
        match self {
            Competition::Ucl => "ucl",
            Competition::Uel => "uel",
            Competition::Uecl => "uecl",
        }
    }

    /// Uppercase short name used in the figure title.
    pub fn display_name(self) -> &'static str {
        match self {
            Competition::Ucl => "UCL",
            Competition::Uel => "UEL",
            Competition::Uecl => "UECL",
        }
    }

    /// Accent color anchoring the competition's color scale.
    pub fn accent(self) -> [u8; 3] {
        match self {
            Competition::Ucl => [0x00, 0x00, 0x4b],
            Competition::Uel => [0x99, 0x3f, 0x00],
            Competition::Uecl => [0x00, 0x58, 0x09],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trips() {
        for comp in [Competition::Ucl, Competition::Uel, Competition::Uecl] {
            assert_eq!(Competition::from_code(comp.code()).unwrap(), comp);
        }
    }

    #[test]
    fn unknown_code_fails_fast() {
        let err = Competition::from_code("epl").unwrap_err();
        assert!(matches!(err, ValidationError::UnknownCompetition(_)));
    }
}
