//! # Parameter Modes
//!
//! This module defines the three parameter modes an Intcode instruction may use for
//! each of its operands. The mode for a parameter is one decimal digit of the
//! instruction word: the hundreds digit for the first parameter, the thousands digit
//! for the second and the ten-thousands digit for the third.

/// Intcode parameter mode enumeration.
///
/// The mode determines how the machine turns the raw operand word that follows an
/// opcode into a value (for source operands) or an address (for destination operands).
///
/// | Mode | Source operand | Destination operand |
/// |------|----------------|---------------------|
/// | Position | `mem[raw]` | `raw` |
/// | Immediate | `raw` | `raw` |
/// | Relative | `mem[relative_base + raw]` | `relative_base + raw` |
///
/// Destinations are never truly immediate in well-formed programs, but the resolution
/// rule treats Position and Immediate identically for a destination slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterMode {
    /// The operand is an address; the value is read from memory.
    ///
    /// Example: `1,9,10,3` adds `mem[9]` and `mem[10]`.
    #[default]
    Position,

    /// The operand is the value itself.
    ///
    /// Example: `1101,9,10,3` adds the literals 9 and 10.
    Immediate,

    /// The operand is an offset from the relative base.
    ///
    /// Example: `204,-1` outputs `mem[relative_base - 1]`.
    Relative,
}

impl ParameterMode {
    /// Decodes a single mode digit.
    ///
    /// Returns `None` for any digit other than 0, 1 or 2.
    ///
    /// # Examples
    ///
    /// ```
    /// use intcode::ParameterMode;
    ///
    /// assert_eq!(ParameterMode::from_digit(0), Some(ParameterMode::Position));
    /// assert_eq!(ParameterMode::from_digit(2), Some(ParameterMode::Relative));
    /// assert_eq!(ParameterMode::from_digit(3), None);
    /// ```
    pub fn from_digit(digit: i64) -> Option<Self> {
        match digit {
            0 => Some(ParameterMode::Position),
            1 => Some(ParameterMode::Immediate),
            2 => Some(ParameterMode::Relative),
            _ => None,
        }
    }

    /// Returns the mode digit as it appears in an instruction word.
    pub fn digit(self) -> i64 {
        match self {
            ParameterMode::Position => 0,
            ParameterMode::Immediate => 1,
            ParameterMode::Relative => 2,
        }
    }
}
