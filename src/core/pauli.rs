// src/core/pauli.rs

use super::error::QcondError;
use nalgebra::DMatrix;
use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt;
use std::str::FromStr;

/// One of the four elementary 2x2 matrices operators are assembled from.
///
/// Every variant is Hermitian, so any tensor product of them is Hermitian too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pauli {
    /// Identity.
    I,
    /// Bit flip.
    X,
    /// Combined flip and phase.
    Y,
    /// Phase flip.
    Z,
}

impl Pauli {
    /// All four elementary matrices in tag order.
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    /// The 2x2 matrix in row-major form.
    pub fn matrix(self) -> [[Complex<f64>; 2]; 2] {
        let one = Complex::one();
        let zero = Complex::zero();
        let i = Complex::i();
        match self {
            Pauli::I => [[one, zero], [zero, one]],
            Pauli::X => [[zero, one], [one, zero]],
            Pauli::Y => [[zero, -i], [i, zero]],
            Pauli::Z => [[one, zero], [zero, -one]],
        }
    }

    /// The matrix as a dense `nalgebra` 2x2 block, ready for Kronecker products.
    pub fn dense(self) -> DMatrix<Complex<f64>> {
        let m = self.matrix();
        DMatrix::from_row_slice(2, 2, &[m[0][0], m[0][1], m[1][0], m[1][1]])
    }

    /// Single-letter tag (`I`, `X`, `Y`, `Z`).
    pub fn symbol(self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }

    /// Returns `true` for the identity.
    pub fn is_identity(self) -> bool {
        self == Pauli::I
    }
}

impl TryFrom<char> for Pauli {
    type Error = QcondError;

    fn try_from(tag: char) -> Result<Self, Self::Error> {
        match tag.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            _ => Err(QcondError::configuration(format!(
                "Unknown elementary matrix tag '{}' (expected one of I, X, Y, Z)",
                tag
            ))),
        }
    }
}

impl FromStr for Pauli {
    type Err = QcondError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(tag), None) => Pauli::try_from(tag),
            _ => Err(QcondError::configuration(format!(
                "Unknown elementary matrix tag '{}' (expected one of I, X, Y, Z)",
                trimmed
            ))),
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
