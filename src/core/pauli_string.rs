// src/core/pauli_string.rs

use super::error::{QcondError, Result};
use super::pauli::Pauli;
use nalgebra::DMatrix;
use num_complex::Complex;
use num_traits::One;
use std::fmt;
use std::str::FromStr;

/// An ordered tensor product `P_0 ⊗ P_1 ⊗ … ⊗ P_{N-1}` of elementary matrices.
///
/// Position 0 is the left-most Kronecker factor, i.e. the most significant bit
/// of the `2^N` basis index. Strings made mostly of identities act as local
/// operators on the remaining positions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PauliString {
    factors: Vec<Pauli>,
}

impl PauliString {
    /// Creates a string from an explicit factor list.
    pub fn new(factors: Vec<Pauli>) -> Self {
        Self { factors }
    }

    /// The all-identity string on `num_qubits` positions.
    pub fn identity(num_qubits: usize) -> Self {
        Self { factors: vec![Pauli::I; num_qubits] }
    }

    /// Identity everywhere except the listed `(position, pauli)` sites.
    ///
    /// # Errors
    /// * `QcondError::Configuration` if a position is `>= num_qubits` or is
    ///   listed more than once.
    pub fn local(num_qubits: usize, sites: &[(usize, Pauli)]) -> Result<Self> {
        let mut factors = vec![Pauli::I; num_qubits];
        let mut seen = vec![false; num_qubits];
        for &(position, pauli) in sites {
            if position >= num_qubits {
                return Err(QcondError::configuration(format!(
                    "Site {} is out of range for a {}-qubit string",
                    position, num_qubits
                )));
            }
            if seen[position] {
                return Err(QcondError::configuration(format!(
                    "Site {} is listed more than once",
                    position
                )));
            }
            seen[position] = true;
            factors[position] = pauli;
        }
        Ok(Self { factors })
    }

    /// Parses a sequence of tags such as `["I", "Z", "I"]`.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Result<Self> {
        let factors = tags
            .iter()
            .map(|tag| tag.as_ref().parse::<Pauli>())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { factors })
    }

    /// The factors in Kronecker order.
    pub fn factors(&self) -> &[Pauli] {
        &self.factors
    }

    /// Number of factors (the qubit count this string acts on).
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    /// Returns `true` if the string has no factors.
    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    /// Number of non-identity factors.
    pub fn weight(&self) -> usize {
        self.factors.iter().filter(|p| !p.is_identity()).count()
    }

    /// Returns `true` if every factor is the identity.
    pub fn is_identity(&self) -> bool {
        self.weight() == 0
    }

    /// Dense `2^N x 2^N` matrix obtained by folding Kronecker products left to right.
    pub fn to_dense(&self) -> DMatrix<Complex<f64>> {
        self.factors
            .iter()
            .fold(DMatrix::from_element(1, 1, Complex::one()), |acc, p| acc.kronecker(&p.dense()))
    }
}

impl FromStr for PauliString {
    type Err = QcondError;

    /// Parses compact notation such as `"IZI"`. Whitespace is ignored.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let factors = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(Pauli::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { factors })
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.factors {
            write!(f, "{}", p)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    #[test]
    fn test_local_places_sites() -> Result<()> {
        let s = PauliString::local(4, &[(1, Pauli::X), (2, Pauli::X)])?;
        assert_eq!(s.to_string(), "IXXI");
        assert_eq!(s.weight(), 2);
        Ok(())
    }

    #[test]
    fn test_local_rejects_bad_sites() {
        assert!(matches!(
            PauliString::local(2, &[(2, Pauli::Z)]),
            Err(QcondError::Configuration { .. })
        ));
        assert!(matches!(
            PauliString::local(2, &[(0, Pauli::Z), (0, Pauli::X)]),
            Err(QcondError::Configuration { .. })
        ));
    }

    #[test]
    fn test_compact_and_tag_parsing_agree() -> Result<()> {
        let compact: PauliString = "iz i".parse()?;
        let tagged = PauliString::from_tags(&["I", "Z", "I"])?;
        assert_eq!(compact, tagged);
        assert!("IQI".parse::<PauliString>().is_err());
        Ok(())
    }

    #[test]
    fn test_dense_kronecker_order() -> Result<()> {
        // Z on the left-most position flips the sign of the upper half of the basis.
        let m = "ZI".parse::<PauliString>()?.to_dense();
        assert_eq!(m.nrows(), 4);
        let diag: Vec<f64> = (0..4).map(|k| m[(k, k)].re).collect();
        assert_eq!(diag, vec![1.0, 1.0, -1.0, -1.0]);

        // X on the right-most position swaps neighbouring basis states.
        let x = "IX".parse::<PauliString>()?.to_dense();
        assert_eq!(x[(0, 1)], Complex::one());
        assert_eq!(x[(1, 0)], Complex::one());
        assert_eq!(x[(0, 2)], Complex::zero());
        Ok(())
    }

    #[test]
    fn test_empty_string_is_scalar_one() {
        let m = PauliString::identity(0).to_dense();
        assert_eq!(m.shape(), (1, 1));
        assert_eq!(m[(0, 0)], Complex::one());
    }
}
