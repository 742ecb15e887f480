use super::topology::ModelError;
use nalgebra::{Matrix3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellShape {
    Infinite,
    Orthorhombic,
    Triclinic,
}

/// A periodic unit cell described by its three lengths (in Å) and three
/// angles (in degrees).
///
/// A cell whose lengths are all zero is infinite, which is the default for
/// frames read from formats without cell information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    lengths: [f64; 3],
    angles: [f64; 3],
}

impl Default for UnitCell {
    fn default() -> Self {
        Self::infinite()
    }
}

impl UnitCell {
    pub fn infinite() -> Self {
        Self {
            lengths: [0.0; 3],
            angles: [90.0; 3],
        }
    }

    /// Creates a cell from lengths `[a, b, c]` and angles `[alpha, beta, gamma]`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidCell`] if a length is negative or not
    /// finite, or if an angle lies outside the open interval (0, 180).
    pub fn new(lengths: [f64; 3], angles: [f64; 3]) -> Result<Self, ModelError> {
        if let Some(length) = lengths.iter().find(|l| !l.is_finite() || **l < 0.0) {
            return Err(ModelError::InvalidCell(format!(
                "length {} must be finite and non-negative",
                length
            )));
        }
        if let Some(angle) = angles
            .iter()
            .find(|a| !a.is_finite() || **a <= 0.0 || **a >= 180.0)
        {
            return Err(ModelError::InvalidCell(format!(
                "angle {} must lie strictly between 0 and 180 degrees",
                angle
            )));
        }
        Ok(Self { lengths, angles })
    }

    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Result<Self, ModelError> {
        Self::new([a, b, c], [90.0; 3])
    }

    /// Builds a cell from a matrix whose columns are the lattice vectors.
    ///
    /// Angles between exactly perpendicular vectors are reported as exactly
    /// 90 degrees.
    pub fn from_matrix(matrix: &Matrix3<f64>) -> Result<Self, ModelError> {
        let a = matrix.column(0).into_owned();
        let b = matrix.column(1).into_owned();
        let c = matrix.column(2).into_owned();
        let lengths = [a.norm(), b.norm(), c.norm()];
        if lengths.iter().all(|l| *l == 0.0) {
            return Ok(Self::infinite());
        }
        let angles = [angle_between(&b, &c), angle_between(&a, &c), angle_between(&a, &b)];
        Self::new(lengths, angles)
    }

    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    pub fn angles(&self) -> [f64; 3] {
        self.angles
    }

    pub fn shape(&self) -> CellShape {
        if self.is_infinite() {
            CellShape::Infinite
        } else if self.angles.iter().all(|a| *a == 90.0) {
            CellShape::Orthorhombic
        } else {
            CellShape::Triclinic
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.lengths.iter().all(|l| *l == 0.0)
    }

    /// Lattice matrix with the vectors as columns, `a` along x and `b` in the
    /// xy plane.
    pub fn matrix(&self) -> Matrix3<f64> {
        let [a, b, c] = self.lengths;
        let [alpha, beta, gamma] = self.angles;
        let (cos_alpha, cos_beta, cos_gamma) = (cos_deg(alpha), cos_deg(beta), cos_deg(gamma));
        let sin_gamma = sin_deg(gamma);

        let cx = cos_beta;
        let cy = (cos_alpha - cos_beta * cos_gamma) / sin_gamma;
        let cz = (1.0 - cx * cx - cy * cy).max(0.0).sqrt();

        Matrix3::from_columns(&[
            Vector3::new(a, 0.0, 0.0),
            Vector3::new(b * cos_gamma, b * sin_gamma, 0.0),
            Vector3::new(c * cx, c * cy, c * cz),
        ])
    }

    pub fn volume(&self) -> f64 {
        self.matrix().determinant().abs()
    }
}

fn cos_deg(angle: f64) -> f64 {
    if angle == 90.0 { 0.0 } else { angle.to_radians().cos() }
}

fn sin_deg(angle: f64) -> f64 {
    if angle == 90.0 { 1.0 } else { angle.to_radians().sin() }
}

fn angle_between(u: &Vector3<f64>, v: &Vector3<f64>) -> f64 {
    let dot = u.dot(v);
    if dot == 0.0 {
        return 90.0;
    }
    let norms = u.norm() * v.norm();
    if norms == 0.0 {
        return 90.0;
    }
    (dot / norms).clamp(-1.0, 1.0).acos().to_degrees()
}
