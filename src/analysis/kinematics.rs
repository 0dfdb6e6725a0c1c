use std::iter::Sum;
use std::ops::Add;

use serde::Serialize;

use crate::data::model::Jet;

/// Four-momentum `(px, py, pz, e)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FourMomentum {
    pub px: f64,
    pub py: f64,
    pub pz: f64,
    pub e: f64,
}

impl FourMomentum {
    pub fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// Transverse momentum `sqrt(px² + py²)`.
    pub fn pt(&self) -> f64 {
        (self.px * self.px + self.py * self.py).sqrt()
    }

    /// Magnitude of the three-momentum.
    pub fn p(&self) -> f64 {
        (self.px * self.px + self.py * self.py + self.pz * self.pz).sqrt()
    }

    /// Signed invariant mass.
    ///
    /// With `v = e² - |p|²` this is `sign(v) * sqrt(|v|)`: a space-like
    /// momentum gives a negative mass instead of NaN.
    pub fn mass(&self) -> f64 {
        let mag = self.p();
        let v = self.e * self.e - mag * mag;
        v.abs().sqrt().copysign(v)
    }
}

impl From<&Jet> for FourMomentum {
    fn from(jet: &Jet) -> Self {
        Self::new(jet.px, jet.py, jet.pz, jet.e)
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: FourMomentum) -> FourMomentum {
        FourMomentum {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = FourMomentum>>(iter: I) -> Self {
        iter.fold(FourMomentum::default(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn transverse_momentum() {
        assert!((FourMomentum::new(3.0, 4.0, 100.0, 200.0).pt() - 5.0).abs() < EPS);
    }

    #[test]
    fn time_like_mass_is_positive() {
        // |p| = 5, e = 13 → m = 12
        let p = FourMomentum::new(3.0, 0.0, 4.0, 13.0);
        assert!((p.mass() - 12.0).abs() < EPS);
    }

    #[test]
    fn space_like_mass_is_negative() {
        let jet = Jet {
            pt: 10.0,
            btag: 0.0,
            px: 10.0,
            py: 0.0,
            pz: 0.0,
            e: 9.0,
        };
        let total: FourMomentum = [jet; 3].iter().map(FourMomentum::from).sum();
        assert_eq!(total, FourMomentum::new(30.0, 0.0, 0.0, 27.0));

        let expected = -(171.0_f64).sqrt();
        assert!((total.mass() - expected).abs() < EPS);
        assert!((total.mass() + 13.0767).abs() < 1e-4);
    }

    #[test]
    fn light_like_mass_is_zero() {
        assert_eq!(FourMomentum::new(0.0, 0.0, 5.0, 5.0).mass(), 0.0);
    }

    #[test]
    fn addition_is_componentwise() {
        let a = FourMomentum::new(1.0, 2.0, 3.0, 4.0);
        let b = FourMomentum::new(-1.0, 0.5, 10.0, 1.0);
        assert_eq!(a + b, FourMomentum::new(0.0, 2.5, 13.0, 5.0));
    }
}
