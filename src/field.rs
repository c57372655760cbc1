//! Magnetic field models.

pub mod dipole;

use crate::{
    geometry::{Point3, Vec3},
    tracing::ftr,
    units::NanoTesla,
};

/// Defines the properties of a magnetic field model.
///
/// A model is a pure function from a position in planetary radii to a
/// magnetic field vector with components in nanotesla. Models carry no
/// mutable state, so a single model can be evaluated from many threads.
pub trait MagneticFieldModel: Sync {
    /// Evaluates the magnetic field vector [nT] at the given position [planetary radii].
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr>;

    /// Evaluates the magnetic field strength at the given position.
    fn field_strength(&self, position: &Point3<ftr>) -> NanoTesla<ftr> {
        NanoTesla::new(self.field(position).length())
    }

    /// Creates a composite model whose field is the sum of the fields of this and
    /// the given model.
    fn summed_with<M>(self, other: M) -> SummedFieldModel<Self, M>
    where
        Self: Sized,
        M: MagneticFieldModel,
    {
        SummedFieldModel::new(self, other)
    }
}

impl<M: MagneticFieldModel + ?Sized> MagneticFieldModel for &M {
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr> {
        (**self).field(position)
    }
}

impl<M: MagneticFieldModel + ?Sized> MagneticFieldModel for Box<M> {
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr> {
        (**self).field(position)
    }
}

/// Dynamically dispatched magnetic field model.
pub type DynMagneticFieldModel = Box<dyn MagneticFieldModel + Send>;

/// A model whose field is the sum of the fields of two other models.
#[derive(Clone, Debug)]
pub struct SummedFieldModel<A, B> {
    first: A,
    second: B,
}

impl<A, B> SummedFieldModel<A, B>
where
    A: MagneticFieldModel,
    B: MagneticFieldModel,
{
    /// Creates a new summed model from the two given models.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> MagneticFieldModel for SummedFieldModel<A, B>
where
    A: MagneticFieldModel,
    B: MagneticFieldModel,
{
    fn field(&self, position: &Point3<ftr>) -> Vec3<ftr> {
        self.first.field(position) + self.second.field(position)
    }
}

/// A spatially uniform magnetic field.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformFieldModel {
    field: Vec3<ftr>,
}

impl UniformFieldModel {
    /// Creates a new uniform model with the given field vector [nT].
    pub fn new(field: Vec3<ftr>) -> Self {
        Self { field }
    }
}

impl MagneticFieldModel for UniformFieldModel {
    fn field(&self, _position: &Point3<ftr>) -> Vec3<ftr> {
        self.field
    }
}

#[cfg(test)]
mod tests {

    use super::dipole::DipoleFieldModel;
    use super::*;
    use crate::units::NanoTesla;

    #[test]
    fn summed_models_add_their_fields() {
        let dipole = DipoleFieldModel::new(NanoTesla::new(30000.0));
        let background = UniformFieldModel::new(Vec3::new(0.0, 0.0, -5.0));
        let position = Point3::new(3.0, 0.0, 1.0);

        let expected = dipole.field(&position) + background.field(&position);
        let summed = dipole.clone().summed_with(background);
        assert_eq!(summed.field(&position), expected);
    }

    #[test]
    fn boxed_and_borrowed_models_delegate() {
        let dipole = DipoleFieldModel::default();
        let position = Point3::new(2.0, 1.0, 0.5);
        let expected = dipole.field(&position);

        let boxed: DynMagneticFieldModel = Box::new(dipole.clone());
        assert_eq!(boxed.field(&position), expected);
        assert_eq!((&dipole).field(&position), expected);
        assert_eq!(
            boxed.field_strength(&position),
            NanoTesla::new(expected.length())
        );
    }
}
