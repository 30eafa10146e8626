#![warn(missing_docs)]
//! Annotation object without optical behavior.
use nalgebra::Point2;

use super::{ObjectType, SceneObject};
use crate::{error::RoResult, geometry::Segment};

/// A ruler used for annotating a scene. It does not interact with rays.
#[derive(Debug, Clone)]
pub struct Ruler {
    segment: Segment,
}
impl Ruler {
    /// Creates a new [`Ruler`] between the given points.
    ///
    /// # Errors
    ///
    /// This function will return an error if the points are not finite or coincide.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> RoResult<Self> {
        Ok(Self {
            segment: Segment::new(p1, p2)?,
        })
    }
    /// Returns the measured length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segment.length()
    }
}
impl SceneObject for Ruler {
    fn object_type(&self) -> ObjectType {
        ObjectType::Ruler
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn new() {
        let ruler = Ruler::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0)).unwrap();
        assert_eq!(ruler.length(), 5.0);
        assert!(ruler.as_optical().is_none());
        assert!(Ruler::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0)).is_err());
    }
}
