use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

use uuid::Uuid;

use crate::objects::{ObjectType, SceneObject};

/// Shared handle of an object placed in a [`Scene`](crate::scene::Scene).
///
/// The same object is referenced from the list of all objects and, if it is optical, from the
/// list of optical objects.
#[derive(Debug, Clone)]
pub struct ObjectRef {
    object: Rc<RefCell<dyn SceneObject>>,
    uuid: Uuid,
}

impl ObjectRef {
    /// Wraps a shared object. A random id is generated if `uuid` is `None`.
    pub fn new(object: Rc<RefCell<dyn SceneObject>>, uuid: Option<Uuid>) -> Self {
        Self {
            object,
            uuid: uuid.unwrap_or_else(Uuid::new_v4),
        }
    }
    /// Returns the id of the wrapped object.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }
    /// Returns the type of the wrapped object.
    #[must_use]
    pub fn object_type(&self) -> ObjectType {
        self.object.borrow().object_type()
    }
    /// Returns `true` if the wrapped object interacts with rays.
    #[must_use]
    pub fn is_optical(&self) -> bool {
        self.object.borrow().as_optical().is_some()
    }
    /// Returns `true` if `handle` points to the object wrapped by this [`ObjectRef`].
    #[must_use]
    pub fn shares_object<T: SceneObject>(&self, handle: &Rc<RefCell<T>>) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.object), Rc::as_ptr(handle))
    }
    /// Immutably borrows the wrapped object.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, dyn SceneObject> {
        self.object.borrow()
    }
    /// Mutably borrows the wrapped object.
    ///
    /// # Panics
    ///
    /// Panics if the object is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, dyn SceneObject> {
        self.object.borrow_mut()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::objects::Ruler;
    use nalgebra::Point2;
    #[test]
    fn new() {
        let ruler = Ruler::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap();
        let uuid = Uuid::new_v4();
        let object_ref = ObjectRef::new(Rc::new(RefCell::new(ruler)), Some(uuid));
        assert_eq!(object_ref.uuid(), uuid);
        assert_eq!(object_ref.object_type(), ObjectType::Ruler);
        assert!(!object_ref.is_optical());
    }
    #[test]
    fn clones_share_object() {
        let ruler = Ruler::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap();
        let object_ref = ObjectRef::new(Rc::new(RefCell::new(ruler)), None);
        let cloned = object_ref.clone();
        assert_eq!(object_ref.uuid(), cloned.uuid());
        assert!(Rc::ptr_eq(&object_ref.object, &cloned.object));
    }
    #[test]
    fn shares_object() {
        let ruler = Ruler::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)).unwrap();
        let handle = Rc::new(RefCell::new(ruler.clone()));
        let object_ref = ObjectRef::new(handle.clone(), None);
        assert!(object_ref.shares_object(&handle));
        assert!(!object_ref.shares_object(&Rc::new(RefCell::new(ruler))));
    }
}
