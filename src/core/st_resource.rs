use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A single-threaded, reference-counted resource with interior mutability.
///
/// The world and every chunk's buffer guard hold clones of the same
/// `StResource` pointing at the render backend, so a chunk can release its
/// GPU buffers from `Drop` without reaching back into the world.
///
/// `T` may be unsized, which allows a concrete backend to be shared as
/// `StResource<dyn RenderBackend>` while the caller keeps a typed handle.
///
/// # Examples
///
/// ```
/// use voxel_world::core::StResource;
///
/// let counter = StResource::new(0);
/// let alias = counter.clone();
///
/// *alias.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Panics
/// Borrowing follows `RefCell` rules: asking for `get_mut()` while any other
/// borrow of the same resource is alive panics.
pub struct StResource<T: ?Sized> {
    /// The shared cell. Prefer `get`/`get_mut` over borrowing it directly.
    pub resource: Rc<RefCell<T>>,
}

impl<T> StResource<T> {
    /// Wraps `resource` in a new shared container.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Rc::new(RefCell::new(resource)),
        }
    }
}

impl<T: ?Sized> StResource<T> {
    /// Builds a resource from an already shared cell.
    ///
    /// This is the coercion point for trait objects: an
    /// `Rc<RefCell<Concrete>>` passed here unsizes to `Rc<RefCell<dyn Trait>>`.
    pub fn from_rc(resource: Rc<RefCell<T>>) -> Self {
        Self { resource }
    }

    /// Immutable access to the contained value.
    pub fn get(&self) -> Ref<'_, T> {
        self.resource.borrow()
    }

    /// Mutable access to the contained value.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.resource.borrow_mut()
    }

    /// Mutable access that fails instead of panicking when already borrowed.
    pub fn try_get_mut(&self) -> Option<RefMut<'_, T>> {
        self.resource.try_borrow_mut().ok()
    }

    /// Number of live handles sharing this resource.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.resource)
    }
}

impl<T: ?Sized> Clone for StResource<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Named {
        fn name(&self) -> &str;
    }

    struct Stone;

    impl Named for Stone {
        fn name(&self) -> &str {
            "stone"
        }
    }

    #[test]
    fn clones_share_the_same_value() {
        let resource = StResource::new(vec![1, 2, 3]);
        let alias = resource.clone();
        alias.get_mut().push(4);

        assert_eq!(resource.get().len(), 4);
        assert_eq!(resource.handle_count(), 2);
    }

    #[test]
    fn concrete_resource_coerces_to_trait_object() {
        let typed = StResource::new(Stone);
        let erased = StResource::<dyn Named>::from_rc(typed.resource.clone());

        assert_eq!(erased.get().name(), "stone");
        assert_eq!(typed.handle_count(), 2);
    }

    #[test]
    fn try_get_mut_reports_conflicting_borrows() {
        let resource = StResource::new(1);
        let guard = resource.get();
        assert!(resource.try_get_mut().is_none());
        drop(guard);
        assert!(resource.try_get_mut().is_some());
    }
}
