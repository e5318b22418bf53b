//! Target identity for cancellation lookups
//!
//! Timelines never touch their target directly (the binding closures do that).
//! The handler only needs to ask "is this animating that object?" and "is
//! this animating something of type `T`?", answered by pointer identity and
//! `TypeId`.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased, identity-compared reference to an animated object
#[derive(Clone)]
pub struct TargetHandle {
    inner: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl TargetHandle {
    pub fn new<T: Any + Send + Sync>(target: &Arc<T>) -> Self {
        Self {
            inner: target.clone(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Whether this handle points at the same allocation as `target`
    pub fn refers_to<T: ?Sized>(&self, target: &Arc<T>) -> bool {
        self.addr() == Arc::as_ptr(target).cast::<()>()
    }

    /// Whether the target's concrete type is `T`
    pub fn is<T: Any>(&self) -> bool {
        (*self.inner).is::<T>()
    }

    pub fn target_type_id(&self) -> TypeId {
        (*self.inner).type_id()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.inner).cast::<()>()
    }
}

impl<T: Any + Send + Sync> From<&Arc<T>> for TargetHandle {
    fn from(target: &Arc<T>) -> Self {
        Self::new(target)
    }
}

impl PartialEq for TargetHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for TargetHandle {}

impl fmt::Debug for TargetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TargetHandle({} @ {:p})", self.type_name, self.addr())
    }
}

/// Capability of timelines that know which object(s) they animate
pub trait TracksTarget {
    fn has_target(&self, target: &TargetHandle) -> bool;

    fn target_is_type(&self, type_id: TypeId) -> bool;
}

impl dyn TracksTarget + '_ {
    pub fn target_is<T: Any>(&self) -> bool {
        self.target_is_type(TypeId::of::<T>())
    }
}
