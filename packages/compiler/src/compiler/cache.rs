//! Compiler Cache
//!
//! Completed component and host proto views, keyed by component type.

use super::directive_binding::Type;
use super::view::AppProtoView;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct CompilerCache {
    cache: RefCell<HashMap<Type, Rc<AppProtoView>>>,
    host_cache: RefCell<HashMap<Type, Rc<AppProtoView>>>,
}

impl CompilerCache {
    pub fn new() -> Self {
        CompilerCache::default()
    }

    pub fn get(&self, component: &Type) -> Option<Rc<AppProtoView>> {
        self.cache.borrow().get(component).cloned()
    }

    pub fn set(&self, component: Type, proto_view: Rc<AppProtoView>) {
        self.cache.borrow_mut().insert(component, proto_view);
    }

    pub fn get_host(&self, component: &Type) -> Option<Rc<AppProtoView>> {
        self.host_cache.borrow().get(component).cloned()
    }

    pub fn set_host(&self, component: Type, proto_view: Rc<AppProtoView>) {
        self.host_cache.borrow_mut().insert(component, proto_view);
    }

    pub fn invalidate(&self, component: &Type) {
        self.cache.borrow_mut().remove(component);
    }

    pub fn invalidate_host(&self, component: &Type) {
        self.host_cache.borrow_mut().remove(component);
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
        self.host_cache.borrow_mut().clear();
    }
}
