use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::prelude::Value;

/// A lexical scope. Closures share their defining scope through the
/// reference counted handle, so a scope may outlive the block that
/// created it. A function value stored in the environment it captures
/// forms a reference cycle; scopes are small and interpreter runs are
/// short, so the cycle is accepted rather than broken with weak links.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Value>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
            outer: None
        }
    }

    /// A child scope with `outer` as its enclosing scope.
    pub fn enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer)
        }
    }

    /// Looks `name` up through the scope chain, innermost first.
    pub fn get(&self, name: &str) -> Option<Value> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => match &self.outer {
                Some(outer) => outer.borrow().get(name),
                None => None
            }
        }
    }

    /// Binds `name` in this scope, shadowing any outer binding.
    pub fn set(&mut self, name: String, value: Value) {
        self.store.insert(name, value);
    }

    /// Mutates the nearest existing binding of `name`. Returns false when no
    /// scope in the chain defines it.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.store.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            },
            None => match &self.outer {
                Some(outer) => outer.borrow_mut().assign(name, value),
                None => false
            }
        }
    }
}
