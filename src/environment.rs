use crate::ast::Ident;
use crate::error::{LoxError, Result};
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// One frame of the runtime scope chain.
///
/// Frames are shared (`Rc`) between every closure and active call that can
/// still reach them, and always link *outward* toward the globals, so the
/// chain is a tree and never a cycle.
#[derive(Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// A root frame (the globals).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Insert or overwrite `name` in *this* frame only.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {:?}", name, value);
        self.values.insert(name.to_string(), value);
    }

    /// Dynamic lookup: walk outward until a frame binds `name`.
    pub fn get(&self, name: &Ident) -> Result<Value> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Dynamic assignment: the nearest frame binding `name` is updated.
    pub fn assign(&mut self, name: &Ident, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined_variable(name))
        }
    }

    /// Read `name` from the frame exactly `distance` links out.
    pub fn get_at(&self, distance: usize, name: &str) -> Result<Value> {
        if distance == 0 {
            return self
                .values
                .get(name)
                .cloned()
                .ok_or_else(|| unresolved(name, distance));
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow().get_at(distance - 1, name),
            None => Err(unresolved(name, distance)),
        }
    }

    /// Write `name` in the frame exactly `distance` links out.
    pub fn assign_at(&mut self, distance: usize, name: &str, value: Value) -> Result<()> {
        if distance == 0 {
            return match self.values.get_mut(name) {
                Some(slot) => {
                    *slot = value;
                    Ok(())
                }
                None => Err(unresolved(name, distance)),
            };
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign_at(distance - 1, name, value),
            None => Err(unresolved(name, distance)),
        }
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();

        f.debug_struct("Environment")
            .field("names", &names)
            .field("has_enclosing", &self.enclosing.is_some())
            .finish()
    }
}

fn undefined_variable(name: &Ident) -> LoxError {
    LoxError::runtime(name.line, format!("Undefined variable '{}'.", name.lexeme))
}

fn unresolved(name: &str, distance: usize) -> LoxError {
    LoxError::Internal(format!(
        "'{}' is not bound {} frame(s) out from the current scope",
        name, distance
    ))
}
