#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::LoxError;
use rox::lox::Lox;

/// In‑memory `print` sink that the test keeps a handle to.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session plus the handle to everything it prints.
pub fn session() -> (Lox, SharedOutput) {
    let output = SharedOutput::default();
    (Lox::with_output(Box::new(output.clone())), output)
}

/// Run `source` in a fresh session; returns printed output and the outcome.
pub fn run(source: &str) -> (String, Result<(), LoxError>) {
    let (mut lox, output) = session();
    let result = lox.run(source);
    (output.contents(), result)
}

/// Run `source`, which must succeed, and return what it printed.
pub fn run_ok(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(e) = result {
        panic!("program failed: {}\noutput so far:\n{}", e, output);
    }
    output
}

/// Messages of every static error produced by `source`.
pub fn static_errors(source: &str) -> Vec<String> {
    match run(source).1 {
        Err(LoxError::Static(errors)) => errors.iter().map(ToString::to_string).collect(),
        Err(other) => panic!("expected static errors, got: {}", other),
        Ok(()) => panic!("expected static errors, program ran"),
    }
}

/// The runtime error produced by `source`, with whatever it printed first.
pub fn runtime_error(source: &str) -> (String, String) {
    match run(source) {
        (output, Err(e @ LoxError::Runtime { .. })) => (output, e.to_string()),
        (_, Err(other)) => panic!("expected a runtime error, got: {}", other),
        (_, Ok(())) => panic!("expected a runtime error, program succeeded"),
    }
}
