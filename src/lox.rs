//! Session driver: source text → tokens → syntax tree → resolution → execution.
//!
//! A [`Lox`] owns one interpreter, so globals defined by one [`Lox::run`] call
//! are visible to the next (this is what the REPL relies on).  Diagnostics
//! come back in two shapes:
//!
//! * [`LoxError::Static`]: every lexical, syntax and resolution error of the
//!   program.  Nothing was executed.
//! * any other variant: the first runtime failure.  Output printed before the
//!   failure stays printed; the session remains usable.

use std::io::Write;

use log::{debug, info};

use crate::error::{LoxError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;

pub struct Lox {
    interpreter: Interpreter,
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}

impl Lox {
    /// A session printing to stdout.
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn run(&mut self, source: &str) -> Result<()> {
        info!("Running {} byte(s) of source", source.len());

        let (tokens, mut errors) = Scanner::new(source).scan_all();

        let statements = match Parser::new(&tokens).parse() {
            Ok(statements) => statements,
            Err(parse_errors) => {
                errors.extend(parse_errors);
                Vec::new()
            }
        };

        if !errors.is_empty() {
            debug!("Front end reported {} error(s)", errors.len());
            return Err(LoxError::Static(errors));
        }

        let locals = Resolver::new()
            .resolve(&statements)
            .map_err(LoxError::Static)?;

        self.interpreter.interpret(&statements, locals)
    }
}
