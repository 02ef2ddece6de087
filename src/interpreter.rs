use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Write};
use std::mem;
use std::rc::Rc;

use log::{debug, info};

use crate::ast::{BinaryOp, Expr, ExprId, Ident, LiteralValue, LogicalOp, Stmt, UnaryOp};
use crate::callable::{LoxFunction, NativeFunction};
use crate::class::{LoxClass, LoxInstance};
use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::resolver::Locals;
use crate::value::Value;

/// How a statement finished.  `Return` unwinds through blocks and loops until
/// the enclosing function call consumes it.
#[derive(Debug)]
pub enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: Locals,
    out: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates a new Interpreter printing to stdout, with `clock` defined.
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// Creates a new Interpreter whose `print` statements write to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        info!("Initializing Interpreter");

        let globals = Rc::new(RefCell::new(Environment::new()));

        debug!("Defining native function 'clock'");

        globals
            .borrow_mut()
            .define("clock", Value::NativeFunction(Rc::new(NativeFunction::clock())));

        Self {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            out,
        }
    }

    /// The global frame; lives as long as the interpreter.
    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    /// Runs a resolved program.  A runtime error stops this program only; the
    /// interpreter stays usable for the next call.
    ///
    /// `locals` is merged into the session's distance table and never pruned:
    /// closures created by this program may be called from later ones.
    pub fn interpret(&mut self, statements: &[Stmt], locals: Locals) -> Result<()> {
        debug!("Interpreting {} statements", statements.len());

        self.locals.extend(locals);

        let result = statements
            .iter()
            .try_for_each(|stmt| self.execute(stmt).map(|_| ()));

        if let Err(e) = result {
            debug!("Runtime debug: {}", e);
            // The runtime error is the diagnostic; a failed flush must not replace it.
            if let Err(flush_error) = self.out.flush() {
                debug!("Flush after runtime error failed: {}", flush_error);
            }
            // Every swap restores on the way out; this only guards the invariant.
            self.environment = Rc::clone(&self.globals);
            return Err(e);
        }

        self.out.flush()?;

        info!("Interpretation completed successfully");
        Ok(())
    }

    /// Executes a single statement.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Flow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
                Ok(Flow::Normal)
            }

            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.out, "{}", value)?;
                debug!("Printed value: {}", value);
                Ok(Flow::Normal)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                self.environment.borrow_mut().define(&name.lexeme, value);
                Ok(Flow::Normal)
            }

            Stmt::Block(statements) => {
                let environment = Environment::with_enclosing(Rc::clone(&self.environment));
                self.execute_block(statements, Rc::new(RefCell::new(environment)))
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)
                } else if let Some(else_stmt) = else_branch {
                    self.execute(else_stmt)
                } else {
                    Ok(Flow::Normal)
                }
            }

            Stmt::While { condition, body } => {
                while self.evaluate(condition)?.is_truthy() {
                    if let Flow::Return(value) = self.execute(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Function(declaration) => {
                // Close over the scope active *now*.
                let function = LoxFunction::new(
                    Rc::clone(declaration),
                    Rc::clone(&self.environment),
                    false,
                );
                self.environment.borrow_mut().define(
                    &declaration.name.lexeme,
                    Value::Function(Rc::new(function)),
                );
                info!(
                    "Function '{}' defined with {} parameters",
                    declaration.name,
                    declaration.params.len()
                );
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };
                debug!("Returning value: {}", value);
                Ok(Flow::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => {
                self.environment
                    .borrow_mut()
                    .define(&name.lexeme, Value::Nil);

                let superclass = match superclass {
                    Some(variable) => match self.look_up_variable(variable.id, &variable.name)? {
                        Value::Class(class) => Some(class),
                        other => {
                            debug!("Superclass evaluated to a {}", other.type_name());
                            return Err(LoxError::runtime(
                                variable.name.line,
                                "Superclass must be a class.",
                            ));
                        }
                    },
                    None => None,
                };

                // Methods of a subclass close over a frame binding `super`.
                let enclosing = superclass.as_ref().map(|superclass| {
                    let mut frame = Environment::with_enclosing(Rc::clone(&self.environment));
                    frame.define("super", Value::Class(Rc::clone(superclass)));
                    mem::replace(&mut self.environment, Rc::new(RefCell::new(frame)))
                });

                let methods = methods
                    .iter()
                    .map(|method| {
                        let function = LoxFunction::new(
                            Rc::clone(method),
                            Rc::clone(&self.environment),
                            method.name.lexeme == "init",
                        );
                        (method.name.lexeme.clone(), Rc::new(function))
                    })
                    .collect();

                let class = LoxClass::new(name.lexeme.clone(), superclass, methods);

                if let Some(previous) = enclosing {
                    self.environment = previous;
                }

                self.environment
                    .borrow_mut()
                    .assign(name, Value::Class(Rc::new(class)))?;

                info!("Class '{}' defined", name);
                Ok(Flow::Normal)
            }
        }
    }

    /// Runs `statements` inside `environment`, restoring the previous frame on
    /// every exit path.
    pub fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow> {
        debug!("Entering block with {} statements", statements.len());

        let previous = mem::replace(&mut self.environment, environment);
        let result = self.execute_all(statements);
        self.environment = previous;

        result
    }

    fn execute_all(&mut self, statements: &[Stmt]) -> Result<Flow> {
        for stmt in statements {
            if let Flow::Return(value) = self.execute(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Evaluates an expression and returns a Value.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(literal) => Ok(match literal {
                LiteralValue::Number(n) => Value::Number(*n),
                LiteralValue::Str(s) => Value::from(s.as_str()),
                LiteralValue::True => Value::Bool(true),
                LiteralValue::False => Value::Bool(false),
                LiteralValue::Nil => Value::Nil,
            }),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Unary {
                operator,
                line,
                right,
            } => self.evaluate_unary(*operator, *line, right),

            Expr::Binary {
                left,
                operator,
                line,
                right,
            } => self.evaluate_binary(left, *operator, *line, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;

                let short_circuit = match operator {
                    LogicalOp::Or => left.is_truthy(),
                    LogicalOp::And => !left.is_truthy(),
                };

                if short_circuit {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }

            Expr::Variable(variable) => self.look_up_variable(variable.id, &variable.name),

            Expr::Assign { id, name, value } => {
                let value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => self.environment.borrow_mut().assign_at(
                        distance,
                        &name.lexeme,
                        value.clone(),
                    )?,
                    None => self.globals.borrow_mut().assign(name, value.clone())?,
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren_line,
                arguments,
            } => {
                let callee = self.evaluate(callee)?;

                let mut args = Vec::with_capacity(arguments.len());
                for arg in arguments {
                    args.push(self.evaluate(arg)?);
                }

                let Some(callable) = callee.as_callable() else {
                    return Err(LoxError::runtime(
                        *paren_line,
                        "Can only call functions and classes.",
                    ));
                };

                if args.len() != callable.arity() {
                    return Err(LoxError::runtime(
                        *paren_line,
                        format!(
                            "Expected {} arguments but got {}.",
                            callable.arity(),
                            args.len()
                        ),
                    ));
                }

                callable.call(self, args)
            }

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => LoxInstance::get(&instance, name),
                _ => Err(LoxError::runtime(
                    name.line,
                    "Only instances have properties.",
                )),
            },

            Expr::Set {
                object,
                name,
                value,
            } => {
                let Value::Instance(instance) = self.evaluate(object)? else {
                    return Err(LoxError::runtime(name.line, "Only instances have fields."));
                };

                let value = self.evaluate(value)?;
                instance.borrow_mut().set(name, value.clone());

                Ok(value)
            }

            Expr::This { id, keyword } => self.look_up_variable(*id, keyword),

            Expr::Super { id, keyword, method } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn evaluate_unary(&mut self, operator: UnaryOp, line: usize, right: &Expr) -> Result<Value> {
        let right = self.evaluate(right)?;

        match operator {
            UnaryOp::Negate => match right {
                Value::Number(n) => Ok(Value::Number(-n)),
                _ => Err(LoxError::runtime(line, "Operand must be a number.")),
            },
            UnaryOp::Not => Ok(Value::Bool(!right.is_truthy())),
        }
    }

    fn evaluate_binary(
        &mut self,
        left: &Expr,
        operator: BinaryOp,
        line: usize,
        right: &Expr,
    ) -> Result<Value> {
        let left = self.evaluate(left)?;
        let right = self.evaluate(right)?;

        debug!("Binary {:?}: {} and {}", operator, left, right);

        match operator {
            BinaryOp::Equal => Ok(Value::Bool(left == right)),
            BinaryOp::NotEqual => Ok(Value::Bool(left != right)),

            // No implicit coercion between numbers and strings.
            BinaryOp::Plus => match (&left, &right) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                (Value::String(a), Value::String(b)) => {
                    Ok(Value::String(format!("{}{}", a, b).into()))
                }
                _ => Err(LoxError::runtime(
                    line,
                    "Operands must be two numbers or two strings.",
                )),
            },

            BinaryOp::Minus => numbers(&left, &right, line).map(|(a, b)| Value::Number(a - b)),
            BinaryOp::Star => numbers(&left, &right, line).map(|(a, b)| Value::Number(a * b)),
            BinaryOp::Slash => numbers(&left, &right, line).map(|(a, b)| Value::Number(a / b)),
            BinaryOp::Greater => numbers(&left, &right, line).map(|(a, b)| Value::Bool(a > b)),
            BinaryOp::GreaterEqual => {
                numbers(&left, &right, line).map(|(a, b)| Value::Bool(a >= b))
            }
            BinaryOp::Less => numbers(&left, &right, line).map(|(a, b)| Value::Bool(a < b)),
            BinaryOp::LessEqual => numbers(&left, &right, line).map(|(a, b)| Value::Bool(a <= b)),
        }
    }

    /// `super.method`: the superclass lives in the frame the resolver pointed
    /// at, `this` in the frame just inside it.
    fn evaluate_super(&mut self, id: ExprId, keyword: &Ident, method: &Ident) -> Result<Value> {
        let distance = self.distance_of(id, keyword)?;

        let superclass = match self.environment.borrow().get_at(distance, "super")? {
            Value::Class(class) => class,
            other => {
                return Err(LoxError::Internal(format!(
                    "'super' is bound to a {}",
                    other.type_name()
                )))
            }
        };

        let this_distance = distance
            .checked_sub(1)
            .ok_or_else(|| LoxError::Internal("'super' resolved at distance 0".to_string()))?;

        let instance = match self.environment.borrow().get_at(this_distance, "this")? {
            Value::Instance(instance) => instance,
            other => {
                return Err(LoxError::Internal(format!(
                    "'this' is bound to a {}",
                    other.type_name()
                )))
            }
        };

        let method_fn = superclass.find_method(&method.lexeme).ok_or_else(|| {
            LoxError::runtime(
                method.line,
                format!("Undefined property '{}'.", method.lexeme),
            )
        })?;

        Ok(Value::Function(Rc::new(method_fn.bind(instance))))
    }

    fn look_up_variable(&self, id: ExprId, name: &Ident) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, &name.lexeme),
            None => self.globals.borrow().get(name),
        }
    }

    fn distance_of(&self, id: ExprId, name: &Ident) -> Result<usize> {
        self.locals.get(&id).copied().ok_or_else(|| {
            LoxError::Internal(format!(
                "'{}' on line {} was never resolved",
                name.lexeme, name.line
            ))
        })
    }
}

fn numbers(left: &Value, right: &Value, line: usize) -> Result<(f64, f64)> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok((*a, *b)),
        _ => Err(LoxError::runtime(line, "Operands must be numbers.")),
    }
}
