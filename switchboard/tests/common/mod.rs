#![allow(dead_code)]

use switchboard::{BoxError, Contract, Hooks, Operation, Strategy, UnsupportedOperation, Wrapper};

// ============================================================================
// Calculator: integer arithmetic
// ============================================================================

pub struct Calculator;

impl Contract for Calculator {
    const NAME: &'static str = "Calculator";
    const OPERATIONS: &'static [&'static str] = &["foo"];
    type Args = i64;
    type Output = i64;
}

/// `foo(x) = x + 1`
#[derive(Default)]
pub struct Increment;

impl Strategy<Calculator> for Increment {
    async fn call(&self, operation: &Operation, args: &i64) -> Result<i64, BoxError> {
        match operation.as_str() {
            "foo" => Ok(args + 1),
            _ => Err(UnsupportedOperation::new("Increment", operation).into()),
        }
    }
}

/// `foo(x) = x * 3`, `bar(x) = -x`
#[derive(Default)]
pub struct Triple;

impl Strategy<Calculator> for Triple {
    async fn call(&self, operation: &Operation, args: &i64) -> Result<i64, BoxError> {
        match operation.as_str() {
            "foo" => Ok(args * 3),
            "bar" => Ok(-args),
            _ => Err(UnsupportedOperation::new("Triple", operation).into()),
        }
    }
}

/// `before_foo(x) = x + 10`, `after_foo(x, ret) = ret * 2`
#[derive(Default)]
pub struct AddTenThenDouble;

impl Wrapper<Calculator> for AddTenThenDouble {
    fn hooks() -> Hooks {
        Hooks::new().around("foo")
    }

    async fn before(&self, _operation: &Operation, args: i64) -> Result<i64, BoxError> {
        Ok(args + 10)
    }

    async fn after(
        &self,
        _operation: &Operation,
        _args: &i64,
        output: i64,
    ) -> Result<i64, BoxError> {
        Ok(output * 2)
    }
}

// ============================================================================
// Trail: records the order in which the pipeline ran
// ============================================================================

pub struct Trail;

impl Contract for Trail {
    const NAME: &'static str = "Trail";
    const OPERATIONS: &'static [&'static str] = &["run", "plain"];
    type Args = Vec<String>;
    type Output = Vec<String>;
}

/// Appends `"strategy"` to the arguments it received.
#[derive(Default)]
pub struct Recorder;

impl Strategy<Trail> for Recorder {
    async fn call(
        &self,
        _operation: &Operation,
        args: &Vec<String>,
    ) -> Result<Vec<String>, BoxError> {
        let mut trail = args.clone();
        trail.push("strategy".to_string());
        Ok(trail)
    }
}

/// Hooks both phases of `run`; the after-hook notes how many entries the
/// arguments carried.
#[derive(Default)]
pub struct First;

impl Wrapper<Trail> for First {
    fn hooks() -> Hooks {
        Hooks::new().around("run")
    }

    async fn before(
        &self,
        _operation: &Operation,
        mut args: Vec<String>,
    ) -> Result<Vec<String>, BoxError> {
        args.push("first.before".to_string());
        Ok(args)
    }

    async fn after(
        &self,
        _operation: &Operation,
        args: &Vec<String>,
        mut output: Vec<String>,
    ) -> Result<Vec<String>, BoxError> {
        output.push(format!("first.after:{}", args.len()));
        Ok(output)
    }
}

#[derive(Default)]
pub struct Second;

impl Wrapper<Trail> for Second {
    fn hooks() -> Hooks {
        Hooks::new().around("run")
    }

    async fn before(
        &self,
        _operation: &Operation,
        mut args: Vec<String>,
    ) -> Result<Vec<String>, BoxError> {
        args.push("second.before".to_string());
        Ok(args)
    }

    async fn after(
        &self,
        _operation: &Operation,
        args: &Vec<String>,
        mut output: Vec<String>,
    ) -> Result<Vec<String>, BoxError> {
        output.push(format!("second.after:{}", args.len()));
        Ok(output)
    }
}

/// Only a before-hook, only for `run`.
#[derive(Default)]
pub struct BeforeOnly;

impl Wrapper<Trail> for BeforeOnly {
    fn hooks() -> Hooks {
        Hooks::new().before("run")
    }

    async fn before(
        &self,
        _operation: &Operation,
        mut args: Vec<String>,
    ) -> Result<Vec<String>, BoxError> {
        args.push("before_only.before".to_string());
        Ok(args)
    }
}

pub fn input() -> Vec<String> {
    vec!["input".to_string()]
}
