//! Scripted executor for tests.
//!
//! Expectations are consumed strictly in order. An unexpected or mismatched
//! command panics, so a test can never pass by accident against the wrong argv.

use super::command::{interrupted, CommandExecutor, CommandOutput, Invocation};
use crate::context::ExecContext;
use crate::error::Result;
use async_trait::async_trait;
use regex::Regex;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One expected command and the response to replay for it
#[derive(Debug, Clone)]
pub struct MockCommand {
    /// Full argv including the program name
    pub args: Vec<String>,
    /// When set, matched against the space-joined argv instead of comparing `args`
    pub args_re: Option<Regex>,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl MockCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            args: args.into_iter().map(|s| s.as_ref().to_string()).collect(),
            args_re: None,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    /// Match the argv with a regex, for arguments that are not known up front (temp file paths)
    ///
    /// # Panics
    /// Panics if `pattern` is not a valid regex.
    pub fn args_matching(mut self, pattern: &str) -> Self {
        self.args_re = Some(Regex::new(pattern).expect("invalid mock args regex"));
        self
    }

    pub fn stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }

    pub fn stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    pub fn exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    fn matches(&self, argv: &[&str]) -> bool {
        match &self.args_re {
            Some(re) => re.is_match(&argv.join(" ")),
            None => self.args == argv,
        }
    }
}

/// Mock command executor for testing
#[derive(Debug, Default)]
pub struct MockCommandExecutor {
    expectations: Mutex<VecDeque<MockCommand>>,
    calls: Mutex<Vec<Invocation>>,
}

impl MockCommandExecutor {
    pub fn new(expectations: Vec<MockCommand>) -> Self {
        Self {
            expectations: Mutex::new(expectations.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, expectation: MockCommand) {
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Every invocation received so far, in order, including ones refused by a done context
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn remaining(&self) -> usize {
        self.expectations.lock().unwrap().len()
    }

    /// # Panics
    /// Panics if any expectation was never consumed.
    pub fn assert_all_consumed(&self) {
        let expectations = self.expectations.lock().unwrap();
        assert!(
            expectations.is_empty(),
            "{} mock command(s) were never run: {:?}",
            expectations.len(),
            expectations.iter().map(|e| e.args.join(" ")).collect::<Vec<_>>()
        );
    }
}

#[async_trait]
impl CommandExecutor for MockCommandExecutor {
    async fn run(&self, ctx: &ExecContext, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        if let Some(reason) = ctx.interruption() {
            return Err(interrupted(reason, invocation.command_line()));
        }

        let argv = invocation.argv();
        let next = self.expectations.lock().unwrap().pop_front();
        let Some(expectation) = next else {
            panic!("unexpected command, no expectations left: {:?}", argv);
        };

        if !expectation.matches(&argv) {
            match &expectation.args_re {
                Some(re) => panic!(
                    "unexpected command: got {:?}, want argv matching /{}/",
                    argv.join(" "),
                    re
                ),
                None => panic!(
                    "unexpected command: got {:?}, want {:?}",
                    argv, expectation.args
                ),
            }
        }

        Ok(CommandOutput {
            stdout: expectation.stdout,
            stderr: expectation.stderr,
            exit_code: Some(expectation.exit_code),
        })
    }
}
