//! In-memory [`CommandRunner`] that records invocations and replays scripted
//! responses. Used by unit and integration tests to drive the pipeline without
//! touching real repositories.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;

use super::{CommandOutput, CommandRunner, CommandSpec};
use crate::error::CommandError;

/// What a scripted rule answers with.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Output(CommandOutput),
    /// Simulate the program being impossible to start
    SpawnFailure,
}

impl From<CommandOutput> for ScriptedResponse {
    fn from(output: CommandOutput) -> Self {
        ScriptedResponse::Output(output)
    }
}

type Matcher = Box<dyn Fn(&CommandSpec) -> bool>;

struct Rule {
    matcher: Matcher,
    /// Consumed front to back; the last response repeats forever.
    responses: RefCell<VecDeque<ScriptedResponse>>,
}

impl Rule {
    fn next(&self) -> ScriptedResponse {
        let mut responses = self.responses.borrow_mut();
        if responses.len() > 1 {
            responses.pop_front().unwrap_or(ScriptedResponse::SpawnFailure)
        } else {
            responses
                .front()
                .cloned()
                .unwrap_or_else(|| CommandOutput::success("").into())
        }
    }
}

/// Records every command and answers from a list of rules. The first rule
/// whose matcher accepts the command wins; unmatched commands succeed with
/// empty output.
#[derive(Default)]
pub struct RecordingRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer commands accepted by `matcher` with `responses`, in order.
    pub fn on<F>(mut self, matcher: F, responses: Vec<ScriptedResponse>) -> Self
    where
        F: Fn(&CommandSpec) -> bool + 'static,
    {
        self.rules.push(Rule {
            matcher: Box::new(matcher),
            responses: RefCell::new(responses.into()),
        });
        self
    }

    /// Answer `program` invocations whose arguments start with `prefix`.
    pub fn on_args(self, program: &str, prefix: &[&str], responses: Vec<ScriptedResponse>) -> Self {
        let program = program.to_string();
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();
        self.on(
            move |spec| spec.program == program && spec.args.starts_with(&prefix),
            responses,
        )
    }

    /// Every command run so far, in order.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Commands whose arguments contain `needle` as a contiguous subsequence.
    pub fn calls_with(&self, needle: &[&str]) -> Vec<CommandSpec> {
        self.calls
            .borrow()
            .iter()
            .filter(|spec| {
                needle.is_empty()
                    || spec
                        .args
                        .windows(needle.len())
                        .any(|window| window.iter().zip(needle).all(|(a, b)| a == b))
            })
            .cloned()
            .collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.borrow_mut().push(spec.clone());

        let response = self
            .rules
            .iter()
            .find(|rule| (rule.matcher)(spec))
            .map(Rule::next)
            .unwrap_or_else(|| CommandOutput::success("").into());

        match response {
            ScriptedResponse::Output(output) => Ok(output),
            ScriptedResponse::SpawnFailure => Err(CommandError::Spawn {
                command_line: spec.command_line(),
                source: io::Error::new(io::ErrorKind::NotFound, "scripted spawn failure"),
            }),
        }
    }
}
