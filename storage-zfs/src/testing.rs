// SPDX-License-Identifier: GPL-3.0-only

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::command::{ZfsRunner, render};
use crate::error::{Result, ZfsError};

#[derive(Debug)]
enum Reply {
    Ok(String),
    Fail(String),
}

/// Replays queued replies in order; an empty queue answers with empty stdout
#[derive(Debug, Default)]
pub(crate) struct ScriptedRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_ok(&self, stdout: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Ok(stdout.to_string()));
    }

    pub(crate) fn push_err(&self, stderr: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Reply::Fail(stderr.to_string()));
    }

    /// Rendered argument lists, without the binary name
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ZfsRunner for ScriptedRunner {
    fn run(&self, args: &[String]) -> Result<String> {
        let rendered = args.join(" ");
        self.calls.lock().unwrap().push(rendered);

        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Ok(stdout)) => Ok(stdout),
            Some(Reply::Fail(stderr)) => Err(ZfsError::CommandFailed {
                command: render("zfs", args),
                status: Some(1),
                stderr,
            }),
            None => Ok(String::new()),
        }
    }
}
