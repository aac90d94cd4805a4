//! Shared test doubles: a scripted transport and a scripted prompt.
#![allow(dead_code)] // not every test binary uses every double

use partyshell_core::{MessageHandler, Plugin, PromptError, Transport, UserPrompt};
use partyshell_rpc::RpcError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Transport that replays a scripted sequence of responses and records
/// every call it receives.
pub struct MockTransport {
    responses: RefCell<VecDeque<Result<Value, RpcError>>>,
    calls: Rc<RefCell<Vec<(String, Value)>>>,
}

impl MockTransport {
    pub fn new(script: Vec<Result<Value, RpcError>>) -> Self {
        Self {
            responses: RefCell::new(script.into()),
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Handle onto the recorded `(method, params)` log; stays valid after
    /// the transport moves into a gateway.
    pub fn call_log(&self) -> Rc<RefCell<Vec<(String, Value)>>> {
        Rc::clone(&self.calls)
    }
}

impl Transport for MockTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.calls.borrow_mut().push((method.to_string(), params));
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::NoResult(method.to_string())))
    }
}

/// Prompt that replays scripted answers and records alerts.
pub struct ScriptedPrompt {
    inputs: RefCell<VecDeque<String>>,
    secrets: RefCell<VecDeque<String>>,
    alerts: Rc<RefCell<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn new(inputs: Vec<&str>, secrets: Vec<&str>) -> Self {
        Self {
            inputs: RefCell::new(inputs.into_iter().map(String::from).collect()),
            secrets: RefCell::new(secrets.into_iter().map(String::from).collect()),
            alerts: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn alert_log(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.alerts)
    }
}

impl UserPrompt for ScriptedPrompt {
    fn input(&self, _message: &str) -> Result<String, PromptError> {
        self.inputs
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| PromptError::Unavailable("no scripted input".into()))
    }

    fn secret(&self, _message: &str) -> Result<String, PromptError> {
        self.secrets
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| PromptError::Unavailable("no scripted secret".into()))
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_string());
    }
}

/// Plugin that records every notification it receives.
pub struct RecordingPlugin {
    handler: RecordingHandler,
}

pub struct RecordingHandler {
    events: Rc<RefCell<Vec<(String, Value)>>>,
}

impl RecordingPlugin {
    pub fn new(events: Rc<RefCell<Vec<(String, Value)>>>) -> Self {
        Self {
            handler: RecordingHandler { events },
        }
    }
}

impl MessageHandler for RecordingHandler {
    fn on_message(&mut self, name: &str, data: &Value) {
        self.events
            .borrow_mut()
            .push((name.to_string(), data.clone()));
    }
}

impl Plugin for RecordingPlugin {
    fn name(&self) -> &str {
        "recorder"
    }

    fn message_handler(&mut self) -> Option<&mut dyn MessageHandler> {
        Some(&mut self.handler)
    }
}

/// Plugin with no message-handling entry point.
pub struct SilentPlugin;

impl Plugin for SilentPlugin {
    fn name(&self) -> &str {
        "silent"
    }
}
