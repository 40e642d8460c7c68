//! In-memory `Gateway` double for unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::gateway::{ApiRequest, Gateway, GatewayError, Method};

#[derive(Clone)]
enum Scripted {
    Data(Value),
    Failure { status: u16, mssg: String, err: String },
}

/// Records every request and answers from a script. Unscripted requests
/// succeed with `null`.
#[derive(Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<ApiRequest>>,
    script: Mutex<HashMap<(Method, String), Scripted>>,
    hanging: Mutex<HashSet<(Method, String)>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, data: Value) -> &Self {
        self.script
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Scripted::Data(data));
        self
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, err: &str) -> &Self {
        self.script.lock().unwrap().insert(
            (method, path.to_string()),
            Scripted::Failure {
                status,
                mssg: format!("Error on {path}"),
                err: err.to_string(),
            },
        );
        self
    }

    /// Requests to `path` never complete.
    pub fn hang(&self, method: Method, path: &str) -> &Self {
        self.hanging
            .lock()
            .unwrap()
            .insert((method, path.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }
}

#[async_trait]
impl Gateway for RecordingGateway {
    async fn send(&self, request: &ApiRequest) -> Result<Value, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());
        let key = (request.method, request.path.clone());
        let hangs = self.hanging.lock().unwrap().contains(&key);
        if hangs {
            futures::future::pending::<()>().await;
        }
        let scripted = self.script.lock().unwrap().get(&key).cloned();
        match scripted {
            Some(Scripted::Data(data)) => Ok(data),
            Some(Scripted::Failure { status, mssg, err }) => {
                Err(GatewayError::Api { status, mssg, err })
            }
            None => Ok(Value::Null),
        }
    }
}
