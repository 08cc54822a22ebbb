#![allow(dead_code)]

use async_trait::async_trait;
use dataproxy_link::{
    DataProxyClient, DataProxyError, EngineEvent, EventHandlers, EventKind, HttpMethod,
    HttpRequest, HttpResponse, HttpTransport, Result,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const SCHEMA: &str = r#"
generator client {
  provider = "prisma-client-js"
}

datasource db {
  provider = "postgresql"
  url      = "prisma://proxy.example/?api_key=TEST_KEY"
}

model User {
  id    Int    @id @default(autoincrement())
  email String @unique
}
"#;

pub const CLIENT_VERSION: &str = "4.16.2";

/// What the fake proxy answers to one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Status(u16, String),
    NetworkError,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::Status(200, body.to_string())
    }
}

/// In-memory proxy: graphql replies are taken from a script (then the
/// fallback), schema uploads always get `schema_status`.
pub struct ScriptedTransport {
    graphql: Mutex<VecDeque<Reply>>,
    graphql_fallback: Reply,
    schema_status: u16,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Reply>, fallback: Reply) -> Arc<Self> {
        Self::with_schema_status(script, fallback, 200)
    }

    pub fn with_schema_status(script: Vec<Reply>, fallback: Reply, schema_status: u16) -> Arc<Self> {
        Arc::new(Self {
            graphql: Mutex::new(script.into()),
            graphql_fallback: fallback,
            schema_status,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method = request.method;
        self.requests.lock().unwrap().push(request);

        let reply = match method {
            HttpMethod::Put => Reply::Status(self.schema_status, String::new()),
            HttpMethod::Post => self
                .graphql
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.graphql_fallback.clone()),
        };

        match reply {
            Reply::Status(status, body) => Ok(HttpResponse { status, body }),
            Reply::NetworkError => Err(DataProxyError::Network("connection reset".into())),
        }
    }
}

/// Collects every emitted event.
#[derive(Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl EventLog {
    pub fn handlers(&self) -> EventHandlers {
        let mut handlers = EventHandlers::new();
        for kind in [EventKind::Query, EventKind::Info, EventKind::Warn, EventKind::Error] {
            let sink = Arc::clone(&self.events);
            handlers = handlers.on(kind, move |event| sink.lock().unwrap().push(event.clone()));
        }
        handlers
    }

    pub fn of(&self, kind: EventKind) -> Vec<EngineEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    pub fn messages(&self, kind: EventKind) -> Vec<String> {
        self.of(kind).iter().map(|e| e.message().to_string()).collect()
    }
}

pub fn client_with(transport: Arc<ScriptedTransport>, log: &EventLog) -> DataProxyClient {
    DataProxyClient::builder()
        .schema_text(SCHEMA)
        .client_version(CLIENT_VERSION)
        .event_handlers(log.handlers())
        .transport(transport)
        .build()
        .expect("client should build")
}
