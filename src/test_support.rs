//! Test doubles: fake service and capabilities, loopback HTTP stub.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Notify, mpsc};

use crate::extract::Identifier;
use crate::lookup::{LookupError, MetadataService, ResolvedContent};
use crate::notify::{NotificationEvent, Notifier};
use crate::resolver::{
    Availability, CapabilityError, CapabilitySet, ClipboardProvider, NavigationProvider,
    SaveProvider, ShareProvider, ShareRequest,
};
use crate::session::{ActionSettings, Controller, SessionHandle};

pub fn content(name: &str) -> ResolvedContent {
    ResolvedContent {
        content_url: format!("https://cdn/{name}.pdf"),
        preview_url: format!("https://cdn/{name}.jpg"),
    }
}

// -- Metadata service --

#[derive(Default)]
pub struct FakeService {
    responses: Mutex<HashMap<String, Result<ResolvedContent, LookupError>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    panics: Mutex<Vec<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn respond(&self, id: &str, outcome: Result<ResolvedContent, LookupError>) {
        self.responses.lock().unwrap().insert(id.to_string(), outcome);
    }

    /// Hold lookups for `id` until the returned gate is notified.
    pub fn gate(&self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(id.to_string(), Arc::clone(&gate));
        gate
    }

    pub fn panic_on(&self, id: &str) {
        self.panics.lock().unwrap().push(id.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MetadataService for FakeService {
    fn lookup<'a>(
        &'a self,
        identifier: &'a Identifier,
    ) -> BoxFuture<'a, Result<ResolvedContent, LookupError>> {
        Box::pin(async move {
            let id = identifier.as_str().to_string();
            self.calls.lock().unwrap().push(id.clone());

            let gate = self.gates.lock().unwrap().get(&id).cloned();
            if let Some(gate) = gate {
                gate.notified().await;
            }

            // Release the lock before panicking so it is not poisoned.
            let should_panic = self.panics.lock().unwrap().contains(&id);
            if should_panic {
                panic!("fake service told to panic for {id}");
            }

            self.responses
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .unwrap_or(Err(LookupError::Status(404)))
        })
    }
}

// -- Capabilities --

#[derive(Default)]
pub struct FakeClipboard {
    writes: Mutex<Vec<String>>,
    failure: Mutex<Option<String>>,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl FakeClipboard {
    /// Hold writes until the returned gate is notified.
    pub fn gate(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl ClipboardProvider for FakeClipboard {
    fn write<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), CapabilityError>> {
        Box::pin(async move {
            let gate = self.gate.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            if let Some(reason) = self.failure.lock().unwrap().clone() {
                return Err(CapabilityError::Clipboard(reason));
            }
            self.writes.lock().unwrap().push(text.to_string());
            Ok(())
        })
    }
}

pub struct FakeShare {
    availability: Mutex<Availability>,
    requests: Mutex<Vec<ShareRequest>>,
    failure: Mutex<Option<String>>,
}

impl Default for FakeShare {
    fn default() -> Self {
        Self {
            availability: Mutex::new(Availability::Unavailable),
            requests: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }
}

impl FakeShare {
    pub fn set_availability(&self, availability: Availability) {
        *self.availability.lock().unwrap() = availability;
    }

    pub fn fail_with(&self, reason: &str) {
        *self.failure.lock().unwrap() = Some(reason.to_string());
    }

    pub fn requests(&self) -> Vec<ShareRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ShareProvider for FakeShare {
    fn availability(&self) -> Availability {
        *self.availability.lock().unwrap()
    }

    fn share<'a>(
        &'a self,
        request: &'a ShareRequest,
    ) -> BoxFuture<'a, Result<(), CapabilityError>> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request.clone());
            match self.failure.lock().unwrap().clone() {
                Some(reason) => Err(CapabilityError::Share(reason)),
                None => Ok(()),
            }
        })
    }
}

#[derive(Default)]
pub struct FakeNavigator {
    opened: Mutex<Vec<String>>,
}

impl FakeNavigator {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl NavigationProvider for FakeNavigator {
    fn open(&self, url: &str) -> Result<(), CapabilityError> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSaver {
    saves: Mutex<Vec<(String, String)>>,
}

impl FakeSaver {
    /// `(url, suggested_filename)` pairs in call order.
    pub fn saves(&self) -> Vec<(String, String)> {
        self.saves.lock().unwrap().clone()
    }
}

impl SaveProvider for FakeSaver {
    fn save<'a>(
        &'a self,
        url: &'a str,
        suggested_filename: &'a str,
    ) -> BoxFuture<'a, Result<PathBuf, CapabilityError>> {
        Box::pin(async move {
            self.saves
                .lock()
                .unwrap()
                .push((url.to_string(), suggested_filename.to_string()));
            Ok(PathBuf::from(suggested_filename))
        })
    }
}

/// One fake of everything, shared with the controller under test.
pub struct Fakes {
    pub service: Arc<FakeService>,
    pub clipboard: Arc<FakeClipboard>,
    pub share: Arc<FakeShare>,
    pub navigator: Arc<FakeNavigator>,
    pub saver: Arc<FakeSaver>,
}

impl Fakes {
    pub fn new() -> Self {
        Self {
            service: Arc::new(FakeService::default()),
            clipboard: Arc::new(FakeClipboard::default()),
            share: Arc::new(FakeShare::default()),
            navigator: Arc::new(FakeNavigator::default()),
            saver: Arc::new(FakeSaver::default()),
        }
    }

    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet {
            clipboard: self.clipboard.clone(),
            share: self.share.clone(),
            navigator: self.navigator.clone(),
            saver: self.saver.clone(),
        }
    }

    /// Start a controller wired to these fakes.
    pub fn spawn(&self) -> (SessionHandle, mpsc::UnboundedReceiver<NotificationEvent>) {
        let (notifier, rx) = Notifier::channel();
        let controller = Controller::new(
            self.service.clone(),
            self.capabilities(),
            notifier,
            ActionSettings {
                share_title: "KnowUnity URL".into(),
                default_filename: "knowunity.pdf".into(),
            },
        );
        let (handle, _task) = controller.spawn();
        (handle, rx)
    }
}

// -- Loopback HTTP --

/// Minimal HTTP/1.1 server answering every request with the same
/// status and body. Records request paths.
pub struct StubServer {
    addr: std::net::SocketAddr,
    paths: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
    pub async fn start(status: u16, body: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let paths = Arc::new(Mutex::new(Vec::new()));
        let body = Arc::new(body);

        let recorded = Arc::clone(&paths);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let body = Arc::clone(&body);
                let recorded = Arc::clone(&recorded);
                tokio::spawn(answer(stream, status, body, recorded));
            }
        });

        Self { addr, paths }
    }

    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

async fn answer(
    mut stream: TcpStream,
    status: u16,
    body: Arc<Vec<u8>>,
    paths: Arc<Mutex<Vec<String>>>,
) {
    let mut head = Vec::new();
    let mut chunk = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&chunk[..n]),
        }
    }

    let text = String::from_utf8_lossy(&head);
    if let Some(path) = text.split_whitespace().nth(1) {
        paths.lock().unwrap().push(path.to_string());
    }

    let response = format!(
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\n\
         Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.write_all(&body).await;
    let _ = stream.shutdown().await;
}
