//! Shared test fixtures for store, gateway and engine test modules.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{GatewayError, StoreError};
use crate::purchase::PurchaseGateway;
use crate::store::PersistenceStore;

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("hueshell-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }

    /// Write UTF-8 text to a child path, creating parent directories as needed.
    pub fn write_text(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.child(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories for fixture");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Store whose every operation fails, or only writes when `reads_ok` is set.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub reads_ok: bool,
}

impl PersistenceStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        if self.reads_ok {
            return Ok(None);
        }
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}

/// Gateway fake with per-theme scripted results.
///
/// Unscripted themes succeed immediately. `hold` parks the next charge for a
/// theme until the returned sender fires.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    denied: Mutex<Vec<String>>,
    held: Mutex<HashMap<String, oneshot::Receiver<Result<(), GatewayError>>>>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every charge for `theme` with a 402.
    pub fn deny(&self, theme: &str) {
        self.denied.lock().unwrap().push(theme.to_string());
    }

    /// Park the next charge for `theme` until the sender resolves it.
    pub fn hold(&self, theme: &str) -> oneshot::Sender<Result<(), GatewayError>> {
        let (tx, rx) = oneshot::channel();
        self.held.lock().unwrap().insert(theme.to_string(), rx);
        tx
    }

    /// Every `(theme, user_id)` pair charged so far.
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PurchaseGateway for ScriptedGateway {
    async fn charge(&self, theme: &str, user_id: Option<&str>) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .unwrap()
            .push((theme.to_string(), user_id.map(str::to_string)));
        let parked = self.held.lock().unwrap().remove(theme);
        if let Some(rx) = parked {
            return rx.await.unwrap_or(Err(GatewayError::Timeout));
        }
        if self.denied.lock().unwrap().iter().any(|name| name == theme) {
            return Err(GatewayError::Status(402, "denied".to_string()));
        }
        Ok(())
    }
}

/// Accept one HTTP request, answer with `status` and `body`, and yield the
/// raw request text (headers plus body).
pub async fn spawn_http_responder(
    status: &'static str,
    body: &'static str,
) -> (SocketAddr, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let request = read_http_request(&mut stream).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let _ = stream.write_all(response.as_bytes()).await;
        request
    });
    (addr, handle)
}

/// Accept connections and never answer, so clients hit their timeout.
pub async fn spawn_silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_stream, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
    });
    addr
}

async fn read_http_request(stream: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (key, value) = line.split_once(':')?;
                key.trim()
                    .eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        if buf.len() >= header_end + 4 + content_length {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_writes_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        let file = fixture.write_text("nested/file.txt", "hello");
        assert_eq!(fs::read_to_string(file).unwrap(), "hello");
        assert!(fixture.path().exists());
    }

    #[tokio::test]
    async fn scripted_gateway_records_calls_and_denials() {
        let gateway = ScriptedGateway::new();
        gateway.deny("Luxe Silver");
        assert!(gateway.charge("Luxe Silver", None).await.is_err());
        assert!(gateway.charge("Muted Ocean", Some("u1")).await.is_ok());
        assert_eq!(
            gateway.calls(),
            vec![
                ("Luxe Silver".to_string(), None),
                ("Muted Ocean".to_string(), Some("u1".to_string())),
            ]
        );
    }
}
