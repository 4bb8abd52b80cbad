//! Frame host — loopback page that shows one zone inside an isolated iframe.
//!
//! The browser only ever sees `http://<bind>:<port>/`. What that page contains
//! is switched from here:
//!   open(zone) -> wrapper document embedding the zone URL
//!   close()    -> empty document
//! Every switch bumps a session counter. Pages poll `/session` and reload when
//! it moves, so closing releases whatever the iframe had loaded.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{Html, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};

use zone_proto::protocol::Zone;

/// Permissions delegated to the embedded zone.
pub const FRAME_PERMISSIONS: &str =
    "fullscreen; geolocation; microphone; camera; midi; encrypted-media";

/// A page that polled within this window counts as attached.
const ATTACHED_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, PartialEq)]
pub enum FrameDocument {
    Blank {
        session: u64,
    },
    Wrapper {
        session: u64,
        title: String,
        target: String,
    },
}

impl FrameDocument {
    pub fn session(&self) -> u64 {
        match self {
            Self::Blank { session } | Self::Wrapper { session, .. } => *session,
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Blank { session } => page("zonedeck", "", *session),
            Self::Wrapper {
                session,
                title,
                target,
            } => {
                let frame = format!(
                    r#"<iframe src="{}" allow="{}" allowfullscreen style="position:fixed;inset:0;width:100%;height:100%;border:0"></iframe>"#,
                    escape_html(target),
                    FRAME_PERMISSIONS
                );
                page(title, &frame, *session)
            }
        }
    }
}

fn page(title: &str, body: &str, session: u64) -> String {
    format!(
        r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="margin:0;background:#121212">{body}
<script>
(function () {{
  var session = {session};
  setInterval(function () {{
    fetch('/session', {{ cache: 'no-store' }})
      .then(function (r) {{ return r.json(); }})
      .then(function (d) {{ if (d.session !== session) {{ location.reload(); }} }})
      .catch(function () {{}});
  }}, 1000);
}})();
</script>
</body>
</html>
"#,
        title = escape_html(title),
        body = body,
        session = session,
    )
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub struct HostState {
    document: RwLock<FrameDocument>,
    last_poll: Mutex<Option<Instant>>,
}

impl HostState {
    fn new() -> Self {
        Self {
            document: RwLock::new(FrameDocument::Blank { session: 0 }),
            last_poll: Mutex::new(None),
        }
    }

    fn touch(&self) {
        if let Ok(mut last) = self.last_poll.lock() {
            *last = Some(Instant::now());
        }
    }

    fn attached(&self) -> bool {
        self.last_poll
            .lock()
            .ok()
            .and_then(|last| *last)
            .map_or(false, |t| t.elapsed() < ATTACHED_WINDOW)
    }
}

#[derive(Serialize)]
struct SessionInfo {
    session: u64,
}

pub fn router(state: Arc<HostState>) -> Router {
    Router::new()
        .route("/", get(get_page))
        .route("/session", get(get_session))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

async fn get_page(State(state): State<Arc<HostState>>) -> Html<String> {
    state.touch();
    Html(state.document.read().await.render())
}

async fn get_session(State(state): State<Arc<HostState>>) -> Json<SessionInfo> {
    state.touch();
    let session = state.document.read().await.session();
    Json(SessionInfo { session })
}

#[derive(Clone)]
pub struct FrameHost {
    state: Arc<HostState>,
    addr: SocketAddr,
}

impl FrameHost {
    /// Bind and serve. Falls back to an ephemeral port when `port` is taken.
    pub async fn start(bind_address: &str, port: u16) -> anyhow::Result<Self> {
        let listener = match TcpListener::bind((bind_address, port)).await {
            Ok(l) => l,
            Err(e) => {
                warn!(
                    "frame host: {}:{} unavailable ({}), using an ephemeral port",
                    bind_address, port, e
                );
                TcpListener::bind((bind_address, 0)).await?
            }
        };
        let addr = listener.local_addr()?;
        let state = Arc::new(HostState::new());
        let app = router(Arc::clone(&state));

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                error!("frame host error: {}", e);
            }
        });
        info!("frame host listening on http://{}", addr);

        Ok(Self { state, addr })
    }

    pub fn page_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// Show `zone` in the frame. Returns true when no page is attached yet,
    /// i.e. the caller should launch a browser.
    pub async fn open(&self, zone: &Zone) -> bool {
        let mut doc = self.state.document.write().await;
        *doc = FrameDocument::Wrapper {
            session: doc.session() + 1,
            title: zone.name.clone(),
            target: zone.url.clone(),
        };
        info!("frame host: opened zone {}", zone.id);
        !self.state.attached()
    }

    /// Reset the frame to the empty document.
    pub async fn close(&self) {
        let mut doc = self.state.document.write().await;
        if matches!(*doc, FrameDocument::Wrapper { .. }) {
            *doc = FrameDocument::Blank {
                session: doc.session() + 1,
            };
            info!("frame host: closed");
        }
    }

    #[cfg(test)]
    async fn document(&self) -> FrameDocument {
        self.state.document.read().await.clone()
    }
}
