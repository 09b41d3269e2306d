//! Music provider
//!
//! QR-code login and search. The provider itself is a black box behind
//! [`MusicProvider`]; [`HttpMusicProvider`] talks JSON to a music API sidecar.
//! [`MusicService`] owns the pending logins and shapes the answers.
//!
//! Login flow: `get_qrcode` stores the provider's QR handle under an opaque
//! `qr_id`; `check_qrcode` polls it until the provider reports a terminal
//! event (`DONE` or `TIMEOUT`), at which point the session is dropped.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{Result, UpstreamError};
use crate::gateway::Gateway;
use crate::login::LoginSessionStore;

pub const LOGIN_TYPE_ERROR: &str = "登录类型错误，只支持 qq 或 wx";
pub const QR_NOT_FOUND: &str = "二维码不存在或已过期";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    Qq,
    Wx,
}

impl LoginType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoginType::Qq => "qq",
            LoginType::Wx => "wx",
        }
    }
}

impl FromStr for LoginType {
    type Err = UpstreamError;

    /// Case-insensitive `qq` or `wx`
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "qq" => Ok(LoginType::Qq),
            "wx" => Ok(LoginType::Wx),
            _ => Err(UpstreamError::invalid_input(LOGIN_TYPE_ERROR)),
        }
    }
}

/// Scan state reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoginEvent {
    Done,
    Scan,
    Timeout,
    /// Anything else: not scanned yet, refused, or unknown
    #[serde(other)]
    Waiting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Song,
    Album,
    Singer,
    Playlist,
    Mv,
    Lyric,
    User,
}

impl SearchType {
    pub const ALL: [SearchType; 7] = [
        SearchType::Song,
        SearchType::Album,
        SearchType::Singer,
        SearchType::Playlist,
        SearchType::Mv,
        SearchType::Lyric,
        SearchType::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Song => "song",
            SearchType::Album => "album",
            SearchType::Singer => "singer",
            SearchType::Playlist => "playlist",
            SearchType::Mv => "mv",
            SearchType::Lyric => "lyric",
            SearchType::User => "user",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = UpstreamError;

    fn from_str(s: &str) -> Result<Self> {
        SearchType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UpstreamError::invalid_input(format!("不支持的搜索类型: {}", s)))
    }
}

/// A QR code issued by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    /// Provider-side handle, needed to poll the scan state
    pub id: String,
    pub login_type: LoginType,
    /// PNG bytes
    pub image: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginCheck {
    pub event: LoginEvent,
    pub musicid: Option<String>,
    pub credential: Option<Value>,
}

#[async_trait]
pub trait MusicProvider: Send + Sync {
    async fn get_qrcode(&self, login_type: LoginType) -> Result<QrCode>;

    async fn check_qrcode(&self, qr: &QrCode) -> Result<LoginCheck>;

    async fn general_search(&self, keyword: &str, page: u32, highlight: bool) -> Result<Value>;

    async fn search_by_type(
        &self,
        keyword: &str,
        search_type: SearchType,
        page: u32,
        num: u32,
        highlight: bool,
    ) -> Result<Value>;

    async fn quick_search(&self, keyword: &str) -> Result<Value>;
}

/// [`MusicProvider`] backed by a music API sidecar speaking JSON over HTTP
pub struct HttpMusicProvider {
    gateway: Gateway,
    base_url: String,
}

#[derive(Deserialize)]
struct QrCodePayload {
    id: String,
    /// Base64 PNG
    image: String,
}

#[derive(Deserialize)]
struct CheckPayload {
    event: LoginEvent,
    #[serde(default)]
    musicid: Option<Value>,
    #[serde(default)]
    credential: Option<Value>,
}

impl HttpMusicProvider {
    pub fn new(gateway: Gateway, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { gateway, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl MusicProvider for HttpMusicProvider {
    async fn get_qrcode(&self, login_type: LoginType) -> Result<QrCode> {
        let raw = self
            .gateway
            .get_json_with_query(&self.url("/login/qrcode"), &[("login_type", login_type.as_str())])
            .await?;
        let payload: QrCodePayload = serde_json::from_value(raw)
            .map_err(|e| UpstreamError::invalid_response(e.to_string()))?;
        let image = BASE64
            .decode(payload.image.as_bytes())
            .map_err(|e| UpstreamError::invalid_response(format!("QR image: {}", e)))?;

        Ok(QrCode {
            id: payload.id,
            login_type,
            image,
        })
    }

    async fn check_qrcode(&self, qr: &QrCode) -> Result<LoginCheck> {
        let raw = self
            .gateway
            .get_json_with_query(
                &self.url("/login/check"),
                &[("id", qr.id.as_str()), ("login_type", qr.login_type.as_str())],
            )
            .await?;
        let payload: CheckPayload = serde_json::from_value(raw)
            .map_err(|e| UpstreamError::invalid_response(e.to_string()))?;

        // musicid may come back as a number; it is always reported as text
        let musicid = payload
            .musicid
            .or_else(|| payload.credential.as_ref().and_then(|c| c.get("musicid").cloned()))
            .and_then(|id| match id {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });

        Ok(LoginCheck {
            event: payload.event,
            musicid,
            credential: payload.credential,
        })
    }

    async fn general_search(&self, keyword: &str, page: u32, highlight: bool) -> Result<Value> {
        self.gateway
            .get_json_with_query(
                &self.url("/search/general"),
                &[
                    ("keyword", keyword.to_string()),
                    ("page", page.to_string()),
                    ("highlight", highlight.to_string()),
                ],
            )
            .await
    }

    async fn search_by_type(
        &self,
        keyword: &str,
        search_type: SearchType,
        page: u32,
        num: u32,
        highlight: bool,
    ) -> Result<Value> {
        self.gateway
            .get_json_with_query(
                &self.url("/search/by_type"),
                &[
                    ("keyword", keyword.to_string()),
                    ("search_type", search_type.to_string()),
                    ("page", page.to_string()),
                    ("num", num.to_string()),
                    ("highlight", highlight.to_string()),
                ],
            )
            .await
    }

    async fn quick_search(&self, keyword: &str) -> Result<Value> {
        self.gateway
            .get_json_with_query(&self.url("/search/quick"), &[("keyword", keyword)])
            .await
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrCodeResponse {
    pub code: i64,
    pub message: String,
    pub qr_id: String,
    /// Base64 PNG
    pub qr_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginStatusResponse {
    pub code: i64,
    pub message: String,
    pub status: LoginEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub musicid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<Value>,
}

impl LoginStatusResponse {
    fn pending(code: i64, message: &str, status: LoginEvent) -> Self {
        Self {
            code,
            message: message.to_string(),
            status,
            musicid: None,
            credential: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl SearchResponse {
    fn success(data: Value) -> Self {
        Self {
            code: 200,
            message: "搜索成功".to_string(),
            data: Some(data),
        }
    }
}

/// Music operations as exposed by the facade
pub struct MusicService {
    provider: Arc<dyn MusicProvider>,
    sessions: LoginSessionStore<QrCode>,
}

impl MusicService {
    pub fn new(
        provider: Arc<dyn MusicProvider>,
        session_capacity: usize,
        session_ttl: Duration,
    ) -> Self {
        Self {
            provider,
            sessions: LoginSessionStore::new(session_capacity, session_ttl),
        }
    }

    pub fn sessions(&self) -> &LoginSessionStore<QrCode> {
        &self.sessions
    }

    /// Issue a QR code and remember it under a fresh `qr_id`
    pub async fn get_qrcode(&self, login_type: &str) -> Result<QrCodeResponse> {
        let login_type: LoginType = login_type.parse()?;

        let qr = self
            .provider
            .get_qrcode(login_type)
            .await
            .map_err(|e| UpstreamError::provider(format!("获取二维码失败: {}", e)))?;

        let qr_id = BASE64.encode(qr.id.as_bytes());
        let qr_image = BASE64.encode(&qr.image);
        self.sessions.insert(qr_id.clone(), qr).await;
        info!(login_type = login_type.as_str(), "QR code issued");

        Ok(QrCodeResponse {
            code: 200,
            message: "获取二维码成功".to_string(),
            qr_id,
            qr_image,
        })
    }

    /// Poll a pending login. Terminal events end the session.
    pub async fn check_qrcode(&self, qr_id: &str) -> Result<LoginStatusResponse> {
        let qr = self
            .sessions
            .get(qr_id)
            .await
            .ok_or_else(|| UpstreamError::not_found(QR_NOT_FOUND))?;

        let check = self
            .provider
            .check_qrcode(&qr)
            .await
            .map_err(|e| UpstreamError::provider(format!("检查二维码状态失败: {}", e)))?;
        debug!(event = ?check.event, "QR code polled");

        let response = match check.event {
            LoginEvent::Done => {
                self.sessions.remove(qr_id).await;
                info!("QR login completed");
                LoginStatusResponse {
                    code: 200,
                    message: "登录成功".to_string(),
                    status: LoginEvent::Done,
                    musicid: check.musicid,
                    credential: check.credential,
                }
            }
            LoginEvent::Timeout => {
                self.sessions.remove(qr_id).await;
                LoginStatusResponse::pending(408, "二维码已过期", LoginEvent::Timeout)
            }
            LoginEvent::Scan => {
                LoginStatusResponse::pending(201, "二维码已扫描，等待确认", LoginEvent::Scan)
            }
            LoginEvent::Waiting => {
                LoginStatusResponse::pending(100, "等待扫描", LoginEvent::Waiting)
            }
        };
        Ok(response)
    }

    pub async fn general_search(
        &self,
        keyword: &str,
        page: u32,
        highlight: bool,
    ) -> Result<SearchResponse> {
        self.provider
            .general_search(keyword, page, highlight)
            .await
            .map(SearchResponse::success)
            .map_err(search_failed)
    }

    pub async fn search_by_type(
        &self,
        keyword: &str,
        search_type: SearchType,
        page: u32,
        num: u32,
        highlight: bool,
    ) -> Result<SearchResponse> {
        self.provider
            .search_by_type(keyword, search_type, page, num, highlight)
            .await
            .map(SearchResponse::success)
            .map_err(search_failed)
    }

    pub async fn quick_search(&self, keyword: &str) -> Result<SearchResponse> {
        self.provider
            .quick_search(keyword)
            .await
            .map(SearchResponse::success)
            .map_err(search_failed)
    }
}

fn search_failed(e: UpstreamError) -> UpstreamError {
    warn!(error = %e, "Music search failed");
    UpstreamError::provider(format!("搜索失败: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Replays a fixed sequence of login events
    struct ScriptedProvider {
        events: Mutex<Vec<LoginEvent>>,
    }

    impl ScriptedProvider {
        fn new(mut events: Vec<LoginEvent>) -> Self {
            events.reverse();
            Self {
                events: Mutex::new(events),
            }
        }
    }

    #[async_trait]
    impl MusicProvider for ScriptedProvider {
        async fn get_qrcode(&self, login_type: LoginType) -> Result<QrCode> {
            Ok(QrCode {
                id: "provider-qr-1".into(),
                login_type,
                image: vec![0x89, b'P', b'N', b'G'],
            })
        }

        async fn check_qrcode(&self, _qr: &QrCode) -> Result<LoginCheck> {
            let event = self.events.lock().unwrap().pop().unwrap_or(LoginEvent::Waiting);
            let done = event == LoginEvent::Done;
            Ok(LoginCheck {
                event,
                musicid: done.then(|| "10001".to_string()),
                credential: done.then(|| json!({"musicid": 10001, "musickey": "k"})),
            })
        }

        async fn general_search(
            &self,
            keyword: &str,
            _page: u32,
            _highlight: bool,
        ) -> Result<Value> {
            Ok(json!({"keyword": keyword}))
        }

        async fn search_by_type(
            &self,
            _keyword: &str,
            _search_type: SearchType,
            _page: u32,
            _num: u32,
            _highlight: bool,
        ) -> Result<Value> {
            Err(UpstreamError::provider("rate limited"))
        }

        async fn quick_search(&self, keyword: &str) -> Result<Value> {
            Ok(json!([keyword]))
        }
    }

    fn service(events: Vec<LoginEvent>) -> MusicService {
        MusicService::new(Arc::new(ScriptedProvider::new(events)), 16, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_login_lifecycle() {
        let service = service(vec![LoginEvent::Waiting, LoginEvent::Scan, LoginEvent::Done]);

        let qr = service.get_qrcode("QQ").await.unwrap();
        assert_eq!(qr.code, 200);
        assert_eq!(qr.qr_id, BASE64.encode("provider-qr-1"));
        assert_eq!(BASE64.decode(&qr.qr_image).unwrap(), vec![0x89, b'P', b'N', b'G']);

        assert_eq!(service.check_qrcode(&qr.qr_id).await.unwrap().code, 100);
        assert_eq!(service.check_qrcode(&qr.qr_id).await.unwrap().code, 201);

        let done = service.check_qrcode(&qr.qr_id).await.unwrap();
        assert_eq!(done.status, LoginEvent::Done);
        assert_eq!(done.musicid.as_deref(), Some("10001"));

        let err = service.check_qrcode(&qr.qr_id).await.unwrap_err();
        assert!(matches!(err, UpstreamError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_timeout_ends_session() {
        let service = service(vec![LoginEvent::Timeout]);
        let qr = service.get_qrcode("wx").await.unwrap();

        let status = service.check_qrcode(&qr.qr_id).await.unwrap();
        assert_eq!(status.code, 408);
        assert!(service.sessions().is_empty().await);
    }

    #[tokio::test]
    async fn test_unknown_qr_id_and_bad_login_type() {
        let service = service(vec![]);
        let err = service.check_qrcode("bm9wZQ==").await.unwrap_err();
        assert_eq!(err.to_string(), QR_NOT_FOUND);

        let err = service.get_qrcode("weibo").await.unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidInput(_)));
        assert_eq!(err.to_string(), LOGIN_TYPE_ERROR);
    }

    #[tokio::test]
    async fn test_search_responses() {
        let service = service(vec![]);
        let found = service.general_search("晴天", 1, false).await.unwrap();
        assert_eq!(found.message, "搜索成功");
        assert_eq!(found.data, Some(json!({"keyword": "晴天"})));

        let err = service
            .search_by_type("晴天", SearchType::Song, 1, 20, false)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "搜索失败: rate limited");
    }

    #[test]
    fn test_wire_names() {
        assert_eq!("mv".parse::<SearchType>().unwrap(), SearchType::Mv);
        assert!("video".parse::<SearchType>().is_err());
        assert_eq!(serde_json::to_value(LoginEvent::Waiting).unwrap(), json!("WAITING"));
        let event: LoginEvent = serde_json::from_value(json!("REFUSE")).unwrap();
        assert_eq!(event, LoginEvent::Waiting);
    }
}
