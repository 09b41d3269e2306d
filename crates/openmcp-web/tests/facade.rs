//! End-to-end checks of the facade router against fake providers

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    extract::Path,
    http::{Request, StatusCode},
    response::Json,
    routing::get,
    Router,
};
use openmcp_core::Settings;
use openmcp_upstream::music::LoginCheck;
use openmcp_upstream::{
    Gateway, LoginEvent, LoginType, MusicProvider, QrCode, SearchType, UpstreamError,
};
use openmcp_web::{create_router, AppState, Providers};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct FakeMusic;

#[async_trait]
impl MusicProvider for FakeMusic {
    async fn get_qrcode(&self, login_type: LoginType) -> openmcp_upstream::Result<QrCode> {
        Ok(QrCode {
            id: "fake-qr".into(),
            login_type,
            image: b"png".to_vec(),
        })
    }

    async fn check_qrcode(&self, _qr: &QrCode) -> openmcp_upstream::Result<LoginCheck> {
        Ok(LoginCheck {
            event: LoginEvent::Done,
            musicid: Some("10001".into()),
            credential: Some(json!({"musickey": "k"})),
        })
    }

    async fn general_search(
        &self,
        keyword: &str,
        page: u32,
        highlight: bool,
    ) -> openmcp_upstream::Result<Value> {
        Ok(json!({"keyword": keyword, "page": page, "highlight": highlight}))
    }

    async fn search_by_type(
        &self,
        _keyword: &str,
        search_type: SearchType,
        _page: u32,
        num: u32,
        _highlight: bool,
    ) -> openmcp_upstream::Result<Value> {
        Ok(json!({"search_type": search_type, "num": num}))
    }

    async fn quick_search(&self, _keyword: &str) -> openmcp_upstream::Result<Value> {
        Err(UpstreamError::provider("connection reset"))
    }
}

/// Hot lists at `/{platform}` and weather at `/weather`
async fn spawn_upstream() -> SocketAddr {
    let router = Router::new()
        .route(
            "/weather",
            get(|| async {
                Json(json!({
                    "cod": 200,
                    "name": "Beijing",
                    "weather": [{"description": "晴"}],
                    "main": {"temp": 25, "humidity": 40},
                    "wind": {"speed": 3}
                }))
            }),
        )
        .route(
            "/:platform",
            get(|Path(platform): Path<String>| async move {
                Json(json!({
                    "code": 200,
                    "title": platform,
                    "type": "热榜",
                    "data": [{"id": 1, "title": "headline", "hot": 100}]
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn app() -> Router {
    let addr = spawn_upstream().await;
    let settings = Settings {
        dailyhot_api_url: format!("http://{}", addr),
        weather_api_url: format!("http://{}/weather", addr),
        weather_api_key: "test-key".into(),
        ..Settings::default()
    };
    let gateway = Gateway::new(Duration::from_secs(5)).unwrap();
    let providers = Providers::with_music_provider(&settings, gateway, Arc::new(FakeMusic));
    let state = AppState::with_providers(settings, providers).unwrap();
    create_router(Arc::new(state))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_catalog_lists_tagged_capabilities() {
    let app = app().await;
    let (status, catalog) = get_json(&app, "/api-registry/apis").await;
    assert_eq!(status, StatusCode::OK);

    let apis = catalog["apis"].as_array().unwrap();
    assert_eq!(catalog["total"], json!(apis.len()));
    assert_eq!(apis.len(), 54);
    assert!(apis.iter().all(|api| api["name"] != "health_check"));

    let zhihu = apis.iter().find(|api| api["name"] == "get_zhihu_hot").unwrap();
    assert_eq!(zhihu["path"], "/zhihu");
    assert_eq!(zhihu["methods"], json!(["GET"]));
    assert_eq!(zhihu["category"], "社交媒体");

    let generic = apis.iter().find(|api| api["name"] == "get_hot_list").unwrap();
    assert_eq!(
        generic["parameters"],
        json!([{"name": "platform", "type": "string", "required": true, "location": "path"}])
    );

    let weather = apis
        .iter()
        .find(|api| api["name"] == "get_weather_latitude_longitude")
        .unwrap();
    assert_eq!(weather["methods"], json!(["POST"]));
    assert_eq!(weather["parameters"][0]["type"], "number");
    assert_eq!(weather["parameters"][0]["location"], "other");
}

#[tokio::test]
async fn test_hot_list_routes() {
    let app = app().await;

    let (status, body) = get_json(&app, "/zhihu").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["title"], "zhihu");
    assert_eq!(body["data"][0]["title"], "headline");

    let (status, body) = get_json(&app, "/hot/bilibili").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "bilibili");

    // Platform ids are ASCII letters, digits, `_` and `-`
    let (status, body) = get_json(&app, "/hot/%E7%9F%A5").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"code": 422, "message": "invalid platform '知'"}));

    let (status, _) = get_json(&app, "/hot/a.b").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = get_json(&app, "/news").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "baidu");
}

#[tokio::test]
async fn test_weather_routes() {
    let app = app().await;

    let (status, body) =
        post_json(&app, "/get_weather/cityname", json!({"cityname": "beijing"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["weather"]["temperature"], "25°C");
    assert_eq!(body["msg"], "success");

    let (status, body) = post_json(
        &app,
        "/get_weather/latitude_longitude",
        json!({"latitude": 39.9, "longitude": 116.4}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["weather"]["cityname"], "Beijing");

    let (status, _) = post_json(&app, "/get_weather/cityname", json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = post_json(
        &app,
        "/get_weather/latitude_longitude",
        json!({"latitude": "north", "longitude": 116.4}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_music_login_flow() {
    let app = app().await;

    let (status, body) = get_json(&app, "/login/qrcode/QQ").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "获取二维码成功");
    let qr_id = body["qr_id"].as_str().unwrap().to_string();

    let (status, body) = get_json(&app, &format!("/login/check/{}", qr_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 200);
    assert_eq!(body["status"], "DONE");
    assert_eq!(body["musicid"], "10001");

    // A completed login is forgotten
    let (status, body) = get_json(&app, &format!("/login/check/{}", qr_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"code": 404, "message": "二维码不存在或已过期"}));

    let (status, body) = get_json(&app, "/login/qrcode/email").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "登录类型错误，只支持 qq 或 wx");
}

#[tokio::test]
async fn test_music_search_routes() {
    let app = app().await;

    let (status, body) = get_json(&app, "/search/general?keyword=jay").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "搜索成功");
    assert_eq!(body["data"], json!({"keyword": "jay", "page": 1, "highlight": false}));

    let (status, body) = get_json(&app, "/search/by_type?keyword=jay&search_type=mv&num=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"search_type": "mv", "num": 5}));

    let (status, _) = get_json(&app, "/search/by_type?keyword=jay&search_type=radio").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get_json(&app, "/search/by_type?keyword=jay&search_type=song&num=500").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = get_json(&app, "/search/quick?keyword=jay").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "搜索失败: connection reset");

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_mcp_surface() {
    let app = app().await;

    let (status, body) = post_json(
        &app,
        "/mcp",
        json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let tools = body["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 54);
    assert!(tools.iter().all(|tool| tool["name"] != "health_check"));

    let (_, body) = post_json(
        &app,
        "/mcp",
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "get_hot_list", "arguments": {"platform": "weibo"}}
        }),
    )
    .await;
    let result = &body["result"];
    assert_eq!(result["isError"], false);
    let text: Value = serde_json::from_str(result["content"][0]["text"].as_str().unwrap()).unwrap();
    assert_eq!(text["title"], "weibo");

    let (_, body) = post_json(
        &app,
        "/mcp/tools/call",
        json!({"name": "health_check"}),
    )
    .await;
    assert_eq!(body["error"]["code"], -32602);
}
