//! Music capabilities: QR-code login, search, and the sidecar health probe

use openmcp_tools::{
    from_arguments, handler_fn, reply, Arguments, Capability, ParamDescriptor, ParamType,
    RegistryError,
};
use openmcp_upstream::{MusicService, SearchType};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::call_error;

pub const TAG: &str = "音乐服务";

#[derive(Deserialize)]
struct LoginTypeArgs {
    login_type: String,
}

#[derive(Deserialize)]
struct QrIdArgs {
    qr_id: String,
}

#[derive(Deserialize)]
struct GeneralSearch {
    keyword: String,
    page: u32,
    highlight: bool,
}

#[derive(Deserialize)]
struct TypedSearch {
    keyword: String,
    search_type: SearchType,
    page: u32,
    num: u32,
    highlight: bool,
}

#[derive(Deserialize)]
struct QuickSearch {
    keyword: String,
}

fn keyword() -> ParamDescriptor {
    ParamDescriptor::query("keyword", ParamType::String).describe("搜索关键词")
}

fn page() -> ParamDescriptor {
    ParamDescriptor::query("page", ParamType::Integer)
        .default_value(1)
        .range(Some(1), None)
        .describe("页码")
}

fn highlight() -> ParamDescriptor {
    ParamDescriptor::query("highlight", ParamType::Boolean)
        .default_value(false)
        .describe("是否高亮关键词")
}

pub fn capabilities(service: &Arc<MusicService>) -> Result<Vec<Capability>, RegistryError> {
    let qrcode = Arc::clone(service);
    let check = Arc::clone(service);
    let general = Arc::clone(service);
    let by_type = Arc::clone(service);
    let quick = Arc::clone(service);

    Ok(vec![
        Capability::get("/login/qrcode/{login_type}")
            .name("get_qrcode")
            .description("获取登录二维码\n\nlogin_type: 登录类型，qq 或 wx")
            .tag(TAG)
            .param(ParamDescriptor::path("login_type").describe("登录类型，qq 或 wx"))
            .handler(handler_fn(move |args: Arguments| {
                let service = Arc::clone(&qrcode);
                async move {
                    let LoginTypeArgs { login_type } = from_arguments(args)?;
                    let response = service.get_qrcode(&login_type).await.map_err(call_error)?;
                    reply(&response)
                }
            }))
            .build()?,
        Capability::get("/login/check/{qr_id}")
            .name("check_qrcode")
            .description("检查二维码扫描状态\n\nqr_id: 获取二维码时返回的标识")
            .tag(TAG)
            .param(ParamDescriptor::path("qr_id").describe("二维码标识"))
            .handler(handler_fn(move |args: Arguments| {
                let service = Arc::clone(&check);
                async move {
                    let QrIdArgs { qr_id } = from_arguments(args)?;
                    let response = service.check_qrcode(&qr_id).await.map_err(call_error)?;
                    reply(&response)
                }
            }))
            .build()?,
        Capability::get("/search/general")
            .name("general_search")
            .description("综合搜索歌曲、歌手、专辑等")
            .tag(TAG)
            .param(keyword())
            .param(page())
            .param(highlight())
            .handler(handler_fn(move |args: Arguments| {
                let service = Arc::clone(&general);
                async move {
                    let search: GeneralSearch = from_arguments(args)?;
                    let response = service
                        .general_search(&search.keyword, search.page, search.highlight)
                        .await
                        .map_err(call_error)?;
                    reply(&response)
                }
            }))
            .build()?,
        Capability::get("/search/by_type")
            .name("search_by_type")
            .description(
                "按类型搜索\n\nsearch_type: song、album、singer、playlist、mv、lyric、user",
            )
            .tag(TAG)
            .param(keyword())
            .param(
                ParamDescriptor::query("search_type", ParamType::String)
                    .one_of(SearchType::ALL.iter().map(SearchType::as_str))
                    .describe("搜索类型"),
            )
            .param(page())
            .param(
                ParamDescriptor::query("num", ParamType::Integer)
                    .default_value(20)
                    .range(Some(1), Some(100))
                    .describe("每页数量"),
            )
            .param(highlight())
            .handler(handler_fn(move |args: Arguments| {
                let service = Arc::clone(&by_type);
                async move {
                    let search: TypedSearch = from_arguments(args)?;
                    let response = service
                        .search_by_type(
                            &search.keyword,
                            search.search_type,
                            search.page,
                            search.num,
                            search.highlight,
                        )
                        .await
                        .map_err(call_error)?;
                    reply(&response)
                }
            }))
            .build()?,
        Capability::get("/search/quick")
            .name("quick_search")
            .description("快速搜索，返回联想结果")
            .tag(TAG)
            .param(keyword())
            .handler(handler_fn(move |args: Arguments| {
                let service = Arc::clone(&quick);
                async move {
                    let QuickSearch { keyword } = from_arguments(args)?;
                    let response = service.quick_search(&keyword).await.map_err(call_error)?;
                    reply(&response)
                }
            }))
            .build()?,
        Capability::get("/health")
            .name("health_check")
            .summary("健康检查")
            .handler(handler_fn(|_| async { Ok(json!({"status": "ok"})) }))
            .build()?,
    ])
}
