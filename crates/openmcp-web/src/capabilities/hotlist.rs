//! Hot-list capabilities: the generic platform route, one alias per named
//! source, and the news fan-out.

use openmcp_tools::{
    handler_fn, reply, Arguments, CallError, Capability, ParamDescriptor, RegistryError,
};
use openmcp_upstream::dailyhot::is_valid_platform;
use openmcp_upstream::{DailyHotClient, SOURCES};

pub const GENERIC_TAG: &str = "热榜通用";
pub const NEWS_TAG: &str = "新闻资讯";

pub fn capabilities(client: &DailyHotClient) -> Result<Vec<Capability>, RegistryError> {
    let mut capabilities = Vec::with_capacity(SOURCES.len() + 2);

    let generic = client.clone();
    capabilities.push(
        Capability::get("/hot/{platform}")
            .name("get_hot_list")
            .summary("获取指定平台的热榜数据")
            .description(
                "获取指定平台的热榜数据\n\n\
                 platform: 平台名称，如zhihu、weibo、bilibili等\n\
                 返回 code、message、title、subtitle 与热榜数据列表 data",
            )
            .tag(GENERIC_TAG)
            .param(
                ParamDescriptor::path("platform").describe("平台名称，如zhihu、weibo、bilibili等"),
            )
            .handler(handler_fn(move |args: Arguments| {
                let client = generic.clone();
                async move {
                    let platform = args
                        .get("platform")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default();
                    if !is_valid_platform(platform) {
                        return Err(CallError::invalid_argument(format!(
                            "invalid platform '{}'",
                            platform
                        )));
                    }
                    reply(&client.hot_list(platform).await)
                }
            }))
            .build()?,
    );

    let news = client.clone();
    capabilities.push(
        Capability::get("/news")
            .name("get_news_hot")
            .description("获取新闻热榜 (聚合百度、网易等新闻源)")
            .tag(NEWS_TAG)
            .handler(handler_fn(move |_| {
                let client = news.clone();
                async move { reply(&client.news().await) }
            }))
            .build()?,
    );

    for source in SOURCES {
        let alias = client.clone();
        let platform = source.platform;
        capabilities.push(
            Capability::get(source.path())
                .name(source.operation)
                .description(source.description)
                .tag(source.tag)
                .handler(handler_fn(move |_| {
                    let client = alias.clone();
                    async move { reply(&client.hot_list(platform).await) }
                }))
                .build()?,
        );
    }

    Ok(capabilities)
}
