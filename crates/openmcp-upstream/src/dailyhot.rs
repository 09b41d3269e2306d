//! Hot-list provider
//!
//! The provider serves one list per platform at `{base}/{platform}`. Each
//! named alias in [`SOURCES`] is a fixed platform; `/news` fans out over
//! [`NEWS_SOURCES`].

use openmcp_core::Envelope;
use tracing::info;

use crate::fanout::aggregate;
use crate::gateway::Gateway;

/// Entries requested per list
pub const HOT_LIST_LIMIT: u32 = 10;

/// News sources, in preference order
pub const NEWS_SOURCES: [&str; 5] = ["baidu", "netease-news", "sina-news", "qq-news", "toutiao"];

pub const NEWS_FAILURE_MESSAGE: &str = "获取新闻热榜失败";

/// One named hot-list source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceDescriptor {
    /// Provider platform id, also the facade path segment
    pub platform: &'static str,
    /// Operation name exposed in the catalog and as an MCP tool
    pub operation: &'static str,
    pub description: &'static str,
    pub tag: &'static str,
}

impl SourceDescriptor {
    pub const fn new(
        platform: &'static str,
        operation: &'static str,
        description: &'static str,
        tag: &'static str,
    ) -> Self {
        Self {
            platform,
            operation,
            description,
            tag,
        }
    }

    /// Facade path of this source
    pub fn path(&self) -> String {
        format!("/{}", self.platform)
    }
}

#[rustfmt::skip]
pub static SOURCES: &[SourceDescriptor] = &[
    SourceDescriptor::new("zhihu", "get_zhihu_hot", "获取知乎热榜", "社交媒体"),
    SourceDescriptor::new("weibo", "get_weibo_hot", "获取微博热搜", "社交媒体"),
    SourceDescriptor::new("bilibili", "get_bilibili_hot", "获取B站热榜", "视频平台"),
    SourceDescriptor::new("acfun", "get_acfun_hot", "获取AcFun排行榜", "视频平台"),
    SourceDescriptor::new("zhihu-daily", "get_zhihu_daily_hot", "获取知乎日报推荐榜", "社交媒体"),
    SourceDescriptor::new("baidu", "get_baidu_hot", "获取百度热搜榜", "搜索引擎"),
    SourceDescriptor::new("douyin", "get_douyin_hot", "获取抖音热点榜", "视频平台"),
    SourceDescriptor::new("kuaishou", "get_kuaishou_hot", "获取快手热点榜", "视频平台"),
    SourceDescriptor::new("douban-movie", "get_douban_movie_hot", "获取豆瓣电影新片榜", "娱乐影视"),
    SourceDescriptor::new("douban-group", "get_douban_group_hot", "获取豆瓣讨论小组讨论精选", "社交媒体"),
    SourceDescriptor::new("tieba", "get_tieba_hot", "获取百度贴吧热议榜", "社交媒体"),
    SourceDescriptor::new("sspai", "get_sspai_hot", "获取少数派热榜", "科技数码"),
    SourceDescriptor::new("ithome", "get_ithome_hot", "获取IT之家热榜", "科技数码"),
    SourceDescriptor::new("ithome-xijiayi", "get_ithome_xijiayi_hot", "获取IT之家「喜加一」最新动态", "科技数码"),
    SourceDescriptor::new("jianshu", "get_jianshu_hot", "获取简书热门推荐", "内容平台"),
    SourceDescriptor::new("guokr", "get_guokr_hot", "获取果壳热门文章", "内容平台"),
    SourceDescriptor::new("thepaper", "get_thepaper_hot", "获取澎湃新闻热榜", "新闻资讯"),
    SourceDescriptor::new("toutiao", "get_toutiao_hot", "获取今日头条热榜", "新闻资讯"),
    SourceDescriptor::new("36kr", "get_36kr_hot", "获取36氪热榜", "科技数码"),
    SourceDescriptor::new("51cto", "get_51cto_hot", "获取51CTO推荐榜", "技术开发"),
    SourceDescriptor::new("csdn", "get_csdn_hot", "获取CSDN排行榜", "技术开发"),
    SourceDescriptor::new("nodeseek", "get_nodeseek_hot", "获取NodeSeek最新动态", "技术开发"),
    SourceDescriptor::new("juejin", "get_juejin_hot", "获取稀土掘金热榜", "技术开发"),
    SourceDescriptor::new("qq-news", "get_qq_news_hot", "获取腾讯新闻热点榜", "新闻资讯"),
    SourceDescriptor::new("sina", "get_sina_hot", "获取新浪网热榜", "新闻资讯"),
    SourceDescriptor::new("sina-news", "get_sina_news_hot", "获取新浪新闻热点榜", "新闻资讯"),
    SourceDescriptor::new("netease-news", "get_netease_news_hot", "获取网易新闻热点榜", "新闻资讯"),
    SourceDescriptor::new("52pojie", "get_52pojie_hot", "获取吾爱破解榜单", "技术开发"),
    SourceDescriptor::new("hostloc", "get_hostloc_hot", "获取全球主机交流榜单", "技术开发"),
    SourceDescriptor::new("huxiu", "get_huxiu_hot", "获取虎嗅24小时", "科技数码"),
    SourceDescriptor::new("coolapk", "get_coolapk_hot", "获取酷安热榜", "科技数码"),
    SourceDescriptor::new("hupu", "get_hupu_hot", "获取虎扑步行街热帖", "社交媒体"),
    SourceDescriptor::new("ifanr", "get_ifanr_hot", "获取爱范儿快讯", "科技数码"),
    SourceDescriptor::new("lol", "get_lol_hot", "获取英雄联盟更新公告", "游戏动漫"),
    SourceDescriptor::new("miyoushe", "get_miyoushe_hot", "获取米游社最新消息", "游戏动漫"),
    SourceDescriptor::new("genshin", "get_genshin_hot", "获取原神最新消息", "游戏动漫"),
    SourceDescriptor::new("honkai", "get_honkai_hot", "获取崩坏3最新动态", "游戏动漫"),
    SourceDescriptor::new("starrail", "get_starrail_hot", "获取崩坏：星穹铁道最新动态", "游戏动漫"),
    SourceDescriptor::new("weread", "get_weread_hot", "获取微信读书飙升榜", "内容平台"),
    SourceDescriptor::new("ngabbs", "get_ngabbs_hot", "获取NGA热帖", "游戏动漫"),
    SourceDescriptor::new("v2ex", "get_v2ex_hot", "获取V2EX主题榜", "技术开发"),
    SourceDescriptor::new("hellogithub", "get_hellogithub_hot", "获取HelloGitHub Trending", "技术开发"),
    SourceDescriptor::new("weatheralarm", "get_weatheralarm_hot", "获取中央气象台全国气象预警", "生活服务"),
    SourceDescriptor::new("earthquake", "get_earthquake_hot", "获取中国地震台地震速报", "生活服务"),
    SourceDescriptor::new("history", "get_history_hot", "获取历史上的今天", "生活服务"),
];

pub fn find_source(platform: &str) -> Option<&'static SourceDescriptor> {
    SOURCES.iter().find(|s| s.platform == platform)
}

/// Platform ids are a non-empty run of ASCII letters, digits, `-` and `_`
pub fn is_valid_platform(platform: &str) -> bool {
    !platform.is_empty()
        && platform
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[derive(Clone)]
pub struct DailyHotClient {
    gateway: Gateway,
    base_url: String,
}

impl DailyHotClient {
    pub fn new(gateway: Gateway, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { gateway, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one platform's list, capped at [`HOT_LIST_LIMIT`]
    pub fn hot_list_url(&self, platform: &str) -> String {
        format!("{}/{}?limit={}", self.base_url, platform, HOT_LIST_LIMIT)
    }

    /// Fetch and normalize one platform's list. The caller validates
    /// `platform` with [`is_valid_platform`].
    pub async fn hot_list(&self, platform: &str) -> Envelope {
        let envelope = self.gateway.fetch_envelope(&self.hot_list_url(platform)).await;
        info!(platform = %platform, code = envelope.code(), "Hot list fetched");
        envelope
    }

    /// First successful list among [`NEWS_SOURCES`]
    pub async fn news(&self) -> Envelope {
        let urls: Vec<String> = NEWS_SOURCES
            .iter()
            .map(|source| format!("{}/{}", self.base_url, source))
            .collect();
        let envelope = aggregate(&self.gateway, &urls, NEWS_FAILURE_MESSAGE).await;
        info!(code = envelope.code(), "News fan-out finished");
        envelope
    }
}
