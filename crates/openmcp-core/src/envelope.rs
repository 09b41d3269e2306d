//! Response Envelope
//!
//! Every hot-list answer, whether it came straight from the provider or was
//! synthesized after a failure, is an [`Envelope`]. Envelopes are built once
//! per request and never mutated afterwards: fields are private and the
//! `with_*` methods consume `self`.

use serde::{Deserialize, Serialize};

/// Status code the providers use for success.
pub const SUCCESS_CODE: i64 = 200;

/// Status code for transport failures and exhausted fan-outs.
pub const FAILURE_CODE: i64 = -1;

/// Popularity value: providers report it either as a number or as display text
/// such as `"1.2万"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HotValue {
    Number(i64),
    Text(String),
}

impl From<i64> for HotValue {
    fn from(value: i64) -> Self {
        HotValue::Number(value)
    }
}

impl From<&str> for HotValue {
    fn from(value: &str) -> Self {
        HotValue::Text(value.to_string())
    }
}

/// One normalized record. Only the title is guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hot: Option<HotValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    img: Option<String>,
    #[serde(
        rename = "mobileUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    mobile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desc: Option<String>,
}

impl Item {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: None,
            hot: None,
            img: None,
            mobile_url: None,
            desc: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_hot(mut self, hot: impl Into<HotValue>) -> Self {
        self.hot = Some(hot.into());
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = Some(img.into());
        self
    }

    pub fn with_mobile_url(mut self, url: impl Into<String>) -> Self {
        self.mobile_url = Some(url.into());
        self
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn hot(&self) -> Option<&HotValue> {
        self.hot.as_ref()
    }

    pub fn img(&self) -> Option<&str> {
        self.img.as_deref()
    }

    pub fn mobile_url(&self) -> Option<&str> {
        self.mobile_url.as_deref()
    }

    pub fn desc(&self) -> Option<&str> {
        self.desc.as_deref()
    }
}

/// Normalized hot-list response: `{code, message?, title?, subtitle?, data?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    code: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<Vec<Item>>,
}

impl Envelope {
    /// Envelope with the given status code and nothing else
    pub fn new(code: i64) -> Self {
        Self {
            code,
            message: None,
            title: None,
            subtitle: None,
            data: None,
        }
    }

    /// Failure envelope carrying only a code and a message
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        Self::new(code).with_message(message)
    }

    /// Failure envelope for an upstream call that never produced a usable body
    pub fn upstream_failure(description: impl std::fmt::Display) -> Self {
        Self::failure(FAILURE_CODE, format!("获取数据失败: {}", description))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.data = Some(items);
        self
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn items(&self) -> Option<&[Item]> {
        self.data.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}
