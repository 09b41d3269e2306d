//! openmcp-upstream: Provider Access
//!
//! Everything that talks to a third-party service lives here:
//!
//! - [`Gateway`]: the single HTTP client all providers share. Transport and
//!   status failures become a failure [`openmcp_core::Envelope`] instead of an
//!   error.
//! - [`fanout`]: concurrent queries over equivalent sources, resolved in list
//!   order.
//! - [`dailyhot`]: the hot-list provider and its source table.
//! - [`weather`]: current conditions by city name or coordinates.
//! - [`music`]: QR-code login and search against a music provider, with
//!   pending logins held in a [`LoginSessionStore`].

pub mod dailyhot;
pub mod error;
pub mod fanout;
pub mod gateway;
pub mod login;
pub mod music;
pub mod weather;

pub use dailyhot::{DailyHotClient, SourceDescriptor, NEWS_SOURCES, SOURCES};
pub use error::{Result, UpstreamError};
pub use fanout::first_success;
pub use gateway::Gateway;
pub use login::LoginSessionStore;
pub use music::{
    HttpMusicProvider, LoginEvent, LoginType, MusicProvider, MusicService, QrCode, SearchType,
};
pub use weather::{WeatherClient, WeatherInfo, WeatherResponse};
