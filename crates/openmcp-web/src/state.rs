//! Application State
//!
//! Built once at startup: settings, provider clients and the capability
//! registry. Nothing in here is mutated after construction except the login
//! session store inside the music service.

use anyhow::Context;
use openmcp_core::Settings;
use openmcp_tools::CapabilityRegistry;
use openmcp_upstream::{
    DailyHotClient, Gateway, HttpMusicProvider, MusicProvider, MusicService, WeatherClient,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::capabilities;

/// Provider clients shared by the capability handlers
#[derive(Clone)]
pub struct Providers {
    pub dailyhot: DailyHotClient,
    pub weather: WeatherClient,
    pub music: Arc<MusicService>,
}

impl Providers {
    /// Providers as configured, with the HTTP music sidecar
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let gateway = Gateway::new(settings.upstream_timeout())
            .context("Failed to build upstream HTTP client")?;
        let music = Arc::new(HttpMusicProvider::new(gateway.clone(), &settings.music_api_url));
        Ok(Self::with_music_provider(settings, gateway, music))
    }

    /// Providers as configured, with a caller-supplied music provider
    pub fn with_music_provider(
        settings: &Settings,
        gateway: Gateway,
        music: Arc<dyn MusicProvider>,
    ) -> Self {
        Self {
            dailyhot: DailyHotClient::new(gateway.clone(), &settings.dailyhot_api_url),
            weather: WeatherClient::new(
                gateway,
                &settings.weather_api_url,
                &settings.weather_api_key,
            ),
            music: Arc::new(MusicService::new(
                music,
                settings.login_session_capacity,
                settings.login_session_ttl(),
            )),
        }
    }
}

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Settings,
    pub registry: Arc<CapabilityRegistry>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let providers = Providers::from_settings(&settings)?;
        Self::with_providers(settings, providers)
    }

    pub fn with_providers(settings: Settings, providers: Providers) -> anyhow::Result<Self> {
        let registry = CapabilityRegistry::new(capabilities::all(&providers)?)
            .context("Invalid capability registrations")?;

        info!(
            dailyhot = %providers.dailyhot.base_url(),
            capabilities = registry.len(),
            "Application state initialized"
        );

        Ok(Self {
            settings,
            registry: Arc::new(registry),
            start_time: Instant::now(),
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
