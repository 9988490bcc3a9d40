use std::collections::HashMap;
use std::sync::Arc;

use crate::artwork::ArtworkFetcher;
use crate::converter::FfmpegConverter;
use crate::process::{ProcessRunner, ToolResolver};

use super::catalog::CatalogAdapter;
use super::soundcloud::SoundCloudAdapter;
use super::traits::PlatformAdapter;
use super::types::Platform;

/// Maps each platform to the adapter that handles it.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<Platform, Arc<dyn PlatformAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock adapters: yt-dlp for SoundCloud, spotdl for Spotify and
    /// Apple Music, ffmpeg for WAV conversion.
    pub fn standard(
        runner: Arc<dyn ProcessRunner>,
        resolver: ToolResolver,
        artwork: Arc<dyn ArtworkFetcher>,
    ) -> Self {
        let converter = Arc::new(FfmpegConverter::new(runner.clone(), resolver.clone()));

        let mut registry = Self::new();
        registry.register(Arc::new(SoundCloudAdapter::new(
            runner.clone(),
            resolver.clone(),
            artwork,
        )));
        for platform in [Platform::Spotify, Platform::AppleMusic] {
            registry.register(Arc::new(CatalogAdapter::new(
                platform,
                runner.clone(),
                resolver.clone(),
                converter.clone(),
            )));
        }
        registry
    }

    /// Registers `adapter` for every platform it reports, replacing any
    /// previous registration.
    pub fn register(&mut self, adapter: Arc<dyn PlatformAdapter>) {
        for platform in adapter.platforms() {
            self.adapters.insert(*platform, adapter.clone());
        }
    }

    pub fn get(&self, platform: Platform) -> Option<Arc<dyn PlatformAdapter>> {
        self.adapters.get(&platform).cloned()
    }

    /// Registered platforms in display order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.adapters.contains_key(p))
            .collect()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("platforms", &self.platforms())
            .finish()
    }
}
