// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Provider-routing fetcher

use super::{FetchError, FileFetcher};
use async_trait::async_trait;
use skiff_core::{Provider, RepoPath};
use std::collections::HashMap;
use std::sync::Arc;

/// Dispatches each download to the fetcher registered for the path's
/// provider.
#[derive(Default)]
pub struct RoutingFetcher {
    routes: HashMap<Provider, Arc<dyn FileFetcher>>,
}

impl RoutingFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, provider: Provider, fetcher: Arc<dyn FileFetcher>) -> Self {
        self.routes.insert(provider, fetcher);
        self
    }
}

#[async_trait]
impl FileFetcher for RoutingFetcher {
    async fn download(&self, path: &RepoPath) -> Result<String, FetchError> {
        match self.routes.get(&path.provider) {
            Some(fetcher) => fetcher.download(path).await,
            None => Err(FetchError::UnknownProvider(
                path.provider.as_str().to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MemoryFetcher;

    #[tokio::test]
    async fn routes_by_provider() {
        let router = RoutingFetcher::new()
            .with(Provider::Memory, Arc::new(MemoryFetcher::seeded([("f", "body")])));

        let hit = RepoPath::new(Provider::Memory, "o", "r", "f");
        assert_eq!(router.download(&hit).await.unwrap(), "body");

        let miss = RepoPath::new(Provider::Github, "o", "r", "f");
        assert!(matches!(
            router.download(&miss).await,
            Err(FetchError::UnknownProvider(_))
        ));
    }
}
