// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Navigation context of a page

use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

/// The page's current top-level address
///
/// Cloning shares the underlying slot, so a clone held by a relay always
/// sees where the page is now rather than where it was at install time.
#[derive(Debug, Clone, Default)]
pub struct Location {
    href: Arc<RwLock<Option<Url>>>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    /// Location already pointing at `url`
    pub fn at(url: Url) -> Self {
        let location = Self::new();
        location.set(url);
        location
    }

    /// Replace the current address
    pub fn set(&self, url: Url) {
        *self.href.write() = Some(url);
    }

    /// Current address, if the page has one
    pub fn href(&self) -> Option<Url> {
        self.href.read().clone()
    }

    /// First value of a query parameter of the current address
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.href
            .read()
            .as_ref()?
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}
