//! URL builders for the listing service
//!
//! All URLs are derived from one base, e.g. `https://host/sample/`:
//! - listing: `<base>list/`
//! - next listing page: `<base>list/?token=<token>`
//! - detail: `<base>detail/<id>`

use url::Url;

/// Resolved endpoint URLs for one listing service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    listing: Url,
    detail_root: Url,
}

impl Endpoints {
    /// Derive endpoints from a base URL. A missing trailing slash is added so
    /// the last path segment is kept when joining.
    pub fn new(mut base: Url) -> Result<Self, url::ParseError> {
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let listing = base.join("list/")?;
        let detail_root = base.join("detail/")?;

        Ok(Self {
            base,
            listing,
            detail_root,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// First listing page
    pub fn listing(&self) -> &Url {
        &self.listing
    }

    /// Listing page following `token`
    pub fn listing_after(&self, token: &str) -> Url {
        let mut url = self.listing.clone();
        url.query_pairs_mut().clear().append_pair("token", token);
        url
    }

    /// Detail record for one id
    pub fn detail(&self, id: i64) -> Result<Url, url::ParseError> {
        self.detail_root.join(&id.to_string())
    }
}
