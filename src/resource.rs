use url::Url;

use crate::credentials::Credentials;

/// Just a wrapper around a server URL and the credentials to access it
#[derive(Clone)]
pub struct Resource {
    url: Url,
    credentials: Credentials,
}

impl Resource {
    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self { url, credentials }
    }

    pub fn url(&self) -> &Url { &self.url }
    pub fn username(&self) -> &str { self.credentials.username() }
    pub fn password(&self) -> &str { self.credentials.password() }

    /// Build a URL that keeps the scheme and server of this resource but uses the given path
    pub fn combine(&self, new_path: &str) -> Url {
        let mut built = self.url.clone();
        built.set_path(new_path);
        built
    }
}
