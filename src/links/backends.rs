use anyhow::Context;
use rand::seq::SliceRandom;
use serde::Serialize;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::{
    config::LinksConfig,
    links::dto::{Link, LinkList},
};

/// Short link id: the first two bytes of SHA-1(url), big-endian.
pub fn link_id(url: &str) -> u16 {
    let digest = Sha1::digest(url.as_bytes());
    u16::from_be_bytes([digest[0], digest[1]])
}

/// Interchangeable remote link stores.
///
/// Each call goes to one backend picked at random. There is no retry, no health
/// tracking and no consistency between backends.
#[derive(Clone)]
pub struct LinkBackends {
    client: reqwest::Client,
    endpoints: Vec<String>,
}

impl LinkBackends {
    pub fn new(endpoints: Vec<String>, client: reqwest::Client) -> Self {
        Self { client, endpoints }
    }

    pub fn from_config(cfg: &LinksConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .context("build backend http client")?;
        Ok(Self::new(cfg.backends.clone(), client))
    }

    fn pick(&self) -> anyhow::Result<&str> {
        let backend = self
            .endpoints
            .choose(&mut rand::thread_rng())
            .context("no link backends configured")?;
        debug!(backend = %backend, "backend selected");
        Ok(backend.as_str())
    }

    pub async fn list(&self) -> anyhow::Result<Vec<Link>> {
        let backend = self.pick()?;
        let list = self
            .client
            .get(backend)
            .send()
            .await?
            .error_for_status()?
            .json::<LinkList>()
            .await?;
        Ok(list.links)
    }

    pub async fn post<T: Serialize + ?Sized>(&self, route: &str, body: &T) -> anyhow::Result<()> {
        let backend = self.pick()?;
        self.client
            .post(format!("{backend}/{route}"))
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
