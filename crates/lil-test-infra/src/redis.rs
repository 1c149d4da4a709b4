use crate::Result;
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

const REDIS_PORT: u16 = 6379;

/// Test fixture for a disposable standalone Redis server.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
    password: Option<String>,
}

impl RedisServer {
    /// Starts a Redis container without authentication.
    pub async fn new() -> Result<Self> {
        let container = Self::image().start().await?;
        Ok(Self {
            container,
            password: None,
        })
    }

    /// Starts a Redis container that requires `password`.
    pub async fn with_password(password: impl Into<String>) -> Result<Self> {
        let password = password.into();
        let container = Self::image()
            .with_cmd(["redis-server", "--requirepass", password.as_str()])
            .start()
            .await?;
        Ok(Self {
            container,
            password: Some(password),
        })
    }

    fn image() -> GenericImage {
        GenericImage::new("redis", "8.6.0")
            .with_exposed_port(REDIS_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
    }

    pub async fn host(&self) -> Result<String> {
        let host = self.container.get_host().await?.to_string();
        match host.as_str() {
            "localhost" => Ok(String::from("127.0.0.1")),
            _ => Ok(host),
        }
    }

    pub async fn port(&self) -> Result<u16> {
        Ok(self.container.get_host_port_ipv4(REDIS_PORT).await?)
    }

    /// `host:port` of the mapped Redis port.
    pub async fn address(&self) -> Result<String> {
        Ok(format!("{}:{}", self.host().await?, self.port().await?))
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Returns the underlying container reference.
    pub fn container(&self) -> &ContainerAsync<GenericImage> {
        &self.container
    }
}
