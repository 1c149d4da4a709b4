use crate::error::{Result, ShortenerError};
use crate::shortener::{CreateLink, Shortener};
use async_trait::async_trait;
use lil_core::{CodeFormat, LinkRecord, LinkStore, NewLink, SearchPage, SearchQuery, ShortCode, StoreError};
use lil_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

const DEFAULT_MAX_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TypedBuilder)]
pub struct ShortenerSettings {
    /// Number of generated codes tried before giving up on a create.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,
    /// Shape of caller-supplied codes.
    #[builder(default)]
    pub format: CodeFormat,
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A concrete implementation of the [`Shortener`] trait.
///
/// Custom codes are validated and written once: a taken code is reported to
/// the caller as [`ShortenerError::CodeCollision`]. Generated codes are
/// retried on collision up to [`ShortenerSettings::max_attempts`] times before
/// the create fails with [`ShortenerError::CreateExhausted`].
#[derive(Debug)]
pub struct ShortenerService<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
    settings: ShortenerSettings,
}

impl<S, G> Clone for ShortenerService<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            settings: self.settings,
        }
    }
}

impl<S: LinkStore, G: Generator> ShortenerService<S, G> {
    pub fn new(store: S, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    /// Parses a code coming from a lookup path.
    ///
    /// A malformed code can never have been stored, so it is reported as
    /// missing without a store round trip.
    fn lookup_code(&self, code: &str) -> Result<ShortCode> {
        self.settings.format.validate(code).map_err(|e| {
            trace!(code, error = %e, "Malformed short code treated as missing");
            ShortenerError::NotFound(code.to_string())
        })
    }

    async fn create_with_custom_code(&self, code: String, request: CreateLink) -> Result<LinkRecord> {
        let code = self.settings.format.validate(&code)?;
        let link = NewLink::new(code, request.target_url, request.ttl)?;

        let record = self.store.create(link).await?;
        debug!(code = %record.code, "Created link with custom code");
        Ok(record)
    }

    async fn create_with_generated_code(&self, request: CreateLink) -> Result<LinkRecord> {
        let attempts = self.settings.max_attempts.max(1);

        for attempt in 1..=attempts {
            let code: ShortCode = self.generator.generate().into();
            let link = NewLink::new(code, request.target_url.clone(), request.ttl)?;

            match self.store.create(link).await {
                Ok(record) => {
                    debug!(code = %record.code, attempt, "Created link with generated code");
                    return Ok(record);
                }
                Err(StoreError::Collision(code)) => {
                    warn!(code = %code, attempt, max_attempts = attempts, "Generated short code collided");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(ShortenerError::CreateExhausted { attempts })
    }
}

#[async_trait]
impl<S: LinkStore, G: Generator> Shortener for ShortenerService<S, G> {
    async fn create_link(&self, mut request: CreateLink) -> Result<LinkRecord> {
        match request.code.take() {
            Some(code) => self.create_with_custom_code(code, request).await,
            None => self.create_with_generated_code(request).await,
        }
    }

    async fn get_link(&self, code: &str) -> Result<LinkRecord> {
        let code = self.lookup_code(code)?;
        Ok(self.store.get(&code).await?)
    }

    async fn search_links(&self, query: SearchQuery) -> Result<SearchPage> {
        trace!(pattern = %query.pattern, limit = query.limit, "Searching links");
        Ok(self.store.search(&query).await?)
    }

    async fn delete_link(&self, code: &str) -> Result<()> {
        let code = self.lookup_code(code)?;
        self.store.delete(&code).await?;
        debug!(code = %code, "Deleted link");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lil_core::ReadLinkStore;
    use lil_generator::RandomGenerator;
    use lil_storage::InMemoryLinkStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Replays a fixed list of codes, repeating the last one forever.
    struct ScriptedGenerator {
        codes: Vec<&'static str>,
        next: AtomicUsize,
    }

    impl ScriptedGenerator {
        fn new(codes: Vec<&'static str>) -> Self {
            Self {
                codes,
                next: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.next.load(Ordering::SeqCst)
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = ShortCode;

        fn generate(&self) -> ShortCode {
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            let code = self.codes[i.min(self.codes.len() - 1)];
            ShortCode::new_unchecked(code)
        }
    }

    struct UnavailableStore;

    #[async_trait]
    impl ReadLinkStore for UnavailableStore {
        async fn get(&self, _code: &ShortCode) -> lil_core::store::Result<LinkRecord> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn search(&self, _query: &SearchQuery) -> lil_core::store::Result<SearchPage> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl LinkStore for UnavailableStore {
        async fn create(&self, _link: NewLink) -> lil_core::store::Result<LinkRecord> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }

        async fn delete(&self, _code: &ShortCode) -> lil_core::store::Result<()> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    fn test_service() -> ShortenerService<InMemoryLinkStore, RandomGenerator> {
        ShortenerService::new(
            InMemoryLinkStore::new(),
            RandomGenerator::default(),
            ShortenerSettings::default(),
        )
    }

    fn request(code: Option<&str>, url: &str) -> CreateLink {
        CreateLink {
            code: code.map(str::to_string),
            target_url: url.to_string(),
            ttl: None,
        }
    }

    #[tokio::test]
    async fn create_with_generated_code() {
        let service = test_service();

        let record = service
            .create_link(request(None, "https://example.com"))
            .await
            .unwrap();

        assert_eq!(record.code.as_str().len(), 8);
        assert!(service.settings().format.is_valid(record.code.as_str()));
        assert_eq!(record.target_url, "https://example.com");

        let fetched = service.get_link(record.code.as_str()).await.unwrap();
        assert_eq!(fetched, record);
    }

    #[tokio::test]
    async fn create_with_custom_code() {
        let service = test_service();

        let record = service
            .create_link(request(Some("abc12345"), "https://example.com/a"))
            .await
            .unwrap();

        assert_eq!(record.code.as_str(), "abc12345");
    }

    #[tokio::test]
    async fn duplicate_custom_code_is_a_collision() {
        let service = test_service();

        service
            .create_link(request(Some("abc12345"), "https://example1.com"))
            .await
            .unwrap();
        let err = service
            .create_link(request(Some("abc12345"), "https://example2.com"))
            .await
            .unwrap_err();

        assert_eq!(err, ShortenerError::CodeCollision("abc12345".to_string()));
    }

    #[tokio::test]
    async fn malformed_custom_code_is_rejected() {
        let service = test_service();

        for code in ["", "short", "has-dash", "abc1234O"] {
            let err = service
                .create_link(request(Some(code), "https://example.com"))
                .await
                .unwrap_err();
            assert!(matches!(err, ShortenerError::InvalidCode(_)), "{code}");
        }
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let service = test_service();

        let err = service
            .create_link(request(None, "not-a-valid-url"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn oversized_ttl_is_rejected() {
        let service = test_service();

        let err = service
            .create_link(CreateLink {
                code: None,
                target_url: "https://example.com".to_string(),
                ttl: Some(Duration::MAX),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::InvalidTtl(_)));
    }

    #[tokio::test]
    async fn generated_code_retries_after_collision() {
        let store = InMemoryLinkStore::new();
        let taken = NewLink::new(ShortCode::new_unchecked("abc12345"), "https://taken.com", None).unwrap();
        store.create(taken).await.unwrap();

        let generator = ScriptedGenerator::new(vec!["abc12345", "abc12345", "xyz98765"]);
        let service = ShortenerService::new(store, generator, ShortenerSettings::default());

        let record = service
            .create_link(request(None, "https://example.com"))
            .await
            .unwrap();

        assert_eq!(record.code.as_str(), "xyz98765");
        assert_eq!(service.generator.calls(), 3);
    }

    #[tokio::test]
    async fn retry_budget_is_configurable() {
        let generator = ScriptedGenerator::new(vec!["abc12345"]);
        let settings = ShortenerSettings::builder().max_attempts(2).build();
        let service = ShortenerService::new(InMemoryLinkStore::new(), generator, settings);

        service
            .create_link(request(None, "https://example.com"))
            .await
            .unwrap();
        let err = service
            .create_link(request(None, "https://example.com"))
            .await
            .unwrap_err();

        assert_eq!(err, ShortenerError::CreateExhausted { attempts: 2 });
        assert_eq!(service.generator.calls(), 3);
    }

    #[tokio::test]
    async fn concurrent_creates_with_a_stuck_generator() {
        let generator = ScriptedGenerator::new(vec!["abc12345"]);
        let service = ShortenerService::new(
            InMemoryLinkStore::new(),
            generator,
            ShortenerSettings::default(),
        );

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .create_link(request(None, &format!("https://example{i}.com")))
                        .await
                })
            })
            .collect();

        let mut created = 0;
        let mut exhausted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(record) => {
                    assert_eq!(record.code.as_str(), "abc12345");
                    created += 1;
                }
                Err(ShortenerError::CreateExhausted { attempts }) => {
                    assert_eq!(attempts, DEFAULT_MAX_ATTEMPTS);
                    exhausted += 1;
                }
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(exhausted, 5);
    }

    #[tokio::test]
    async fn get_and_delete() {
        let service = test_service();
        service
            .create_link(request(Some("abc12345"), "https://example.com"))
            .await
            .unwrap();

        service.delete_link("abc12345").await.unwrap();
        assert_eq!(
            service.get_link("abc12345").await.unwrap_err(),
            ShortenerError::NotFound("abc12345".to_string())
        );
        assert_eq!(
            service.delete_link("abc12345").await.unwrap_err(),
            ShortenerError::NotFound("abc12345".to_string())
        );
    }

    #[tokio::test]
    async fn malformed_lookup_code_is_not_found() {
        let service = ShortenerService::new(
            UnavailableStore,
            RandomGenerator::default(),
            ShortenerSettings::default(),
        );

        // The store is never reached, otherwise these would be Unavailable.
        assert!(matches!(
            service.get_link("no/such").await,
            Err(ShortenerError::NotFound(_))
        ));
        assert!(matches!(
            service.delete_link("api").await,
            Err(ShortenerError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn search_delegates_to_store() {
        let service = test_service();
        for code in ["docs1234", "docs5678", "news1234"] {
            service
                .create_link(request(Some(code), "https://example.com"))
                .await
                .unwrap();
        }

        let page = service
            .search_links(SearchQuery::new("docs", None, 10))
            .await
            .unwrap();
        assert_eq!(page.links.len(), 2);

        let err = service
            .search_links(SearchQuery::new("", None, 0))
            .await
            .unwrap_err();
        assert_eq!(err, ShortenerError::InvalidLimit(0));
    }

    #[tokio::test]
    async fn store_outage_is_unavailable() {
        let service = ShortenerService::new(
            UnavailableStore,
            RandomGenerator::default(),
            ShortenerSettings::default(),
        );

        let err = service
            .create_link(request(None, "https://example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::Unavailable(_)));

        let err = service.get_link("abc12345").await.unwrap_err();
        assert!(matches!(err, ShortenerError::Unavailable(_)));
    }
}
