use std::net::{SocketAddr, TcpListener as StdTcpListener};
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::runtime::Builder as RuntimeBuilder;
use tokio::signal;
use tower::{service_fn, Service};

use edgepage_core::app::{App, Hooks};
use edgepage_core::logging::Logging;
use edgepage_core::manifest::ManifestLoader;
use simple_logger::SimpleLogger;

use crate::service::EdgePageAxumService;
use crate::ADAPTER_NAME;

/// Configuration used when running the local dev server.
#[derive(Clone)]
pub struct AxumDevServerConfig {
    pub addr: SocketAddr,
    pub enable_ctrl_c: bool,
}

impl Default for AxumDevServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8787)),
            enable_ctrl_c: true,
        }
    }
}

/// Blocking dev server runner.
pub struct AxumDevServer {
    service: EdgePageAxumService,
    config: AxumDevServerConfig,
}

impl AxumDevServer {
    pub fn new(service: EdgePageAxumService) -> Self {
        Self {
            service,
            config: AxumDevServerConfig::default(),
        }
    }

    pub fn with_config(service: EdgePageAxumService, config: AxumDevServerConfig) -> Self {
        Self { service, config }
    }

    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("failed to build tokio runtime")?;

        runtime.block_on(async move { self.run_async().await })
    }

    async fn run_async(self) -> anyhow::Result<()> {
        let AxumDevServer { service, config } = self;

        let listener = StdTcpListener::bind(config.addr)
            .with_context(|| format!("failed to bind dev server to {}", config.addr))?;
        listener
            .set_nonblocking(true)
            .context("failed to set listener to non-blocking")?;

        let listener = tokio::net::TcpListener::from_std(listener)
            .context("failed to adopt std listener into tokio")?;

        log::info!("dev server listening on http://{}", config.addr);
        serve_with_listener(service, listener, config.enable_ctrl_c).await
    }

    #[cfg(test)]
    async fn run_with_listener(self, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
        let AxumDevServer { service, config } = self;
        serve_with_listener(service, listener, config.enable_ctrl_c).await
    }
}

async fn serve_with_listener(
    service: EdgePageAxumService,
    listener: tokio::net::TcpListener,
    enable_ctrl_c: bool,
) -> anyhow::Result<()> {
    let router = Router::new().fallback_service(service_fn(move |req| {
        let mut svc = service.clone();
        async move { svc.call(req).await }
    }));
    let make_service = router.into_make_service_with_connect_info::<SocketAddr>();

    let server = axum::serve(listener, make_service);
    if enable_ctrl_c {
        server
            .with_graceful_shutdown(async {
                let _ = signal::ctrl_c().await;
            })
            .await
            .context("axum server error")?;
    } else {
        server.await.context("axum server error")?;
    }

    Ok(())
}

/// Load the manifest, install logging and serve the app built from `A` until Ctrl-C.
pub fn run_app<A: Hooks>(manifest_src: &str) -> anyhow::Result<()> {
    let loader = ManifestLoader::load_from_str(manifest_src).context("invalid manifest")?;
    let manifest = loader.manifest();

    let level = manifest.logging_or_default(ADAPTER_NAME).level_filter();
    Logging::init_with(Box::new(move || {
        SimpleLogger::new().with_level(level).init()
    }));

    let mut app = A::build_app();
    if let Some(name) = manifest.app_name() {
        app.set_name(name);
    }
    log::info!("starting {}", app.name());

    let service = service_for(app, manifest);
    let config = AxumDevServerConfig {
        addr: manifest
            .dev
            .addr
            .unwrap_or_else(|| AxumDevServerConfig::default().addr),
        ..AxumDevServerConfig::default()
    };

    AxumDevServer::with_config(service, config).run()
}

fn service_for(app: App, manifest: &edgepage_core::manifest::Manifest) -> EdgePageAxumService {
    let mut service = EdgePageAxumService::new(Arc::new(app));
    match &manifest.dev.geo {
        Some(geo) => service = service.with_geo_metadata(geo.clone()),
        None => log::warn!("no [dev.geo] table in manifest; requests carry no edge metadata"),
    }
    if let Some(addr) = manifest.dev.client_ip {
        service = service.with_client_ip(addr);
    }
    service
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use edgepage_core::context::RequestContext;
    use edgepage_core::error::EdgeError;
    use edgepage_core::geo::GeoMetadata;
    use edgepage_core::router::RouteTable;
    use std::time::{Duration, Instant};

    struct TestServer {
        base_url: String,
        handle: tokio::task::JoinHandle<()>,
    }

    async fn greet(ctx: RequestContext) -> Result<String, EdgeError> {
        Ok(format!(
            "host={} ip={}",
            ctx.host(),
            ctx.client_ip().unwrap_or_default()
        ))
    }

    fn service(geo: Option<GeoMetadata>) -> EdgePageAxumService {
        let mut app = App::new(RouteTable::builder().exact("/", greet).build());
        app.require_geo_metadata("Nothing to see here");
        let service = EdgePageAxumService::new(Arc::new(app));
        match geo {
            Some(geo) => service.with_geo_metadata(geo),
            None => service,
        }
    }

    async fn start_test_server(service: EdgePageAxumService) -> TestServer {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test server");
        let addr = listener.local_addr().expect("local addr");
        let config = AxumDevServerConfig {
            addr,
            enable_ctrl_c: false,
        };
        let server = AxumDevServer::with_config(service, config);

        let handle = tokio::spawn(async move {
            let _ = server.run_with_listener(listener).await;
        });

        TestServer {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    async fn send_with_retry<F>(client: &reqwest::Client, mut make_request: F) -> reqwest::Response
    where
        F: FnMut(&reqwest::Client) -> reqwest::RequestBuilder,
    {
        let start = Instant::now();
        let timeout = Duration::from_secs(2);

        loop {
            match make_request(client).send().await {
                Ok(response) => return response,
                Err(err) => {
                    if start.elapsed() >= timeout {
                        panic!("server did not respond before timeout: {}", err);
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_uses_host_header_and_peer_address() {
        let server = start_test_server(service(Some(GeoMetadata::default()))).await;

        let client = reqwest::Client::new();
        let url = format!("{}/", server.base_url);
        let response = send_with_retry(&client, |client| client.get(url.as_str())).await;

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "host=127.0.0.1 ip=127.0.0.1");

        server.handle.abort();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_without_metadata_serves_fallback() {
        let server = start_test_server(service(None)).await;

        let client = reqwest::Client::new();
        let url = format!("{}/anything", server.base_url);
        let response = send_with_retry(&client, |client| client.get(url.as_str())).await;

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "Nothing to see here");

        server.handle.abort();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_returns_404_for_unknown_routes() {
        let server = start_test_server(service(Some(GeoMetadata::default()))).await;

        let client = reqwest::Client::new();
        let url = format!("{}/nonexistent", server.base_url);
        let response = send_with_retry(&client, |client| client.get(url.as_str())).await;

        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        assert_eq!(response.text().await.unwrap(), "Not Found");

        server.handle.abort();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_fails_to_bind_to_used_port() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind first");
        let addr = listener.local_addr().expect("listener addr");

        let config = AxumDevServerConfig {
            addr,
            enable_ctrl_c: false,
        };
        let server = AxumDevServer::with_config(service(None), config);

        let result = tokio::task::spawn_blocking(move || server.run()).await;

        match result {
            Ok(Err(e)) => {
                let err_str = e.to_string();
                assert!(
                    err_str.contains("bind") || err_str.contains("address"),
                    "expected bind error, got: {}",
                    err_str
                );
            }
            _ => panic!("expected bind error"),
        }

        drop(listener);
    }
}
