//! Shared helpers for integration tests.
//!
//! Provides an in-process feed server and database setup helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use rss_aggregator::feed::{Feed, FeedRepository, NewFeed};
use rss_aggregator::{Database, NewUser, User, UserRepository};

/// One canned response of the feed server.
#[derive(Debug, Clone)]
pub struct Route {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

type Routes = Arc<Mutex<HashMap<String, Route>>>;

/// HTTP server serving feed documents registered at runtime.
#[derive(Clone)]
pub struct FeedServer {
    addr: SocketAddr,
    routes: Routes,
    hits: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct ServerState {
    routes: Routes,
    hits: Arc<Mutex<Vec<String>>>,
}

async fn serve_route(Path(name): Path<String>, State(state): State<ServerState>) -> Response {
    state.hits.lock().unwrap().push(name.clone());
    let route = state.routes.lock().unwrap().get(&name).cloned();

    match route {
        Some(route) => {
            if !route.delay.is_zero() {
                tokio::time::sleep(route.delay).await;
            }
            (
                route.status,
                [("content-type", "application/rss+xml")],
                route.body,
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

impl FeedServer {
    /// Start a server on an ephemeral local port.
    pub async fn start() -> Self {
        let routes: Routes = Arc::default();
        let hits = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route("/:name", get(serve_route))
            .with_state(ServerState {
                routes: routes.clone(),
                hits: hits.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should exist");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("feed server should run");
        });

        Self { addr, routes, hits }
    }

    /// Serve `body` with status 200 at `/name`.
    pub fn serve(&self, name: &str, body: impl Into<String>) -> String {
        self.serve_route(
            name,
            Route {
                status: StatusCode::OK,
                body: body.into(),
                delay: Duration::ZERO,
            },
        )
    }

    /// Register a route and return its full URL.
    pub fn serve_route(&self, name: &str, route: Route) -> String {
        self.routes.lock().unwrap().insert(name.to_string(), route);
        self.url(name)
    }

    /// Full URL of `/name`.
    pub fn url(&self, name: &str) -> String {
        format!("http://{}/{}", self.addr, name)
    }

    /// Paths requested so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// An RSS item for [`rss_document`].
pub struct TestItem<'a> {
    pub title: &'a str,
    pub link: &'a str,
    pub description: &'a str,
    pub pub_date: &'a str,
}

impl<'a> TestItem<'a> {
    pub fn new(link: &'a str, pub_date: &'a str) -> Self {
        Self {
            title: "A post",
            link,
            description: "",
            pub_date,
        }
    }
}

/// Render an RSS 2.0 document.
pub fn rss_document(title: &str, items: &[TestItem<'_>]) -> String {
    let mut body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<rss version=\"2.0\"><channel>\
         <title>{title}</title><link>https://example.com</link><description>Test</description>"
    );
    for item in items {
        body.push_str(&format!(
            "<item><title>{}</title><link>{}</link><description>{}</description>\
             <pubDate>{}</pubDate></item>",
            item.title, item.link, item.description, item.pub_date
        ));
    }
    body.push_str("</channel></rss>");
    body
}

/// Open an in-memory database with one user.
pub async fn setup_db() -> (Database, User) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let user = UserRepository::new(db.pool())
        .create(&NewUser::new("tester"))
        .await
        .expect("Failed to create test user");
    (db, user)
}

/// Register a feed owned by `user`.
pub async fn add_feed(db: &Database, user: &User, name: &str, url: &str) -> Feed {
    FeedRepository::new(db.pool())
        .create(&NewFeed::new(name, url, user.id))
        .await
        .expect("Failed to create feed")
}
