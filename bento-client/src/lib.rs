//! Bento Client - API access and session state for the Bento console
//!
//! - [`ApiClient`]: the HTTP client. Attaches identity headers from the
//!   cache, turns 401 into a wiped session plus a login redirect, and
//!   joins identical in-flight requests.
//! - [`UserSession`], [`ProjectSelection`], [`LanguageStore`]: typed views
//!   over the cache slots the pages read.
//! - [`Console`]: the above composed with the current [`Route`].
//!
//! Storage, clock and transport are all injected, so the whole stack runs
//! in tests against an in-memory cache, a manual clock and a scripted
//! transport.

pub mod cache_keys;
pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod inflight;
pub mod route;
pub mod session;
pub mod transport;

pub use client::{ApiClient, PROJECT_ID_HEADER, USER_ID_HEADER};
pub use config::{ClientConfig, ConfigError, LogConfig, CONFIG_ENV};
pub use console::Console;
pub use error::{ClientError, ClientResult};
pub use inflight::{InflightRegistry, RequestKey};
pub use route::Route;
pub use session::{LanguageStore, ProjectSelection, SessionState, UserSession};
pub use transport::{HttpMethod, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
