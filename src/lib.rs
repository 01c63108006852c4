//! Pismo - serve one site in two scripts.
//!
//! Content is authored once in a *source* script (Serbian Cyrillic or Latin)
//! and every request resolves which script to display. The crate covers:
//!
//! - `translit`: the Cyrillic ⇄ Latin converter (plus the ASCII "cut" variant)
//! - `resolve`: per-request script resolution from path prefix, query, cookie
//! - `pipeline`: page, feed, AJAX and string surfaces run through the converter
//! - `url`: script-variant URLs (`/lat/...`) and internal link rewriting
//! - `seo`: lang attribute, canonical/hreflang links, sitemaps, metadata
//! - `search`: cross-script search helpers
//!
//! Everything request-scoped is built from explicit references; the only
//! process-wide state is the read-only transliteration table.

pub mod config;
pub mod html;
pub mod logger;
pub mod pipeline;
pub mod resolve;
pub mod script;
pub mod search;
pub mod seo;
pub mod translit;
pub mod url;

pub use config::{ConfigError, ConfigHandle, PismoConfig};
pub use pipeline::{Fragment, OutputPipeline, RenderInterceptor, Surface};
pub use resolve::{
    CookieSink, RequestKind, RequestSignals, ResponseCookies, Resolver, ScriptCookie, ScriptState,
};
pub use script::{Direction, Locale, Script, ScriptMix};
pub use seo::SeoAdapter;
pub use translit::Transliterator;
pub use crate::url::{LinkRewriter, ScriptUrl};
