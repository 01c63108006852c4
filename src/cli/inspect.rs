//! `pismo slug`, `pismo url` and `pismo resolve`.

use super::{KindArg, ResolveArgs};
use anyhow::Result;
use pismo::translit::slugify;
use pismo::{PismoConfig, RequestKind, RequestSignals, Resolver, ResponseCookies, Script, ScriptUrl};
use serde_json::json;

pub fn run_slug(text: &str) -> Result<()> {
    println!("{}", slugify(text));
    Ok(())
}

pub fn run_url(config: &PismoConfig, to: Script, url: &str) -> Result<()> {
    println!("{}", ScriptUrl::new(config.script.source).script_url(to, url));
    Ok(())
}

pub fn run_resolve(config: &PismoConfig, args: &ResolveArgs) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&resolve_report(config, args))?);
    Ok(())
}

fn request_kind(resolver: &Resolver<'_>, args: &ResolveArgs) -> RequestKind {
    match args.kind {
        None => resolver.classify(&args.uri),
        Some(KindArg::Frontend) => RequestKind::Frontend,
        Some(KindArg::Admin) => RequestKind::Admin,
        Some(KindArg::Rest) => RequestKind::Rest,
        Some(KindArg::Ajax) => RequestKind::Ajax {
            action: args.action.clone().unwrap_or_default(),
        },
    }
}

/// Resolved state plus the cookies the request would set.
fn resolve_report(config: &PismoConfig, args: &ResolveArgs) -> serde_json::Value {
    let resolver = Resolver::new(config);
    let kind = request_kind(&resolver, args);

    let mut signals = RequestSignals::frontend(args.uri.as_str()).with_kind(kind.clone());
    if let Some(cookie) = &args.cookie {
        signals = signals.with_cookie(cookie.as_str());
    }

    let mut cookies = ResponseCookies::new();
    let state = resolver.resolve(&signals, &mut cookies);
    let set_cookie: Vec<String> = cookies.header_values().collect();

    json!({
        "request": kind,
        "state": state,
        "set_cookie": set_cookie,
    })
}
