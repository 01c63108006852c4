//! Configuration sections of `pismo.toml`.

mod advanced;
mod script;
mod seo;
mod serve;
mod site;

pub use advanced::AdvancedConfig;
pub use script::{ScriptConfig, ScriptPriority};
pub use seo::{CanonicalPolicy, SeoConfig};
pub use serve::ServeConfig;
pub use site::SiteConfig;
