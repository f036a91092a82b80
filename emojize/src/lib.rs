// Library interface for emojize
pub mod emoji;
pub mod emoticon;
pub mod error;
pub mod host;
pub mod interceptor;
pub mod logging;
pub mod pipeline;
pub mod settings;

pub use emojize_types::{Action, Disposition, HookArgs, Rewrite};
pub use error::{EmojizeError, EmojizeResult};
pub use host::{CommandSink, ConsoleHost, Outgoing, PluginHost};
pub use interceptor::{Interceptor, InterceptorConfig};
pub use pipeline::Emojizer;
pub use settings::Settings;

pub const MODULE_NAME: &str = "emoji";
pub const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the filter from `settings` and hook it into `host`
///
/// Fails before anything is hooked if the alias table does not compile.
pub fn load(host: &mut dyn PluginHost, settings: &Settings) -> EmojizeResult<()> {
    let emojizer = settings.build_emojizer()?;
    Interceptor::new(emojizer, settings.interceptor_config()).register(host);

    host.hook_unload(Box::new(|| log::info!("{} unloaded.", MODULE_NAME)));
    log::info!("{} version {} loaded.", MODULE_NAME, MODULE_VERSION);
    Ok(())
}
