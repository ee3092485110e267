//! Check command: resolve everything `preview` would use and print it.

use crate::cli::{CheckArgs, PreviewArgs};
use crate::config::PreviewConfig;
use crate::error::Result;
use crate::startup::StartupConfig;
use crate::ui;

pub async fn execute(args: CheckArgs) -> Result<()> {
    let config = PreviewConfig::load(&PreviewArgs::from(&args))?;
    let startup = StartupConfig::from_config(&config);

    ui::print_summary("loupe configuration", &startup.summary());

    if startup.entries.component.is_none() && startup.entries.markup.is_none() {
        ui::warning("No component or markup entry found, preview would serve an empty page");
    } else {
        ui::success("Configuration is valid");
    }
    Ok(())
}
