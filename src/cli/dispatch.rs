use anyhow::Result;
use outbox::commands::publish::PublishOptions;
use outbox::commands::{check, due, labels, log, publish, watch};

use super::types::{Cli, Commands};

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = cli.config;
    match cli.command {
        Commands::Publish {
            path,
            publish,
            render_dir,
            json,
        } => publish::execute(
            &path,
            PublishOptions {
                config_path: config,
                force_publish: publish,
                render_dir,
                json,
            },
        ),
        Commands::Check { paths } => check::execute(paths),
        Commands::Due { path } => due::execute(&path).map(|_| ()),
        Commands::Watch { dir, publish } => watch::execute(&dir, config.as_deref(), publish),
        Commands::Log { limit, errors } => log::execute(config.as_deref(), limit, errors),
        Commands::Labels { destination } => labels::execute(&destination, config.as_deref()),
    }
}
