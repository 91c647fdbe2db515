//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function routes the parsed CLI to the appropriate
//! subcommand handler: [`apply`], [`validate`], or [`init`]. Each handler
//! lives in its own submodule.

pub mod apply;
pub mod init;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::RouteHookError;

pub async fn dispatch(cli: Cli) -> Result<(), RouteHookError> {
    match cli.command {
        Some(Commands::Apply(args)) => apply::execute(*args).await,
        Some(Commands::Validate(ref args)) => validate::execute(args).await,
        Some(Commands::Init(ref args)) => init::execute(args),
        None => {
            print_welcome();
            Ok(())
        }
    }
}

fn print_welcome() {
    println!("{}", welcome_text());
}

fn welcome_text() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        "\n  routehook v{version}: attach middleware to host routes at startup\n\n  \
         No command provided. To get started:\n\n    \
         routehook init                          Generate a starter patch config\n    \
         routehook apply -m routes.yaml          Print the patched manifest\n    \
         routehook apply -m routes.yaml --in-place\n    \
         routehook --help                        See all commands and options\n"
    )
}
