use clap::{CommandFactory, Parser, Subcommand};

use crate::{
    conf::settings,
    pkg::server::{listen, state::AppState},
    prelude::Result,
};

mod migrate;

#[derive(Parser)]
#[command(about = "job listing records service")]
struct Cmd {
    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Serve the jobs API
    Listen {
        /// Apply pending migrations before accepting requests
        #[arg(long)]
        migrate: bool,
    },
    /// Apply pending database migrations and exit
    Migrate,
}

pub async fn run() -> Result<()> {
    match Cmd::parse().command {
        Some(SubCommandType::Listen { migrate }) => {
            let state = AppState::from_settings(&settings)?;
            if migrate {
                migrate::apply(&state.db_pool).await?;
            }
            listen(state).await?;
        }
        Some(SubCommandType::Migrate) => {
            let state = AppState::from_settings(&settings)?;
            migrate::apply(&state.db_pool).await?;
        }
        None => {
            tracing::error!("no subcommand passed");
            let _ = Cmd::command().print_help();
        }
    }
    Ok(())
}
