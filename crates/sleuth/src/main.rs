use crate::prelude::*;
use clap::Parser;

mod analyze;
mod channels;
mod error;
mod history;
mod prelude;
mod slack;
mod user;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Fetch Slack channel history and find out who and what gets talked about"
)]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[clap(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// Slack API token (needs channels:read, channels:history and users:read)
    #[clap(
        long,
        short = 't',
        env = "SLACK_TOKEN",
        global = true,
        hide_env_values = true
    )]
    token: Option<String>,

    /// Slack Web API base URL
    #[clap(long, env = "SLACK_API_BASE", global = true)]
    api_base: Option<String>,

    /// Whether to display additional information.
    #[clap(
        long,
        short = 'v',
        env = "SLEUTH_VERBOSE",
        global = true,
        default_value = "false"
    )]
    verbose: bool,
}

#[derive(Debug, clap::Parser)]
pub enum SubCommands {
    /// List public channels
    Channels(crate::channels::ChannelsOptions),

    /// Fetch the message history of a channel
    History(crate::history::HistoryOptions),

    /// Analyze a history snapshot: mentions, posters, popular messages and tags
    Analyze(crate::analyze::AnalyzeOptions),

    /// Show a single user
    User(crate::user::UserOptions),
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    color_eyre::install()?;

    let app = App::parse();

    match app.command {
        SubCommands::Channels(options) => crate::channels::run(options, app.global).await,
        SubCommands::History(options) => crate::history::run(options, app.global).await,
        SubCommands::Analyze(options) => crate::analyze::run(options, app.global).await,
        SubCommands::User(options) => crate::user::run(options, app.global).await,
    }
}
