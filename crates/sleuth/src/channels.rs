use crate::prelude::{println, *};
use crate::slack::{spinner, SlackApi, SlackClient, SlackConfig};
use colored::Colorize;
use sleuth_core::limit::PageSize;
use sleuth_core::message::Channel;
use sleuth_core::pagination::{fetch_all_with, FetchError, Page, PageFetch};
use sleuth_core::slack::{
    channels_query, filter_channels, search_pattern, transform_channels_response,
    ConversationsListResponse,
};

#[derive(Debug, clap::Args, Clone)]
pub struct ChannelsOptions {
    /// Only show channels whose name matches this regular expression
    #[arg(short, long)]
    pub search: Option<String>,

    /// Channels requested per page (1-1000)
    #[arg(short, long, default_value_t = PageSize::DEFAULT)]
    pub limit: PageSize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Public, non-archived channels, one `conversations.list` page at a time
pub struct ChannelListing<'a, A> {
    pub api: &'a A,
    pub limit: PageSize,
}

impl<A: SlackApi> PageFetch for ChannelListing<'_, A> {
    type Item = Channel;

    async fn fetch_page(&mut self, cursor: &str) -> Result<Page<Channel>, FetchError> {
        let response: ConversationsListResponse = self
            .api
            .call("conversations.list", &channels_query(self.limit, cursor))
            .await
            .map_err(FetchError::transport)?;

        Ok(transform_channels_response(response))
    }
}

pub async fn run(options: ChannelsOptions, global: crate::Global) -> Result<()> {
    // Validate the pattern before any request goes out.
    let pattern = options
        .search
        .as_deref()
        .map(search_pattern)
        .transpose()
        .map_err(Error::from)?;

    let config = SlackConfig::from_global(&global)?;
    let client = SlackClient::new(&config)?;

    let channels = list_channels_data(&client, options.limit, !options.json).await?;
    let matching = filter_channels(&channels, pattern.as_ref());

    log::info!(
        "Fetched {} channel(s), {} matching",
        channels.len(),
        matching.len()
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&matching)?);
    } else {
        print!("{}", format_channels_text(&matching));
    }

    Ok(())
}

/// Fetches every public channel
pub async fn list_channels_data<A: SlackApi>(
    api: &A,
    limit: PageSize,
    show_progress: bool,
) -> Result<Vec<Channel>> {
    let spinner = spinner(show_progress, "Fetching channels...")?;
    let mut listing = ChannelListing { api, limit };

    let channels = fetch_all_with(&mut listing, |page, count| {
        spinner.set_message(f!("Fetching channels (page {page}, {count} found)..."));
    })
    .await;

    spinner.finish_and_clear();

    channels.map_err(|source| {
        Error::Retrieval {
            what: "channels",
            source,
        }
        .into()
    })
}

fn format_channels_text(channels: &[&Channel]) -> String {
    if channels.is_empty() {
        return f!("{}\n", "No matching channels.".yellow());
    }

    let mut result = String::new();
    for channel in channels {
        result.push_str(&f!(
            "{} {}\n",
            channel.name.bright_white().bold(),
            f!("(id: {})", channel.id).bright_black()
        ));
    }
    result
}
