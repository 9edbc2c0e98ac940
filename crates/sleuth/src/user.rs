use crate::prelude::{println, *};
use crate::slack::{SlackApi, SlackClient, SlackConfig};
use colored::Colorize;
use sleuth_core::message::User;
use sleuth_core::slack::{transform_user_response, UsersInfoResponse};
use sleuth_core::users::{LookupError, UserLookup};

#[derive(Debug, clap::Args, Clone)]
pub struct UserOptions {
    /// User id, e.g. U0123456789
    #[arg(short, long)]
    pub user: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// `users.info` lookups
pub struct SlackUsers<'a, A> {
    api: &'a A,
}

impl<'a, A: SlackApi> SlackUsers<'a, A> {
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }
}

impl<A: SlackApi> UserLookup for SlackUsers<'_, A> {
    async fn lookup(&self, user_id: &str) -> Result<Option<User>, LookupError> {
        let response: UsersInfoResponse = self
            .api
            .call("users.info", &[("user", user_id.to_string())])
            .await
            .map_err(|e| LookupError::Transport {
                user: user_id.to_string(),
                source: e,
            })?;

        transform_user_response(user_id, response)
    }
}

pub async fn run(options: UserOptions, global: crate::Global) -> Result<()> {
    let config = SlackConfig::from_global(&global)?;
    let client = SlackClient::new(&config)?;

    let user = fetch_user_data(&SlackUsers::new(&client), &options.user).await?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&user)?);
    } else {
        print!("{}", format_user_text(&user));
    }

    Ok(())
}

/// Looks up a single user; an unknown id is an error here
pub async fn fetch_user_data<L: UserLookup>(lookup: &L, user_id: &str) -> Result<User> {
    let user = lookup
        .lookup(user_id)
        .await
        .context("Failed to fetch user info")?;

    user.ok_or_else(|| Error::UserNotFound(user_id.to_string()).into())
}

fn format_user_text(user: &User) -> String {
    let mut table = crate::prelude::new_table();
    table.add_row(prettytable::row!["Name".bold().cyan(), user.name]);
    table.add_row(prettytable::row![
        "Real name".bold().cyan(),
        user.real_name.as_deref().unwrap_or("-")
    ]);

    f!(
        "\n{} {}\n\n{}\n",
        "User info".bold().cyan(),
        f!("(id: {})", user.id).bright_black(),
        table
    )
}
