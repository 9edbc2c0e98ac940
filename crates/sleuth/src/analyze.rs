use crate::prelude::{println, *};
use crate::slack::{SlackClient, SlackConfig};
use crate::user::SlackUsers;
use colored::Colorize;
use sleuth_core::analyze::{build_report, AnalysisReport};
use sleuth_core::limit::Limit;
use sleuth_core::snapshot;
use sleuth_core::users::{UserCache, UserDisplay, UserLookup};
use std::path::PathBuf;

/// Label for messages that carry no poster
const UNKNOWN_POSTER: &str = "(unknown)";

#[derive(Debug, clap::Args, Clone)]
#[command(after_help = "EXAMPLES:
  # Top 3 of everything:
  sleuth analyze --input january.json

  # Top 10, with message texts and user names resolved through Slack:
  sleuth --verbose analyze --input january.json --limit 10")]
pub struct AnalyzeOptions {
    /// Snapshot written by `sleuth history --output`
    #[arg(short, long)]
    pub input: PathBuf,

    /// Entries shown per section (1-100)
    #[arg(short, long, default_value_t = Limit::DEFAULT)]
    pub limit: Limit,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(options: AnalyzeOptions, global: crate::Global) -> Result<()> {
    let messages = snapshot::load(&options.input).map_err(|source| Error::Snapshot {
        path: options.input.display().to_string(),
        source,
    })?;

    log::info!(
        "Analyzing {} message(s) extracted from {}",
        messages.len(),
        options.input.display()
    );
    log::info!("Limiting statistics to [{}]", options.limit);

    let mut report = build_report(&messages, options.limit, global.verbose);

    if global.verbose {
        match SlackConfig::from_global(&global) {
            Ok(config) => {
                let client = SlackClient::new(&config)?;
                let mut cache = UserCache::new(SlackUsers::new(&client));
                resolve_user_displays(&mut report, &mut cache).await;
            }
            Err(err) => log::warn!("{err}; showing raw user ids"),
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report_text(&report, global.verbose));
    }

    Ok(())
}

/// Fills in display names for every user key in the report
pub async fn resolve_user_displays<L: UserLookup>(
    report: &mut AnalysisReport,
    cache: &mut UserCache<L>,
) {
    for summary in &mut report.mentioned_users {
        summary.display = Some(display_user(cache, &summary.key).await);
    }

    for summary in &mut report.posting_users {
        if let Some(user_id) = &summary.key {
            summary.display = Some(display_user(cache, user_id).await);
        }
    }
}

async fn display_user<L: UserLookup>(cache: &mut UserCache<L>, user_id: &str) -> String {
    match cache.resolve(user_id).await {
        Ok(shown) => shown.to_string(),
        Err(err) => {
            log::warn!("{err}");
            UserDisplay::not_found(user_id).to_string()
        }
    }
}

fn format_report_text(report: &AnalysisReport, verbose: bool) -> String {
    let mut result = String::new();

    result.push_str(&f!(
        "\n{}\n",
        f!(
            "Analyzed {} message(s), showing up to {} per section",
            report.total_messages,
            report.limit
        )
        .bright_cyan()
        .bold()
    ));

    if !report.mentioned_users.is_empty() {
        result.push_str(&f!("\n{}\n", "✅ Most mentioned users:".green().bold()));
        for summary in &report.mentioned_users {
            let user = summary.display.as_deref().unwrap_or(&summary.key);
            result.push_str(&f!(
                "  ℹ️ User [{}] appeared in [{}] message(s)\n",
                user.bright_white(),
                summary.count.to_string().bright_yellow()
            ));
            push_texts(&mut result, &summary.messages, verbose);
        }
    }

    if !report.posting_users.is_empty() {
        result.push_str(&f!("\n{}\n", "✅ Most posting users:".green().bold()));
        for summary in &report.posting_users {
            let user = summary
                .display
                .as_deref()
                .or(summary.key.as_deref())
                .unwrap_or(UNKNOWN_POSTER);
            result.push_str(&f!(
                "  ℹ️ User [{}] posted [{}] message(s)\n",
                user.bright_white(),
                summary.count.to_string().bright_yellow()
            ));
            push_texts(&mut result, &summary.messages, verbose);
        }
    }

    if !report.popular_messages.is_empty() {
        result.push_str(&f!(
            "\n{}\n",
            "✅ Popular messages (based on reactions, replies and reply users count):"
                .green()
                .bold()
        ));
        for ranked in &report.popular_messages {
            result.push_str(&f!(
                "  ℹ️ Reactions score [{}] for message 💬 [{}]\n",
                ranked.score.to_string().bright_yellow(),
                ranked.text
            ));
        }
    }

    if !report.tags.is_empty() {
        result.push_str(&f!(
            "\n{}\n",
            "✅ Messages by tags (replies not included):".green().bold()
        ));
        for summary in &report.tags {
            result.push_str(&f!(
                "  ℹ️ Tag [{}] was used [{}] time(s)\n",
                summary.key.bright_magenta(),
                summary.count.to_string().bright_yellow()
            ));
            push_texts(&mut result, &summary.messages, verbose);
        }
    }

    result.push('\n');
    result
}

fn push_texts(result: &mut String, texts: &[String], verbose: bool) {
    if !verbose {
        return;
    }
    for text in texts {
        result.push_str(&f!("    💬 [{}]\n", text.bright_black()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleuth_core::message::{Message, User};
    use sleuth_core::users::LookupError;
    use std::cell::Cell;

    struct FakeDirectory {
        calls: Cell<usize>,
    }

    impl UserLookup for &FakeDirectory {
        async fn lookup(&self, user_id: &str) -> Result<Option<User>, LookupError> {
            self.calls.set(self.calls.get() + 1);
            match user_id {
                "U1" => Ok(Some(User {
                    id: "U1".to_string(),
                    name: "jdoe".to_string(),
                    real_name: Some("Jane Doe".to_string()),
                })),
                "U500" => Err(LookupError::Remote {
                    user: user_id.to_string(),
                    error: "fatal_error".to_string(),
                }),
                _ => Ok(None),
            }
        }
    }

    fn sample_messages() -> Vec<Message> {
        vec![
            Message::posted_by("U1", "ping <@U2> about #release"),
            Message::posted_by("U1", "ping <@U2> again\nplease"),
            Message::posted_by("U500", "<@U1> #release done"),
            Message::with_text("anonymous note"),
        ]
    }

    #[tokio::test]
    async fn test_resolve_user_displays_uses_cache() {
        let messages = sample_messages();
        let mut report = build_report(&messages, Limit::new(10).unwrap(), true);
        let directory = FakeDirectory {
            calls: Cell::new(0),
        };
        let mut cache = UserCache::new(&directory);

        resolve_user_displays(&mut report, &mut cache).await;

        // U2 and U1 from mentions; U1 again from posters is cached; U500 is looked up once.
        assert_eq!(directory.calls.get(), 3);
        assert_eq!(
            report.mentioned_users[0].display.as_deref(),
            Some("U2 (!Not Found!)")
        );
        assert_eq!(
            report.posting_users[0].display.as_deref(),
            Some("jdoe (Jane Doe)")
        );
    }

    #[tokio::test]
    async fn test_failed_lookup_falls_back_to_not_found() {
        let messages = sample_messages();
        let mut report = build_report(&messages, Limit::new(10).unwrap(), false);
        let directory = FakeDirectory {
            calls: Cell::new(0),
        };
        let mut cache = UserCache::new(&directory);

        resolve_user_displays(&mut report, &mut cache).await;

        let failed = report
            .posting_users
            .iter()
            .find(|s| s.key.as_deref() == Some("U500"))
            .unwrap();
        assert_eq!(failed.display.as_deref(), Some("U500 (!Not Found!)"));

        let anonymous = report.posting_users.iter().find(|s| s.key.is_none()).unwrap();
        assert_eq!(anonymous.display, None);
    }

    #[test]
    fn test_format_report_text_sections() {
        let messages = sample_messages();
        let report = build_report(&messages, Limit::default(), false);

        let text = format_report_text(&report, false);

        assert!(text.contains("Most mentioned users:"));
        assert!(text.contains("Most posting users:"));
        assert!(text.contains("Popular messages"));
        assert!(text.contains("Messages by tags"));
        assert!(text.contains("#release"));
        assert!(text.contains(UNKNOWN_POSTER));
        assert!(!text.contains("    💬 ["));
    }

    #[test]
    fn test_format_report_text_verbose_lists_messages() {
        let messages = sample_messages();
        let report = build_report(&messages, Limit::default(), true);

        let text = format_report_text(&report, true);

        assert!(text.contains("ping <@U2> again please"));
    }

    #[test]
    fn test_format_report_text_omits_empty_sections() {
        let messages = vec![Message::with_text("plain")];
        let report = build_report(&messages, Limit::default(), false);

        let text = format_report_text(&report, false);

        assert!(!text.contains("Most mentioned users:"));
        assert!(!text.contains("Messages by tags"));
        assert!(text.contains("Most posting users:"));
    }
}
