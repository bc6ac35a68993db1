use anyhow::Result;
use clap::Parser;
use moltbook::api::{CommentSort, PostSort, SearchType};
use moltbook::commands::{self, CliOptions, Config, OutputFormat};

/// moltbook - explore Moltbook from the terminal
///
/// Reads the API key from MOLTBOOK_API_KEY, or from
/// ~/.config/moltbook/credentials.json ({"api_key":"moltbook_sk_..."}).
///
/// MOLTBOOK_TIMEOUT_MS and MOLTBOOK_RETRIES tune the per-attempt timeout
/// and the number of retries on transient failures.
///
/// Examples:
///   moltbook posts hot --limit 5
///   moltbook --json --pretty posts get <POST_ID>
#[derive(Parser, Debug)]
#[command(author, version = env!("MOLTBOOK_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output raw JSON
    #[arg(long, global = true)]
    json: bool,

    /// Pretty-print JSON (only with --json)
    #[arg(long, global = true)]
    pretty: bool,

    /// API origin (defaults to https://www.moltbook.com)
    #[arg(long = "api-url", value_name = "URL", global = true)]
    api_url: Option<String>,

    /// Per-attempt timeout in milliseconds (overrides MOLTBOOK_TIMEOUT_MS)
    #[arg(
        long = "timeout-ms",
        value_name = "MS",
        global = true,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_ms: Option<u64>,

    /// Retries on transient failures (overrides MOLTBOOK_RETRIES)
    #[arg(long, value_name = "N", global = true)]
    retries: Option<u32>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Auth helpers
    #[command(subcommand)]
    Auth(AuthCommands),

    /// Browse posts
    #[command(subcommand)]
    Posts(PostsCommands),

    /// Get comments for a post
    Comments(CommentsArgs),

    /// Semantic search
    Search(SearchArgs),
}

#[derive(clap::Subcommand, Debug)]
enum AuthCommands {
    /// Check your auth + claim status
    Status,
}

#[derive(clap::Subcommand, Debug)]
enum PostsCommands {
    /// List hot posts
    Hot(ListArgs),
    /// List new posts
    New(ListArgs),
    /// List top posts
    Top(ListArgs),
    /// Get a post by id
    Get(PostArgs),
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    /// Number of posts (1-50)
    #[arg(long, value_name = "N", default_value = "10", allow_hyphen_values = true)]
    limit: String,
}

#[derive(clap::Args, Debug)]
struct PostArgs {
    #[arg(value_name = "POST_ID")]
    post_id: String,
}

#[derive(clap::Args, Debug)]
struct CommentsArgs {
    #[arg(value_name = "POST_ID")]
    post_id: String,

    /// Sort order
    #[arg(long, value_enum, default_value_t = CommentSort::Top)]
    sort: CommentSort,

    /// Max comments, applied client-side (1-200)
    #[arg(long, value_name = "N", default_value = "20", allow_hyphen_values = true)]
    limit: String,
}

#[derive(clap::Args, Debug)]
struct SearchArgs {
    #[arg(value_name = "QUERY")]
    query: String,

    /// Search type
    #[arg(long = "type", value_enum, default_value_t = SearchType::All)]
    kind: SearchType,

    /// Max results (1-50)
    #[arg(long, value_name = "N", default_value = "10", allow_hyphen_values = true)]
    limit: String,
}

impl Cli {
    fn options(&self) -> CliOptions {
        CliOptions {
            api_url: self.api_url.clone(),
            timeout_ms: self.timeout_ms,
            retries: self.retries,
            output: OutputFormat::from_flags(self.json, self.pretty),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = moltbook::runtime::RealRuntime;
    let config = Config::new(&runtime, &cli.options())?;

    let output = match &cli.command {
        Commands::Auth(AuthCommands::Status) => commands::auth_status(&config).await?,
        Commands::Posts(PostsCommands::Hot(args)) => {
            commands::posts_list(&config, PostSort::Hot, &args.limit).await?
        }
        Commands::Posts(PostsCommands::New(args)) => {
            commands::posts_list(&config, PostSort::New, &args.limit).await?
        }
        Commands::Posts(PostsCommands::Top(args)) => {
            commands::posts_list(&config, PostSort::Top, &args.limit).await?
        }
        Commands::Posts(PostsCommands::Get(args)) => {
            commands::post_get(&config, &args.post_id).await?
        }
        Commands::Comments(args) => {
            commands::comments(&config, &args.post_id, args.sort, &args.limit).await?
        }
        Commands::Search(args) => {
            commands::search(&config, &args.query, args.kind, &args.limit).await?
        }
    };

    println!("{}", output);
    Ok(())
}
