//! Pasar command-line tool
//!
//! Builds the content-store query for a listing request and prints it as
//! JSON, so filters can be checked without a running site.
//!
//! Usage:
//!   pasar build --query "q=tomato&category=5&page=2"
//!   pasar normalize --page abc --sort -price

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pasar_kernel::{
    Config, ListingParams, ListingQuery, Role, Viewer, pagination_params, sort_params,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a full listing query from a raw query string.
    Build {
        /// Raw query string, e.g. "q=tomato&category=5&page=2".
        #[arg(long, default_value = "")]
        query: String,

        /// Field matched by the search text.
        #[arg(long, default_value = "name")]
        search_field: String,

        /// Field matched by the category parameter.
        #[arg(long, default_value = "category")]
        category_field: String,

        /// Status field restricting non-admins to published content.
        #[arg(long)]
        status_field: Option<String>,

        /// Owner field letting members see their own drafts.
        #[arg(long)]
        owner_field: Option<String>,

        /// Role of the viewer.
        #[arg(long, value_enum, default_value = "guest")]
        role: RoleArg,

        /// User id of the viewer.
        #[arg(long)]
        user: Option<String>,

        /// Page size; overrides any `limit` in the query string.
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Normalize raw page and sort parameters.
    Normalize {
        /// Raw page parameter.
        #[arg(long)]
        page: Option<String>,

        /// Raw sort parameter (`-field` for descending).
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<String>,

        /// Page size.
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RoleArg {
    Guest,
    Member,
    Admin,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Guest => Role::Guest,
            RoleArg::Member => Role::Member,
            RoleArg::Admin => Role::Admin,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    info!(
        page_size = config.page_size,
        sort_field = %config.sort_field,
        "Configuration loaded"
    );

    let output = run(args.command, &config)?;

    let rendered = if args.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("failed to render output")?;
    println!("{rendered}");

    Ok(())
}

fn run(command: Command, config: &Config) -> Result<serde_json::Value> {
    match command {
        Command::Build {
            query,
            search_field,
            category_field,
            status_field,
            owner_field,
            role,
            user,
            limit,
        } => {
            let mut params = ListingParams::from_query_str(&query)
                .with_context(|| format!("failed to parse query string '{query}'"))?;
            if let Some(limit) = limit {
                params.limit = Some(limit.to_string());
            }

            let mut listing = ListingQuery::new(search_field, category_field);
            if let Some(field) = status_field {
                listing = listing.with_status_field(field);
            }
            if let Some(field) = owner_field {
                listing = listing.with_owner_field(field);
            }
            let viewer = Viewer {
                user_id: user,
                role: role.into(),
            };

            serde_json::to_value(listing.build(&params, &viewer, config))
                .context("failed to encode query")
        }
        Command::Normalize { page, sort, limit } => {
            let pagination = pagination_params(
                page.as_deref(),
                config.default_page,
                config.clamp_limit(limit),
            );
            let sort = sort_params(sort.as_deref(), &config.sort_field, config.sort_order);
            Ok(json!({
                "page": pagination.page,
                "limit": pagination.limit,
                "offset": pagination.offset(),
                "sort": sort,
            }))
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn run_args(argv: &[&str]) -> serde_json::Value {
        let args = Args::try_parse_from(argv.iter().copied()).unwrap();
        run(args.command, &Config::default()).unwrap()
    }

    #[test]
    fn build_parses_flags() {
        let args = Args::try_parse_from([
            "pasar",
            "build",
            "--query",
            "q=tomato",
            "--role",
            "member",
            "--user",
            "u-1",
            "--limit",
            "25",
            "--pretty",
        ])
        .unwrap();

        assert!(args.pretty);
        match args.command {
            Command::Build {
                query,
                role,
                user,
                limit,
                search_field,
                ..
            } => {
                assert_eq!(query, "q=tomato");
                assert!(matches!(role, RoleArg::Member));
                assert_eq!(user.as_deref(), Some("u-1"));
                assert_eq!(limit, Some(25));
                assert_eq!(search_field, "name");
            }
            Command::Normalize { .. } => panic!("expected build"),
        }
    }

    #[test]
    fn build_limit_flag_overrides_query_and_is_clamped() {
        let out = run_args(&["pasar", "build", "--query", "q=tomato&limit=5", "--limit", "30"]);
        assert_eq!(out["limit"], 30);
        assert_eq!(out["where"], json!({ "name": { "like": "tomato" } }));

        let out = run_args(&["pasar", "build", "--limit", "5000"]);
        assert_eq!(out["limit"], Config::default().max_page_size);

        let out = run_args(&["pasar", "build", "--query", "limit=5"]);
        assert_eq!(out["limit"], 5);
    }

    #[test]
    fn build_applies_visibility_for_role() {
        let guest = run_args(&["pasar", "build", "--status-field", "_status"]);
        assert_eq!(guest["where"], json!({ "_status": { "equals": "published" } }));

        let admin = run_args(&["pasar", "build", "--status-field", "_status", "--role", "admin"]);
        assert_eq!(admin["where"], json!({}));
    }

    #[test]
    fn normalize_accepts_descending_sort() {
        let out = run_args(&["pasar", "normalize", "--page", "3", "--sort", "-price"]);
        assert_eq!(
            out,
            json!({ "page": 3, "limit": 10, "offset": 20, "sort": { "price": -1 } })
        );
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(Args::try_parse_from(["pasar", "build", "--role", "owner"]).is_err());
    }

    #[test]
    fn bad_query_string_is_an_error() {
        let args = Args::try_parse_from(["pasar", "build", "--query", "q=a&q=b"]).unwrap();
        assert!(run(args.command, &Config::default()).is_err());
    }
}
