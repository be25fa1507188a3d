//! Terminal front end for the stock screener.

mod logging;
mod render;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use screener::view::write_parquet;
use screener::{
    ClientConfig, DEFAULT_LIMIT, Dispatch, Filter, Pagination, ScreenerError, Session, YearFilter,
};

/// Screen stocks by fundamentals and inspect company financials
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Connection {
    /// Base URL of the screener API
    #[arg(long, global = true, env = screener::API_BASE_ENV, default_value = screener::DEFAULT_API_BASE)]
    api_base: String,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, global = true, env = screener::TIMEOUT_ENV)]
    timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the fields the server can filter on
    Fields,

    /// Run a screen and print the matching companies
    Run {
        /// Filter as `<field><op><value>`, e.g. `sector=Technology` or `pe_ratio<=15`.
        /// Operators: = > < >= <= ~ (contains). Repeat for more filters.
        #[arg(short, long = "filter", required = true)]
        filters: Vec<Filter>,

        /// Maximum number of rows
        #[arg(long, default_value_t = DEFAULT_LIMIT)]
        limit: u32,

        /// Rows to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,

        /// Server-side column projection
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,

        /// Columns to display (default: all)
        #[arg(long, value_delimiter = ',')]
        show: Option<Vec<String>>,

        /// Write the displayed table to a parquet file
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Show one company's profile and financial statements
    Company {
        /// Ticker symbol
        symbol: String,

        /// Restrict statements to one fiscal year
        #[arg(long)]
        year: Option<i32>,

        /// Show only this statement, e.g. `income_statement`
        #[arg(long)]
        statement: Option<String>,

        /// Write the shown statement pivots to parquet files in this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

impl Connection {
    fn session(&self) -> screener::Result<Session> {
        let mut config = ClientConfig::new(&self.api_base)?;
        if let Some(secs) = self.timeout {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Session::with_http(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    logging::init_logging();

    let cli = Cli::parse();
    tracing::debug!(?cli, "Parsed arguments");
    let mut session = cli.connection.session()?;

    match cli.command {
        Command::Fields => fields(&mut session).await,
        Command::Run {
            filters,
            limit,
            offset,
            columns,
            show,
            export,
        } => {
            let page = Pagination::new(limit, offset);
            run(&mut session, filters, page, columns, show, export).await
        }
        Command::Company {
            symbol,
            year,
            statement,
            export,
        } => company(&mut session, &symbol, year, statement.as_deref(), export).await,
    }
}

/// Prints the pending notification to stderr and reports whether it was an error.
fn report(session: &mut Session) -> bool {
    let state = session.state_mut();
    let failed = state
        .notification()
        .is_some_and(|n| n.severity == screener::Severity::Error);
    if let Some(note) = state.notification() {
        eprintln!("{note}");
    }
    state.dismiss_notification();
    failed
}

fn failure(what: &str) -> Box<dyn std::error::Error> {
    Box::new(ScreenerError::Other(format!("{what} failed")))
}

async fn fields(session: &mut Session) -> Result<(), Box<dyn std::error::Error>> {
    session.load_fields().await;
    if report(session) {
        return Err(failure("Loading fields"));
    }
    for field in session.state_mut().fields() {
        println!("{field}");
    }
    Ok(())
}

async fn run(
    session: &mut Session,
    filters: Vec<Filter>,
    page: Pagination,
    columns: Option<Vec<String>>,
    show: Option<Vec<String>>,
    export: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Without a field list the filters go out unchecked.
    session.load_fields().await;
    report(session);

    let state = session.state_mut();
    for filter in filters {
        state.push_filter(filter)?;
    }
    state.set_page(page);
    state.set_requested_columns(columns);

    if session.run_query().await == Dispatch::Refused || report(session) {
        return Err(failure("Query"));
    }

    let state = session.state_mut();
    if let Some(show) = show {
        let unknown = state.show_columns(&show)?;
        if !unknown.is_empty() {
            eprintln!("Unknown columns ignored: {}", unknown.join(", "));
        }
    }

    print!("{}", render::results(&state.results_panel()));

    if let Some(path) = export {
        let mut df = state.result_table().to_dataframe()?;
        let bytes = write_parquet(&mut df, &path)?;
        tracing::info!(path = %path.display(), bytes, "Exported results");
    }
    Ok(())
}

async fn company(
    session: &mut Session,
    symbol: &str,
    year: Option<i32>,
    statement: Option<&str>,
    export: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if session.open_symbol(symbol).await == Dispatch::Refused || report(session) {
        return Err(failure("Loading company"));
    }
    let Some(view) = session.state_mut().detail_mut() else {
        return Err(failure("Loading company"));
    };

    if let Some(year) = year {
        view.select_year(YearFilter::Year(year));
    }
    print!("{}", render::summary(&view.summary()));

    if !view.has_financials() {
        println!("\nNo financial data available");
        return Ok(());
    }

    let pivots = match statement {
        Some(name) => {
            if !view.select_statement(name) {
                let available = view.statement_types().join(", ");
                return Err(Box::new(ScreenerError::InvalidParameter(format!(
                    "No {name} for the selected year. Available: {available}"
                ))));
            }
            view.active_pivot().into_iter().collect()
        }
        None => view.pivots(),
    };

    for pivot in &pivots {
        println!();
        print!("{}", render::pivot(pivot));
    }

    if let Some(dir) = export {
        for pivot in &pivots {
            let path = dir.join(format!("{symbol}_{}.parquet", pivot.statement));
            let mut df = pivot.to_dataframe()?;
            let bytes = write_parquet(&mut df, &path)?;
            tracing::info!(path = %path.display(), bytes, "Exported statement");
        }
    }
    Ok(())
}
