use chrono::Local;
use dotenvy::dotenv;
use financial_control::{
    config::settings::load_default_settings,
    context::AppContext,
    core::{
        progress::format_budget_usage,
        projection::{ProjectionRequest, format_projection_report},
    },
    errors::{Error, Result},
    session::Session,
    store::SeaOrmStore,
};
use serde::Serialize;
use std::{env, io::Write};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Serialize)]
struct Output<'a> {
    projection: &'a financial_control::core::projection::ProjectionReport,
    budgets: &'a financial_control::core::progress::BudgetUsageSummary,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Settings, database and default categories
    let settings = load_default_settings()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let ctx = AppContext::initialize(settings).await?;

    // 4. Resolve the acting user
    let user_id = env::var("FINANCE_USER_ID")
        .inspect_err(|e| error!("FINANCE_USER_ID not set: {}", e))?;
    let user_id = parse_number(&user_id, "FINANCE_USER_ID")?;
    let session = Session::load(&SeaOrmStore::new(ctx.db.clone()), user_id).await?;

    // 5. Horizon from the first argument, or the configured default
    let horizon_months = match env::args().nth(1) {
        Some(arg) => parse_number(&arg, "horizon")?,
        None => i64::from(ctx.settings.projection.default_horizon_months),
    };

    let service = ctx.projection_service();
    let today = Local::now().date_naive();
    let request = ProjectionRequest {
        user_id: session.require_user_id()?,
        horizon_months,
    };
    let report = service.project_at(request, today).await?;
    let budgets = service.budget_usage_at(request.user_id, today).await?;
    info!("Report ready for user {}", request.user_id);

    let mut stdout = std::io::stdout().lock();
    match env::var("REPORT_FORMAT").as_deref() {
        Ok("json") => {
            let output = Output {
                projection: &report,
                budgets: &budgets,
            };
            serde_json::to_writer_pretty(&mut stdout, &output).map_err(std::io::Error::from)?;
            writeln!(stdout)?;
        }
        _ => {
            write!(stdout, "{}", format_projection_report(&report))?;
            writeln!(stdout)?;
            write!(stdout, "{}", format_budget_usage(&budgets))?;
        }
    }

    Ok(())
}

fn parse_number(value: &str, what: &str) -> Result<i64> {
    value.trim().parse().map_err(|_| Error::InvalidArgument {
        message: format!("{what} must be an integer, got '{value}'"),
    })
}
