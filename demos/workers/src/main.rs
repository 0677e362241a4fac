use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use wws_util::{
    request::{build_request, RequestParams},
    Configuration, Error,
};

use workers_demo::{types, Human_ResourcesClient};

/// Lists Workday workers. Credentials come from the `WWS_*` environment.
#[derive(StructOpt)]
struct Args {
    /// Workers per page.
    #[structopt(short, long, default_value = "50")]
    count: u32,

    #[structopt(short, long, default_value = "1")]
    page: u32,

    /// Only these employee ids.
    employee_ids: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::from_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let client = Human_ResourcesClient::new(&Configuration::from_env())?;

    let timestamp = client
        .Get_Server_Timestamp(&types::Server_Timestamp_Get)
        .await?;
    info!(timestamp = %timestamp.data, "connected");

    let mut params = RequestParams::new().page(args.page).count(args.count);
    if !args.employee_ids.is_empty() {
        params = params.references("Employee_ID", args.employee_ids);
    }

    let response = client
        .Get_Workers(&build_request::<types::Get_Workers_Request>(&params)?)
        .await?;

    for worker in &response.workers {
        println!(
            "{}\t{}",
            worker.worker_id.as_deref().unwrap_or("-"),
            worker.descriptor.as_deref().unwrap_or("")
        );
    }

    println!(
        "page {} of {} ({} workers)",
        response.page, response.total_pages, response.total_results
    );

    Ok(())
}
