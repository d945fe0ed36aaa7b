use argh::FromArgs;
use iopaint_api::{AppState, IopaintCli, serve};

// defaults for the server
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_TOOL: &str = "iopaint";

#[derive(FromArgs)]
/// IOPaint API runs the iopaint command line on request.
struct ServerArgs {
    /// the host to run the server on
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to run the server on
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// the inpainting program to execute
    #[argh(option, short = 't', default = "DEFAULT_TOOL.to_string()")]
    tool: String,

    /// argument passed to the program before `run`, may be repeated
    #[argh(option)]
    tool_arg: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args: ServerArgs = argh::from_env();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    let tool = IopaintCli::new(args.tool).with_args(args.tool_arg);
    log::info!("Inpainting with `{}`", tool.program());

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("Starting the IOPaint API");
    log::info!("Listening on: {}", addr);
    log::info!("Press Ctrl+C to stop the server");

    serve(listener, AppState::new(tool)).await?;

    Ok(())
}
