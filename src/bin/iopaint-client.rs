use argh::FromArgs;
use iopaint_api::{ImageList, InpaintRequest, InpaintResponse};
use std::path::PathBuf;

// defaults for the client
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;

#[derive(FromArgs)]
/// Client for the IOPaint API
struct ClientArgs {
    /// the host to connect to
    #[argh(option, short = 'h', default = "DEFAULT_HOST.to_string()")]
    host: String,

    /// the port to connect to
    #[argh(option, short = 'p', default = "DEFAULT_PORT")]
    port: u16,

    /// command to execute: "run", "list", "fetch" or "health"
    #[argh(subcommand)]
    command: ClientCommands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum ClientCommands {
    Run(RunCommand),
    List(ListCommand),
    Fetch(FetchCommand),
    Health(HealthCommand),
}

#[derive(FromArgs)]
/// Inpaint an image with a mask
#[argh(subcommand, name = "run")]
struct RunCommand {
    /// the path to the image, as seen by the server
    #[argh(option, short = 'i')]
    image: String,

    /// the path to the mask, as seen by the server
    #[argh(option, short = 'm')]
    mask: String,

    /// the output directory, as seen by the server
    #[argh(option, short = 'o')]
    output: String,

    /// the model to use
    #[argh(option, default = "String::from(\"lama\")")]
    model: String,

    /// the device to run on
    #[argh(option, short = 'd', default = "String::from(\"cuda\")")]
    device: String,

    /// keep existing files in the output directory
    #[argh(switch, short = 'k')]
    keep_output: bool,
}

#[derive(FromArgs)]
/// List the images of a directory
#[argh(subcommand, name = "list")]
struct ListCommand {
    /// the directory, as seen by the server
    #[argh(positional)]
    path: String,
}

#[derive(FromArgs)]
/// Download an image
#[argh(subcommand, name = "fetch")]
struct FetchCommand {
    /// the image path, as seen by the server
    #[argh(positional)]
    path: String,

    /// where to write the image
    #[argh(option, short = 'o')]
    out: PathBuf,
}

#[derive(FromArgs)]
/// Check that the server is up
#[argh(subcommand, name = "health")]
struct HealthCommand {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: ClientArgs = argh::from_env();

    let client = reqwest::Client::new();

    // format the host and port
    let addr = format!("{}:{}", args.host, args.port);

    match args.command {
        ClientCommands::Run(run) => {
            let mut request = InpaintRequest::new(run.image, run.mask, run.output);
            request.model = run.model;
            request.device = run.device;
            request.clear_output = !run.keep_output;

            let response = client
                .post(format!("http://{}/api/iopaint", addr))
                .json(&request)
                .send()
                .await?;

            if response.status().is_success() {
                let result = response.json::<InpaintResponse>().await?;
                println!("Result: {}", serde_json::to_string_pretty(&result)?);
            } else {
                print_error(response).await?;
            }
        }
        ClientCommands::List(list) => {
            let response = client
                .get(format!("http://{}/api/list-output", addr))
                .query(&[("path", list.path)])
                .send()
                .await?;

            if response.status().is_success() {
                let result = response.json::<ImageList>().await?;
                for image in result.images {
                    println!("{}", image);
                }
            } else {
                print_error(response).await?;
            }
        }
        ClientCommands::Fetch(fetch) => {
            let response = client
                .get(format!("http://{}/api/serve-image", addr))
                .query(&[("path", fetch.path)])
                .send()
                .await?;

            if response.status().is_success() {
                let bytes = response.bytes().await?;
                tokio::fs::write(&fetch.out, &bytes).await?;
                println!("Wrote {} bytes to {}", bytes.len(), fetch.out.display());
            } else {
                print_error(response).await?;
            }
        }
        ClientCommands::Health(_) => {
            let response = client
                .get(format!("http://{}/health", addr))
                .send()
                .await?;

            let result = response.json::<serde_json::Value>().await?;
            println!("Result: {}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

async fn print_error(response: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = response.status();
    let result = response.json::<serde_json::Value>().await?;
    eprintln!("Error ({}): {}", status, serde_json::to_string_pretty(&result)?);
    Ok(())
}
