//! runpod-cli: 运行、提交与查询 RunPod 无服务器作业的命令行工具
//!
//! Usage:
//!   runpod-cli run <model> [json]                 Run synchronously (runsync)
//!   runpod-cli submit <model> [json]              Submit without waiting
//!   runpod-cli wait <model> [json]                Submit and poll to completion
//!   runpod-cli status <model> <job-id>            Look up a job
//!   runpod-cli models                             List the model catalog

use anyhow::{anyhow, bail, Context};
use runpod_lib_rust::{ClientConfig, JobRequest, PollConfig, RunMode, RunpodClient};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("runpod_lib_rust=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let outcome = match args[1].as_str() {
        "run" => cmd_job(&args[2..], Some(RunMode::Sync)).await,
        "submit" => cmd_job(&args[2..], Some(RunMode::AsyncNoWait)).await,
        "wait" => cmd_job(&args[2..], Some(RunMode::AsyncWait)).await,
        "status" => cmd_job(&args[2..], None).await,
        "models" => cmd_models(&args[2..]).await,
        "version" | "--version" | "-V" => {
            println!("runpod-cli {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"runpod-cli: RunPod 无服务器作业命令行工具

USAGE:
    runpod-cli <COMMAND> [ARGS] [OPTIONS]

COMMANDS:
    run <model> [json]          Run a job synchronously (runsync)
    submit <model> [json]       Submit a job and return immediately
    wait <model> [json]         Submit a job and poll until it finishes
    status <model> <job-id>     Show the status of a job
    models                      List the model catalog
    version                     Show version information
    help                        Show this help message

    When [json] is omitted, a default input for the model's category is used.

OPTIONS:
    --config <path>             YAML config file
    --poll-ms <ms>              Poll interval (250-10000)
    --timeout-ms <ms>           Wait budget (5000-600000)

ENVIRONMENT:
    RUNPOD_API_KEY              API key
    RUNPOD_BASE_URL             Job API base URL
    RUST_LOG                    Log filter (default runpod_lib_rust=info)"#
    );
}

/// Splits `--flag value` pairs from positional arguments.
fn split_args(args: &[String]) -> anyhow::Result<(Vec<&str>, Vec<(&str, &str)>)> {
    let mut positional = Vec::new();
    let mut flags = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if let Some(name) = arg.strip_prefix("--") {
            let value = iter
                .next()
                .ok_or_else(|| anyhow!("missing value for --{name}"))?;
            flags.push((name, value.as_str()));
        } else {
            positional.push(arg.as_str());
        }
    }
    Ok((positional, flags))
}

fn flag<'a>(flags: &[(&str, &'a str)], name: &str) -> Option<&'a str> {
    flags.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

fn build_client(flags: &[(&str, &str)]) -> anyhow::Result<RunpodClient> {
    let config = match flag(flags, "config") {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::from_env(),
    };
    Ok(RunpodClient::builder().config(config).build()?)
}

async fn cmd_job(args: &[String], mode: Option<RunMode>) -> anyhow::Result<()> {
    let (positional, flags) = split_args(args)?;
    let model = positional
        .first()
        .copied()
        .ok_or_else(|| anyhow!("missing <model>"))?;
    let client = build_client(&flags)?;

    let request = match mode {
        None => {
            let job_id = positional
                .get(1)
                .copied()
                .ok_or_else(|| anyhow!("missing <job-id>"))?;
            JobRequest::status(model, job_id)
        }
        Some(mode) => match positional.get(1) {
            Some(raw) => {
                let input: Value =
                    serde_json::from_str(raw).context("input is not valid JSON")?;
                match mode {
                    RunMode::Sync => JobRequest::sync(model, input),
                    RunMode::AsyncWait => JobRequest::run_and_wait(model, input),
                    RunMode::AsyncNoWait => JobRequest::submit(model, input),
                }
            }
            None => JobRequest::with_default_input(model, mode),
        },
    };

    let request = if flag(&flags, "poll-ms").is_some() || flag(&flags, "timeout-ms").is_some() {
        let base = client.default_poll_config();
        let interval = parse_ms(&flags, "poll-ms", base.poll_interval().as_millis() as u64)?;
        let timeout = parse_ms(&flags, "timeout-ms", base.timeout().as_millis() as u64)?;
        request.with_poll_config(PollConfig::new(interval, timeout))
    } else {
        request
    };

    let result = client.execute(&request).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn cmd_models(args: &[String]) -> anyhow::Result<()> {
    let (_, flags) = split_args(args)?;
    let client = build_client(&flags)?;
    let snapshot = client.models().await;
    println!("source: {:?}", snapshot.source);
    for model in &snapshot.models {
        println!("{:<32} {:<8} {}", model.id, model.category, model.display_name);
    }
    Ok(())
}

fn parse_ms(flags: &[(&str, &str)], name: &str, default: u64) -> anyhow::Result<u64> {
    match flag(flags, name) {
        Some(raw) => match raw.parse::<u64>() {
            Ok(v) => Ok(v),
            Err(_) => bail!("--{name} expects milliseconds, got '{raw}'"),
        },
        None => Ok(default),
    }
}
