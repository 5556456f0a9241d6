//! toolchat CLI entry point

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;
use anyhow::Result;

use toolchat::agent::{AgentLoop, OpenAiCompatClient, Response};
use toolchat::config::Config;
use toolchat::tools::ToolRunner;
use toolchat::ui;

#[derive(Parser)]
#[command(name = "toolchat")]
#[command(about = "Chat with a model that can ask for the time and the weather")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Overrides applied on top of the config file
#[derive(Args, Clone)]
struct EndpointArgs {
    /// Model name
    #[arg(long)]
    model: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask one question and print the final answer
    Ask {
        /// Question to send (prompted for when omitted)
        #[arg(short, long)]
        message: Option<String>,

        /// Print every model round and tool output
        #[arg(short, long)]
        verbose: bool,

        #[command(flatten)]
        endpoint: EndpointArgs,
    },

    /// Ask questions interactively, one conversation per line
    Chat {
        #[command(flatten)]
        endpoint: EndpointArgs,
    },

    /// Write API key and model to the config file
    Onboard,

    /// Show the tool definitions offered to the model
    Tools,

    /// Show configuration status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Onboard => {
            toolchat::config::onboard()?;
        }

        Commands::Ask { message, verbose, endpoint } => {
            let config = resolve_config(&endpoint)?;
            let question = match message {
                Some(msg) => msg,
                None => ui::Input::stdin()
                    .next_question("Enter your question:")?
                    .ok_or_else(|| toolchat::Error::Other("No question given".to_string()))?,
            };

            let response = ask(&config, &question).await?;
            print_response(&response, verbose);
        }

        Commands::Chat { endpoint } => {
            let config = resolve_config(&endpoint)?;
            ui::print_header(&config.model, &config.base_url);
            println!("  Type 'exit' to quit\n");
            run_interactive(&config).await?;
        }

        Commands::Tools => {
            let definitions = ToolRunner::with_defaults().definitions();
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }

        Commands::Status => {
            let config = toolchat::config::load()?;
            println!("toolchat status\n");
            println!("Config: {:?}", toolchat::config::config_path());
            println!("Model: {}", config.model);
            println!("Endpoint: {}", config.base_url);
            println!("Max iterations: {}", config.max_iterations);
            println!(
                "API key: {}",
                if config.api_key.is_empty() { "not set" } else { "✓" }
            );
        }
    }

    Ok(())
}

fn resolve_config(endpoint: &EndpointArgs) -> toolchat::Result<Config> {
    let mut config = toolchat::config::load()?;
    if let Some(model) = &endpoint.model {
        config.model = model.clone();
    }
    if let Some(base_url) = &endpoint.base_url {
        config.base_url = base_url.clone();
    }
    config.validate()?;
    Ok(config)
}

async fn ask(config: &Config, question: &str) -> toolchat::Result<Response> {
    let client = OpenAiCompatClient::from_config(config)?;
    let agent = AgentLoop::new(client, ToolRunner::with_defaults(), config.max_iterations)
        .with_system_prompt(config.system_prompt.clone());

    let spinner = ui::spinner("Waiting for the model");
    let result = agent.run(question).await;
    spinner.finish_and_clear();
    result
}

fn print_response(response: &Response, verbose: bool) {
    if verbose {
        for round in &response.rounds {
            ui::print_round(round);
        }
        let usage = response.total_usage();
        ui::print_step(&format!(
            "{} round(s), {} tokens",
            response.rounds.len(),
            usage.total_tokens
        ));
    }

    if response.answered_directly() {
        println!("{} {}", "No tool needed:".green().bold(), response.content);
    } else {
        println!("{} {}", "Final answer:".green().bold(), response.content);
    }
}

async fn run_interactive(config: &Config) -> Result<()> {
    let mut lines = ui::Input::stdin();

    while let Some(line) = lines.next_line("You:")? {
        let input = line.trim();

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        if input.is_empty() {
            continue;
        }

        match ask(config, input).await {
            Ok(response) => print_response(&response, false),
            Err(toolchat::Error::MaxIterations) => {
                ui::print_warning("The model kept calling tools; giving up on this question")
            }
            Err(e) => ui::print_error(&e.to_string()),
        }
        println!();
    }

    println!("Bye!");
    Ok(())
}
