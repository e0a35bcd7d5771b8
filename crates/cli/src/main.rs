//! CLI for exercising railway pipelines.
//!
//! `signup`: validate -> parallel directory checks -> create account.
//! `parallel`: fan out simulated operations and report the joint outcome and
//! wall-clock time.

mod render;
mod signup;

use clap::{Parser, Subcommand};
use railway_async::prelude::*;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "railway", version, about = "Railway-oriented pipeline runner")]
struct Cli {
    /// Print outcomes as JSON envelopes.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a signup through validation, directory checks, and creation.
    Signup {
        #[arg(long, env = "RAILWAY_EMAIL")]
        email: String,

        #[arg(long, env = "RAILWAY_NAME")]
        name: String,

        #[arg(long, env = "RAILWAY_AGE")]
        age: u8,

        /// Simulated latency of each directory lookup.
        #[arg(long, env = "RAILWAY_LATENCY_MS", default_value_t = 20)]
        latency_ms: u64,

        /// Cancel the pipeline after this many milliseconds.
        #[arg(long, env = "RAILWAY_DEADLINE_MS")]
        deadline_ms: Option<u64>,
    },

    /// Run simulated operations concurrently and time the joint await.
    Parallel {
        /// Delay of each operation, comma separated.
        #[arg(long, value_delimiter = ',', default_values_t = [50u64, 50, 50])]
        delays_ms: Vec<u64>,

        /// Zero-based indexes of operations that fail.
        #[arg(long, value_delimiter = ',')]
        fail: Vec<usize>,

        /// Cancel outstanding operations after this many milliseconds.
        #[arg(long, env = "RAILWAY_DEADLINE_MS")]
        deadline_ms: Option<u64>,
    },
}

/// Cancels `token` once `deadline_ms` has elapsed.
fn arm_deadline(token: &CancellationToken, deadline_ms: Option<u64>) {
    if let Some(ms) = deadline_ms {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            tracing::warn!(deadline_ms = ms, "deadline reached, cancelling");
            token.cancel();
        });
    }
}

async fn simulated_operation(index: usize, delay_ms: u64, fails: bool) -> Result<u64> {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    failure_if(
        fails,
        delay_ms,
        Error::service_unavailable(format!("operation {index} failed"))
            .with_instance(format!("op-{index}")),
    )
}

fn print_outcome<T>(
    outcome: Result<T>,
    json: bool,
) -> std::result::Result<(), Box<dyn std::error::Error>>
where
    T: serde::Serialize + std::fmt::Debug,
{
    if json {
        println!("{}", render::to_json(&outcome)?);
    } else {
        print!("{}", render::to_text(outcome));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Signup {
            email,
            name,
            age,
            latency_ms,
            deadline_ms,
        } => {
            let t0 = Instant::now();
            let token = CancellationToken::new();
            arm_deadline(&token, deadline_ms);

            let directory = signup::Directory::new(Duration::from_millis(latency_ms));
            let form = signup::SignupForm { email, name, age };
            tracing::info!(email = %form.email, latency_ms, "starting signup");

            let outcome = directory.register(&form, &token).await;
            tracing::info!(
                success = outcome.is_success(),
                elapsed_ms = t0.elapsed().as_millis(),
                "signup finished"
            );
            print_outcome(outcome, cli.json)?;
        }
        Commands::Parallel {
            delays_ms,
            fail,
            deadline_ms,
        } => {
            let t0 = Instant::now();
            let token = CancellationToken::new();
            arm_deadline(&token, deadline_ms);

            tracing::info!(operations = delays_ms.len(), "starting parallel run");
            let operations = delays_ms
                .iter()
                .enumerate()
                .map(|(i, &ms)| simulated_operation(i, ms, fail.contains(&i)));
            let outcome = parallel_all_cancellable(&token, operations).await;

            let elapsed = t0.elapsed();
            let sequential: u64 = delays_ms.iter().sum();
            tracing::info!(
                elapsed_ms = elapsed.as_millis(),
                sequential_ms = sequential,
                "parallel run finished"
            );
            print_outcome(outcome, cli.json)?;
        }
    }

    Ok(())
}
