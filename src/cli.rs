// command line interface

use crate::{Answer, Db, Output, Poll, Server, VoteChange, Voter};
use clap::{Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pollvote", about = "Track votes on chat poll answers")]
struct Cli {
    /// database connection url
    #[arg(
        long,
        short,
        env = "DATABASE_URL",
        default_value = "sqlite://polls.db",
        global = true
    )]
    db: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// add an answer option to a poll
    AddAnswer {
        /// poll id
        #[arg(long, short)]
        poll: i64,

        /// answer text
        text: String,
    },

    /// cast a vote, or take it back if it was already cast
    Vote {
        #[arg(long, short)]
        poll: i64,

        #[arg(long, short)]
        answer: i64,

        /// voter's chat user id
        #[arg(long)]
        user_id: i64,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        username: Option<String>,
    },

    /// print the rendered tally of a poll
    Show {
        #[arg(long, short)]
        poll: i64,
    },

    /// export who voted for what as json
    Stats {
        #[arg(long, short)]
        poll: i64,

        /// single line json
        #[arg(long)]
        raw: bool,
    },

    /// start as http server
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let db = Db::connect(&cli.db).await?;

    match cli.command {
        Commands::AddAnswer { poll, text } => {
            let mut answer = Answer::new(&poll, text);
            let id = answer.store(&db).await?;
            println!("added answer {id} to poll {poll}");
        }

        Commands::Vote {
            poll,
            answer,
            user_id,
            first_name,
            last_name,
            username,
        } => {
            let voter = Voter {
                id: user_id,
                first_name,
                last_name,
                username,
            };

            let mut loaded = Poll::load(&db, poll).await?;
            match loaded.toggle_vote(&db, answer, voter).await? {
                VoteChange::Cast => {
                    let text = loaded.answer(answer).map(|a| a.text.as_str()).unwrap_or("");
                    println!("you voted for '{text}'.");
                }
                VoteChange::Retracted => println!("you took your reaction back."),
            }
            Output::pretty(&loaded);
        }

        Commands::Show { poll } => {
            let loaded = Poll::load(&db, poll).await?;
            Output::pretty(&loaded);
        }

        Commands::Stats { poll, raw } => {
            let loaded = Poll::load(&db, poll).await?;
            Output::stats(&loaded.stats(), raw);
        }

        Commands::Serve { port, host } => {
            Server::run(db, &host, port).await?;
        }
    }

    Ok(())
}

// RUST_LOG wins, otherwise info and up
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
