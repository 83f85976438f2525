mod command;

use clap::Parser;
use command::Command;
use sketch_relay::client::{RelayClient, RelayEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sketch-client", about = "Terminal client for the sketch relay")]
struct Args {
    /// Relay WebSocket URL
    #[arg(short, long, env = "RELAY_URL", default_value = "ws://127.0.0.1:12000")]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let (client, mut events) = RelayClient::connect(&args.url).await?;
    println!("Connected to {}", args.url);
    println!("Commands: draw <x1> <y1> <x2> <y2> | guess <text> | <text>");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            event = events.recv() => {
                match event {
                    Some(RelayEvent::SecretWord(word)) => println!("The secret word is: {word}"),
                    Some(RelayEvent::RemoteStroke(stroke)) => println!("stroke {stroke}"),
                    Some(RelayEvent::GuessResult(true)) => println!("Correct!"),
                    Some(RelayEvent::GuessResult(false)) => println!("Wrong guess!"),
                    Some(RelayEvent::ConnectionLost) | None => {
                        println!("Connection lost.");
                        break;
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(Command::Draw(stroke))) => client.send_stroke(stroke).await?,
                    Ok(Some(Command::Guess(text))) => {
                        client.send_guess(&text).await?;
                    }
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                }
            }
        }
    }

    client.close().await;
    Ok(())
}
