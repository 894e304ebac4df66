use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use serde_json::Value;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use voip_signaling::CodecConfig;
use voip_signaling::voip::{
    CallAnswer, CallHangup, CallOffer, CallRinging, CandidateSet, FeatureList, VoipCallData,
};

#[derive(Parser)]
#[command(name = "voip_codec")]
#[command(about = "Call signaling payload inspection tool")]
#[command(
    long_about = "Decodes and validates call signaling JSON payloads, then prints the typed value and its re-encoded form"
)]
struct Cli {
    /// Decode out-of-range reject reasons as UNKNOWN instead of failing.
    #[arg(long)]
    lenient_reject_reasons: bool,

    /// Fail ICE candidate payloads that omit the `removed` flag.
    #[arg(long)]
    require_removed: bool,

    /// Only print the re-encoded JSON.
    #[arg(short, long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode one payload (read from stdin when FILE is omitted).
    Decode {
        #[arg(short, long, value_enum)]
        kind: PayloadKind,
        file: Option<PathBuf>,
    },
    /// Decode a bare feature object.
    Features { file: Option<PathBuf> },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PayloadKind {
    Offer,
    Answer,
    Candidates,
    Hangup,
    Ringing,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{:<5}] [{}] - {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    let config = CodecConfig {
        lenient_reject_reasons: cli.lenient_reject_reasons,
        require_removed_flag: cli.require_removed,
    };

    match cli.command {
        Commands::Decode { kind, file } => {
            let input = read_input(file.as_deref())?;
            match kind {
                PayloadKind::Offer => decode::<CallOffer>(&input, &config, cli.json),
                PayloadKind::Answer => decode::<CallAnswer>(&input, &config, cli.json),
                PayloadKind::Candidates => decode::<CandidateSet>(&input, &config, cli.json),
                PayloadKind::Hangup => decode::<CallHangup>(&input, &config, cli.json),
                PayloadKind::Ringing => decode::<CallRinging>(&input, &config, cli.json),
            }
        }
        Commands::Features { file } => {
            let input = read_input(file.as_deref())?;
            inspect_features(&input, cli.json)
        }
    }
}

fn read_input(file: Option<&Path>) -> Result<String, anyhow::Error> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => std::io::read_to_string(std::io::stdin()).context("reading stdin"),
    }
}

fn decode<T>(input: &str, config: &CodecConfig, json_output: bool) -> Result<(), anyhow::Error>
where
    T: VoipCallData + Debug,
{
    let payload = T::parse_with_config(input, config)?;
    if !json_output {
        info!("[cid={}]: payload is valid", payload.call_id_or_default(0));
        info!("{payload:#?}");
    }
    println!("{}", payload.to_json_string()?);
    Ok(())
}

fn inspect_features(input: &str, json_output: bool) -> Result<(), anyhow::Error> {
    let value: Value = serde_json::from_str(input).context("parsing feature json")?;
    let features = FeatureList::parse(&value)?;
    if !json_output {
        info!("{features}");
    }
    println!("{}", features.to_json()?);
    Ok(())
}
