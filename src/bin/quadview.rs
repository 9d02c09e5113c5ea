use std::collections::BTreeMap;
use std::io::{BufRead as _, Write as _};
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use quadview::{
    BrandAssets, CastSlot, ClientMessage, Color, LayoutOpts, LayoutSession, Participant, PeerId,
    RecordingHost, Relay, ServerMessage, ViewportMetrics,
};

#[derive(Parser, Debug)]
#[command(name = "quadview", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose a layout against a recording host and dump each quadrant as PNG.
    Render(RenderArgs),
    /// Replay a JSONL script of client messages through an in-process relay.
    Relay(RelayArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Layout options JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Layout input JSON (viewport, participants, cast, color, topic).
    #[arg(long)]
    layout: PathBuf,

    /// Directory receiving `quadrant-<i>.png`.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RelayArgs {
    /// JSONL script, one `{"peer": n, "message": {...}}` or `{"peer": n, "disconnect": true}`
    /// per line.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LayoutInput {
    viewport: ViewportMetrics,
    #[serde(default)]
    user: Option<Participant>,
    #[serde(default)]
    participants: Vec<Participant>,
    /// Falls back to the roster's default cast.
    #[serde(default)]
    cast: Option<Vec<CastSlot>>,
    #[serde(default)]
    color: Option<Color>,
    #[serde(default)]
    topic: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct ScriptLine {
    peer: u64,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    disconnect: bool,
}

#[derive(serde::Serialize, Debug)]
struct OutputLine<'a> {
    peer: u64,
    message: &'a ServerMessage,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Relay(args) => cmd_relay(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = match &args.config {
        Some(p) => LayoutOpts::from_path(p)?,
        None => LayoutOpts::default(),
    }
    .with_env_overrides();
    opts.validate()?;

    let input: LayoutInput = {
        let bytes = std::fs::read(&args.layout)
            .with_context(|| format!("read layout '{}'", args.layout.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse layout '{}'", args.layout.display()))?
    };

    let assets = BrandAssets::load(&opts);
    for failure in assets.failures() {
        eprintln!("warning: {failure}");
    }

    let mut host = RecordingHost::new();
    if let Some(user) = input.user {
        host = host.with_user(user);
    }
    if !input.participants.is_empty() {
        host = host.with_participants(input.participants);
    }

    let mut session = LayoutSession::new(host, opts, &assets, input.viewport)?;
    session.init()?;
    let cast = input.cast.unwrap_or_else(|| session.default_cast());
    session.set_cast(cast)?;
    if let Some(color) = input.color {
        session.set_color(color)?;
    }
    if let Some(topic) = input.topic {
        session.set_topic(topic)?;
    }
    session.start()?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for op in session.host().live_images().values() {
        let out = args.out_dir.join(format!("quadrant-{}.png", op.quadrant));
        let straight = unpremultiply(&op.pixels.data);
        image::save_buffer_with_format(
            &out,
            &straight,
            op.pixels.width,
            op.pixels.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }

    let log = serde_json::to_string_pretty(session.host().calls())?;
    println!("{log}");
    Ok(())
}

fn cmd_relay(args: RelayArgs) -> anyhow::Result<()> {
    let file = std::fs::File::open(&args.in_path)
        .with_context(|| format!("open relay script '{}'", args.in_path.display()))?;

    let mut relay = Relay::new();
    let mut peers: BTreeMap<u64, PeerId> = BTreeMap::new();
    let mut names: BTreeMap<PeerId, u64> = BTreeMap::new();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for (lineno, line) in std::io::BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("read line {}", lineno + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: ScriptLine = serde_json::from_str(&line)
            .with_context(|| format!("parse line {}", lineno + 1))?;

        let peer = *peers.entry(entry.peer).or_insert_with(|| {
            let id = relay.connect();
            names.insert(id, entry.peer);
            id
        });

        let outgoing = if entry.disconnect {
            peers.remove(&entry.peer);
            relay.disconnect(peer)
        } else if let Some(raw) = entry.message {
            match serde_json::from_value::<ClientMessage>(raw) {
                Ok(msg) => relay.handle(peer, msg)?,
                Err(e) => {
                    tracing::warn!(line = lineno + 1, error = %e, "skipping malformed message");
                    continue;
                }
            }
        } else {
            Vec::new()
        };

        for o in &outgoing {
            let Some(&n) = names.get(&o.to) else {
                continue;
            };
            let json = serde_json::to_string(&OutputLine {
                peer: n,
                message: &o.message,
            })?;
            writeln!(out, "{json}")?;
        }
    }
    Ok(())
}

/// Premultiplied RGBA8 to straight alpha for PNG output.
fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}
