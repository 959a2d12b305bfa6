use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "titlecard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an animated MP4 title card (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render a single still PNG card.
    Still(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Request JSON file; flags below are ignored when set.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Text to render (required unless --in is given).
    #[arg(long)]
    text: Option<String>,

    #[arg(long, value_enum, default_value_t = DirectionChoice::Auto)]
    direction: DirectionChoice,

    #[arg(long, default_value_t = 1920)]
    width: u32,

    #[arg(long, default_value_t = 1080)]
    height: u32,

    #[arg(long, default_value_t = 24)]
    fps: u32,

    /// Requested clip duration, seconds (extended if the fades need more).
    #[arg(long, default_value_t = 5.0)]
    total_dur: f64,

    /// Delay between consecutive characters, seconds.
    #[arg(long, default_value_t = 0.06)]
    letter_delay: f64,

    /// Per-character fade-in duration, seconds.
    #[arg(long, default_value_t = 0.35)]
    fade_dur: f64,

    #[arg(long, default_value_t = 40)]
    rise_px: i32,

    #[arg(long, default_value_t = 30)]
    x_slide_px: i32,

    #[arg(long, default_value_t = 96)]
    font_size: u32,

    /// Font file; falls back to $FONT_FILE, then the bundled font.
    #[arg(long)]
    font_file: Option<PathBuf>,

    /// Output directory for finished cards.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionChoice {
    Auto,
    Ltr,
    Rtl,
}

impl From<DirectionChoice> for titlecard::Direction {
    fn from(c: DirectionChoice) -> Self {
        match c {
            DirectionChoice::Auto => Self::Auto,
            DirectionChoice::Ltr => Self::Ltr,
            DirectionChoice::Rtl => Self::Rtl,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => run(args, titlecard::render_title_card),
        Command::Still(args) => run(args, titlecard::render_still_card),
    }
}

fn run(
    args: RenderArgs,
    render: fn(
        &titlecard::CardRequest,
        &titlecard::RenderConfig,
    ) -> titlecard::CardResult<titlecard::RenderedCard>,
) -> anyhow::Result<()> {
    let req = build_request(&args)?;
    let cfg = titlecard::RenderConfig::resolve(&args.out_dir, args.font_file.clone());
    let card = render(&req, &cfg)?;
    eprintln!("wrote {}", card.path.display());
    Ok(())
}

fn build_request(args: &RenderArgs) -> anyhow::Result<titlecard::CardRequest> {
    if let Some(in_path) = &args.in_path {
        return read_request_json(in_path);
    }

    let text = args
        .text
        .clone()
        .context("either --in or --text is required")?;

    let mut req = titlecard::CardRequest::new(text);
    req.direction = args.direction.into();
    req.width = args.width;
    req.height = args.height;
    req.fps = args.fps;
    req.total_dur = args.total_dur;
    req.letter_delay = args.letter_delay;
    req.fade_dur = args.fade_dur;
    req.rise_px = args.rise_px;
    req.x_slide_px = args.x_slide_px;
    req.font_size = args.font_size;
    Ok(req)
}

fn read_request_json(path: &Path) -> anyhow::Result<titlecard::CardRequest> {
    let f = File::open(path).with_context(|| format!("open request '{}'", path.display()))?;
    let r = BufReader::new(f);
    let req: titlecard::CardRequest =
        serde_json::from_reader(r).with_context(|| "parse request JSON")?;
    Ok(req)
}
