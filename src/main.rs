use std::path::{Path, PathBuf};
use std::time::Duration;

use eyre::{Result, bail};
use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use quotefind::VideoId;
use quotefind::config::Config;
use quotefind::output;
use quotefind::session::{FetchOutcome, FetchRequest, Session};
use quotefind::thumbnail::{self, DOWNLOAD_FAILED_NOTICE};
use quotefind::transcript::{Availability, TranscriptClient, UNAVAILABLE_NOTICE};

mod cli;
mod repl;

use cli::{Cli, OutputFormat};
use repl::Command;

const SUPPORTED_FORMATS: &str = "Supported formats:
  https://www.youtube.com/watch?v=ID
  https://youtu.be/ID
  https://www.youtube.com/embed/ID
  https://www.youtube.com/v/ID";

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("quotefind.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotefind")
        .join("logs")
}

fn build_after_help(service_url: &str) -> String {
    let config_path = quotefind::config::config_path();
    let config_line = if config_path.exists() {
        format!("  \x1b[32m✅\x1b[0m {}", config_path.display())
    } else {
        format!("  \x1b[33m–\x1b[0m {} (not found, using defaults)", config_path.display())
    };

    format!(
        "\nCONFIG:\n{config_line}\n\nTRANSCRIPT SERVICE:\n  {service_url}\n\nLogs are written to: {}",
        log_dir().join("quotefind.log").display()
    )
}

/// How results get printed
struct Ui {
    format: OutputFormat,
    verbose: bool,
}

impl Ui {
    fn results(&self, session: &Session) -> Result<()> {
        let results = session.results();
        match self.format {
            OutputFormat::Text => println!("{}", output::render_results_text(results)),
            OutputFormat::Json => {
                if let Some(id) = session.identifier() {
                    println!("{}", output::render_results_json(id, &session.state().query, results)?);
                }
            }
        }
        Ok(())
    }

    fn cue(&self, cue: &quotefind::player::PlaybackCue) -> Result<()> {
        match self.format {
            OutputFormat::Text => println!("{}", output::render_cue_text(cue)),
            OutputFormat::Json => println!("{}", output::render_cue_json(cue)?),
        }
        Ok(())
    }

    fn thumbnails(&self, id: &VideoId) -> Result<()> {
        let thumbs = thumbnail::thumbnails(id);
        match self.format {
            OutputFormat::Text => println!("{}", output::render_thumbnails_text(&thumbs)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&thumbs)?),
        }
        Ok(())
    }

    fn fetch_outcome(&self, session: &Session, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Ready => {
                let count = session.segments().map(|s| s.len()).unwrap_or(0);
                if self.verbose {
                    eprintln!("Transcript loaded: {count} segments");
                }
            }
            FetchOutcome::Failed => eprintln!("\n{UNAVAILABLE_NOTICE}\n"),
            FetchOutcome::Discarded => {}
        }
    }
}

/// Save every thumbnail tier; failures are reported and skipped
async fn save_thumbnails(client: &reqwest::Client, id: &VideoId, dir: &Path) {
    for thumb in thumbnail::thumbnails(id) {
        match thumbnail::download(client, &thumb, dir).await {
            Ok(path) => println!("Saved {}", path.display()),
            Err(e) => {
                warn!("Thumbnail download failed for {}: {e:#}", thumb.url);
                eprintln!("{DOWNLOAD_FAILED_NOTICE} ({})", thumb.label);
            }
        }
    }
}

async fn run_once(cli: &Cli, ui: &Ui, transcripts: &TranscriptClient, session: &mut Session, url: &str) -> Result<()> {
    let Some(request) = session.set_url(url) else {
        bail!("could not extract video ID from: {url}\n\n{SUPPORTED_FORMATS}");
    };

    if ui.verbose {
        eprintln!("Video: {}", request.identifier);
    }
    if cli.thumbnails {
        ui.thumbnails(&request.identifier)?;
    }
    if let Some(ref dir) = cli.save_thumbnails {
        save_thumbnails(&reqwest::Client::new(), &request.identifier, dir).await;
    }
    if cli.preview {
        if let Some(cue) = session.show_preview() {
            ui.cue(&cue)?;
        }
    }

    let query = match cli.query.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q,
        Some(_) => bail!("search query is empty"),
        None if cli.thumbnails || cli.save_thumbnails.is_some() || cli.preview => return Ok(()),
        None => bail!("no search query provided\n\nUsage: quotefind <URL> <QUERY>\n       quotefind [URL]   (interactive)"),
    };

    let availability = transcripts.fetch(&request.url).await;
    let outcome = session.apply_fetch(&request.identifier, availability);
    ui.fetch_outcome(session, outcome);
    if outcome != FetchOutcome::Ready {
        return Ok(());
    }

    session.submit_query(query);
    ui.results(session)?;

    if let Some(n) = cli.pick {
        match session.select_result(n.saturating_sub(1)) {
            Some(cue) => ui.cue(&cue)?,
            None => eprintln!("No result #{n} to pick"),
        }
    }

    Ok(())
}

fn spawn_fetch(transcripts: &TranscriptClient, request: FetchRequest, tx: &mpsc::UnboundedSender<(VideoId, Availability)>) {
    let client = transcripts.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let availability = client.fetch(&request.url).await;
        if tx.send((request.identifier, availability)).is_err() {
            debug!("Session closed before transcript fetch completed");
        }
    });
}

fn load_url(
    ui: &Ui,
    transcripts: &TranscriptClient,
    session: &mut Session,
    tx: &mpsc::UnboundedSender<(VideoId, Availability)>,
    url: &str,
) {
    match session.set_url(url) {
        Some(request) => {
            eprintln!("Loading transcript for {}...", request.identifier);
            spawn_fetch(transcripts, request, tx);
        }
        None if session.identifier().is_some() => {
            if ui.verbose {
                eprintln!("Already loaded {}", session.identifier().map(|i| i.as_str()).unwrap_or(""));
            }
        }
        None => eprintln!("Not a recognized video URL. {SUPPORTED_FORMATS}"),
    }
}

async fn run_interactive(ui: &Ui, transcripts: &TranscriptClient, session: &mut Session, url: Option<&str>) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<(VideoId, Availability)>();
    let http = reqwest::Client::new();

    eprintln!("{}\n", repl::HELP);
    if let Some(url) = url {
        load_url(ui, transcripts, session, &tx, url);
    }

    let mut stdin = BufReader::new(tokio::io::stdin());
    // read_until keeps partial bytes in `pending` if the fetch branch wins the select
    let mut pending = Vec::new();
    loop {
        tokio::select! {
            read = stdin.read_until(b'\n', &mut pending) => {
                match read {
                    Ok(0) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Stopped reading stdin: {e}");
                        eprintln!("Could not read input: {e}");
                        break;
                    }
                }
                let line = repl::decode_line(&pending);
                pending.clear();
                let command = match repl::parse(&line) {
                    Ok(command) => command,
                    Err(msg) => {
                        eprintln!("{msg}");
                        continue;
                    }
                };
                match command {
                    Command::Quit => break,
                    Command::Empty => {}
                    Command::Help => eprintln!("{}", repl::HELP),
                    Command::Url(url) => load_url(ui, transcripts, session, &tx, &url),
                    Command::Query(query) => {
                        if session.submit_query(&query).is_some() {
                            ui.results(session)?;
                        } else if ui.verbose {
                            eprintln!("Search is unavailable while {}", session.phase());
                        }
                    }
                    Command::Pick(n) => match session.select_result(n - 1) {
                        Some(cue) => ui.cue(&cue)?,
                        None => eprintln!("No result #{n} to pick"),
                    },
                    Command::Preview => match session.show_preview() {
                        Some(cue) => ui.cue(&cue)?,
                        None => eprintln!("Load a video URL first"),
                    },
                    Command::Hide => session.hide_preview(),
                    Command::Thumbnails(dir) => match (session.identifier().cloned(), dir) {
                        (Some(id), Some(dir)) => save_thumbnails(&http, &id, Path::new(&dir)).await,
                        (Some(id), None) => ui.thumbnails(&id)?,
                        (None, _) => eprintln!("Load a video URL first"),
                    },
                    Command::Status => {
                        let id = session.identifier().map(|i| i.to_string()).unwrap_or_else(|| "-".to_string());
                        eprintln!(
                            "video: {id}  state: {}  query: {:?}  results: {}  preview: {}",
                            session.phase(),
                            session.state().query,
                            session.results().len(),
                            session.preview_visible()
                        );
                    }
                }
            }
            Some((identifier, availability)) = rx.recv() => {
                let outcome = session.apply_fetch(&identifier, availability);
                ui.fetch_outcome(session, outcome);
                if outcome == FetchOutcome::Ready {
                    eprintln!("Transcript ready for {identifier}. Enter a search query.");
                }
            }
        }
    }

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_logging()?;

    // Load config file (non-fatal if missing/invalid)
    let config = Config::load().unwrap_or_default();

    let after_help = build_after_help(config.service_url());
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // CLI flags take priority over config
    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(OutputFormat::from_config))
        .unwrap_or(OutputFormat::Text);
    let service_url = cli.service.clone().unwrap_or_else(|| config.service_url().to_string());
    let threshold = cli.threshold.unwrap_or_else(|| config.threshold());
    let timeout = cli.timeout.map(Duration::from_secs).unwrap_or_else(|| config.timeout());
    let limit = cli.limit.or(config.max_results);

    if cli.verbose {
        let config_path = quotefind::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Service: {service_url}");
        debug!("threshold={threshold} timeout={timeout:?} limit={limit:?}");
    }

    if !(0.0..=1.0).contains(&threshold) {
        bail!("threshold must be between 0 and 1, got {threshold}");
    }

    let transcripts = TranscriptClient::new(service_url, timeout)?;
    let mut session = Session::new(threshold, limit);
    let ui = Ui {
        format,
        verbose: cli.verbose,
    };

    match cli.url.as_deref() {
        Some(url) if !cli.interactive => run_once(&cli, &ui, &transcripts, &mut session, url).await,
        url => run_interactive(&ui, &transcripts, &mut session, url).await,
    }
}
