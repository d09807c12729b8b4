use std::path::{Path, PathBuf};

use clap::Parser;

use wwdc_dl::{
    Config, Error, PatternSet, Result, SessionOutcome, SubtitleLanguage, VideoQuality,
    WwdcDownloader, Year,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Conference year, e.g. 2019 or wwdc2019
    #[arg(short, long, default_value = "2024")]
    year: String,

    /// Session IDs to download (defaults to every session of the year)
    #[arg(short, long, value_name = "ID", num_args = 1..)]
    sessions: Option<Vec<String>>,

    /// Subtitle language: eng, chs or jpn
    #[arg(short, long, default_value = "eng")]
    language: String,

    /// List the year's sessions instead of downloading
    #[arg(long)]
    list: bool,

    /// Tag output filenames for SD video instead of HD
    #[arg(long)]
    sd: bool,

    /// Output directory for the .srt files
    #[arg(short, long, default_value = ".")]
    path: PathBuf,

    /// JSON file with replacement extraction patterns
    #[arg(long, value_name = "FILE")]
    patterns: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wwdc_dl=info".into()),
        )
        .init();

    let args = Args::parse();

    if let Err(e) = run(args).await {
        eprintln!("error: {e}");
        if let Some(hint) = hint_for(&e) {
            eprintln!("{hint}");
        }
        std::process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}

async fn run(args: Args) -> Result<()> {
    let list_only = args.list;
    let config = build_config(args)?;
    let downloader = WwdcDownloader::new(config)?;

    if list_only {
        for (id, title) in downloader.list_sessions().await? {
            println!("{id}  {title}");
        }
        return Ok(());
    }

    let reports = downloader.run().await?;

    let mut written = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for report in &reports {
        match &report.outcome {
            SessionOutcome::Written(_) => written += 1,
            SessionOutcome::SkippedExisting(_) => skipped += 1,
            SessionOutcome::NoResources => {}
            SessionOutcome::Failed(_) => failed += 1,
        }
    }
    println!("{written} written, {skipped} already present, {failed} failed");
    Ok(())
}

fn build_config(args: Args) -> Result<Config> {
    let year: Year = args.year.parse()?;
    let language: SubtitleLanguage = args.language.parse()?;
    let patterns = match &args.patterns {
        Some(path) => load_patterns(path)?,
        None => PatternSet::builtin(),
    };

    Ok(Config {
        year,
        session_ids: args.sessions,
        language: if args.list { None } else { Some(language) },
        output_dir: args.path,
        quality: if args.sd {
            VideoQuality::Sd
        } else {
            VideoQuality::Hd
        },
        patterns,
        ..Config::default()
    })
}

fn load_patterns(path: &Path) -> Result<PatternSet> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config {
            message: format!("cannot read pattern file {}: {e}", path.display()),
        })?;
    serde_json::from_str(&raw).map_err(|e| Error::Config {
        message: format!("invalid pattern file {}: {e}", path.display()),
    })
}

fn hint_for(err: &Error) -> Option<&'static str> {
    match err {
        Error::UnknownYear(_) => Some("supported years are 2012-2019 and 2024"),
        Error::UnknownLanguage(_) => Some("supported languages are eng, chs and jpn"),
        Error::UnknownSession { .. } => Some("run with --list to see the year's session IDs"),
        Error::OutputDirNotFound(_) => Some("create the directory or point --path somewhere else"),
        _ => None,
    }
}
