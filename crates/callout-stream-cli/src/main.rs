use anyhow::Result;
use callout_stream_config::{CalloutConfig, Config};
use callout_stream_engine::{
    AnchorId, AnchorSet, AnchorTracker, CalloutTemplate, Document, EditHost, IoError, PromptSpec,
    StreamInserter, StreamOutcome, io,
};
use futures::Stream;
use relative_path::RelativePathBuf;
use std::{
    cell::RefCell,
    env,
    path::{Path, PathBuf},
    process,
    rc::Rc,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const USAGE: &str = "Usage: callout-stream <markdown-file> [label] [--cursor <offset>]";

#[derive(Debug, PartialEq)]
struct Args {
    file: PathBuf,
    label: Option<String>,
    cursor: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    let mut positional = Vec::new();
    let mut cursor = None;

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg == "--cursor" {
            let value = iter.next().ok_or("--cursor needs an offset")?;
            let offset = value
                .parse::<usize>()
                .map_err(|_| format!("Invalid cursor offset: {value}"))?;
            cursor = Some(offset);
        } else {
            positional.push(arg.clone());
        }
    }

    let mut positional = positional.into_iter();
    let file = positional.next().ok_or("Missing markdown file")?;
    let label = positional.next();
    if positional.next().is_some() {
        return Err("Too many arguments".to_string());
    }

    Ok(Args {
        file: PathBuf::from(file),
        label,
        cursor,
    })
}

/// Split a file argument into a notes root and a path relative to it
fn locate(file: &Path, notes_path: Option<&Path>) -> Result<(PathBuf, RelativePathBuf)> {
    if file.is_absolute() {
        let root = file
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("/"));
        let name = file
            .file_name()
            .ok_or_else(|| anyhow::anyhow!("{} is not a file path", file.display()))?;
        return Ok((root, RelativePathBuf::from_path(name)?));
    }

    let root = match notes_path {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };
    Ok((root, RelativePathBuf::from_path(file)?))
}

fn template_from(callout: CalloutConfig) -> CalloutTemplate {
    CalloutTemplate {
        kind: callout.kind,
        title: callout.title,
        continuation_prefix: callout.continuation_prefix,
        error_color: callout.error_color,
    }
}

/// Lines of `reader` as fragments, with the line breaks between them restored
fn line_fragments<R>(reader: R) -> impl Stream<Item = Result<String, std::io::Error>>
where
    R: AsyncBufRead + Unpin,
{
    async_stream::try_stream! {
        let mut lines = reader.lines();
        let mut first = true;
        while let Some(line) = lines.next_line().await? {
            if first {
                first = false;
                yield line;
            } else {
                yield format!("\n{line}");
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let args = match parse_args(&args) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {message}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    let (notes_root, relative_path) = locate(&args.file, config.notes_path.as_deref())?;
    if let Err(e) = io::validate_notes_dir(&notes_root) {
        eprintln!("Error: '{}' is invalid: {e}", notes_root.display());
        process::exit(1);
    }

    let anchors = AnchorSet::shared();
    let document = match io::load_document(&relative_path, &notes_root, anchors.clone()) {
        Ok(document) => document,
        Err(IoError::NotFound(path)) => {
            log::info!("{} does not exist yet, starting empty", path.display());
            Document::new("", anchors.clone())
        }
        Err(e) => return Err(e.into()),
    };
    let document = Rc::new(RefCell::new(document));

    let inserter = StreamInserter::new(
        AnchorTracker::new(anchors),
        document.clone(),
        template_from(config.callout),
    );

    let label = args.label.unwrap_or(config.default_label);
    let cursor = args.cursor.unwrap_or_else(|| document.borrow().len());
    let insertion_point = document.borrow().line_end_at(cursor);

    let id = AnchorId::new();
    inserter.start(id, insertion_point, &PromptSpec::new("stdin", label))?;
    let outcome = inserter
        .run(id, line_fragments(BufReader::new(tokio::io::stdin())))
        .await;

    io::save_document(&relative_path, &notes_root, &document.borrow())?;

    match outcome {
        StreamOutcome::Completed { fragments } => {
            log::info!("wrote {fragments} fragments to {}", args.file.display());
            Ok(())
        }
        StreamOutcome::Failed => {
            eprintln!(
                "Error: reading stdin failed, see the callout in {}",
                args.file.display()
            );
            process::exit(1);
        }
        StreamOutcome::Aborted => {
            eprintln!("Error: output for {} was cut short", args.file.display());
            process::exit(1);
        }
    }
}
