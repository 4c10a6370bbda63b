use std::{
    fs::File,
    io::{
        BufReader,
        Read,
        Write,
    },
    path::{
        Path,
        PathBuf,
    },
};

use clap::{
    Parser,
    Subcommand,
};
use color_eyre::eyre::{
    Error,
    WrapErr,
};
use sieve::{
    copy,
    IoSink,
    IoSource,
    RangeSink,
    RangeSource,
    Sink,
    SinkExt,
    Source,
    SourceExt,
    Utf8Sink,
    Utf8Source,
    Window,
};

use crate::config::Config;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the number of bytes (or chars) in the input.
    Count {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write the positions inside a window of the input to stdout.
    Range {
        #[command(flatten)]
        input: InputArgs,

        /// Window as `from..=to`. Defaults to the window from the config.
        #[arg(short, long)]
        window: Option<Window>,

        /// First position to write. Overrides the start of the window.
        #[arg(long)]
        from: Option<u64>,

        /// Last position to write. Overrides the end of the window.
        #[arg(long)]
        to: Option<u64>,

        /// Push the whole input through a windowed writer, instead of only
        /// reading the window.
        #[arg(long)]
        via_sink: bool,
    },
}

#[derive(Debug, clap::Args)]
pub struct InputArgs {
    /// Work on chars instead of bytes. The input must be UTF-8.
    #[arg(long)]
    chars: bool,

    /// Input file. Reads stdin if omitted.
    file: Option<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct Options {
    #[arg(short, long, env = "SIEVE_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "sieve", version, about)]
pub struct Args {
    #[command(flatten)]
    pub options: Options,

    #[command(subcommand)]
    pub command: Command,
}

pub struct App {
    config: Config,
}

impl App {
    pub fn new(options: Options) -> Result<Self, Error> {
        let config = Config::open(options.config.as_ref())?;
        tracing::debug!(path = ?config.path, window = %config.config.window, "config loaded");
        Ok(Self { config })
    }

    pub fn run(&mut self, command: Command) -> Result<(), Error> {
        let chunk_size = self.config.config.io.chunk_size;

        match command {
            Command::Count { input } => {
                let reader = open_input(input.file.as_deref())?;
                let count = count_units(reader, input.chars, chunk_size)?;
                println!("{count}");
            }
            Command::Range {
                input,
                window,
                from,
                to,
                via_sink,
            } => {
                let window = resolve_window(
                    window.unwrap_or(self.config.config.window),
                    from,
                    to,
                )?;
                let reader = open_input(input.file.as_deref())?;
                let stdout = std::io::stdout().lock();
                let count = write_window(reader, stdout, input.chars, window, via_sink, chunk_size)?;
                tracing::info!(%window, count, "window written");
            }
        }

        Ok(())
    }
}

fn open_input(file: Option<&Path>) -> Result<Box<dyn Read>, Error> {
    match file {
        Some(path) => {
            let file = File::open(path)
                .wrap_err_with(|| format!("could not open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

fn resolve_window(base: Window, from: Option<u64>, to: Option<u64>) -> Result<Window, Error> {
    let window = Window::new(
        from.unwrap_or(base.from_index()),
        to.unwrap_or(base.to_index()),
    )?;
    Ok(window)
}

/// Reads the whole input and returns the number of bytes or chars.
fn count_units(reader: impl Read, chars: bool, chunk_size: usize) -> Result<u64, Error> {
    if chars {
        drain(Utf8Source::new(reader), &mut vec!['\0'; chunk_size])
    }
    else {
        drain(IoSource::new(reader), &mut vec![0u8; chunk_size])
    }
}

fn drain<S: Source>(source: S, buf: &mut [S::Unit]) -> Result<u64, Error> {
    let length = buf.len();
    let mut source = source.counted();
    while source.read_into(buf, 0, length)?.is_some() {}
    if let Err(e) = source.close() {
        tracing::warn!(error = %e, "could not close input");
    }
    Ok(source.count())
}

/// Copies the positions inside `window` from `reader` to `writer` and
/// returns how many units were written.
fn write_window(
    reader: impl Read,
    writer: impl Write,
    chars: bool,
    window: Window,
    via_sink: bool,
    chunk_size: usize,
) -> Result<u64, Error> {
    if chars {
        pump(
            Utf8Source::new(reader),
            Utf8Sink::new(writer),
            window,
            via_sink,
            &mut vec!['\0'; chunk_size],
        )
    }
    else {
        pump(
            IoSource::new(reader),
            IoSink::new(writer),
            window,
            via_sink,
            &mut vec![0u8; chunk_size],
        )
    }
}

fn pump<S, K>(
    source: S,
    sink: K,
    window: Window,
    via_sink: bool,
    buf: &mut [S::Unit],
) -> Result<u64, Error>
where
    S: Source,
    K: Sink<Unit = S::Unit>,
{
    if via_sink {
        let mut source = source.counted();
        let mut sink = RangeSink::with_window(sink.counted(), window);
        copy(&mut source, &mut sink, buf)?;
        sink.close()?;
        tracing::debug!(read = source.count(), index = sink.index(), "input consumed");
        Ok(sink.get_ref().count())
    }
    else {
        let mut source = RangeSource::with_window(source, window);
        let mut sink = sink.counted();
        copy(&mut source, &mut sink, buf)?;
        sink.close()?;
        tracing::debug!(index = source.index(), "input consumed");
        Ok(sink.count())
    }
}
