use std::path::{Path, PathBuf};
use std::time::Instant;
use std::{env, fs};

use log::{debug, LevelFilter, Log, Metadata, Record};
use rayon::prelude::*;

use ppmix::helpers::{cmp, ACStats};
use ppmix::models::{BlendedModel, ModelConfig};
use ppmix::runner::{compress_file, decompress_file, encode_into, HEADER_LEN};
use ppmix::{Error, Result};

#[derive(Clone, Copy, Debug)]
enum Action {
    Compress,
    Decompress,
    Test,
    Estimate,
}

fn main() -> Result<()> {
    init_logger();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        print_usage_and_exit("Invocation doesn't match usage! Provide 2 arguments.");
    }
    let action = match args[1].as_str() {
        "c" => Action::Compress,
        "d" => Action::Decompress,
        "t" => Action::Test,
        "e" => Action::Estimate,
        _ => print_usage_and_exit("Unrecognized option -> <action>!"),
    };
    let path = PathBuf::from(&args[2]);
    let config = config_from_env()?;
    debug!("{:?} {} with {:?}", action, path.display(), config);

    if path.is_dir() {
        let mut files = Vec::new();
        for entry in fs::read_dir(&path)? {
            let file_path = entry?.path();
            if file_path.is_file() {
                files.push(file_path);
            }
        }
        files.sort();
        files.par_iter().try_for_each(|file| run(file, action, config))?;
    } else if path.is_file() {
        run(&path, action, config)?;
    } else {
        print_usage_and_exit("Path must be a file or a directory!");
    }

    Ok(())
}

fn run(file_path: &Path, action: Action, config: ModelConfig) -> Result<()> {
    let Some(file_name) = file_path.file_name() else {
        return Ok(());
    };
    let out_path = env::current_dir()?.join(file_name);
    let compress_path = out_path.with_extension("bin");
    let decompress_path = out_path.with_extension("orig");
    let name = file_path.display();

    let timer = Instant::now();
    match action {
        Action::Compress => {
            compress_file(file_path, &compress_path, config)?;
            let (orig_size, csize) = (fs::metadata(file_path)?.len(), fs::metadata(&compress_path)?.len());
            println!("[{name}] csize: {csize} (ratio: {:.3}), ctime: {:?}", ratio(csize, orig_size), timer.elapsed());
        }
        Action::Decompress => {
            decompress_file(file_path, &decompress_path, config)?;
            println!("[{name}] dtime: {:?}", timer.elapsed());
        }
        Action::Test => {
            compress_file(file_path, &compress_path, config)?;
            let ctime = timer.elapsed();
            let timer = Instant::now();
            decompress_file(&compress_path, &decompress_path, config)?;
            let dtime = timer.elapsed();

            let (orig_size, csize) = (fs::metadata(file_path)?.len(), fs::metadata(&compress_path)?.len());
            match cmp(file_path, &decompress_path)? {
                None => println!(
                    "[{name}] OK, csize: {csize} (ratio: {:.3}), ctime: {ctime:?}, dtime: {dtime:?}",
                    ratio(csize, orig_size)
                ),
                Some(pos) => println!("[{name}] FAILED, files differ at byte {pos}"),
            }
        }
        Action::Estimate => {
            let input = fs::read(file_path)?;
            let mut model = BlendedModel::with_config(config);
            let stats = encode_into(&input, &mut model, ACStats::new())?;
            let csize = stats.result() + HEADER_LEN as u64;
            println!(
                "[{name}] estimated csize: {csize} (ratio: {:.3}, {:.4} bpc), time: {:?}",
                ratio(csize, input.len() as u64),
                stats.bits() as f64 / input.len().max(1) as f64,
                timer.elapsed()
            );
        }
    }

    Ok(())
}

fn ratio(csize: u64, orig_size: u64) -> f64 {
    csize as f64 / orig_size.max(1) as f64
}

fn config_from_env() -> Result<ModelConfig> {
    let Ok(window) = env::var("PPMIX_WINDOW") else {
        return Ok(ModelConfig::default());
    };
    let window: usize = window
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("PPMIX_WINDOW is not a number: {window:?}")))?;
    ModelConfig::new(window.max(ModelConfig::default().max_order()), window)
}

fn print_usage_and_exit(msg: &str) -> ! {
    eprintln!("{msg}");
    println!("Usage: ppmix <Action> <Path>");
    println!("<Action>: c (compress), d (decompress), t (test = c + d + cmp), e (estimate size)");
    println!("<Path> can be a single file or a directory");
    println!("Note: Directories are shallow traversed");
    println!("Env: PPMIX_LOG=<level>, PPMIX_WINDOW=<context length>");
    std::process::exit(2);
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{:<5} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger() {
    let level = env::var("PPMIX_LOG")
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
