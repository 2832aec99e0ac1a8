use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use log::{debug, error, LevelFilter};
use serde_json::json;

use threshold_secret::batch::reconstruct_all;
use threshold_secret::protocol::{Method, Reconstruction, ReconstructOptions, SpareStatus};
use threshold_secret::types::{parse_records, ShareRecord};
use threshold_secret::{Error, Result};

#[derive(Parser)]
#[clap(version, about = "Reconstruct the secret of a threshold share set")]
struct Args {
    /// JSON files holding one record or an array of records ("-" reads stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Reconstruction method: elimination or lagrange
    #[arg(short, long, default_value = "elimination")]
    method: Method,

    /// Abort when a share value does not survive re-encoding
    #[arg(long)]
    strict: bool,

    /// Do not check unused shares against the recovered polynomial
    #[arg(long)]
    no_spare_check: bool,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let cfg = simplelog::ConfigBuilder::new().set_time_level(LevelFilter::Off).build();
    simplelog::TermLogger::init(
        level,
        cfg,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    Ok(())
}

fn load(path: &PathBuf) -> Result<Vec<ShareRecord>> {
    let text = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_records(&text)
}

fn report(label: &str, out: &Reconstruction, as_json: bool) {
    if as_json {
        let spares: Vec<_> = out
            .spares
            .iter()
            .map(|s| {
                let status = match &s.status {
                    SpareStatus::Consistent => "consistent".to_string(),
                    SpareStatus::Inconsistent => "inconsistent".to_string(),
                    SpareStatus::Undecodable(e) => format!("undecodable: {}", e),
                };
                json!({ "x": s.x, "status": status })
            })
            .collect();
        let result = json!({
            "input": label,
            "n": out.threshold.n,
            "k": out.threshold.k,
            "secret": out.secret.to_string(),
            "points": out.points.iter().map(|p| p.x).collect::<Vec<_>>(),
            "all_valid": out.all_valid(),
            "spares": spares,
        });
        println!("{}", result);
    } else {
        println!("{}:", label);
        println!("Secret (c): {}", out.secret);
        let bad = out.inconsistent_spares();
        if !bad.is_empty() {
            println!("Shares not on the polynomial: {:?}", bad);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose)?;

    let mut labels = vec![];
    let mut records = vec![];
    for path in &args.inputs {
        let loaded = load(path)?;
        let single = loaded.len() == 1;
        for (idx, rec) in loaded.into_iter().enumerate() {
            labels.push(if single {
                path.display().to_string()
            } else {
                format!("{}#{}", path.display(), idx)
            });
            records.push(rec);
        }
    }

    let opts = ReconstructOptions {
        method: args.method,
        strict: args.strict,
        check_spares: !args.no_spare_check,
    };

    let start = Instant::now();
    let results = reconstruct_all(&records, &opts);
    let elapsed = start.elapsed();

    let mut failed = 0;
    for (label, res) in labels.iter().zip(results) {
        match res {
            Ok(out) => report(label, &out, args.json),
            Err(e) => {
                error!(target: "main", "{}: {}", label, e);
                failed += 1;
            }
        }
    }
    debug!(target: "main", "{} record(s) in {:.3} ms", records.len(), elapsed.as_secs_f64() * 1e3);

    if failed > 0 {
        return Err(Error::BatchFailed(failed));
    }
    Ok(())
}
