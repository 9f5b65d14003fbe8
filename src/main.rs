//! bgrange command line
//!
//! Usage:
//!   bgrange convert 180 mg/dL     - Convert a value into the other unit
//!   bgrange classify 65 five-way  - Classify against the configured range
//!   bgrange --help                - Show help
//!   BGRANGE_DBG=1 bgrange ...     - Enable debug output

use std::env;

use log::{debug, info, warn};

use bgrange::config::{config_file_path, Config};
use bgrange::stats::TimeInRange;
use bgrange::{
    build_bg_values, build_thresholds, convert_and_format, generate_bg_range_labels, get_bg_class,
    get_error_message, BgError, BgPrefs, BgUnit, ClassificationType,
};

fn main() -> Result<(), BgError> {
    let args: Vec<String> = env::args().collect();

    // Check for debug mode
    let debug_mode = env::var("BGRANGE_DBG").is_ok();

    // Initialize logger
    if debug_mode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp(None)
            .init();
    }

    // Create default config if it doesn't exist
    let cfg_path = config_file_path();
    if !cfg_path.exists() {
        if let Err(e) = Config::create_default(&cfg_path) {
            warn!("Could not create default config: {}", e);
        }
    }

    // Try loading config from the config directory first, then current directory
    let config = Config::load(&cfg_path)
        .or_else(|_| Config::load("config.txt"))
        .unwrap_or_else(|e| {
            warn!("Could not load config: {}. Using defaults.", e);
            Config::default()
        });
    debug!("Using {:?}", config);

    let rest = args.get(2..).unwrap_or(&[]);
    match args.get(1).map(|s| s.as_str()) {
        Some("convert") => cmd_convert(rest)?,
        Some("classify") => cmd_classify(&config, rest)?,
        Some("thresholds") => {
            let unit = unit_arg(&config, rest.first())?;
            print_json(&build_thresholds(unit)?)?;
        }
        Some("defaults") => {
            let unit = unit_arg(&config, rest.first())?;
            print_json(&build_bg_values(unit)?)?;
        }
        Some("profile") => {
            let unit = unit_arg(&config, rest.first())?;
            print_json(&BgPrefs::for_unit(unit))?;
        }
        Some("check") => cmd_check(rest)?,
        Some("tir") => {
            let values = rest.iter().map(|s| parse_number(s)).collect::<Result<Vec<_>, _>>()?;
            let tir = TimeInRange::from_values(&values, &config.effective_bounds())?;
            info!("Classified {} values", tir.total);
            print_json(&tir)?;
        }
        Some("labels") => {
            let condensed = rest.iter().any(|a| a == "--condensed");
            let labels = generate_bg_range_labels(&config.effective_bounds(), config.units, condensed)?;
            print_json(&labels)?;
        }
        Some("path") | Some("paths") => {
            println!("Config file: {}", cfg_path.display());
        }
        Some("--version") | Some("-V") => {
            println!("bgrange {}", env!("CARGO_PKG_VERSION"));
        }
        _ => print_help(),
    }

    Ok(())
}

/// Convert a value into the other unit
fn cmd_convert(args: &[String]) -> Result<(), BgError> {
    let (Some(value), Some(unit)) = (args.first(), args.get(1)) else {
        return Err(BgError::InvalidArgument("usage: convert <value> <unit>".to_string()));
    };
    let value = parse_number(value)?;
    let unit: BgUnit = unit.parse()?;

    let converted = convert_and_format(value, unit)?;
    println!("{} = {}", unit.format(value), unit.other().format(converted));
    Ok(())
}

/// Classify a value against the configured range
fn cmd_classify(config: &Config, args: &[String]) -> Result<(), BgError> {
    let Some(value) = args.first() else {
        return Err(BgError::InvalidArgument("usage: classify <value> [three-way|five-way]".to_string()));
    };
    let value = parse_number(value)?;
    let classification: ClassificationType = match args.get(1) {
        Some(kind) => kind.parse()?,
        None => config.classification,
    };

    let class = get_bg_class(&config.effective_bounds(), value, classification)?;
    println!("{} ({})", class, class.label());
    Ok(())
}

/// Validate an alarm field value
fn cmd_check(args: &[String]) -> Result<(), BgError> {
    if args.len() < 4 {
        return Err(BgError::InvalidArgument("usage: check <unit> <value> <low> <high>".to_string()));
    }
    let unit: BgUnit = args[0].parse()?;
    let value = parse_number(&args[1])?;
    let low = parse_number(&args[2])?;
    let high = parse_number(&args[3])?;

    match get_error_message(unit, value, low, high) {
        Some(err) => println!("{}", err.key()),
        None => println!("ok"),
    }
    Ok(())
}

fn unit_arg(config: &Config, arg: Option<&String>) -> Result<BgUnit, BgError> {
    match arg {
        Some(unit) => unit.parse(),
        None => Ok(config.units),
    }
}

fn parse_number(s: &str) -> Result<f64, BgError> {
    s.trim()
        .replace(',', ".")
        .parse()
        .map_err(|_| BgError::InvalidArgument(format!("not a number: {}", s)))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), BgError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn print_help() {
    eprintln!("bgrange v{}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  bgrange convert <value> <unit>             Convert into the other unit");
    eprintln!("  bgrange classify <value> [five-way]        Classify against the configured range");
    eprintln!("  bgrange thresholds [unit]                  Alarm threshold limits");
    eprintln!("  bgrange defaults [unit]                    Alarm default values");
    eprintln!("  bgrange profile [unit]                     Default range profile");
    eprintln!("  bgrange check <unit> <value> <low> <high>  Validate an alarm value");
    eprintln!("  bgrange tir <value>...                     Time in range");
    eprintln!("  bgrange labels [--condensed]               Range labels");
    eprintln!("  bgrange path                               Show config file location");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("  BGRANGE_DBG=1                              Enable debug output");
    eprintln!();
    eprintln!("Config:  {}", config_file_path().display());
}
