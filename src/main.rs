/// Stats Analyzer - Text and weather-measurement statistics from the command line
///
/// The main entry point for the analyzer application. It parses command-line
/// arguments, loads the inputs and coordinates the analysis and export steps.

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn, LevelFilter};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

use stats_analyzer::config::{load_config, AnalyzerConfig};
use stats_analyzer::utils::{file_utils, output_formatter};
use stats_analyzer::{Measurement, StatsReport, TextAnalyzer, WeatherStation};

/// Results for one input: its label, the category reports and the rendered text report
type InputResults = (String, Vec<(String, StatsReport)>, String);

/// Command line argument structure
#[derive(Parser, Debug)]
#[command(
    name = "stats_analyzer",
    version,
    about = "Descriptive statistics for text documents and weather measurements",
    long_about = "Computes statistics over text and weather data:
- Characters, words, lines and word-size distribution of documents
- Word patterns, extracted emails and numbers
- Humidity bands, temperature scales and weather conditions of measurements
- Station summaries and raw station log classification"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    output: OutputArgs,
}

/// Flags shared by every subcommand
#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// Output in markdown format (wrapped in triple backticks)
    #[arg(long = "md", global = true, action = ArgAction::SetTrue)]
    md: bool,

    /// Export results to JSON file
    #[arg(long = "json", global = true)]
    json: Option<String>,

    /// Export results to HTML report
    #[arg(long = "html", global = true)]
    html: Option<String>,

    /// Export results to CSV file
    #[arg(long = "csv", global = true)]
    csv: Option<String>,

    /// Directory to store all output files
    #[arg(long = "output-dir", global = true)]
    output_dir: Option<String>,

    /// Suppress terminal output
    #[arg(long = "quiet", global = true, action = ArgAction::SetTrue)]
    quiet: bool,

    /// Show only summary information
    #[arg(long = "summary-only", global = true, action = ArgAction::SetTrue)]
    summary_only: bool,

    /// Path to configuration file
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Number of parallel workers (0=auto, default: from configuration)
    #[arg(long = "parallel", global = true)]
    parallel: Option<usize>,

    /// Set logging level (default: INFO)
    #[arg(long = "log-level", global = true, default_value = "info")]
    log_level: LevelFilter,

    /// Log file path (default: stats_analyzer.log)
    #[arg(long = "log-file", global = true, default_value = "stats_analyzer.log")]
    log_file: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze text documents
    Text {
        /// Path(s) to the file(s) to analyze
        #[arg(name = "file_paths")]
        file_paths: Vec<String>,

        /// Analyze this text directly
        #[arg(long = "text")]
        text: Option<String>,

        /// Analyze all files in directory (recursively)
        #[arg(long = "dir")]
        dir: Option<String>,

        /// Exclude file pattern (glob syntax, can be used multiple times)
        #[arg(long = "exclude", action = ArgAction::Append)]
        exclude: Option<Vec<String>>,

        /// Include only file pattern (glob syntax, can be used multiple times)
        #[arg(long = "include", action = ArgAction::Append)]
        include: Option<Vec<String>>,

        /// Maximum file size to analyze in MB
        #[arg(long = "max-size")]
        max_size: Option<usize>,

        /// Maximum number of files to analyze
        #[arg(long = "max-files")]
        max_files: Option<usize>,

        /// Also print every metric, grouped by category
        #[arg(long = "details", action = ArgAction::SetTrue)]
        details: bool,
    },

    /// Analyze a single weather measurement
    Measure {
        /// Read the measurement from a JSON object file
        #[arg(long = "file", conflicts_with_all = ["temperature", "humidity", "pressure", "city"])]
        file: Option<String>,

        /// Temperature in degrees Celsius
        #[arg(long = "temperature", allow_negative_numbers = true)]
        temperature: Option<f64>,

        /// Relative humidity in percent
        #[arg(long = "humidity")]
        humidity: Option<i64>,

        /// Pressure in hPa
        #[arg(long = "pressure")]
        pressure: Option<i64>,

        /// City where the measurement was taken
        #[arg(long = "city")]
        city: Option<String>,

        /// It was raining
        #[arg(long = "rainy", action = ArgAction::SetTrue)]
        rainy: bool,
    },

    /// Summarize a station's measurements
    Station {
        /// JSON array of measurements
        #[arg(long = "file")]
        file: String,

        /// Raw station log to classify
        #[arg(long = "raw")]
        raw: Option<String>,

        /// Station name
        #[arg(long = "name", default_value = "Main station")]
        name: String,

        /// Lower temperature alert bound (default: -10)
        #[arg(long = "min-temp", allow_negative_numbers = true)]
        min_temp: Option<f64>,

        /// Upper temperature alert bound (default: 40)
        #[arg(long = "max-temp", allow_negative_numbers = true)]
        max_temp: Option<f64>,

        /// Compare the observed cities with these (can be used multiple times)
        #[arg(long = "compare", action = ArgAction::Append)]
        compare: Option<Vec<String>>,
    },

    /// Interactively filter a station's measurements
    Filter {
        /// JSON array of measurements
        #[arg(long = "file")]
        file: String,
    },
}

/// Main entry point function
fn main() -> Result<()> {
    // Record the start time
    let start_time = Instant::now();

    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let _ = setup_logging(&args.output);

    // Load configuration
    let config = load_config(args.output.config.as_deref().map(Path::new));

    let all_results = match &args.command {
        Command::Text {
            file_paths,
            text,
            dir,
            exclude,
            include,
            max_size,
            max_files,
            details,
        } => {
            let selection = FileSelection {
                file_paths,
                dir: dir.as_deref(),
                include: include.clone().unwrap_or_else(|| vec!["*".to_string()]),
                exclude: exclude.clone().unwrap_or_default(),
                max_size_mb: max_size.unwrap_or(config.max_size_mb),
                max_files: max_files.unwrap_or(config.max_files),
            };
            let files_to_analyze = get_files_to_analyze(&selection)?;

            if files_to_analyze.is_empty() && text.is_none() {
                eprintln!("{}", "Error: No text given and no files found for analysis".red());
                eprintln!("Run with --help for usage information");
                process::exit(1);
            }

            let mut all_results = Vec::new();
            if let Some(text) = text {
                all_results.push(analyze_inline_text(text));
            }
            all_results.extend(analyze_files(&files_to_analyze, &config, &args.output)?);

            if !args.output.quiet {
                print_text_results(&all_results, &config, &args.output, *details, start_time);
            }
            all_results
        }
        Command::Measure {
            file,
            temperature,
            humidity,
            pressure,
            city,
            rainy,
        } => {
            let measurement = match file {
                Some(path) => file_utils::read_measurement(Path::new(path))?,
                None => measurement_from_flags(*temperature, *humidity, *pressure, city.as_deref(), *rainy)?,
            };
            let results = measurement.analyze_all();

            if !args.output.quiet {
                println!("\n{} {}", "Measurement:".cyan(), measurement);
                println!("{}", measurement.analyze_humidity().gap_message);
                if measurement.is_comfortable() {
                    println!("{}", "Comfortable conditions".green());
                }
                print_reports(&results, &config, &args.output);
            }
            vec![(measurement.city().to_string(), results, String::new())]
        }
        Command::Station {
            file,
            raw,
            name,
            min_temp,
            max_temp,
            compare,
        } => {
            let station = load_station(file, name, *min_temp, *max_temp)?;
            let mut results = vec![("station_summary".to_string(), station.summarize())];

            if let Some(raw_path) = raw {
                let raw_text = std::fs::read_to_string(raw_path)
                    .context(format!("Failed to read raw station log: {}", raw_path))?;
                results.push(("raw_data".to_string(), WeatherStation::analyze_raw_data(&raw_text)));
            }

            if !args.output.quiet {
                print_station(&station, compare.as_deref());
                print_reports(&results, &config, &args.output);
            }
            vec![(station.config().name.clone(), results, String::new())]
        }
        Command::Filter { file } => {
            let station = load_station(file, "Main station", None, None)?;
            run_interactive_filter(&station)?;
            Vec::new()
        }
    };

    // Export results if requested
    export_all_results(&all_results, &args.output)?;

    Ok(())
}

/// Set up logging with file and console output
fn setup_logging(args: &OutputArgs) -> Result<()> {
    // Configure logging
    let mut builder = env_logger::Builder::new();

    // Set log level from arguments
    builder.filter_level(args.log_level);

    // Set format
    builder.format(|buf, record| {
        use std::io::Write;
        use chrono::Local;
        writeln!(
            buf,
            "{} - {} - {} - {}",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    // Add file output
    if let Ok(file) = File::create(&args.log_file) {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // Initialize logger
    builder.try_init()?;

    Ok(())
}

/// Which files the `text` subcommand should read
struct FileSelection<'a> {
    file_paths: &'a [String],
    dir: Option<&'a str>,
    include: Vec<String>,
    exclude: Vec<String>,
    max_size_mb: usize,
    max_files: usize,
}

/// Get list of files to analyze based on command line arguments
fn get_files_to_analyze(selection: &FileSelection) -> Result<Vec<PathBuf>> {
    let mut files_to_analyze = Vec::new();
    let max_size_bytes = (selection.max_size_mb * 1024 * 1024) as u64;

    // Process individual files
    for file_path in selection.file_paths {
        let path = PathBuf::from(file_path);
        if !path.exists() {
            error!("File not found: {}", path.display());
        } else if !path.is_file() {
            warn!("Skipping {}: not a file", path.display());
        } else {
            match path.metadata() {
                Ok(metadata) if metadata.len() <= max_size_bytes => files_to_analyze.push(path),
                Ok(metadata) => warn!(
                    "Skipping {}: exceeds maximum file size ({:.2} MB)",
                    path.display(),
                    metadata.len() as f64 / 1024.0 / 1024.0
                ),
                Err(e) => error!("Error reading metadata for {}: {}", path.display(), e),
            }
        }
    }

    // Process directory recursively
    if let Some(dir_path) = selection.dir {
        let dir_path = PathBuf::from(dir_path);
        if !dir_path.is_dir() {
            error!("Directory not found: {}", dir_path.display());
            return Ok(files_to_analyze);
        }

        use walkdir::WalkDir;
        for entry in WalkDir::new(&dir_path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if files_to_analyze.len() >= selection.max_files {
                warn!("Reached maximum file limit ({})", selection.max_files);
                break;
            }

            let file_path = entry.path();
            if !file_path.is_file() {
                continue;
            }

            match file_path.metadata() {
                Ok(metadata) => {
                    if metadata.len() > max_size_bytes {
                        continue;
                    }

                    let file_name = file_path.to_string_lossy();
                    let include_match = selection.include.iter().any(|pattern| glob_match(&file_name, pattern));
                    let exclude_match = selection.exclude.iter().any(|pattern| glob_match(&file_name, pattern));

                    if include_match && !exclude_match {
                        files_to_analyze.push(file_path.to_path_buf());
                    }
                }
                Err(e) => error!("Error reading metadata for {}: {}", file_path.display(), e),
            }
        }
    }

    Ok(files_to_analyze)
}

/// Simple glob pattern matching
///
/// `*` matches any run of characters and `?` a single one; everything else is literal.
/// An unusable pattern matches nothing.
fn glob_match(text: &str, pattern: &str) -> bool {
    let pattern = regex::escape(pattern).replace(r"\*", ".*").replace(r"\?", ".");
    match regex::Regex::new(&format!("^{}$", pattern)) {
        Ok(re) => re.is_match(text),
        Err(e) => {
            warn!("Ignoring glob pattern {}: {}", pattern, e);
            false
        }
    }
}

/// Run every text analysis over a string given on the command line
fn analyze_inline_text(text: &str) -> InputResults {
    let mut analyzer = TextAnalyzer::new(text);
    let results = analyzer.analyze_all();
    let report = analyzer.generate_report();
    ("<inline text>".to_string(), results, report)
}

/// Analyze multiple files with progress tracking
fn analyze_files(
    files: &[PathBuf],
    config: &AnalyzerConfig,
    args: &OutputArgs,
) -> Result<Vec<InputResults>> {
    let total_files = files.len();
    if total_files == 0 {
        return Ok(Vec::new());
    }

    // Determine number of workers for parallel processing
    let requested = args.parallel.unwrap_or(config.parallel);
    let num_workers = if requested == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    } else {
        requested
    };

    if !args.quiet {
        println!(
            "\n{} {} files with {} workers...",
            "Analyzing".bold(),
            total_files,
            num_workers
        );
    }

    // Set up progress bar if not in quiet mode
    let progress_bar = if !args.quiet && total_files > 1 {
        let pb = ProgressBar::new(total_files as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    // Create a local thread pool instead of using the global one
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .build()
        .map_err(|e| anyhow!("Failed to build thread pool: {}", e))?;

    // One analyzer per file; results keep the input order
    let all_results = pool.install(|| {
        files
            .par_iter()
            .map(|file_path| {
                let file_path_string = file_path.to_string_lossy().to_string();

                let file_results = match file_utils::read_file_content(file_path) {
                    Ok(content) => {
                        let mut analyzer = TextAnalyzer::new(content.document);
                        let results = analyzer.analyze_all();
                        let report = analyzer.generate_report();
                        (file_path_string, results, report)
                    }
                    Err(e) => {
                        error!("Error analyzing {}: {}", file_path.display(), e);
                        let error_report = StatsReport::new().with("message", format!("Error: {:#}", e));
                        (file_path_string, vec![("error".to_string(), error_report)], String::new())
                    }
                };

                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }

                file_results
            })
            .collect::<Vec<_>>()
    });

    // Finish progress bar
    if let Some(pb) = progress_bar {
        pb.finish_with_message("Analysis complete");
    }

    info!("Analyzed {} files", all_results.len());

    Ok(all_results)
}

/// Print the outcome of the `text` subcommand
fn print_text_results(
    all_results: &[InputResults],
    config: &AnalyzerConfig,
    args: &OutputArgs,
    details: bool,
    start_time: Instant,
) {
    let summary_input: Vec<(String, Vec<(String, StatsReport)>)> = all_results
        .iter()
        .map(|(label, results, _)| (label.clone(), results.clone()))
        .collect();

    println!("\n{}", "Analysis Complete".bold());
    println!("{}", output_formatter::create_summary(&summary_input));
    println!(
        "{} {:.2} seconds",
        "Time elapsed:".green(),
        start_time.elapsed().as_secs_f64()
    );

    if args.summary_only {
        return;
    }

    let markdown = args.md || config.markdown;
    for (label, results, report) in all_results {
        println!("\n{}", "=".repeat(80).bold());
        println!("{} {}", "Results for:".cyan(), label);
        println!("{}", "=".repeat(80).bold());

        if report.is_empty() {
            // Read failures carry an error report and no rendered text
            println!("{}", output_formatter::format_results(results, &markdown));
            continue;
        }

        if markdown {
            println!("```\n{}```", report);
        } else {
            println!("{}", report);
        }

        if details {
            println!("{}", output_formatter::format_results(results, &markdown));
        }
    }
}

fn print_reports(results: &[(String, StatsReport)], config: &AnalyzerConfig, args: &OutputArgs) {
    if args.summary_only {
        return;
    }
    let markdown = args.md || config.markdown;
    println!("\n{}", output_formatter::format_results(results, &markdown));
}

/// Build a measurement from individual command line flags
fn measurement_from_flags(
    temperature: Option<f64>,
    humidity: Option<i64>,
    pressure: Option<i64>,
    city: Option<&str>,
    rainy: bool,
) -> Result<Measurement> {
    let missing: Vec<&str> = [
        ("--temperature", temperature.is_none()),
        ("--humidity", humidity.is_none()),
        ("--pressure", pressure.is_none()),
        ("--city", city.is_none()),
    ]
    .iter()
    .filter(|(_, absent)| *absent)
    .map(|(flag, _)| *flag)
    .collect();

    match (temperature, humidity, pressure, city) {
        (Some(temperature), Some(humidity), Some(pressure), Some(city)) => {
            Ok(Measurement::new(temperature, humidity, pressure, city, rainy)?)
        }
        _ => Err(anyhow!(
            "Missing {} (or use --file to read a measurement)",
            missing.join(", ")
        )),
    }
}

/// Load a station from a measurements file and configure it
fn load_station(file: &str, name: &str, min_temp: Option<f64>, max_temp: Option<f64>) -> Result<WeatherStation> {
    let measurements = file_utils::read_measurements(Path::new(file))?;
    let mut station = WeatherStation::with_measurements(measurements);
    station.create_config(name, 0, 0.0, 0.0, true);
    station.configure_thresholds(min_temp, max_temp);
    info!(
        "Loaded {} measurements from {} cities",
        station.measurements().len(),
        station.observed_cities().len()
    );
    Ok(station)
}

fn print_station(station: &WeatherStation, compare: Option<&[String]>) {
    let config = station.config();
    let thresholds = station.thresholds();
    println!("\n{} {}", "Station:".cyan().bold(), config.name);
    println!("Sensors: {}", config.sensors.join(", "));
    println!("Alert range: {:.1}°C to {:.1}°C", thresholds.min, thresholds.max);

    if let Some(latest) = station.measurement_or_default(None) {
        println!("Latest: {}", latest);
    }

    for measurement in station.out_of_range() {
        println!("{} {}", "Out of range:".red().bold(), measurement);
    }

    if let Some(compare) = compare {
        let other: BTreeSet<String> = compare.iter().cloned().collect();
        let common: Vec<String> = station.cities_in_common(&other).into_iter().collect();
        let all: Vec<String> = station.all_cities(&other).into_iter().collect();
        println!("Cities in common: {}", output_formatter::join_or_none(&common));
        println!("All cities: {}", output_formatter::join_or_none(&all));
        println!("No city in common: {}", output_formatter::yes_no(station.is_disjoint(&other)));
    }
}

/// Interactive measurement filter
///
/// Each prompt re-asks until the answer parses; the filters themselves are pure.
fn run_interactive_filter(station: &WeatherStation) -> Result<()> {
    let theme = ColorfulTheme::default();
    let choices = ["By minimum temperature", "By city prefix", "By rain", "Quit"];

    loop {
        let choice = Select::with_theme(&theme)
            .with_prompt("Filter measurements")
            .items(&choices)
            .default(0)
            .interact()?;

        let matches = match choice {
            0 => {
                let min = prompt_temperature(&theme)?;
                station.filter_by_min_temperature(min)
            }
            1 => {
                let prefix: String = Input::with_theme(&theme)
                    .with_prompt("City prefix")
                    .interact_text()?;
                station.filter_by_city_prefix(prefix.trim())
            }
            2 => {
                let rainy = Select::with_theme(&theme)
                    .with_prompt("Weather")
                    .items(&["Rainy", "Dry"])
                    .default(0)
                    .interact()?
                    == 0;
                station.filter_by_rain(rainy)
            }
            _ => return Ok(()),
        };

        if matches.is_empty() {
            println!("{}", "No matching measurements".yellow());
        } else {
            println!("{} matching measurement(s):", matches.len());
            for measurement in matches {
                println!("  {}", measurement);
            }
        }
    }
}

fn prompt_temperature(theme: &ColorfulTheme) -> Result<f64> {
    loop {
        let answer: String = Input::with_theme(theme)
            .with_prompt("Minimum temperature (°C)")
            .interact_text()?;

        match answer.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => return Ok(value),
            _ => println!("{} '{}' is not a temperature, try again", "Invalid input:".red(), answer.trim()),
        }
    }
}

/// Export results for all analyzed inputs based on command line arguments
fn export_all_results(all_results: &[InputResults], args: &OutputArgs) -> Result<()> {
    // Create output directory if specified
    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)?;
    }

    for (label, results, _) in all_results {
        let input_path = Path::new(label);

        if let Some(json_path) = &args.json {
            let json_path = choose_output_path(all_results.len(), args, input_path, json_path, ".json");
            output_formatter::export_results_json(results, &json_path)?;
        }

        if let Some(html_path) = &args.html {
            let html_path = choose_output_path(all_results.len(), args, input_path, html_path, ".html");
            output_formatter::create_html_report(results, &html_path)?;
        }

        if let Some(csv_path) = &args.csv {
            let csv_path = choose_output_path(all_results.len(), args, input_path, csv_path, ".csv");
            output_formatter::create_csv_report(results, &csv_path)?;
        }
    }

    Ok(())
}

/// A single input writes to the requested path, several inputs get one file each
fn choose_output_path(
    input_count: usize,
    args: &OutputArgs,
    input_path: &Path,
    requested: &str,
    extension: &str,
) -> PathBuf {
    if input_count > 1 {
        generate_output_path(args, input_path, extension)
    } else {
        match &args.output_dir {
            Some(output_dir) => PathBuf::from(output_dir).join(requested),
            None => PathBuf::from(requested),
        }
    }
}

/// Generate output file path based on input file and output directory
fn generate_output_path(args: &OutputArgs, file_path: &Path, extension: &str) -> PathBuf {
    let file_stem = file_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().replace(|c: char| !c.is_alphanumeric() && c != '_' && c != '-', ""))
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| "input".to_string());
    let output_filename = format!("{}_analysis{}", file_stem, extension);

    match &args.output_dir {
        Some(output_dir) => PathBuf::from(output_dir).join(output_filename),
        None => PathBuf::from(output_filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match() {
        assert!(glob_match("notes/report.txt", "*.txt"));
        assert!(glob_match("a.md", "?.md"));
        assert!(!glob_match("report.txt", "*.md"));
        assert!(!glob_match("reportXtxt", "*.txt"));
    }

    #[test]
    fn test_measurement_from_flags() {
        let measurement = measurement_from_flags(Some(18.5), Some(65), Some(1013), Some("Paris"), false).unwrap();
        assert_eq!(measurement.city(), "Paris");

        let err = measurement_from_flags(Some(18.5), None, Some(1013), None, false).unwrap_err();
        assert!(err.to_string().contains("--humidity, --city"));
    }

    #[test]
    fn test_cli_parses_subcommands() {
        let args = Args::try_parse_from(["stats_analyzer", "measure", "--temperature", "-3.5", "--humidity", "40", "--pressure", "1000", "--city", "Oslo", "--json", "out.json"]).unwrap();
        assert_eq!(args.output.json.as_deref(), Some("out.json"));
        match args.command {
            Command::Measure { temperature, .. } => assert_eq!(temperature, Some(-3.5)),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
