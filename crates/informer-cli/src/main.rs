use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use informer_core::NetworkReport;
use informer_service::{calculate, Service, StdioTransport};
use tracing_subscriber::EnvFilter;

/// Network range calculator: network address, mask and usable hosts
#[derive(Parser)]
#[command(name = "ip-informer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "human", global = true)]
    output: OutputFormat,

    /// Enable verbose output (forces debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log filter directive, e.g. "info" or "informer_cidr=debug"
    #[arg(long, env = "IP_INFORMER_LOG", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate network details for an address and mask
    Calc(CalcArgs),
    /// Serve JSON-RPC 2.0 requests over stdin/stdout
    Serve,
}

#[derive(Parser)]
struct CalcArgs {
    /// IP address, or network in CIDR notation (e.g., 192.168.1.0/24)
    #[arg(value_name = "IP")]
    ip: String,

    /// Subnet mask or prefix length (ignored when IP uses CIDR notation)
    #[arg(value_name = "SUBNET")]
    subnet: Option<String>,
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable table output
    Human,
    /// JSON output (pretty-printed)
    Json,
    /// JSON output (compact)
    JsonCompact,
    /// CSV output
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.verbose)?;

    match cli.command {
        Commands::Calc(args) => handle_calc(args, cli.output, cli.verbose)?,
        Commands::Serve => handle_serve(cli.verbose)?,
    }

    Ok(())
}

fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(level)?
    };

    // stdout carries results and JSON-RPC responses
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

fn handle_calc(args: CalcArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let subnet = args.subnet.as_deref().unwrap_or_default();
    if verbose {
        eprintln!("{} Calculating: {} {}", "›".blue(), args.ip, subnet);
    }

    match calculate(&args.ip, subnet) {
        Ok(report) => {
            print!("{}", render(&report, format)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e.to_string().red());
            std::process::exit(1);
        }
    }
}

fn handle_serve(verbose: bool) -> Result<()> {
    if verbose {
        eprintln!("{} Serving JSON-RPC on stdio", "›".blue());
    }

    let handled = StdioTransport::new(Service::new()).run_stdio()?;

    if verbose {
        eprintln!("{} Handled {} requests", "›".blue(), handled);
    }
    Ok(())
}

fn render(report: &NetworkReport, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Human => render_human(report),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(report)?),
        OutputFormat::JsonCompact => format!("{}\n", serde_json::to_string(report)?),
        OutputFormat::Csv => render_csv(report)?,
    })
}

fn render_human(report: &NetworkReport) -> String {
    let rows = [
        ("Network Address", report.network_address.to_string()),
        ("Subnet Mask", report.netmask.to_string()),
        ("First Usable IP Address", report.first_usable_ip.to_string()),
        ("Last Usable IP Address", report.last_usable_ip.to_string()),
        ("Number of Usable IP Addresses", report.num_usable_ips.to_string()),
    ];

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!("{}\n", "Network Details".bold().cyan()));
    out.push_str(&format!("{}\n", "─".repeat(50).dimmed()));
    for (label, value) in rows {
        out.push_str(&format!("{:>30}: {}\n", label.bold(), value.green()));
    }
    out.push('\n');
    out
}

fn render_csv(report: &NetworkReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "network_address",
        "netmask",
        "first_usable_ip",
        "last_usable_ip",
        "num_usable_ips",
    ])?;
    wtr.write_record([
        report.network_address.to_string(),
        report.netmask.to_string(),
        report.first_usable_ip.to_string(),
        report.last_usable_ip.to_string(),
        report.num_usable_ips.to_string(),
    ])?;
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}
