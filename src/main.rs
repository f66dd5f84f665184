use clap::Parser;
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::{Path, PathBuf};
use teldat_config_gen::output::{print_summary, write_configs, write_report};
use teldat_config_gen::{run, Settings, TopologyHint, TopologyKind};

/// Generate one Teldat router config per site from a template and a site table.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Router configuration template
    #[arg(short, long)]
    template: PathBuf,

    /// Site table (comma, tab or space aligned)
    #[arg(short = 's', long)]
    table: PathBuf,

    /// Output directory [default: output_configs or TELDAT_OUTPUT_DIR]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force the template topology instead of detecting it
    #[arg(long)]
    topology: Option<TopologyKind>,

    /// Usable addresses kept out of the tail of every DHCP range
    #[arg(long)]
    reserve: Option<usize>,

    /// Also write a JSON run report into the output directory
    #[arg(long)]
    report: bool,
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    if log4rs::init_file("log4rs.yml", Default::default()).is_ok() {
        return Ok(());
    }
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{d(%H:%M:%S)} {h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    init_logging()?;
    let args = Args::parse();
    log::info!("#Start main() template={:?} table={:?}", args.template, args.table);

    let mut settings = Settings::from_env()?;
    if let Some(reserve) = args.reserve {
        settings.reserve_count = reserve;
    }
    if let Some(dir) = args.output {
        settings.output_dir = dir;
    }

    let template = std::fs::read_to_string(&args.template)
        .map_err(|e| format!("Error reading template {:?}: {e}", args.template))?;
    let table = std::fs::read(&args.table)
        .map_err(|e| format!("Error reading table {:?}: {e}", args.table))?;

    let hint = TopologyHint {
        requested: args.topology,
        template_name: file_stem(&args.template),
        table_name: file_stem(&args.table),
        table_columns: Vec::new(),
    };

    let generation = run(&template, &table, hint, &settings)?;
    write_configs(&generation, &settings.output_dir)?;
    if args.report {
        write_report(&generation, &settings.output_dir)?;
    }
    print_summary(&generation);

    Ok(())
}
