use clap::{Parser, Subcommand, ValueEnum};
use cmds::analyze::IrOutputFormat;
use cobra_gen::PathsMode;
use std::path::PathBuf;

mod cmds;

#[derive(Parser)]
#[command(name = "cobra-gen")]
#[command(about = "Generate cobra command-line gRPC clients from protobuf service descriptors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate Go client code from service descriptors */
    Codegen {
        /* Schema files: YAML/JSON descriptors or binary descriptor sets */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Include directories for imported schema files */
        #[arg(short = 'i', long = "include-dir", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        /* Output directory for generated code */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,

        /* Generator config file (YAML) */
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /* Output layout, overriding the config file */
        #[arg(long = "paths", value_enum)]
        paths: Option<Paths>,

        /* Enable verbose output */
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },

    /* Show the command IR assembled for each service and method */
    Analyze {
        /* Schema files: YAML/JSON descriptors or binary descriptor sets */
        #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /* Include directories for imported schema files */
        #[arg(short = 'i', long = "include-dir", value_name = "DIR")]
        include_dirs: Vec<PathBuf>,

        /* Generator config file (YAML) */
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,

        /* Format to use when printing the IR */
        #[arg(long = "format", value_enum, default_value = "json")]
        format: IrOutputFormat,

        /* Print only the subcommand for one method, as Service.Method */
        #[arg(long = "method", value_name = "SERVICE.METHOD")]
        method: Option<String>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Paths {
    /* Under the Go import path from go_package */
    Import,
    /* Next to the proto file */
    #[value(name = "source_relative")]
    SourceRelative,
}

impl From<Paths> for PathsMode {
    fn from(paths: Paths) -> Self {
        match paths {
            Paths::Import => PathsMode::Import,
            Paths::SourceRelative => PathsMode::SourceRelative,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Codegen { verbose: true, .. });
    cobra_gen::logging::init(if verbose { "debug" } else { "info" });

    match cli.command {
        Commands::Codegen {
            files,
            include_dirs,
            output_dir,
            config,
            paths,
            verbose,
        } => {
            cmds::codegen::run(files, include_dirs, output_dir, config, paths.map(Into::into), verbose)?;
        }

        Commands::Analyze {
            files,
            include_dirs,
            config,
            format,
            method,
        } => {
            cmds::analyze::run(files, include_dirs, config, format, method)?;
        }
    }

    Ok(())
}
