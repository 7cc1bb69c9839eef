use clap::Parser;
use color_eyre::Report;
use idxalgebra::cli::Cli;

fn main() -> Result<(), Report> {
    color_eyre::install()?;
    // Parse once with clap-derive
    let cli = Cli::parse();

    cli.run()
}
