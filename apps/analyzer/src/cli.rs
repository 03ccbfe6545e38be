use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "analyzer", version)]
#[command(about = "Resume intelligence and professional profile verification")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyse a résumé against a job description and write JSON, Markdown and PNG outputs
    Analyze {
        resume: PathBuf,
        job_description: PathBuf,
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
    },
    /// Verify the profile URLs found in a résumé and write a trust report
    Profiles {
        resume: PathBuf,
        #[arg(long, default_value = "resume_analysis_result.json")]
        output: PathBuf,
    },
    /// Serve the analysis HTTP API
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
    },
}
