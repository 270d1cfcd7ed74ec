use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Cover-letter synthesis from a résumé and a job description
#[derive(Parser, Debug)]
#[command(
    name = "coverletter",
    about = "Cover-letter synthesis from a résumé and a job description",
    version,
    long_about = "coverletter matches skills shared by a résumé and a job description, \
                  extracts the candidate's name, and fills a letter template. The result \
                  is saved as plain text and optionally rendered to PDF. Run `serve` to \
                  expose the same operations over HTTP."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "COVERLETTER_CONFIG",
        help = "JSON letter config (vocabulary, caps, template)"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - only log errors"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Explicit `--log-level` wins over `-v`/`-q`; `None` defers to the environment.
    pub fn log_level(&self) -> Option<&str> {
        match (&self.log_level, self.verbose, self.quiet) {
            (Some(level), _, _) => Some(level.as_str()),
            (None, true, _) => Some("debug"),
            (None, _, true) => Some("error"),
            _ => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Run the HTTP API")]
    Serve(ServeArgs),

    #[command(
        about = "Generate a cover letter from a résumé PDF and a job description file",
        long_about = "Reads the résumé PDF and job description, composes the letter and saves it.\n\n\
                      Examples:\n  \
                      coverletter generate cv.pdf job.txt\n  \
                      coverletter generate cv.pdf job.txt --company Acme --position 'Backend Engineer'\n  \
                      coverletter generate cv.pdf job.txt -o letters/acme.txt --pdf"
    )]
    Generate(GenerateArgs),

    #[command(about = "Print the text of a résumé PDF or job description file")]
    Extract(ExtractArgs),

    #[command(
        about = "Render a text file to PDF",
        long_about = "Renders a plain-text file as a titled PDF. The output defaults to the \
                      input path with a .pdf extension.\n\n\
                      Examples:\n  \
                      coverletter render letter.txt\n  \
                      coverletter render --check"
    )]
    Render(RenderArgs),

    #[command(about = "Print the active letter template")]
    Template,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    #[arg(short = 'p', long, help = "Listen port (overrides PORT)")]
    pub port: Option<u16>,
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(value_name = "RESUME_PDF")]
    pub resume: PathBuf,

    #[arg(value_name = "JOB_TEXT")]
    pub job: PathBuf,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub position: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Letter output path (default: timestamped file in the output directory)"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Directory for timestamped letters (default: COVERLETTER_OUTPUT_DIR or ./output)"
    )]
    pub output_dir: Option<PathBuf>,

    #[arg(long, help = "Also render the letter to PDF next to the text file")]
    pub pdf: bool,

    #[arg(short = 'f', long, value_enum, default_value = "human", help = "Output format")]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[arg(value_name = "PATH", help = "A .pdf résumé or a text job description")]
    pub path: PathBuf,

    #[arg(long, help = "Print only the summary")]
    pub summary: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    #[arg(value_name = "TEXT_FILE", required_unless_present = "check")]
    pub input: Option<PathBuf>,

    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Only report whether PDF rendering is available")]
    pub check: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_generate_args() {
        let args = CliArgs::parse_from([
            "coverletter",
            "generate",
            "cv.pdf",
            "job.txt",
            "--company",
            "Acme",
            "--pdf",
        ]);
        match args.command {
            Commands::Generate(generate) => {
                assert_eq!(generate.resume, PathBuf::from("cv.pdf"));
                assert_eq!(generate.job, PathBuf::from("job.txt"));
                assert_eq!(generate.company.as_deref(), Some("Acme"));
                assert!(generate.position.is_none());
                assert!(generate.pdf);
                assert!(generate.output_dir.is_none());
                assert_eq!(generate.format, OutputFormatArg::Human);
            }
            other => panic!("Expected Generate command, got {other:?}"),
        }
    }

    #[test]
    fn test_render_check_needs_no_input() {
        let args = CliArgs::parse_from(["coverletter", "render", "--check"]);
        assert!(matches!(args.command, Commands::Render(RenderArgs { check: true, input: None, .. })));
        assert!(CliArgs::try_parse_from(["coverletter", "render"]).is_err());
    }

    #[test]
    fn test_log_level_precedence() {
        let args = CliArgs::parse_from(["coverletter", "-v", "template"]);
        assert_eq!(args.log_level(), Some("debug"));

        let args = CliArgs::parse_from(["coverletter", "--log-level", "warn", "-v", "template"]);
        assert_eq!(args.log_level(), Some("warn"));

        let args = CliArgs::parse_from(["coverletter", "template"]);
        assert_eq!(args.log_level(), None);
    }
}
