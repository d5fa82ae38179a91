use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use xmlpatch::pipeline::mutations::{self, Edit};
use xmlpatch::{
    collect_sources, read_source, EmptyElements, EnumerateOptions, FsSink, NodePath, ParserConfig,
    Pipeline, SerializerConfig, Sink, SourceDocument,
};

#[derive(Debug, Parser)]
#[command(
    name = "xmlpatch",
    version,
    about = "Patch an element in a set of XML documents"
)]
struct Args {
    /// Input file or directory of .xml files
    #[arg(value_name = "INPUT")]
    input: PathBuf,
    /// Element to address, as tag names below the root (e.g. TargetEndpoints/VersionInfo)
    #[arg(short, long, value_name = "PATH")]
    path: Option<NodePath>,
    /// Print the value of an attribute instead of editing
    #[arg(long, value_name = "NAME", conflicts_with_all = ["set_attr", "remove_attr", "set_text"])]
    get_attr: Option<String>,
    /// Set an attribute (repeatable)
    #[arg(long, value_name = "NAME=VALUE", value_parser = parse_assignment)]
    set_attr: Vec<(String, String)>,
    /// Remove an attribute (repeatable)
    #[arg(long, value_name = "NAME")]
    remove_attr: Vec<String>,
    /// Replace the element's text content
    #[arg(long, value_name = "VALUE")]
    set_text: Option<String>,
    /// Write results under this directory, mirroring input labels
    #[arg(short, long, value_name = "DIR", conflicts_with = "in_place")]
    output_dir: Option<PathBuf>,
    /// Overwrite the input files
    #[arg(long)]
    in_place: bool,
    /// Subdirectory levels to descend into when INPUT is a directory
    #[arg(long, default_value_t = 1)]
    depth: usize,
    /// Write empty elements as <a></a> instead of <a/>
    #[arg(long)]
    expand_empty: bool,
    /// Keep whitespace-only text between elements
    #[arg(long)]
    preserve_whitespace: bool,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn edits(&self) -> Vec<Edit> {
        let mut edits: Vec<Edit> = self
            .set_attr
            .iter()
            .map(|(name, value)| Edit::SetAttribute {
                name: name.clone(),
                value: value.clone(),
            })
            .collect();
        edits.extend(
            self.remove_attr
                .iter()
                .map(|name| Edit::RemoveAttribute { name: name.clone() }),
        );
        if let Some(value) = &self.set_text {
            edits.push(Edit::SetText {
                value: value.clone(),
            });
        }
        edits
    }

    fn log_filter(&self) -> EnvFilter {
        let level = match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

/// Prints serialized documents instead of writing them
struct StdoutSink {
    with_headers: bool,
}

impl Sink for StdoutSink {
    fn write(&mut self, destination: &Path, contents: &str) -> io::Result<()> {
        if self.with_headers {
            println!("==> {} <==", destination.display());
        }
        println!("{contents}");
        Ok(())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(args.log_filter())
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let sources = load_sources(&args.input, args.depth)?;
    if sources.is_empty() {
        warn!("no .xml files found under {}", args.input.display());
        return Ok(ExitCode::SUCCESS);
    }

    let path = args.path.clone().unwrap_or_default();
    let parser_config = ParserConfig::default().with_preserve_whitespace(args.preserve_whitespace);

    if let Some(name) = &args.get_attr {
        return Ok(print_attribute(&sources, &path, name, parser_config));
    }

    let edits = args.edits();
    if edits.is_empty() {
        bail!("nothing to do; pass --set-attr, --remove-attr, --set-text or --get-attr");
    }

    let empty_elements = if args.expand_empty {
        EmptyElements::Expand
    } else {
        EmptyElements::SelfClose
    };
    let mut pipeline = Pipeline::new(mutations::edit(path, edits))
        .with_parser_config(parser_config)
        .with_serializer_config(SerializerConfig::new(empty_elements));

    let report = match (&args.output_dir, args.in_place) {
        (Some(dir), _) => pipeline.run(sources, |s| dir.join(&s.label), &mut FsSink),
        (None, true) => pipeline.run(sources, |s| s.path.clone(), &mut FsSink),
        (None, false) => {
            let mut sink = StdoutSink {
                with_headers: sources.len() > 1,
            };
            pipeline.run(sources, |s| PathBuf::from(&s.label), &mut sink)
        }
    };

    for outcome in report.failed() {
        if let Err(err) = &outcome.result {
            error!("{}: {err}", outcome.label);
        }
    }
    if report.is_success() {
        info!("{} document(s) patched", report.len());
        Ok(ExitCode::SUCCESS)
    } else {
        error!(
            "{} of {} document(s) failed",
            report.failed().count(),
            report.len()
        );
        Ok(ExitCode::FAILURE)
    }
}

fn load_sources(input: &Path, depth: usize) -> Result<Vec<SourceDocument>> {
    if input.is_dir() {
        let options = EnumerateOptions::default().with_max_depth(depth);
        collect_sources(input, &options)
            .with_context(|| format!("failed to read input directory {}", input.display()))
    } else {
        let source = read_source(input)
            .with_context(|| format!("failed to read input file {}", input.display()))?;
        Ok(vec![source])
    }
}

fn print_attribute(
    sources: &[SourceDocument],
    path: &NodePath,
    name: &str,
    config: ParserConfig,
) -> ExitCode {
    let mut code = ExitCode::SUCCESS;
    for source in sources {
        let bytes = match &source.contents {
            Ok(bytes) => bytes,
            Err(err) => {
                error!("{}: could not read {}: {err}", source.label, source.path.display());
                code = ExitCode::FAILURE;
                continue;
            }
        };
        match xmlpatch::Parser::with_config(bytes, config).parse() {
            Ok(doc) => {
                let value = doc.resolve_path(path).and_then(|el| el.attribute(name));
                match value {
                    Some(value) => println!("{}: {value}", source.label),
                    None => {
                        warn!("{}: no attribute {name} at {path}", source.label);
                        code = ExitCode::FAILURE;
                    }
                }
            }
            Err(err) => {
                error!("{}: {err}", source.label);
                code = ExitCode::FAILURE;
            }
        }
    }
    code
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got {s:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("resourceName=new default"),
            Ok(("resourceName".to_string(), "new default".to_string()))
        );
        assert_eq!(
            parse_assignment("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=v").is_err());
    }

    #[test]
    fn test_edits_from_args() {
        let args = Args::parse_from([
            "xmlpatch",
            "in.xml",
            "--path",
            "A/B",
            "--set-attr",
            "x=1",
            "--remove-attr",
            "y",
            "--set-text",
            "t",
        ]);
        assert_eq!(args.path, Some(NodePath::new(["A", "B"])));
        assert_eq!(
            args.edits(),
            vec![
                Edit::SetAttribute {
                    name: "x".to_string(),
                    value: "1".to_string()
                },
                Edit::RemoveAttribute {
                    name: "y".to_string()
                },
                Edit::SetText {
                    value: "t".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
