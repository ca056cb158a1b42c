use std::fmt::Write as _;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

use gwt_inspect::error::Result;
use gwt_inspect::{inspect, DecodedBody, Inspection, RequestReport, ResolvedToken, ResponseReport};

#[derive(Parser)]
#[command(name = "gwt-inspect")]
#[command(about = "Make captured GWT-RPC requests and responses human-readable")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # Inspect a captured request from stdin
    echo '7|0|2|http://host/app/|Service|1|2|' | gwt-inspect

    # Inspect a response saved to a file, as text
    gwt-inspect response.txt --format text

    # Print only the decoded JSON body of a response
    gwt-inspect response.txt --raw-json
"#)]
pub struct Cli {
    /// File containing the raw payload. Reads stdin when omitted or `-`
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Print single-line JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,

    /// For responses, print only the decoded body (if it decoded)
    #[arg(long)]
    pub raw_json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}

/// Read the whole input as text, replacing invalid UTF-8
pub fn read_input(source: Option<&Path>) -> Result<String> {
    let bytes = match source {
        Some(path) if path != Path::new("-") => std::fs::read(path)?,
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub fn run(input: &str, cli: &Cli) -> Result<()> {
    let output = render(input, cli)?;
    println!("{}", output);
    Ok(())
}

/// Inspect the input and render it per the CLI options
pub fn render(input: &str, cli: &Cli) -> Result<String> {
    let inspection = inspect(input)?;

    if cli.raw_json {
        if let Inspection::Response(report) = &inspection {
            if let DecodedBody::Structured(value) = &report.body {
                return to_json(value, cli.compact);
            }
        }
    }

    match cli.format {
        OutputFormat::Json => to_json(&inspection, cli.compact),
        OutputFormat::Text => Ok(render_text(&inspection)),
    }
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let json = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    Ok(json)
}

pub fn render_text(inspection: &Inspection) -> String {
    let mut out = String::new();

    match inspection {
        Inspection::Request(report) => write_request(&mut out, report),
        Inspection::Response(report) => write_response(&mut out, report),
        Inspection::Unknown(report) => {
            let _ = writeln!(out, "Kind: unknown");
            let _ = writeln!(out, "Raw: {}", report.raw);
        }
    }

    for diagnostic in inspection.diagnostics() {
        let _ = writeln!(out, "Warning: {}", diagnostic);
    }

    out.trim_end().to_string()
}

fn write_request(out: &mut String, report: &RequestReport) {
    let _ = writeln!(out, "Kind: request");
    let _ = writeln!(
        out,
        "Header: version={} flags={} string_table_size={}",
        report.header.version, report.header.flags, report.header.string_table_size
    );

    let _ = writeln!(out, "String table ({} entries):", report.string_table.len());
    for entry in &report.string_table {
        let _ = writeln!(out, "  [{}] {}", entry.index, entry.value);
    }

    let _ = writeln!(out, "Payload ({} tokens):", report.payload.len());
    for (position, token) in report.payload.iter().enumerate() {
        match token {
            ResolvedToken::Resolved { token, value, .. } => {
                let _ = writeln!(out, "  {:>3}: {} -> {}", position, token, value);
            }
            ResolvedToken::Literal { token } => {
                let _ = writeln!(out, "  {:>3}: {}", position, token);
            }
        }
    }
}

fn write_response(out: &mut String, report: &ResponseReport) {
    let _ = writeln!(out, "Kind: response");
    let _ = writeln!(out, "Status: {} ({})", report.status.as_str(), report.status_label);

    match &report.body {
        DecodedBody::Structured(value) => {
            let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            let _ = writeln!(out, "Body:\n{}", pretty);
        }
        DecodedBody::Raw(raw) => {
            let _ = writeln!(out, "Body (raw): {}", raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn cli(format: OutputFormat, raw_json: bool) -> Cli {
        Cli {
            file: None,
            format,
            compact: true,
            raw_json,
        }
    }

    #[test]
    fn test_read_input_from_file_lossy() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"//OK[\"caf\xff\"]").unwrap();

        let input = read_input(Some(file.path())).expect("Failed to read input");
        assert_eq!(input, "//OK[\"caf\u{FFFD}\"]");
    }

    #[test]
    fn test_read_input_missing_file() {
        let result = read_input(Some(Path::new("/nonexistent/gwt-payload.txt")));
        assert!(result.is_err());
    }

    #[test]
    fn test_render_compact_json_request() {
        let output = render("1|0|1|hello|1|", &cli(OutputFormat::Json, false)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["kind"], "request");
        assert_eq!(json["payload"][0]["value"], "hello");
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_render_raw_json_only_body() {
        let output = render("//OK[1,{\"a\":2}]", &cli(OutputFormat::Json, true)).unwrap();
        assert_eq!(output, "[1,{\"a\":2}]");
    }

    #[test]
    fn test_raw_json_falls_back_when_body_is_raw() {
        let output = render("//EX not json", &cli(OutputFormat::Json, true)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["kind"], "response");
        assert_eq!(json["body"], "not json");
    }

    #[test]
    fn test_render_text_request() {
        let output = render("1|0|2|hello|world|1|2|99", &cli(OutputFormat::Text, false)).unwrap();

        assert!(output.contains("[1] hello"));
        assert!(output.contains("0: 1 -> hello"));
        assert!(output.contains("2: 99"));
        assert!(!output.contains("99 ->"));
    }

    #[test]
    fn test_render_text_truncated_warning() {
        let output = render("1|0|3|a", &cli(OutputFormat::Text, false)).unwrap();
        assert!(output.contains("Warning: String table truncated"));
    }

    #[test]
    fn test_render_text_unknown() {
        let output = render("garbage", &cli(OutputFormat::Text, false)).unwrap();

        assert!(output.starts_with("Kind: unknown"));
        assert!(output.contains("Warning: Does not look like"));
    }

    #[test]
    fn test_render_malformed_header_is_error() {
        assert!(render("1|x|2|a|b", &cli(OutputFormat::Json, false)).is_err());
    }
}
