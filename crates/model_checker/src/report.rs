//! Console report: live progress per probe, then a summary and a verdict.

use std::io::{self, Write};

use colored::Colorize;

use crate::credential::Credential;
use crate::error::CheckError;
use crate::probe::{error_detail, ProbeOutcome, ProbeResults, ERROR_BODY_PREVIEW_CHARS};
use crate::truncate_chars;

const RULE_WIDTH: usize = 50;

pub const NO_MODELS_WORKED: &str = "❌ No models worked!";
pub const SOME_MODELS_WORKED: &str = "✅ Some models worked!";

pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH))
    }

    pub fn credential_found(&mut self, credential: &Credential) -> io::Result<()> {
        writeln!(self.out, "{}", "✅ Found API key".green())?;
        writeln!(self.out, "   Starts with: {}", credential.preview())
    }

    pub fn banner(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", "🧪 Testing Anthropic API Models".bright_blue())?;
        self.rule()?;
        self.out.flush()
    }

    pub fn probing(&mut self, model: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "📝 Testing: {}", model.cyan())?;
        self.out.flush()
    }

    pub fn outcome(&mut self, outcome: &ProbeOutcome) -> io::Result<()> {
        match outcome {
            ProbeOutcome::Success { reply: Some(reply) } => {
                writeln!(self.out, "   {} (reply: {})", "✅ SUCCESS".green(), reply.trim())?;
            }
            ProbeOutcome::Success { reply: None } => {
                writeln!(self.out, "   {}", "✅ SUCCESS".green())?;
            }
            ProbeOutcome::HttpError { status, .. } if (200..300).contains(status) => {
                writeln!(self.out, "   {} {}", "❌ HTTP".red(), status)?;
            }
            ProbeOutcome::HttpError { status, body } => {
                writeln!(self.out, "   {} {}", "❌ Request failed:".red(), status)?;
                if let Some(detail) = error_detail(body) {
                    self.detail(&detail)?;
                }
            }
            ProbeOutcome::TransportError { message } => {
                writeln!(self.out, "   {} unknown", "❌ Request failed:".red())?;
                let detail = truncate_chars(message, ERROR_BODY_PREVIEW_CHARS).to_string();
                self.detail(&detail)?;
            }
            ProbeOutcome::MalformedResponse { message } => {
                writeln!(self.out, "   {} {}", "❌ Error:".red(), message)?;
            }
        }
        self.out.flush()
    }

    fn detail(&mut self, detail: &str) -> io::Result<()> {
        writeln!(self.out, "      {}", detail.bright_black())
    }

    pub fn summary(&mut self, results: &ProbeResults) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", "Summary:".bold())?;
        for (model, status) in results.iter() {
            writeln!(self.out, "  {} {}", status.symbol(), model)?;
        }

        writeln!(self.out)?;
        if results.all_failed() {
            writeln!(self.out, "{}", NO_MODELS_WORKED.bright_red())?;
        } else {
            writeln!(self.out, "{}", SOME_MODELS_WORKED.bright_green())?;
        }
        self.out.flush()
    }

    pub fn error(&mut self, err: &CheckError) -> io::Result<()> {
        writeln!(self.out, "{}", format!("❌ {}", err).red())?;
        self.out.flush()
    }
}
